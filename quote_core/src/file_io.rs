//! # File I/O Module
//!
//! Quote projects live in `.iqt` files (pretty-printed JSON). Rate cards are
//! plain JSON files holding a [`RateCard`].
//!
//! - **Atomic saves**: data goes to `<file>.tmp`, is synced, then renamed over
//!   the target so an interrupted save never leaves a half-written quote
//! - **File locking**: a `<file>.lock` sidecar records who is editing; the
//!   sidecar is also held with an OS-level exclusive lock
//! - **Version validation**: files from a newer schema are refused
//! - **Normalization**: loaded projects have legacy add-ons converted and
//!   every cached amount recomputed
//!
//! ## Example
//!
//! ```rust,no_run
//! use quote_core::file_io::{load_project, save_project, FileLock};
//! use quote_core::project::Project;
//! use std::path::Path;
//!
//! let path = Path::new("sharma.iqt");
//! let lock = FileLock::acquire(path, "designer@studio.in").unwrap();
//!
//! let project = Project::new("Sharma Residence", "A. Sharma");
//! save_project(&project, path).unwrap();
//!
//! drop(lock);
//! let reloaded = load_project(path).unwrap();
//! assert_eq!(reloaded.info.name, "Sharma Residence");
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::catalog::RateCard;
use crate::errors::{QuoteError, QuoteResult};
use crate::project::{Project, SCHEMA_VERSION};

/// Extension used for quote project files
pub const PROJECT_EXTENSION: &str = "iqt";

/// Locks older than this are treated as abandoned.
const STALE_LOCK_HOURS: i64 = 24;

// ============================================================================
// Locking
// ============================================================================

/// Who holds a project open, stored in the `.lock` sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Host the lock was taken on
    pub machine: String,
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// "user (machine)" for messages
    pub fn holder(&self) -> String {
        format!("{} ({})", self.user_id, self.machine)
    }

    /// A lock is stale when it is older than a day, or when it was taken on
    /// this machine by a process that no longer exists.
    pub fn is_stale(&self) -> bool {
        if Utc::now() - self.locked_at > Duration::hours(STALE_LOCK_HOURS) {
            return true;
        }
        match hostname() {
            Some(machine) if machine == self.machine => process_alive(self.pid) == Some(false),
            _ => false,
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME").ok().or_else(|| std::env::var("HOST").ok())
    }
}

/// `None` when liveness cannot be determined on this platform.
fn process_alive(pid: u32) -> Option<bool> {
    #[cfg(target_os = "linux")]
    {
        Some(Path::new(&format!("/proc/{pid}")).exists())
    }
    #[cfg(not(target_os = "linux"))]
    {
        let _ = pid;
        None
    }
}

/// Exclusive edit lock on a project file, released on drop.
///
/// The `.lock` sidecar carries a [`LockInfo`] so other users can see who has
/// the quote open; the sidecar's handle also holds an fs2 exclusive lock.
#[derive(Debug)]
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    _handle: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire the edit lock for `path`.
    ///
    /// Fails with [`QuoteError::FileLocked`] if a live lock exists. Stale
    /// locks are taken over.
    ///
    /// ```rust,no_run
    /// use quote_core::file_io::FileLock;
    /// use std::path::Path;
    ///
    /// let lock = FileLock::acquire(Path::new("quote.iqt"), "designer")?;
    /// drop(lock);
    /// # Ok::<(), quote_core::errors::QuoteError>(())
    /// ```
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> QuoteResult<Self> {
        let lock_path = lock_path_for(path);

        if let Some(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(QuoteError::file_locked(
                    path.display().to_string(),
                    existing.holder(),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            tracing::warn!(path = %path.display(), holder = %existing.holder(), "taking over stale lock");
        }

        let mut handle = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)
            .map_err(|e| QuoteError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        handle
            .try_lock_exclusive()
            .map_err(|_| QuoteError::file_locked(path.display().to_string(), "another process", "unknown"))?;

        // Only the lock holder may clear the previous contents
        let info = LockInfo::new(user_id);
        let json = serde_json::to_vec_pretty(&info)?;
        handle
            .set_len(0)
            .and_then(|_| handle.write_all(&json))
            .and_then(|_| handle.sync_all())
            .map_err(|e| QuoteError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "acquired project lock");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _handle: handle,
            info,
        })
    }

    /// Current live lock on `path`, if any.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path)).filter(|info| !info.is_stale())
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        tracing::debug!(path = %self.project_path.display(), "released project lock");
    }
}

/// `quote.iqt` → `quote.iqt.lock`
fn lock_path_for(path: &Path) -> PathBuf {
    sidecar_path(path, "lock")
}

fn sidecar_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

/// Unreadable or malformed lock files count as no lock.
fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    serde_json::from_str(&contents).ok()
}

// ============================================================================
// Saving and loading
// ============================================================================

/// Write bytes to `path` through a synced temp file and rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> QuoteResult<()> {
    let tmp_path = sidecar_path(path, "tmp");

    let mut tmp = File::create(&tmp_path)
        .map_err(|e| QuoteError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;
    tmp.write_all(bytes)
        .and_then(|_| tmp.sync_all())
        .map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            QuoteError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
        })?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        QuoteError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> QuoteResult<T> {
    let contents =
        fs::read_to_string(path).map_err(|e| QuoteError::file_error("read", path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents)
        .map_err(|e| QuoteError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))
}

/// Save a project with atomic write semantics.
pub fn save_project(project: &Project, path: &Path) -> QuoteResult<()> {
    let json = serde_json::to_vec_pretty(project)?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), items = project.item_count(), "saved project");
    Ok(())
}

/// Load a project, check its schema version and normalize it.
///
/// # Returns
///
/// * `Err(QuoteError::VersionMismatch)` - written by a newer or incompatible schema
/// * `Err(QuoteError::SerializationError)` - not valid project JSON
/// * `Err(QuoteError::FileError)` - I/O failure
pub fn load_project(path: &Path) -> QuoteResult<Project> {
    let mut project: Project = read_json(path)?;
    validate_version(&project.meta.version)?;

    let migrated = project.normalize();
    if migrated > 0 {
        tracing::info!(path = %path.display(), migrated, "converted legacy add-ons on load");
    }
    tracing::debug!(path = %path.display(), items = project.item_count(), "loaded project");
    Ok(project)
}

/// Load a project along with any live lock someone else holds on it.
pub fn load_project_with_lock_check(path: &Path) -> QuoteResult<(Project, Option<LockInfo>)> {
    let project = load_project(path)?;
    Ok((project, FileLock::check(path)))
}

/// Save a rate card as JSON.
pub fn save_rate_card(card: &RateCard, path: &Path) -> QuoteResult<()> {
    let json = serde_json::to_vec_pretty(card)?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), items = card.items.len(), "saved rate card");
    Ok(())
}

/// Load a rate card from JSON.
pub fn load_rate_card(path: &Path) -> QuoteResult<RateCard> {
    let card: RateCard = read_json(path)?;
    tracing::debug!(path = %path.display(), items = card.items.len(), "loaded rate card");
    Ok(card)
}

/// Major versions must match; under 0.x a newer minor is refused too.
pub fn validate_version(file_version: &str) -> QuoteResult<()> {
    let parse = |v: &str| -> Option<(u32, u32)> {
        let mut parts = v.trim().split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().map_or(Some(0), |p| p.parse().ok())?;
        Some((major, minor))
    };

    let mismatch = || QuoteError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let (file_major, file_minor) = parse(file_version).ok_or_else(mismatch)?;
    let (major, minor) = parse(SCHEMA_VERSION).ok_or_else(mismatch)?;

    if file_major != major || (major == 0 && file_minor > minor) {
        return Err(mismatch());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RateCardItem;
    use crate::line_item::LineItem;
    use crate::project::{ProjectType, Room};
    use crate::units::UnitOfMeasure;
    use std::env::temp_dir;

    fn temp_path(name: &str) -> PathBuf {
        temp_dir().join(format!("quote_core_test_{}_{}.iqt", name, std::process::id()))
    }

    fn sample_project() -> Project {
        let mut project = Project::new("Sharma Residence", "A. Sharma");
        project.add_room(Room::new("Kitchen", "Kitchen")).unwrap();
        project
            .add_line_item(LineItem::new("Kitchen", "Chimney", UnitOfMeasure::Count, 18000.0))
            .unwrap();
        project
    }

    #[test]
    fn test_sidecar_paths() {
        let path = Path::new("/quotes/sharma.iqt");
        assert_eq!(lock_path_for(path), Path::new("/quotes/sharma.iqt.lock"));
        assert_eq!(sidecar_path(path, "tmp"), Path::new("/quotes/sharma.iqt.tmp"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = temp_path("roundtrip");
        let project = sample_project();
        save_project(&project, &path).unwrap();

        let loaded = load_project(&path).unwrap();
        assert_eq!(loaded.info, project.info);
        assert_eq!(loaded.line_items, project.line_items);
        assert_eq!(loaded.totals(), project.totals());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_atomic_save_leaves_no_tmp_file() {
        let path = temp_path("atomic");
        save_project(&sample_project(), &path).unwrap();

        assert!(path.exists());
        assert!(!sidecar_path(&path, "tmp").exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_normalizes_legacy_file() {
        let path = temp_path("legacy");
        let json = r#"{
            "meta": {"version": "0.1.0", "created": "2024-03-01T10:00:00Z", "modified": "2024-03-01T10:00:00Z"},
            "info": {"name": "Old Quote", "client_name": "Client"},
            "settings": {"gst": 18, "discount": 0},
            "rooms": [{"name": "Bedroom", "type": "Bedroom"}],
            "line_items": [{
                "room": "Bedroom", "item": "Wardrobe", "uom": "SFT",
                "length": "6", "height": 7, "quantity": null, "rate": 1500,
                "amount": 1, "add_ons": "Profile Door, Lights"
            }]
        }"#;
        fs::write(&path, json).unwrap();

        let project = load_project(&path).unwrap();
        let item = &project.line_items[0];
        assert!(!item.add_ons.is_legacy());
        assert_eq!(item.quantity, 1.0);
        assert_eq!(item.amount, 6.0 * 7.0 * (1500.0 + 150.0 + 250.0));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_skips_junk_entries() {
        let path = temp_path("junk_entries");
        let json = r#"{
            "meta": {"version": "0.1.0", "created": "2024-03-01T10:00:00Z", "modified": "2024-03-01T10:00:00Z"},
            "info": {"name": "Imported", "client_name": "Client", "project_type": "Penthouse"},
            "rooms": [{"name": "Hall", "type": null}, null, "Kitchen"],
            "line_items": [
                {"room": "Hall", "item": "Sofa", "uom": {}, "rate": 40000,
                 "add_ons": {"Lights": null, "Cushions": {"selected": 1, "rate_per_unit": 500, "description": null}}},
                null,
                42
            ]
        }"#;
        fs::write(&path, json).unwrap();

        let project = load_project(&path).unwrap();
        assert_eq!(project.info.project_type, ProjectType::Other);
        assert_eq!(project.rooms, vec![Room::new("Hall", "")]);
        assert_eq!(project.line_items.len(), 1);
        assert_eq!(project.line_items[0].amount, 40500.0);
        assert_eq!(project.totals().subtotal, 40500.0);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_rejects_bad_json_and_missing_file() {
        let path = temp_path("bad_json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_project(&path).unwrap_err().error_code(), "SERIALIZATION_ERROR");
        let _ = fs::remove_file(&path);

        let err = load_project(&temp_path("does_not_exist")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_file_lock_acquire_and_release() {
        let path = temp_path("lock");
        File::create(&path).unwrap();

        let lock = FileLock::acquire(&path, "designer@studio.in").unwrap();
        assert_eq!(lock.info.user_id, "designer@studio.in");
        assert!(lock_path_for(&path).exists());

        drop(lock);
        assert!(!lock_path_for(&path).exists());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_live_lock_is_reported() {
        let path = temp_path("lock_live");
        let info = LockInfo {
            user_id: "someone".to_string(),
            machine: "another-host".to_string(),
            pid: 1,
            locked_at: Utc::now(),
        };
        fs::write(lock_path_for(&path), serde_json::to_string(&info).unwrap()).unwrap();

        assert_eq!(FileLock::check(&path), Some(info));
        let err = FileLock::acquire(&path, "me").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        let _ = fs::remove_file(lock_path_for(&path));
    }

    #[test]
    fn test_failed_acquire_keeps_holder_info() {
        let path = temp_path("lock_held");
        let lock_path = lock_path_for(&path);
        let info = LockInfo {
            user_id: "someone".to_string(),
            machine: "another-host".to_string(),
            pid: 1,
            locked_at: Utc::now() - Duration::hours(STALE_LOCK_HOURS + 1),
        };
        let written = serde_json::to_string(&info).unwrap();
        fs::write(&lock_path, &written).unwrap();

        // The sidecar looks stale but another handle still holds the OS lock
        let holder = File::open(&lock_path).unwrap();
        holder.lock_exclusive().unwrap();

        let err = FileLock::acquire(&path, "me").unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");
        assert_eq!(fs::read_to_string(&lock_path).unwrap(), written);

        holder.unlock().unwrap();
        drop(holder);
        let lock = FileLock::acquire(&path, "me").unwrap();
        assert_eq!(read_lock_info(&lock_path).map(|held| held.user_id), Some("me".to_string()));
        drop(lock);
        assert!(!lock_path.exists());
    }

    #[test]
    fn test_old_lock_is_stale() {
        let info = LockInfo {
            user_id: "someone".to_string(),
            machine: "another-host".to_string(),
            pid: 1,
            locked_at: Utc::now() - Duration::hours(STALE_LOCK_HOURS + 1),
        };
        assert!(info.is_stale());
    }

    #[test]
    fn test_load_with_lock_check() {
        let path = temp_path("lock_check");
        save_project(&sample_project(), &path).unwrap();

        let (loaded, lock) = load_project_with_lock_check(&path).unwrap();
        assert_eq!(loaded.info.name, "Sharma Residence");
        assert!(lock.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_rate_card_roundtrip() {
        let path = temp_dir().join(format!("quote_core_test_rates_{}.json", std::process::id()));
        let mut card = RateCard::sample();
        card.add_item(RateCardItem::new("Electrical", "Fan Point", UnitOfMeasure::Count, 450.0));
        save_rate_card(&card, &path).unwrap();

        let loaded = load_rate_card(&path).unwrap();
        assert_eq!(loaded, card);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version(SCHEMA_VERSION).is_ok());
        assert!(validate_version("0.1.7").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }
}
