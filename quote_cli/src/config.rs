use std::{fs, path::Path};

use quote_core::currency::{CurrencyFormat, DigitGrouping};
use quote_core::project::{ProjectSettings, DEFAULT_TAX_PERCENT};
use quote_core::{QuoteError, QuoteResult};
use serde::Deserialize;

/// Environment variable naming the config file when `--config` is absent
pub const CONFIG_ENV_VAR: &str = "QUOTE_CONFIG";

/// CLI settings read from a TOML file. Every field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub currency_symbol: String,
    /// Lakh/crore digit grouping instead of thousands
    pub indian_grouping: bool,
    /// Settings given to newly created projects
    pub default_tax_percent: f64,
    pub default_discount_percent: f64,
    /// Recorded in lock files
    pub user_id: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            currency_symbol: "₹".to_string(),
            indian_grouping: true,
            default_tax_percent: DEFAULT_TAX_PERCENT,
            default_discount_percent: 0.0,
            user_id: None,
        }
    }
}

impl AppConfig {
    pub fn currency(&self) -> CurrencyFormat {
        let grouping = if self.indian_grouping {
            DigitGrouping::Indian
        } else {
            DigitGrouping::Western
        };
        CurrencyFormat::new(self.currency_symbol.clone(), grouping)
    }

    pub fn default_settings(&self) -> ProjectSettings {
        ProjectSettings {
            tax_percent: self.default_tax_percent,
            discount_percent: self.default_discount_percent,
        }
    }

    /// Configured user, then `$USER`/`$USERNAME`, then "unknown".
    pub fn lock_user(&self) -> String {
        self.user_id
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

pub fn load_config<P: AsRef<Path>>(path: P) -> QuoteResult<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .map_err(|e| QuoteError::file_error("read config", path_ref.display().to_string(), e.to_string()))?;
    toml::from_str(&contents).map_err(|e| {
        QuoteError::serialization(format!("Failed to parse TOML from config file {:?}: {}", path_ref, e))
    })
}

/// Config from the explicit path, else `$QUOTE_CONFIG`, else defaults.
///
/// An explicitly named file must exist; a missing `$QUOTE_CONFIG` file falls
/// back to defaults with a warning.
pub fn resolve_config(explicit: Option<&Path>) -> QuoteResult<AppConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if Path::new(&path).exists() => load_config(&path),
        Ok(path) => {
            tracing::warn!(path = %path, "{} points to a missing file; using defaults", CONFIG_ENV_VAR);
            Ok(AppConfig::default())
        }
        Err(_) => Ok(AppConfig::default()),
    }
}
