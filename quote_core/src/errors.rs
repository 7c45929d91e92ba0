//! # Error Types
//!
//! Structured error types for quote_core. The pricing functions never fail;
//! these errors come from the boundary around them: editing a project,
//! reading and writing files, and validating user input before it reaches
//! the calculator.
//!
//! ## Example
//!
//! ```rust
//! use quote_core::errors::{QuoteError, QuoteResult};
//!
//! fn validate_rate(rate: f64) -> QuoteResult<()> {
//!     if rate < 0.0 {
//!         return Err(QuoteError::invalid_input(
//!             "rate",
//!             rate.to_string(),
//!             "Rate cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_rate(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for quote_core operations
pub type QuoteResult<T> = Result<T, QuoteError>;

/// Structured error type for project and file operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum QuoteError {
    /// An input value is invalid (negative dimension, blank name, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// Line item refers to a room the project does not have
    #[error("Room not found: {room}")]
    RoomNotFound { room: String },

    /// A room with this name already exists
    #[error("Room already exists: {room}")]
    DuplicateRoom { room: String },

    /// No line item with this id
    #[error("Line item not found: {id}")]
    LineItemNotFound { id: String },

    /// No rate-card entry with this name
    #[error("Rate card item not found: {item}")]
    CatalogItemNotFound { item: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl QuoteError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        QuoteError::MissingField {
            field: field.into(),
        }
    }

    /// Create a RoomNotFound error
    pub fn room_not_found(room: impl Into<String>) -> Self {
        QuoteError::RoomNotFound { room: room.into() }
    }

    /// Create a DuplicateRoom error
    pub fn duplicate_room(room: impl Into<String>) -> Self {
        QuoteError::DuplicateRoom { room: room.into() }
    }

    /// Create a LineItemNotFound error
    pub fn line_item_not_found(id: impl ToString) -> Self {
        QuoteError::LineItemNotFound { id: id.to_string() }
    }

    /// Create a CatalogItemNotFound error
    pub fn catalog_item_not_found(item: impl Into<String>) -> Self {
        QuoteError::CatalogItemNotFound { item: item.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        QuoteError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        QuoteError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        QuoteError::SerializationError {
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuoteError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            QuoteError::InvalidInput { .. } => "INVALID_INPUT",
            QuoteError::MissingField { .. } => "MISSING_FIELD",
            QuoteError::RoomNotFound { .. } => "ROOM_NOT_FOUND",
            QuoteError::DuplicateRoom { .. } => "DUPLICATE_ROOM",
            QuoteError::LineItemNotFound { .. } => "LINE_ITEM_NOT_FOUND",
            QuoteError::CatalogItemNotFound { .. } => "CATALOG_ITEM_NOT_FOUND",
            QuoteError::FileError { .. } => "FILE_ERROR",
            QuoteError::FileLocked { .. } => "FILE_LOCKED",
            QuoteError::SerializationError { .. } => "SERIALIZATION_ERROR",
            QuoteError::VersionMismatch { .. } => "VERSION_MISMATCH",
            QuoteError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(e: serde_json::Error) -> Self {
        QuoteError::serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = QuoteError::invalid_input("length", "-5", "Length cannot be negative");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: QuoteError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(QuoteError::missing_field("room").error_code(), "MISSING_FIELD");
        assert_eq!(QuoteError::room_not_found("Kitchen").error_code(), "ROOM_NOT_FOUND");
        assert_eq!(QuoteError::duplicate_room("Kitchen").error_code(), "DUPLICATE_ROOM");
    }

    #[test]
    fn test_only_locks_are_recoverable() {
        assert!(QuoteError::file_locked("a.iqt", "someone", "now").is_recoverable());
        assert!(!QuoteError::room_not_found("Hall").is_recoverable());
    }

    #[test]
    fn test_display_mentions_context() {
        let error = QuoteError::room_not_found("Master Bedroom");
        assert_eq!(error.to_string(), "Room not found: Master Bedroom");
    }
}
