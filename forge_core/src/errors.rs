//! # Error Types
//!
//! Structured error types for forge_core. Every calculation-layer error names
//! the failing field and the value that caused it, so the CLI can report the
//! problem precisely and JSON consumers can react programmatically.
//!
//! ## Example
//!
//! ```rust
//! use forge_core::errors::{ForgeError, ForgeResult};
//!
//! fn validate_width(width_in: f64) -> ForgeResult<()> {
//!     if width_in <= 0.0 {
//!         return Err(ForgeError::validation(
//!             "internal_width_in",
//!             width_in.to_string(),
//!             "Width must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_width(0.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for forge_core operations
pub type ForgeResult<T> = Result<T, ForgeError>;

/// Structured error type for forge design operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum ForgeError {
    /// Input geometry is bad or out of the supported range.
    /// Reported to the user; nothing is calculated.
    #[error("Invalid input for '{field}': {value} - {reason}")]
    Validation {
        field: String,
        value: String,
        reason: String,
    },

    /// A derived quantity came out non-positive or non-finite.
    /// Indicates a formula/domain bug and is always fatal.
    #[error("Derived value out of range for '{field}': {value} - {reason}")]
    Range {
        field: String,
        value: String,
        reason: String,
    },

    /// A view could not fit the drawing area at any candidate scale.
    /// Non-fatal: the view is drawn at the smallest scale and flagged.
    #[error("Layout degraded for view '{view}': {reason}")]
    LayoutDegraded { view: String, reason: String },

    /// Drawing primitives could not be generated at all (e.g. zero-area panel)
    #[error("Drawing failed for '{element}': {reason}")]
    Drawing { element: String, reason: String },

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

    /// Design file schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// The document backend failed to compile or encode the build guide
    #[error("Render error: {stage} - {reason}")]
    Render { stage: String, reason: String },
}

impl ForgeError {
    /// Create a Validation error
    pub fn validation(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::Validation {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a Range error
    pub fn range(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::Range {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a LayoutDegraded error
    pub fn layout_degraded(view: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::LayoutDegraded {
            view: view.into(),
            reason: reason.into(),
        }
    }

    /// Create a Drawing error
    pub fn drawing(element: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::Drawing {
            element: element.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        ForgeError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a Render error
    pub fn render(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        ForgeError::Render {
            stage: stage.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ForgeError::FileLocked { .. } | ForgeError::LayoutDegraded { .. })
    }

    /// True for errors caused by the user's input rather than by the program
    pub fn is_validation(&self) -> bool {
        matches!(self, ForgeError::Validation { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ForgeError::Validation { .. } => "VALIDATION_ERROR",
            ForgeError::Range { .. } => "RANGE_ERROR",
            ForgeError::LayoutDegraded { .. } => "LAYOUT_DEGRADED",
            ForgeError::Drawing { .. } => "DRAWING_ERROR",
            ForgeError::FileError { .. } => "FILE_ERROR",
            ForgeError::FileLocked { .. } => "FILE_LOCKED",
            ForgeError::SerializationError { .. } => "SERIALIZATION_ERROR",
            ForgeError::VersionMismatch { .. } => "VERSION_MISMATCH",
            ForgeError::Render { .. } => "RENDER_ERROR",
        }
    }
}

/// Reject a derived value that is non-finite or not strictly positive.
///
/// Used by every calculator after each formula so a degenerate geometry is
/// reported against the first field it corrupts.
pub fn ensure_positive(field: &str, value: f64) -> ForgeResult<f64> {
    if !value.is_finite() {
        return Err(ForgeError::range(field, value.to_string(), "Value is not finite"));
    }
    if value <= 0.0 {
        return Err(ForgeError::range(field, value.to_string(), "Value must be positive"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = ForgeError::validation("internal_width_in", "0", "Width must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: ForgeError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
        assert!(json.contains("\"type\":\"Validation\""));
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(ForgeError::range("cfm", "NaN", "bad").error_code(), "RANGE_ERROR");
        assert_eq!(
            ForgeError::layout_degraded("FRONT", "too large").error_code(),
            "LAYOUT_DEGRADED"
        );
        assert!(ForgeError::validation("w", "0", "r").is_validation());
        assert!(!ForgeError::drawing("panel", "zero area").is_recoverable());
    }

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("x", 2.5).unwrap(), 2.5);
        assert!(matches!(ensure_positive("x", 0.0), Err(ForgeError::Range { .. })));
        assert!(matches!(ensure_positive("x", f64::NAN), Err(ForgeError::Range { .. })));
        assert!(matches!(ensure_positive("x", f64::INFINITY), Err(ForgeError::Range { .. })));
    }
}
