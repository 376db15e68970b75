//! # Unit Types
//!
//! Newtype wrappers for the volume and area conversions used by the
//! refractory and blanket quantities, plus the label formatting shared by
//! drawings and the build guide. Lengths stay plain `f64` inches.
//!
//! ## Example
//!
//! ```rust
//! use forge_core::units::{format_inches, CubicFeet, CubicInches};
//!
//! let shell = CubicInches(1728.0);
//! let cf: CubicFeet = shell.into();
//! assert_eq!(cf.0, 1.0);
//! assert_eq!(format_inches(12.75), "12.75\"");
//! ```

use serde::{Deserialize, Serialize};

/// Cubic inches per cubic foot
pub const CUBIC_INCHES_PER_CUBIC_FOOT: f64 = 1728.0;

/// Square inches per square foot
pub const SQUARE_INCHES_PER_SQUARE_FOOT: f64 = 144.0;

/// Page points per inch
pub const POINTS_PER_INCH: f64 = 72.0;

// ============================================================================
// Volume and Area Units
// ============================================================================

/// Volume in cubic inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicInches(pub f64);

/// Volume in cubic feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CubicFeet(pub f64);

impl From<CubicInches> for CubicFeet {
    fn from(ci: CubicInches) -> Self {
        CubicFeet(ci.0 / CUBIC_INCHES_PER_CUBIC_FOOT)
    }
}

/// Area in square inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareInches(pub f64);

/// Area in square feet
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareFeet(pub f64);

impl From<SquareInches> for SquareFeet {
    fn from(sq_in: SquareInches) -> Self {
        SquareFeet(sq_in.0 / SQUARE_INCHES_PER_SQUARE_FOOT)
    }
}

// ============================================================================
// Formatting
// ============================================================================

/// Format a length in inches for labels: at most two decimals, trailing zeros
/// dropped, followed by the inch mark (`11"`, `12.5"`, `12.75"`).
pub fn format_inches(value: f64) -> String {
    format!("{}\"", trim_decimals(value, 2))
}

/// Format a number with at most `decimals` places, trailing zeros dropped.
pub fn trim_decimals(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.');
        if trimmed == "-0" {
            "0".to_string()
        } else {
            trimmed.to_string()
        }
    } else {
        text
    }
}
