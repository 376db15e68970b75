//! # Chamber Geometry
//!
//! Turns the raw internal dimensions and insulation thickness into the
//! resolved internal/external geometry every later stage works from.
//!
//! The insulation is applied uniformly: each external dimension is the
//! internal dimension plus one insulation thickness on both faces.
//!
//! The ribbon burner is sized from volume alone, so a chamber can hold enough
//! volume for a burner that does not fit its ceiling. Those inputs are
//! rejected here, before anything is calculated.
//!
//! ## Example
//!
//! ```rust
//! use forge_core::calculations::geometry::{resolve, ChamberInput};
//! use forge_core::calculations::door::DoorConfiguration;
//! use forge_core::config::ForgeConfig;
//!
//! let input = ChamberInput {
//!     internal_width_in: 7.0,
//!     internal_height_in: 8.0,
//!     internal_length_in: 14.0,
//!     insulation_in: 2.0,
//!     door_configuration: DoorConfiguration::FrontOnly,
//! };
//!
//! let geometry = resolve(&input, &ForgeConfig::default()).unwrap();
//! assert_eq!(geometry.external_width_in, 11.0);
//! assert_eq!(geometry.external_length_in, 18.0);
//! assert_eq!(geometry.volume_ci, 784.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::burner;
use crate::calculations::door::DoorConfiguration;
use crate::config::{ForgeConfig, ValueRange};
use crate::errors::{ForgeError, ForgeResult};
use crate::units::{format_inches, trim_decimals};

/// Raw user input for one forge design.
///
/// ## JSON Example
///
/// ```json
/// {
///   "internal_width_in": 7.0,
///   "internal_height_in": 8.0,
///   "internal_length_in": 14.0,
///   "insulation_in": 2.0,
///   "door_configuration": "front_only"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChamberInput {
    /// Internal chamber width in inches
    pub internal_width_in: f64,

    /// Internal chamber height in inches
    pub internal_height_in: f64,

    /// Internal chamber length in inches (front to rear)
    pub internal_length_in: f64,

    /// Insulation thickness applied to every face, in inches
    pub insulation_in: f64,

    /// Which ends of the chamber get openings
    #[serde(default)]
    pub door_configuration: DoorConfiguration,
}

/// Resolved chamber geometry. Only produced by [`resolve`], so every
/// instance satisfies `external = internal + 2 x insulation` on each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChamberGeometry {
    pub internal_width_in: f64,
    pub internal_height_in: f64,
    pub internal_length_in: f64,
    pub insulation_in: f64,
    pub external_width_in: f64,
    pub external_height_in: f64,
    pub external_length_in: f64,
    /// Internal volume W x H x L in cubic inches
    pub volume_ci: f64,
}

impl ChamberGeometry {
    /// External envelope volume in cubic inches
    pub fn external_volume_ci(&self) -> f64 {
        self.external_width_in * self.external_height_in * self.external_length_in
    }

    /// Floor area of the chamber in square inches
    pub fn floor_area_in2(&self) -> f64 {
        self.internal_width_in * self.internal_length_in
    }

    /// Short human-readable summary, e.g. `7" x 8" x 14" (784 ci)`
    pub fn summary(&self) -> String {
        format!(
            "{} x {} x {} ({} ci)",
            format_inches(self.internal_width_in),
            format_inches(self.internal_height_in),
            format_inches(self.internal_length_in),
            trim_decimals(self.volume_ci, 1)
        )
    }
}

fn check_dimension(field: &str, value: f64, range: &ValueRange) -> ForgeResult<()> {
    if !value.is_finite() {
        return Err(ForgeError::validation(field, value.to_string(), "Must be a finite number"));
    }
    if value <= 0.0 {
        return Err(ForgeError::validation(field, value.to_string(), "Must be positive"));
    }
    if !range.contains(value) {
        return Err(ForgeError::validation(
            field,
            value.to_string(),
            format!("Must be between {} and {}", format_inches(range.min), format_inches(range.max)),
        ));
    }
    Ok(())
}

/// The top panel port must open entirely onto the chamber ceiling.
fn check_burner_fit(input: &ChamberInput, volume_ci: f64, config: &ForgeConfig) -> ForgeResult<()> {
    let burner = burner::design(volume_ci, &config.burner)?;
    if burner.port_width_in > input.internal_width_in {
        return Err(ForgeError::validation(
            "internal_width_in",
            input.internal_width_in.to_string(),
            format!(
                "Burner port ({}) is wider than the chamber",
                format_inches(burner.port_width_in)
            ),
        ));
    }
    if burner.port_length_in > input.internal_length_in {
        return Err(ForgeError::validation(
            "internal_length_in",
            input.internal_length_in.to_string(),
            format!(
                "A {}-hole burner needs a {} port; lengthen the chamber or reduce its cross-section",
                burner.hole_count,
                format_inches(burner.port_length_in)
            ),
        ));
    }
    Ok(())
}

/// Validate the input and resolve the chamber geometry.
///
/// # Errors
///
/// `ForgeError::Validation` when a dimension is non-finite, non-positive or
/// outside its configured range, when the insulation is not smaller than half
/// the smallest internal dimension, when the volume is outside the
/// supported single-burner range, or when the burner port would not fit the
/// chamber ceiling.
pub fn resolve(input: &ChamberInput, config: &ForgeConfig) -> ForgeResult<ChamberGeometry> {
    let ranges = &config.ranges;
    check_dimension("internal_width_in", input.internal_width_in, &ranges.width_in)?;
    check_dimension("internal_height_in", input.internal_height_in, &ranges.height_in)?;
    check_dimension("internal_length_in", input.internal_length_in, &ranges.length_in)?;
    check_dimension("insulation_in", input.insulation_in, &ranges.insulation_in)?;

    let smallest = input
        .internal_width_in
        .min(input.internal_height_in)
        .min(input.internal_length_in);
    if input.insulation_in >= smallest / 2.0 {
        return Err(ForgeError::validation(
            "insulation_in",
            input.insulation_in.to_string(),
            format!(
                "Insulation must be less than half the smallest internal dimension ({})",
                format_inches(smallest)
            ),
        ));
    }

    let volume_ci = input.internal_width_in * input.internal_height_in * input.internal_length_in;
    if volume_ci < ranges.volume_ci.min {
        return Err(ForgeError::validation(
            "volume_ci",
            trim_decimals(volume_ci, 1),
            format!(
                "Chamber is too small for a ribbon burner (minimum {} ci)",
                trim_decimals(ranges.volume_ci.min, 0)
            ),
        ));
    }
    if volume_ci > ranges.volume_ci.max {
        return Err(ForgeError::validation(
            "volume_ci",
            trim_decimals(volume_ci, 1),
            format!(
                "Chamber is too large for a single burner (maximum {} ci)",
                trim_decimals(ranges.volume_ci.max, 0)
            ),
        ));
    }

    check_burner_fit(input, volume_ci, config)?;

    let wall = 2.0 * input.insulation_in;
    let geometry = ChamberGeometry {
        internal_width_in: input.internal_width_in,
        internal_height_in: input.internal_height_in,
        internal_length_in: input.internal_length_in,
        insulation_in: input.insulation_in,
        external_width_in: input.internal_width_in + wall,
        external_height_in: input.internal_height_in + wall,
        external_length_in: input.internal_length_in + wall,
        volume_ci,
    };

    tracing::debug!(
        external_width_in = geometry.external_width_in,
        external_height_in = geometry.external_height_in,
        external_length_in = geometry.external_length_in,
        volume_ci = geometry.volume_ci,
        "resolved chamber geometry"
    );

    Ok(geometry)
}
