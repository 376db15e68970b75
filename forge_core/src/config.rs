//! # Design Configuration
//!
//! `ForgeConfig` gathers every fixed policy the calculators and the drawing
//! composer rely on: supported input ranges, formula constants, door ratios,
//! and page layout. It is an immutable value passed explicitly into each
//! stage, so two runs in one process can never interfere with each other.
//!
//! `ForgeConfig::default()` reproduces the documented build constants. Partial
//! JSON files override individual values; everything missing falls back to
//! the defaults.
//!
//! The sizing formulas themselves are not tunable. Hole coverage, minimum
//! hole count, the blower factor and margin, bag weight and the cost figures
//! may appear in a file only with their default values; [`ForgeConfig::validate`]
//! rejects anything else.
//!
//! ## Example
//!
//! ```rust
//! use forge_core::config::ForgeConfig;
//!
//! let config: ForgeConfig = serde_json::from_str(r#"{ "layout": { "revision": "B" } }"#).unwrap();
//! assert_eq!(config.layout.revision, "B");
//! assert_eq!(config.cost.per_bag_usd, 110.0);
//! assert!(config.validate().is_ok());
//!
//! let tuned: ForgeConfig = serde_json::from_str(r#"{ "cost": { "base_usd": 300.0 } }"#).unwrap();
//! assert!(tuned.validate().is_err());
//! ```

use serde::{Deserialize, Serialize};

use crate::drawing::PageSize;
use crate::errors::{ForgeError, ForgeResult};

/// Root configuration for one design run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    /// Supported input ranges (validated, not merely computed)
    pub ranges: InputRanges,
    /// Ribbon burner sizing
    pub burner: BurnerPolicy,
    /// Blower airflow sizing
    pub blower: BlowerPolicy,
    /// Castable refractory properties
    pub refractory: RefractoryPolicy,
    /// Ceramic fiber blanket
    pub blanket: BlanketPolicy,
    /// Insulating firebrick counts
    pub firebrick: FirebrickPolicy,
    /// Cost estimate
    pub cost: CostPolicy,
    /// Door opening ratios and hardware allowances
    pub doors: DoorPolicy,
    /// Steel frame and plate stock
    pub frame: FramePolicy,
    /// Drawing page layout
    pub layout: LayoutPolicy,
}

/// Closed interval of accepted values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        ValueRange { min, max }
    }

    /// Inclusive containment check
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Supported ranges for the chamber inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputRanges {
    pub width_in: ValueRange,
    pub height_in: ValueRange,
    pub length_in: ValueRange,
    pub insulation_in: ValueRange,
    /// Below the minimum a burner cannot heat evenly; above the maximum a
    /// single burner is not enough.
    pub volume_ci: ValueRange,
}

impl Default for InputRanges {
    fn default() -> Self {
        InputRanges {
            width_in: ValueRange::new(3.0, 12.0),
            height_in: ValueRange::new(3.0, 12.0),
            length_in: ValueRange::new(6.0, 48.0),
            insulation_in: ValueRange::new(1.0, 3.0),
            volume_ci: ValueRange::new(100.0, 2000.0),
        }
    }
}

/// Ribbon burner sizing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurnerPolicy {
    /// Chamber volume each flame hole covers (ci)
    pub hole_coverage_ci: f64,
    pub min_holes: u32,
    pub rows: u32,
    /// Hole spacing along a row (in)
    pub hole_pitch_in: f64,
    /// Casting margin added to the hole run (in)
    pub end_margin_in: f64,
    pub hole_diameter_in: f64,
    /// Square tube housing size (in)
    pub body_width_in: f64,
    /// Extra housing length beyond the refractory head (in)
    pub housing_extra_in: f64,
    /// Clearance around the housing for the top panel port (in)
    pub port_clearance_in: f64,
    /// Port center position along the top panel, as a fraction of its length
    /// measured from the front end
    pub port_offset_fraction: f64,
    /// Approximate heat requirement per cubic inch (BTU/h)
    pub btu_per_ci: f64,
}

impl Default for BurnerPolicy {
    fn default() -> Self {
        BurnerPolicy {
            hole_coverage_ci: 18.0,
            min_holes: 12,
            rows: 3,
            hole_pitch_in: 0.75,
            end_margin_in: 1.5,
            hole_diameter_in: 0.25,
            body_width_in: 3.0,
            housing_extra_in: 2.0,
            port_clearance_in: 0.5,
            port_offset_fraction: 0.4,
            btu_per_ci: 450.0,
        }
    }
}

/// Blower sizing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlowerPolicy {
    /// CFM per hole-coverage unit of volume
    pub cfm_factor: f64,
    /// Recommended = required x safety margin
    pub safety_margin: f64,
    /// Volumes at or above this use the high static pressure class (ci)
    pub high_pressure_threshold_ci: f64,
}

impl Default for BlowerPolicy {
    fn default() -> Self {
        BlowerPolicy {
            cfm_factor: 1.5,
            safety_margin: 1.25,
            high_pressure_threshold_ci: 500.0,
        }
    }
}

/// Castable refractory (Kast-O-Lite 30 LI class) properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefractoryPolicy {
    pub product: String,
    pub density_lb_per_cf: f64,
    pub bag_weight_lb: f64,
}

impl Default for RefractoryPolicy {
    fn default() -> Self {
        RefractoryPolicy {
            product: "Kast-O-Lite 30 LI".to_string(),
            density_lb_per_cf: 92.0,
            bag_weight_lb: 55.0,
        }
    }
}

/// Ceramic fiber blanket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlanketPolicy {
    pub thickness_in: f64,
}

impl Default for BlanketPolicy {
    fn default() -> Self {
        BlanketPolicy { thickness_in: 2.0 }
    }
}

/// Insulating firebrick (9" x 4.5" face) counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebrickPolicy {
    pub brick_face_area_in2: f64,
    pub min_floor_bricks: u32,
    pub single_door_bricks: u32,
    pub multi_door_bricks: u32,
}

impl Default for FirebrickPolicy {
    fn default() -> Self {
        FirebrickPolicy {
            brick_face_area_in2: 40.5,
            min_floor_bricks: 2,
            single_door_bricks: 4,
            multi_door_bricks: 6,
        }
    }
}

/// Cost estimate constants (USD).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostPolicy {
    /// Blower, steel and hardware baseline
    pub base_usd: f64,
    pub per_bag_usd: f64,
}

impl Default for CostPolicy {
    fn default() -> Self {
        CostPolicy {
            base_usd: 250.0,
            per_bag_usd: 110.0,
        }
    }
}

/// Opening size as fractions of the parent panel's lined opening.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningRatio {
    pub width: f64,
    pub height: f64,
}

/// Door opening ratios and hardware allowances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoorPolicy {
    pub front: OpeningRatio,
    pub rear: OpeningRatio,
    /// Width of the side-loading notch as a fraction of the lined width
    pub open_end_width_ratio: f64,
    /// Minimum steel left between any cutout and its panel edge (in)
    pub min_border_in: f64,
    /// Door frame is the opening plus this on each axis (in)
    pub frame_allowance_in: f64,
    /// Track rod length beyond the opening width (in)
    pub track_extension_in: f64,
}

impl Default for DoorPolicy {
    fn default() -> Self {
        DoorPolicy {
            front: OpeningRatio { width: 0.85, height: 0.85 },
            rear: OpeningRatio { width: 0.70, height: 0.75 },
            open_end_width_ratio: 0.85,
            min_border_in: 0.5,
            frame_allowance_in: 1.0,
            track_extension_in: 12.0,
        }
    }
}

/// Steel stock for the bolted body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FramePolicy {
    pub plate_thickness_in: f64,
    pub angle_stock: String,
    /// Rails are cut shorter than the panel edge by this amount (in)
    pub rail_deduction_in: f64,
    /// Fraction of internal length that heats evenly
    pub even_heat_fraction: f64,
}

impl Default for FramePolicy {
    fn default() -> Self {
        FramePolicy {
            plate_thickness_in: 0.25,
            angle_stock: "2\" x 2\" x 1/8\"".to_string(),
            rail_deduction_in: 4.0,
            even_heat_fraction: 0.6,
        }
    }
}

/// Page layout used by the diagram composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutPolicy {
    pub page: PageSize,
    pub page_margin_pt: f64,
    /// Share of the printable height one view may occupy
    pub view_height_fraction: f64,
    pub view_margin_pt: f64,
    pub title_block_height_pt: f64,
    /// Offset of the innermost dimension tier from the part edge
    pub dimension_offset_pt: f64,
    /// Distance between successive dimension tiers
    pub dimension_tier_spacing_pt: f64,
    pub label_font_pt: f64,
    /// Room reserved on a side that carries a leader label
    pub leader_band_pt: f64,
    pub drawing_title: String,
    pub drawing_prefix: String,
    pub revision: String,
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        LayoutPolicy {
            page: PageSize::LETTER,
            page_margin_pt: 36.0,
            view_height_fraction: 0.42,
            view_margin_pt: 12.0,
            title_block_height_pt: 30.0,
            dimension_offset_pt: 14.0,
            dimension_tier_spacing_pt: 16.0,
            label_font_pt: 7.0,
            leader_band_pt: 28.0,
            drawing_title: "RIBBON BURNER FORGE BODY".to_string(),
            drawing_prefix: "FW".to_string(),
            revision: "A".to_string(),
        }
    }
}

impl ForgeConfig {
    /// Reject inconsistent policies before any calculation uses them.
    pub fn validate(&self) -> ForgeResult<()> {
        self.check_fixed_constants()?;

        let ranges = [
            ("config.ranges.width_in", self.ranges.width_in),
            ("config.ranges.height_in", self.ranges.height_in),
            ("config.ranges.length_in", self.ranges.length_in),
            ("config.ranges.insulation_in", self.ranges.insulation_in),
            ("config.ranges.volume_ci", self.ranges.volume_ci),
        ];
        for (field, range) in ranges {
            if !(range.min > 0.0) || !(range.max >= range.min) || !range.max.is_finite() {
                return Err(ForgeError::validation(
                    field,
                    format!("{}..{}", range.min, range.max),
                    "Range bounds must be positive, finite and ordered",
                ));
            }
        }

        let positives = [
            ("config.burner.hole_pitch_in", self.burner.hole_pitch_in),
            ("config.burner.end_margin_in", self.burner.end_margin_in),
            ("config.burner.hole_diameter_in", self.burner.hole_diameter_in),
            ("config.burner.body_width_in", self.burner.body_width_in),
            ("config.burner.btu_per_ci", self.burner.btu_per_ci),
            ("config.blower.high_pressure_threshold_ci", self.blower.high_pressure_threshold_ci),
            ("config.refractory.density_lb_per_cf", self.refractory.density_lb_per_cf),
            ("config.blanket.thickness_in", self.blanket.thickness_in),
            ("config.firebrick.brick_face_area_in2", self.firebrick.brick_face_area_in2),
            ("config.doors.min_border_in", self.doors.min_border_in),
            ("config.frame.plate_thickness_in", self.frame.plate_thickness_in),
            ("config.layout.page.width_pt", self.layout.page.width_pt),
            ("config.layout.page.height_pt", self.layout.page.height_pt),
            ("config.layout.dimension_tier_spacing_pt", self.layout.dimension_tier_spacing_pt),
            ("config.layout.label_font_pt", self.layout.label_font_pt),
        ];
        for (field, value) in positives {
            if !(value > 0.0) || !value.is_finite() {
                return Err(ForgeError::validation(field, value.to_string(), "Must be a positive number"));
            }
        }

        if self.burner.rows == 0 {
            return Err(ForgeError::validation("config.burner.rows", "0", "At least one burner row is required"));
        }

        let fractions = [
            ("config.burner.port_offset_fraction", self.burner.port_offset_fraction),
            ("config.doors.front.width", self.doors.front.width),
            ("config.doors.front.height", self.doors.front.height),
            ("config.doors.rear.width", self.doors.rear.width),
            ("config.doors.rear.height", self.doors.rear.height),
            ("config.doors.open_end_width_ratio", self.doors.open_end_width_ratio),
            ("config.frame.even_heat_fraction", self.frame.even_heat_fraction),
            ("config.layout.view_height_fraction", self.layout.view_height_fraction),
        ];
        for (field, value) in fractions {
            if !(value > 0.0 && value < 1.0) {
                return Err(ForgeError::validation(field, value.to_string(), "Must be a fraction between 0 and 1"));
            }
        }

        Ok(())
    }

    /// Formula constants must keep their default values.
    fn check_fixed_constants(&self) -> ForgeResult<()> {
        let burner = BurnerPolicy::default();
        let blower = BlowerPolicy::default();
        let refractory = RefractoryPolicy::default();
        let cost = CostPolicy::default();
        let fixed = [
            ("config.burner.hole_coverage_ci", self.burner.hole_coverage_ci, burner.hole_coverage_ci),
            ("config.burner.min_holes", f64::from(self.burner.min_holes), f64::from(burner.min_holes)),
            ("config.blower.cfm_factor", self.blower.cfm_factor, blower.cfm_factor),
            ("config.blower.safety_margin", self.blower.safety_margin, blower.safety_margin),
            ("config.refractory.bag_weight_lb", self.refractory.bag_weight_lb, refractory.bag_weight_lb),
            ("config.cost.base_usd", self.cost.base_usd, cost.base_usd),
            ("config.cost.per_bag_usd", self.cost.per_bag_usd, cost.per_bag_usd),
        ];
        for (field, value, expected) in fixed {
            if value != expected {
                return Err(ForgeError::validation(
                    field,
                    value.to_string(),
                    format!("Fixed sizing constant; only {expected} is accepted"),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ForgeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.burner.min_holes, 12);
        assert_eq!(config.refractory.density_lb_per_cf, 92.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let json = r#"{ "ranges": { "length_in": { "min": 6.0, "max": 60.0 } }, "layout": { "revision": "C" } }"#;
        let config: ForgeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.ranges.length_in.max, 60.0);
        assert_eq!(config.ranges.width_in, ValueRange::new(3.0, 12.0));
        assert_eq!(config.layout.revision, "C");
        assert_eq!(config.layout.page, PageSize::LETTER);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ForgeConfig::default();
        config.ranges.width_in = ValueRange::new(12.0, 3.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ForgeError::Validation { ref field, .. } if field == "config.ranges.width_in"));

        let mut config = ForgeConfig::default();
        config.doors.front.width = 1.2;
        assert!(config.validate().is_err());

        let mut config = ForgeConfig::default();
        config.burner.rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_formula_constants_cannot_be_overridden() {
        let overrides = [
            (r#"{ "blower": { "safety_margin": 2.0 } }"#, "config.blower.safety_margin"),
            (r#"{ "blower": { "cfm_factor": 3.0 } }"#, "config.blower.cfm_factor"),
            (r#"{ "burner": { "min_holes": 6 } }"#, "config.burner.min_holes"),
            (r#"{ "burner": { "hole_coverage_ci": 9.0 } }"#, "config.burner.hole_coverage_ci"),
            (r#"{ "refractory": { "bag_weight_lb": 50.0 } }"#, "config.refractory.bag_weight_lb"),
            (r#"{ "cost": { "base_usd": 300.0 } }"#, "config.cost.base_usd"),
            (r#"{ "cost": { "per_bag_usd": 0.0 } }"#, "config.cost.per_bag_usd"),
        ];
        for (json, expected_field) in overrides {
            let config: ForgeConfig = serde_json::from_str(json).unwrap();
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, ForgeError::Validation { ref field, .. } if field == expected_field),
                "{json} gave {err:?}"
            );
        }

        // Restating a default is harmless
        let restated: ForgeConfig = serde_json::from_str(r#"{ "blower": { "safety_margin": 1.25 } }"#).unwrap();
        assert!(restated.validate().is_ok());
    }

    #[test]
    fn test_value_range_is_inclusive() {
        let range = ValueRange::new(3.0, 12.0);
        assert!(range.contains(3.0));
        assert!(range.contains(12.0));
        assert!(!range.contains(12.01));
        assert!(!range.contains(f64::NAN));
    }
}
