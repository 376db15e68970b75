//! # Forge Specification
//!
//! Every derived quantity of a forge design, computed once from the resolved
//! geometry and door configuration. The drawings and the build guide read
//! their numbers from here through [`Specification::value`], so a quantity
//! can never disagree between a table, a paragraph and a dimension label.
//!
//! ## Formula order
//!
//! 1. Burner holes, rows and casting length
//! 2. Airflow (required and recommended CFM, static pressure class)
//! 3. Refractory shell volume, weight and bag count
//! 4. Ceramic blanket area
//! 5. Estimated cost
//! 6. Supplementary fields (heat input, firebricks, doors, frame)
//!
//! ## Example
//!
//! ```rust
//! use forge_core::calculations::geometry::{resolve, ChamberInput};
//! use forge_core::calculations::door::DoorConfiguration;
//! use forge_core::calculations::specification::{calculate, SpecField};
//! use forge_core::config::ForgeConfig;
//!
//! let config = ForgeConfig::default();
//! let input = ChamberInput {
//!     internal_width_in: 7.0,
//!     internal_height_in: 8.0,
//!     internal_length_in: 14.0,
//!     insulation_in: 2.0,
//!     door_configuration: DoorConfiguration::FrontOnly,
//! };
//! let geometry = resolve(&input, &config).unwrap();
//! let spec = calculate(&geometry, input.door_configuration, &config).unwrap();
//!
//! assert_eq!(spec.burner.hole_count, 44);
//! assert_eq!(spec.value(SpecField::StaticPressure).to_string(), "3.0 in WC");
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::burner::{self, BurnerDesign};
use crate::calculations::cut_list::{self, CutList};
use crate::calculations::door::{door_openings, DoorConfiguration, DoorOpening};
use crate::calculations::geometry::ChamberGeometry;
use crate::config::ForgeConfig;
use crate::errors::{ensure_positive, ForgeResult};
use crate::units::{
    format_inches, trim_decimals, CubicFeet, CubicInches, SquareFeet, SquareInches,
};

// ============================================================================
// Result Types
// ============================================================================

/// Blower static pressure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StaticPressure {
    /// 1.5 in WC, small chambers
    Low,
    /// 3.0 in WC
    High,
}

impl StaticPressure {
    pub fn inches_wc(self) -> f64 {
        match self {
            StaticPressure::Low => 1.5,
            StaticPressure::High => 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Airflow {
    pub required_cfm: f64,
    pub recommended_cfm: f64,
    pub static_pressure: StaticPressure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Refractory {
    pub product: String,
    pub shell_volume_ci: f64,
    pub shell_volume_cf: f64,
    pub weight_lb: f64,
    pub bags: u32,
    pub bag_weight_lb: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blanket {
    pub area_sqft: f64,
    pub thickness_in: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Firebricks {
    pub floor: u32,
    pub doors: u32,
}

impl Firebricks {
    pub fn total(&self) -> u32 {
        self.floor + self.doors
    }
}

/// Complete derived design. Never mutated after [`calculate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Specification {
    pub geometry: ChamberGeometry,
    pub door_configuration: DoorConfiguration,
    pub burner: BurnerDesign,
    pub airflow: Airflow,
    pub refractory: Refractory,
    pub blanket: Blanket,
    pub firebricks: Firebricks,
    /// Front opening first, then the rear door or slot if any
    pub doors: Vec<DoorOpening>,
    pub heat_input_btu_hr: f64,
    pub even_heat_zone_in: f64,
    pub estimated_cost_usd: f64,
    pub cut_list: CutList,
}

// ============================================================================
// Calculation
// ============================================================================

/// Number of bags needed for `weight_lb` of refractory.
///
/// Exact multiples of the bag weight do not round up: 110 lb is 2 bags.
pub fn bags_for_weight(weight_lb: f64, bag_weight_lb: f64) -> ForgeResult<u32> {
    ensure_positive("refractory_weight_lb", weight_lb)?;
    ensure_positive("bag_weight_lb", bag_weight_lb)?;
    Ok((weight_lb / bag_weight_lb).ceil() as u32)
}

/// Derive the complete specification.
///
/// # Errors
///
/// `ForgeError::Range` naming the first derived field that is not a positive
/// finite number.
pub fn calculate(
    geometry: &ChamberGeometry,
    door_configuration: DoorConfiguration,
    config: &ForgeConfig,
) -> ForgeResult<Specification> {
    let volume = ensure_positive("volume_ci", geometry.volume_ci)?;

    // 1. Burner
    let burner = burner::design(volume, &config.burner)?;

    // 2. Airflow
    let required_cfm = ensure_positive(
        "required_cfm",
        volume / config.burner.hole_coverage_ci * config.blower.cfm_factor,
    )?;
    let recommended_cfm = ensure_positive("recommended_cfm", required_cfm * config.blower.safety_margin)?;
    let static_pressure = if volume < config.blower.high_pressure_threshold_ci {
        StaticPressure::Low
    } else {
        StaticPressure::High
    };

    // 3. Refractory shell
    let shell_volume_ci = ensure_positive("refractory_volume_ci", geometry.external_volume_ci() - volume)?;
    let shell_volume_cf = CubicFeet::from(CubicInches(shell_volume_ci)).0;
    let weight_lb = ensure_positive(
        "refractory_weight_lb",
        shell_volume_cf * config.refractory.density_lb_per_cf,
    )?;
    let bags = bags_for_weight(weight_lb, config.refractory.bag_weight_lb)?;

    // 4. Blanket: side walls, ceiling and end walls; the floor is brick
    let w = geometry.internal_width_in;
    let h = geometry.internal_height_in;
    let l = geometry.internal_length_in;
    let blanket_in2 = 2.0 * l * h + w * l + 2.0 * w * h;
    let area_sqft = ensure_positive("blanket_area_sqft", SquareFeet::from(SquareInches(blanket_in2)).0)?;

    // 5. Cost
    let estimated_cost_usd = ensure_positive(
        "estimated_cost_usd",
        config.cost.base_usd + bags as f64 * config.cost.per_bag_usd,
    )?;

    // 6. Supplementary
    let heat_input_btu_hr = ensure_positive("heat_input_btu_hr", volume * config.burner.btu_per_ci)?;
    let floor_bricks = ((geometry.floor_area_in2() / config.firebrick.brick_face_area_in2).ceil() as u32)
        .max(config.firebrick.min_floor_bricks);
    let firebricks = Firebricks {
        floor: floor_bricks,
        doors: door_configuration.door_firebricks(config),
    };
    let even_heat_zone_in = ensure_positive("even_heat_zone_in", l * config.frame.even_heat_fraction)?;
    let doors = door_openings(geometry, door_configuration, config)?;
    let cut_list = cut_list::build(geometry, door_configuration, &burner, config)?;

    tracing::debug!(
        holes = burner.hole_count,
        required_cfm,
        bags,
        estimated_cost_usd,
        "calculated specification"
    );

    Ok(Specification {
        geometry: *geometry,
        door_configuration,
        burner,
        airflow: Airflow {
            required_cfm,
            recommended_cfm,
            static_pressure,
        },
        refractory: Refractory {
            product: config.refractory.product.clone(),
            shell_volume_ci,
            shell_volume_cf,
            weight_lb,
            bags,
            bag_weight_lb: config.refractory.bag_weight_lb,
        },
        blanket: Blanket {
            area_sqft,
            thickness_in: config.blanket.thickness_in,
        },
        firebricks,
        doors,
        heat_input_btu_hr,
        even_heat_zone_in,
        estimated_cost_usd,
        cut_list,
    })
}

// ============================================================================
// Field Access
// ============================================================================

/// Display unit of a measured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    Inches,
    CubicInches,
    CubicFeet,
    SquareFeet,
    Pounds,
    Cfm,
    InchesWaterColumn,
    BtuPerHour,
    Usd,
}

/// A quantity taken from the specification, formatted consistently wherever
/// it is shown.
///
/// Only the calculation layer constructs these, always from a stored field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Measure { value: f64, unit: Unit },
    Count(u32),
    Text(String),
}

impl FieldValue {
    pub(crate) fn length(inches: f64) -> Self {
        FieldValue::Measure { value: inches, unit: Unit::Inches }
    }

    pub(crate) fn measure(value: f64, unit: Unit) -> Self {
        FieldValue::Measure { value, unit }
    }

    /// Raw JSON value for export (numbers unrounded)
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FieldValue::Measure { value, .. } => serde_json::json!(value),
            FieldValue::Count(n) => serde_json::json!(n),
            FieldValue::Text(text) => serde_json::Value::String(text.clone()),
        }
    }

    /// The bare number without unit text (`65.3`, `44`)
    pub fn number(&self) -> String {
        match self {
            FieldValue::Measure { value, unit } => match unit {
                Unit::Inches => trim_decimals(*value, 2),
                Unit::CubicInches | Unit::BtuPerHour | Unit::Usd => format!("{value:.0}"),
                Unit::CubicFeet => format!("{value:.2}"),
                Unit::InchesWaterColumn => format!("{value:.1}"),
                Unit::SquareFeet | Unit::Pounds | Unit::Cfm => trim_decimals(*value, 1),
            },
            FieldValue::Count(n) => n.to_string(),
            FieldValue::Text(text) => text.clone(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Measure { value, unit } => match unit {
                Unit::Inches => f.write_str(&format_inches(*value)),
                Unit::CubicInches => write!(f, "{} cu in", self.number()),
                Unit::CubicFeet => write!(f, "{} cu ft", self.number()),
                Unit::SquareFeet => write!(f, "{} sq ft", self.number()),
                Unit::Pounds => write!(f, "{} lb", self.number()),
                Unit::Cfm => write!(f, "{} CFM", self.number()),
                Unit::InchesWaterColumn => write!(f, "{} in WC", self.number()),
                Unit::BtuPerHour => write!(f, "{} BTU/hr", self.number()),
                Unit::Usd => write!(f, "${}", self.number()),
            },
            FieldValue::Count(n) => write!(f, "{n}"),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

/// Named scalar fields of a [`Specification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpecField {
    InternalWidth,
    InternalHeight,
    InternalLength,
    Insulation,
    ExternalWidth,
    ExternalHeight,
    ExternalLength,
    Volume,
    DoorConfiguration,
    BurnerHoles,
    BurnerRows,
    HolesPerRow,
    HoleDiameter,
    BurnerLength,
    HousingLength,
    BurnerWidth,
    BurnerPortLength,
    BurnerPortWidth,
    /// Port centre measured from the front of the shell
    BurnerPortOffset,
    RequiredCfm,
    RecommendedCfm,
    StaticPressure,
    RefractoryProduct,
    RefractoryVolume,
    RefractoryWeight,
    RefractoryBags,
    BagWeight,
    BlanketArea,
    BlanketThickness,
    FloorFirebricks,
    DoorFirebricks,
    TotalFirebricks,
    DoorAssemblies,
    FrontDoorWidth,
    FrontDoorHeight,
    HeatInput,
    EvenHeatZone,
    AngleIronTotal,
    PlateCount,
    PlateThickness,
    EstimatedCost,
}

impl SpecField {
    pub const ALL: [SpecField; 41] = [
        SpecField::InternalWidth,
        SpecField::InternalHeight,
        SpecField::InternalLength,
        SpecField::Insulation,
        SpecField::ExternalWidth,
        SpecField::ExternalHeight,
        SpecField::ExternalLength,
        SpecField::Volume,
        SpecField::DoorConfiguration,
        SpecField::BurnerHoles,
        SpecField::BurnerRows,
        SpecField::HolesPerRow,
        SpecField::HoleDiameter,
        SpecField::BurnerLength,
        SpecField::HousingLength,
        SpecField::BurnerWidth,
        SpecField::BurnerPortLength,
        SpecField::BurnerPortWidth,
        SpecField::BurnerPortOffset,
        SpecField::RequiredCfm,
        SpecField::RecommendedCfm,
        SpecField::StaticPressure,
        SpecField::RefractoryProduct,
        SpecField::RefractoryVolume,
        SpecField::RefractoryWeight,
        SpecField::RefractoryBags,
        SpecField::BagWeight,
        SpecField::BlanketArea,
        SpecField::BlanketThickness,
        SpecField::FloorFirebricks,
        SpecField::DoorFirebricks,
        SpecField::TotalFirebricks,
        SpecField::DoorAssemblies,
        SpecField::FrontDoorWidth,
        SpecField::FrontDoorHeight,
        SpecField::HeatInput,
        SpecField::EvenHeatZone,
        SpecField::AngleIronTotal,
        SpecField::PlateCount,
        SpecField::PlateThickness,
        SpecField::EstimatedCost,
    ];

    /// Stable export key
    pub fn key(self) -> &'static str {
        match self {
            SpecField::InternalWidth => "internal_width_in",
            SpecField::InternalHeight => "internal_height_in",
            SpecField::InternalLength => "internal_length_in",
            SpecField::Insulation => "insulation_in",
            SpecField::ExternalWidth => "external_width_in",
            SpecField::ExternalHeight => "external_height_in",
            SpecField::ExternalLength => "external_length_in",
            SpecField::Volume => "volume_ci",
            SpecField::DoorConfiguration => "door_configuration",
            SpecField::BurnerHoles => "burner_holes",
            SpecField::BurnerRows => "burner_rows",
            SpecField::HolesPerRow => "holes_per_row",
            SpecField::HoleDiameter => "hole_diameter_in",
            SpecField::BurnerLength => "burner_length_in",
            SpecField::HousingLength => "housing_length_in",
            SpecField::BurnerWidth => "burner_width_in",
            SpecField::BurnerPortLength => "burner_port_length_in",
            SpecField::BurnerPortWidth => "burner_port_width_in",
            SpecField::BurnerPortOffset => "burner_port_offset_in",
            SpecField::RequiredCfm => "required_cfm",
            SpecField::RecommendedCfm => "recommended_cfm",
            SpecField::StaticPressure => "static_pressure_in_wc",
            SpecField::RefractoryProduct => "refractory_product",
            SpecField::RefractoryVolume => "refractory_volume_cf",
            SpecField::RefractoryWeight => "refractory_weight_lb",
            SpecField::RefractoryBags => "refractory_bags",
            SpecField::BagWeight => "bag_weight_lb",
            SpecField::BlanketArea => "blanket_area_sqft",
            SpecField::BlanketThickness => "blanket_thickness_in",
            SpecField::FloorFirebricks => "floor_firebricks",
            SpecField::DoorFirebricks => "door_firebricks",
            SpecField::TotalFirebricks => "total_firebricks",
            SpecField::DoorAssemblies => "door_assemblies",
            SpecField::FrontDoorWidth => "front_door_width_in",
            SpecField::FrontDoorHeight => "front_door_height_in",
            SpecField::HeatInput => "heat_input_btu_hr",
            SpecField::EvenHeatZone => "even_heat_zone_in",
            SpecField::AngleIronTotal => "angle_iron_total_in",
            SpecField::PlateCount => "plate_count",
            SpecField::PlateThickness => "plate_thickness_in",
            SpecField::EstimatedCost => "estimated_cost_usd",
        }
    }
}

impl Specification {
    /// The front door is always present
    fn front_door(&self) -> Option<&DoorOpening> {
        self.doors.first()
    }

    /// Read one scalar field.
    pub fn value(&self, field: SpecField) -> FieldValue {
        let g = &self.geometry;
        match field {
            SpecField::InternalWidth => FieldValue::length(g.internal_width_in),
            SpecField::InternalHeight => FieldValue::length(g.internal_height_in),
            SpecField::InternalLength => FieldValue::length(g.internal_length_in),
            SpecField::Insulation => FieldValue::length(g.insulation_in),
            SpecField::ExternalWidth => FieldValue::length(g.external_width_in),
            SpecField::ExternalHeight => FieldValue::length(g.external_height_in),
            SpecField::ExternalLength => FieldValue::length(g.external_length_in),
            SpecField::Volume => FieldValue::measure(g.volume_ci, Unit::CubicInches),
            SpecField::DoorConfiguration => FieldValue::Text(self.door_configuration.label().to_string()),
            SpecField::BurnerHoles => FieldValue::Count(self.burner.hole_count),
            SpecField::BurnerRows => FieldValue::Count(self.burner.row_count()),
            SpecField::HolesPerRow => FieldValue::Count(self.burner.holes_per_row),
            SpecField::HoleDiameter => FieldValue::length(self.burner.hole_diameter_in),
            SpecField::BurnerLength => FieldValue::length(self.burner.length_in),
            SpecField::HousingLength => FieldValue::length(self.burner.housing_length_in),
            SpecField::BurnerWidth => FieldValue::length(self.burner.body_width_in),
            SpecField::BurnerPortLength => FieldValue::length(self.burner.port_length_in),
            SpecField::BurnerPortWidth => FieldValue::length(self.burner.port_width_in),
            SpecField::BurnerPortOffset => {
                FieldValue::length(self.cut_list.burner_port().map_or(0.0, |port| port.center_x_in()))
            }
            SpecField::RequiredCfm => FieldValue::measure(self.airflow.required_cfm, Unit::Cfm),
            SpecField::RecommendedCfm => FieldValue::measure(self.airflow.recommended_cfm, Unit::Cfm),
            SpecField::StaticPressure => {
                FieldValue::measure(self.airflow.static_pressure.inches_wc(), Unit::InchesWaterColumn)
            }
            SpecField::RefractoryProduct => FieldValue::Text(self.refractory.product.clone()),
            SpecField::RefractoryVolume => FieldValue::measure(self.refractory.shell_volume_cf, Unit::CubicFeet),
            SpecField::RefractoryWeight => FieldValue::measure(self.refractory.weight_lb, Unit::Pounds),
            SpecField::RefractoryBags => FieldValue::Count(self.refractory.bags),
            SpecField::BagWeight => FieldValue::measure(self.refractory.bag_weight_lb, Unit::Pounds),
            SpecField::BlanketArea => FieldValue::measure(self.blanket.area_sqft, Unit::SquareFeet),
            SpecField::BlanketThickness => FieldValue::length(self.blanket.thickness_in),
            SpecField::FloorFirebricks => FieldValue::Count(self.firebricks.floor),
            SpecField::DoorFirebricks => FieldValue::Count(self.firebricks.doors),
            SpecField::TotalFirebricks => FieldValue::Count(self.firebricks.total()),
            SpecField::DoorAssemblies => FieldValue::Count(self.door_configuration.door_count()),
            SpecField::FrontDoorWidth => FieldValue::length(self.front_door().map_or(0.0, |d| d.width_in)),
            SpecField::FrontDoorHeight => FieldValue::length(self.front_door().map_or(0.0, |d| d.height_in)),
            SpecField::HeatInput => FieldValue::measure(self.heat_input_btu_hr, Unit::BtuPerHour),
            SpecField::EvenHeatZone => FieldValue::length(self.even_heat_zone_in),
            SpecField::AngleIronTotal => FieldValue::length(self.cut_list.frame_total_length_in()),
            SpecField::PlateCount => FieldValue::Count(self.cut_list.plate_count()),
            SpecField::PlateThickness => FieldValue::length(self.cut_list.plate_thickness_in()),
            SpecField::EstimatedCost => FieldValue::measure(self.estimated_cost_usd, Unit::Usd),
        }
    }

    /// Flat key/value map of every scalar field, for JSON export.
    pub fn export_map(&self) -> BTreeMap<String, serde_json::Value> {
        SpecField::ALL
            .iter()
            .map(|field| (field.key().to_string(), self.value(*field).to_json()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::geometry::{resolve, ChamberInput};

    fn spec_for(w: f64, h: f64, l: f64, ins: f64, doors: DoorConfiguration) -> Specification {
        let config = ForgeConfig::default();
        let input = ChamberInput {
            internal_width_in: w,
            internal_height_in: h,
            internal_length_in: l,
            insulation_in: ins,
            door_configuration: doors,
        };
        let geometry = resolve(&input, &config).unwrap();
        calculate(&geometry, doors, &config).unwrap()
    }

    #[test]
    fn test_reference_chamber() {
        let spec = spec_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly);
        assert_eq!(spec.burner.hole_count, 44);
        assert!((spec.airflow.required_cfm - 65.333_333).abs() < 1e-4);
        assert!((spec.airflow.recommended_cfm - spec.airflow.required_cfm * 1.25).abs() < 1e-9);
        assert_eq!(spec.airflow.static_pressure, StaticPressure::High);

        // 11 x 12 x 18 - 784 = 1592 ci
        assert!((spec.refractory.shell_volume_ci - 1592.0).abs() < 1e-9);
        assert!((spec.refractory.weight_lb - 1592.0 / 1728.0 * 92.0).abs() < 1e-9);
        assert_eq!(spec.refractory.bags, 2);
        assert_eq!(spec.estimated_cost_usd, 470.0);

        // 2*14*8 + 7*14 + 2*7*8 = 434 sq in
        assert!((spec.blanket.area_sqft - 434.0 / 144.0).abs() < 1e-9);
        assert_eq!(spec.heat_input_btu_hr, 352_800.0);
        assert_eq!(spec.firebricks, Firebricks { floor: 3, doors: 4 });
        assert!((spec.even_heat_zone_in - 8.4).abs() < 1e-9);
    }

    #[test]
    fn test_static_pressure_boundary() {
        // 5 x 5 x 20 = 500 exactly
        let at = spec_for(5.0, 5.0, 20.0, 1.0, DoorConfiguration::FrontOnly);
        assert_eq!(at.airflow.static_pressure, StaticPressure::High);
        // 5 x 5 x 19 = 475
        let below = spec_for(5.0, 5.0, 19.0, 1.0, DoorConfiguration::FrontOnly);
        assert_eq!(below.airflow.static_pressure, StaticPressure::Low);
    }

    #[test]
    fn test_bags_round_up() {
        assert_eq!(bags_for_weight(110.0, 55.0).unwrap(), 2);
        assert_eq!(bags_for_weight(110.01, 55.0).unwrap(), 3);
        assert_eq!(bags_for_weight(1.0, 55.0).unwrap(), 1);
        assert!(bags_for_weight(0.0, 55.0).is_err());
    }

    #[test]
    fn test_field_values_format() {
        let spec = spec_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly);
        assert_eq!(spec.value(SpecField::ExternalWidth).to_string(), "11\"");
        assert_eq!(spec.value(SpecField::RequiredCfm).to_string(), "65.3 CFM");
        assert_eq!(spec.value(SpecField::StaticPressure).to_string(), "3.0 in WC");
        assert_eq!(spec.value(SpecField::EstimatedCost).to_string(), "$470");
        assert_eq!(spec.value(SpecField::BurnerHoles).to_string(), "44");
        assert_eq!(spec.value(SpecField::FrontDoorWidth).to_string(), "5.95\"");
        assert_eq!(spec.value(SpecField::Volume).number(), "784");
    }

    #[test]
    fn test_export_map_covers_every_field() {
        let spec = spec_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontAndRear);
        let map = spec.export_map();
        assert_eq!(map.len(), SpecField::ALL.len());
        assert_eq!(map["burner_holes"], serde_json::json!(44));
        assert_eq!(map["static_pressure_in_wc"], serde_json::json!(3.0));
        assert_eq!(map["door_assemblies"], serde_json::json!(2));
        assert_eq!(map["door_firebricks"], serde_json::json!(6));
        assert_eq!(map["burner_port_length_in"], serde_json::json!(13.25));
        assert_eq!(map["burner_port_width_in"], serde_json::json!(3.5));
    }

    #[test]
    fn test_port_and_plate_fields_follow_the_cut_list() {
        let spec = spec_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly);
        let port = spec.cut_list.burner_port().unwrap();

        assert_eq!(spec.value(SpecField::BurnerPortOffset), FieldValue::length(port.center_x_in()));
        assert_eq!(spec.value(SpecField::BurnerPortOffset), FieldValue::length(8.625));
        assert_eq!(spec.value(SpecField::PlateThickness).to_string(), "0.25\"");

        let mut config = ForgeConfig::default();
        config.frame.plate_thickness_in = 0.1875;
        let input = ChamberInput {
            internal_width_in: 7.0,
            internal_height_in: 8.0,
            internal_length_in: 14.0,
            insulation_in: 2.0,
            door_configuration: DoorConfiguration::FrontOnly,
        };
        let geometry = resolve(&input, &config).unwrap();
        let thin = calculate(&geometry, input.door_configuration, &config).unwrap();
        assert_eq!(thin.value(SpecField::PlateThickness), FieldValue::length(0.1875));
    }

    #[test]
    fn test_calculation_is_deterministic() {
        let a = spec_for(9.5, 6.25, 24.0, 2.5, DoorConfiguration::SideLoading);
        let b = spec_for(9.5, 6.25, 24.0, 2.5, DoorConfiguration::SideLoading);
        assert_eq!(a, b);
    }
}
