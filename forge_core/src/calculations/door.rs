//! # Door Configuration
//!
//! The forge has a sliding firebrick door on the front end, and optionally a
//! second door on the rear end or an open slot for long stock. The choice is a
//! closed enum; everything downstream matches on it exhaustively.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculations::geometry::ChamberGeometry;
use crate::config::{ForgeConfig, OpeningRatio};
use crate::errors::{ensure_positive, ForgeError, ForgeResult};

/// Which ends of the chamber are opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorConfiguration {
    /// Single sliding door on the front end
    #[default]
    FrontOnly,
    /// Sliding doors on both ends (pass-through)
    FrontAndRear,
    /// Front door plus an open notch in the rear end for long stock
    SideLoading,
}

impl DoorConfiguration {
    pub const ALL: [DoorConfiguration; 3] = [
        DoorConfiguration::FrontOnly,
        DoorConfiguration::FrontAndRear,
        DoorConfiguration::SideLoading,
    ];

    /// Number of sliding door assemblies to build
    pub fn door_count(self) -> u32 {
        match self {
            DoorConfiguration::FrontOnly => 1,
            DoorConfiguration::FrontAndRear => 2,
            DoorConfiguration::SideLoading => 1,
        }
    }

    /// Insulating firebricks needed for the door assemblies
    pub fn door_firebricks(self, config: &ForgeConfig) -> u32 {
        match self {
            DoorConfiguration::FrontOnly => config.firebrick.single_door_bricks,
            DoorConfiguration::FrontAndRear | DoorConfiguration::SideLoading => {
                config.firebrick.multi_door_bricks
            }
        }
    }

    /// True when the rear end panel is cut in any way
    pub fn opens_rear(self) -> bool {
        !matches!(self, DoorConfiguration::FrontOnly)
    }

    pub fn label(self) -> &'static str {
        match self {
            DoorConfiguration::FrontOnly => "Front door only",
            DoorConfiguration::FrontAndRear => "Front and rear doors",
            DoorConfiguration::SideLoading => "Front door with rear stock slot",
        }
    }
}

impl fmt::Display for DoorConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DoorConfiguration {
    type Err = ForgeError;

    /// Accepts the CLI spellings (`front`, `front-rear`, `side`) and the
    /// serialized names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "1" | "front" | "front_only" => Ok(DoorConfiguration::FrontOnly),
            "2" | "front_rear" | "front_and_rear" | "both" => Ok(DoorConfiguration::FrontAndRear),
            "3" | "side" | "side_loading" => Ok(DoorConfiguration::SideLoading),
            _ => Err(ForgeError::validation(
                "door_configuration",
                s,
                "Expected one of: front, front-rear, side",
            )),
        }
    }
}

/// Where an opening is cut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorLocation {
    Front,
    Rear,
    /// Open-topped notch in the rear end panel
    RearSlot,
}

impl DoorLocation {
    pub fn label(self) -> &'static str {
        match self {
            DoorLocation::Front => "Front door",
            DoorLocation::Rear => "Rear door",
            DoorLocation::RearSlot => "Rear stock slot",
        }
    }
}

/// One opening through an end panel, with its door hardware.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DoorOpening {
    pub location: DoorLocation,
    pub width_in: f64,
    /// For a slot, the depth from the top edge down to the lined floor
    pub height_in: f64,
    /// Welded angle frame around the door bricks (zero for a slot)
    pub frame_width_in: f64,
    pub frame_height_in: f64,
    /// Round rod track the door hangs from (zero for a slot)
    pub track_length_in: f64,
}

impl DoorOpening {
    /// True when a sliding door assembly is built for this opening
    pub fn has_door(&self) -> bool {
        !matches!(self.location, DoorLocation::RearSlot)
    }
}

fn sized_door(
    location: DoorLocation,
    ratio: OpeningRatio,
    geometry: &ChamberGeometry,
    config: &ForgeConfig,
) -> ForgeResult<DoorOpening> {
    // Lined opening of an end panel is the chamber cross-section
    let width_in = ensure_positive("door_width_in", geometry.internal_width_in * ratio.width)?;
    let height_in = ensure_positive("door_height_in", geometry.internal_height_in * ratio.height)?;
    Ok(DoorOpening {
        location,
        width_in,
        height_in,
        frame_width_in: width_in + config.doors.frame_allowance_in,
        frame_height_in: height_in + config.doors.frame_allowance_in,
        track_length_in: width_in + config.doors.track_extension_in,
    })
}

/// Size every opening the configuration calls for, front first.
pub fn door_openings(
    geometry: &ChamberGeometry,
    configuration: DoorConfiguration,
    config: &ForgeConfig,
) -> ForgeResult<Vec<DoorOpening>> {
    let front = sized_door(DoorLocation::Front, config.doors.front, geometry, config)?;

    let openings = match configuration {
        DoorConfiguration::FrontOnly => vec![front],
        DoorConfiguration::FrontAndRear => {
            let rear = sized_door(DoorLocation::Rear, config.doors.rear, geometry, config)?;
            vec![front, rear]
        }
        DoorConfiguration::SideLoading => {
            let width_in = ensure_positive(
                "rear_slot_width_in",
                geometry.internal_width_in * config.doors.open_end_width_ratio,
            )?;
            // Open at the top edge, down through the ceiling lining to the floor
            let height_in = ensure_positive(
                "rear_slot_depth_in",
                geometry.external_height_in - geometry.insulation_in,
            )?;
            let slot = DoorOpening {
                location: DoorLocation::RearSlot,
                width_in,
                height_in,
                frame_width_in: 0.0,
                frame_height_in: 0.0,
                track_length_in: 0.0,
            };
            vec![front, slot]
        }
    };

    Ok(openings)
}
