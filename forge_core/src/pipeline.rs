//! # Pipeline
//!
//! Runs every stage in order for one chamber input:
//!
//! ```text
//! ChamberInput ─resolve─> ChamberGeometry ─calculate─> Specification
//!                                                  │
//!                          compose ───> DiagramSet ┤
//!                                                  └─assemble─> Document
//! ```
//!
//! Each stage is pure, so identical inputs give identical packages. Layout
//! problems do not abort the run; they are listed in
//! [`DiagramSet::degraded`](crate::drawing::DiagramSet).
//!
//! ## Example
//!
//! ```rust
//! use forge_core::calculations::door::DoorConfiguration;
//! use forge_core::calculations::geometry::ChamberInput;
//! use forge_core::config::ForgeConfig;
//! use forge_core::pipeline::build;
//!
//! let input = ChamberInput {
//!     internal_width_in: 7.0,
//!     internal_height_in: 8.0,
//!     internal_length_in: 14.0,
//!     insulation_in: 2.0,
//!     door_configuration: DoorConfiguration::FrontOnly,
//! };
//! let package = build(&input, &ForgeConfig::default()).unwrap();
//! assert_eq!(package.specification.burner.hole_count, 44);
//! assert_eq!(package.document.sections.len(), 15);
//! ```

use tracing::instrument;

use crate::calculations::geometry::{self, ChamberGeometry, ChamberInput};
use crate::calculations::specification::{self, Specification};
use crate::config::ForgeConfig;
use crate::document::{self, Document};
use crate::drawing::{self, DiagramSet};
use crate::errors::ForgeResult;

/// Everything produced for one design, ready for a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPackage {
    pub geometry: ChamberGeometry,
    pub specification: Specification,
    pub diagrams: DiagramSet,
    pub document: Document,
}

/// Validate, calculate, draw and assemble.
///
/// # Errors
///
/// * `Validation` - bad input or configuration; nothing is calculated
/// * `Range` - a derived quantity came out non-positive
/// * `Drawing` - a view could not be generated at all
#[instrument(skip(config), level = "debug")]
pub fn build(input: &ChamberInput, config: &ForgeConfig) -> ForgeResult<BuildPackage> {
    config.validate()?;

    let geometry = geometry::resolve(input, config)?;
    let specification = specification::calculate(&geometry, input.door_configuration, config)?;
    let diagrams = drawing::compose(&geometry, &specification, config)?;
    let document = document::assemble(&specification, &diagrams, config);

    tracing::debug!(
        views = diagrams.views.len(),
        degraded = diagrams.degraded.len(),
        "build package ready"
    );

    Ok(BuildPackage {
        geometry,
        specification,
        diagrams,
        document,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::door::DoorConfiguration;
    use crate::drawing::ViewKind;
    use crate::errors::ForgeError;

    fn input(door_configuration: DoorConfiguration) -> ChamberInput {
        ChamberInput {
            internal_width_in: 7.0,
            internal_height_in: 8.0,
            internal_length_in: 14.0,
            insulation_in: 2.0,
            door_configuration,
        }
    }

    #[test]
    fn test_build_reference_design() {
        crate::logging::init_test();
        let package = build(&input(DoorConfiguration::FrontOnly), &ForgeConfig::default()).unwrap();
        assert_eq!(package.geometry.volume_ci, 784.0);
        assert_eq!(package.diagrams.views.len(), 3);
        assert!(package.diagrams.degraded.is_empty());
        assert_eq!(package.document.diagrams().count(), 3);
    }

    #[test]
    fn test_rear_view_follows_configuration() {
        let config = ForgeConfig::default();
        for (doors, expect_rear) in [
            (DoorConfiguration::FrontOnly, false),
            (DoorConfiguration::FrontAndRear, true),
            (DoorConfiguration::SideLoading, true),
        ] {
            let package = build(&input(doors), &config).unwrap();
            assert_eq!(package.diagrams.view(ViewKind::Rear).is_some(), expect_rear, "{doors:?}");
        }
    }

    #[test]
    fn test_invalid_config_stops_before_calculation() {
        let mut config = ForgeConfig::default();
        config.burner.rows = 0;
        let err = build(&input(DoorConfiguration::FrontOnly), &config).unwrap_err();
        assert!(matches!(err, ForgeError::Validation { ref field, .. } if field == "config.burner.rows"));
    }
}
