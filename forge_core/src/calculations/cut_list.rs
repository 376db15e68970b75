//! # Steel Cut List
//!
//! Builds the plate panels of the bolted forge body and the angle-iron frame
//! members that join them. Panels carry their cutouts (door openings, burner
//! port) in panel coordinates: origin at the lower-left corner, `x` along the
//! panel width, `y` along its height.
//!
//! Panel orientation:
//!
//! | Panel     | width           | height          |
//! |-----------|-----------------|-----------------|
//! | Bottom    | external length | external width  |
//! | Top       | external length | external width  |
//! | Side (x2) | external length | external height |
//! | Front end | external width  | external height |
//! | Rear end  | external width  | external height |
//!
//! On the top panel `x = 0` is the front end.

use serde::{Deserialize, Serialize};

use crate::calculations::burner::BurnerDesign;
use crate::calculations::door::{door_openings, DoorConfiguration, DoorLocation, DoorOpening};
use crate::calculations::geometry::ChamberGeometry;
use crate::config::ForgeConfig;
use crate::errors::{ensure_positive, ForgeError, ForgeResult};
use crate::units::format_inches;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanelRole {
    Bottom,
    Top,
    Side,
    FrontEnd,
    RearEnd,
}

impl PanelRole {
    pub fn name(self) -> &'static str {
        match self {
            PanelRole::Bottom => "Bottom",
            PanelRole::Top => "Top",
            PanelRole::Side => "Side",
            PanelRole::FrontEnd => "Front end",
            PanelRole::RearEnd => "Rear end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CutoutPurpose {
    FrontDoor,
    RearDoor,
    BurnerPort,
}

impl CutoutPurpose {
    pub fn label(self) -> &'static str {
        match self {
            CutoutPurpose::FrontDoor => "door opening",
            CutoutPurpose::RearDoor => "rear door opening",
            CutoutPurpose::BurnerPort => "burner port",
        }
    }
}

/// Axis-aligned rectangular hole through a panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cutout {
    pub purpose: CutoutPurpose,
    /// Lower-left corner
    pub x_in: f64,
    pub y_in: f64,
    pub width_in: f64,
    pub height_in: f64,
}

impl Cutout {
    pub fn right_in(&self) -> f64 {
        self.x_in + self.width_in
    }

    pub fn top_in(&self) -> f64 {
        self.y_in + self.height_in
    }

    pub fn center_x_in(&self) -> f64 {
        self.x_in + self.width_in / 2.0
    }

    /// True when the interiors intersect; shared edges do not count.
    pub fn overlaps(&self, other: &Cutout) -> bool {
        self.x_in < other.right_in()
            && other.x_in < self.right_in()
            && self.y_in < other.top_in()
            && other.y_in < self.top_in()
    }

    /// Smallest distance from the cutout to any panel edge
    pub fn border_in(&self, panel_width_in: f64, panel_height_in: f64) -> f64 {
        self.x_in
            .min(self.y_in)
            .min(panel_width_in - self.right_in())
            .min(panel_height_in - self.top_in())
    }
}

/// Notch open at the panel's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeNotch {
    /// Left edge of the notch
    pub x_in: f64,
    pub width_in: f64,
    /// Distance from the top edge down to the notch floor
    pub depth_in: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum PanelProfile {
    /// Full rectangle, possibly with interior cutouts
    Closed { cutouts: Vec<Cutout> },
    /// Rectangle with a notch cut in from the top edge
    OpenEdge { notch: EdgeNotch },
}

/// One plate entry on the cut list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub role: PanelRole,
    pub quantity: u32,
    pub width_in: f64,
    pub height_in: f64,
    pub thickness_in: f64,
    pub profile: PanelProfile,
}

impl Panel {
    fn closed(role: PanelRole, quantity: u32, width_in: f64, height_in: f64, config: &ForgeConfig) -> Self {
        Panel {
            role,
            quantity,
            width_in,
            height_in,
            thickness_in: config.frame.plate_thickness_in,
            profile: PanelProfile::Closed { cutouts: Vec::new() },
        }
    }

    fn with_cutout(mut self, cutout: Cutout) -> Self {
        if let PanelProfile::Closed { cutouts } = &mut self.profile {
            cutouts.push(cutout);
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.role.name()
    }

    /// Interior cutouts (empty for an open-edge panel)
    pub fn cutouts(&self) -> &[Cutout] {
        match &self.profile {
            PanelProfile::Closed { cutouts } => cutouts,
            PanelProfile::OpenEdge { .. } => &[],
        }
    }

    /// Cut-list note describing what is cut out of the plate
    pub fn note(&self) -> String {
        match &self.profile {
            PanelProfile::Closed { cutouts } if cutouts.is_empty() => "Plain".to_string(),
            PanelProfile::Closed { cutouts } => cutouts
                .iter()
                .map(|c| format!("{} x {} {}", format_inches(c.width_in), format_inches(c.height_in), c.purpose.label()))
                .collect::<Vec<_>>()
                .join("; "),
            PanelProfile::OpenEdge { notch } => format!(
                "{} x {} slot open at top edge",
                format_inches(notch.width_in),
                format_inches(notch.depth_in)
            ),
        }
    }

    /// Check borders and overlaps. Never adjusts the geometry.
    pub fn validate(&self, min_border_in: f64) -> ForgeResult<()> {
        ensure_positive(&format!("{}.width_in", self.field_prefix()), self.width_in)?;
        ensure_positive(&format!("{}.height_in", self.field_prefix()), self.height_in)?;

        match &self.profile {
            PanelProfile::Closed { cutouts } => {
                for (i, cutout) in cutouts.iter().enumerate() {
                    let field = format!("{}.{}", self.field_prefix(), cutout.purpose.label().replace(' ', "_"));
                    ensure_positive(&format!("{field}.width_in"), cutout.width_in)?;
                    ensure_positive(&format!("{field}.height_in"), cutout.height_in)?;
                    let border = cutout.border_in(self.width_in, self.height_in);
                    if border < min_border_in {
                        return Err(ForgeError::range(
                            field,
                            format!("{border:.3}"),
                            format!("Cutout leaves less than {} of steel at the panel edge", format_inches(min_border_in)),
                        ));
                    }
                    if let Some(other) = cutouts[i + 1..].iter().find(|o| cutout.overlaps(o)) {
                        return Err(ForgeError::range(
                            field,
                            other.purpose.label(),
                            "Cutouts overlap",
                        ));
                    }
                }
            }
            PanelProfile::OpenEdge { notch } => {
                let field = format!("{}.slot", self.field_prefix());
                ensure_positive(&format!("{field}.width_in"), notch.width_in)?;
                ensure_positive(&format!("{field}.depth_in"), notch.depth_in)?;
                let border = notch
                    .x_in
                    .min(self.width_in - notch.x_in - notch.width_in)
                    .min(self.height_in - notch.depth_in);
                if border < min_border_in {
                    return Err(ForgeError::range(
                        field,
                        format!("{border:.3}"),
                        format!("Slot leaves less than {} of steel at the panel edge", format_inches(min_border_in)),
                    ));
                }
            }
        }
        Ok(())
    }

    fn field_prefix(&self) -> String {
        self.role.name().to_ascii_lowercase().replace(' ', "_")
    }
}

/// Angle-iron frame member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameMember {
    pub name: String,
    pub quantity: u32,
    pub length_in: f64,
    pub stock: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutList {
    pub panels: Vec<Panel>,
    pub frame_members: Vec<FrameMember>,
}

impl CutList {
    pub fn panel(&self, role: PanelRole) -> Option<&Panel> {
        self.panels.iter().find(|p| p.role == role)
    }

    /// Total angle iron to buy, in inches
    pub fn frame_total_length_in(&self) -> f64 {
        self.frame_members.iter().map(|m| m.quantity as f64 * m.length_in).sum()
    }

    /// The burner port in the top panel
    pub fn burner_port(&self) -> Option<&Cutout> {
        self.panel(PanelRole::Top)?
            .cutouts()
            .iter()
            .find(|c| c.purpose == CutoutPurpose::BurnerPort)
    }

    /// Plate stock thickness; every panel is cut from the same sheet
    pub fn plate_thickness_in(&self) -> f64 {
        self.panels.first().map_or(0.0, |p| p.thickness_in)
    }

    /// Plate pieces to cut, counting quantities
    pub fn plate_count(&self) -> u32 {
        self.panels.iter().map(|p| p.quantity).sum()
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Door cutout centered in the lined opening of an end panel
fn end_door_cutout(purpose: CutoutPurpose, opening: &DoorOpening, geometry: &ChamberGeometry) -> Cutout {
    let ins = geometry.insulation_in;
    Cutout {
        purpose,
        x_in: ins + (geometry.internal_width_in - opening.width_in) / 2.0,
        y_in: ins + (geometry.internal_height_in - opening.height_in) / 2.0,
        width_in: opening.width_in,
        height_in: opening.height_in,
    }
}

/// Port centered across the top panel. Along the length it sits at the
/// configured fraction of the cavity, moved toward the middle just far enough
/// to open entirely onto the ceiling.
fn burner_port_cutout(geometry: &ChamberGeometry, burner: &BurnerDesign, config: &ForgeConfig) -> Cutout {
    let ins = geometry.insulation_in;
    let half = burner.port_length_in / 2.0;
    let preferred = ins + geometry.internal_length_in * config.burner.port_offset_fraction;
    let center_x = preferred.max(ins + half).min(geometry.external_length_in - ins - half);
    Cutout {
        purpose: CutoutPurpose::BurnerPort,
        x_in: center_x - half,
        y_in: (geometry.external_width_in - burner.port_width_in) / 2.0,
        width_in: burner.port_length_in,
        height_in: burner.port_width_in,
    }
}

/// Build the plate and frame cut list.
///
/// # Errors
///
/// `ForgeError::Range` when a panel, cutout or frame member comes out
/// non-positive, or a cutout violates the minimum border.
pub fn build(
    geometry: &ChamberGeometry,
    configuration: DoorConfiguration,
    burner: &BurnerDesign,
    config: &ForgeConfig,
) -> ForgeResult<CutList> {
    let ext_w = geometry.external_width_in;
    let ext_h = geometry.external_height_in;
    let ext_l = geometry.external_length_in;
    let openings = door_openings(geometry, configuration, config)?;

    let burner_port = burner_port_cutout(geometry, burner, config);

    let mut front = Panel::closed(PanelRole::FrontEnd, 1, ext_w, ext_h, config);
    for opening in openings.iter().filter(|o| o.location == DoorLocation::Front) {
        front = front.with_cutout(end_door_cutout(CutoutPurpose::FrontDoor, opening, geometry));
    }

    let rear_opening = openings.iter().find(|o| o.location != DoorLocation::Front);
    let rear = match (configuration, rear_opening) {
        (DoorConfiguration::FrontOnly, _) => Panel::closed(PanelRole::RearEnd, 1, ext_w, ext_h, config),
        (DoorConfiguration::FrontAndRear, Some(opening)) => Panel::closed(PanelRole::RearEnd, 1, ext_w, ext_h, config)
            .with_cutout(end_door_cutout(CutoutPurpose::RearDoor, opening, geometry)),
        (DoorConfiguration::SideLoading, Some(slot)) => Panel {
            profile: PanelProfile::OpenEdge {
                notch: EdgeNotch {
                    x_in: (ext_w - slot.width_in) / 2.0,
                    width_in: slot.width_in,
                    depth_in: slot.height_in,
                },
            },
            ..Panel::closed(PanelRole::RearEnd, 1, ext_w, ext_h, config)
        },
        (_, None) => {
            return Err(ForgeError::range(
                "rear_end",
                configuration.label(),
                "Door configuration requires a rear opening",
            ))
        }
    };

    let panels = vec![
        Panel::closed(PanelRole::Bottom, 1, ext_l, ext_w, config),
        Panel::closed(PanelRole::Top, 1, ext_l, ext_w, config).with_cutout(burner_port),
        Panel::closed(PanelRole::Side, 2, ext_l, ext_h, config),
        front,
        rear,
    ];
    for panel in &panels {
        panel.validate(config.doors.min_border_in)?;
    }

    let deduction = config.frame.rail_deduction_in;
    let stock = config.frame.angle_stock.clone();
    let frame_members = vec![
        FrameMember {
            name: "Corner posts".to_string(),
            quantity: 4,
            length_in: ensure_positive("corner_post_length_in", ext_h)?,
            stock: stock.clone(),
        },
        FrameMember {
            name: "Top/bottom rails (long)".to_string(),
            quantity: 8,
            length_in: ensure_positive("long_rail_length_in", ext_l - deduction)?,
            stock: stock.clone(),
        },
        FrameMember {
            name: "Top/bottom rails (end)".to_string(),
            quantity: 8,
            length_in: ensure_positive("end_rail_length_in", ext_w - deduction)?,
            stock,
        },
    ];

    tracing::debug!(panels = panels.len(), frame_members = frame_members.len(), "built steel cut list");

    Ok(CutList { panels, frame_members })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::burner::design;
    use crate::calculations::geometry::{resolve, ChamberInput};

    fn build_for(w: f64, h: f64, l: f64, ins: f64, doors: DoorConfiguration) -> ForgeResult<CutList> {
        let config = ForgeConfig::default();
        let input = ChamberInput {
            internal_width_in: w,
            internal_height_in: h,
            internal_length_in: l,
            insulation_in: ins,
            door_configuration: doors,
        };
        let geometry = resolve(&input, &config)?;
        let burner = design(geometry.volume_ci, &config.burner)?;
        build(&geometry, doors, &burner, &config)
    }

    #[test]
    fn test_reference_panels() {
        let cut = build_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly).unwrap();
        assert_eq!(cut.panels.len(), 5);
        assert_eq!(cut.plate_count(), 6);

        let side = cut.panel(PanelRole::Side).unwrap();
        assert_eq!((side.width_in, side.height_in, side.quantity), (18.0, 12.0, 2));

        let top = cut.panel(PanelRole::Top).unwrap();
        let port = top.cutouts()[0];
        assert_eq!(port.purpose, CutoutPurpose::BurnerPort);
        // 13.25" port pushed back from 7.6" until it clears the front lining
        assert!((port.center_x_in() - 8.625).abs() < 1e-9);
        assert!((port.x_in - 2.0).abs() < 1e-9);
        assert!((port.width_in - 13.25).abs() < 1e-9);
        assert!((port.y_in + port.height_in / 2.0 - 5.5).abs() < 1e-9);
        assert_eq!(cut.burner_port(), Some(&port));
        assert_eq!(cut.plate_thickness_in(), 0.25);

        let front = cut.panel(PanelRole::FrontEnd).unwrap();
        assert_eq!(front.cutouts().len(), 1);
        assert!(cut.panel(PanelRole::RearEnd).unwrap().cutouts().is_empty());
    }

    #[test]
    fn test_frame_members() {
        let cut = build_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly).unwrap();
        let lengths: Vec<(u32, f64)> = cut.frame_members.iter().map(|m| (m.quantity, m.length_in)).collect();
        assert_eq!(lengths, vec![(4, 12.0), (8, 14.0), (8, 7.0)]);
        assert_eq!(cut.frame_total_length_in(), 4.0 * 12.0 + 8.0 * 14.0 + 8.0 * 7.0);
    }

    #[test]
    fn test_cutouts_inside_and_disjoint_for_all_configurations() {
        let config = ForgeConfig::default();
        let sizes = [(3.5, 6.0, 10.0, 1.0), (7.0, 8.0, 14.0, 2.0), (12.0, 5.0, 30.0, 2.0), (5.0, 4.0, 48.0, 1.5)];
        for doors in DoorConfiguration::ALL {
            for (w, h, l, ins) in sizes {
                let cut = build_for(w, h, l, ins, doors).unwrap();
                for panel in &cut.panels {
                    for (i, c) in panel.cutouts().iter().enumerate() {
                        assert!(c.border_in(panel.width_in, panel.height_in) >= config.doors.min_border_in);
                        for other in &panel.cutouts()[i + 1..] {
                            assert!(!c.overlaps(other));
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_side_loading_rear_slot() {
        let cut = build_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::SideLoading).unwrap();
        let rear = cut.panel(PanelRole::RearEnd).unwrap();
        match rear.profile {
            PanelProfile::OpenEdge { notch } => {
                assert!((notch.width_in - 5.95).abs() < 1e-9);
                assert!((notch.depth_in - 10.0).abs() < 1e-9);
                assert!((notch.x_in - 2.525).abs() < 1e-9);
            }
            ref other => panic!("expected open edge profile, got {other:?}"),
        }
        assert!(rear.note().contains("slot"));
    }

    #[test]
    fn test_front_and_rear_doors() {
        let cut = build_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontAndRear).unwrap();
        let rear = cut.panel(PanelRole::RearEnd).unwrap();
        assert_eq!(rear.cutouts()[0].purpose, CutoutPurpose::RearDoor);
    }

    #[test]
    fn test_border_violation_is_error_not_clamped() {
        let panel = Panel {
            role: PanelRole::FrontEnd,
            quantity: 1,
            width_in: 10.0,
            height_in: 10.0,
            thickness_in: 0.25,
            profile: PanelProfile::Closed {
                cutouts: vec![Cutout {
                    purpose: CutoutPurpose::FrontDoor,
                    x_in: 0.25,
                    y_in: 2.0,
                    width_in: 5.0,
                    height_in: 5.0,
                }],
            },
        };
        let err = panel.validate(0.5).unwrap_err();
        assert_eq!(err.error_code(), "RANGE_ERROR");
    }

    #[test]
    fn test_overlap_detected() {
        let a = Cutout { purpose: CutoutPurpose::FrontDoor, x_in: 1.0, y_in: 1.0, width_in: 3.0, height_in: 3.0 };
        let b = Cutout { purpose: CutoutPurpose::BurnerPort, x_in: 3.5, y_in: 3.5, width_in: 2.0, height_in: 2.0 };
        let c = Cutout { purpose: CutoutPurpose::BurnerPort, x_in: 4.0, y_in: 1.0, width_in: 2.0, height_in: 2.0 };
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
