//! # View Composition
//!
//! Builds the orthographic views of the forge body from the specification:
//!
//! - **FRONT VIEW** - front end panel, lining ring in section, door opening
//! - **SIDE SECTION A-A** - longitudinal section through the lining with the
//!   burner port and door gaps
//! - **REAR VIEW** - rear end panel, only when the rear is opened
//! - **BURNER BOTTOM VIEW** - underside of the burner casting with the
//!   staggered flame hole pattern
//!
//! Each view is drafted in model inches, then laid out: dimension tiers are
//! assigned, annotation bands sized, a nice scale chosen, and the part
//! centered in the frame above the title block.

use crate::calculations::cut_list::{Panel, PanelProfile, PanelRole};
use crate::calculations::geometry::ChamberGeometry;
use crate::calculations::specification::{FieldValue, Specification};
use crate::config::{ForgeConfig, LayoutPolicy};
use crate::errors::{ForgeError, ForgeResult};

use super::dimension::{self, ArrowStyle, DimensionLine, Side};
use super::scale::{self, Bands};
use super::{
    DiagramSet, DiagramView, LineWeight, Leader, PagePoint, Point, Primitive, Rect, TitleBlock, ViewKind,
    ViewTransform,
};

/// A view before layout: model geometry and annotations only.
struct ViewDraft {
    kind: ViewKind,
    extents: Rect,
    primitives: Vec<Primitive>,
    dimensions: Vec<DimensionLine>,
    leaders: Vec<Leader>,
}

impl ViewDraft {
    fn new(kind: ViewKind, extents: Rect) -> Self {
        ViewDraft {
            kind,
            extents,
            primitives: Vec::new(),
            dimensions: Vec::new(),
            leaders: Vec::new(),
        }
    }

    fn section(&mut self, boundary: Rect, holes: Vec<Rect>) -> ForgeResult<()> {
        if !(boundary.area() > 0.0) {
            return Err(ForgeError::drawing(
                format!("{} section", self.kind.name()),
                "Section region has zero area",
            ));
        }
        self.primitives.push(Primitive::Region { boundary, holes, section: true });
        Ok(())
    }

    fn outline(&mut self, rect: &Rect, weight: LineWeight) {
        self.primitives.push(Primitive::outline(rect, weight));
    }

    fn dimension(&mut self, dim: DimensionLine) {
        self.dimensions.push(dim);
    }

    fn leader(&mut self, anchor: Point, side: Side, text: impl Into<String>) {
        self.leaders.push(Leader {
            anchor,
            side,
            text: text.into(),
            offset_pt: 0.0,
        });
    }
}

fn length_label(inches: f64) -> String {
    FieldValue::length(inches).to_string()
}

fn panel<'a>(spec: &'a Specification, role: PanelRole) -> ForgeResult<&'a Panel> {
    spec.cut_list
        .panel(role)
        .ok_or_else(|| ForgeError::drawing(role.name(), "Panel missing from cut list"))
}

fn check_panel(panel: &Panel) -> ForgeResult<Rect> {
    let rect = Rect::new(0.0, 0.0, panel.width_in, panel.height_in);
    if !(rect.area() > 0.0) {
        return Err(ForgeError::drawing(panel.name(), "Panel has zero area"));
    }
    Ok(rect)
}

// ============================================================================
// Drafts
// ============================================================================

/// Overall width and height dimensions, drawn with architectural ticks
fn overall_dimensions(draft: &mut ViewDraft, extents: &Rect, horizontal_side: Side) {
    let (y, x_start, x_end) = match horizontal_side {
        Side::Top => (extents.max_y(), extents.x, extents.max_x()),
        _ => (extents.y, extents.x, extents.max_x()),
    };
    draft.dimension(
        DimensionLine::new(Point::new(x_start, y), Point::new(x_end, y), horizontal_side, 0, length_label(extents.width))
            .with_arrow(ArrowStyle::Tick),
    );
    draft.dimension(
        DimensionLine::new(
            Point::new(extents.x, extents.y),
            Point::new(extents.x, extents.max_y()),
            Side::Left,
            0,
            length_label(extents.height),
        )
        .with_arrow(ArrowStyle::Tick),
    );
}

/// End panel seen from outside: plate outline, lining ring, openings.
fn end_view(kind: ViewKind, end: &Panel, geometry: &ChamberGeometry) -> ForgeResult<ViewDraft> {
    let extents = check_panel(end)?;
    let ins = geometry.insulation_in;
    let lined = Rect::new(ins, ins, geometry.internal_width_in, geometry.internal_height_in);
    let mut draft = ViewDraft::new(kind, extents);

    let mut holes = vec![lined];
    match &end.profile {
        PanelProfile::Closed { cutouts } => {
            draft.outline(&extents, LineWeight::Thick);
            for c in cutouts {
                let rect = Rect::new(c.x_in, c.y_in, c.width_in, c.height_in);
                draft.outline(&rect, LineWeight::Thick);
                draft.dimension(DimensionLine::new(
                    Point::new(c.x_in, c.y_in),
                    Point::new(c.right_in(), c.y_in),
                    Side::Bottom,
                    1,
                    length_label(c.width_in),
                ));
                draft.dimension(DimensionLine::new(
                    Point::new(c.x_in, c.y_in),
                    Point::new(c.x_in, c.top_in()),
                    Side::Left,
                    1,
                    length_label(c.height_in),
                ));
            }
        }
        PanelProfile::OpenEdge { notch } => {
            let floor = extents.max_y() - notch.depth_in;
            let right = notch.x_in + notch.width_in;
            draft.primitives.push(Primitive::Outline {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(extents.max_x(), 0.0),
                    Point::new(extents.max_x(), extents.max_y()),
                    Point::new(right, extents.max_y()),
                    Point::new(right, floor),
                    Point::new(notch.x_in, floor),
                    Point::new(notch.x_in, extents.max_y()),
                    Point::new(0.0, extents.max_y()),
                ],
                closed: true,
                weight: LineWeight::Thick,
            });
            holes.push(Rect::new(notch.x_in, floor, notch.width_in, notch.depth_in));
            draft.dimension(DimensionLine::new(
                Point::new(notch.x_in, extents.max_y()),
                Point::new(right, extents.max_y()),
                Side::Top,
                1,
                length_label(notch.width_in),
            ));
            draft.dimension(DimensionLine::new(
                Point::new(notch.x_in, floor),
                Point::new(notch.x_in, extents.max_y()),
                Side::Left,
                1,
                length_label(notch.depth_in),
            ));
        }
    }

    draft.outline(&lined, LineWeight::Thin);
    draft.section(extents, holes)?;
    overall_dimensions(&mut draft, &extents, Side::Bottom);
    draft.leader(
        Point::new(extents.max_x() - ins / 2.0, ins / 2.0),
        Side::Right,
        format!("{} LINING", length_label(ins)),
    );
    Ok(draft)
}

/// Longitudinal section: front end on the left, rear end on the right.
fn side_section(spec: &Specification, geometry: &ChamberGeometry) -> ForgeResult<ViewDraft> {
    let side = panel(spec, PanelRole::Side)?;
    let extents = check_panel(side)?;
    let ins = geometry.insulation_in;
    let ext_l = extents.width;
    let ext_h = extents.height;
    let cavity = Rect::new(ins, ins, geometry.internal_length_in, geometry.internal_height_in);
    let mut draft = ViewDraft::new(ViewKind::SideSection, extents);
    let mut gaps = Vec::new();

    // Front door gap through the front wall
    for c in panel(spec, PanelRole::FrontEnd)?.cutouts() {
        let gap = Rect::new(0.0, c.y_in, ins, c.height_in);
        draft.dimension(DimensionLine::new(
            Point::new(0.0, gap.y),
            Point::new(0.0, gap.max_y()),
            Side::Left,
            1,
            length_label(gap.height),
        ));
        gaps.push(gap);
    }

    // Rear gap: door or open slot
    let rear = panel(spec, PanelRole::RearEnd)?;
    match &rear.profile {
        PanelProfile::Closed { cutouts } => {
            for c in cutouts {
                gaps.push(Rect::new(ext_l - ins, c.y_in, ins, c.height_in));
            }
        }
        PanelProfile::OpenEdge { notch } => {
            gaps.push(Rect::new(ext_l - ins, ext_h - notch.depth_in, ins, notch.depth_in));
        }
    }
    for gap in &gaps {
        if gap.x > 0.0 {
            draft.dimension(DimensionLine::new(
                Point::new(gap.max_x(), gap.y),
                Point::new(gap.max_x(), gap.max_y()),
                Side::Right,
                1,
                length_label(gap.height),
            ));
        }
    }

    // Burner port through the ceiling
    let top = panel(spec, PanelRole::Top)?;
    for c in top.cutouts() {
        let port = Rect::new(c.x_in, ext_h - ins, c.width_in, ins);
        let center = c.x_in + c.width_in / 2.0;
        draft.dimension(DimensionLine::new(
            Point::new(port.x, ext_h),
            Point::new(port.max_x(), ext_h),
            Side::Top,
            1,
            length_label(port.width),
        ));
        draft.dimension(DimensionLine::new(
            Point::new(0.0, ext_h),
            Point::new(center, ext_h),
            Side::Top,
            0,
            format!("{} TO CL", length_label(center)),
        ));
        draft.leader(
            Point::new(center, ext_h),
            Side::Top,
            format!("RIBBON BURNER {} HOLES", spec.burner.hole_count),
        );
        gaps.push(port);
    }

    draft.outline(&extents, LineWeight::Thick);
    draft.outline(&cavity, LineWeight::Thin);
    for gap in &gaps {
        draft.outline(gap, LineWeight::Thin);
    }
    let mut holes = vec![cavity];
    holes.extend(gaps);
    draft.section(extents, holes)?;

    draft.dimension(
        DimensionLine::new(Point::new(0.0, 0.0), Point::new(ext_l, 0.0), Side::Bottom, 0, length_label(ext_l))
            .with_arrow(ArrowStyle::Tick),
    );
    draft.dimension(
        DimensionLine::new(Point::new(0.0, 0.0), Point::new(0.0, ext_h), Side::Left, 0, length_label(ext_h))
            .with_arrow(ArrowStyle::Tick),
    );
    Ok(draft)
}

/// Burner casting seen from below, one marker per flame hole.
fn burner_detail(spec: &Specification) -> ForgeResult<ViewDraft> {
    let burner = &spec.burner;
    let extents = Rect::new(0.0, 0.0, burner.length_in, burner.body_width_in);
    if !(extents.area() > 0.0) {
        return Err(ForgeError::drawing(ViewKind::BurnerDetail.name(), "Burner casting has zero area"));
    }
    let mut draft = ViewDraft::new(ViewKind::BurnerDetail, extents);
    draft.outline(&extents, LineWeight::Thick);

    let centers = burner.hole_centers();
    for &(x, y) in &centers {
        draft.primitives.push(Primitive::Hole {
            center: Point::new(x, y),
            diameter_in: burner.hole_diameter_in,
        });
    }

    // Pitch between the first two holes of the first row
    if let [(x0, y0), (x1, y1), ..] = centers[..] {
        if y0 == y1 {
            draft.dimension(DimensionLine::new(
                Point::new(x0, y0),
                Point::new(x1, y1),
                Side::Top,
                1,
                length_label(burner.hole_pitch_in),
            ));
        }
    }
    overall_dimensions(&mut draft, &extents, Side::Bottom);

    let anchor = centers.first().map_or(Point::new(0.0, 0.0), |&(x, y)| Point::new(x, y));
    draft.leader(
        anchor,
        Side::Bottom,
        format!(
            "{} x {} HOLES ({} x {})",
            burner.hole_count,
            length_label(burner.hole_diameter_in),
            burner.row_count(),
            burner.holes_per_row
        ),
    );
    Ok(draft)
}

// ============================================================================
// Layout
// ============================================================================

/// Lay a draft out on its frame. Returns the view and, when nothing fit, the
/// degradation to record.
fn layout(mut draft: ViewDraft, policy: &LayoutPolicy) -> (DiagramView, Option<ForgeError>) {
    let frame_w = policy.page.width_pt - 2.0 * policy.page_margin_pt;
    let frame_h = (policy.page.height_pt - 2.0 * policy.page_margin_pt) * policy.view_height_fraction;
    let m = policy.view_margin_pt;
    let area = Rect::new(m, m, frame_w - 2.0 * m, frame_h - 3.0 * m - policy.title_block_height_pt);

    dimension::assign_tiers(
        &mut draft.dimensions,
        policy.dimension_offset_pt,
        policy.dimension_tier_spacing_pt,
    );

    let band = |side: Side, dims: &[DimensionLine]| dimension::band_depth(dims, side, policy.label_font_pt);
    let mut bands = Bands {
        top: band(Side::Top, &draft.dimensions),
        bottom: band(Side::Bottom, &draft.dimensions),
        left: band(Side::Left, &draft.dimensions),
        right: band(Side::Right, &draft.dimensions),
    };
    for leader in &mut draft.leaders {
        let slot = match leader.side {
            Side::Top => &mut bands.top,
            Side::Bottom => &mut bands.bottom,
            Side::Left => &mut bands.left,
            Side::Right => &mut bands.right,
        };
        leader.offset_pt = *slot + policy.leader_band_pt / 2.0;
        *slot += policy.leader_band_pt;
    }

    let extents = draft.extents;
    let choice = scale::select(extents.width, extents.height, &bands, area.width, area.height);
    let s = choice.scale.pt_per_in();
    let (total_w, total_h) = scale::footprint(choice.scale, extents.width, extents.height, &bands);
    let part_left = area.x + (area.width - total_w) / 2.0 + bands.left;
    let part_top = area.y + (area.height - total_h) / 2.0 + bands.top;
    let transform = ViewTransform {
        pt_per_in: s,
        origin: PagePoint::new(part_left - extents.x * s, part_top + extents.max_y() * s),
    };

    let degraded = if choice.fits {
        None
    } else {
        let reason = format!(
            "needs {:.0} x {:.0} pt at {} but the drawing area is {:.0} x {:.0} pt",
            total_w,
            total_h,
            choice.scale.label(),
            area.width,
            area.height
        );
        tracing::warn!(view = draft.kind.name(), %reason, "view truncated");
        Some(ForgeError::layout_degraded(draft.kind.name(), reason))
    };

    let mut primitives = draft.primitives;
    primitives.extend(draft.dimensions.into_iter().map(Primitive::Dimension));
    primitives.extend(draft.leaders.into_iter().map(Primitive::Leader));

    let view = DiagramView {
        kind: draft.kind,
        scale: choice.scale,
        truncated: !choice.fits,
        extents,
        frame_width_pt: frame_w,
        frame_height_pt: frame_h,
        transform,
        primitives,
        title_block: TitleBlock {
            title: policy.drawing_title.clone(),
            view_name: draft.kind.name().to_string(),
            scale_label: choice.scale.label(),
            drawing_number: format!("{}-{:03}", policy.drawing_prefix, 100 + draft.kind.sheet()),
            revision: policy.revision.clone(),
        },
        margin_pt: m,
        title_block_height_pt: policy.title_block_height_pt,
        label_font_pt: policy.label_font_pt,
    };
    (view, degraded)
}

/// Compose every view the door configuration calls for.
///
/// # Errors
///
/// `ForgeError::Drawing` when a panel or section region has zero area.
/// Views that do not fit are not errors: they are flagged `truncated` and
/// listed in [`DiagramSet::degraded`].
pub fn compose(geometry: &ChamberGeometry, spec: &Specification, config: &ForgeConfig) -> ForgeResult<DiagramSet> {
    let mut drafts = vec![
        end_view(ViewKind::Front, panel(spec, PanelRole::FrontEnd)?, geometry)?,
        side_section(spec, geometry)?,
    ];
    if spec.door_configuration.opens_rear() {
        drafts.push(end_view(ViewKind::Rear, panel(spec, PanelRole::RearEnd)?, geometry)?);
    }
    drafts.push(burner_detail(spec)?);

    let mut views = Vec::with_capacity(drafts.len());
    let mut degraded = Vec::new();
    for draft in drafts {
        let (view, problem) = layout(draft, &config.layout);
        tracing::debug!(view = view.kind.name(), scale = %view.scale.label(), "composed view");
        views.push(view);
        degraded.extend(problem);
    }

    Ok(DiagramSet { views, degraded })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::door::DoorConfiguration;
    use crate::calculations::geometry::{resolve, ChamberInput};
    use crate::calculations::specification::calculate;
    use crate::drawing::{PageShape, PageSize, Scale};

    fn compose_for(w: f64, h: f64, l: f64, ins: f64, doors: DoorConfiguration, config: &ForgeConfig) -> DiagramSet {
        let input = ChamberInput {
            internal_width_in: w,
            internal_height_in: h,
            internal_length_in: l,
            insulation_in: ins,
            door_configuration: doors,
        };
        let geometry = resolve(&input, config).unwrap();
        let spec = calculate(&geometry, doors, config).unwrap();
        compose(&geometry, &spec, config).unwrap()
    }

    #[test]
    fn test_views_per_configuration() {
        let config = ForgeConfig::default();
        let kinds = |set: &DiagramSet| set.views.iter().map(|v| v.kind).collect::<Vec<_>>();

        let front = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly, &config);
        assert_eq!(kinds(&front), vec![ViewKind::Front, ViewKind::SideSection, ViewKind::BurnerDetail]);

        let both = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontAndRear, &config);
        assert_eq!(
            kinds(&both),
            vec![ViewKind::Front, ViewKind::SideSection, ViewKind::Rear, ViewKind::BurnerDetail]
        );

        let side = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::SideLoading, &config);
        assert!(side.view(ViewKind::Rear).is_some());
    }

    #[test]
    fn test_reference_front_view() {
        let set = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly, &ForgeConfig::default());
        assert!(set.degraded.is_empty());
        let front = set.view(ViewKind::Front).unwrap();
        assert!(!front.truncated);
        assert_eq!(front.scale, Scale::new(8));
        assert_eq!(front.title_block.scale_label, "1:8");
        assert_eq!(front.title_block.drawing_number, "FW-101");

        let labels: Vec<&str> = front.dimensions().map(|d| d.label.as_str()).collect();
        assert!(labels.contains(&"11\""));
        assert!(labels.contains(&"12\""));
        assert!(labels.contains(&"5.95\""));

        // Door width sits inside the overall width
        let door = front.dimensions().find(|d| d.label == "5.95\"").unwrap();
        let overall = front.dimensions().find(|d| d.label == "11\"").unwrap();
        assert!(door.offset_pt < overall.offset_pt);
    }

    #[test]
    fn test_side_section_has_burner_callout() {
        let set = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly, &ForgeConfig::default());
        let side = set.view(ViewKind::SideSection).unwrap();
        let leader = side.primitives.iter().find_map(|p| match p {
            Primitive::Leader(l) => Some(l),
            _ => None,
        });
        assert_eq!(leader.unwrap().text, "RIBBON BURNER 44 HOLES");
        assert!(side.dimensions().any(|d| d.label == "18\""));

        // Port spans the casting plus clearance, not a fixed square
        let port = side.dimensions().find(|d| d.side == Side::Top && d.depth == 1).unwrap();
        assert_eq!(port.label, "13.25\"");
        assert!((port.end.x - port.start.x - 13.25).abs() < 1e-9);
        assert!(port.start.x >= 2.0 && port.end.x <= 16.0);
    }

    #[test]
    fn test_burner_detail_shows_every_hole() {
        let set = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly, &ForgeConfig::default());
        let detail = set.view(ViewKind::BurnerDetail).unwrap();
        assert!(!detail.truncated);
        assert_eq!(detail.extents, Rect::new(0.0, 0.0, 12.75, 3.0));
        assert_eq!(detail.title_block.drawing_number, "FW-104");

        let holes: Vec<Point> = detail
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Hole { center, diameter_in } => {
                    assert_eq!(*diameter_in, 0.25);
                    Some(*center)
                }
                _ => None,
            })
            .collect();
        assert_eq!(holes.len(), 44);
        assert!(holes.iter().all(|h| h.x > 0.0 && h.x < 12.75 && h.y > 0.0 && h.y < 3.0));

        let labels: Vec<&str> = detail.dimensions().map(|d| d.label.as_str()).collect();
        assert!(labels.contains(&"12.75\""));
        assert!(labels.contains(&"3\""));
        assert!(labels.contains(&"0.75\""));

        let caption = detail.primitives.iter().find_map(|p| match p {
            Primitive::Leader(l) => Some(l.text.as_str()),
            _ => None,
        });
        assert_eq!(caption, Some("44 x 0.25\" HOLES (3 x 15)"));

        let circles = detail
            .page_shapes()
            .iter()
            .filter(|s| matches!(s, PageShape::Polygon { points, filled: false, .. } if points.len() == 16))
            .count();
        assert_eq!(circles, 44);
    }

    #[test]
    fn test_dimension_offsets_unique_per_side() {
        let set = compose_for(12.0, 5.0, 30.0, 2.0, DoorConfiguration::SideLoading, &ForgeConfig::default());
        for view in &set.views {
            for side in Side::ALL {
                let mut offsets: Vec<f64> =
                    view.dimensions().filter(|d| d.side == side).map(|d| d.offset_pt).collect();
                let count = offsets.len();
                offsets.sort_by(|a, b| a.partial_cmp(b).unwrap());
                offsets.dedup();
                assert_eq!(offsets.len(), count);
            }
        }
    }

    #[test]
    fn test_part_stays_inside_frame_when_fitting() {
        let config = ForgeConfig::default();
        for (w, h, l, ins) in [(3.5, 6.0, 10.0, 1.0), (7.0, 8.0, 14.0, 2.0), (12.0, 5.0, 30.0, 2.0), (5.0, 4.0, 48.0, 1.5)] {
            let set = compose_for(w, h, l, ins, DoorConfiguration::FrontAndRear, &config);
            for view in set.views.iter().filter(|v| !v.truncated) {
                let part = view.transform.rect_to_page(&view.extents);
                assert!(part.x >= 0.0 && part.max_x() <= view.frame_width_pt);
                assert!(part.y >= 0.0 && part.max_y() <= view.frame_height_pt - view.title_block_height_pt);
            }
        }
    }

    #[test]
    fn test_small_page_truncates_without_failing() {
        let mut config = ForgeConfig::default();
        config.layout.page = PageSize { width_pt: 100.0, height_pt: 100.0 };
        let set = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::FrontOnly, &config);
        assert_eq!(set.views.len(), 3);
        assert!(set.views.iter().all(|v| v.truncated && v.scale == Scale::new(16)));
        assert_eq!(set.degraded.len(), 3);
        assert!(set.degraded.iter().all(|e| e.error_code() == "LAYOUT_DEGRADED"));
    }

    #[test]
    fn test_page_shapes_include_hatch_and_title_block() {
        let set = compose_for(7.0, 8.0, 14.0, 2.0, DoorConfiguration::SideLoading, &ForgeConfig::default());
        let rear = set.view(ViewKind::Rear).unwrap();
        let shapes = rear.page_shapes();
        let thin_lines = shapes
            .iter()
            .filter(|s| matches!(s, PageShape::Line { stroke_pt, .. } if *stroke_pt == 0.25))
            .count();
        assert!(thin_lines > 10);
        assert!(shapes.iter().any(|s| matches!(s, PageShape::Text { text, .. } if text == "REAR VIEW")));
        assert!(shapes.iter().any(|s| matches!(s, PageShape::Text { rotation_deg, .. } if *rotation_deg == -90.0)));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let config = ForgeConfig::default();
        let a = compose_for(9.5, 6.25, 24.0, 2.5, DoorConfiguration::FrontAndRear, &config);
        let b = compose_for(9.5, 6.25, 24.0, 2.5, DoorConfiguration::FrontAndRear, &config);
        assert_eq!(a, b);
    }
}
