//! # Technical Drawings
//!
//! Parametric orthographic views of the forge body. A view is built in model
//! space (inches, `y` up, origin at the part's lower-left corner) as a list of
//! [`Primitive`]s, then laid out on a page frame at a nice scale. Backends do
//! not interpret primitives themselves; they draw the flat page-space
//! [`PageShape`]s returned by [`DiagramView::page_shapes`] (points, `y` down,
//! origin at the view frame's top-left corner).
//!
//! ## Modules
//!
//! - [`scale`] - nice-scale table and first-fit selection
//! - [`dimension`] - dimension lines, tier assignment and flattening
//! - [`hatch`] - 45 degree section hatching clipped around holes
//! - [`compose`] - builds the FRONT, SIDE SECTION, REAR and burner views

pub mod compose;
pub mod dimension;
pub mod hatch;
pub mod scale;

use serde::{Deserialize, Serialize};

use crate::errors::ForgeError;

pub use compose::compose;
pub use dimension::{ArrowStyle, DimensionLine, Orientation, Side};
pub use scale::Scale;

// ============================================================================
// Geometry
// ============================================================================

/// Page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageSize {
    pub const LETTER: PageSize = PageSize { width_pt: 612.0, height_pt: 792.0 };
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::LETTER
    }
}

/// Model-space point in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Page-space point in points, `y` down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PagePoint {
    pub x: f64,
    pub y: f64,
}

impl PagePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        PagePoint { x, y }
    }
}

/// Axis-aligned rectangle. In model space `(x, y)` is the lower-left corner;
/// in page space it is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Interiors intersect (touching edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.max_x() && other.x < self.max_x() && self.y < other.max_y() && other.y < self.max_y()
    }

    /// Closed corner loop, counter-clockwise from `(x, y)`
    pub fn corners(&self) -> Vec<Point> {
        vec![
            Point::new(self.x, self.y),
            Point::new(self.max_x(), self.y),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.x, self.max_y()),
        ]
    }
}

// ============================================================================
// Primitives
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineWeight {
    /// Visible part edges
    Thick,
    /// Lining boundaries, openings seen in section
    Thin,
}

impl LineWeight {
    pub fn stroke_pt(self) -> f64 {
        match self {
            LineWeight::Thick => 0.9,
            LineWeight::Thin => 0.4,
        }
    }
}

/// Text callout attached to a point on the part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub anchor: Point,
    pub side: Side,
    pub text: String,
    /// Distance from the part edge to the leader shoulder, set during layout
    pub offset_pt: f64,
}

/// Model-space drawing element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Outline {
        points: Vec<Point>,
        closed: bool,
        weight: LineWeight,
    },
    /// Area bounded by `boundary` minus `holes`; hatched when `section` is set
    Region {
        boundary: Rect,
        holes: Vec<Rect>,
        section: bool,
    },
    /// Drilled or cast round hole
    Hole {
        center: Point,
        diameter_in: f64,
    },
    Dimension(DimensionLine),
    Leader(Leader),
}

impl Primitive {
    pub fn outline(rect: &Rect, weight: LineWeight) -> Self {
        Primitive::Outline {
            points: rect.corners(),
            closed: true,
            weight,
        }
    }
}

// ============================================================================
// Page Shapes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Backend-neutral page-space shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageShape {
    Line {
        from: PagePoint,
        to: PagePoint,
        stroke_pt: f64,
    },
    Rect {
        rect: Rect,
        stroke_pt: f64,
    },
    Polygon {
        points: Vec<PagePoint>,
        filled: bool,
        stroke_pt: f64,
    },
    /// `at` is the vertical middle of the text; `anchor` picks the horizontal
    /// reference. Rotated text is always centered on `at`.
    Text {
        at: PagePoint,
        text: String,
        size_pt: f64,
        rotation_deg: f64,
        anchor: TextAnchor,
    },
}

/// Model to page mapping for one view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub pt_per_in: f64,
    /// Page position of the model origin
    pub origin: PagePoint,
}

impl ViewTransform {
    pub fn to_page(&self, p: Point) -> PagePoint {
        PagePoint::new(self.origin.x + p.x * self.pt_per_in, self.origin.y - p.y * self.pt_per_in)
    }

    /// Page rectangle covering a model rectangle
    pub fn rect_to_page(&self, r: &Rect) -> Rect {
        let top_left = self.to_page(Point::new(r.x, r.max_y()));
        Rect::new(top_left.x, top_left.y, r.width * self.pt_per_in, r.height * self.pt_per_in)
    }
}

// ============================================================================
// Views
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    Front,
    SideSection,
    Rear,
    /// Underside of the burner casting with its flame holes
    BurnerDetail,
}

impl ViewKind {
    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Front => "FRONT VIEW",
            ViewKind::SideSection => "SIDE SECTION A-A",
            ViewKind::Rear => "REAR VIEW",
            ViewKind::BurnerDetail => "BURNER BOTTOM VIEW",
        }
    }

    /// Sheet index used in drawing numbers
    pub fn sheet(self) -> u32 {
        match self {
            ViewKind::Front => 1,
            ViewKind::SideSection => 2,
            ViewKind::Rear => 3,
            ViewKind::BurnerDetail => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleBlock {
    pub title: String,
    pub view_name: String,
    pub scale_label: String,
    pub drawing_number: String,
    pub revision: String,
}

/// One laid-out orthographic view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramView {
    pub kind: ViewKind,
    pub scale: Scale,
    /// Nothing fit; drawn at the smallest scale and may be clipped
    pub truncated: bool,
    /// Model extents of the part
    pub extents: Rect,
    /// View frame size in points
    pub frame_width_pt: f64,
    pub frame_height_pt: f64,
    pub transform: ViewTransform,
    pub primitives: Vec<Primitive>,
    pub title_block: TitleBlock,
    pub margin_pt: f64,
    pub title_block_height_pt: f64,
    pub label_font_pt: f64,
}

impl DiagramView {
    pub fn dimensions(&self) -> impl Iterator<Item = &DimensionLine> {
        self.primitives.iter().filter_map(|p| match p {
            Primitive::Dimension(d) => Some(d),
            _ => None,
        })
    }

    /// Flatten the view into page-space shapes, back to front.
    pub fn page_shapes(&self) -> Vec<PageShape> {
        let mut shapes = vec![PageShape::Rect {
            rect: Rect::new(0.0, 0.0, self.frame_width_pt, self.frame_height_pt),
            stroke_pt: 0.6,
        }];
        let part = self.transform.rect_to_page(&self.extents);

        // Hatching first so outlines draw over it
        for primitive in &self.primitives {
            if let Primitive::Region { boundary, holes, section: true } = primitive {
                let page_holes: Vec<Rect> = holes.iter().map(|h| self.transform.rect_to_page(h)).collect();
                let boundary = self.transform.rect_to_page(boundary);
                shapes.extend(
                    hatch::hatch_segments(&boundary, &page_holes, hatch::HATCH_SPACING_PT)
                        .into_iter()
                        .map(|(from, to)| PageShape::Line { from, to, stroke_pt: 0.25 }),
                );
            }
        }

        for primitive in &self.primitives {
            match primitive {
                Primitive::Outline { points, closed, weight } => {
                    let page: Vec<PagePoint> = points.iter().map(|p| self.transform.to_page(*p)).collect();
                    if *closed {
                        shapes.push(PageShape::Polygon {
                            points: page,
                            filled: false,
                            stroke_pt: weight.stroke_pt(),
                        });
                    } else {
                        shapes.extend(page.windows(2).map(|w| PageShape::Line {
                            from: w[0],
                            to: w[1],
                            stroke_pt: weight.stroke_pt(),
                        }));
                    }
                }
                Primitive::Region { .. } => {}
                Primitive::Hole { center, diameter_in } => shapes.push(PageShape::Polygon {
                    points: circle(self.transform.to_page(*center), diameter_in / 2.0 * self.transform.pt_per_in),
                    filled: false,
                    stroke_pt: LineWeight::Thin.stroke_pt(),
                }),
                Primitive::Dimension(dim) => {
                    shapes.extend(dimension::flatten(dim, &self.transform, &part, self.label_font_pt));
                }
                Primitive::Leader(leader) => shapes.extend(self.leader_shapes(leader, &part)),
            }
        }

        shapes.extend(self.title_block_shapes());
        shapes
    }

    fn leader_shapes(&self, leader: &Leader, part: &Rect) -> Vec<PageShape> {
        let anchor = self.transform.to_page(leader.anchor);
        let shoulder = 10.0;
        let (elbow, end, text_anchor) = match leader.side {
            Side::Top => {
                let elbow = PagePoint::new(anchor.x + 12.0, part.y - leader.offset_pt);
                (elbow, PagePoint::new(elbow.x + shoulder, elbow.y), TextAnchor::Start)
            }
            Side::Bottom => {
                let elbow = PagePoint::new(anchor.x + 12.0, part.max_y() + leader.offset_pt);
                (elbow, PagePoint::new(elbow.x + shoulder, elbow.y), TextAnchor::Start)
            }
            Side::Right => {
                let elbow = PagePoint::new(part.max_x() + leader.offset_pt, anchor.y - 12.0);
                (elbow, PagePoint::new(elbow.x + shoulder, elbow.y), TextAnchor::Start)
            }
            Side::Left => {
                let elbow = PagePoint::new(part.x - leader.offset_pt, anchor.y - 12.0);
                (elbow, PagePoint::new(elbow.x - shoulder, elbow.y), TextAnchor::End)
            }
        };
        let text_x = match text_anchor {
            TextAnchor::End => end.x - 2.0,
            _ => end.x + 2.0,
        };
        vec![
            PageShape::Polygon {
                points: dimension::dot(anchor, 1.2),
                filled: true,
                stroke_pt: 0.3,
            },
            PageShape::Line { from: anchor, to: elbow, stroke_pt: 0.4 },
            PageShape::Line { from: elbow, to: end, stroke_pt: 0.4 },
            PageShape::Text {
                at: PagePoint::new(text_x, end.y),
                text: leader.text.clone(),
                size_pt: self.label_font_pt,
                rotation_deg: 0.0,
                anchor: text_anchor,
            },
        ]
    }

    fn title_block_shapes(&self) -> Vec<PageShape> {
        let m = self.margin_pt;
        let block = Rect::new(
            m,
            self.frame_height_pt - m - self.title_block_height_pt,
            self.frame_width_pt - 2.0 * m,
            self.title_block_height_pt,
        );
        let tb = &self.title_block;
        let cells: [(&str, &str, f64); 5] = [
            ("TITLE", tb.title.as_str(), 0.40),
            ("VIEW", tb.view_name.as_str(), 0.22),
            ("SCALE", tb.scale_label.as_str(), 0.10),
            ("DWG NO", tb.drawing_number.as_str(), 0.16),
            ("REV", tb.revision.as_str(), 0.12),
        ];

        let mut shapes = vec![PageShape::Rect { rect: block, stroke_pt: 0.6 }];
        let mut x = block.x;
        for (i, (caption, value, share)) in cells.iter().enumerate() {
            let width = block.width * share;
            if i > 0 {
                shapes.push(PageShape::Line {
                    from: PagePoint::new(x, block.y),
                    to: PagePoint::new(x, block.max_y()),
                    stroke_pt: 0.4,
                });
            }
            shapes.push(PageShape::Text {
                at: PagePoint::new(x + 3.0, block.y + 5.0),
                text: (*caption).to_string(),
                size_pt: 4.5,
                rotation_deg: 0.0,
                anchor: TextAnchor::Start,
            });
            shapes.push(PageShape::Text {
                at: PagePoint::new(x + 3.0, block.y + block.height * 0.62),
                text: (*value).to_string(),
                size_pt: self.label_font_pt + 1.0,
                rotation_deg: 0.0,
                anchor: TextAnchor::Start,
            });
            x += width;
        }
        shapes
    }
}

const CIRCLE_SEGMENTS: usize = 16;

/// Closed polygon approximating a circle in page space
fn circle(center: PagePoint, radius_pt: f64) -> Vec<PagePoint> {
    (0..CIRCLE_SEGMENTS)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::TAU / CIRCLE_SEGMENTS as f64;
            PagePoint::new(center.x + radius_pt * angle.cos(), center.y + radius_pt * angle.sin())
        })
        .collect()
}

/// All views for one design, plus any non-fatal layout problems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSet {
    pub views: Vec<DiagramView>,
    /// `ForgeError::LayoutDegraded` entries, one per truncated view
    pub degraded: Vec<ForgeError>,
}

impl DiagramSet {
    pub fn view(&self, kind: ViewKind) -> Option<&DiagramView> {
        self.views.iter().find(|v| v.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_flips_y() {
        let t = ViewTransform {
            pt_per_in: 9.0,
            origin: PagePoint::new(100.0, 200.0),
        };
        assert_eq!(t.to_page(Point::new(0.0, 0.0)), PagePoint::new(100.0, 200.0));
        assert_eq!(t.to_page(Point::new(2.0, 1.0)), PagePoint::new(118.0, 191.0));

        let r = t.rect_to_page(&Rect::new(0.0, 0.0, 10.0, 4.0));
        assert_eq!(r, Rect::new(100.0, 164.0, 90.0, 36.0));
    }

    #[test]
    fn test_rect_intersection_ignores_touching_edges() {
        let a = Rect::new(0.0, 0.0, 2.0, 2.0);
        assert!(a.intersects(&Rect::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!a.intersects(&Rect::new(2.0, 0.0, 2.0, 2.0)));
    }

    #[test]
    fn test_circle_is_centered() {
        let points = circle(PagePoint::new(50.0, 40.0), 2.0);
        assert_eq!(points.len(), CIRCLE_SEGMENTS);
        assert_eq!(points[0], PagePoint::new(52.0, 40.0));
        for p in &points {
            let r = ((p.x - 50.0).powi(2) + (p.y - 40.0).powi(2)).sqrt();
            assert!((r - 2.0).abs() < 1e-9);
        }
    }
}
