//! # Dimension Lines
//!
//! A dimension measures the distance between two model points and is drawn
//! parallel to one side of the part, outside it. Several dimensions on the
//! same side are stacked in tiers: features nested deeper inside the part sit
//! closest to it, and among equal depths the shorter span goes inside. This
//! keeps extension lines from crossing labels.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::{PagePoint, PageShape, Point, Rect, TextAnchor, ViewTransform};

/// Arrowhead length along the dimension line, in points
pub const ARROW_LENGTH_PT: f64 = 5.0;
/// Arrowhead half-width, in points
const ARROW_HALF_WIDTH_PT: f64 = 1.6;
/// Gap between the part and the start of an extension line
const EXTENSION_GAP_PT: f64 = 2.0;
/// Extension line overshoot past the dimension line
const EXTENSION_OVERSHOOT_PT: f64 = 2.5;
/// Monospace advance as a fraction of the font size
const CHAR_WIDTH_EM: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    pub fn orientation(self) -> Orientation {
        match self {
            Side::Top | Side::Bottom => Orientation::Horizontal,
            Side::Left | Side::Right => Orientation::Vertical,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowStyle {
    Filled,
    /// 45 degree architectural tick
    Tick,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionLine {
    pub start: Point,
    pub end: Point,
    pub orientation: Orientation,
    pub side: Side,
    /// Nesting depth of the measured feature (0 = overall size)
    pub depth: u32,
    /// Stacking position on its side, 0 closest to the part
    pub tier: u32,
    /// Distance from the part edge to the dimension line, in points
    pub offset_pt: f64,
    pub arrow: ArrowStyle,
    pub label: String,
}

impl DimensionLine {
    pub fn new(start: Point, end: Point, side: Side, depth: u32, label: impl Into<String>) -> Self {
        DimensionLine {
            start,
            end,
            orientation: side.orientation(),
            side,
            depth,
            tier: 0,
            offset_pt: 0.0,
            arrow: ArrowStyle::Filled,
            label: label.into(),
        }
    }

    pub fn with_arrow(mut self, arrow: ArrowStyle) -> Self {
        self.arrow = arrow;
        self
    }

    /// Measured length in inches
    pub fn span_in(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => (self.end.x - self.start.x).abs(),
            Orientation::Vertical => (self.end.y - self.start.y).abs(),
        }
    }
}

/// Assign tiers and offsets to every dimension, side by side.
///
/// Order on a side: deeper features first, then ascending span.
pub fn assign_tiers(dims: &mut [DimensionLine], base_offset_pt: f64, tier_spacing_pt: f64) {
    for side in Side::ALL {
        let mut on_side: Vec<usize> = (0..dims.len()).filter(|&i| dims[i].side == side).collect();
        on_side.sort_by(|&a, &b| {
            dims[b]
                .depth
                .cmp(&dims[a].depth)
                .then(dims[a].span_in().partial_cmp(&dims[b].span_in()).unwrap_or(Ordering::Equal))
        });
        for (tier, idx) in on_side.into_iter().enumerate() {
            dims[idx].tier = tier as u32;
            dims[idx].offset_pt = base_offset_pt + tier as f64 * tier_spacing_pt;
        }
    }
}

/// Room a side needs for its dimensions (0 when it has none).
pub fn band_depth(dims: &[DimensionLine], side: Side, label_font_pt: f64) -> f64 {
    dims.iter()
        .filter(|d| d.side == side)
        .map(|d| d.offset_pt + label_font_pt + EXTENSION_OVERSHOOT_PT + 2.0)
        .fold(0.0, f64::max)
}

/// Estimated printed width of a label
pub fn label_width_pt(label: &str, font_pt: f64) -> f64 {
    label.chars().count() as f64 * font_pt * CHAR_WIDTH_EM
}

/// Small filled square marking a leader anchor
pub(crate) fn dot(at: PagePoint, half: f64) -> Vec<PagePoint> {
    vec![
        PagePoint::new(at.x - half, at.y - half),
        PagePoint::new(at.x + half, at.y - half),
        PagePoint::new(at.x + half, at.y + half),
        PagePoint::new(at.x - half, at.y + half),
    ]
}

/// Arrowhead with its tip at `tip`, pointing along `(dx, dy)` (unit vector).
fn arrowhead(style: ArrowStyle, tip: PagePoint, dx: f64, dy: f64) -> PageShape {
    match style {
        ArrowStyle::Filled => {
            let base = PagePoint::new(tip.x - dx * ARROW_LENGTH_PT, tip.y - dy * ARROW_LENGTH_PT);
            let (px, py) = (-dy * ARROW_HALF_WIDTH_PT, dx * ARROW_HALF_WIDTH_PT);
            PageShape::Polygon {
                points: vec![
                    tip,
                    PagePoint::new(base.x + px, base.y + py),
                    PagePoint::new(base.x - px, base.y - py),
                ],
                filled: true,
                stroke_pt: 0.3,
            }
        }
        ArrowStyle::Tick => {
            // Slash rotated 45 degrees from the dimension line
            let half = ARROW_LENGTH_PT / 2.0;
            let (tx, ty) = ((dx + dy) * half, (dy - dx) * half);
            PageShape::Line {
                from: PagePoint::new(tip.x - tx, tip.y - ty),
                to: PagePoint::new(tip.x + tx, tip.y + ty),
                stroke_pt: 0.7,
            }
        }
    }
}

/// Flatten one dimension into extension lines, the dimension line,
/// arrowheads and its label. `part` is the part's page rectangle.
pub fn flatten(dim: &DimensionLine, transform: &ViewTransform, part: &Rect, font_pt: f64) -> Vec<PageShape> {
    let a = transform.to_page(dim.start);
    let b = transform.to_page(dim.end);
    let mut shapes = Vec::with_capacity(6);
    let label_w = label_width_pt(&dim.label, font_pt);

    match dim.orientation {
        Orientation::Horizontal => {
            let (sign, line_y) = match dim.side {
                Side::Top => (-1.0, part.y - dim.offset_pt),
                _ => (1.0, part.max_y() + dim.offset_pt),
            };
            for p in [a, b] {
                shapes.push(PageShape::Line {
                    from: PagePoint::new(p.x, p.y + sign * EXTENSION_GAP_PT),
                    to: PagePoint::new(p.x, line_y + sign * EXTENSION_OVERSHOOT_PT),
                    stroke_pt: 0.3,
                });
            }
            let (x1, x2) = if a.x <= b.x { (a.x, b.x) } else { (b.x, a.x) };
            shapes.push(PageShape::Line {
                from: PagePoint::new(x1, line_y),
                to: PagePoint::new(x2, line_y),
                stroke_pt: 0.35,
            });
            shapes.push(arrowhead(dim.arrow, PagePoint::new(x1, line_y), -1.0, 0.0));
            shapes.push(arrowhead(dim.arrow, PagePoint::new(x2, line_y), 1.0, 0.0));

            // Label on the far side of the line from the part
            let label_y = line_y + sign * (font_pt / 2.0 + 1.5);
            let (at, anchor) = if x2 - x1 >= label_w + 2.0 * ARROW_LENGTH_PT + 4.0 {
                (PagePoint::new((x1 + x2) / 2.0, label_y), TextAnchor::Middle)
            } else {
                (PagePoint::new(x2 + ARROW_LENGTH_PT + 2.0, label_y), TextAnchor::Start)
            };
            shapes.push(PageShape::Text {
                at,
                text: dim.label.clone(),
                size_pt: font_pt,
                rotation_deg: 0.0,
                anchor,
            });
        }
        Orientation::Vertical => {
            let (sign, line_x) = match dim.side {
                Side::Left => (-1.0, part.x - dim.offset_pt),
                _ => (1.0, part.max_x() + dim.offset_pt),
            };
            for p in [a, b] {
                shapes.push(PageShape::Line {
                    from: PagePoint::new(p.x + sign * EXTENSION_GAP_PT, p.y),
                    to: PagePoint::new(line_x + sign * EXTENSION_OVERSHOOT_PT, p.y),
                    stroke_pt: 0.3,
                });
            }
            let (y1, y2) = if a.y <= b.y { (a.y, b.y) } else { (b.y, a.y) };
            shapes.push(PageShape::Line {
                from: PagePoint::new(line_x, y1),
                to: PagePoint::new(line_x, y2),
                stroke_pt: 0.35,
            });
            shapes.push(arrowhead(dim.arrow, PagePoint::new(line_x, y1), 0.0, -1.0));
            shapes.push(arrowhead(dim.arrow, PagePoint::new(line_x, y2), 0.0, 1.0));

            let shape = if y2 - y1 >= label_w + 2.0 * ARROW_LENGTH_PT + 4.0 {
                // Reads bottom to top, on the far side of the line from the part
                PageShape::Text {
                    at: PagePoint::new(line_x + sign * (font_pt / 2.0 + 1.5), (y1 + y2) / 2.0),
                    text: dim.label.clone(),
                    size_pt: font_pt,
                    rotation_deg: -90.0,
                    anchor: TextAnchor::Middle,
                }
            } else {
                PageShape::Text {
                    at: PagePoint::new(line_x, y1 - ARROW_LENGTH_PT - font_pt / 2.0 - 1.0),
                    text: dim.label.clone(),
                    size_pt: font_pt,
                    rotation_deg: 0.0,
                    anchor: TextAnchor::Middle,
                }
            };
            shapes.push(shape);
        }
    }

    shapes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal(x1: f64, x2: f64, depth: u32) -> DimensionLine {
        DimensionLine::new(Point::new(x1, 0.0), Point::new(x2, 0.0), Side::Bottom, depth, "x")
    }

    #[test]
    fn test_tiers_inner_features_first() {
        let mut dims = vec![
            horizontal(0.0, 11.0, 0),
            horizontal(2.5, 8.5, 1),
            DimensionLine::new(Point::new(0.0, 0.0), Point::new(0.0, 12.0), Side::Left, 0, "h"),
        ];
        assign_tiers(&mut dims, 14.0, 16.0);
        assert_eq!(dims[1].tier, 0);
        assert_eq!(dims[0].tier, 1);
        assert_eq!(dims[0].offset_pt, 30.0);
        // Tiers are counted per side
        assert_eq!(dims[2].tier, 0);
        assert_eq!(dims[2].offset_pt, 14.0);
    }

    #[test]
    fn test_equal_depth_orders_by_span() {
        let mut dims = vec![horizontal(0.0, 9.0, 1), horizontal(0.0, 3.0, 1), horizontal(0.0, 6.0, 1)];
        assign_tiers(&mut dims, 10.0, 10.0);
        let tiers: Vec<u32> = dims.iter().map(|d| d.tier).collect();
        assert_eq!(tiers, vec![2, 0, 1]);
    }

    #[test]
    fn test_flatten_horizontal_places_label_between_arrows() {
        let mut dim = horizontal(0.0, 10.0, 0);
        dim.label = "10\"".to_string();
        dim.offset_pt = 14.0;
        let t = ViewTransform { pt_per_in: 18.0, origin: PagePoint::new(50.0, 250.0) };
        let part = t.rect_to_page(&Rect::new(0.0, 0.0, 10.0, 5.0));
        let shapes = flatten(&dim, &t, &part, 7.0);

        let text = shapes.iter().find_map(|s| match s {
            PageShape::Text { at, anchor, .. } => Some((*at, *anchor)),
            _ => None,
        });
        let (at, anchor) = text.unwrap();
        assert_eq!(anchor, TextAnchor::Middle);
        assert!((at.x - 140.0).abs() < 1e-9);
        // Dimension line sits below the part
        assert!(at.y > part.max_y());
        assert_eq!(shapes.iter().filter(|s| matches!(s, PageShape::Polygon { filled: true, .. })).count(), 2);
    }

    #[test]
    fn test_short_span_label_moves_outside() {
        let mut dim = DimensionLine::new(Point::new(0.0, 0.0), Point::new(0.0, 0.5), Side::Left, 1, "0.5\"");
        dim.offset_pt = 14.0;
        let t = ViewTransform { pt_per_in: 9.0, origin: PagePoint::new(100.0, 100.0) };
        let part = t.rect_to_page(&Rect::new(0.0, 0.0, 4.0, 4.0));
        let shapes = flatten(&dim, &t, &part, 7.0);
        let rotation = shapes.iter().find_map(|s| match s {
            PageShape::Text { rotation_deg, at, .. } => Some((*rotation_deg, *at)),
            _ => None,
        });
        let (rotation, at) = rotation.unwrap();
        assert_eq!(rotation, 0.0);
        // Above the upper arrow
        assert!(at.y < 100.0 - 0.5 * 9.0);
    }

    #[test]
    fn test_labels_sit_outside_their_line() {
        let t = ViewTransform { pt_per_in: 18.0, origin: PagePoint::new(50.0, 250.0) };
        let part = t.rect_to_page(&Rect::new(0.0, 0.0, 10.0, 5.0));
        let label_at = |dim: &DimensionLine| {
            flatten(dim, &t, &part, 7.0)
                .into_iter()
                .find_map(|s| match s {
                    PageShape::Text { at, .. } => Some(at),
                    _ => None,
                })
                .unwrap()
        };

        for side in [Side::Left, Side::Right] {
            let x = if side == Side::Left { 0.0 } else { 10.0 };
            let mut dim = DimensionLine::new(Point::new(x, 0.0), Point::new(x, 5.0), side, 0, "5\"");
            dim.offset_pt = 14.0;
            let at = label_at(&dim);
            match side {
                Side::Left => assert!(at.x < part.x - 14.0, "{side:?} label at {}", at.x),
                _ => assert!(at.x > part.max_x() + 14.0, "{side:?} label at {}", at.x),
            }
        }

        for side in [Side::Top, Side::Bottom] {
            let y = if side == Side::Bottom { 0.0 } else { 5.0 };
            let mut dim = DimensionLine::new(Point::new(0.0, y), Point::new(10.0, y), side, 0, "10\"");
            dim.offset_pt = 14.0;
            let at = label_at(&dim);
            match side {
                Side::Top => assert!(at.y < part.y - 14.0, "{side:?} label at {}", at.y),
                _ => assert!(at.y > part.max_y() + 14.0, "{side:?} label at {}", at.y),
            }
        }
    }

    #[test]
    fn test_tick_arrows() {
        let dim = horizontal(0.0, 10.0, 0).with_arrow(ArrowStyle::Tick);
        let t = ViewTransform { pt_per_in: 9.0, origin: PagePoint::new(0.0, 100.0) };
        let part = t.rect_to_page(&Rect::new(0.0, 0.0, 10.0, 2.0));
        let shapes = flatten(&dim, &t, &part, 7.0);
        assert!(!shapes.iter().any(|s| matches!(s, PageShape::Polygon { .. })));
    }
}
