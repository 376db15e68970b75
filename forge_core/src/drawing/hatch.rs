//! # Section Hatching
//!
//! Cut material is filled with parallel 45 degree lines at a fixed page
//! spacing, whatever the drawing scale. Lines are members of the family
//! `x + y = c` in page coordinates (rising to the right on a `y`-down page),
//! with `c` on a grid anchored at the page origin so adjacent regions line up.
//!
//! Each line is clipped to the region's boundary rectangle and then has the
//! intervals covered by any hole removed.

use super::{PagePoint, Rect};

/// Perpendicular distance between hatch lines, in points
pub const HATCH_SPACING_PT: f64 = 6.0;

/// Segments shorter than this are dropped
const MIN_SEGMENT_PT: f64 = 0.25;

/// Range of `x` where the line `x + y = c` crosses `rect`, if any.
fn clip_interval(rect: &Rect, c: f64) -> Option<(f64, f64)> {
    let lo = rect.x.max(c - rect.max_y());
    let hi = rect.max_x().min(c - rect.y);
    (hi > lo).then_some((lo, hi))
}

/// Remove `cut` from every interval in `spans`.
fn subtract(spans: Vec<(f64, f64)>, cut: (f64, f64)) -> Vec<(f64, f64)> {
    let mut out = Vec::with_capacity(spans.len() + 1);
    for (lo, hi) in spans {
        if cut.1 <= lo || cut.0 >= hi {
            out.push((lo, hi));
            continue;
        }
        if cut.0 > lo {
            out.push((lo, cut.0));
        }
        if cut.1 < hi {
            out.push((cut.1, hi));
        }
    }
    out
}

/// Hatch segments covering `boundary` minus `holes`, all in page space.
pub fn hatch_segments(boundary: &Rect, holes: &[Rect], spacing_pt: f64) -> Vec<(PagePoint, PagePoint)> {
    if boundary.width <= 0.0 || boundary.height <= 0.0 || spacing_pt <= 0.0 {
        return Vec::new();
    }

    // Lines x + y = c are spacing * sqrt(2) apart in c
    let step = spacing_pt * std::f64::consts::SQRT_2;
    let c_min = boundary.x + boundary.y;
    let c_max = boundary.max_x() + boundary.max_y();
    let first = (c_min / step).ceil() as i64;
    let last = (c_max / step).floor() as i64;

    let mut segments = Vec::new();
    for k in first..=last {
        let c = k as f64 * step;
        let Some(span) = clip_interval(boundary, c) else {
            continue;
        };
        let mut spans = vec![span];
        for hole in holes {
            if let Some(cut) = clip_interval(hole, c) {
                spans = subtract(spans, cut);
            }
        }
        segments.extend(
            spans
                .into_iter()
                .filter(|(lo, hi)| (hi - lo) * std::f64::consts::SQRT_2 >= MIN_SEGMENT_PT)
                .map(|(lo, hi)| (PagePoint::new(lo, c - lo), PagePoint::new(hi, c - hi))),
        );
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inside_any(holes: &[Rect], x: f64, y: f64) -> bool {
        holes
            .iter()
            .any(|h| x > h.x + 1e-6 && x < h.max_x() - 1e-6 && y > h.y + 1e-6 && y < h.max_y() - 1e-6)
    }

    #[test]
    fn test_segments_stay_inside_boundary() {
        let boundary = Rect::new(10.0, 20.0, 100.0, 60.0);
        let segments = hatch_segments(&boundary, &[], HATCH_SPACING_PT);
        assert!(!segments.is_empty());
        let within = |p: &PagePoint| {
            p.x >= boundary.x - 1e-6
                && p.x <= boundary.max_x() + 1e-6
                && p.y >= boundary.y - 1e-6
                && p.y <= boundary.max_y() + 1e-6
        };
        for (a, b) in &segments {
            assert!(within(a) && within(b));
            // 45 degrees: dx == -dy
            assert!(((b.x - a.x) + (b.y - a.y)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_holes_are_not_hatched() {
        let boundary = Rect::new(0.0, 0.0, 120.0, 120.0);
        let holes = [Rect::new(20.0, 20.0, 80.0, 80.0), Rect::new(50.0, 0.0, 10.0, 20.0)];
        let segments = hatch_segments(&boundary, &holes, HATCH_SPACING_PT);
        for (a, b) in &segments {
            for t in [0.1, 0.5, 0.9] {
                let x = a.x + (b.x - a.x) * t;
                let y = a.y + (b.y - a.y) * t;
                assert!(!inside_any(&holes, x, y), "hatch inside hole at ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_spacing_is_fixed_in_page_space() {
        // Doubling the region size roughly doubles the line count per axis
        let small = hatch_segments(&Rect::new(0.0, 0.0, 60.0, 60.0), &[], HATCH_SPACING_PT).len();
        let large = hatch_segments(&Rect::new(0.0, 0.0, 120.0, 120.0), &[], HATCH_SPACING_PT).len();
        assert!((large as f64 / small as f64 - 2.0).abs() < 0.1);
    }

    #[test]
    fn test_fully_covered_region_is_empty() {
        let boundary = Rect::new(0.0, 0.0, 30.0, 30.0);
        let holes = [Rect::new(-1.0, -1.0, 32.0, 32.0)];
        assert!(hatch_segments(&boundary, &holes, HATCH_SPACING_PT).is_empty());
    }
}
