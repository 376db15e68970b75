//! # Drawing Scale
//!
//! Views are drawn at one of a short list of "nice" scales, tried from the
//! largest down. The first scale at which the part plus its annotation bands
//! fits the drawing area wins.

use serde::{Deserialize, Serialize};

use crate::units::POINTS_PER_INCH;

/// Drawing scale `1:denominator` relative to a printed inch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scale {
    pub denominator: u32,
}

impl Scale {
    pub const fn new(denominator: u32) -> Self {
        Scale { denominator }
    }

    /// Page points per model inch
    pub fn pt_per_in(self) -> f64 {
        POINTS_PER_INCH / self.denominator as f64
    }

    pub fn label(self) -> String {
        format!("1:{}", self.denominator)
    }
}

/// Candidate scales, largest first.
pub const NICE_SCALES: [Scale; 5] = [Scale::new(1), Scale::new(2), Scale::new(4), Scale::new(8), Scale::new(16)];

/// Space reserved around the part for dimensions and leaders, in points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bands {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
}

/// Outcome of scale selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleChoice {
    pub scale: Scale,
    pub fits: bool,
}

/// Page footprint of a part at `scale`, bands included.
pub fn footprint(scale: Scale, width_in: f64, height_in: f64, bands: &Bands) -> (f64, f64) {
    let s = scale.pt_per_in();
    (
        bands.left + width_in * s + bands.right,
        bands.top + height_in * s + bands.bottom,
    )
}

/// Pick the largest nice scale at which the part fits `area_w x area_h`.
///
/// Falls back to the smallest scale with `fits = false` when nothing fits.
pub fn select(width_in: f64, height_in: f64, bands: &Bands, area_w_pt: f64, area_h_pt: f64) -> ScaleChoice {
    NICE_SCALES
        .iter()
        .copied()
        .find(|scale| {
            let (w, h) = footprint(*scale, width_in, height_in, bands);
            w <= area_w_pt && h <= area_h_pt
        })
        .map(|scale| ScaleChoice { scale, fits: true })
        .unwrap_or(ScaleChoice {
            scale: NICE_SCALES[NICE_SCALES.len() - 1],
            fits: false,
        })
}
