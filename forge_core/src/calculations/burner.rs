//! # Ribbon Burner Sizing
//!
//! A ribbon burner is a cast refractory block with many small flame holes,
//! fed by a square tube plenum. Hole count is proportional to chamber volume
//! (one hole per 18 ci by default, never fewer than 12). The holes are split
//! into staggered rows, and the casting length follows from the largest row.
//!
//! ## Example
//!
//! ```rust
//! use forge_core::calculations::burner::design;
//! use forge_core::config::BurnerPolicy;
//!
//! let burner = design(784.0, &BurnerPolicy::default()).unwrap();
//! assert_eq!(burner.hole_count, 44);
//! assert_eq!(burner.rows.iter().map(|r| r.holes).collect::<Vec<_>>(), vec![15, 15, 14]);
//! assert_eq!(burner.holes_per_row, 15);
//! ```

use serde::{Deserialize, Serialize};

use crate::config::BurnerPolicy;
use crate::errors::{ensure_positive, ForgeError, ForgeResult};

/// One row of flame holes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BurnerRow {
    pub holes: u32,
    /// Stagger offset along the row (half a pitch on odd rows)
    pub offset_in: f64,
}

/// Burner design derived from chamber volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BurnerDesign {
    pub hole_count: u32,
    pub rows: Vec<BurnerRow>,
    /// Largest row count; drives the casting length
    pub holes_per_row: u32,
    pub hole_pitch_in: f64,
    pub hole_diameter_in: f64,
    /// Refractory head casting length
    pub length_in: f64,
    /// Square tube housing length
    pub housing_length_in: f64,
    /// Square tube size
    pub body_width_in: f64,
    /// Top panel opening along the chamber length: the casting plus clearance
    pub port_length_in: f64,
    /// Top panel opening across the chamber: the housing plus clearance
    pub port_width_in: f64,
}

impl BurnerDesign {
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Hole centers relative to the casting's lower-left corner, row by row.
    pub fn hole_centers(&self) -> Vec<(f64, f64)> {
        let row_spacing = self.body_width_in / (self.rows.len() as f64 + 1.0);
        let margin = (self.length_in - (self.holes_per_row.saturating_sub(1)) as f64 * self.hole_pitch_in) / 2.0;
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row_idx, row)| {
                let y = row_spacing * (row_idx as f64 + 1.0);
                (0..row.holes).map(move |i| (margin + row.offset_in + i as f64 * self.hole_pitch_in, y))
            })
            .collect()
    }
}

/// Size the ribbon burner for a chamber of `volume_ci` cubic inches.
///
/// # Errors
///
/// `ForgeError::Range` when the volume or any derived length is not a
/// positive finite number.
pub fn design(volume_ci: f64, policy: &BurnerPolicy) -> ForgeResult<BurnerDesign> {
    ensure_positive("volume_ci", volume_ci)?;

    let proportional = (volume_ci / policy.hole_coverage_ci).round();
    if !proportional.is_finite() || proportional > u32::MAX as f64 {
        return Err(ForgeError::range("burner_holes", proportional.to_string(), "Hole count overflow"));
    }
    let hole_count = (proportional as u32).max(policy.min_holes);
    if policy.rows == 0 {
        return Err(ForgeError::range("burner_rows", "0", "At least one row is required"));
    }

    // Balanced rows: remainder goes to the first rows
    let base = hole_count / policy.rows;
    let remainder = hole_count % policy.rows;
    let rows: Vec<BurnerRow> = (0..policy.rows)
        .map(|idx| BurnerRow {
            holes: base + u32::from(idx < remainder),
            offset_in: if idx % 2 == 1 { policy.hole_pitch_in / 2.0 } else { 0.0 },
        })
        .collect();
    let holes_per_row = rows.iter().map(|r| r.holes).max().unwrap_or(0);
    if holes_per_row == 0 {
        return Err(ForgeError::range("holes_per_row", "0", "Every burner needs flame holes"));
    }

    let length_in = ensure_positive(
        "burner_length_in",
        holes_per_row as f64 * policy.hole_pitch_in + policy.end_margin_in,
    )?;
    let housing_length_in = ensure_positive("housing_length_in", length_in + policy.housing_extra_in)?;
    let port_length_in = ensure_positive("port_length_in", length_in + policy.port_clearance_in)?;
    let port_width_in = ensure_positive("port_width_in", policy.body_width_in + policy.port_clearance_in)?;

    tracing::debug!(hole_count, holes_per_row, length_in, "sized ribbon burner");

    Ok(BurnerDesign {
        hole_count,
        rows,
        holes_per_row,
        hole_pitch_in: policy.hole_pitch_in,
        hole_diameter_in: policy.hole_diameter_in,
        length_in,
        housing_length_in,
        body_width_in: policy.body_width_in,
        port_length_in,
        port_width_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_chamber() {
        let burner = design(784.0, &BurnerPolicy::default()).unwrap();
        assert_eq!(burner.hole_count, 44);
        assert_eq!(burner.row_count(), 3);
        assert_eq!(burner.holes_per_row, 15);
        assert!((burner.length_in - 12.75).abs() < 1e-9);
        assert!((burner.housing_length_in - 14.75).abs() < 1e-9);
        assert!((burner.port_length_in - 13.25).abs() < 1e-9);
        assert!((burner.port_width_in - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_hole_count() {
        let burner = design(100.0, &BurnerPolicy::default()).unwrap();
        assert_eq!(burner.hole_count, 12);
        assert!(burner.rows.iter().all(|r| r.holes == 4));
    }

    #[test]
    fn test_holes_non_decreasing_in_volume() {
        let policy = BurnerPolicy::default();
        let mut previous = 0;
        let mut volume = 100.0;
        while volume <= 2000.0 {
            let holes = design(volume, &policy).unwrap().hole_count;
            assert!(holes >= 12);
            assert!(holes >= previous, "holes dropped at {volume} ci");
            previous = holes;
            volume += 7.5;
        }
    }

    #[test]
    fn test_rows_staggered_and_balanced() {
        let burner = design(1000.0, &BurnerPolicy::default()).unwrap();
        // round(1000 / 18) = 56 -> 19, 19, 18
        assert_eq!(burner.hole_count, 56);
        let counts: Vec<u32> = burner.rows.iter().map(|r| r.holes).collect();
        assert_eq!(counts, vec![19, 19, 18]);
        assert_eq!(burner.rows[0].offset_in, 0.0);
        assert_eq!(burner.rows[1].offset_in, 0.375);
        assert_eq!(burner.rows[2].offset_in, 0.0);
        assert_eq!(counts.iter().sum::<u32>(), burner.hole_count);
    }

    #[test]
    fn test_hole_centers_inside_casting() {
        let burner = design(784.0, &BurnerPolicy::default()).unwrap();
        let centers = burner.hole_centers();
        assert_eq!(centers.len(), 44);
        for (x, y) in centers {
            assert!(x > 0.0 && x < burner.length_in);
            assert!(y > 0.0 && y < burner.body_width_in);
        }
    }

    #[test]
    fn test_invalid_volume() {
        assert!(matches!(design(0.0, &BurnerPolicy::default()), Err(ForgeError::Range { .. })));
        assert!(matches!(design(f64::NAN, &BurnerPolicy::default()), Err(ForgeError::Range { .. })));
    }
}
