//! Curve intersection
//!
//! Finds where two curves sampled on the same grid cross, by sign-change
//! detection on their difference and linear interpolation between the two
//! bracketing samples. Only the first crossing (lowest volatility) is
//! reported; later crossings are counted so callers can flag them.

use crate::grid::{AnchorCurve, VolatilityGrid};

/// Sign with zero as its own class, so an exact touch still registers.
fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// A located crossing between two sampled curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    /// Interpolated volatility of the first sign change.
    pub sigma: f64,
    /// Grid samples bracketing the crossing.
    pub bracket: (f64, f64),
    /// Total sign changes seen across the scanned range.
    pub sign_changes: usize,
}

/// Pointwise `a - b` over the samples where both sides are defined.
fn defined_differences(
    sigmas: &[f64],
    a: &[Option<f64>],
    b: &[Option<f64>],
) -> Vec<(f64, f64)> {
    debug_assert_eq!(sigmas.len(), a.len());
    debug_assert_eq!(sigmas.len(), b.len());

    sigmas
        .iter()
        .zip(a.iter().zip(b))
        .filter_map(|(&s, pair)| match pair {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((s, x - y)),
            _ => None,
        })
        .collect()
}

/// First crossing of `a` and `b` over `sigmas`, or `None` if they never change order.
pub fn find_crossing(sigmas: &[f64], a: &[Option<f64>], b: &[Option<f64>]) -> Option<Crossing> {
    let diffs = defined_differences(sigmas, a, b);

    let changes: Vec<usize> = diffs
        .windows(2)
        .enumerate()
        .filter(|(_, w)| sign(w[0].1) != sign(w[1].1))
        .map(|(i, _)| i)
        .collect();

    let &first = changes.first()?;
    let (x1, d1) = diffs[first];
    let (x2, d2) = diffs[first + 1];

    Some(Crossing {
        sigma: x1 - d1 * (x2 - x1) / (d2 - d1),
        bracket: (x1, x2),
        sign_changes: changes.len(),
    })
}

/// Equilibrium volatility where `a` and `b` first cross on `grid`.
pub fn find_intersection(grid: &VolatilityGrid, a: &AnchorCurve, b: &AnchorCurve) -> Option<f64> {
    let crossing = find_crossing(grid.sigmas(), a.values(), b.values())?;
    if crossing.sign_changes > 1 {
        log::warn!(
            "{} crossings on the grid, reporting the first at sigma={:.4}",
            crossing.sign_changes,
            crossing.sigma
        );
    }
    Some(crossing.sigma)
}
