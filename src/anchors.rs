//! Anchor Models
//!
//! Two competing horizons as functions of total volatility sigma:
//!
//! - Physical anchor: expected first-passage time of a geometric Brownian
//!   motion with drift g to reach the target multiple M,
//!   `E[T] = ln(M) / (g - sigma^2/2)`. Undefined once the geometric drift
//!   is non-positive (the meltdown region).
//! - Psychological anchor (linear): the holding horizon implied by a
//!   discount rate with linear risk compensation, `n = 1 / (r + lambda*sigma)`.

use crate::grid::{AnchorCurve, VolatilityGrid};

/// Geometric drift `g - sigma^2/2`.
pub fn geometric_drift(sigma: f64, growth_rate: f64) -> f64 {
    growth_rate - 0.5 * sigma.powi(2)
}

/// Expected time to reach `target_multiple`, or `None` in the meltdown region.
pub fn physical_anchor(sigma: f64, growth_rate: f64, target_multiple: f64) -> Option<f64> {
    let mu = geometric_drift(sigma, growth_rate);
    if mu > 0.0 {
        Some(target_multiple.ln() / mu)
    } else {
        None
    }
}

pub fn psychological_anchor_linear(sigma: f64, lambda: f64, risk_free_rate: f64) -> f64 {
    1.0 / (risk_free_rate + lambda * sigma)
}

/// Volatility where the geometric drift hits zero: `sqrt(2g)`.
pub fn meltdown_boundary(growth_rate: f64) -> f64 {
    (2.0 * growth_rate).max(0.0).sqrt()
}

pub fn physical_curve(
    grid: &VolatilityGrid,
    growth_rate: f64,
    target_multiple: f64,
) -> AnchorCurve {
    AnchorCurve::sample(grid, |s| physical_anchor(s, growth_rate, target_multiple))
}

pub fn linear_curve(grid: &VolatilityGrid, lambda: f64, risk_free_rate: f64) -> AnchorCurve {
    AnchorCurve::sample_defined(grid, |s| psychological_anchor_linear(s, lambda, risk_free_rate))
}
