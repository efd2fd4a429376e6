//! Exact risk compensation rate c(sigma, n)
//!
//! Reflection-style first-passage argument: the probability that a driftless
//! Brownian path with volatility sigma stays clear of a barrier over a
//! horizon n is `2 * (1 - Phi(sigma * sqrt(n) / 4))`. The per-period rate
//! that compensates for that survival probability is
//!
//! ```text
//! c(sigma, n) = -ln(2 * (1 - Phi(sigma * sqrt(n) / 4))) / n
//! ```

use std::f64::consts::SQRT_2;

use statrs::function::erf::erfc;

/// Below this the survival probability is treated as zero.
pub const TAIL_PROBABILITY_FLOOR: f64 = 1e-12;

/// Finite stand-in for an infinite rate deep in the tail.
pub const TAIL_RATE_SENTINEL: f64 = 1e12;

/// Standard normal CDF: Phi(x) = erfc(-x / sqrt(2)) / 2
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / SQRT_2)
}

/// c(sigma, n). Infinite for n <= 0, [`TAIL_RATE_SENTINEL`] deep in the tail.
pub fn risk_premium(sigma: f64, n: f64) -> f64 {
    if n <= 0.0 {
        return f64::INFINITY;
    }

    let x = sigma * n.sqrt() / 4.0;
    let arg = 2.0 * (1.0 - norm_cdf(x));
    if arg < TAIL_PROBABILITY_FLOOR {
        return TAIL_RATE_SENTINEL;
    }

    -arg.ln() / n
}
