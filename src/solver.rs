//! Self-consistent psychological time
//!
//! For a fixed volatility the exact psychological horizon n solves
//!
//! ```text
//! n = 1 / (r + c(sigma, n))
//! ```
//!
//! where c is the risk compensation rate from [`crate::premium`]. There is
//! no closed form, so the residual `f(n) = n - 1/(r + c(sigma, n))` is
//! bracketed around a linear-anchor seed and bisected.
//!
//! A failed point is a value, not an error: the sweep records it and moves on.

use serde::Serialize;

use crate::config::SolverPolicy;
use crate::error::SolveFailure;
use crate::premium::risk_premium;

/// Outcome of solving the fixed point at one volatility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolveResult {
    Converged { n: f64, iterations: usize },
    Failed(SolveFailure),
}

impl SolveResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Converged { n, .. } => Some(*n),
            Self::Failed(_) => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    pub fn failure(&self) -> Option<&SolveFailure> {
        match self {
            Self::Converged { .. } => None,
            Self::Failed(reason) => Some(reason),
        }
    }
}

/// A root located by [`bisect`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    pub x: f64,
    pub iterations: usize,
}

/// Bisection on `[low, high]`.
///
/// Requires `low < high` and `f(low)` and `f(high)` to differ in sign (a
/// zero at either end is accepted as the root). Stops once the half-width of the bracket drops
/// below `tolerance` or the midpoint is an exact zero.
pub fn bisect(
    f: impl Fn(f64) -> f64,
    low: f64,
    high: f64,
    tolerance: f64,
    max_iterations: usize,
) -> Result<Root, SolveFailure> {
    let f_low = f(low);
    let f_high = f(high);

    if !(low < high) {
        return Err(SolveFailure::InvalidBracket {
            low,
            high,
            f_low,
            f_high,
        });
    }
    if !f_low.is_finite() {
        return Err(SolveFailure::NonFinite { n: low });
    }
    if !f_high.is_finite() {
        return Err(SolveFailure::NonFinite { n: high });
    }
    if f_low == 0.0 {
        return Ok(Root { x: low, iterations: 0 });
    }
    if f_high == 0.0 {
        return Ok(Root { x: high, iterations: 0 });
    }
    if f_low.signum() == f_high.signum() {
        return Err(SolveFailure::InvalidBracket {
            low,
            high,
            f_low,
            f_high,
        });
    }

    let mut lo = low;
    let mut hi = high;
    let mut f_lo = f_low;

    for iteration in 1..=max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if !f_mid.is_finite() {
            return Err(SolveFailure::NonFinite { n: mid });
        }

        let half_width = 0.5 * (hi - lo);
        if f_mid == 0.0 || half_width < tolerance {
            return Ok(Root {
                x: mid,
                iterations: iteration,
            });
        }

        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Err(SolveFailure::NotConverged {
        iterations: max_iterations,
        width: hi - lo,
    })
}

/// Fixed-point residual `n - 1/(r + c(sigma, n))`.
pub fn residual(sigma: f64, n: f64, risk_free_rate: f64) -> f64 {
    n - 1.0 / (risk_free_rate + risk_premium(sigma, n))
}

/// Solve for the exact psychological horizon at `sigma`.
pub fn solve_psychological_time(
    sigma: f64,
    risk_free_rate: f64,
    policy: &SolverPolicy,
) -> SolveResult {
    let (low, high) = policy.bracket(sigma, risk_free_rate);
    let outcome = bisect(
        |n| residual(sigma, n, risk_free_rate),
        low,
        high,
        policy.tolerance,
        policy.max_iterations,
    );

    match outcome {
        Ok(root) if root.x.is_finite() && root.x > 0.0 => SolveResult::Converged {
            n: root.x,
            iterations: root.iterations,
        },
        Ok(root) => SolveResult::Failed(SolveFailure::NonFinite { n: root.x }),
        Err(reason) => {
            log::debug!("sigma={:.4}: {}", sigma, reason);
            SolveResult::Failed(reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const R: f64 = 0.018;

    #[test]
    fn test_bisect_finds_sqrt_two() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 1e-10, 200).unwrap();
        assert_abs_diff_eq!(root.x, 2.0_f64.sqrt(), epsilon = 1e-9);
        assert!(root.iterations > 10);
    }

    #[test]
    fn test_bisect_decreasing_function() {
        let root = bisect(|x| 1.0 - x, 0.0, 3.0, 1e-8, 200).unwrap();
        assert_abs_diff_eq!(root.x, 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_bisect_rejects_bracket_without_sign_change() {
        let err = bisect(|x| x * x + 1.0, -1.0, 1.0, 1e-6, 100).unwrap_err();
        assert!(matches!(err, SolveFailure::InvalidBracket { .. }));
    }

    #[test]
    fn test_bisect_rejects_inverted_bracket() {
        // signs differ, but the interval is reversed
        let err = bisect(|x| x - 0.3, 2.0, 0.0, 1e-6, 100).unwrap_err();
        assert!(matches!(
            err,
            SolveFailure::InvalidBracket { low, high, .. } if low == 2.0 && high == 0.0
        ));

        let err = bisect(|x| x - 0.3, 0.5, 0.5, 1e-6, 100).unwrap_err();
        assert!(matches!(err, SolveFailure::InvalidBracket { .. }));
    }

    #[test]
    fn test_bisect_reports_exhausted_budget() {
        let err = bisect(|x| x - 0.3, 0.0, 1.0, 1e-12, 5).unwrap_err();
        assert_eq!(
            err,
            SolveFailure::NotConverged {
                iterations: 5,
                width: 1.0 / 32.0,
            }
        );
    }

    #[test]
    fn test_bisect_flags_non_finite_residual() {
        let err = bisect(|x| if x > 0.9 { f64::NAN } else { x - 0.5 }, 0.0, 1.0, 1e-6, 100)
            .unwrap_err();
        assert!(matches!(err, SolveFailure::NonFinite { .. }));
    }

    #[test]
    fn test_bisect_accepts_root_on_endpoint() {
        let root = bisect(|x| x - 1.0, 1.0, 2.0, 1e-6, 100).unwrap();
        assert_eq!(root.x, 1.0);
        assert_eq!(root.iterations, 0);
    }

    #[test]
    fn test_fixed_point_is_self_consistent() {
        let policy = SolverPolicy::default();
        for i in 0..=30 {
            let sigma = 0.1 + i as f64 * 0.03;
            let result = solve_psychological_time(sigma, R, &policy);
            let n = result
                .value()
                .unwrap_or_else(|| panic!("sigma={} failed: {:?}", sigma, result));
            assert!(n.is_finite() && n > 0.0);
            assert!(
                residual(sigma, n, R).abs() < 1e-5,
                "sigma={} n={} residual={}",
                sigma,
                n,
                residual(sigma, n, R)
            );
        }
    }

    #[test]
    fn test_baseline_values() {
        let policy = SolverPolicy::default();
        let n = solve_psychological_time(0.5, R, &policy).value().unwrap();
        assert_abs_diff_eq!(n, 22.589, epsilon = 1e-2);

        let n = solve_psychological_time(0.1, R, &policy).value().unwrap();
        assert_abs_diff_eq!(n, 47.393, epsilon = 1e-2);
    }

    #[test]
    fn test_exact_horizon_falls_with_volatility() {
        let policy = SolverPolicy::default();
        let low = solve_psychological_time(0.2, R, &policy).value().unwrap();
        let high = solve_psychological_time(0.6, R, &policy).value().unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_zero_volatility_fails_without_panicking() {
        // c = 0 so the fixed point is 1/r = 55.6, outside the capped bracket
        let result = solve_psychological_time(0.0, R, &SolverPolicy::default());
        assert!(matches!(
            result,
            SolveResult::Failed(SolveFailure::InvalidBracket { .. })
        ));
        assert_eq!(result.value(), None);
    }

    #[test]
    fn test_zero_volatility_converges_with_wider_cap() {
        let policy = SolverPolicy {
            cap: 100.0,
            ..SolverPolicy::default()
        };
        let n = solve_psychological_time(0.0, R, &policy).value().unwrap();
        assert_abs_diff_eq!(n, 1.0 / R, epsilon = 1e-5);
    }

    #[test]
    fn test_tail_sentinel_is_an_ordinary_number() {
        assert!(residual(40.0, 4.0, R).is_finite());
        assert_abs_diff_eq!(residual(40.0, 4.0, R), 4.0, epsilon = 1e-9);

        // stretch the bracket so its upper end sits deep in the tail
        let wide = SolverPolicy {
            high_scale: 1000.0,
            cap: 1000.0,
            ..SolverPolicy::default()
        };
        let (_, high) = wide.bracket(4.0, R);
        assert_eq!(crate::premium::risk_premium(4.0, high), crate::premium::TAIL_RATE_SENTINEL);

        let stretched = solve_psychological_time(4.0, R, &wide).value().unwrap();
        let default = solve_psychological_time(4.0, R, &SolverPolicy::default())
            .value()
            .unwrap();
        assert_abs_diff_eq!(stretched, default, epsilon = 1e-5);
        assert!(residual(4.0, stretched, R).abs() < 1e-5);
    }

    #[test]
    fn test_extreme_volatility_has_no_bracket() {
        let result = solve_psychological_time(20.0, R, &SolverPolicy::default());
        assert!(matches!(
            result,
            SolveResult::Failed(SolveFailure::InvalidBracket { .. })
        ));
    }

    #[test]
    fn test_clamped_bracket_crossing_over_is_a_failure() {
        // low clamps up to the floor (0.5) while high = 0.05 * 4.59 = 0.23
        let policy = SolverPolicy {
            low_scale: 0.01,
            high_scale: 0.05,
            ..SolverPolicy::default()
        };
        assert!(policy.validate().is_ok());
        let (low, high) = policy.bracket(0.5, R);
        assert!(low > high);

        let result = solve_psychological_time(0.5, R, &policy);
        assert!(matches!(
            result,
            SolveResult::Failed(SolveFailure::InvalidBracket { .. })
        ));
    }

    #[test]
    fn test_tiny_budget_reports_non_convergence() {
        let policy = SolverPolicy {
            max_iterations: 3,
            ..SolverPolicy::default()
        };
        let result = solve_psychological_time(0.5, R, &policy);
        assert!(matches!(
            result,
            SolveResult::Failed(SolveFailure::NotConverged { iterations: 3, .. })
        ));
    }
}
