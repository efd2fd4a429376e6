//! Temporal paradox analysis
//!
//! Compares the two horizons point by point:
//!
//! - Temporal paradox index `TPI = E[T] - n`. Positive TPI means reaching the
//!   target physically takes longer than the horizon investors price in.
//! - Mispricing zone: volatilities between the first crossing of n and E[T]
//!   and the meltdown boundary, where TPI stays positive.
//! - Rate scenarios: how the linear equilibrium moves with the risk-free rate.

use serde::Serialize;

use crate::anchors::{linear_curve, meltdown_boundary, physical_curve};
use crate::config::Parameters;
use crate::error::Result;
use crate::grid::{AnchorCurve, VolatilityGrid};
use crate::intersection::find_intersection;

/// Risk coefficient used for rate scenarios.
pub const SCENARIO_RISK_COEFFICIENT: f64 = 0.2;

/// Low-rate and normal-rate environments.
pub const BASELINE_RATES: [f64; 2] = [0.018, 0.040];

/// `E[T] - n` at every point where both are defined.
pub fn temporal_paradox_index(physical: &AnchorCurve, psychological: &AnchorCurve) -> AnchorCurve {
    debug_assert_eq!(physical.len(), psychological.len());
    AnchorCurve::from_values(
        physical
            .values()
            .iter()
            .zip(psychological.values())
            .map(|(et, n)| Some((*et)? - (*n)?))
            .collect(),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MispricingZone {
    /// Equilibrium where the horizons cross.
    pub start: f64,
    /// Meltdown boundary sqrt(2g).
    pub end: f64,
}

impl MispricingZone {
    /// Zone opening at the equilibrium `start`; `None` if that already lies
    /// past the meltdown boundary.
    pub fn from_equilibrium(start: f64, growth_rate: f64) -> Option<Self> {
        let end = meltdown_boundary(growth_rate);
        (start < end).then_some(Self { start, end })
    }

    pub fn contains(&self, sigma: f64) -> bool {
        sigma > self.start && sigma < self.end
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Zone between the first crossing and the meltdown boundary, if the curves cross.
pub fn mispricing_zone(
    grid: &VolatilityGrid,
    physical: &AnchorCurve,
    psychological: &AnchorCurve,
    growth_rate: f64,
) -> Option<MispricingZone> {
    let start = find_intersection(grid, psychological, physical)?;
    MispricingZone::from_equilibrium(start, growth_rate)
}

/// Linear equilibrium under one risk-free rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RateScenario {
    pub risk_free_rate: f64,
    pub sigma_star: Option<f64>,
    pub zone: Option<MispricingZone>,
}

/// Equilibrium and mispricing zone of the linear anchor for each rate.
pub fn rate_scenarios(
    params: &Parameters,
    rates: &[f64],
    lambda: f64,
) -> Result<Vec<RateScenario>> {
    params.validate()?;
    for &rate in rates {
        Parameters {
            risk_free_rate: rate,
            ..params.clone()
        }
        .validate()?;
    }

    let grid = VolatilityGrid::from_parameters(params)?;
    let physical = physical_curve(&grid, params.growth_rate, params.target_multiple);

    Ok(rates
        .iter()
        .map(|&risk_free_rate| {
            let psychological = linear_curve(&grid, lambda, risk_free_rate);
            let sigma_star = find_intersection(&grid, &psychological, &physical);
            let zone = sigma_star
                .and_then(|start| MispricingZone::from_equilibrium(start, params.growth_rate));
            log::debug!("r={:.3}: sigma*={:?}", risk_free_rate, sigma_star);
            RateScenario {
                risk_free_rate,
                sigma_star,
                zone,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tpi_sign_flips_at_equilibrium() {
        let params = Parameters::default();
        let grid = VolatilityGrid::from_parameters(&params).unwrap();
        let physical = physical_curve(&grid, params.growth_rate, params.target_multiple);
        let psychological = linear_curve(&grid, 0.2, params.risk_free_rate);
        let tpi = temporal_paradox_index(&physical, &psychological);

        let zone = mispricing_zone(&grid, &physical, &psychological, params.growth_rate).unwrap();
        for (sigma, value) in grid.iter().zip(tpi.values()) {
            match value {
                Some(v) if zone.contains(sigma) => assert!(*v > 0.0, "sigma={}", sigma),
                Some(v) if sigma < zone.start => assert!(*v < 0.0, "sigma={}", sigma),
                Some(_) => {}
                None => assert!(sigma >= zone.end),
            }
        }
    }

    #[test]
    fn test_tpi_undefined_where_either_side_is() {
        let physical = AnchorCurve::from_values(vec![Some(5.0), None, Some(2.0)]);
        let psychological = AnchorCurve::from_values(vec![Some(3.0), Some(1.0), None]);
        let tpi = temporal_paradox_index(&physical, &psychological);
        assert_eq!(tpi.values(), &[Some(2.0), None, None]);
    }

    #[test]
    fn test_zone_spans_to_meltdown() {
        let params = Parameters::default();
        let grid = VolatilityGrid::from_parameters(&params).unwrap();
        let physical = physical_curve(&grid, params.growth_rate, params.target_multiple);
        let psychological = linear_curve(&grid, 0.2, params.risk_free_rate);
        let zone = mispricing_zone(&grid, &physical, &psychological, params.growth_rate).unwrap();

        assert_abs_diff_eq!(zone.start, 0.4893, epsilon = 1e-3);
        assert_abs_diff_eq!(zone.end, 0.4_f64.sqrt(), epsilon = 1e-12);
        assert!(zone.width() > 0.1);
    }

    #[test]
    fn test_higher_rate_lowers_equilibrium() {
        let scenarios =
            rate_scenarios(&Parameters::default(), &BASELINE_RATES, SCENARIO_RISK_COEFFICIENT)
                .unwrap();
        assert_eq!(scenarios.len(), 2);

        let low = scenarios[0].sigma_star.unwrap();
        let high = scenarios[1].sigma_star.unwrap();
        assert_abs_diff_eq!(low, 0.4893, epsilon = 1e-3);
        assert_abs_diff_eq!(high, 0.4645, epsilon = 1e-3);
        assert!(scenarios[1].zone.unwrap().width() > scenarios[0].zone.unwrap().width());
        for scenario in &scenarios {
            assert_eq!(scenario.zone.map(|z| z.start), scenario.sigma_star);
        }
    }

    #[test]
    fn test_zone_needs_equilibrium_below_meltdown() {
        let zone = MispricingZone::from_equilibrium(0.5, 0.2).unwrap();
        assert_eq!(zone.start, 0.5);
        assert_abs_diff_eq!(zone.end, 0.4_f64.sqrt(), epsilon = 1e-12);
        assert!(MispricingZone::from_equilibrium(0.7, 0.2).is_none());
    }

    #[test]
    fn test_scenario_without_crossing_has_no_zone() {
        let params = Parameters {
            sigma_max: 0.30,
            ..Parameters::default()
        };
        let scenarios = rate_scenarios(&params, &[0.018], 0.2).unwrap();
        assert_eq!(scenarios[0].sigma_star, None);
        assert_eq!(scenarios[0].zone, None);
    }

    #[test]
    fn test_rate_scenarios_reject_bad_rate() {
        assert!(rate_scenarios(&Parameters::default(), &[0.018, -0.01], 0.2).is_err());
    }
}
