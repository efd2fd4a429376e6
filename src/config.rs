//! Run configuration
//!
//! Every computation takes its parameters explicitly; nothing here is
//! global state. Defaults reproduce the baseline scenario:
//! r = 1.8%, g = 20%, M = 2 (doubling), sigma in [10%, 65%], 300 points.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::grid::VolatilityGrid;

pub const DEFAULT_RISK_FREE_RATE: f64 = 0.018;
pub const DEFAULT_GROWTH_RATE: f64 = 0.20;
pub const DEFAULT_TARGET_MULTIPLE: f64 = 2.0;
pub const DEFAULT_SIGMA_MIN: f64 = 0.10;
pub const DEFAULT_SIGMA_MAX: f64 = 0.65;
pub const DEFAULT_GRID_POINTS: usize = 300;

/// Scalar inputs of one equilibrium sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    pub risk_free_rate: f64,
    pub growth_rate: f64,
    pub target_multiple: f64,
    /// Linear risk-compensation coefficients, reported in this order.
    pub linear_coefficients: Vec<f64>,
    pub sigma_min: f64,
    pub sigma_max: f64,
    pub grid_points: usize,
    pub solver: SolverPolicy,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            growth_rate: DEFAULT_GROWTH_RATE,
            target_multiple: DEFAULT_TARGET_MULTIPLE,
            linear_coefficients: vec![0.20, 0.25, 0.30],
            sigma_min: DEFAULT_SIGMA_MIN,
            sigma_max: DEFAULT_SIGMA_MAX,
            grid_points: DEFAULT_GRID_POINTS,
            solver: SolverPolicy::default(),
        }
    }
}

impl Parameters {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Reject configurations that would make the sweep meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.sigma_min > 0.0) || !self.sigma_min.is_finite() {
            return Err(Error::NonPositiveSigmaMin(self.sigma_min));
        }
        if !(self.sigma_max > self.sigma_min) || !self.sigma_max.is_finite() {
            return Err(Error::EmptyVolatilityDomain {
                sigma_min: self.sigma_min,
                sigma_max: self.sigma_max,
            });
        }
        if !(self.target_multiple > 1.0) || !self.target_multiple.is_finite() {
            return Err(Error::TargetMultipleTooSmall(self.target_multiple));
        }
        if self.grid_points < 2 {
            return Err(Error::GridTooSmall(self.grid_points));
        }
        if !(self.risk_free_rate > 0.0) || !self.risk_free_rate.is_finite() {
            return Err(Error::InvalidRiskFreeRate(self.risk_free_rate));
        }
        if !self.growth_rate.is_finite() {
            return Err(Error::InvalidGrowthRate(self.growth_rate));
        }
        if self.linear_coefficients.is_empty() {
            return Err(Error::NoLinearCoefficients);
        }
        if let Some(&bad) = self
            .linear_coefficients
            .iter()
            .find(|&&lam| !(lam >= 0.0) || !lam.is_finite())
        {
            return Err(Error::InvalidLinearCoefficient(bad));
        }
        self.solver.validate()?;
        VolatilityGrid::from_parameters(self).map(|_| ())
    }

    /// Volatility at which the geometric drift g - sigma^2/2 reaches zero.
    pub fn meltdown_boundary(&self) -> f64 {
        crate::anchors::meltdown_boundary(self.growth_rate)
    }
}

/// Bracket-seeding and stopping rules for the self-consistent solver.
///
/// The seed is the linear anchor with `guess_coefficient`; the bracket is
/// `[max(low_scale * guess, floor), min(high_scale * guess, cap)]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverPolicy {
    pub guess_coefficient: f64,
    pub low_scale: f64,
    pub high_scale: f64,
    pub floor: f64,
    pub cap: f64,
    /// Absolute tolerance on n.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SolverPolicy {
    fn default() -> Self {
        Self {
            guess_coefficient: 0.4,
            low_scale: 0.1,
            high_scale: 10.0,
            floor: 0.5,
            cap: 50.0,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

impl SolverPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(self.guess_coefficient >= 0.0) || !self.guess_coefficient.is_finite() {
            return Err(Error::InvalidSolverPolicy(format!(
                "guess_coefficient must be non-negative, got {}",
                self.guess_coefficient
            )));
        }
        if !(self.low_scale > 0.0) || !(self.high_scale > self.low_scale) {
            return Err(Error::InvalidSolverPolicy(format!(
                "scales must satisfy 0 < low_scale < high_scale, got {} and {}",
                self.low_scale, self.high_scale
            )));
        }
        if !(self.floor > 0.0) || !(self.cap > self.floor) || !self.cap.is_finite() {
            return Err(Error::InvalidSolverPolicy(format!(
                "bounds must satisfy 0 < floor < cap, got {} and {}",
                self.floor, self.cap
            )));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::InvalidSolverPolicy(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(Error::InvalidSolverPolicy(
                "max_iterations must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Search bracket for the fixed point at `sigma`.
    pub fn bracket(&self, sigma: f64, risk_free_rate: f64) -> (f64, f64) {
        let guess = crate::anchors::psychological_anchor_linear(
            sigma,
            self.guess_coefficient,
            risk_free_rate,
        );
        let low = (self.low_scale * guess).max(self.floor);
        let high = (self.high_scale * guess).min(self.cap);
        (low, high)
    }
}
