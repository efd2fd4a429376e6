//! Monte Carlo first-passage check
//!
//! Simulates log-price paths `X_t = (g - sigma^2/2) t + sigma W_t` and records
//! the first time each path reaches `ln(M)`. The sample mean should agree
//! with the closed-form physical anchor wherever the drift is positive.
//!
//! Paths are monitored at discrete steps, which biases hitting times slightly
//! upward. Paths that have not hit by `horizon` are censored and excluded
//! from the mean.

use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::anchors::{geometric_drift, physical_anchor};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirstPassageConfig {
    pub growth_rate: f64,
    pub target_multiple: f64,
    pub paths: usize,
    /// Years per step.
    pub dt: f64,
    /// Years simulated before a path is censored.
    pub horizon: f64,
    pub seed: u64,
}

impl Default for FirstPassageConfig {
    fn default() -> Self {
        Self {
            growth_rate: 0.20,
            target_multiple: 2.0,
            paths: 2_000,
            dt: 1.0 / 252.0, // trading days
            horizon: 200.0,
            seed: 42,
        }
    }
}

impl FirstPassageConfig {
    pub fn validate(&self) -> Result<()> {
        if self.paths == 0 {
            return Err(Error::InvalidSimulation("paths must be positive".to_string()));
        }
        if !(self.dt > 0.0) || !(self.horizon > self.dt) {
            return Err(Error::InvalidSimulation(format!(
                "need 0 < dt < horizon, got dt={} horizon={}",
                self.dt, self.horizon
            )));
        }
        if !(self.target_multiple > 1.0) {
            return Err(Error::TargetMultipleTooSmall(self.target_multiple));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FirstPassageEstimate {
    pub sigma: f64,
    /// Closed-form E[T], `None` past the meltdown boundary.
    pub analytic: Option<f64>,
    /// Mean hitting time over paths that hit.
    pub mean_time: Option<f64>,
    pub standard_error: Option<f64>,
    /// Fraction of paths that reached the target before the horizon.
    pub hit_fraction: f64,
}

impl FirstPassageEstimate {
    pub fn relative_error(&self) -> Option<f64> {
        let analytic = self.analytic?;
        Some((self.mean_time? - analytic) / analytic)
    }
}

/// First step at which one simulated path reaches `barrier`, in years.
fn simulate_hitting_time(
    drift: f64,
    sigma: f64,
    barrier: f64,
    config: &FirstPassageConfig,
    normal: &Normal<f64>,
    rng: &mut impl Rng,
) -> Option<f64> {
    let steps = (config.horizon / config.dt).ceil() as usize;
    let step_drift = drift * config.dt;
    let step_vol = sigma * config.dt.sqrt();

    let mut x = 0.0;
    for step in 1..=steps {
        let z: f64 = normal.sample(rng);
        x += step_drift + step_vol * z;
        if x >= barrier {
            return Some(step as f64 * config.dt);
        }
    }
    None
}

/// Estimate the expected first-passage time at one volatility.
pub fn estimate_first_passage(
    sigma: f64,
    config: &FirstPassageConfig,
) -> Result<FirstPassageEstimate> {
    config.validate()?;
    if !(sigma >= 0.0) {
        return Err(Error::InvalidSimulation(format!(
            "sigma must be non-negative, got {}",
            sigma
        )));
    }

    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| Error::InvalidSimulation(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(config.seed);

    let drift = geometric_drift(sigma, config.growth_rate);
    let barrier = config.target_multiple.ln();

    let times: Vec<f64> = (0..config.paths)
        .filter_map(|_| {
            simulate_hitting_time(drift, sigma, barrier, config, &normal, &mut rng)
        })
        .collect();

    let hit_fraction = times.len() as f64 / config.paths as f64;
    let (mean_time, standard_error) = if times.is_empty() {
        (None, None)
    } else {
        let count = times.len() as f64;
        let mean = times.iter().sum::<f64>() / count;
        let se = if times.len() > 1 {
            let var = times.iter().map(|t| (t - mean).powi(2)).sum::<f64>() / (count - 1.0);
            Some((var / count).sqrt())
        } else {
            None
        };
        (Some(mean), se)
    };

    log::debug!(
        "sigma={:.3}: {} of {} paths hit, mean={:?}",
        sigma,
        times.len(),
        config.paths,
        mean_time
    );

    Ok(FirstPassageEstimate {
        sigma,
        analytic: physical_anchor(sigma, config.growth_rate, config.target_multiple),
        mean_time,
        standard_error,
        hit_fraction,
    })
}
