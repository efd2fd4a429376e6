//! Error types
//!
//! Only configuration problems are fatal. Per-point solver failures are
//! carried as [`SolveFailure`] values inside the sweep and never abort it.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("sigma_min must be positive, got {0}")]
    NonPositiveSigmaMin(f64),

    #[error("sigma_max ({sigma_max}) must exceed sigma_min ({sigma_min})")]
    EmptyVolatilityDomain { sigma_min: f64, sigma_max: f64 },

    #[error("target multiple must exceed 1, got {0}")]
    TargetMultipleTooSmall(f64),

    #[error("grid needs at least 2 points, got {0}")]
    GridTooSmall(usize),

    #[error("[{sigma_min}, {sigma_max}] is too narrow for {points} distinct samples")]
    DegenerateGrid {
        sigma_min: f64,
        sigma_max: f64,
        points: usize,
    },

    #[error("risk-free rate must be positive and finite, got {0}")]
    InvalidRiskFreeRate(f64),

    #[error("growth rate must be finite, got {0}")]
    InvalidGrowthRate(f64),

    #[error("linear risk coefficient must be non-negative and finite, got {0}")]
    InvalidLinearCoefficient(f64),

    #[error("no linear risk coefficients configured")]
    NoLinearCoefficients,

    #[error("invalid solver policy: {0}")]
    InvalidSolverPolicy(String),

    #[error("invalid simulation setting: {0}")]
    InvalidSimulation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why the self-consistent solver gave up on a grid point.
#[derive(Error, Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SolveFailure {
    #[error("no sign change on [{low}, {high}]: f(low)={f_low}, f(high)={f_high}")]
    InvalidBracket {
        low: f64,
        high: f64,
        f_low: f64,
        f_high: f64,
    },

    #[error("residual is not finite at n={n}")]
    NonFinite { n: f64 },

    #[error("bisection did not converge after {iterations} iterations (width {width})")]
    NotConverged { iterations: usize, width: f64 },
}
