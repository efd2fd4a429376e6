//! Risk-Anchored Temporal Equilibrium
//!
//! This library locates the volatility at which two competing horizons
//! coincide: the physical anchor (expected time for a geometric growth
//! process to reach a target multiple) and the psychological anchor (the
//! holding horizon implied by a risk-compensated discount rate).
//!
//! ## Modules
//!
//! - `config`: run parameters and solver bracket policy
//! - `anchors`: physical and linear psychological anchors
//! - `premium`: exact risk compensation rate c(sigma, n)
//! - `solver`: self-consistent psychological horizon via bisection
//! - `intersection`: first crossing of two sampled curves
//! - `sweep`: grid sweep and lambda sensitivity table
//! - `paradox`: temporal paradox index, mispricing zone, rate scenarios
//! - `first_passage`: Monte Carlo check of the physical anchor
//!
//! ## Usage
//!
//! ```bash
//! # Sensitivity table (optional JSON config, --json dumps curves)
//! cargo run --bin equilibrium --release -- [config.json] [--json]
//!
//! # Monte Carlo validation of E[T]
//! cargo run --bin first_passage --release
//! ```

pub mod anchors;
pub mod config;
pub mod error;
pub mod first_passage;
pub mod grid;
pub mod intersection;
pub mod paradox;
pub mod premium;
pub mod solver;
pub mod sweep;

pub use config::{Parameters, SolverPolicy};
pub use error::{Error, Result, SolveFailure};
pub use grid::{AnchorCurve, VolatilityGrid};
pub use solver::SolveResult;
pub use sweep::{run_sweep, SensitivityRow, SensitivityTable, SweepReport};
