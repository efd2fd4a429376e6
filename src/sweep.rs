//! Equilibrium sweep
//!
//! Drives one run over the volatility grid:
//!
//! 1. Sample the physical anchor E[T] on the full grid.
//! 2. For each linear coefficient lambda, sample `1/(r + lambda*sigma)` on the
//!    full grid and intersect it with E[T].
//! 3. Solve the self-consistent horizon at every grid point, keep the points
//!    that converged, and intersect that sub-curve with E[T] restricted to
//!    the same points.
//! 4. Compare each linear equilibrium against the single non-linear one.

use std::fmt;

use serde::Serialize;

use crate::anchors::{linear_curve, meltdown_boundary, physical_curve};
use crate::config::{Parameters, SolverPolicy};
use crate::error::Result;
use crate::grid::{AnchorCurve, VolatilityGrid};
use crate::intersection::find_intersection;
use crate::solver::{solve_psychological_time, SolveResult};

/// Per-point solutions of the self-consistent horizon.
#[derive(Debug, Clone, Serialize)]
pub struct NonlinearSolution {
    pub results: Vec<SolveResult>,
    /// True where the solver converged.
    pub mask: Vec<bool>,
    pub valid_grid: VolatilityGrid,
    pub valid_curve: AnchorCurve,
}

impl NonlinearSolution {
    pub fn valid_points(&self) -> usize {
        self.valid_grid.len()
    }

    pub fn failed_points(&self) -> usize {
        self.results.len() - self.valid_grid.len()
    }
}

/// Solve the fixed point at every grid point. Failures are kept, not raised.
pub fn solve_grid(
    grid: &VolatilityGrid,
    risk_free_rate: f64,
    policy: &SolverPolicy,
) -> NonlinearSolution {
    let results: Vec<SolveResult> = grid
        .iter()
        .map(|sigma| solve_psychological_time(sigma, risk_free_rate, policy))
        .collect();

    let mask: Vec<bool> = results.iter().map(SolveResult::is_converged).collect();
    let valid_grid = grid.select(&mask);
    let valid_curve = AnchorCurve::from_values(
        results
            .iter()
            .filter_map(SolveResult::value)
            .map(Some)
            .collect(),
    );

    NonlinearSolution {
        results,
        mask,
        valid_grid,
        valid_curve,
    }
}

/// Linear psychological anchor for one coefficient.
#[derive(Debug, Clone, Serialize)]
pub struct LinearAnchor {
    pub lambda: f64,
    pub curve: AnchorCurve,
    pub sigma_star: Option<f64>,
}

/// One line of the sensitivity table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensitivityRow {
    pub lambda: f64,
    pub linear_sigma_star: Option<f64>,
    pub nonlinear_sigma_star: Option<f64>,
    /// Linear minus non-linear equilibrium, when both exist.
    pub difference: Option<f64>,
}

impl SensitivityRow {
    pub fn new(
        lambda: f64,
        linear_sigma_star: Option<f64>,
        nonlinear_sigma_star: Option<f64>,
    ) -> Self {
        let difference = match (linear_sigma_star, nonlinear_sigma_star) {
            (Some(linear), Some(nonlinear)) => Some(linear - nonlinear),
            _ => None,
        };
        Self {
            lambda,
            linear_sigma_star,
            nonlinear_sigma_star,
            difference,
        }
    }
}

/// Sensitivity rows in configured lambda order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SensitivityTable {
    pub rows: Vec<SensitivityRow>,
}

impl SensitivityTable {
    pub fn row(&self, lambda: f64) -> Option<&SensitivityRow> {
        self.rows.iter().find(|r| r.lambda == lambda)
    }

    /// Rows where both equilibria exist.
    pub fn complete_rows(&self) -> impl Iterator<Item = &SensitivityRow> {
        self.rows.iter().filter(|r| r.difference.is_some())
    }
}

fn pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.1}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for SensitivityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "| Lambda | Linear σ* | Non-linear σ* | Δσ*     |")?;
        writeln!(f, "|--------|-----------|---------------|---------|")?;
        for row in &self.rows {
            let diff = match row.difference {
                Some(d) => format!("{:+.1}%", d * 100.0),
                None => "n/a".to_string(),
            };
            writeln!(
                f,
                "| {:6.2} | {:>9} | {:>13} | {:>7} |",
                row.lambda,
                pct(row.linear_sigma_star),
                pct(row.nonlinear_sigma_star),
                diff,
            )?;
        }
        Ok(())
    }
}

/// Everything one sweep produces, in a shape plotting and reporting can consume.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub parameters: Parameters,
    pub grid: VolatilityGrid,
    pub meltdown_boundary: f64,
    pub physical: AnchorCurve,
    pub linear: Vec<LinearAnchor>,
    pub nonlinear: NonlinearSolution,
    pub nonlinear_sigma_star: Option<f64>,
    pub table: SensitivityTable,
}

impl SweepReport {
    pub fn linear_sigma_star(&self, lambda: f64) -> Option<f64> {
        self.linear
            .iter()
            .find(|l| l.lambda == lambda)
            .and_then(|l| l.sigma_star)
    }

    pub fn print(&self) {
        println!("  Grid points:             {}", self.grid.len());
        println!("  Meltdown boundary:       {:.1}%", self.meltdown_boundary * 100.0);
        println!("  Solver converged:        {}", self.nonlinear.valid_points());
        println!("  Solver failed:           {}", self.nonlinear.failed_points());
        println!("  Non-linear σ*:           {}", pct(self.nonlinear_sigma_star));
        for anchor in &self.linear {
            println!(
                "  Linear σ* (λ={:.2}):      {}",
                anchor.lambda,
                pct(anchor.sigma_star)
            );
        }
    }
}

/// Run the full sweep. Only an invalid configuration is an error.
pub fn run_sweep(params: &Parameters) -> Result<SweepReport> {
    params.validate()?;

    let grid = VolatilityGrid::from_parameters(params)?;
    let physical = physical_curve(&grid, params.growth_rate, params.target_multiple);

    let linear: Vec<LinearAnchor> = params
        .linear_coefficients
        .iter()
        .map(|&lambda| {
            let curve = linear_curve(&grid, lambda, params.risk_free_rate);
            let sigma_star = find_intersection(&grid, &curve, &physical);
            if sigma_star.is_none() {
                log::warn!("λ={:.2}: linear anchor never meets E[T] on the grid", lambda);
            }
            LinearAnchor {
                lambda,
                curve,
                sigma_star,
            }
        })
        .collect();

    let nonlinear = solve_grid(&grid, params.risk_free_rate, &params.solver);
    if nonlinear.failed_points() > 0 {
        log::info!(
            "self-consistent solver failed at {} of {} grid points",
            nonlinear.failed_points(),
            grid.len()
        );
    }

    let physical_valid = physical.select(&nonlinear.mask);
    let nonlinear_sigma_star =
        find_intersection(&nonlinear.valid_grid, &nonlinear.valid_curve, &physical_valid);
    if nonlinear_sigma_star.is_none() {
        log::warn!("exact anchor never meets E[T] on the converged points");
    }

    let table = SensitivityTable {
        rows: linear
            .iter()
            .map(|l| SensitivityRow::new(l.lambda, l.sigma_star, nonlinear_sigma_star))
            .collect(),
    };

    log::info!(
        "sweep over {} points: non-linear σ*={:?}, {} linear equilibria",
        grid.len(),
        nonlinear_sigma_star,
        table.rows.iter().filter(|r| r.linear_sigma_star.is_some()).count()
    );

    Ok(SweepReport {
        parameters: params.clone(),
        meltdown_boundary: meltdown_boundary(params.growth_rate),
        grid,
        physical,
        linear,
        nonlinear,
        nonlinear_sigma_star,
        table,
    })
}
