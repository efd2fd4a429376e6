//! Equilibrium Sensitivity Binary
//!
//! Sweeps the volatility grid, solves the exact psychological horizon and
//! prints the lambda sensitivity table plus the rate scenarios.
//!
//! ## Usage
//! ```bash
//! cargo run --bin equilibrium --release -- [config.json] [--json]
//! ```
//!
//! `--json` prints the full sweep (grid, curves, solver outcomes) as JSON
//! instead of the text report, for external plotting.

use rate_equilibrium::paradox::{rate_scenarios, BASELINE_RATES, SCENARIO_RISK_COEFFICIENT};
use rate_equilibrium::{run_sweep, Parameters, Result};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let json = args.iter().any(|a| a == "--json");
    let params = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => Parameters::from_json_file(path)?,
        None => Parameters::default(),
    };

    let report = run_sweep(&params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("=======================================================");
    println!("  Risk-Anchored Temporal Equilibrium");
    println!("  Linear vs non-linear psychological anchor");
    println!("=======================================================");
    println!();
    println!("Parameters:");
    println!(
        "  r = {:.1}%, g = {:.0}%, M = {:.1}",
        params.risk_free_rate * 100.0,
        params.growth_rate * 100.0,
        params.target_multiple
    );
    println!(
        "  σ in [{:.0}%, {:.0}%], {} points",
        params.sigma_min * 100.0,
        params.sigma_max * 100.0,
        params.grid_points
    );
    println!();

    println!("Sweep:");
    println!("{}", "-".repeat(50));
    report.print();
    println!();

    println!("=======================================================");
    println!("  Sensitivity of σ* to λ");
    println!("=======================================================");
    println!();
    print!("{}", report.table);
    println!();

    println!("=======================================================");
    println!("  Rate Scenarios (λ = {:.2})", SCENARIO_RISK_COEFFICIENT);
    println!("=======================================================");
    println!();
    println!("| Rate  | σ*      | Mispricing zone   |");
    println!("|-------|---------|-------------------|");
    for scenario in rate_scenarios(&params, &BASELINE_RATES, SCENARIO_RISK_COEFFICIENT)? {
        let star = scenario
            .sigma_star
            .map(|s| format!("{:.1}%", s * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        let zone = scenario
            .zone
            .map(|z| format!("{:.1}% - {:.1}%", z.start * 100.0, z.end * 100.0))
            .unwrap_or_else(|| "none".to_string());
        println!(
            "| {:4.1}% | {:>7} | {:>17} |",
            scenario.risk_free_rate * 100.0,
            star,
            zone
        );
    }

    Ok(())
}
