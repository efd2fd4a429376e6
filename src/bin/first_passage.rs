//! First-Passage Validation Binary
//!
//! Checks the closed-form physical anchor E[T] = ln(M) / (g - σ²/2) against
//! simulated geometric Brownian motion paths.
//!
//! ## Usage
//! ```bash
//! cargo run --bin first_passage --release -- [config.json]
//! ```

use rate_equilibrium::anchors::meltdown_boundary;
use rate_equilibrium::first_passage::{estimate_first_passage, FirstPassageConfig};
use rate_equilibrium::Result;

const VOLATILITIES: [f64; 6] = [0.10, 0.20, 0.30, 0.40, 0.50, 0.60];

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => FirstPassageConfig::default(),
    };
    config.validate()?;

    println!("=======================================================");
    println!("  Monte Carlo First-Passage Check");
    println!("=======================================================");
    println!();
    println!("Parameters:");
    println!(
        "  g = {:.0}%, M = {:.1}, paths = {}, dt = {:.4}y, seed = {}",
        config.growth_rate * 100.0,
        config.target_multiple,
        config.paths,
        config.dt,
        config.seed
    );
    println!("  Meltdown boundary: {:.1}%", meltdown_boundary(config.growth_rate) * 100.0);
    println!();

    println!("| σ      | Analytic | Simulated | Rel. error | Hit     |");
    println!("|--------|----------|-----------|------------|---------|");

    for sigma in VOLATILITIES {
        let estimate = estimate_first_passage(sigma, &config)?;
        let years = |v: Option<f64>| {
            v.map(|v| format!("{:.2}y", v))
                .unwrap_or_else(|| "n/a".to_string())
        };
        let rel = estimate
            .relative_error()
            .map(|e| format!("{:+.1}%", e * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "| {:5.1}% | {:>8} | {:>9} | {:>10} | {:6.1}% |",
            sigma * 100.0,
            years(estimate.analytic),
            years(estimate.mean_time),
            rel,
            estimate.hit_fraction * 100.0
        );
    }

    Ok(())
}
