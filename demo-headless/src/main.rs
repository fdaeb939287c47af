//! Headless wind-farm comparison demo.
//!
//! Thin consumer of the core engine: resolves CLI flags into a `FarmConfig`,
//! runs a multi-strategy comparison, and prints the resulting tables. All
//! modeling lives in `windfarm-core`; this binary only formats its outputs.

use clap::Parser;
use windfarm_core::{
    FarmConfig, OptimizationScenarioRunner, PlacementMethod, WindResourceSynthesizer,
};

/// Wind-farm layout comparison demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "windfarm-demo")]
#[command(about = "Wake-aware wind-farm layout comparison demo", long_about = None)]
struct Args {
    /// Number of wind samples per scenario
    #[arg(short = 'p', long, default_value_t = 1000)]
    n_points: usize,

    /// Number of turbines to place
    #[arg(short = 't', long, default_value_t = 12)]
    n_turbines: usize,

    /// Number of wind scenarios per strategy
    #[arg(short = 's', long, default_value_t = 5)]
    n_scenarios: usize,

    /// Random seed for reproducible runs
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Weibull shape parameter k
    #[arg(long, default_value_t = 2.0)]
    weibull_k: f64,

    /// Weibull scale parameter c in m/s
    #[arg(long, default_value_t = 8.0)]
    weibull_c: f64,

    /// Mean wind direction in degrees (0 = North, 90 = East)
    #[arg(long, default_value_t = 270.0)]
    mean_direction: f64,

    /// Von Mises direction concentration (0 = uniform)
    #[arg(long, default_value_t = 4.0)]
    concentration: f64,

    /// Farm width in meters
    #[arg(long, default_value_t = 1000.0)]
    farm_width: f64,

    /// Farm length in meters
    #[arg(long, default_value_t = 1000.0)]
    farm_length: f64,

    /// Minimum turbine spacing in meters
    #[arg(long, default_value_t = 250.0)]
    min_spacing: f64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = FarmConfig::default();
    config.wind.weibull_k = args.weibull_k;
    config.wind.weibull_c = args.weibull_c;
    config.wind.mean_direction_deg = args.mean_direction;
    config.wind.direction_concentration = args.concentration;
    config.geometry.farm_width_m = args.farm_width;
    config.geometry.farm_length_m = args.farm_length;
    config.geometry.min_spacing_m = args.min_spacing;

    if let Err(err) = run(&config, &args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(config: &FarmConfig, args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Wind Resource ===");
    let synthesizer = WindResourceSynthesizer::new(config)?;
    let wind = synthesizer.generate_time_series(args.n_points, Some(args.seed))?;
    let summary = synthesizer.summarize(&wind)?;
    println!("samples:         {}", wind.len());
    println!("mean speed:      {:.2} m/s", summary.mean_speed_ms);
    println!("std speed:       {:.2} m/s", summary.std_speed_ms);
    println!(
        "quartiles:       {:.2} / {:.2} / {:.2} m/s",
        summary.p25_speed_ms, summary.median_speed_ms, summary.p75_speed_ms
    );
    if let Some(dir) = summary.mean_direction_deg {
        println!("mean direction:  {dir:.1}°");
    }
    println!("power density:   {:.0} W/m²", summary.power_density_w_m2);
    println!("capacity factor: {:.3}", summary.capacity_factor);

    println!("\n=== Strategy Comparison ===");
    let methods = [
        PlacementMethod::Grid,
        PlacementMethod::Optimized,
        PlacementMethod::Random,
    ];
    let runner = OptimizationScenarioRunner::new(config)?;
    let scenarios = runner.run_scenarios(
        &methods,
        args.n_scenarios,
        args.n_turbines,
        args.n_points,
        args.seed,
    )?;

    println!(
        "{:<12} {:>14} {:>12} {:>14} {:>14}",
        "method", "farm total", "cap. factor", "power density", "min spacing"
    );
    for &method in &methods {
        let of_method: Vec<_> = scenarios.iter().filter(|s| s.method == method).collect();
        let n = of_method.len() as f64;
        let total: f64 = of_method.iter().map(|s| s.result.farm_total_kw).sum::<f64>() / n;
        let cf: f64 = of_method.iter().map(|s| s.result.capacity_factor).sum::<f64>() / n;
        let density: f64 = of_method
            .iter()
            .map(|s| s.result.power_density_w_m2)
            .sum::<f64>()
            / n;
        let spacing = of_method[0].layout.min_pairwise_spacing_m().unwrap_or(0.0);
        println!(
            "{:<12} {:>11.1} kW {:>12.3} {:>9.2} W/m² {:>12.1} m",
            method.as_str(),
            total,
            cf,
            density,
            spacing
        );
    }

    let comparison = runner.run(
        &methods,
        args.n_scenarios,
        args.n_turbines,
        args.n_points,
        args.seed,
    )?;
    if let Some((best_method, best_power)) = comparison.best() {
        println!("\nbest strategy: {best_method} ({best_power:.1} kW mean farm total)");
    }
    Ok(())
}
