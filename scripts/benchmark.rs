// scripts/benchmark.rs
use anyhow::{Context, Result};
use mc_option_pricer::analytics::bs_analytic;
use mc_option_pricer::math_utils::Timer;
use mc_option_pricer::mc::mc_engine::{mc_price_option_gbm, price_european_call_mc, McConfig};
use mc_option_pricer::params::OptionParams;
use mc_option_pricer::rng::Xorshift32;
use serde::Serialize;
use std::env;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_cores: usize,
    rayon_threads: usize,
    rustc_flags: String,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_cores: num_cpus::get(),
            rayon_threads: rayon::current_num_threads(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    workers: usize,
    time_ms: f64,
    throughput_paths_per_sec: f64,
    value: f64,
    analytic_value: f64,
    relative_error: f64,
}

fn record(
    name: String,
    paths: usize,
    workers: usize,
    time_ms: f64,
    value: f64,
    analytic_value: f64,
) -> BenchmarkResult {
    BenchmarkResult {
        name,
        paths,
        workers,
        time_ms,
        throughput_paths_per_sec: paths as f64 / (time_ms / 1000.0),
        value,
        analytic_value,
        relative_error: (value - analytic_value).abs() / analytic_value,
    }
}

fn run_monte_carlo_benchmarks(cores: usize) -> Result<Vec<BenchmarkResult>> {
    let mut results = Vec::new();
    let params = OptionParams::new(100.0, 100.0, 0.05, 0.2, 1.0);
    let analytic_price = bs_analytic::price_european_call_analytic(&params)?;

    for &paths in &[10_000, 100_000, 1_000_000, 10_000_000] {
        println!("Running benchmarks with {} paths...", paths);

        // Reference loop on a caller-owned generator
        let mut timer = Timer::new();
        let mut rng = Xorshift32::new(123_456);
        timer.start();
        let mc_price = price_european_call_mc(&mut rng, &params, paths)?;
        results.push(record(
            format!("European Call, reference loop ({}k paths)", paths / 1000),
            paths,
            1,
            timer.elapsed_ms(),
            mc_price,
            analytic_price,
        ));

        // One generator stream per core
        let workers = cores.min(paths);
        let cfg = McConfig {
            paths,
            seed: 123_456,
            workers,
            ..Default::default()
        };
        timer.start();
        let estimate = mc_price_option_gbm(&cfg)?;
        results.push(record(
            format!("European Call, {} workers ({}k paths)", workers, paths / 1000),
            paths,
            workers,
            timer.elapsed_ms(),
            estimate.price,
            analytic_price,
        ));
    }

    Ok(results)
}

fn write_results_to_csv(results: &[BenchmarkResult], filename: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename)
        .with_context(|| format!("Cannot create {}", filename))?;
    for result in results {
        writer.serialize(result)?;
    }
    writer.flush()?;
    println!("Results written to {}", filename);
    Ok(())
}

fn main() -> Result<()> {
    println!("mc-option-pricer Benchmark Suite");
    println!("================================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!();

    let results = run_monte_carlo_benchmarks(system_info.cpu_cores)?;

    println!("\n{:=<100}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<100}", "");
    println!(
        "{:<48} {:>10} {:>14} {:>12} {:>10}",
        "Benchmark", "Time (ms)", "Paths/sec", "Value", "Rel. Err"
    );
    println!("{:-<100}", "");
    for r in &results {
        println!(
            "{:<48} {:>10.2} {:>14.0} {:>12.6} {:>9.4}%",
            r.name,
            r.time_ms,
            r.throughput_paths_per_sec,
            r.value,
            r.relative_error * 100.0
        );
    }
    println!("{:=<100}", "");

    let filename = "benchmark_results.csv";
    write_results_to_csv(&results, filename)?;

    println!("\nTo reproduce: cargo run --bin benchmark --release");
    Ok(())
}
