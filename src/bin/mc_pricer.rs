//! mc-pricer: price European calls by Monte Carlo and compare with Black-Scholes.
//!
//! - `mc-pricer price` prices a single option (defaults: S0=K=100, r=5%, σ=20%, T=1y)
//! - `mc-pricer batch <csv>` runs every record of an option file through both pricers

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use mc_option_pricer::analytics::bs_analytic::{
    price_european_call_analytic, price_european_put_analytic,
};
use mc_option_pricer::batch::{self, relative_error_pct, BatchConfig};
use mc_option_pricer::mc::mc_engine::{mc_price_option_gbm, McConfig};
use mc_option_pricer::mc::payoffs::Payoff;
use mc_option_pricer::records::load_records;
use mc_option_pricer::seeding::{SeedStrategy, DEFAULT_SEED};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "mc-pricer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log pricing runs at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Fixed seed for reproducible runs
    #[arg(short, long, env = "MC_PRICER_SEED")]
    seed: Option<u32>,

    /// Use a time-based seed (different results each run); takes precedence over --seed
    #[arg(short, long)]
    random: bool,

    /// Independent generator streams; 0 uses one per CPU
    #[arg(short, long, env = "MC_PRICER_WORKERS", default_value_t = 1)]
    workers: usize,
}

impl RunArgs {
    fn strategy(&self, default_seed: u32) -> SeedStrategy {
        if self.random {
            SeedStrategy::TimeDerived
        } else {
            SeedStrategy::Fixed(self.seed.unwrap_or(default_seed))
        }
    }

    /// Worker count for a run of `paths` paths; 0 means one per CPU, capped at `paths`
    fn workers(&self, paths: usize) -> usize {
        if self.workers == 0 {
            num_cpus::get().min(paths).max(1)
        } else {
            self.workers
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Price a single European option
    Price {
        /// Initial stock price S0
        #[arg(long, default_value_t = 100.0)]
        s0: f64,

        /// Strike price K
        #[arg(short = 'k', long, default_value_t = 100.0)]
        strike: f64,

        /// Risk-free rate (0.05 = 5%)
        #[arg(long, default_value_t = 0.05)]
        rate: f64,

        /// Annualised volatility (0.2 = 20%)
        #[arg(long, default_value_t = 0.2)]
        sigma: f64,

        /// Time to maturity in years
        #[arg(short = 't', long, default_value_t = 1.0)]
        maturity: f64,

        /// Number of Monte Carlo paths
        #[arg(short = 'n', long, env = "MC_PRICER_PATHS", default_value_t = 1_000_000)]
        paths: usize,

        /// Price a put instead of a call
        #[arg(long)]
        put: bool,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Compare MC and Black-Scholes over a CSV file of option records
    Batch {
        /// Option file (ticker,S0,K,r,sigma,days,market_price)
        #[arg(default_value = "data/real_stocks.csv")]
        file: PathBuf,

        /// Monte Carlo paths per option
        #[arg(short = 'n', long, env = "MC_PRICER_PATHS", default_value_t = 500_000)]
        paths: usize,

        /// Also write the priced rows to this CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[allow(clippy::too_many_arguments)]
fn run_price(
    s0: f64,
    strike: f64,
    rate: f64,
    sigma: f64,
    maturity: f64,
    paths: usize,
    put: bool,
    run: &RunArgs,
) -> Result<()> {
    let strategy = run.strategy(DEFAULT_SEED);
    let seed = strategy.resolve();
    info!(%strategy, seed, "resolved seed");
    let payoff = if put {
        Payoff::EuropeanPut { k: strike }
    } else {
        Payoff::EuropeanCall { k: strike }
    };

    let cfg = McConfig {
        paths,
        s0,
        r: rate,
        sigma,
        t: maturity,
        seed,
        payoff,
        workers: run.workers(paths),
    };
    let estimate = mc_price_option_gbm(&cfg).context("Monte Carlo pricing failed")?;
    let params = cfg.params();
    let analytic = if put {
        price_european_put_analytic(&params)
    } else {
        price_european_call_analytic(&params)
    }
    .context("Black-Scholes pricing failed")?;

    println!("=== {} Pricing ===", payoff.name());
    println!("Parameters:");
    println!("  S0 (Initial Price):  ${:.2}", s0);
    println!("  K  (Strike Price):   ${:.2}", strike);
    println!("  r  (Risk-free Rate): {:.2}%", rate * 100.0);
    println!("  σ  (Volatility):     {:.2}%", sigma * 100.0);
    println!("  T  (Time to Expiry): {:.2} years", maturity);
    println!("  Simulations:         {}", paths);
    println!("  Workers:             {}", cfg.workers);
    println!("  Seed:                {}", strategy_label(strategy, seed));
    println!();

    let error = estimate.price - analytic;
    let (lo, hi) = estimate.confidence_95();
    println!("Results:");
    println!("  Monte Carlo Price:   ${:.4} ± {:.4}", estimate.price, estimate.std_error());
    println!("  95% interval:        [{:.4}, {:.4}]", lo, hi);
    println!("  Black-Scholes Price: ${:.4}", analytic);

    match relative_error_pct(estimate.price, analytic) {
        Some(pct) => {
            println!("  Error:               ${:.4} ({:.2}%)", error, pct);
            if pct.abs() < batch::AGREEMENT_PCT {
                println!("\nMonte Carlo result is within 1% of Black-Scholes");
            } else {
                println!("\nWARNING: Large discrepancy detected! Check for bugs.");
            }
        }
        None => println!("  Error:               ${:.4}", error),
    }
    Ok(())
}

fn strategy_label(strategy: SeedStrategy, seed: u32) -> String {
    match strategy {
        SeedStrategy::Fixed(_) => format!("{} (fixed)", seed),
        SeedStrategy::TimeDerived => format!("{} (random)", seed),
    }
}

fn run_batch(file: &Path, paths: usize, output: Option<&Path>, run: &RunArgs) -> Result<()> {
    let strategy = run.strategy(BatchConfig::default().seed);
    let seed = strategy.resolve();
    info!(%strategy, seed, "resolved seed");

    let loaded = load_records(file)
        .with_context(|| format!("Cannot open option file '{}'", file.display()))?;
    if loaded.records.is_empty() {
        bail!(
            "No valid option data found in '{}' ({} rows skipped)",
            file.display(),
            loaded.skipped_count()
        );
    }

    println!("Loading options from: {}", file.display());
    println!("Simulations per option: {}", paths);
    println!("Seed: {}", strategy_label(strategy, seed));

    let cfg = BatchConfig {
        paths,
        seed,
        workers: run.workers(paths),
    };
    let mut report =
        batch::run_batch(&loaded.records, &cfg).context("Invalid batch configuration")?;
    report.skipped = loaded.skipped_count();

    let stdout = io::stdout();
    batch::render_table(&mut stdout.lock(), &report)?;

    if let Some(path) = output {
        batch::write_rows_to_csv(path, &report.rows)
            .with_context(|| format!("Cannot write results to '{}'", path.display()))?;
        info!(path = %path.display(), rows = report.rows.len(), "wrote batch results");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Price {
            s0,
            strike,
            rate,
            sigma,
            maturity,
            paths,
            put,
            run,
        } => run_price(*s0, *strike, *rate, *sigma, *maturity, *paths, *put, run),
        Commands::Batch {
            file,
            paths,
            output,
            run,
        } => run_batch(file, *paths, output.as_deref(), run),
    }
}
