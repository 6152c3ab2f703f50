// src/batch.rs
//! Batch comparison of Monte Carlo and Black-Scholes prices over option records.
//!
//! Record `i` (in file order) is simulated on seed `base_seed + i`, so every row is
//! independent of the others yet the whole batch is reproducible from one seed.

use crate::analytics::bs_analytic::price_european_call_analytic;
use crate::error::{validation::*, PricingError, PricingResult};
use crate::mc::mc_engine::{mc_price_option_gbm, McConfig};
use crate::mc::payoffs::Payoff;
use crate::records::{Moneyness, OptionRecord};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Rows whose MC price is within this percentage of Black-Scholes count as agreeing
pub const AGREEMENT_PCT: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub paths: usize,
    pub seed: u32,
    pub workers: usize,
}

impl BatchConfig {
    /// Validate path and worker counts shared by every record
    pub fn validate(&self) -> PricingResult<()> {
        validate_paths(self.paths)?;
        validate_workers(self.workers, self.paths)
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            paths: 500_000,
            seed: 42,
            workers: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchRow {
    pub ticker: String,
    pub moneyness: Moneyness,
    pub s0: f64,
    pub k: f64,
    pub sigma: f64,
    pub days_to_expiry: i32,
    pub seed: u32,
    pub mc_price: f64,
    pub mc_std_error: f64,
    pub bs_price: f64,
    /// `None` when the analytic price is numerically zero
    pub mc_bs_error_pct: Option<f64>,
    pub market_price: Option<f64>,
    pub market_error_pct: Option<f64>,
}

impl BatchRow {
    pub fn agrees_with_analytic(&self) -> bool {
        self.mc_bs_error_pct
            .is_some_and(|e| e.abs() < AGREEMENT_PCT)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub within_tolerance: usize,
    pub mean_abs_error_pct: f64,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub rows: Vec<BatchRow>,
    /// Records rejected by parameter validation, with their ticker
    pub failed: Vec<(String, PricingError)>,
    /// Rows dropped while reading the input file
    pub skipped: usize,
}

impl BatchReport {
    pub fn summary(&self) -> BatchSummary {
        let errors: Vec<f64> = self
            .rows
            .iter()
            .filter_map(|row| row.mc_bs_error_pct)
            .map(f64::abs)
            .collect();
        let mean_abs_error_pct = if errors.is_empty() {
            0.0
        } else {
            errors.iter().sum::<f64>() / errors.len() as f64
        };

        BatchSummary {
            total: self.rows.len(),
            within_tolerance: self.rows.iter().filter(|r| r.agrees_with_analytic()).count(),
            mean_abs_error_pct,
            failed: self.failed.len(),
            skipped: self.skipped,
        }
    }
}

/// Percentage deviation of `estimate` from `reference`, if `reference` is non-zero.
pub fn relative_error_pct(estimate: f64, reference: f64) -> Option<f64> {
    if reference.abs() < 1e-12 {
        None
    } else {
        Some((estimate - reference) / reference * 100.0)
    }
}

/// Price one record with both pricers.
pub fn price_record(record: &OptionRecord, seed: u32, cfg: &BatchConfig) -> PricingResult<BatchRow> {
    let params = record.params();
    let bs_price = price_european_call_analytic(&params)?;

    let mc_cfg = McConfig {
        paths: cfg.paths,
        s0: params.s0,
        r: params.r,
        sigma: params.sigma,
        t: params.t,
        seed,
        payoff: Payoff::EuropeanCall { k: params.k },
        workers: cfg.workers,
    };
    let estimate = mc_price_option_gbm(&mc_cfg)?;

    let market_price = record.market_price();
    Ok(BatchRow {
        ticker: record.ticker.clone(),
        moneyness: record.moneyness(),
        s0: record.s0,
        k: record.k,
        sigma: record.sigma,
        days_to_expiry: record.days_to_expiry,
        seed,
        mc_price: estimate.price,
        mc_std_error: estimate.std_error(),
        bs_price,
        mc_bs_error_pct: relative_error_pct(estimate.price, bs_price),
        market_price,
        market_error_pct: market_price.and_then(|m| relative_error_pct(estimate.price, m)),
    })
}

/// Price every record; invalid records are collected, not fatal.
///
/// An invalid [`BatchConfig`] fails the whole run before any record is priced.
pub fn run_batch(records: &[OptionRecord], cfg: &BatchConfig) -> PricingResult<BatchReport> {
    cfg.validate()?;
    info!(
        records = records.len(),
        paths = cfg.paths,
        seed = cfg.seed,
        "starting batch run"
    );

    let mut report = BatchReport::default();
    for (i, record) in records.iter().enumerate() {
        let seed = cfg.seed.wrapping_add(i as u32);
        match price_record(record, seed, cfg) {
            Ok(row) => {
                debug!(ticker = %row.ticker, mc = row.mc_price, bs = row.bs_price, "priced record");
                report.rows.push(row);
            }
            Err(e) => {
                warn!(ticker = %record.ticker, error = %e, "record failed validation");
                report.failed.push((record.ticker.clone(), e));
            }
        }
    }
    Ok(report)
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:+.2}%", v))
}

/// Write the comparison table.
pub fn render_table<W: Write>(out: &mut W, report: &BatchReport) -> io::Result<()> {
    const RULE: &str = "═══════════════════════════════════════════════════════════════════════════════════════════════════════════════════";

    writeln!(out)?;
    writeln!(out, "╔{}╗", RULE)?;
    writeln!(out, "║ {:<113} ║", "OPTION PRICING COMPARISON: MONTE CARLO vs BLACK-SCHOLES")?;
    writeln!(out, "╠{}╣", RULE)?;
    writeln!(
        out,
        "| {:<5} | {:<3} | {:>8} | {:>8} | {:>6} | {:>4} | {:>8} | {:>8} | {:>7} | {:<18} |",
        "Stock", "M", "Price", "Strike", "Vol", "Exp", "MC", "BS", "MC-BS", "Market (error)"
    )?;
    writeln!(
        out,
        "|-------|-----|----------|----------|--------|------|----------|----------|---------|--------------------|"
    )?;

    for row in &report.rows {
        let market = match (row.market_price, row.market_error_pct) {
            (Some(m), Some(e)) => format!("${:.2} ({:+.1}%)", m, e),
            _ => "N/A".to_string(),
        };
        writeln!(
            out,
            "| {:<5} | {:>3} | ${:>7.2} | ${:>7.2} | {:>5.1}% | {:>3}d | ${:>7.2} | ${:>7.2} | {:>7} | {:<18} |",
            row.ticker,
            row.moneyness.label(),
            row.s0,
            row.k,
            row.sigma * 100.0,
            row.days_to_expiry,
            row.mc_price,
            row.bs_price,
            fmt_pct(row.mc_bs_error_pct),
            market
        )?;
    }

    for (ticker, error) in &report.failed {
        writeln!(out, "| {:<5} | FAILED: {}", ticker, error)?;
    }

    let summary = report.summary();
    let share = if summary.total > 0 {
        summary.within_tolerance as f64 / summary.total as f64 * 100.0
    } else {
        0.0
    };
    writeln!(out, "╠{}╣", RULE)?;
    writeln!(
        out,
        "║ SUMMARY: {} options priced | MC within {}% of BS: {}/{} ({:.1}%) | Avg |MC-BS|: {:.2}% | failed: {} | skipped rows: {}",
        summary.total,
        AGREEMENT_PCT,
        summary.within_tolerance,
        summary.total,
        share,
        summary.mean_abs_error_pct,
        summary.failed,
        summary.skipped
    )?;
    writeln!(out, "╚{}╝", RULE)?;
    Ok(())
}

/// Write priced rows to a CSV file with a header line.
pub fn write_rows_to_csv(path: &Path, rows: &[BatchRow]) -> PricingResult<()> {
    let io_error = |e: csv::Error| PricingError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    };

    let mut writer = csv::Writer::from_path(path).map_err(io_error)?;
    for row in rows {
        writer.serialize(row).map_err(io_error)?;
    }
    writer.flush().map_err(|e| PricingError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}
