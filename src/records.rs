// src/records.rs
//! Option test records
//!
//! Batch runs read headerless CSV rows of the form
//! ```text
//! ticker,S0,K,r,sigma,days_to_expiry,market_price
//! AAPL,195.89,200.00,0.0525,0.22,30,3.45
//! ```
//! Lines starting with `#` and blank lines are ignored. A row is accepted only if
//! it has exactly seven fields and every field parses; anything else is skipped and
//! reported in [`LoadReport::skipped`], never fatal.

use crate::error::{PricingError, PricingResult};
use crate::params::OptionParams;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Calendar days per year used to convert days-to-expiry into a maturity
pub const DAYS_PER_YEAR: f64 = 365.0;

const FIELDS_PER_RECORD: usize = 7;

/// One row of the option test file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionRecord {
    pub ticker: String,
    pub s0: f64,
    pub k: f64,
    pub r: f64,
    pub sigma: f64,
    pub days_to_expiry: i32,
    /// Observed market price; values ≤ 0.01 mean "not available"
    pub market_price: f64,
}

impl OptionRecord {
    pub fn years_to_expiry(&self) -> f64 {
        self.days_to_expiry as f64 / DAYS_PER_YEAR
    }

    pub fn params(&self) -> OptionParams {
        OptionParams::new(self.s0, self.k, self.r, self.sigma, self.years_to_expiry())
    }

    pub fn market_price(&self) -> Option<f64> {
        (self.market_price > 0.01).then_some(self.market_price)
    }

    pub fn moneyness(&self) -> Moneyness {
        Moneyness::classify(self.s0, self.k)
    }
}

/// Call moneyness bucket by spot/strike ratio (±2% band around ATM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Moneyness {
    #[serde(rename = "ITM")]
    InTheMoney,
    #[serde(rename = "ATM")]
    AtTheMoney,
    #[serde(rename = "OTM")]
    OutOfTheMoney,
}

impl Moneyness {
    pub fn classify(s0: f64, k: f64) -> Self {
        let ratio = s0 / k;
        if ratio > 1.02 {
            Moneyness::InTheMoney
        } else if ratio < 0.98 {
            Moneyness::OutOfTheMoney
        } else {
            Moneyness::AtTheMoney
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Moneyness::InTheMoney => "ITM",
            Moneyness::AtTheMoney => "ATM",
            Moneyness::OutOfTheMoney => "OTM",
        }
    }
}

impl fmt::Display for Moneyness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepted records plus one `RecordError` per skipped row
#[derive(Debug, Default)]
pub struct LoadReport {
    pub records: Vec<OptionRecord>,
    pub skipped: Vec<PricingError>,
}

impl LoadReport {
    pub fn accepted_count(&self) -> usize {
        self.records.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Parse option records from any reader.
pub fn parse_records<R: Read>(reader: R) -> LoadReport {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut report = LoadReport::default();

    for result in csv_reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                skip(&mut report, line, e.to_string());
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or(0);

        if row.len() != FIELDS_PER_RECORD {
            skip(
                &mut report,
                line,
                format!("expected {} fields, found {}", FIELDS_PER_RECORD, row.len()),
            );
            continue;
        }

        match row.deserialize::<OptionRecord>(None) {
            Ok(record) => report.records.push(record),
            Err(e) => skip(&mut report, line, e.to_string()),
        }
    }

    debug!(
        accepted = report.accepted_count(),
        skipped = report.skipped_count(),
        "parsed option records"
    );
    report
}

fn skip(report: &mut LoadReport, line: u64, reason: String) {
    warn!(line, %reason, "skipping option record");
    report.skipped.push(PricingError::RecordError { line, reason });
}

/// Open `path` and parse its option records.
pub fn load_records(path: &Path) -> PricingResult<LoadReport> {
    let file = File::open(path).map_err(|e| PricingError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(parse_records(file))
}
