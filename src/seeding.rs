// src/seeding.rs
//! Seed selection for command-line and batch runs.
//!
//! The pricing core only ever receives a `u32`; whether that value is a fixed
//! constant or derived from the clock is decided here.

use chrono::Utc;
use std::fmt;

/// Seed used when nothing else is requested, matching the single-option demo run
pub const DEFAULT_SEED: u32 = 123_456;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStrategy {
    /// Reproducible runs
    Fixed(u32),
    /// Different results on every run
    TimeDerived,
}

impl SeedStrategy {
    /// Concrete seed for this run.
    pub fn resolve(&self) -> u32 {
        match self {
            SeedStrategy::Fixed(seed) => *seed,
            SeedStrategy::TimeDerived => Utc::now().timestamp() as u32,
        }
    }

    pub fn is_reproducible(&self) -> bool {
        matches!(self, SeedStrategy::Fixed(_))
    }
}

impl Default for SeedStrategy {
    fn default() -> Self {
        SeedStrategy::Fixed(DEFAULT_SEED)
    }
}

impl fmt::Display for SeedStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedStrategy::Fixed(seed) => write!(f, "{} (fixed)", seed),
            SeedStrategy::TimeDerived => write!(f, "time-derived (random)"),
        }
    }
}
