// src/params.rs
//! Shared parameter and result types for the pricers.

use crate::error::{validation::*, PricingResult};

/// Market and contract inputs for one European option pricing call.
///
/// A plain value type: every pricing call receives its own copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionParams {
    /// Spot price S₀
    pub s0: f64,
    /// Strike K
    pub k: f64,
    /// Continuously compounded risk-free rate
    pub r: f64,
    /// Annualised volatility σ
    pub sigma: f64,
    /// Time to maturity in years
    pub t: f64,
}

impl OptionParams {
    pub fn new(s0: f64, k: f64, r: f64, sigma: f64, t: f64) -> Self {
        Self { s0, k, r, sigma, t }
    }

    /// Domain required by the simulation: `σ ≥ 0`, `T ≥ 0`.
    pub fn validate_for_simulation(&self) -> PricingResult<()> {
        validate_positive("s0", self.s0)?;
        validate_positive("k", self.k)?;
        validate_finite("r", self.r)?;
        validate_non_negative("sigma", self.sigma)?;
        validate_non_negative("t", self.t)?;
        Ok(())
    }

    /// Domain required by the closed form: `σ > 0`, `T > 0`.
    pub fn validate_for_analytic(&self) -> PricingResult<()> {
        validate_positive("s0", self.s0)?;
        validate_positive("k", self.k)?;
        validate_finite("r", self.r)?;
        validate_positive("sigma", self.sigma)?;
        validate_positive("t", self.t)?;
        Ok(())
    }

    /// Discount factor `e^(-rT)`
    pub fn discount(&self) -> f64 {
        (-self.r * self.t).exp()
    }

    /// Lower no-arbitrage bound of a European call, `max(S₀ − K·e^(-rT), 0)`
    pub fn call_lower_bound(&self) -> f64 {
        (self.s0 - self.k * self.discount()).max(0.0)
    }
}

/// Running sums over simulated payoffs for one pricing run.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PayoffAccumulator {
    pub sum: f64,
    pub sum_sq: f64,
    pub count: usize,
}

impl PayoffAccumulator {
    #[inline]
    pub fn push(&mut self, payoff: f64) {
        self.sum += payoff;
        self.sum_sq += payoff * payoff;
        self.count += 1;
    }

    /// Fold another worker's sums into this one.
    pub fn merge(&mut self, other: &PayoffAccumulator) {
        self.sum += other.sum;
        self.sum_sq += other.sum_sq;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }

    /// Unbiased variance of the sample mean. Zero for fewer than two samples.
    pub fn variance_of_mean(&self) -> f64 {
        if self.count < 2 {
            return 0.0;
        }
        let n = self.count as f64;
        let mean = self.mean();
        let sample_var = (self.sum_sq - n * mean * mean) / (n - 1.0);
        // Cancellation can leave a tiny negative remainder for near-constant payoffs
        (sample_var / n).max(0.0)
    }
}

/// Monte Carlo price estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct McEstimate {
    /// Discounted mean payoff
    pub price: f64,
    /// Sample variance of the discounted estimator
    pub variance: f64,
    /// Number of simulated paths
    pub paths: usize,
}

impl McEstimate {
    pub fn std_error(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Symmetric 95% confidence interval around the price
    pub fn confidence_95(&self) -> (f64, f64) {
        let half_width = 1.96 * self.std_error();
        (self.price - half_width, self.price + half_width)
    }
}
