// src/models/gbm.rs
//! Geometric Brownian Motion terminal-price sampler
//!
//! Under the risk-neutral measure
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//! has the exact solution
//! ```text
//! S_T = S_0 * exp((r - σ²/2)T + σ√T * Z),   Z ~ N(0,1)
//! ```
//! so a European payoff needs a single normal draw per path.

use crate::error::{validation::*, PricingResult};
use crate::rng::BoxMuller;
use rand::Rng;
use rand_distr::Distribution;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub s0: f64,
    pub r: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(s0: f64, r: f64, sigma: f64) -> PricingResult<Self> {
        validate_positive("s0", s0)?;
        validate_finite("r", r)?;
        validate_non_negative("sigma", sigma)?;
        Ok(Gbm { s0, r, sigma })
    }

    /// Closed-form step from `s_t` over `dt` given a standard normal draw.
    #[inline]
    pub fn exact_step(&self, s_t: f64, dt: f64, normal_draw: f64) -> f64 {
        s_t * ((self.r - 0.5 * self.sigma * self.sigma) * dt + self.sigma * dt.sqrt() * normal_draw)
            .exp()
    }

    /// Draw one terminal price at horizon `t`, consuming exactly one normal draw.
    pub fn sample_terminal<R: Rng + ?Sized>(&self, rng: &mut R, t: f64) -> PricingResult<f64> {
        validate_non_negative("t", t)?;
        let z = BoxMuller.sample(rng);
        Ok(self.exact_step(self.s0, t, z))
    }

    /// Precomputed sampler for repeated draws at a fixed horizon.
    pub fn terminal_sampler(&self, t: f64) -> PricingResult<TerminalSampler> {
        validate_non_negative("t", t)?;
        Ok(TerminalSampler {
            s0: self.s0,
            drift: (self.r - 0.5 * self.sigma * self.sigma) * t,
            diffusion: self.sigma * t.sqrt(),
        })
    }
}

/// GBM terminal-price draw with drift and diffusion folded into constants.
///
/// Produces the same floating-point result as [`Gbm::exact_step`] from `s0`.
#[derive(Debug, Clone, Copy)]
pub struct TerminalSampler {
    s0: f64,
    drift: f64,
    diffusion: f64,
}

impl TerminalSampler {
    #[inline]
    pub fn terminal_price(&self, z: f64) -> f64 {
        self.s0 * (self.drift + self.diffusion * z).exp()
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.terminal_price(BoxMuller.sample(rng))
    }
}

/// Simulate one terminal stock price `S_T` from `(S₀, r, σ, T)`.
///
/// Fails fast with a domain error for `T < 0`, `σ < 0` or `S₀ ≤ 0`.
pub fn simulate_terminal_price<R: Rng + ?Sized>(
    rng: &mut R,
    s0: f64,
    r: f64,
    sigma: f64,
    t: f64,
) -> PricingResult<f64> {
    Gbm::new(s0, r, sigma)?.sample_terminal(rng, t)
}
