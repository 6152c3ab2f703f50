// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes formulas for European options
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! For European options this has a closed form in the cumulative normal Φ(x),
//! which serves as the reference value for the Monte Carlo estimator.

use crate::error::PricingResult;
use crate::math_utils::norm_cdf;
use crate::params::OptionParams;

/// `(d₁, d₂)` for validated parameters
fn d1_d2(p: &OptionParams) -> (f64, f64) {
    let vol_sqrt_t = p.sigma * p.t.sqrt();
    let d1 = ((p.s0 / p.k).ln() + (p.r + 0.5 * p.sigma * p.sigma) * p.t) / vol_sqrt_t;
    (d1, d1 - vol_sqrt_t)
}

/// Black-Scholes European call option price
///
/// # Formula
/// ```text
/// C(S,K,r,σ,T) = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + (r + σ²/2)T] / (σ√T)
/// d₂ = d₁ - σ√T
/// ```
///
/// # Errors
///
/// `σ ≤ 0` or `T ≤ 0` would divide by zero, so both are reported as
/// `InvalidParameters` together with non-positive `S` or `K`.
pub fn bs_call_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> PricingResult<f64> {
    price_european_call_analytic(&OptionParams::new(s, k, r, sigma, t))
}

/// Black-Scholes call price for an [`OptionParams`] value.
pub fn price_european_call_analytic(p: &OptionParams) -> PricingResult<f64> {
    p.validate_for_analytic()?;
    let (d1, d2) = d1_d2(p);
    Ok(p.s0 * norm_cdf(d1) - p.k * p.discount() * norm_cdf(d2))
}

/// Black-Scholes European put option price
///
/// # Formula
/// ```text
/// P(S,K,r,σ,T) = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
pub fn bs_put_price(s: f64, k: f64, r: f64, sigma: f64, t: f64) -> PricingResult<f64> {
    price_european_put_analytic(&OptionParams::new(s, k, r, sigma, t))
}

pub fn price_european_put_analytic(p: &OptionParams) -> PricingResult<f64> {
    p.validate_for_analytic()?;
    let (d1, d2) = d1_d2(p);
    Ok(p.k * p.discount() * norm_cdf(-d2) - p.s0 * norm_cdf(-d1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_reference_call_price() {
        let price = bs_call_price(100.0, 100.0, 0.05, 0.2, 1.0).unwrap();
        assert_relative_eq!(price, 10.450_583_572_185_565, max_relative = 1e-10);
    }

    #[test]
    fn test_put_call_parity() {
        let (s, k, r, sigma, t) = (100.0, 110.0, 0.03, 0.25, 0.5);
        let call = bs_call_price(s, k, r, sigma, t).unwrap();
        let put = bs_put_price(s, k, r, sigma, t).unwrap();
        assert_abs_diff_eq!(call - put, s - k * (-r * t).exp(), epsilon = 1e-10);
    }

    #[test]
    fn test_degenerate_inputs_are_errors() {
        assert!(bs_call_price(100.0, 100.0, 0.05, 0.0, 1.0).is_err());
        assert!(bs_call_price(100.0, 100.0, 0.05, 0.2, 0.0).is_err());
        assert!(bs_call_price(100.0, 100.0, 0.05, -0.2, 1.0).is_err());
        assert!(bs_call_price(100.0, 0.0, 0.05, 0.2, 1.0).is_err());
        assert!(bs_put_price(100.0, 100.0, 0.05, 0.2, -1.0).is_err());
    }

    #[test]
    fn test_near_zero_volatility_collapses_to_forward_intrinsic() {
        let price = bs_call_price(100.0, 100.0, 0.05, 0.0001, 1.0).unwrap();
        assert_abs_diff_eq!(price, 100.0 - 100.0 * (-0.05f64).exp(), epsilon = 1e-6);
    }

    #[test]
    fn test_moneyness_extremes() {
        let deep_otm = bs_call_price(100.0, 1_000.0, 0.05, 0.2, 1.0).unwrap();
        assert_abs_diff_eq!(deep_otm, 0.0, epsilon = 1e-10);

        let deep_itm = bs_call_price(100.0, 10.0, 0.05, 0.2, 1.0).unwrap();
        assert_abs_diff_eq!(deep_itm, 100.0 - 10.0 * (-0.05f64).exp(), epsilon = 1e-8);
    }
}
