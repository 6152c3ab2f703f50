//! Option Payoff Functions
//!
//! # Mathematical Definitions
//!
//! - **Call**: max(S_T - K, 0) - right to buy at strike K
//! - **Put**: max(K - S_T, 0) - right to sell at strike K
//!
//! Both are European, so only the terminal price matters. For any `S, K` the
//! payoffs satisfy `call - put = S - K`.

/// European call payoff `max(S - K, 0)`
#[inline]
pub fn call_payoff(s: f64, k: f64) -> f64 {
    if s > k {
        s - k
    } else {
        0.0
    }
}

/// European put payoff `max(K - S, 0)`
#[inline]
pub fn put_payoff(s: f64, k: f64) -> f64 {
    if k > s {
        k - s
    } else {
        0.0
    }
}

/// Enumeration of supported option payoff types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payoff {
    /// European call option: max(S_T - K, 0)
    EuropeanCall { k: f64 },

    /// European put option: max(K - S_T, 0)
    EuropeanPut { k: f64 },
}

impl Payoff {
    /// Non-negative payoff for terminal price `s_t`
    #[inline]
    pub fn calculate(&self, s_t: f64) -> f64 {
        match self {
            Payoff::EuropeanCall { k } => call_payoff(s_t, *k),
            Payoff::EuropeanPut { k } => put_payoff(s_t, *k),
        }
    }

    pub fn strike(&self) -> f64 {
        match self {
            Payoff::EuropeanCall { k } | Payoff::EuropeanPut { k } => *k,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Payoff::EuropeanCall { .. } => "European call",
            Payoff::EuropeanPut { .. } => "European put",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_and_put_payoffs() {
        assert_eq!(call_payoff(115.0, 100.0), 15.0);
        assert_eq!(call_payoff(85.0, 100.0), 0.0);
        assert_eq!(call_payoff(100.0, 100.0), 0.0);

        assert_eq!(put_payoff(85.0, 100.0), 15.0);
        assert_eq!(put_payoff(115.0, 100.0), 0.0);
        assert_eq!(put_payoff(100.0, 100.0), 0.0);
    }

    #[test]
    fn test_payoff_enum_dispatch() {
        let call = Payoff::EuropeanCall { k: 50.0 };
        let put = Payoff::EuropeanPut { k: 50.0 };
        assert_eq!(call.calculate(60.0), 10.0);
        assert_eq!(put.calculate(60.0), 0.0);
        assert_eq!(put.calculate(42.5), 7.5);
        assert_eq!(call.strike(), 50.0);
        assert_eq!(put.name(), "European put");
    }

    #[test]
    fn test_put_call_payoff_identity() {
        for s in [0.0, 10.0, 99.99, 100.0, 100.01, 250.0] {
            let k = 100.0;
            assert_eq!(call_payoff(s, k) - put_payoff(s, k), s - k);
        }
    }
}
