// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::{PI, SQRT_2};

/// Standard normal CDF, `Φ(x) = ½(1 + erf(x/√2))`.
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Standard normal PDF, `φ(x) = exp(-x²/2) / √(2π)`.
pub fn norm_pdf(x: f64) -> f64 {
    (1.0 / (2.0 * PI).sqrt()) * (-0.5 * x * x).exp()
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_cdf_reference_values() {
        assert_abs_diff_eq!(norm_cdf(0.0), 0.5, epsilon = 1e-15);
        // statrs' erf is off by up to ~1.4e-11 for arguments near 0.7
        assert_abs_diff_eq!(norm_cdf(1.0), 0.841_344_746_068_542_9, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(1.5), 0.933_192_798_731_141_9, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(-1.96), 0.024_997_895_148_220_4, epsilon = 1e-10);
        assert_abs_diff_eq!(norm_cdf(8.0), 1.0, epsilon = 1e-14);
        assert_abs_diff_eq!(norm_cdf(-8.0), 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_norm_cdf_symmetry_and_monotonicity() {
        let mut previous = 0.0;
        for i in -400..=400 {
            let x = i as f64 * 0.02;
            let c = norm_cdf(x);
            assert!(c >= previous, "CDF decreased at x = {}", x);
            assert_abs_diff_eq!(norm_cdf(-x), 1.0 - c, epsilon = 1e-14);
            previous = c;
        }
    }

    #[test]
    fn test_norm_pdf_peak() {
        assert_abs_diff_eq!(norm_pdf(0.0), 0.398_942_280_401_432_7, epsilon = 1e-15);
        assert_abs_diff_eq!(norm_pdf(1.5), norm_pdf(-1.5), epsilon = 1e-18);
    }
}
