//! # mc-option-pricer: Monte Carlo pricing of European options
//!
//! Estimates the fair value of a European option by simulating terminal stock
//! prices under Geometric Brownian Motion and averaging discounted payoffs, then
//! checks the estimate against the closed-form Black-Scholes price.
//!
//! ## Components
//!
//! - **Uniform generator**: [`rng::Xorshift32`], a seeded 32-bit xorshift stream
//! - **Normal sampler**: [`rng::BoxMuller`], cosine-branch Box-Muller
//! - **GBM sampler**: [`models::gbm`], exact terminal-price draw
//! - **Payoffs**: [`mc::payoffs`], European call and put
//! - **Monte Carlo pricer**: [`mc::mc_engine`], sequential or one stream per worker
//! - **Analytic pricer**: [`analytics::bs_analytic`] with [`math_utils::norm_cdf`]
//!
//! The [`records`], [`seeding`] and [`batch`] modules feed CSV option records
//! through both pricers for the `mc-pricer batch` command.
//!
//! ## Quick Start
//!
//! ```rust
//! use mc_option_pricer::analytics::bs_analytic::price_european_call_analytic;
//! use mc_option_pricer::mc::mc_engine::price_european_call_mc;
//! use mc_option_pricer::params::OptionParams;
//! use mc_option_pricer::rng::Xorshift32;
//!
//! let params = OptionParams::new(100.0, 100.0, 0.05, 0.2, 1.0);
//! let mut rng = Xorshift32::new(123_456);
//!
//! let mc = price_european_call_mc(&mut rng, &params, 100_000).expect("valid inputs");
//! let bs = price_european_call_analytic(&params).expect("valid inputs");
//! assert!((mc - bs).abs() / bs < 0.05);
//! ```

// Module declarations
pub mod error;
pub mod rng;
pub mod math_utils;
pub mod params;
pub mod models;
pub mod mc;
pub mod analytics;
pub mod records;
pub mod seeding;
pub mod batch;

// Re-export commonly used types for convenience
pub use error::{PricingError, PricingResult};
pub use params::{McEstimate, OptionParams};
