// src/rng.rs
//! Random Number Generation for Monte Carlo Simulations
//!
//! # Xorshift32
//!
//! The uniform stream is Marsaglia's 32-bit xorshift with the (13, 17, 5) shift
//! triple:
//! ```text
//! x ^= x << 13
//! x ^= x >> 17
//! x ^= x << 5
//! ```
//! The state is a single `u32` with period 2³² − 1. Zero is a fixed point of the
//! recurrence, so every seeding path maps 0 to 1 and the state stays non-zero for
//! the generator's whole life.
//!
//! The generator is deterministic and trivially predictable. It is meant for
//! reproducible simulations only and must never be used where unpredictability
//! matters.
//!
//! # Box-Muller Transform
//!
//! Converts uniform random variables to normal distributions:
//! ```text
//! Z₁ = √(-2ln(U₁)) * cos(2πU₂)
//! Z₂ = √(-2ln(U₁)) * sin(2πU₂)
//! ```
//! Only `Z₁` is returned. Each normal draw consumes exactly two uniforms, so the
//! k-th normal of a stream is always built from uniforms 2k and 2k+1.
//!
//! # Parallel Streams
//!
//! A generator is an owned value. Parallel workers each get their own instance
//! from [`RngFactory`]; a generator is never shared between threads.

use rand::{Error, Rng, RngCore, SeedableRng};
use rand_distr::Distribution;
use std::f64::consts::TAU;
use tracing::warn;

/// Map a 32-bit word onto the unit interval using the reference divisor `2³² − 1`.
///
/// A zero word gives exactly `0.0` and `u32::MAX` gives exactly `1.0`.
#[inline]
pub fn uniform_from_word(word: u32) -> f64 {
    word as f64 / u32::MAX as f64
}

/// Xorshift32 uniform generator
///
/// # Example
/// ```
/// use mc_option_pricer::rng::Xorshift32;
///
/// let mut rng = Xorshift32::new(1);
/// assert_eq!(rng.next_u32(), 270_369);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift32 {
    state: u32,
}

impl Xorshift32 {
    /// Seed a new generator; a zero seed is replaced by 1.
    pub fn new(seed: u32) -> Self {
        Self {
            state: Self::non_zero(seed),
        }
    }

    /// Restart the sequence from `seed` (0 is replaced by 1).
    pub fn reseed(&mut self, seed: u32) {
        self.state = Self::non_zero(seed);
    }

    /// Current position in the sequence. Never zero.
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn non_zero(seed: u32) -> u32 {
        if seed == 0 {
            1
        } else {
            seed
        }
    }

    #[inline]
    fn advance(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Advance the state and return it.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    /// Next uniform draw, `next_u32() / (2³² − 1)`.
    ///
    /// Because the state is never zero the result lies in `(0, 1]`.
    #[inline]
    pub fn next_uniform(&mut self) -> f64 {
        uniform_from_word(self.advance())
    }

    /// Next standard normal draw via [`BoxMuller`].
    #[inline]
    pub fn next_standard_normal(&mut self) -> f64 {
        BoxMuller.sample(self)
    }
}

impl RngCore for Xorshift32 {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        self.advance()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.advance() as u64;
        let lo = self.advance() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.advance().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for Xorshift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}

/// Standard normal sampler using the cosine branch of Box-Muller.
///
/// Works with any [`Rng`]; uniforms are formed from `next_u32` with
/// [`uniform_from_word`]. A first uniform of exactly `0.0` would make `ln(U₁)`
/// infinite, so such a draw is rejected and redrawn before `U₂` is taken.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxMuller;

impl Distribution<f64> for BoxMuller {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u1 = loop {
            let u = uniform_from_word(rng.next_u32());
            if u > 0.0 {
                break u;
            }
            warn!("rejected zero uniform in Box-Muller draw");
        };
        let u2 = uniform_from_word(rng.next_u32());

        (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
    }
}

/// Factory for independent, reproducible per-worker generators
pub struct RngFactory {
    base_seed: u32,
}

impl RngFactory {
    pub fn new(base_seed: u32) -> Self {
        Self { base_seed }
    }

    pub fn base_seed(&self) -> u32 {
        self.base_seed
    }

    /// Generator for worker `worker_id`.
    ///
    /// The stream seed is a splitmix64 hash of `(base_seed, worker_id)`, so nearby
    /// worker ids start far apart in the xorshift cycle.
    pub fn stream(&self, worker_id: u64) -> Xorshift32 {
        let mut z = ((self.base_seed as u64) << 32)
            .wrapping_add(worker_id)
            .wrapping_add(0x9e3779b97f4a7c15);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
        z ^= z >> 31;
        Xorshift32::new((z ^ (z >> 32)) as u32)
    }
}
