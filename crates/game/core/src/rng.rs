//! Seedable randomness for combat rolls.
//!
//! The engine never touches a global RNG. Every probability roll goes
//! through a [`Roller`], and the production roller ([`RollStream`]) is a
//! pure function of `(seed, draw index)`, so any fight can be replayed from
//! its seed.
//!
//! # Determinism
//!
//! All [`RngOracle`] implementations must be deterministic: given the same
//! seed they must produce the same value.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Roll a percentage in `[0, 100)`.
    fn roll_percent(&self, seed: u64) -> u32 {
        self.next_u32(seed) % 100
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// This implementation uses PCG-XSH-RR, which produces 32-bit output from
/// 64-bit state.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Advance the PCG state by one step.
    ///
    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// PCG output function using XSH-RR (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = Self::pcg_step(seed);
        Self::pcg_output(state)
    }
}

/// Compute a deterministic seed from independent entropy sources.
///
/// # Arguments
///
/// * `base_seed` - Seed chosen for the whole encounter
/// * `nonce` - Draw sequence number within the encounter
/// * `actor` - Hash of the actor the roll belongs to (0 when not actor specific)
/// * `context` - Discriminates several rolls made for the same draw
pub fn compute_seed(base_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    let mut hash = base_seed;

    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    // Final avalanche step (SplitMix64 finalizer)
    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}

/// Source of rolls consumed by the effect engine and combat resolver.
pub trait Roller {
    /// Uniform draw in `[0, 100)`.
    fn roll_percent(&mut self) -> u32;

    /// Uniform draw in `[min, max]` inclusive.
    fn roll_range(&mut self, min: u32, max: u32) -> u32;

    /// Percentage check: succeeds iff a fresh draw is below `rate`.
    ///
    /// A rate of 0 never succeeds and a rate of 100 or more always does,
    /// but a draw is consumed either way so roll sequences stay aligned.
    fn check(&mut self, rate: u32) -> bool {
        self.roll_percent() < rate
    }
}

/// Replayable roll stream: `(seed, draw index)` through an [`RngOracle`].
#[derive(Clone, Debug)]
pub struct RollStream<R: RngOracle = PcgRng> {
    oracle: R,
    seed: u64,
    draws: u64,
}

impl RollStream<PcgRng> {
    /// Creates a PCG-backed stream for `seed`.
    pub fn new(seed: u64) -> Self {
        Self::with_oracle(PcgRng, seed)
    }
}

impl<R: RngOracle> RollStream<R> {
    pub fn with_oracle(oracle: R, seed: u64) -> Self {
        Self {
            oracle,
            seed,
            draws: 0,
        }
    }

    /// Seed the stream was created with.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of draws consumed so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    fn next_seed(&mut self) -> u64 {
        let seed = compute_seed(self.seed, self.draws, 0, 0);
        self.draws += 1;
        seed
    }
}

impl<R: RngOracle> Roller for RollStream<R> {
    fn roll_percent(&mut self) -> u32 {
        let seed = self.next_seed();
        self.oracle.roll_percent(seed)
    }

    fn roll_range(&mut self, min: u32, max: u32) -> u32 {
        let seed = self.next_seed();
        self.oracle.range(seed, min, max)
    }
}

/// Roller that replays a fixed sequence of values, cycling when exhausted.
///
/// `roll_percent` returns `value % 100`; `roll_range` clamps the value into
/// `[min, max]`. Intended for tests and balance tooling that need to force
/// specific outcomes.
#[derive(Clone, Debug)]
pub struct FixedRolls {
    values: Vec<u32>,
    cursor: usize,
}

impl FixedRolls {
    pub fn new(values: impl Into<Vec<u32>>) -> Self {
        let mut values = values.into();
        if values.is_empty() {
            values.push(0);
        }
        Self { values, cursor: 0 }
    }

    /// Roller that always returns `value`.
    pub fn constant(value: u32) -> Self {
        Self::new(vec![value])
    }

    fn next(&mut self) -> u32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}

impl Roller for FixedRolls {
    fn roll_percent(&mut self) -> u32 {
        self.next() % 100
    }

    fn roll_range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            self.next();
            return min;
        }
        self.next().clamp(min, max)
    }
}
