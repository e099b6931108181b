//! Account number generation
use std::ops::RangeInclusive;

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Every account number is a 10 digit decimal from this range
pub const ACCOUNT_NUMBER_RANGE: RangeInclusive<u64> = 1_000_000_000..=9_999_999_999;

/// Draws a ledger makes before giving up on finding a free account number
pub const MAX_NUMBER_DRAWS: usize = 64;

/// Source of candidate account numbers.
///
/// Candidates are not required to be unique. The ledger draws again on a
/// taken or out of range candidate, at most [`MAX_NUMBER_DRAWS`] times.
pub trait AccountNumberSource {
    /// next candidate, expected inside [`ACCOUNT_NUMBER_RANGE`]
    fn next_number(&mut self) -> u64;
}

impl<F: FnMut() -> u64> AccountNumberSource for F {
    fn next_number(&mut self) -> u64 {
        self()
    }
}

/// Uniformly random account numbers
#[derive(Debug, Clone)]
pub struct RandomAccountNumbers(StdRng);

impl RandomAccountNumbers {
    /// Seeded from the operating system
    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }

    /// Reproducible sequence for `seed`
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomAccountNumbers {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl AccountNumberSource for RandomAccountNumbers {
    fn next_number(&mut self) -> u64 {
        self.0.gen_range(ACCOUNT_NUMBER_RANGE)
    }
}
