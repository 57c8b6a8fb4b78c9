use thiserror::Error;

use crate::Seed;

/// Errors produced by bracket construction, simulation, and discretization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BracketError {
    /// A matchup was drawn whose probability is absent in both directions.
    /// Fatal to the current simulation run; a table gap is a data-contract
    /// violation, not a 50/50 default.
    #[error("matchup probability is missing: ({seed_a}, {seed_b})")]
    MissingMatchupProbability { seed_a: Seed, seed_b: Seed },

    /// The discrete search space ran out of candidates before all
    /// continuous inputs were consumed.
    #[error("search space exhausted: {requested} inputs but only {available} candidates")]
    ExhaustedSearchSpace { requested: usize, available: usize },

    /// A seed outside the valid range for a region.
    #[error("seed {0} is outside the valid range 1..=16")]
    SeedOutOfRange(Seed),

    /// A win probability outside [0, 1].
    #[error("win probability {value} for seeds ({seed_a}, {seed_b}) is outside [0, 1]")]
    InvalidProbability {
        seed_a: Seed,
        seed_b: Seed,
        value: f64,
    },

    /// The same unordered seed pair was populated more than once.
    #[error("win probability for seeds ({seed_a}, {seed_b}) is populated in both directions")]
    ConflictingMatchup { seed_a: Seed, seed_b: Seed },

    /// A seed appeared more than once in a set of bracket pairings.
    #[error("seed {0} appears more than once in the bracket pairings")]
    DuplicateSeed(Seed),

    /// A bracket needs a power-of-two number of round-1 pairings.
    #[error("bracket requires a power-of-two number of pairings, got {0}")]
    InvalidPairingCount(usize),
}
