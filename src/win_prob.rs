use std::collections::HashMap;

use crate::constants::REGION_SIZE;
use crate::error::BracketError;
use crate::Seed;

/// Historical head-to-head win probabilities between seed pairs.
///
/// The table is sparse and direction-sensitive at the storage level: each
/// unordered pair is populated in at most one direction, and the reverse
/// direction is defined as the complement. Which direction the producer
/// chose is not knowable from the seed ordering, so every read goes
/// through the symmetric [`win_probability`](Self::win_probability)
/// lookup. A pair populated in neither direction is an error, never a
/// 50/50 default; the 0.50 rule for never-observed matchups belongs to
/// the table producer.
#[derive(Clone, Debug, Default)]
pub struct WinProbabilityTable {
    probs: HashMap<(Seed, Seed), f64>,
}

impl WinProbabilityTable {
    /// Build a table from the producer's nested mapping of
    /// seed -> {opponent -> probability seed beats opponent}.
    pub fn new(by_seed: HashMap<Seed, HashMap<Seed, f64>>) -> Result<Self, BracketError> {
        Self::from_entries(by_seed.into_iter().flat_map(|(seed, opponents)| {
            opponents
                .into_iter()
                .map(move |(opponent, prob)| (seed, opponent, prob))
        }))
    }

    /// Build a table from flat (seed, opponent, probability) triples.
    pub fn from_entries(
        entries: impl IntoIterator<Item = (Seed, Seed, f64)>,
    ) -> Result<Self, BracketError> {
        let mut probs = HashMap::new();
        for (seed, opponent, prob) in entries {
            for s in [seed, opponent] {
                if s < 1 || s as usize > REGION_SIZE {
                    return Err(BracketError::SeedOutOfRange(s));
                }
            }
            if !(0.0..=1.0).contains(&prob) {
                return Err(BracketError::InvalidProbability {
                    seed_a: seed,
                    seed_b: opponent,
                    value: prob,
                });
            }
            // Populating an unordered pair twice contradicts the
            // one-direction invariant even when the values agree.
            if probs.contains_key(&(seed, opponent)) || probs.contains_key(&(opponent, seed)) {
                return Err(BracketError::ConflictingMatchup {
                    seed_a: seed,
                    seed_b: opponent,
                });
            }
            probs.insert((seed, opponent), prob);
        }
        Ok(WinProbabilityTable { probs })
    }

    /// Probability that `seed` beats `opponent`.
    ///
    /// Checks the (seed, opponent) direction first, then falls back to the
    /// complement of (opponent, seed). A pair absent in both directions
    /// fails with [`BracketError::MissingMatchupProbability`].
    pub fn win_probability(&self, seed: Seed, opponent: Seed) -> Result<f64, BracketError> {
        if let Some(&prob) = self.probs.get(&(seed, opponent)) {
            return Ok(prob);
        }
        if let Some(&prob) = self.probs.get(&(opponent, seed)) {
            return Ok(1.0 - prob);
        }
        Err(BracketError::MissingMatchupProbability {
            seed_a: seed,
            seed_b: opponent,
        })
    }

    /// Whether the pair is populated in either direction.
    pub fn contains(&self, seed: Seed, opponent: Seed) -> bool {
        self.probs.contains_key(&(seed, opponent)) || self.probs.contains_key(&(opponent, seed))
    }

    /// Number of populated pairs.
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }
}
