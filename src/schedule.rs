use crate::constants::{FIRST_ROUND_PAIRINGS, REGION_SIZE};
use crate::error::BracketError;
use crate::Seed;

/// A slot's opponent for one round.
///
/// Round 1 opponents are fixed by the pairings. From round 2 on, the
/// opponent is whichever member of the candidate set is still alive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundDescriptor {
    Fixed(Seed),
    AnyOf(Vec<Seed>),
}

/// The full opponent path for one slot, one descriptor per round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotPath {
    slot: Seed,
    rounds: Vec<RoundDescriptor>,
}

impl SlotPath {
    /// The top-half seed that names this slot.
    pub fn slot(&self) -> Seed {
        self.slot
    }

    /// Opponent descriptors in round order.
    pub fn rounds(&self) -> &[RoundDescriptor] {
        &self.rounds
    }
}

/// The physical structure of a single-elimination region.
///
/// Only the top-half slots own a path; bottom-half seeds inherit a slot's
/// remaining path by winning that slot's round-1 game. The schedule is
/// immutable once built and safe to share across concurrent simulators.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeedPathSchedule {
    paths: Vec<SlotPath>,
}

impl SeedPathSchedule {
    /// The real 16-seed region structure (1v16, 8v9, 5v12, 4v13, 6v11,
    /// 3v14, 7v10, 2v15).
    pub fn standard() -> Self {
        Self::from_pairings(&FIRST_ROUND_PAIRINGS)
            .expect("standard pairings are valid")
    }

    /// Build a schedule from round-1 pairings given in bracket order.
    ///
    /// Adjacency is derived bottom-up: the game at index `i` meets its
    /// sibling game in round 2, the sibling block of two games in round 3,
    /// and so on, which is how every later-round candidate set is produced.
    /// The pairing count must be a power of two and every seed distinct.
    pub fn from_pairings(pairings: &[(Seed, Seed)]) -> Result<Self, BracketError> {
        let n = pairings.len();
        if n == 0 || !n.is_power_of_two() {
            return Err(BracketError::InvalidPairingCount(n));
        }

        let mut seen = [false; REGION_SIZE + 1];
        for &(top, bottom) in pairings {
            for seed in [top, bottom] {
                if seed < 1 || seed as usize > REGION_SIZE {
                    return Err(BracketError::SeedOutOfRange(seed));
                }
                if seen[seed as usize] {
                    return Err(BracketError::DuplicateSeed(seed));
                }
                seen[seed as usize] = true;
            }
        }

        let rounds = n.trailing_zeros() as usize + 1;
        let mut paths: Vec<SlotPath> = pairings
            .iter()
            .map(|&(top, bottom)| SlotPath {
                slot: top,
                rounds: vec![RoundDescriptor::Fixed(bottom)],
            })
            .collect();

        for round in 2..=rounds {
            // Number of round-1 games feeding each side of a round-`round` game.
            let block = 1usize << (round - 2);
            for (i, path) in paths.iter_mut().enumerate() {
                let sibling = (i / block) ^ 1;
                let start = sibling * block;
                let mut candidates: Vec<Seed> = pairings[start..start + block]
                    .iter()
                    .flat_map(|&(top, bottom)| [top, bottom])
                    .collect();
                candidates.sort_unstable();
                path.rounds.push(RoundDescriptor::AnyOf(candidates));
            }
        }

        Ok(SeedPathSchedule { paths })
    }

    /// Number of slots (round-1 games anchored by a top-half seed).
    pub fn slot_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of rounds a full run plays.
    pub fn rounds(&self) -> usize {
        self.paths.first().map_or(0, |path| path.rounds.len())
    }

    /// Slot paths in bracket order.
    pub fn paths(&self) -> &[SlotPath] {
        &self.paths
    }

    /// The descriptor a slot consumes in a given round (0-indexed).
    pub fn descriptor(&self, slot: Seed, round: usize) -> Option<&RoundDescriptor> {
        self.paths
            .iter()
            .find(|path| path.slot == slot)
            .and_then(|path| path.rounds.get(round))
    }
}
