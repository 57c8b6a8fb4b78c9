use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::constants::REGION_SIZE;
use crate::error::BracketError;
use crate::schedule::{RoundDescriptor, SeedPathSchedule};
use crate::win_prob::WinProbabilityTable;
use crate::Seed;

/// Points accumulated by each seed over one simulation run.
///
/// Always 16 entries, seeds 1..=16, zero for seeds that never won a game.
/// A win scores the winner's own seed value, so an upset by a high seed
/// number is worth more than a favorite's win.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PointsBySeed {
    totals: [u32; REGION_SIZE],
}

impl PointsBySeed {
    pub fn new() -> Self {
        Self::default()
    }

    fn add_win(&mut self, winner: Seed) {
        self.totals[winner as usize - 1] += u32::from(winner);
    }

    /// Points scored by a seed. Seeds must be in 1..=16.
    pub fn get(&self, seed: Seed) -> u32 {
        self.totals[seed as usize - 1]
    }

    /// (seed, points) pairs for all 16 seeds in seed order.
    pub fn iter(&self) -> impl Iterator<Item = (Seed, u32)> + '_ {
        self.totals
            .iter()
            .enumerate()
            .map(|(i, &points)| (i as Seed + 1, points))
    }

    /// Total points scored across all seeds.
    pub fn total(&self) -> u32 {
        self.totals.iter().sum()
    }
}

/// The result of one completed region run.
#[derive(Clone, Debug)]
pub struct RegionOutcome {
    pub points_by_seed: PointsBySeed,
    /// Occupant of the last surviving slot.
    pub champion: Seed,
    /// 15 for a standard region: 8 + 4 + 2 + 1.
    pub games_played: u32,
}

/// One bracket slot's mutable round state.
///
/// Slot identity is structural: the slot keeps its future opponents
/// regardless of who currently occupies it, so a bottom-half seed that
/// wins round 1 continues with the slot's path, not a path of its own.
#[derive(Clone, Debug)]
struct SlotState {
    slot: Seed,
    occupant: Seed,
    path: Vec<RoundDescriptor>,
}

/// Single-use simulator for one region run.
///
/// Owns its private slot state, points, and an independently seeded RNG,
/// so any number of instances can run concurrently over the same shared
/// schedule and table. [`simulate`](Self::simulate) consumes the instance;
/// each run requires a fresh one.
pub struct RegionBracketSimulator<'a> {
    table: &'a WinProbabilityTable,
    slots: Vec<SlotState>,
    points: PointsBySeed,
    round: usize,
    rounds_total: usize,
    games_played: u32,
    rng: ChaCha8Rng,
}

impl<'a> RegionBracketSimulator<'a> {
    /// Fresh per-run state from a shared schedule and table.
    ///
    /// An explicit `seed` makes the run reproducible; `None` seeds from
    /// entropy.
    pub fn new(
        schedule: &SeedPathSchedule,
        table: &'a WinProbabilityTable,
        seed: Option<u64>,
    ) -> Self {
        let slots = schedule
            .paths()
            .iter()
            .map(|path| SlotState {
                slot: path.slot(),
                occupant: path.slot(),
                path: path.rounds().to_vec(),
            })
            .collect();

        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };

        RegionBracketSimulator {
            table,
            slots,
            points: PointsBySeed::new(),
            round: 0,
            rounds_total: schedule.rounds(),
            games_played: 0,
            rng,
        }
    }

    /// Run every round to completion.
    ///
    /// A missing matchup probability aborts the run and propagates; it is
    /// never defaulted in here.
    pub fn simulate(mut self) -> Result<RegionOutcome, BracketError> {
        for _ in 0..self.rounds_total {
            self.play_round()?;
        }
        debug_assert_eq!(self.slots.len(), 1);
        let champion = self.slots[0].occupant;
        Ok(RegionOutcome {
            points_by_seed: self.points,
            champion,
            games_played: self.games_played,
        })
    }

    /// Resolve every matchup of the current round and replace the slot
    /// state with the winners.
    fn play_round(&mut self) -> Result<(), BracketError> {
        let mut visited = vec![false; self.slots.len()];
        let mut survivors = Vec::with_capacity(self.slots.len());

        for i in 0..self.slots.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            let descriptor = self.slots[i].path[self.round].clone();
            let opponent = match &descriptor {
                RoundDescriptor::Fixed(seed) => *seed,
                RoundDescriptor::AnyOf(candidates) => {
                    // Earlier rounds eliminated every candidate but one;
                    // the survivor's slot retires into this one.
                    let j = (0..self.slots.len())
                        .find(|&j| !visited[j] && candidates.contains(&self.slots[j].occupant))
                        .expect("exactly one candidate seed is alive per matchup");
                    visited[j] = true;
                    self.slots[j].occupant
                }
            };

            let occupant = self.slots[i].occupant;
            let prob = self.table.win_probability(occupant, opponent)?;
            let winner = if self.rng.gen::<f64>() < prob {
                occupant
            } else {
                opponent
            };
            trace!("round {}: seed {} def. seed {}", self.round + 1, winner, if winner == occupant { opponent } else { occupant });

            self.points.add_win(winner);
            self.games_played += 1;

            // The winner inherits this slot's remaining path, whichever
            // side of the matchup it came from.
            survivors.push(SlotState {
                slot: self.slots[i].slot,
                occupant: winner,
                path: std::mem::take(&mut self.slots[i].path),
            });
        }

        self.slots = survivors;
        self.round += 1;
        Ok(())
    }
}

/// Immutable region configuration: the schedule and win-probability table
/// shared read-only across any number of simulation replicates.
#[derive(Clone, Debug)]
pub struct RegionBracket {
    schedule: SeedPathSchedule,
    table: WinProbabilityTable,
}

impl RegionBracket {
    pub fn new(schedule: SeedPathSchedule, table: WinProbabilityTable) -> Self {
        RegionBracket { schedule, table }
    }

    pub fn schedule(&self) -> &SeedPathSchedule {
        &self.schedule
    }

    pub fn win_probabilities(&self) -> &WinProbabilityTable {
        &self.table
    }

    /// A fresh single-use simulator borrowing this bracket's state.
    pub fn simulator(&self, seed: Option<u64>) -> RegionBracketSimulator<'_> {
        RegionBracketSimulator::new(&self.schedule, &self.table, seed)
    }

    /// Run one replicate.
    pub fn simulate(&self, seed: Option<u64>) -> Result<RegionOutcome, BracketError> {
        self.simulator(seed).simulate()
    }

    /// Run `n_simulations` independent replicates.
    ///
    /// A master RNG derives one sub-seed per replicate, so the whole batch
    /// is reproducible from `seed` while every replicate draws from its
    /// own stream.
    pub fn run_simulations(
        &self,
        n_simulations: usize,
        seed: Option<u64>,
    ) -> Result<Vec<RegionOutcome>, BracketError> {
        debug!("running {} region replicates", n_simulations);
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        (0..n_simulations)
            .map(|_| self.simulate(Some(rng.gen::<u64>())))
            .collect()
    }

    /// Parallel version of [`run_simulations`](Self::run_simulations).
    ///
    /// Sub-seeds are drawn from the master RNG before the parallel stage,
    /// so the batch matches the sequential form for the same `seed`.
    pub fn run_simulations_par(
        &self,
        n_simulations: usize,
        seed: Option<u64>,
    ) -> Result<Vec<RegionOutcome>, BracketError> {
        debug!("running {} region replicates in parallel", n_simulations);
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen()).collect();
        seeds
            .into_par_iter()
            .map(|s| self.simulate(Some(s)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Every pair populated; the lower seed wins with probability `prob`.
    fn make_full_table(prob: f64) -> WinProbabilityTable {
        let mut entries = Vec::new();
        for a in 1..=16u8 {
            for b in (a + 1)..=16 {
                entries.push((a, b, prob));
            }
        }
        WinProbabilityTable::from_entries(entries).unwrap()
    }

    fn make_bracket(table: WinProbabilityTable) -> RegionBracket {
        RegionBracket::new(SeedPathSchedule::standard(), table)
    }

    #[test]
    fn test_favorites_always_win() {
        let bracket = make_bracket(make_full_table(1.0));
        let outcome = bracket.simulate(Some(7)).unwrap();

        assert_eq!(outcome.champion, 1);
        assert_eq!(outcome.games_played, 15);

        // Chained deterministic wins: 1 beats 16, 8, 4, 2; 2 beats 15, 7,
        // 3; and so on down the bracket.
        let expected: [(Seed, u32); 16] = [
            (1, 4),
            (2, 6),
            (3, 6),
            (4, 8),
            (5, 5),
            (6, 6),
            (7, 7),
            (8, 8),
            (9, 0),
            (10, 0),
            (11, 0),
            (12, 0),
            (13, 0),
            (14, 0),
            (15, 0),
            (16, 0),
        ];
        for (seed, points) in expected {
            assert_eq!(outcome.points_by_seed.get(seed), points, "seed {}", seed);
        }
    }

    #[test]
    fn test_underdogs_always_win() {
        // Exercises slot inheritance: every bottom-half seed wins round 1
        // and continues with the slot's remaining path.
        let bracket = make_bracket(make_full_table(0.0));
        let outcome = bracket.simulate(Some(7)).unwrap();

        assert_eq!(outcome.champion, 16);
        assert_eq!(outcome.games_played, 15);
        assert_eq!(outcome.points_by_seed.get(16), 64);
        assert_eq!(outcome.points_by_seed.get(15), 45);
        assert_eq!(outcome.points_by_seed.get(13), 26);
        assert_eq!(outcome.points_by_seed.get(9), 9);
        for seed in 1..=8 {
            assert_eq!(outcome.points_by_seed.get(seed), 0);
        }
    }

    #[test]
    fn test_fifteen_games_regardless_of_outcomes() {
        let bracket = make_bracket(make_full_table(0.5));
        for seed in 0..20 {
            let outcome = bracket.simulate(Some(seed)).unwrap();
            assert_eq!(outcome.games_played, 15);
        }
    }

    #[test]
    fn test_same_seed_reproduces_run() {
        let bracket = make_bracket(make_full_table(0.5));
        let first = bracket.simulate(Some(42)).unwrap();
        let second = bracket.simulate(Some(42)).unwrap();
        assert_eq!(first.points_by_seed, second.points_by_seed);
        assert_eq!(first.champion, second.champion);
    }

    #[test]
    fn test_missing_matchup_aborts_run() {
        // Only round 1 is covered, so every run fails at round 2.
        let mut entries = Vec::new();
        for &(top, bottom) in &crate::constants::FIRST_ROUND_PAIRINGS {
            entries.push((top, bottom, 0.5));
        }
        let bracket = make_bracket(WinProbabilityTable::from_entries(entries).unwrap());

        let err = bracket.simulate(Some(3)).unwrap_err();
        assert!(matches!(
            err,
            BracketError::MissingMatchupProbability { .. }
        ));
    }

    #[test]
    fn test_run_simulations_batch_reproducible() {
        let bracket = make_bracket(make_full_table(0.5));
        let first = bracket.run_simulations(50, Some(11)).unwrap();
        let second = bracket.run_simulations(50, Some(11)).unwrap();

        assert_eq!(first.len(), 50);
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.points_by_seed, b.points_by_seed);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let bracket = make_bracket(make_full_table(0.5));
        let sequential = bracket.run_simulations(64, Some(99)).unwrap();
        let parallel = bracket.run_simulations_par(64, Some(99)).unwrap();

        for (a, b) in sequential.iter().zip(&parallel) {
            assert_eq!(a.points_by_seed, b.points_by_seed);
            assert_eq!(a.champion, b.champion);
        }
    }

    #[test]
    fn test_small_schedule() {
        let schedule = SeedPathSchedule::from_pairings(&[(1, 4), (2, 3)]).unwrap();
        let table = WinProbabilityTable::from_entries([
            (1, 2, 1.0),
            (1, 3, 1.0),
            (1, 4, 1.0),
            (2, 3, 1.0),
            (2, 4, 1.0),
            (3, 4, 1.0),
        ])
        .unwrap();
        let bracket = RegionBracket::new(schedule, table);
        let outcome = bracket.simulate(Some(5)).unwrap();

        assert_eq!(outcome.champion, 1);
        assert_eq!(outcome.games_played, 3);
        assert_eq!(outcome.points_by_seed.get(1), 2);
        assert_eq!(outcome.points_by_seed.get(2), 2);
    }

    #[test]
    fn test_top_seed_round_one_win_rate() {
        // P(1 beats 16) = 0.98, everything else even. Over 10,000
        // replicates seed 1 should win round 1 roughly 98% of the time;
        // any win at all implies the round-1 win.
        let mut entries = vec![(1u8, 16u8, 0.98)];
        for a in 1..=16u8 {
            for b in (a + 1)..=16 {
                if (a, b) != (1, 16) {
                    entries.push((a, b, 0.5));
                }
            }
        }
        let bracket = make_bracket(WinProbabilityTable::from_entries(entries).unwrap());

        let outcomes = bracket.run_simulations(10_000, Some(2024)).unwrap();
        let wins = outcomes
            .iter()
            .filter(|o| o.points_by_seed.get(1) > 0)
            .count();
        let rate = wins as f64 / outcomes.len() as f64;
        assert!((0.97..=0.99).contains(&rate), "win rate {}", rate);
    }

    proptest! {
        #[test]
        fn prop_simulation_invariants(
            probs in proptest::collection::vec(0.0f64..=1.0, 120),
            seed in any::<u64>(),
        ) {
            let mut entries = Vec::with_capacity(120);
            let mut k = 0;
            for a in 1..=16u8 {
                for b in (a + 1)..=16 {
                    entries.push((a, b, probs[k]));
                    k += 1;
                }
            }
            let bracket = make_bracket(
                WinProbabilityTable::from_entries(entries).unwrap(),
            );
            let outcome = bracket.simulate(Some(seed)).unwrap();

            prop_assert_eq!(outcome.games_played, 15);
            // The champion wins every round and scores its own seed value
            // each time.
            prop_assert_eq!(
                outcome.points_by_seed.get(outcome.champion),
                4 * u32::from(outcome.champion)
            );
            prop_assert_eq!(outcome.points_by_seed.iter().count(), 16);
        }
    }
}
