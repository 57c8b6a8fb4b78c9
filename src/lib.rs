//! Bracket Core - single-region tournament simulation for bracket scoring.
//!
//! This library simulates one 16-team elimination region from historical
//! seed-vs-seed win probabilities and snaps continuous optimizer proposals
//! onto discrete seed assignments, so an outer optimization procedure can
//! repeatedly score hypothetical bracket outcomes.

pub mod constants;
pub mod discretize;
pub mod error;
pub mod region;
pub mod schedule;
pub mod scoring;
pub mod win_prob;

pub use constants::{FIRST_ROUND_PAIRINGS, REGION_SIZE, SINGLE_REGION_SEARCH_SPACE};
pub use discretize::clip_to_search_space;
pub use error::BracketError;
pub use region::{PointsBySeed, RegionBracket, RegionBracketSimulator, RegionOutcome};
pub use schedule::{RoundDescriptor, SeedPathSchedule, SlotPath};
pub use scoring::{
    champion_counts, expected_points, selection_score, selection_summary, SelectionSummary,
};
pub use win_prob::WinProbabilityTable;

/// Integer rank identifying a competitor within a region, 1..=16.
pub type Seed = u8;
