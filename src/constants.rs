use crate::Seed;

/// Number of seeds in one region.
pub const REGION_SIZE: usize = 16;

/// Round-1 pairings for a full region, in bracket order.
///
/// Each entry is (top-half seed, bottom-half seed); the top-half seed names
/// the slot. Adjacent pairings meet in round 2, adjacent pairs of pairings
/// in round 3, and so on.
pub const FIRST_ROUND_PAIRINGS: [(Seed, Seed); 8] = [
    (1, 16),
    (8, 9),
    (5, 12),
    (4, 13),
    (6, 11),
    (3, 14),
    (7, 10),
    (2, 15),
];

/// Default discrete search space for single-region discretization.
pub const SINGLE_REGION_SEARCH_SPACE: [Seed; REGION_SIZE] =
    [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
