use statrs::distribution::{ContinuousCDF, Normal};

use crate::constants::REGION_SIZE;
use crate::region::{PointsBySeed, RegionOutcome};
use crate::Seed;

/// Points a chosen set of seeds captured in one replicate.
pub fn selection_score(points: &PointsBySeed, selection: &[Seed]) -> u32 {
    selection.iter().map(|&seed| points.get(seed)).sum()
}

/// Per-seed mean points across a batch of replicates, seed-indexed.
pub fn expected_points(outcomes: &[RegionOutcome]) -> [f64; REGION_SIZE] {
    let mut means = [0.0; REGION_SIZE];
    if outcomes.is_empty() {
        return means;
    }
    for outcome in outcomes {
        for (seed, points) in outcome.points_by_seed.iter() {
            means[seed as usize - 1] += f64::from(points);
        }
    }
    for mean in &mut means {
        *mean /= outcomes.len() as f64;
    }
    means
}

/// How often each seed won the region, seed-indexed.
pub fn champion_counts(outcomes: &[RegionOutcome]) -> [u32; REGION_SIZE] {
    let mut counts = [0; REGION_SIZE];
    for outcome in outcomes {
        counts[outcome.champion as usize - 1] += 1;
    }
    counts
}

/// Sampling summary of a seed selection's score across replicates.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionSummary {
    pub mean: f64,
    pub stddev: f64,
    pub std_error: f64,
}

impl SelectionSummary {
    /// Normal-approximation confidence interval around the mean at the
    /// given level, e.g. 0.95.
    pub fn confidence_interval(&self, level: f64) -> (f64, f64) {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let z = normal.inverse_cdf(0.5 + level / 2.0);
        (self.mean - z * self.std_error, self.mean + z * self.std_error)
    }
}

/// Summarize a selection's score over a batch of replicates.
///
/// Uses the sample standard deviation; a batch of fewer than two
/// replicates reports zero spread.
pub fn selection_summary(outcomes: &[RegionOutcome], selection: &[Seed]) -> SelectionSummary {
    let n = outcomes.len();
    if n == 0 {
        return SelectionSummary {
            mean: 0.0,
            stddev: 0.0,
            std_error: 0.0,
        };
    }

    let scores: Vec<f64> = outcomes
        .iter()
        .map(|outcome| f64::from(selection_score(&outcome.points_by_seed, selection)))
        .collect();
    let mean = scores.iter().sum::<f64>() / n as f64;

    let stddev = if n > 1 {
        let variance = scores
            .iter()
            .map(|score| (score - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    SelectionSummary {
        mean,
        stddev,
        std_error: stddev / (n as f64).sqrt(),
    }
}
