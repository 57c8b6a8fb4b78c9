use crate::constants::SINGLE_REGION_SEARCH_SPACE;
use crate::error::BracketError;
use crate::Seed;

/// Clip an array of continuous inputs onto a discrete search space.
///
/// Each input, in order, snaps to the candidate minimizing absolute
/// distance; ties break to the candidate appearing earliest in the current
/// working copy's order, not to the numerically smaller one. With
/// `replace = false` a chosen candidate is removed before the next input,
/// which makes the assignment duplicate-free (each seed used at most once
/// within a region); running out of candidates with inputs remaining fails
/// with [`BracketError::ExhaustedSearchSpace`] rather than wrapping
/// around.
///
/// # Arguments
/// * `values` - Continuous optimizer proposals, one per output position
/// * `search_space` - Candidate values; defaults to the seeds 1..=16
/// * `replace` - Whether a chosen candidate stays available for reuse
///
/// # Returns
/// Discrete values, same length and position-aligned with `values`.
pub fn clip_to_search_space(
    values: &[f64],
    search_space: Option<&[Seed]>,
    replace: bool,
) -> Result<Vec<Seed>, BracketError> {
    let space = search_space.unwrap_or(&SINGLE_REGION_SEARCH_SPACE);
    let mut working: Vec<Seed> = space.to_vec();
    let mut output = Vec::with_capacity(values.len());

    for &value in values {
        if working.is_empty() {
            return Err(BracketError::ExhaustedSearchSpace {
                requested: values.len(),
                available: space.len(),
            });
        }
        // min_by keeps the first of equally-distant candidates, which is
        // exactly the working-copy-order tie-break.
        let nearest = working
            .iter()
            .enumerate()
            .map(|(i, &candidate)| (i, (f64::from(candidate) - value).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
            .expect("working copy is non-empty");

        output.push(working[nearest]);
        if !replace {
            working.remove(nearest);
        }
    }

    Ok(output)
}
