//! Pool allocation: partitioning the surviving items into per-participant
//! selection pools.

use crate::error::{DraftError, Result};
use rand::Rng;
use rand::seq::SliceRandom;

/// Shuffles `available` uniformly and slices it into `participant_count`
/// disjoint pools of exactly `pool_size`, in participant order.
///
/// Leftover items beyond `participant_count * pool_size` stay unassigned.
///
/// # Errors
///
/// Returns [`DraftError::Insufficient`] when fewer than
/// `participant_count * pool_size` items are available.
pub fn allocate<R: Rng>(
    available: &[String],
    participant_count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Result<Vec<Vec<String>>> {
    let required = participant_count * pool_size;
    if available.len() < required {
        return Err(DraftError::Insufficient {
            available: available.len(),
            required,
        });
    }
    if required == 0 {
        return Ok(vec![Vec::new(); participant_count]);
    }

    let mut shuffled = available.to_vec();
    shuffled.shuffle(rng);

    Ok(shuffled
        .chunks_exact(pool_size)
        .take(participant_count)
        .map(|chunk| chunk.to_vec())
        .collect())
}
