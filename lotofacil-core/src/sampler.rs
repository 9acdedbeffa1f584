use rand::{Rng, RngExt};

use crate::error::{CoreError, Result};
use crate::models::{CandidatePool, Play, PlaySet};

/// Draws one play of `play_size` distinct numbers from the pool.
///
/// Uniform picks over the whole pool; a pick already in the play is rejected
/// and drawn again, so the expected number of attempts grows harmonically as
/// the play fills up.
pub fn sample_play<R: Rng + ?Sized>(
    pool: &CandidatePool,
    play_size: usize,
    rng: &mut R,
) -> Result<Play> {
    check_sample(pool, play_size)?;

    let numbers = pool.numbers();
    let mut picks: Vec<u8> = Vec::with_capacity(play_size);
    let mut attempts = 0usize;

    while picks.len() < play_size {
        let candidate = numbers[rng.random_range(0..numbers.len())];
        attempts += 1;
        if !picks.contains(&candidate) {
            picks.push(candidate);
        }
    }

    log::trace!("Play completed after {attempts} attempts");
    Ok(Play::from_picks(picks))
}

/// Generates `count` independent plays. Fails before sampling anything if the
/// pool cannot hold a full play.
pub fn sample_plays<R: Rng + ?Sized>(
    pool: &CandidatePool,
    play_size: usize,
    count: usize,
    rng: &mut R,
) -> Result<PlaySet> {
    check_sample(pool, play_size)?;

    let mut plays = PlaySet::with_capacity(count);
    for _ in 0..count {
        plays.push(sample_play(pool, play_size, rng)?);
    }
    Ok(plays)
}

fn check_sample(pool: &CandidatePool, play_size: usize) -> Result<()> {
    if play_size == 0 {
        return Err(CoreError::InvalidConfig("play size must be positive".to_string()));
    }
    if pool.len() < play_size {
        return Err(CoreError::ImpossibleSample {
            play_size,
            pool_len: pool.len(),
        });
    }
    Ok(())
}
