use crate::error::{CoreError, Result};
use crate::models::{Draw, FrequencyVector, MAX_DOMAIN_SIZE, NumberStats, ScoreTag, Scores};

/// Relative deviation from the uniform share above which a number is HOT (below, COLD).
pub const TAG_THRESHOLD: f64 = 0.3;

/// Folds a window of draws into per-number occurrence counts.
pub fn aggregate(draws: &[Draw], domain_size: usize) -> Result<FrequencyVector> {
    if domain_size > MAX_DOMAIN_SIZE {
        return Err(CoreError::InvalidConfig(format!(
            "domain_size must be at most {MAX_DOMAIN_SIZE}, got {domain_size}"
        )));
    }
    let mut frequency = FrequencyVector::zeros(domain_size);

    for draw in draws {
        for &n in draw.numbers() {
            if n == 0 || n as usize > domain_size {
                return Err(CoreError::malformed(
                    draw.index(),
                    format!("number {} outside 1..={}", n, domain_size),
                ));
            }
            frequency.increment(n);
        }
    }

    Ok(frequency)
}

/// Frequency and gap per number. `history` is chronological (oldest first);
/// the gap counts draws since the last appearance, the window length if never seen.
pub fn compute_stats(history: &[Draw], domain_size: usize) -> Result<Vec<NumberStats>> {
    let frequency = aggregate(history, domain_size)?;

    let stats = frequency
        .iter()
        .map(|(number, count)| {
            let gap = history
                .iter()
                .rev()
                .position(|d| d.contains(number))
                .unwrap_or(history.len());
            NumberStats {
                number,
                frequency: count,
                gap: gap as u32,
            }
        })
        .collect();

    Ok(stats)
}

pub fn tag_scores(scores: &Scores) -> Vec<ScoreTag> {
    let total = scores.total();
    let n = scores.domain_size();
    if total <= 0.0 || n == 0 {
        return vec![ScoreTag::Normal; n];
    }
    let uniform = 1.0 / n as f64;

    scores
        .as_slice()
        .iter()
        .map(|&s| {
            let deviation = (s / total - uniform) / uniform;
            if deviation > TAG_THRESHOLD {
                ScoreTag::Hot
            } else if deviation < -TAG_THRESHOLD {
                ScoreTag::Cold
            } else {
                ScoreTag::Normal
            }
        })
        .collect()
}
