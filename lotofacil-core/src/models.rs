use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Shape of the game: numbers are drawn from 1..=domain_size, draw_size per contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRules {
    pub domain_size: usize,
    pub draw_size: usize,
}

impl GameRules {
    pub const LOTOFACIL: GameRules = GameRules {
        domain_size: 25,
        draw_size: 15,
    };

    pub fn contains(&self, number: u8) -> bool {
        number >= 1 && (number as usize) <= self.domain_size
    }
}

impl Default for GameRules {
    fn default() -> Self {
        GameRules::LOTOFACIL
    }
}

/// One official result. Numbers are kept sorted ascending and pairwise distinct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draw {
    index: u32,
    date: Option<NaiveDate>,
    numbers: Vec<u8>,
}

impl Draw {
    pub fn new(index: u32, numbers: impl IntoIterator<Item = u8>) -> Result<Self> {
        if index == 0 {
            return Err(CoreError::malformed(index, "contest index must be positive"));
        }
        let mut numbers: Vec<u8> = numbers.into_iter().collect();
        if numbers.is_empty() {
            return Err(CoreError::malformed(index, "no numbers"));
        }
        numbers.sort_unstable();
        if numbers[0] == 0 {
            return Err(CoreError::malformed(index, "number 0 is outside every domain"));
        }
        if let Some(pair) = numbers.windows(2).find(|w| w[0] == w[1]) {
            return Err(CoreError::malformed(index, format!("duplicate number {}", pair[0])));
        }
        Ok(Draw {
            index,
            date: None,
            numbers,
        })
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.binary_search(&number).is_ok()
    }
}

/// Checks a draw against the domain and cardinality of the game.
pub fn validate_draw(draw: &Draw, rules: &GameRules) -> Result<()> {
    for &n in draw.numbers() {
        if !rules.contains(n) {
            return Err(CoreError::malformed(
                draw.index(),
                format!("number {} outside 1..={}", n, rules.domain_size),
            ));
        }
    }
    if draw.numbers().len() != rules.draw_size {
        return Err(CoreError::malformed(
            draw.index(),
            format!(
                "{} numbers drawn, expected {}",
                draw.numbers().len(),
                rules.draw_size
            ),
        ));
    }
    Ok(())
}

/// Occurrence count of every number of the domain over a window of draws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyVector {
    counts: Vec<u32>,
}

impl FrequencyVector {
    pub(crate) fn zeros(domain_size: usize) -> Self {
        FrequencyVector {
            counts: vec![0; domain_size],
        }
    }

    pub(crate) fn increment(&mut self, number: u8) {
        self.counts[(number - 1) as usize] += 1;
    }

    pub fn domain_size(&self) -> usize {
        self.counts.len()
    }

    /// Count for `number` (1-based), `None` outside the domain.
    pub fn count(&self, number: u8) -> Option<u32> {
        if number == 0 {
            return None;
        }
        self.counts.get((number - 1) as usize).copied()
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, &c)| ((i + 1) as u8, c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedNumber {
    pub number: u8,
    pub score: f64,
}

/// Dense mapping number -> score, indexed from 1.
/// Numbers are `u8`, so no domain can hold more than 255 of them.
pub const MAX_DOMAIN_SIZE: usize = u8::MAX as usize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scores {
    values: Vec<f64>,
}

impl Scores {
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() > MAX_DOMAIN_SIZE {
            return Err(CoreError::InvalidConfig(format!(
                "{} scores given, a domain holds at most {}",
                values.len(),
                MAX_DOMAIN_SIZE
            )));
        }
        for (i, &score) in values.iter().enumerate() {
            if !score.is_finite() || score < 0.0 {
                return Err(CoreError::InvalidScore {
                    number: (i + 1) as u8,
                    score,
                });
            }
        }
        Ok(Scores { values })
    }

    pub fn from_frequency(frequency: &FrequencyVector) -> Self {
        Scores {
            values: frequency.as_slice().iter().map(|&c| c as f64).collect(),
        }
    }

    pub fn domain_size(&self) -> usize {
        self.values.len()
    }

    pub fn get(&self, number: u8) -> Option<f64> {
        if number == 0 {
            return None;
        }
        self.values.get((number - 1) as usize).copied()
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, &s)| ((i + 1) as u8, s))
    }

    /// Descending score, ties broken by ascending number.
    pub fn ranked(&self) -> Vec<RankedNumber> {
        let mut ranked: Vec<RankedNumber> = self
            .iter()
            .map(|(number, score)| RankedNumber { number, score })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.number.cmp(&b.number))
        });
        ranked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ScoreTag {
    Hot,
    Cold,
    Normal,
}

impl fmt::Display for ScoreTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreTag::Hot => write!(f, "HOT"),
            ScoreTag::Cold => write!(f, "COLD"),
            ScoreTag::Normal => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}

/// Numbers eligible for sampling, in ranking order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidatePool {
    numbers: Vec<u8>,
}

impl CandidatePool {
    pub fn from_numbers(numbers: Vec<u8>) -> Result<Self> {
        for (i, n) in numbers.iter().enumerate() {
            if numbers[..i].contains(n) {
                return Err(CoreError::DuplicateCandidate(*n));
            }
        }
        Ok(CandidatePool { numbers })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }
}

/// One generated guess, sorted ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Play {
    numbers: Vec<u8>,
}

impl Play {
    pub(crate) fn from_picks(mut picks: Vec<u8>) -> Self {
        picks.sort_unstable();
        Play { numbers: picks }
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .numbers
            .iter()
            .map(|n| format!("{:02}", n))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "{joined}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaySet {
    plays: Vec<Play>,
}

impl PlaySet {
    pub(crate) fn with_capacity(count: usize) -> Self {
        PlaySet {
            plays: Vec::with_capacity(count),
        }
    }

    pub(crate) fn push(&mut self, play: Play) {
        self.plays.push(play);
    }

    pub fn plays(&self) -> &[Play] {
        &self.plays
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Play> {
        self.plays.iter()
    }
}

impl<'a> IntoIterator for &'a PlaySet {
    type Item = &'a Play;
    type IntoIter = std::slice::Iter<'a, Play>;

    fn into_iter(self) -> Self::IntoIter {
        self.plays.iter()
    }
}

/// Synthetic chronological history used by tests across the crate.
#[cfg(test)]
pub(crate) fn make_test_draws(n: usize, rules: &GameRules) -> Vec<Draw> {
    (0..n)
        .map(|i| {
            let offset = i % rules.domain_size;
            let numbers = (0..rules.draw_size)
                .map(|k| ((offset + k * 2) % rules.domain_size + 1) as u8)
                .collect::<std::collections::BTreeSet<_>>();
            let mut numbers: Vec<u8> = numbers.into_iter().collect();
            let mut next = 1u8;
            while numbers.len() < rules.draw_size {
                if !numbers.contains(&next) {
                    numbers.push(next);
                }
                next += 1;
            }
            Draw::new((i + 1) as u32, numbers).unwrap()
        })
        .collect()
}
