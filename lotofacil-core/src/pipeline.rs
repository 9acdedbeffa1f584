use std::ops::RangeInclusive;

use rand::Rng;
use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::error::{CoreError, Result};
use crate::frequency::aggregate;
use crate::models::{CandidatePool, Draw, FrequencyVector, GameRules, PlaySet, Scores, validate_draw};
use crate::pool::select_pool;
use crate::sampler::sample_plays;
use crate::source::DrawSource;
use crate::strategy::build_strategy;

/// Hooks for logging or charting each stage. Every method defaults to a no-op.
pub trait Observer {
    fn on_fetch_start(&mut self, _indices: &RangeInclusive<u32>) {}
    fn on_draw_fetched(&mut self, _draw: &Draw) {}
    fn on_frequencies(&mut self, _frequency: &FrequencyVector) {}
    fn on_scores(&mut self, _strategy: &str, _scores: &Scores) {}
    fn on_pool(&mut self, _pool: &CandidatePool) {}
    fn on_plays(&mut self, _plays: &PlaySet) {}
}

pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Reports every stage through the `log` facade.
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_fetch_start(&mut self, indices: &RangeInclusive<u32>) {
        log::info!(
            "Fetching draws {}..={} ({} contests)",
            indices.start(),
            indices.end(),
            indices.end() - indices.start() + 1
        );
    }

    fn on_draw_fetched(&mut self, draw: &Draw) {
        log::info!("Draw {}: {:?}", draw.index(), draw.numbers());
    }

    fn on_frequencies(&mut self, frequency: &FrequencyVector) {
        log::info!("Frequencies: {:?}", frequency.as_slice());
    }

    fn on_scores(&mut self, strategy: &str, scores: &Scores) {
        log::info!("{strategy} scores: {:?}", scores.as_slice());
    }

    fn on_pool(&mut self, pool: &CandidatePool) {
        log::info!("Candidate pool: {:?}", pool.numbers());
    }

    fn on_plays(&mut self, plays: &PlaySet) {
        for (i, play) in plays.iter().enumerate() {
            log::info!("Play {}: {}", i + 1, play);
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub strategy: String,
    pub window: Vec<Draw>,
    pub frequency: FrequencyVector,
    pub scores: Scores,
    pub pool: CandidatePool,
    pub plays: PlaySet,
}

/// Fetches `[latest - window_size + 1 ..= latest]`, oldest first.
pub fn fetch_window(
    source: &dyn DrawSource,
    window_size: usize,
    rules: &GameRules,
    observer: &mut dyn Observer,
) -> Result<Vec<Draw>> {
    let latest = source.latest_index()?;
    if window_size == 0 || window_size > latest as usize {
        return Err(CoreError::InvalidConfig(format!(
            "window of {} draws requested, {} contests exist",
            window_size, latest
        )));
    }
    let first = latest - window_size as u32 + 1;
    let indices = first..=latest;
    observer.on_fetch_start(&indices);

    let mut window = Vec::with_capacity(window_size);
    for index in indices {
        let draw = source.fetch_draw(index)?;
        if draw.index() != index {
            return Err(CoreError::malformed(
                draw.index(),
                format!("requested contest {index}, received {}", draw.index()),
            ));
        }
        validate_draw(&draw, rules)?;
        observer.on_draw_fetched(&draw);
        window.push(draw);
    }
    Ok(window)
}

/// Scores, ranks and samples on a window already in memory.
pub fn analyze<R: Rng + ?Sized>(
    history: Vec<Draw>,
    config: &AnalysisConfig,
    rng: &mut R,
    observer: &mut dyn Observer,
) -> Result<AnalysisReport> {
    config.validate()?;
    let rules = config.rules();
    for draw in &history {
        validate_draw(draw, &rules)?;
    }

    let frequency = aggregate(&history, rules.domain_size)?;
    observer.on_frequencies(&frequency);

    let strategy = build_strategy(config);
    let scores = strategy.score(&history, &rules)?;
    observer.on_scores(strategy.name(), &scores);

    let pool = select_pool(&scores, config.pool_size, config.play_cardinality)?;
    observer.on_pool(&pool);

    let plays = sample_plays(&pool, config.play_cardinality, config.play_count, rng)?;
    observer.on_plays(&plays);

    Ok(AnalysisReport {
        strategy: strategy.name().to_string(),
        window: history,
        frequency,
        scores,
        pool,
        plays,
    })
}

/// Validates the configuration, fetches the window and runs the analysis.
/// All or nothing: the first error aborts the run.
pub fn run<R: Rng + ?Sized>(
    source: &dyn DrawSource,
    config: &AnalysisConfig,
    rng: &mut R,
    observer: &mut dyn Observer,
) -> Result<AnalysisReport> {
    config.validate()?;
    let history = fetch_window(source, config.window_size, &config.rules(), observer)?;
    analyze(history, config, rng, observer)
}
