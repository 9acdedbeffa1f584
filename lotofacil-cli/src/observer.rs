use std::ops::RangeInclusive;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};

use lotofacil_core::models::{CandidatePool, Draw, FrequencyVector, PlaySet, Scores};
use lotofacil_core::pipeline::{LogObserver, Observer};

/// Progress bar while draws are fetched; every stage is also logged.
pub struct ProgressObserver {
    style: ProgressStyle,
    bar: Option<ProgressBar>,
    log: LogObserver,
}

impl ProgressObserver {
    pub fn new() -> Result<Self> {
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("=> ");
        Ok(Self {
            style,
            bar: None,
            log: LogObserver,
        })
    }

    pub fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Observer for ProgressObserver {
    fn on_fetch_start(&mut self, indices: &RangeInclusive<u32>) {
        self.log.on_fetch_start(indices);
        let total = (indices.end() - indices.start() + 1) as u64;
        let bar = ProgressBar::new(total);
        bar.set_style(self.style.clone());
        self.bar = Some(bar);
    }

    fn on_draw_fetched(&mut self, draw: &Draw) {
        self.log.on_draw_fetched(draw);
        if let Some(bar) = &self.bar {
            bar.set_message(format!("concours {}", draw.index()));
            bar.inc(1);
        }
    }

    fn on_frequencies(&mut self, frequency: &FrequencyVector) {
        self.finish();
        self.log.on_frequencies(frequency);
    }

    fn on_scores(&mut self, strategy: &str, scores: &Scores) {
        self.log.on_scores(strategy, scores);
    }

    fn on_pool(&mut self, pool: &CandidatePool) {
        self.log.on_pool(pool);
    }

    fn on_plays(&mut self, plays: &PlaySet) {
        self.log.on_plays(plays);
    }
}
