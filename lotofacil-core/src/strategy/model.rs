use std::collections::HashMap;

use ndarray::{Array, Array1, Array2, Axis, Dimension, Ix1, Ix2, Zip, s};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, RngExt, SeedableRng};

use super::SelectionStrategy;
use crate::config::ModelConfig;
use crate::encoding::{Encoding, encode_draw, encode_target_onehot};
use crate::error::{CoreError, Result};
use crate::models::{Draw, GameRules, Scores, validate_draw};

/// Encoded draw `t` paired with one number of draw `t+1`.
#[derive(Debug, Clone)]
pub struct TrainingSample {
    pub input: Array1<f64>,
    pub target: Array1<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub loss: f64,
    pub val_loss: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub train_samples: usize,
    pub val_samples: usize,
    pub history: Vec<EpochMetrics>,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f64> {
        self.history.last().map(|m| m.loss)
    }

    pub fn final_val_loss(&self) -> Option<f64> {
        self.history.last().and_then(|m| m.val_loss)
    }
}

/// Builds (draw t, number of draw t+1) pairs from a chronological history.
pub fn build_samples(
    history: &[Draw],
    rules: &GameRules,
    encoding: Encoding,
) -> Result<Vec<TrainingSample>> {
    if history.len() < 2 {
        return Err(CoreError::InsufficientData {
            needed: 2,
            available: history.len(),
        });
    }
    for draw in history {
        validate_draw(draw, rules)?;
    }

    let mut samples = Vec::with_capacity((history.len() - 1) * rules.draw_size);
    for pair in history.windows(2) {
        let input = encode_draw(&pair[0], encoding, rules);
        for &n in pair[1].numbers() {
            samples.push(TrainingSample {
                input: input.clone(),
                target: encode_target_onehot(n, rules),
            });
        }
    }
    Ok(samples)
}

/// One hidden ReLU layer followed by a softmax over the domain.
#[derive(Debug, Clone)]
pub struct Network {
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

struct Gradients {
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

struct Forward {
    z1: Array2<f64>,
    hidden: Array2<f64>,
    probs: Array2<f64>,
}

impl Network {
    pub fn new<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_units: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> Self {
        Network {
            w1: glorot_uniform(hidden_units, input_dim, rng),
            b1: Array1::zeros(hidden_units),
            w2: glorot_uniform(output_dim, hidden_units, rng),
            b2: Array1::zeros(output_dim),
        }
    }

    fn forward(&self, x: &Array2<f64>) -> Forward {
        let mut z1 = x.dot(&self.w1.t());
        z1 += &self.b1;
        let hidden = z1.mapv(|v| v.max(0.0));
        let mut logits = hidden.dot(&self.w2.t());
        logits += &self.b2;
        softmax_rows(&mut logits);
        Forward {
            z1,
            hidden,
            probs: logits,
        }
    }

    fn backward(&self, x: &Array2<f64>, y: &Array2<f64>, fwd: &Forward) -> Gradients {
        let n = x.nrows() as f64;
        // softmax + categorical cross-entropy
        let dz2 = (&fwd.probs - y) / n;
        let w2 = dz2.t().dot(&fwd.hidden);
        let b2 = dz2.sum_axis(Axis(0));

        let mut dh = dz2.dot(&self.w2);
        Zip::from(&mut dh).and(&fwd.z1).for_each(|g, &z| {
            if z <= 0.0 {
                *g = 0.0;
            }
        });
        let w1 = dh.t().dot(x);
        let b1 = dh.sum_axis(Axis(0));

        Gradients { w1, b1, w2, b2 }
    }

    fn train_step(&mut self, x: &Array2<f64>, y: &Array2<f64>, adam: &mut Adam) -> f64 {
        let fwd = self.forward(x);
        let loss = cross_entropy(&fwd.probs, y);
        let grads = self.backward(x, y, &fwd);
        adam.step(self, &grads);
        loss
    }

    pub fn loss(&self, x: &Array2<f64>, y: &Array2<f64>) -> f64 {
        cross_entropy(&self.forward(x).probs, y)
    }

    /// Probability of every output class for a single input; sums to 1.
    pub fn predict_proba(&self, input: &Array1<f64>) -> Vec<f64> {
        let x = input.clone().insert_axis(Axis(0));
        self.forward(&x).probs.row(0).to_vec()
    }
}

fn glorot_uniform<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Array2<f64> {
    let limit = (6.0 / (rows + cols) as f64).sqrt();
    Array2::from_shape_fn((rows, cols), |_| rng.random_range(-limit..limit))
}

/// Row-wise softmax with numerical stability (subtract max).
fn softmax_rows(logits: &mut Array2<f64>) {
    for mut row in logits.rows_mut() {
        let max = row.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        row.mapv_inplace(|x| (x - max).exp());
        let sum = row.sum();
        if sum < 1e-30 {
            let uniform = 1.0 / row.len() as f64;
            row.fill(uniform);
        } else {
            row.mapv_inplace(|x| x / sum);
        }
    }
}

fn cross_entropy(probs: &Array2<f64>, y: &Array2<f64>) -> f64 {
    let n = probs.nrows().max(1) as f64;
    let log_probs = probs.mapv(|p| p.max(1e-12).ln());
    -(y * &log_probs).sum() / n
}

struct Moments<D: Dimension> {
    m: Array<f64, D>,
    v: Array<f64, D>,
}

impl<D: Dimension> Moments<D> {
    fn zeros_like(param: &Array<f64, D>) -> Self {
        Moments {
            m: Array::zeros(param.raw_dim()),
            v: Array::zeros(param.raw_dim()),
        }
    }

    fn update(&mut self, param: &mut Array<f64, D>, grad: &Array<f64, D>, lr_t: f64) {
        Zip::from(param)
            .and(grad)
            .and(&mut self.m)
            .and(&mut self.v)
            .for_each(|p, &g, m, v| {
                *m = ADAM_BETA1 * *m + (1.0 - ADAM_BETA1) * g;
                *v = ADAM_BETA2 * *v + (1.0 - ADAM_BETA2) * g * g;
                *p -= lr_t * *m / (v.sqrt() + ADAM_EPSILON);
            });
    }
}

const ADAM_BETA1: f64 = 0.9;
const ADAM_BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-7;

struct Adam {
    learning_rate: f64,
    t: i32,
    w1: Moments<Ix2>,
    b1: Moments<Ix1>,
    w2: Moments<Ix2>,
    b2: Moments<Ix1>,
}

impl Adam {
    fn new(network: &Network, learning_rate: f64) -> Self {
        Adam {
            learning_rate,
            t: 0,
            w1: Moments::zeros_like(&network.w1),
            b1: Moments::zeros_like(&network.b1),
            w2: Moments::zeros_like(&network.w2),
            b2: Moments::zeros_like(&network.b2),
        }
    }

    fn step(&mut self, network: &mut Network, grads: &Gradients) {
        self.t += 1;
        let lr_t = self.learning_rate * (1.0 - ADAM_BETA2.powi(self.t)).sqrt()
            / (1.0 - ADAM_BETA1.powi(self.t));
        self.w1.update(&mut network.w1, &grads.w1, lr_t);
        self.b1.update(&mut network.b1, &grads.b1, lr_t);
        self.w2.update(&mut network.w2, &grads.w2, lr_t);
        self.b2.update(&mut network.b2, &grads.b2, lr_t);
    }
}

/// Classifier ready to score the draw following `predict`'s input.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    network: Network,
    encoding: Encoding,
    rules: GameRules,
}

impl TrainedModel {
    pub fn predict(&self, last_draw: &Draw) -> Result<Scores> {
        validate_draw(last_draw, &self.rules)?;
        let input = encode_draw(last_draw, self.encoding, &self.rules);
        Scores::new(self.network.predict_proba(&input))
    }
}

/// Ranks numbers by the probability a freshly trained classifier gives them
/// for the draw after the most recent one.
pub struct ModelStrategy {
    config: ModelConfig,
}

impl ModelStrategy {
    pub fn new(config: ModelConfig) -> Self {
        Self { config }
    }

    /// Mini-batch Adam on a fixed number of epochs. The last `validation_split`
    /// share of the samples is held out and only evaluated.
    pub fn train(
        &self,
        samples: &[TrainingSample],
        rules: &GameRules,
    ) -> Result<(TrainedModel, TrainingReport)> {
        self.config.validate()?;
        let Some(first) = samples.first() else {
            return Err(CoreError::InsufficientData {
                needed: 1,
                available: 0,
            });
        };

        let n = samples.len();
        let input_dim = first.input.len();
        let output_dim = first.target.len();
        if input_dim != self.config.encoding.input_dim(rules) || output_dim != rules.domain_size {
            return Err(CoreError::InvalidConfig(format!(
                "samples of shape {}→{} do not match the game ({}→{})",
                input_dim,
                output_dim,
                self.config.encoding.input_dim(rules),
                rules.domain_size
            )));
        }
        if samples
            .iter()
            .any(|s| s.input.len() != input_dim || s.target.len() != output_dim)
        {
            return Err(CoreError::InvalidConfig("training samples of mixed shapes".into()));
        }

        let x = Array2::from_shape_fn((n, input_dim), |(i, j)| samples[i].input[j]);
        let y = Array2::from_shape_fn((n, output_dim), |(i, j)| samples[i].target[j]);

        let n_val = ((n as f64 * self.config.validation_split).floor() as usize).min(n - 1);
        let n_train = n - n_val;
        let x_val = x.slice(s![n_train.., ..]).to_owned();
        let y_val = y.slice(s![n_train.., ..]).to_owned();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let mut network = Network::new(input_dim, self.config.hidden_units, output_dim, &mut rng);
        let mut adam = Adam::new(&network, self.config.learning_rate);

        let mut order: Vec<usize> = (0..n_train).collect();
        let mut history = Vec::with_capacity(self.config.epochs);

        for epoch in 1..=self.config.epochs {
            order.shuffle(&mut rng);
            let mut epoch_loss = 0.0;
            for batch in order.chunks(self.config.batch_size) {
                let xb = x.select(Axis(0), batch);
                let yb = y.select(Axis(0), batch);
                epoch_loss += network.train_step(&xb, &yb, &mut adam) * batch.len() as f64;
            }
            epoch_loss /= n_train as f64;

            let val_loss = (n_val > 0).then(|| network.loss(&x_val, &y_val));
            log::debug!("epoch {epoch}/{}: loss={epoch_loss:.4} val_loss={val_loss:?}", self.config.epochs);
            history.push(EpochMetrics {
                epoch,
                loss: epoch_loss,
                val_loss,
            });
        }

        let report = TrainingReport {
            train_samples: n_train,
            val_samples: n_val,
            history,
        };
        let model = TrainedModel {
            network,
            encoding: self.config.encoding,
            rules: *rules,
        };
        Ok((model, report))
    }

    pub fn train_on(&self, history: &[Draw], rules: &GameRules) -> Result<(TrainedModel, TrainingReport)> {
        let samples = build_samples(history, rules, self.config.encoding)?;
        log::info!(
            "Training on {} samples from {} draws ({} epochs)",
            samples.len(),
            history.len(),
            self.config.epochs
        );
        self.train(&samples, rules)
    }
}

impl SelectionStrategy for ModelStrategy {
    fn name(&self) -> &str {
        "Model"
    }

    fn score(&self, history: &[Draw], rules: &GameRules) -> Result<Scores> {
        let (model, report) = self.train_on(history, rules)?;
        log::info!(
            "Model trained: loss={:.4}, val_loss={}",
            report.final_loss().unwrap_or(f64::NAN),
            report
                .final_val_loss()
                .map(|l| format!("{l:.4}"))
                .unwrap_or_else(|| "-".to_string())
        );
        let last = history.last().ok_or(CoreError::InsufficientData {
            needed: 2,
            available: 0,
        })?;
        model.predict(last)
    }

    fn params(&self) -> HashMap<String, f64> {
        HashMap::from([
            ("hidden_units".to_string(), self.config.hidden_units as f64),
            ("epochs".to_string(), self.config.epochs as f64),
            ("batch_size".to_string(), self.config.batch_size as f64),
            ("learning_rate".to_string(), self.config.learning_rate),
            ("validation_split".to_string(), self.config.validation_split),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::make_test_draws;
    use crate::pool::select_pool;
    use crate::strategy::validate_distribution;

    fn fast_config() -> ModelConfig {
        ModelConfig {
            epochs: 20,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_samples_shape() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(5, &rules);
        let samples = build_samples(&history, &rules, Encoding::Normalized).unwrap();
        assert_eq!(samples.len(), 4 * 15);
        for s in &samples {
            assert_eq!(s.input.len(), 15);
            assert_eq!(s.target.len(), 25);
            assert!((s.target.sum() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_build_samples_insufficient() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(1, &rules);
        let err = build_samples(&history, &rules, Encoding::OneHot).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientData { needed: 2, available: 1 }));
    }

    #[test]
    fn test_train_empty_samples() {
        let strategy = ModelStrategy::new(fast_config());
        assert!(matches!(
            strategy.train(&[], &GameRules::LOTOFACIL),
            Err(CoreError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_train_report() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(11, &rules);
        let strategy = ModelStrategy::new(fast_config());
        let (_, report) = strategy.train_on(&history, &rules).unwrap();
        assert_eq!(report.history.len(), 20);
        assert_eq!(report.train_samples + report.val_samples, 150);
        assert_eq!(report.val_samples, 30);
        assert!(report.history.iter().all(|m| m.loss.is_finite()));
        assert!(report.final_val_loss().is_some());
    }

    #[test]
    fn test_two_draws_single_pair() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(2, &rules);
        let strategy = ModelStrategy::new(fast_config());
        let scores = strategy.score(&history, &rules).unwrap();
        assert!(validate_distribution(&scores, &rules));
    }

    #[test]
    fn test_predict_is_distribution() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(30, &rules);
        for encoding in [Encoding::Normalized, Encoding::OneHot] {
            let strategy = ModelStrategy::new(ModelConfig {
                encoding,
                ..fast_config()
            });
            let scores = strategy.score(&history, &rules).unwrap();
            assert!(validate_distribution(&scores, &rules), "Sum = {}", scores.total());
            assert!(scores.as_slice().iter().all(|&p| p >= 0.0));
        }
    }

    #[test]
    fn test_seeded_training_is_deterministic() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(15, &rules);
        let strategy = ModelStrategy::new(fast_config());
        let a = strategy.score(&history, &rules).unwrap();
        let b = strategy.score(&history, &rules).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_learns_alternating_pattern() {
        let rules = GameRules::LOTOFACIL;
        let history: Vec<Draw> = (1..=20u32)
            .map(|i| {
                if i % 2 == 1 {
                    Draw::new(i, 1..=15).unwrap()
                } else {
                    Draw::new(i, 11..=25).unwrap()
                }
            })
            .collect();
        // last draw is 11..=25, so the next one should look like 1..=15
        let strategy = ModelStrategy::new(ModelConfig {
            epochs: 300,
            learning_rate: 0.01,
            encoding: Encoding::OneHot,
            ..Default::default()
        });
        let (model, report) = strategy.train_on(&history, &rules).unwrap();
        let first = report.history[0].loss;
        let last = report.final_loss().unwrap();
        assert!(last < first, "loss did not decrease: {first} -> {last}");

        let scores = model.predict(history.last().unwrap()).unwrap();
        let pool = select_pool(&scores, 15, 15).unwrap();
        let mut numbers = pool.numbers().to_vec();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=15).collect::<Vec<u8>>());
    }

    #[test]
    fn test_predict_rejects_foreign_draw() {
        let rules = GameRules::LOTOFACIL;
        let history = make_test_draws(5, &rules);
        let (model, _) = ModelStrategy::new(fast_config()).train_on(&history, &rules).unwrap();
        let short = Draw::new(99, [1, 2, 3]).unwrap();
        assert!(matches!(model.predict(&short), Err(CoreError::MalformedDraw { .. })));
    }

    #[test]
    fn test_out_of_domain_draw_is_an_error() {
        let rules = GameRules::LOTOFACIL;
        let config = ModelConfig {
            encoding: Encoding::OneHot,
            ..fast_config()
        };
        let history = make_test_draws(5, &rules);
        let (model, _) = ModelStrategy::new(config).train_on(&history, &rules).unwrap();
        let outside = Draw::new(6, (1..=14).chain([30])).unwrap();
        assert!(matches!(model.predict(&outside), Err(CoreError::MalformedDraw { index: 6, .. })));

        let mut history = history;
        history.push(outside);
        assert!(matches!(
            build_samples(&history, &rules, Encoding::OneHot),
            Err(CoreError::MalformedDraw { index: 6, .. })
        ));
    }
}
