use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::models::{Draw, GameRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum, Default)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    #[value(name = "onehot")]
    OneHot,
    #[default]
    Normalized,
}

impl Encoding {
    pub fn input_dim(&self, rules: &GameRules) -> usize {
        match self {
            Encoding::OneHot => rules.domain_size,
            Encoding::Normalized => rules.draw_size,
        }
    }
}

/// Encode a draw already checked with `validate_draw` as a network input.
/// - OneHot: domain_size-dim, index (n-1) set to 1.0 for every drawn number
/// - Normalized: draw_size-dim, [n1/D, ..., nK/D] with numbers sorted ascending
pub(crate) fn encode_draw(draw: &Draw, encoding: Encoding, rules: &GameRules) -> Array1<f64> {
    let mut v = Array1::zeros(encoding.input_dim(rules));
    match encoding {
        Encoding::OneHot => {
            for &n in draw.numbers() {
                v[(n - 1) as usize] = 1.0;
            }
        }
        Encoding::Normalized => {
            for (i, &n) in draw.numbers().iter().take(rules.draw_size).enumerate() {
                v[i] = n as f64 / rules.domain_size as f64;
            }
        }
    }
    v
}

/// One-hot target for a single number of the domain. `number` must already
/// be validated against `rules`.
pub(crate) fn encode_target_onehot(number: u8, rules: &GameRules) -> Array1<f64> {
    let mut v = Array1::zeros(rules.domain_size);
    v[(number - 1) as usize] = 1.0;
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw() -> Draw {
        Draw::new(3001, [1, 3, 4, 6, 8, 9, 11, 13, 15, 17, 18, 20, 22, 24, 25]).unwrap()
    }

    #[test]
    fn test_input_dim() {
        assert_eq!(Encoding::OneHot.input_dim(&GameRules::LOTOFACIL), 25);
        assert_eq!(Encoding::Normalized.input_dim(&GameRules::LOTOFACIL), 15);
    }

    #[test]
    fn test_onehot_sum_and_indices() {
        let v = encode_draw(&test_draw(), Encoding::OneHot, &GameRules::LOTOFACIL);
        assert_eq!(v.len(), 25);
        assert!((v.sum() - 15.0).abs() < 1e-10);
        assert_eq!(v[0], 1.0);
        assert_eq!(v[1], 0.0);
        assert_eq!(v[24], 1.0);
    }

    #[test]
    fn test_normalized_values() {
        let v = encode_draw(&test_draw(), Encoding::Normalized, &GameRules::LOTOFACIL);
        assert_eq!(v.len(), 15);
        assert!((v[0] - 1.0 / 25.0).abs() < 1e-10);
        assert!((v[14] - 1.0).abs() < 1e-10);
        for i in 0..14 {
            assert!(v[i] < v[i + 1], "not sorted at {i}");
        }
    }

    #[test]
    fn test_target_onehot() {
        let t = encode_target_onehot(7, &GameRules::LOTOFACIL);
        assert_eq!(t.len(), 25);
        assert_eq!(t.sum(), 1.0);
        assert_eq!(t[6], 1.0);
    }
}
