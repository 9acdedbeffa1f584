use crate::error::{CoreError, Result};
use crate::models::{CandidatePool, Scores};

/// Top `pool_size` numbers by descending score, ties broken by ascending number.
pub fn select_pool(scores: &Scores, pool_size: usize, play_size: usize) -> Result<CandidatePool> {
    let domain_size = scores.domain_size();
    if pool_size == 0 || pool_size > domain_size || pool_size < play_size {
        return Err(CoreError::InvalidPoolSize {
            pool_size,
            play_size,
            domain_size,
        });
    }

    let numbers: Vec<u8> = scores
        .ranked()
        .into_iter()
        .take(pool_size)
        .map(|r| r.number)
        .collect();

    log::debug!("Candidate pool ({pool_size}): {numbers:?}");
    CandidatePool::from_numbers(numbers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_pool_tie_ascending() {
        let scores = Scores::new(vec![5.0, 5.0, 3.0]).unwrap();
        let pool = select_pool(&scores, 2, 2).unwrap();
        assert_eq!(pool.numbers(), &[1, 2]);
    }

    #[test]
    fn test_select_pool_orders_by_score() {
        let scores = Scores::new(vec![1.0, 4.0, 4.0, 9.0, 0.0, 2.0]).unwrap();
        let pool = select_pool(&scores, 4, 3).unwrap();
        assert_eq!(pool.numbers(), &[4, 2, 3, 6]);

        let ranked: Vec<f64> = pool
            .numbers()
            .iter()
            .map(|&n| scores.get(n).unwrap())
            .collect();
        assert!(ranked.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_select_pool_smaller_than_play() {
        let scores = Scores::new(vec![1.0; 25]).unwrap();
        let err = select_pool(&scores, 3, 5).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidPoolSize {
                pool_size: 3,
                play_size: 5,
                domain_size: 25
            }
        ));
    }

    #[test]
    fn test_select_pool_larger_than_domain() {
        let scores = Scores::new(vec![1.0; 25]).unwrap();
        assert!(select_pool(&scores, 26, 15).is_err());
        assert!(select_pool(&scores, 0, 0).is_err());
    }

    #[test]
    fn test_select_pool_whole_domain() {
        let scores = Scores::new(vec![0.0; 25]).unwrap();
        let pool = select_pool(&scores, 25, 15).unwrap();
        let expected: Vec<u8> = (1..=25).collect();
        assert_eq!(pool.numbers(), expected.as_slice());
    }
}
