use wres_datamodel::{ComponentName, MetricName, Pool, ScoreComponent, ScoreStatistic};

use crate::error::MetricError;
use crate::metric::Metric;

/// Number of pairs in the pool. Accepts pairs of any kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleSize;

impl<T> Metric<T> for SampleSize {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::SampleSize
    }

    fn apply(&self, pool: &Pool<T>) -> Result<ScoreStatistic, MetricError> {
        let main = ScoreComponent::new(ComponentName::Main, pool.len() as f64)
            .with_bounds(0.0, f64::INFINITY, f64::NAN);
        Ok(ScoreStatistic::new(MetricName::SampleSize, pool.metadata().clone()).with_component(main))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wres_datamodel::{Pair, PoolMetadata, SingleValuedPair};

    #[test]
    fn test_counts_pairs() {
        let pool: Pool<SingleValuedPair> = Pool::new(
            vec![Pair::new(1.0, 2.0), Pair::new(3.0, 4.0)],
            PoolMetadata::new("A", "streamflow", "CMS"),
        );
        let score = SampleSize.apply(&pool).unwrap();
        assert_eq!(score.main(), Some(2.0));
        assert_eq!(score.metric(), MetricName::SampleSize);
    }

    #[test]
    fn test_empty_pool_is_zero() {
        let pool: Pool<bool> = Pool::new(vec![], PoolMetadata::new("A", "streamflow", "CMS"));
        assert_eq!(SampleSize.apply(&pool).unwrap().main(), Some(0.0));
    }
}
