//! Reliability diagram for discrete probability forecasts.

use wres_datamodel::{
    ComponentName, DiagramComponent, DiagramStatistic, MetricName, Pool, ProbabilityPair,
};
use wres_stats::{MISSING, ratio};

use crate::error::MetricError;
use crate::metric::Metric;

/// Default number of forecast probability bins.
pub const DEFAULT_BINS: usize = 10;

/// Mean forecast probability, observed relative frequency and sample size per forecast
/// probability bin.
///
/// Bins are equal-width over [0, 1]: the first is `[0, w]`, the rest `(i*w, (i+1)*w]`.
/// Empty bins report missing means and a zero sample size.
#[derive(Debug, Clone, Copy)]
pub struct ReliabilityDiagram {
    bins: usize,
}

impl ReliabilityDiagram {
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidParameter`] if `bins` is zero.
    pub fn new(bins: usize) -> Result<Self, MetricError> {
        if bins == 0 {
            return Err(MetricError::InvalidParameter {
                metric: MetricName::ReliabilityDiagram,
                reason: "the number of probability bins must be >= 1".to_string(),
            });
        }
        Ok(Self { bins })
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Upper edges of the bins.
    fn upper_edges(&self) -> Vec<f64> {
        (1..=self.bins)
            .map(|i| i as f64 / self.bins as f64)
            .collect()
    }
}

impl Default for ReliabilityDiagram {
    fn default() -> Self {
        Self { bins: DEFAULT_BINS }
    }
}

impl Metric<ProbabilityPair> for ReliabilityDiagram {
    type Output = DiagramStatistic;

    fn name(&self) -> MetricName {
        MetricName::ReliabilityDiagram
    }

    fn apply(&self, pool: &Pool<ProbabilityPair>) -> Result<DiagramStatistic, MetricError> {
        let edges = self.upper_edges();
        let mut forecast_sum = vec![0.0; self.bins];
        let mut observed_sum = vec![0.0; self.bins];
        let mut count = vec![0usize; self.bins];

        for pair in pool {
            let forecast = pair.right().value();
            let bin = edges
                .partition_point(|&edge| edge < forecast)
                .min(self.bins - 1);
            forecast_sum[bin] += forecast;
            observed_sum[bin] += pair.left().value();
            count[bin] += 1;
        }

        let bin_mean = |sums: &[f64]| -> Vec<f64> {
            sums.iter()
                .zip(&count)
                .map(|(&sum, &n)| if n == 0 { MISSING } else { ratio(sum, n as f64) })
                .collect()
        };

        Ok(DiagramStatistic::new(self.name(), pool.metadata().clone())
            .with_component(DiagramComponent::new(
                ComponentName::ForecastProbability,
                bin_mean(&forecast_sum),
            ))
            .with_component(DiagramComponent::new(
                ComponentName::ObservedRelativeFrequency,
                bin_mean(&observed_sum),
            ))
            .with_component(DiagramComponent::new(
                ComponentName::SampleSize,
                count.iter().map(|&n| n as f64).collect(),
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wres_datamodel::{Pair, PoolMetadata, Probability};

    fn pool(data: &[(f64, f64)]) -> Pool<ProbabilityPair> {
        Pool::new(
            data.iter()
                .map(|&(o, f)| Pair::new(Probability::new(o).unwrap(), Probability::new(f).unwrap()))
                .collect(),
            PoolMetadata::new("A", "streamflow", "CMS"),
        )
    }

    #[test]
    fn test_bins_are_left_open_except_the_first() {
        let p = pool(&[(0.0, 0.0), (1.0, 0.1), (1.0, 0.15), (0.0, 0.2), (1.0, 1.0)]);
        let diagram = ReliabilityDiagram::default().apply(&p).unwrap();
        let n = diagram.values(ComponentName::SampleSize).unwrap();
        assert_eq!(n.len(), 10);
        assert_eq!(n[0], 2.0);
        assert_eq!(n[1], 2.0);
        assert_eq!(n[9], 1.0);
        assert_eq!(n.iter().sum::<f64>(), 5.0);

        let fp = diagram.values(ComponentName::ForecastProbability).unwrap();
        let of = diagram.values(ComponentName::ObservedRelativeFrequency).unwrap();
        assert_relative_eq!(fp[0], 0.05);
        assert_relative_eq!(of[0], 0.5);
        assert_relative_eq!(fp[1], 0.175);
        assert_relative_eq!(of[1], 0.5);
    }

    #[test]
    fn test_empty_bins_are_missing_not_zero() {
        let p = pool(&[(1.0, 0.95)]);
        let diagram = ReliabilityDiagram::default().apply(&p).unwrap();
        let fp = diagram.values(ComponentName::ForecastProbability).unwrap();
        let n = diagram.values(ComponentName::SampleSize).unwrap();
        assert!(fp[..9].iter().all(|v| v.is_nan()));
        assert_eq!(n[3], 0.0);
        assert_relative_eq!(fp[9], 0.95);
    }

    #[test]
    fn test_empty_pool_keeps_shape() {
        let diagram = ReliabilityDiagram::new(5).unwrap().apply(&pool(&[])).unwrap();
        for component in diagram.components() {
            assert_eq!(component.values().len(), 5);
        }
        assert!(
            diagram
                .values(ComponentName::ObservedRelativeFrequency)
                .unwrap()
                .iter()
                .all(|v| v.is_nan())
        );
    }

    #[test]
    fn test_zero_bins_rejected() {
        assert!(ReliabilityDiagram::new(0).is_err());
    }
}
