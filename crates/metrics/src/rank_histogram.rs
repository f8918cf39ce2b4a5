//! Rank histogram for ensemble forecasts.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wres_datamodel::{
    ComponentName, DiagramComponent, DiagramStatistic, EnsemblePair, MetricName, Pool,
};
use wres_stats::{MISSING, ratio};

use crate::error::MetricError;
use crate::metric::Metric;

/// Relative frequency of the observation's rank among the ensemble members.
///
/// An ensemble of `m` members gives `m + 1` bins. Ties between the observation and one
/// or more members are broken uniformly at random. Every application starts from a clone
/// of the configured generator, so results are reproducible for a fixed seed. Missing
/// members are ignored when ranking.
#[derive(Debug, Clone)]
pub struct RankHistogram<R = StdRng> {
    rng: R,
}

impl RankHistogram<StdRng> {
    /// Rank histogram with a seeded standard generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Clone> RankHistogram<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

/// Zero-based rank of `observation` among the finite `members`, ties broken by `rng`.
fn rank_of(observation: f64, members: &[f64], rng: &mut impl Rng) -> usize {
    let mut below = 0;
    let mut ties = 0;
    for &m in members.iter().filter(|m| m.is_finite()) {
        if m < observation {
            below += 1;
        } else if m == observation {
            ties += 1;
        }
    }
    if ties == 0 {
        below
    } else {
        below + rng.random_range(0..=ties)
    }
}

impl<R> Metric<EnsemblePair> for RankHistogram<R>
where
    R: Rng + Clone + Send + Sync,
{
    type Output = DiagramStatistic;

    fn name(&self) -> MetricName {
        MetricName::RankHistogram
    }

    fn apply(&self, pool: &Pool<EnsemblePair>) -> Result<DiagramStatistic, MetricError> {
        let Some(first) = pool.pairs().first() else {
            return Ok(self.diagram(pool, vec![MISSING]));
        };
        let size = first.right().size();
        if let Some(other) = pool.iter().find(|p| p.right().size() != size) {
            return Err(MetricError::Calculation {
                metric: self.name(),
                reason: format!(
                    "ensembles must have a constant size; found {size} and {} members",
                    other.right().size()
                ),
            });
        }

        let mut rng = self.rng.clone();
        let mut counts = vec![0usize; size + 1];
        for pair in pool.iter().filter(|p| p.left().is_finite()) {
            counts[rank_of(*pair.left(), pair.right().members(), &mut rng)] += 1;
        }
        let total: usize = counts.iter().sum();
        let frequencies = counts
            .iter()
            .map(|&c| ratio(c as f64, total as f64))
            .collect();
        Ok(self.diagram(pool, frequencies))
    }
}

impl<R> RankHistogram<R> {
    fn diagram(&self, pool: &Pool<EnsemblePair>, frequencies: Vec<f64>) -> DiagramStatistic {
        let ranks = (1..=frequencies.len()).map(|r| r as f64).collect();
        DiagramStatistic::new(MetricName::RankHistogram, pool.metadata().clone())
            .with_component(DiagramComponent::new(ComponentName::RankOrder, ranks))
            .with_component(DiagramComponent::new(
                ComponentName::ObservedRelativeFrequency,
                frequencies,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use wres_datamodel::{Ensemble, Pair, PoolMetadata};

    fn pool(data: Vec<(f64, Vec<f64>)>) -> Pool<EnsemblePair> {
        Pool::new(
            data.into_iter()
                .map(|(o, m)| Pair::new(o, Ensemble::new(m).unwrap()))
                .collect(),
            PoolMetadata::new("A", "streamflow", "CMS"),
        )
    }

    fn frequencies(diagram: &DiagramStatistic) -> Vec<f64> {
        diagram
            .values(ComponentName::ObservedRelativeFrequency)
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_ranks_without_ties() {
        let p = pool(vec![
            (0.0, vec![1.0, 2.0, 3.0]),
            (1.5, vec![1.0, 2.0, 3.0]),
            (2.5, vec![3.0, 2.0, 1.0]),
            (9.0, vec![1.0, 2.0, 3.0]),
        ]);
        let diagram = RankHistogram::seeded(7).apply(&p).unwrap();
        assert_eq!(frequencies(&diagram), vec![0.25, 0.25, 0.25, 0.25]);
        assert_eq!(
            diagram.values(ComponentName::RankOrder).unwrap(),
            &[1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn test_ties_are_spread_over_tied_ranks() {
        let p = pool((0..400).map(|_| (2.0, vec![2.0, 2.0, 2.0])).collect());
        let diagram = RankHistogram::seeded(42).apply(&p).unwrap();
        let f = frequencies(&diagram);
        assert_relative_eq!(f.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(f.iter().all(|&v| v > 0.15 && v < 0.35), "{f:?}");
    }

    #[test]
    fn test_same_seed_same_result() {
        let p = pool((0..50).map(|i| (i as f64 % 3.0, vec![0.0, 1.0, 2.0])).collect());
        let h = RankHistogram::seeded(3);
        assert_eq!(h.apply(&p).unwrap(), h.apply(&p).unwrap());
        assert_eq!(
            h.apply(&p).unwrap(),
            RankHistogram::seeded(3).apply(&p).unwrap()
        );
    }

    #[test]
    fn test_missing_members_are_ignored() {
        let p = pool(vec![(5.0, vec![1.0, f64::NAN, 3.0])]);
        let f = frequencies(&RankHistogram::seeded(1).apply(&p).unwrap());
        assert_eq!(f.len(), 4);
        assert_eq!(f[2], 1.0);
    }

    #[test]
    fn test_empty_pool_has_single_missing_bin() {
        let p = pool(vec![]);
        let f = frequencies(&RankHistogram::seeded(1).apply(&p).unwrap());
        assert_eq!(f.len(), 1);
        assert!(f[0].is_nan());
    }

    #[test]
    fn test_varying_ensemble_size_is_an_error() {
        let p = pool(vec![(1.0, vec![1.0, 2.0]), (1.0, vec![1.0, 2.0, 3.0])]);
        assert!(matches!(
            RankHistogram::seeded(1).apply(&p),
            Err(MetricError::Calculation { .. })
        ));
    }
}
