//! Continuous ranked probability score and skill score for ensemble forecasts.

use tracing::trace;
use wres_datamodel::{
    ComponentName, EnsemblePair, MetricName, Pool, ScoreComponent, ScoreStatistic,
};
use wres_stats::{mean, skill};

use crate::error::MetricError;
use crate::metric::Metric;

/// CRPS of one observation against sorted, finite members using the decomposition of
/// Hersbach (2000).
///
/// Boundaries are inclusive: an observation equal to a member falls on the member, not
/// beyond it, so an observation equal to the lowest or highest member adds no outlier
/// term.
pub fn crps_of(observation: f64, sorted_members: &[f64]) -> f64 {
    let n = sorted_members.len();
    let (Some(&lowest), Some(&highest)) = (sorted_members.first(), sorted_members.last()) else {
        return f64::NAN;
    };

    let mut total = 0.0;
    if observation < lowest {
        // p = 0 below the lowest member.
        total += lowest - observation;
    }
    if observation > highest {
        // p = 1 above the highest member.
        total += observation - highest;
    }
    for (i, window) in sorted_members.windows(2).enumerate() {
        let (lower, upper) = (window[0], window[1]);
        let p = (i + 1) as f64 / n as f64;
        let (alpha, beta) = if observation >= upper {
            (upper - lower, 0.0)
        } else if observation <= lower {
            (0.0, upper - lower)
        } else {
            (observation - lower, upper - observation)
        };
        total += alpha * p * p + beta * (1.0 - p) * (1.0 - p);
    }
    total
}

/// Mean CRPS over the pool. Pairs with a missing observation or no finite member are
/// skipped; missing on an empty pool.
fn mean_crps(pool: &Pool<EnsemblePair>) -> f64 {
    let per_pair: Vec<f64> = pool
        .iter()
        .filter(|pair| pair.left().is_finite())
        .filter_map(|pair| {
            let members = pair.right().sorted_finite_members();
            (!members.is_empty()).then(|| crps_of(*pair.left(), &members))
        })
        .collect();
    trace!(
        pairs = pool.len(),
        scored = per_pair.len(),
        "computed CRPS per pair"
    );
    mean(&per_pair)
}

/// Mean continuous ranked probability score, in the units of the pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuousRankedProbabilityScore;

impl Metric<EnsemblePair> for ContinuousRankedProbabilityScore {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::ContinuousRankedProbabilityScore
    }

    fn apply(&self, pool: &Pool<EnsemblePair>) -> Result<ScoreStatistic, MetricError> {
        let main = ScoreComponent::new(ComponentName::Main, mean_crps(pool))
            .with_bounds(0.0, f64::INFINITY, 0.0)
            .with_units(pool.metadata().measurement_unit());
        Ok(ScoreStatistic::new(self.name(), pool.metadata().clone()).with_component(main))
    }
}

/// `1 - CRPS / CRPS_baseline`. Each CRPS is a mean over its own pool.
///
/// Fails without a baseline.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContinuousRankedProbabilitySkillScore;

impl Metric<EnsemblePair> for ContinuousRankedProbabilitySkillScore {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::ContinuousRankedProbabilitySkillScore
    }

    fn apply(&self, pool: &Pool<EnsemblePair>) -> Result<ScoreStatistic, MetricError> {
        let baseline = pool.baseline().ok_or(MetricError::MissingBaseline {
            metric: self.name(),
        })?;
        let value = skill(mean_crps(pool), mean_crps(baseline));
        let main = ScoreComponent::new(ComponentName::Main, value)
            .with_bounds(f64::NEG_INFINITY, 1.0, 1.0);
        Ok(ScoreStatistic::new(self.name(), pool.metadata().clone()).with_component(main))
    }
}
