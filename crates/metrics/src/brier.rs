//! Brier score and Brier skill score for discrete probability forecasts.

use wres_datamodel::{ComponentName, MetricName, Pool, ProbabilityPair, ScoreComponent, ScoreStatistic};
use wres_stats::{mean, skill};

use crate::error::MetricError;
use crate::metric::Metric;

/// Mean squared error of the forecast probabilities. Missing on an empty pool.
fn brier(pool: &Pool<ProbabilityPair>) -> f64 {
    let errors: Vec<f64> = pool
        .iter()
        .map(|p| (p.right().value() - p.left().value()).powi(2))
        .collect();
    mean(&errors)
}

/// Brier score of the sample climatology: the variance of the observed outcomes.
fn climatological_brier(pool: &Pool<ProbabilityPair>) -> f64 {
    let observed: Vec<f64> = pool.iter().map(|p| p.left().value()).collect();
    let climatology = mean(&observed);
    let errors: Vec<f64> = observed.iter().map(|o| (o - climatology).powi(2)).collect();
    mean(&errors)
}

/// Mean squared difference between forecast and observed probability.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrierScore;

impl Metric<ProbabilityPair> for BrierScore {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::BrierScore
    }

    fn apply(&self, pool: &Pool<ProbabilityPair>) -> Result<ScoreStatistic, MetricError> {
        let main = ScoreComponent::new(ComponentName::Main, brier(pool)).with_bounds(0.0, 1.0, 0.0);
        Ok(ScoreStatistic::new(MetricName::BrierScore, pool.metadata().clone()).with_component(main))
    }
}

/// `1 - BS / BS_ref`.
///
/// The reference is the baseline pool when one is attached, otherwise the sample
/// climatology of the main pool. Each Brier score is a mean over its own pool, so pools
/// of different sizes compare fairly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrierSkillScore;

impl Metric<ProbabilityPair> for BrierSkillScore {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::BrierSkillScore
    }

    fn apply(&self, pool: &Pool<ProbabilityPair>) -> Result<ScoreStatistic, MetricError> {
        let reference = match pool.baseline() {
            Some(baseline) => brier(baseline),
            None => climatological_brier(pool),
        };
        let value = skill(brier(pool), reference);
        let main = ScoreComponent::new(ComponentName::Main, value)
            .with_bounds(f64::NEG_INFINITY, 1.0, 1.0);
        Ok(ScoreStatistic::new(MetricName::BrierSkillScore, pool.metadata().clone())
            .with_component(main))
    }
}
