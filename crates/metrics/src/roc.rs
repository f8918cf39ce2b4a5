//! Relative Operating Characteristic diagram and score.

use wres_datamodel::slicer::classify_probabilities;
use wres_datamodel::{
    ComponentName, DiagramComponent, DiagramStatistic, MetricName, Pool, ProbabilityPair,
    ScoreComponent, ScoreStatistic, Threshold, ThresholdOperator, ThresholdOrientation,
};
use wres_stats::{MISSING, finite_or_missing, ratio};

use crate::dichotomous::{ContingencyTable, DichotomousScore};
use crate::error::MetricError;
use crate::metric::{Collectable, Metric};

/// Default number of probability classifiers.
pub const DEFAULT_CLASSIFIERS: usize = 10;

/// Probability of false detection against probability of detection, for a sequence of
/// probability classifiers.
///
/// For `n` classifiers the diagram has `n + 1` points. Point `i` classifies a forecast as
/// an occurrence when its probability exceeds `1 - i / n`; the first point is always
/// (0, 0) and the last (1, 1).
#[derive(Debug, Clone, Copy)]
pub struct RocDiagram {
    classifiers: usize,
}

impl RocDiagram {
    /// # Errors
    ///
    /// Returns [`MetricError::InvalidParameter`] if `classifiers` is zero.
    pub fn new(classifiers: usize) -> Result<Self, MetricError> {
        if classifiers == 0 {
            return Err(MetricError::InvalidParameter {
                metric: MetricName::RelativeOperatingCharacteristicDiagram,
                reason: "the number of probability classifiers must be >= 1".to_string(),
            });
        }
        Ok(Self { classifiers })
    }

    pub fn classifiers(&self) -> usize {
        self.classifiers
    }

    /// Reclassifies the pool at one probability and returns (PoFD, PoD).
    fn point(&self, pool: &Pool<ProbabilityPair>, probability: f64) -> Result<(f64, f64), MetricError> {
        let classifier = Threshold::probability(
            probability,
            ThresholdOperator::Greater,
            ThresholdOrientation::LeftAndRight,
        )?;
        let dichotomous = classify_probabilities(pool, &classifier);
        let table = ContingencyTable.apply(&dichotomous)?;
        let pofd = DichotomousScore::ProbabilityOfFalseDetection.finish_from(&table, &dichotomous)?;
        let pod = DichotomousScore::ProbabilityOfDetection.finish_from(&table, &dichotomous)?;
        Ok((
            pofd.main().unwrap_or(MISSING),
            pod.main().unwrap_or(MISSING),
        ))
    }
}

impl Default for RocDiagram {
    fn default() -> Self {
        Self {
            classifiers: DEFAULT_CLASSIFIERS,
        }
    }
}

impl Metric<ProbabilityPair> for RocDiagram {
    type Output = DiagramStatistic;

    fn name(&self) -> MetricName {
        MetricName::RelativeOperatingCharacteristicDiagram
    }

    fn apply(&self, pool: &Pool<ProbabilityPair>) -> Result<DiagramStatistic, MetricError> {
        let n = self.classifiers;
        let mut pofd = Vec::with_capacity(n + 1);
        let mut pod = Vec::with_capacity(n + 1);
        pofd.push(0.0);
        pod.push(0.0);
        for i in 1..n {
            let (f, d) = self.point(pool, 1.0 - i as f64 / n as f64)?;
            pofd.push(f);
            pod.push(d);
        }
        pofd.push(1.0);
        pod.push(1.0);

        Ok(DiagramStatistic::new(self.name(), pool.metadata().clone())
            .with_component(DiagramComponent::new(
                ComponentName::ProbabilityOfFalseDetection,
                pofd,
            ))
            .with_component(DiagramComponent::new(
                ComponentName::ProbabilityOfDetection,
                pod,
            )))
    }
}

/// Area under the ROC curve by the Mason and Graham (2002) rank comparison.
///
/// Missing if either the occurrence or the non-occurrence group is empty.
pub fn area_under_curve(pool: &Pool<ProbabilityPair>) -> f64 {
    let (occurred, mut not_occurred): (Vec<f64>, Vec<f64>) = {
        let mut yes = Vec::new();
        let mut no = Vec::new();
        for pair in pool {
            if pair.left().is_one() {
                yes.push(pair.right().value());
            } else {
                no.push(pair.right().value());
            }
        }
        (yes, no)
    };
    if occurred.is_empty() || not_occurred.is_empty() {
        return MISSING;
    }
    not_occurred.sort_by(f64::total_cmp);

    // Full credit where a non-occurrence is forecast higher, half credit for ties.
    let mut credit = 0.0;
    for &p in &occurred {
        let at_or_below = not_occurred.partition_point(|&q| q <= p);
        let below = not_occurred.partition_point(|&q| q < p);
        credit += (not_occurred.len() - at_or_below) as f64 + 0.5 * (at_or_below - below) as f64;
    }
    let comparisons = occurred.len() as f64 * not_occurred.len() as f64;
    finite_or_missing(1.0 - credit / comparisons)
}

/// ROC skill score.
///
/// With a baseline: `(AUC - AUC_base) / (1 - AUC_base)`. Without: `2 * AUC - 1`, the
/// skill against an unskilled forecast.
#[derive(Debug, Clone, Copy, Default)]
pub struct RocScore;

impl Metric<ProbabilityPair> for RocScore {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::RelativeOperatingCharacteristicScore
    }

    fn apply(&self, pool: &Pool<ProbabilityPair>) -> Result<ScoreStatistic, MetricError> {
        let auc = area_under_curve(pool);
        let value = match pool.baseline() {
            Some(baseline) => {
                let base = area_under_curve(baseline);
                ratio(auc - base, 1.0 - base)
            }
            None => finite_or_missing(2.0 * auc - 1.0),
        };
        let main = ScoreComponent::new(ComponentName::Main, value)
            .with_bounds(f64::NEG_INFINITY, 1.0, 1.0);
        Ok(ScoreStatistic::new(self.name(), pool.metadata().clone()).with_component(main))
    }
}
