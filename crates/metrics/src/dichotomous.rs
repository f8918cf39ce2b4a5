//! The 2x2 contingency table and the scores derived from it.

use std::collections::BTreeSet;

use wres_datamodel::{
    ComponentName, DichotomousPair, MetricName, Pool, PoolMetadata, ScoreComponent,
    ScoreStatistic,
};
use wres_stats::ratio;

use crate::error::MetricError;
use crate::metric::{Collectable, Metric};

const CELLS: [ComponentName; 4] = [
    ComponentName::TruePositives,
    ComponentName::FalsePositives,
    ComponentName::FalseNegatives,
    ComponentName::TrueNegatives,
];

/// Counts of a 2x2 contingency table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cells {
    pub true_positives: f64,
    pub false_positives: f64,
    pub false_negatives: f64,
    pub true_negatives: f64,
}

impl Cells {
    /// Sum of all cells: the sample size.
    pub fn total(&self) -> f64 {
        self.true_positives + self.false_positives + self.false_negatives + self.true_negatives
    }

    fn count(&mut self, pair: &DichotomousPair) {
        match (*pair.left(), *pair.right()) {
            (true, true) => self.true_positives += 1.0,
            (false, true) => self.false_positives += 1.0,
            (true, false) => self.false_negatives += 1.0,
            (false, false) => self.true_negatives += 1.0,
        }
    }

    /// Reads the cells of a contingency table statistic.
    ///
    /// # Errors
    ///
    /// Returns [`MetricError::UnexpectedIntermediate`] unless `table` is a contingency
    /// table with exactly the four named cells.
    pub fn from_statistic(table: &ScoreStatistic, metric: MetricName) -> Result<Self, MetricError> {
        let expected: BTreeSet<ComponentName> = CELLS.into_iter().collect();
        let actual = table.component_names();
        if table.metric() != MetricName::ContingencyTable
            || actual != expected
            || table.components().len() != CELLS.len()
        {
            return Err(MetricError::UnexpectedIntermediate {
                metric,
                expected: format!("{} {}", MetricName::ContingencyTable, format_set(&expected)),
                actual: format!("{} {}", table.metric(), format_set(&actual)),
            });
        }
        let cell = |name| table.value(name).unwrap_or(f64::NAN);
        Ok(Self {
            true_positives: cell(ComponentName::TruePositives),
            false_positives: cell(ComponentName::FalsePositives),
            false_negatives: cell(ComponentName::FalseNegatives),
            true_negatives: cell(ComponentName::TrueNegatives),
        })
    }

    /// Builds the contingency table statistic for these cells.
    pub fn to_statistic(&self, metadata: PoolMetadata) -> ScoreStatistic {
        let cell = |name, value| ScoreComponent::new(name, value).with_bounds(0.0, f64::INFINITY, f64::NAN);
        ScoreStatistic::new(MetricName::ContingencyTable, metadata)
            .with_component(cell(ComponentName::TruePositives, self.true_positives))
            .with_component(cell(ComponentName::FalsePositives, self.false_positives))
            .with_component(cell(ComponentName::FalseNegatives, self.false_negatives))
            .with_component(cell(ComponentName::TrueNegatives, self.true_negatives))
    }
}

fn format_set(names: &BTreeSet<ComponentName>) -> String {
    let names: Vec<String> = names.iter().map(ToString::to_string).collect();
    format!("{{{}}}", names.join(", "))
}

/// The 2x2 contingency table of a pool of event occurrences.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContingencyTable;

impl ContingencyTable {
    /// Folds the pool into its four cells.
    pub fn cells(pool: &Pool<DichotomousPair>) -> Cells {
        let mut cells = Cells::default();
        for pair in pool {
            cells.count(pair);
        }
        cells
    }
}

impl Metric<DichotomousPair> for ContingencyTable {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        MetricName::ContingencyTable
    }

    fn apply(&self, pool: &Pool<DichotomousPair>) -> Result<ScoreStatistic, MetricError> {
        Ok(Self::cells(pool).to_statistic(pool.metadata().clone()))
    }
}

/// Scores that are closed-form ratios of contingency table cells.
///
/// Degenerate ratios (0/0, x/0) yield the missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DichotomousScore {
    /// TP / (TP + FP + FN)
    ThreatScore,
    /// (TP - R) / (TP + FP + FN - R) with R = (TP + FN)(TP + FP) / N
    EquitableThreatScore,
    /// FP / (TP + FP)
    FalseAlarmRatio,
    /// (TP + FP) / (TP + FN)
    FrequencyBias,
    /// TP / (TP + FN)
    ProbabilityOfDetection,
    /// FP / (FP + TN)
    ProbabilityOfFalseDetection,
    /// PoD - PoFD
    PeirceSkillScore,
}

impl DichotomousScore {
    /// Every dichotomous score.
    pub const ALL: [DichotomousScore; 7] = [
        DichotomousScore::ThreatScore,
        DichotomousScore::EquitableThreatScore,
        DichotomousScore::FalseAlarmRatio,
        DichotomousScore::FrequencyBias,
        DichotomousScore::ProbabilityOfDetection,
        DichotomousScore::ProbabilityOfFalseDetection,
        DichotomousScore::PeirceSkillScore,
    ];

    /// Looks up the score with the given metric name.
    pub fn from_name(name: MetricName) -> Option<Self> {
        if !name.is_derived_from_contingency_table() {
            return None;
        }
        Self::ALL.into_iter().find(|s| s.metric_name() == name)
    }

    fn metric_name(self) -> MetricName {
        match self {
            DichotomousScore::ThreatScore => MetricName::ThreatScore,
            DichotomousScore::EquitableThreatScore => MetricName::EquitableThreatScore,
            DichotomousScore::FalseAlarmRatio => MetricName::FalseAlarmRatio,
            DichotomousScore::FrequencyBias => MetricName::FrequencyBias,
            DichotomousScore::ProbabilityOfDetection => MetricName::ProbabilityOfDetection,
            DichotomousScore::ProbabilityOfFalseDetection => {
                MetricName::ProbabilityOfFalseDetection
            }
            DichotomousScore::PeirceSkillScore => MetricName::PeirceSkillScore,
        }
    }

    /// `(minimum, maximum, optimum)` of the score.
    fn bounds(self) -> (f64, f64, f64) {
        match self {
            DichotomousScore::ThreatScore | DichotomousScore::ProbabilityOfDetection => {
                (0.0, 1.0, 1.0)
            }
            DichotomousScore::EquitableThreatScore => (-1.0 / 3.0, 1.0, 1.0),
            DichotomousScore::FalseAlarmRatio | DichotomousScore::ProbabilityOfFalseDetection => {
                (0.0, 1.0, 0.0)
            }
            DichotomousScore::FrequencyBias => (0.0, f64::INFINITY, 1.0),
            DichotomousScore::PeirceSkillScore => (-1.0, 1.0, 1.0),
        }
    }

    /// Evaluates the score on a table.
    pub fn score(self, cells: &Cells) -> f64 {
        let Cells {
            true_positives: tp,
            false_positives: fp,
            false_negatives: fn_,
            true_negatives: tn,
        } = *cells;
        match self {
            DichotomousScore::ThreatScore => ratio(tp, tp + fp + fn_),
            DichotomousScore::EquitableThreatScore => {
                let hits_random = (tp + fn_) * (tp + fp) / cells.total();
                ratio(tp - hits_random, tp + fp + fn_ - hits_random)
            }
            DichotomousScore::FalseAlarmRatio => ratio(fp, tp + fp),
            DichotomousScore::FrequencyBias => ratio(tp + fp, tp + fn_),
            DichotomousScore::ProbabilityOfDetection => ratio(tp, tp + fn_),
            DichotomousScore::ProbabilityOfFalseDetection => ratio(fp, fp + tn),
            DichotomousScore::PeirceSkillScore => {
                wres_stats::finite_or_missing(ratio(tp, tp + fn_) - ratio(fp, fp + tn))
            }
        }
    }
}

impl Metric<DichotomousPair> for DichotomousScore {
    type Output = ScoreStatistic;

    fn name(&self) -> MetricName {
        self.metric_name()
    }

    fn apply(&self, pool: &Pool<DichotomousPair>) -> Result<ScoreStatistic, MetricError> {
        let table = self.compute_intermediate(pool)?;
        self.finish_from(&table, pool)
    }
}

impl Collectable<DichotomousPair> for DichotomousScore {
    fn collection_of(&self) -> MetricName {
        MetricName::ContingencyTable
    }

    fn compute_intermediate(
        &self,
        pool: &Pool<DichotomousPair>,
    ) -> Result<ScoreStatistic, MetricError> {
        ContingencyTable.apply(pool)
    }

    fn finish_from(
        &self,
        intermediate: &ScoreStatistic,
        pool: &Pool<DichotomousPair>,
    ) -> Result<ScoreStatistic, MetricError> {
        let cells = Cells::from_statistic(intermediate, self.metric_name())?;
        let (minimum, maximum, optimum) = self.bounds();
        let main = ScoreComponent::new(ComponentName::Main, self.score(&cells))
            .with_bounds(minimum, maximum, optimum);
        Ok(ScoreStatistic::new(self.metric_name(), pool.metadata().clone()).with_component(main))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use wres_datamodel::Pair;

    fn meta() -> PoolMetadata {
        PoolMetadata::new("DRRC2", "streamflow", "CMS")
    }

    /// TP=82, FP=38, FN=23, TN=222.
    fn reference_pool() -> Pool<DichotomousPair> {
        let mut pairs = Vec::new();
        pairs.extend(std::iter::repeat_n(Pair::new(true, true), 82));
        pairs.extend(std::iter::repeat_n(Pair::new(false, true), 38));
        pairs.extend(std::iter::repeat_n(Pair::new(true, false), 23));
        pairs.extend(std::iter::repeat_n(Pair::new(false, false), 222));
        Pool::new(pairs, meta())
    }

    fn main_of(score: DichotomousScore, pool: &Pool<DichotomousPair>) -> f64 {
        score.apply(pool).unwrap().main().unwrap()
    }

    #[test]
    fn test_contingency_table_counts() {
        let table = ContingencyTable.apply(&reference_pool()).unwrap();
        assert_eq!(table.value(ComponentName::TruePositives), Some(82.0));
        assert_eq!(table.value(ComponentName::FalsePositives), Some(38.0));
        assert_eq!(table.value(ComponentName::FalseNegatives), Some(23.0));
        assert_eq!(table.value(ComponentName::TrueNegatives), Some(222.0));
        assert_eq!(table.metadata().sample_size(), 365);
    }

    #[test]
    fn test_reference_scores() {
        let pool = reference_pool();
        assert_abs_diff_eq!(
            main_of(DichotomousScore::ThreatScore, &pool),
            0.5734265734265734,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            main_of(DichotomousScore::ProbabilityOfDetection, &pool),
            0.780952380952381,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            main_of(DichotomousScore::ProbabilityOfFalseDetection, &pool),
            0.14615384615384616,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            main_of(DichotomousScore::FalseAlarmRatio, &pool),
            0.31666666666666665,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            main_of(DichotomousScore::FrequencyBias, &pool),
            1.1428571428571428,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            main_of(DichotomousScore::PeirceSkillScore, &pool),
            0.780952380952381 - 0.14615384615384616,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_equitable_threat_score() {
        // R = (82 + 23)(82 + 38) / 365
        let r = 105.0 * 120.0 / 365.0;
        let expected = (82.0 - r) / (143.0 - r);
        assert_abs_diff_eq!(
            main_of(DichotomousScore::EquitableThreatScore, &reference_pool()),
            expected,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_threat_score_zero_over_zero_is_missing() {
        let pool = Pool::new(vec![Pair::new(false, false); 4], meta());
        assert!(main_of(DichotomousScore::ThreatScore, &pool).is_nan());
    }

    #[test]
    fn test_empty_pool_gives_missing_scores_and_zero_table() {
        let pool: Pool<DichotomousPair> = Pool::new(vec![], meta());
        for score in DichotomousScore::ALL {
            assert!(main_of(score, &pool).is_nan(), "{score:?}");
        }
        let table = ContingencyTable.apply(&pool).unwrap();
        assert_eq!(table.components().len(), 4);
        assert!(table.components().iter().all(|c| c.value() == 0.0));
    }

    #[test]
    fn test_finish_from_rejects_wrong_components() {
        let pool = reference_pool();
        let bogus = ScoreStatistic::new(MetricName::ContingencyTable, meta())
            .with_component(ScoreComponent::new(ComponentName::TruePositives, 1.0))
            .with_component(ScoreComponent::new(ComponentName::Main, 1.0));
        let err = DichotomousScore::ThreatScore
            .finish_from(&bogus, &pool)
            .unwrap_err();
        match err {
            MetricError::UnexpectedIntermediate {
                metric,
                expected,
                actual,
            } => {
                assert_eq!(metric, MetricName::ThreatScore);
                assert!(expected.contains("TRUE_NEGATIVES"));
                assert!(actual.contains("MAIN"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_finish_from_rejects_other_metrics() {
        let pool = reference_pool();
        let wrong = ScoreStatistic::new(MetricName::ThreatScore, meta())
            .with_component(ScoreComponent::new(ComponentName::Main, 0.5));
        assert!(
            DichotomousScore::FrequencyBias
                .finish_from(&wrong, &pool)
                .is_err()
        );
    }

    #[test]
    fn test_from_name() {
        assert_eq!(
            DichotomousScore::from_name(MetricName::PeirceSkillScore),
            Some(DichotomousScore::PeirceSkillScore)
        );
        assert_eq!(DichotomousScore::from_name(MetricName::BrierScore), None);
        assert_eq!(DichotomousScore::from_name(MetricName::ContingencyTable), None);
    }
}
