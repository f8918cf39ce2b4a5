//! Builds metric collections from a [`MetricsConfig`], one per input group.

use tracing::warn;
use wres_datamodel::{
    DichotomousPair, EnsemblePair, MetricGroup, MetricName, ProbabilityPair, SingleValuedPair,
};

use crate::brier::{BrierScore, BrierSkillScore};
use crate::collection::MetricCollection;
use crate::config::MetricsConfig;
use crate::crps::{ContinuousRankedProbabilityScore, ContinuousRankedProbabilitySkillScore};
use crate::dichotomous::{ContingencyTable, DichotomousScore};
use crate::error::MetricError;
use crate::rank_histogram::RankHistogram;
use crate::reliability::ReliabilityDiagram;
use crate::roc::{RocDiagram, RocScore};
use crate::sample_size::SampleSize;

/// Builds the metric collections selected by a validated configuration.
///
/// The sample size is reported once per pool, with the unthresholded statistics, so it
/// belongs to the ensemble and single-valued collections only.
#[derive(Debug, Clone)]
pub struct MetricFactory {
    config: MetricsConfig,
}

impl MetricFactory {
    /// # Errors
    ///
    /// Returns the error of [`MetricsConfig::validate`].
    pub fn new(config: MetricsConfig) -> Result<Self, MetricError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Selected metrics accepting `group`.
    fn selected(&self, group: MetricGroup) -> impl Iterator<Item = MetricName> + '_ {
        self.config
            .metrics()
            .iter()
            .copied()
            .filter(move |m| m.accepts(group))
    }

    /// Returns `false`, with a warning, for metrics that need a baseline the pool lacks.
    fn is_computable(metric: MetricName, has_baseline: bool) -> bool {
        if metric.requires_baseline() && !has_baseline {
            warn!(%metric, "skipping metric: the pool has no baseline");
            return false;
        }
        true
    }

    /// Contingency table and the scores derived from it.
    pub fn dichotomous(&self) -> MetricCollection<DichotomousPair> {
        let mut collection = MetricCollection::new();
        for metric in self.selected(MetricGroup::Dichotomous) {
            if metric == MetricName::ContingencyTable {
                collection = collection.with_metric(ContingencyTable);
            } else if let Some(score) = DichotomousScore::from_name(metric) {
                collection = collection.with_collectable(score);
            }
        }
        collection
    }

    /// Brier scores, ROC score and diagram, reliability diagram.
    pub fn discrete_probability(
        &self,
        has_baseline: bool,
    ) -> Result<MetricCollection<ProbabilityPair>, MetricError> {
        let mut collection = MetricCollection::new();
        for metric in self.selected(MetricGroup::DiscreteProbability) {
            if !Self::is_computable(metric, has_baseline) {
                continue;
            }
            collection = match metric {
                MetricName::BrierScore => collection.with_metric(BrierScore),
                MetricName::BrierSkillScore => collection.with_metric(BrierSkillScore),
                MetricName::RelativeOperatingCharacteristicScore => {
                    collection.with_metric(RocScore)
                }
                MetricName::RelativeOperatingCharacteristicDiagram => {
                    collection.with_metric(RocDiagram::new(self.config.roc_classifiers())?)
                }
                MetricName::ReliabilityDiagram => collection
                    .with_metric(ReliabilityDiagram::new(self.config.reliability_bins())?),
                _ => collection,
            };
        }
        Ok(collection)
    }

    /// CRPS, CRPSS, rank histogram and sample size.
    pub fn ensemble(&self, has_baseline: bool) -> MetricCollection<EnsemblePair> {
        let mut collection = MetricCollection::new();
        for metric in self.selected(MetricGroup::Ensemble) {
            if !Self::is_computable(metric, has_baseline) {
                continue;
            }
            collection = match metric {
                MetricName::ContinuousRankedProbabilityScore => {
                    collection.with_metric(ContinuousRankedProbabilityScore)
                }
                MetricName::ContinuousRankedProbabilitySkillScore => {
                    collection.with_metric(ContinuousRankedProbabilitySkillScore)
                }
                MetricName::RankHistogram => {
                    collection.with_metric(RankHistogram::seeded(self.config.seed()))
                }
                MetricName::SampleSize => collection.with_metric(SampleSize),
                _ => collection,
            };
        }
        collection
    }

    /// Metrics of single-valued pairs: the sample size.
    pub fn single_valued(&self) -> MetricCollection<SingleValuedPair> {
        let mut collection = MetricCollection::new();
        if self.config.is_selected(MetricName::SampleSize) {
            collection = collection.with_metric(SampleSize);
        }
        collection
    }
}
