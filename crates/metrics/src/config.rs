//! Configuration for metric evaluation.

use wres_datamodel::{MetricName, Threshold, ThresholdKind};

use crate::error::MetricError;
use crate::reliability::DEFAULT_BINS;
use crate::roc::DEFAULT_CLASSIFIERS;

/// Default seed for breaking rank histogram ties.
pub const DEFAULT_SEED: u64 = 42;

/// Which metrics to compute and how.
///
/// Use the builder methods to customise parameters.
///
/// # Example
///
/// ```
/// use wres_datamodel::{MetricName, Threshold, ThresholdOperator, ThresholdOrientation};
/// use wres_metrics::MetricsConfig;
///
/// let threshold =
///     Threshold::value(5.0, ThresholdOperator::Greater, ThresholdOrientation::Left).unwrap();
/// let config = MetricsConfig::default()
///     .with_metrics(vec![MetricName::BrierScore, MetricName::ThreatScore])
///     .with_threshold(threshold)
///     .with_roc_classifiers(20);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Selected metrics, in catalogue order without duplicates.
    metrics: Vec<MetricName>,
    /// Classifiers per ROC diagram.
    roc_classifiers: usize,
    /// Forecast probability bins per reliability diagram.
    reliability_bins: usize,
    /// Seed for rank histogram tie-breaking.
    seed: u64,
    /// Value thresholds applied to each pool.
    thresholds: Vec<Threshold>,
}

impl MetricsConfig {
    /// Creates a configuration selecting `metrics`.
    ///
    /// Defaults: 10 ROC classifiers, 10 reliability bins, seed 42, no thresholds.
    pub fn new(metrics: Vec<MetricName>) -> Self {
        Self {
            metrics: Vec::new(),
            roc_classifiers: DEFAULT_CLASSIFIERS,
            reliability_bins: DEFAULT_BINS,
            seed: DEFAULT_SEED,
            thresholds: Vec::new(),
        }
        .with_metrics(metrics)
    }

    /// Replaces the metric selection.
    pub fn with_metrics(mut self, mut metrics: Vec<MetricName>) -> Self {
        metrics.sort();
        metrics.dedup();
        self.metrics = metrics;
        self
    }

    /// Sets the number of ROC classifiers.
    pub fn with_roc_classifiers(mut self, classifiers: usize) -> Self {
        self.roc_classifiers = classifiers;
        self
    }

    /// Sets the number of reliability diagram bins.
    pub fn with_reliability_bins(mut self, bins: usize) -> Self {
        self.reliability_bins = bins;
        self
    }

    /// Sets the rank histogram seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Adds a threshold.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.thresholds.push(threshold);
        self
    }

    /// Replaces the thresholds.
    pub fn with_thresholds(mut self, thresholds: Vec<Threshold>) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn metrics(&self) -> &[MetricName] {
        &self.metrics
    }

    /// Returns `true` if `metric` is selected.
    pub fn is_selected(&self, metric: MetricName) -> bool {
        self.metrics.binary_search(&metric).is_ok()
    }

    pub fn roc_classifiers(&self) -> usize {
        self.roc_classifiers
    }

    pub fn reliability_bins(&self) -> usize {
        self.reliability_bins
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn thresholds(&self) -> &[Threshold] {
        &self.thresholds
    }

    /// Validates this configuration.
    ///
    /// Returns an error if no metric is selected, a classifier or bin count is zero, or
    /// a threshold is probability-typed or the all-data sentinel.
    pub fn validate(&self) -> Result<(), MetricError> {
        if self.metrics.is_empty() {
            return Err(MetricError::InvalidConfig {
                reason: "select at least one metric".to_string(),
            });
        }
        if self.roc_classifiers == 0 {
            return Err(MetricError::InvalidParameter {
                metric: MetricName::RelativeOperatingCharacteristicDiagram,
                reason: "the number of probability classifiers must be >= 1".to_string(),
            });
        }
        if self.reliability_bins == 0 {
            return Err(MetricError::InvalidParameter {
                metric: MetricName::ReliabilityDiagram,
                reason: "the number of probability bins must be >= 1".to_string(),
            });
        }
        for threshold in &self.thresholds {
            if threshold.kind() == ThresholdKind::Probability {
                return Err(MetricError::InvalidConfig {
                    reason: format!("threshold '{threshold}' must be a value threshold"),
                });
            }
            if threshold.is_all_data() {
                return Err(MetricError::InvalidConfig {
                    reason: "the all-data threshold is applied implicitly".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for MetricsConfig {
    /// Every metric in the catalogue.
    fn default() -> Self {
        Self::new(MetricName::ALL.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wres_datamodel::{ThresholdOperator, ThresholdOrientation};

    #[test]
    fn test_defaults() {
        let cfg = MetricsConfig::default();
        assert_eq!(cfg.metrics().len(), MetricName::ALL.len());
        assert_eq!(cfg.roc_classifiers(), 10);
        assert_eq!(cfg.reliability_bins(), 10);
        assert_eq!(cfg.seed(), DEFAULT_SEED);
        assert!(cfg.thresholds().is_empty());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_selection_is_sorted_and_deduplicated() {
        let cfg = MetricsConfig::new(vec![
            MetricName::SampleSize,
            MetricName::BrierScore,
            MetricName::SampleSize,
        ]);
        assert_eq!(
            cfg.metrics(),
            &[MetricName::BrierScore, MetricName::SampleSize]
        );
        assert!(cfg.is_selected(MetricName::SampleSize));
        assert!(!cfg.is_selected(MetricName::ThreatScore));
    }

    #[test]
    fn test_empty_selection_rejected() {
        let err = MetricsConfig::new(vec![]).validate().unwrap_err();
        assert!(matches!(err, MetricError::InvalidConfig { .. }));
    }

    #[test]
    fn test_zero_counts_rejected() {
        assert!(matches!(
            MetricsConfig::default().with_roc_classifiers(0).validate(),
            Err(MetricError::InvalidParameter {
                metric: MetricName::RelativeOperatingCharacteristicDiagram,
                ..
            })
        ));
        assert!(matches!(
            MetricsConfig::default().with_reliability_bins(0).validate(),
            Err(MetricError::InvalidParameter {
                metric: MetricName::ReliabilityDiagram,
                ..
            })
        ));
    }

    #[test]
    fn test_probability_threshold_rejected() {
        let threshold = Threshold::probability(
            0.5,
            ThresholdOperator::Greater,
            ThresholdOrientation::Left,
        )
        .unwrap();
        let err = MetricsConfig::default()
            .with_threshold(threshold)
            .validate()
            .unwrap_err();
        assert!(err.to_string().contains("value threshold"));
    }

    #[test]
    fn test_all_data_threshold_rejected() {
        let cfg = MetricsConfig::default().with_thresholds(vec![Threshold::all_data()]);
        assert!(cfg.validate().is_err());
    }
}
