//! Metadata describing the slice of data a pool holds.

use serde::Serialize;

use crate::threshold::Threshold;
use crate::time_window::TimeWindow;

/// Which dataset a pool (or statistic) describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DatasetOrientation {
    /// The forecast being verified.
    Right,
    /// The reference forecast used by skill scores.
    Baseline,
}

/// Feature, time window, unit and threshold of a pool.
///
/// `sample_size` is owned by [`crate::Pool`]: it is set whenever a pool is built and
/// always equals the number of pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoolMetadata {
    feature: String,
    variable: String,
    measurement_unit: String,
    time_window: TimeWindow,
    threshold: Threshold,
    orientation: DatasetOrientation,
    sample_size: usize,
}

impl PoolMetadata {
    /// Creates metadata with an unbounded time window and the all-data threshold.
    pub fn new(
        feature: impl Into<String>,
        variable: impl Into<String>,
        measurement_unit: impl Into<String>,
    ) -> Self {
        Self {
            feature: feature.into(),
            variable: variable.into(),
            measurement_unit: measurement_unit.into(),
            time_window: TimeWindow::unbounded(),
            threshold: Threshold::all_data(),
            orientation: DatasetOrientation::Right,
            sample_size: 0,
        }
    }

    pub fn with_time_window(mut self, time_window: TimeWindow) -> Self {
        self.time_window = time_window;
        self
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_orientation(mut self, orientation: DatasetOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub(crate) fn with_sample_size(mut self, sample_size: usize) -> Self {
        self.sample_size = sample_size;
        self
    }

    pub fn feature(&self) -> &str {
        &self.feature
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn measurement_unit(&self) -> &str {
        &self.measurement_unit
    }

    pub fn time_window(&self) -> &TimeWindow {
        &self.time_window
    }

    pub fn threshold(&self) -> &Threshold {
        &self.threshold
    }

    pub fn orientation(&self) -> DatasetOrientation {
        self.orientation
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Returns `true` when both describe the same feature, variable and unit.
    pub fn same_dataset(&self, other: &PoolMetadata) -> bool {
        self.feature == other.feature
            && self.variable == other.variable
            && self.measurement_unit == other.measurement_unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::threshold::{ThresholdOperator, ThresholdOrientation};

    #[test]
    fn test_defaults() {
        let meta = PoolMetadata::new("DRRC2", "streamflow", "CMS");
        assert_eq!(meta.feature(), "DRRC2");
        assert_eq!(meta.variable(), "streamflow");
        assert_eq!(meta.measurement_unit(), "CMS");
        assert!(meta.threshold().is_all_data());
        assert_eq!(meta.orientation(), DatasetOrientation::Right);
        assert_eq!(meta.sample_size(), 0);
    }

    #[test]
    fn test_builder_methods() {
        let threshold =
            Threshold::value(2.0, ThresholdOperator::Greater, ThresholdOrientation::Left).unwrap();
        let meta = PoolMetadata::new("A", "v", "u")
            .with_threshold(threshold.clone())
            .with_orientation(DatasetOrientation::Baseline);
        assert_eq!(meta.threshold(), &threshold);
        assert_eq!(meta.orientation(), DatasetOrientation::Baseline);
    }

    #[test]
    fn test_same_dataset_ignores_threshold() {
        let a = PoolMetadata::new("A", "v", "u");
        let b = a.clone().with_threshold(
            Threshold::value(1.0, ThresholdOperator::Less, ThresholdOrientation::Left).unwrap(),
        );
        let c = PoolMetadata::new("B", "v", "u");
        assert!(a.same_dataset(&b));
        assert!(!a.same_dataset(&c));
    }
}
