use std::path::PathBuf;

use serde::Deserialize;

/// Top-level WRES configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WresConfig {
    /// What is evaluated and where the data live.
    pub evaluation: EvaluationToml,

    /// Metric selection and parameters.
    #[serde(default)]
    pub metrics: MetricsToml,

    /// Value thresholds applied to every pool.
    #[serde(default)]
    pub thresholds: Vec<ThresholdToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationToml {
    pub feature: String,
    pub variable: String,
    pub unit: String,
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsToml {
    /// Metric names; every metric when absent.
    #[serde(default)]
    pub names: Option<Vec<String>>,
    #[serde(default = "default_roc_classifiers")]
    pub roc_classifiers: usize,
    #[serde(default = "default_reliability_bins")]
    pub reliability_bins: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for MetricsToml {
    fn default() -> Self {
        Self {
            names: None,
            roc_classifiers: default_roc_classifiers(),
            reliability_bins: default_reliability_bins(),
            seed: default_seed(),
        }
    }
}

fn default_roc_classifiers() -> usize {
    wres_metrics::roc::DEFAULT_CLASSIFIERS
}
fn default_reliability_bins() -> usize {
    wres_metrics::reliability::DEFAULT_BINS
}
fn default_seed() -> u64 {
    wres_metrics::config::DEFAULT_SEED
}

/// Threshold specification. `upper` turns the threshold into `value <= x < upper`; the
/// operator defaults to `greater`, or `between` when `upper` is set.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdToml {
    pub value: f64,
    #[serde(default)]
    pub upper: Option<f64>,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default = "default_orientation")]
    pub orientation: String,
    #[serde(default)]
    pub name: Option<String>,
}

fn default_orientation() -> String {
    "left".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config: WresConfig = toml::from_str(
            r#"
            [evaluation]
            feature = "DRRC2"
            variable = "streamflow"
            unit = "CMS"
            "#,
        )
        .unwrap();
        assert_eq!(config.evaluation.feature, "DRRC2");
        assert!(config.evaluation.input.is_none());
        assert!(config.metrics.names.is_none());
        assert_eq!(config.metrics.roc_classifiers, 10);
        assert_eq!(config.metrics.reliability_bins, 10);
        assert!(config.thresholds.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config: WresConfig = toml::from_str(
            r#"
            [evaluation]
            feature = "DRRC2"
            variable = "streamflow"
            unit = "CMS"
            input = "series.json"
            output = "statistics.json"

            [metrics]
            names = ["brier score", "threat_score"]
            roc_classifiers = 20
            seed = 7

            [[thresholds]]
            value = 5.0

            [[thresholds]]
            value = 1.0
            upper = 3.0
            orientation = "left_and_right"
            name = "moderate"
            "#,
        )
        .unwrap();
        assert_eq!(config.evaluation.input, Some(PathBuf::from("series.json")));
        assert_eq!(
            config.metrics.names.as_deref(),
            Some(&["brier score".to_string(), "threat_score".to_string()][..])
        );
        assert_eq!(config.metrics.seed, 7);
        assert_eq!(config.thresholds.len(), 2);
        assert!(config.thresholds[0].operator.is_none());
        assert_eq!(config.thresholds[0].orientation, "left");
        assert_eq!(config.thresholds[1].upper, Some(3.0));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<WresConfig, _> = toml::from_str(
            r#"
            [evaluation]
            feature = "DRRC2"
            variable = "streamflow"
            unit = "CMS"
            colour = "blue"
            "#,
        );
        assert!(result.is_err());
    }
}
