//! Metric error types.

use wres_datamodel::{MetricName, PoolError};

/// Errors that can occur while configuring or computing metrics.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricError {
    /// A skill score that needs a baseline was applied to a pool without one.
    #[error("Specify non-null input to the '{metric}'.")]
    MissingBaseline { metric: MetricName },

    /// An intermediate statistic does not have the expected components.
    #[error("while computing the '{metric}': expected an intermediate with components {expected}, but found {actual}")]
    UnexpectedIntermediate {
        metric: MetricName,
        expected: String,
        actual: String,
    },

    /// The pool cannot be evaluated by the metric.
    #[error("while computing the '{metric}': {reason}")]
    Calculation { metric: MetricName, reason: String },

    /// A metric parameter is out of range.
    #[error("invalid parameter for the '{metric}': {reason}")]
    InvalidParameter { metric: MetricName, reason: String },

    /// The metric configuration is unusable.
    #[error("invalid metrics configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A pool operation failed.
    #[error(transparent)]
    Pool(#[from] PoolError),

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_baseline_names_the_metric() {
        let err = MetricError::MissingBaseline {
            metric: MetricName::ContinuousRankedProbabilitySkillScore,
        };
        assert_eq!(
            err.to_string(),
            "Specify non-null input to the 'CONTINUOUS_RANKED_PROBABILITY_SKILL_SCORE'."
        );
    }

    #[test]
    fn test_unexpected_intermediate_names_both_sets() {
        let err = MetricError::UnexpectedIntermediate {
            metric: MetricName::ThreatScore,
            expected: "{TRUE_POSITIVES, FALSE_POSITIVES}".to_string(),
            actual: "{MAIN}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("THREAT_SCORE"));
        assert!(msg.contains("{TRUE_POSITIVES, FALSE_POSITIVES}"));
        assert!(msg.contains("{MAIN}"));
    }

    #[test]
    fn test_pool_errors_are_transparent() {
        let err: MetricError = PoolError::NothingToConsolidate.into();
        assert_eq!(err.to_string(), PoolError::NothingToConsolidate.to_string());
    }

    #[test]
    fn test_serialization_display() {
        let err = MetricError::Serialization {
            reason: "bad".to_string(),
        };
        assert_eq!(err.to_string(), "serialization error: bad");
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<MetricError>();
    }
}
