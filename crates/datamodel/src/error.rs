//! Error types for the WRES data model.

/// Error type for pool construction, pairing and slicing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PoolError {
    /// Returned when one side of a pairing operation has no events.
    #[error("cannot pair time series: the {side} series contains no events")]
    EmptySeries {
        /// Which side was empty ("observed" or "forecast").
        side: String,
    },

    /// Returned when a series has more than one event at the same valid time.
    #[error("the {side} series contains more than one event at valid time {valid_time}")]
    DuplicateValidTime {
        /// Which side contained the duplicate.
        side: String,
        /// The duplicated valid time, RFC 3339.
        valid_time: String,
    },

    /// Returned when an ensemble is constructed without members.
    #[error("an ensemble requires at least one member")]
    EmptyEnsemble,

    /// Returned when a probability is not a finite value in [0, 1].
    #[error("invalid probability: {value} (must be finite and within [0, 1])")]
    InvalidProbability {
        /// The rejected value.
        value: f64,
    },

    /// Returned when a threshold is malformed.
    #[error("invalid threshold: {reason}")]
    InvalidThreshold {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a time window has inverted bounds.
    #[error("invalid time window: {reason}")]
    InvalidTimeWindow {
        /// Description of the problem.
        reason: String,
    },

    /// Returned when consolidation is requested for an empty list of pools.
    #[error("cannot consolidate an empty collection of pools")]
    NothingToConsolidate,

    /// Returned when pools to consolidate do not describe the same slice.
    #[error("cannot consolidate pools: {reason}")]
    InconsistentPools {
        /// Description of the mismatch.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_empty_series() {
        let e = PoolError::EmptySeries {
            side: "observed".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "cannot pair time series: the observed series contains no events"
        );
    }

    #[test]
    fn test_error_duplicate_valid_time() {
        let e = PoolError::DuplicateValidTime {
            side: "observed".to_string(),
            valid_time: "2020-01-01T00:00:00+00:00".to_string(),
        };
        assert!(e.to_string().contains("2020-01-01T00:00:00+00:00"));
    }

    #[test]
    fn test_error_invalid_probability() {
        let e = PoolError::InvalidProbability { value: 1.5 };
        assert_eq!(
            e.to_string(),
            "invalid probability: 1.5 (must be finite and within [0, 1])"
        );
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<PoolError>();
    }
}
