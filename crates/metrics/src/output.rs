//! JSON output for computed statistics.

use wres_datamodel::Statistic;

use crate::error::MetricError;

/// Serializes statistics to pretty-printed JSON.
///
/// Missing and infinite values are written as `null`.
pub fn to_json(statistics: &[Statistic]) -> Result<String, MetricError> {
    serde_json::to_string_pretty(statistics).map_err(|e| MetricError::Serialization {
        reason: e.to_string(),
    })
}
