//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};

use crate::config::*;

use wres_datamodel::{MetricName, Threshold, ThresholdOperator, ThresholdOrientation};
use wres_metrics::MetricsConfig;

/// Parses a threshold operator name into the corresponding enum variant.
pub fn parse_operator(s: &str) -> Result<ThresholdOperator> {
    match s.to_lowercase().replace([' ', '-'], "_").as_str() {
        "greater" | ">" => Ok(ThresholdOperator::Greater),
        "less" | "<" => Ok(ThresholdOperator::Less),
        "greater_equal" | ">=" => Ok(ThresholdOperator::GreaterEqual),
        "less_equal" | "<=" => Ok(ThresholdOperator::LessEqual),
        "equal" | "=" => Ok(ThresholdOperator::Equal),
        other => bail!("unknown threshold operator: {other:?}"),
    }
}

/// Parses a data orientation name into the corresponding enum variant.
pub fn parse_orientation(s: &str) -> Result<ThresholdOrientation> {
    match s.to_lowercase().replace([' ', '-'], "_").as_str() {
        "left" => Ok(ThresholdOrientation::Left),
        "right" => Ok(ThresholdOrientation::Right),
        "left_and_right" => Ok(ThresholdOrientation::LeftAndRight),
        "left_and_any_right" => Ok(ThresholdOrientation::LeftAndAnyRight),
        other => bail!("unknown threshold orientation: {other:?}"),
    }
}

/// Converts a TOML threshold specification into a [`Threshold`] in `unit`.
///
/// With `upper` set the operator must be absent or `between`; otherwise it defaults to
/// `greater`.
pub fn build_threshold(t: &ThresholdToml, unit: &str) -> Result<Threshold> {
    let orientation = parse_orientation(&t.orientation)?;
    let threshold = match (t.upper, t.operator.as_deref()) {
        (Some(upper), None) => Threshold::between(t.value, upper, orientation)?,
        (Some(upper), Some(op)) if op.trim().eq_ignore_ascii_case("between") => {
            Threshold::between(t.value, upper, orientation)?
        }
        (Some(_), Some(op)) => {
            bail!("threshold with an upper bound must use the between operator, got {op:?}")
        }
        (None, op) => {
            Threshold::value(t.value, parse_operator(op.unwrap_or("greater"))?, orientation)?
        }
    };
    let threshold = threshold.with_units(unit);
    Ok(match &t.name {
        Some(name) => threshold.with_name(name),
        None => threshold,
    })
}

/// Parses metric names; every metric when `names` is absent.
pub fn parse_metric_names(names: Option<&[String]>) -> Result<Vec<MetricName>> {
    match names {
        None => Ok(MetricName::ALL.to_vec()),
        Some(names) => names
            .iter()
            .map(|n| n.parse::<MetricName>().map_err(anyhow::Error::from))
            .collect(),
    }
}

/// Builds a validated [`MetricsConfig`] from the TOML configuration.
pub fn build_metrics_config(config: &WresConfig) -> Result<MetricsConfig> {
    let metrics = parse_metric_names(config.metrics.names.as_deref())?;
    let thresholds = config
        .thresholds
        .iter()
        .enumerate()
        .map(|(i, t)| {
            build_threshold(t, &config.evaluation.unit)
                .with_context(|| format!("invalid threshold #{}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;
    let cfg = MetricsConfig::new(metrics)
        .with_roc_classifiers(config.metrics.roc_classifiers)
        .with_reliability_bins(config.metrics.reliability_bins)
        .with_seed(config.metrics.seed)
        .with_thresholds(thresholds);
    cfg.validate().context("invalid [metrics] configuration")?;
    Ok(cfg)
}
