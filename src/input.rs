//! JSON time series input.

use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use wres_datamodel::{Ensemble, Event, ForecastSeries, TimeSeries};

/// Observed and forecast series for one feature.
///
/// Missing values are written as `null`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeriesInput {
    pub observed: Vec<ObservedJson>,
    pub forecasts: Vec<ForecastJson>,
    /// Forecasts of a reference system, for skill scores.
    #[serde(default)]
    pub baseline: Vec<ForecastJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservedJson {
    pub valid_time: DateTime<Utc>,
    pub value: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastJson {
    pub reference_time: DateTime<Utc>,
    pub events: Vec<ForecastEventJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ForecastEventJson {
    pub valid_time: DateTime<Utc>,
    pub members: Vec<Option<f64>>,
}

/// Reads and parses a series file.
pub fn read_input(path: &Path) -> Result<SeriesInput> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read time series: {}", path.display()))?;
    parse_input(&text).with_context(|| format!("failed to parse time series: {}", path.display()))
}

pub fn parse_input(text: &str) -> Result<SeriesInput> {
    let input: SeriesInput = serde_json::from_str(text)?;
    if input.observed.is_empty() {
        bail!("no observed values");
    }
    if input.forecasts.is_empty() {
        bail!("no forecasts");
    }
    Ok(input)
}

impl SeriesInput {
    pub fn observed_series(&self) -> TimeSeries<f64> {
        self.observed
            .iter()
            .map(|e| (e.valid_time, e.value.unwrap_or(f64::NAN)))
            .collect()
    }

    /// Returns `true` when every forecast event, baseline included, has one member.
    pub fn is_single_valued(&self) -> bool {
        self.forecasts
            .iter()
            .chain(&self.baseline)
            .flat_map(|f| &f.events)
            .all(|e| e.members.len() == 1)
    }
}

impl ForecastJson {
    pub fn to_ensemble_series(&self) -> Result<ForecastSeries<Ensemble>> {
        let events = self
            .events
            .iter()
            .map(|e| {
                let members = e.members.iter().map(|m| m.unwrap_or(f64::NAN)).collect();
                Ensemble::new(members)
                    .map(|ensemble| Event::new(e.valid_time, ensemble))
                    .with_context(|| format!("invalid ensemble valid at {}", e.valid_time))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ForecastSeries::issued_at(self.reference_time, events))
    }

    /// The first member of each event.
    pub fn to_single_valued_series(&self) -> Result<ForecastSeries<f64>> {
        let events = self
            .events
            .iter()
            .map(|e| match e.members.first() {
                Some(m) => Ok(Event::new(e.valid_time, m.unwrap_or(f64::NAN))),
                None => bail!("event valid at {} has no value", e.valid_time),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(ForecastSeries::issued_at(self.reference_time, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    const SERIES: &str = r#"{
        "observed": [
            { "valid_time": "1985-06-01T13:00:00Z", "value": 1.5 },
            { "valid_time": "1985-06-01T14:00:00Z", "value": null }
        ],
        "forecasts": [
            {
                "reference_time": "1985-06-01T12:00:00Z",
                "events": [
                    { "valid_time": "1985-06-01T13:00:00Z", "members": [1.0, null, 2.0] },
                    { "valid_time": "1985-06-01T14:00:00Z", "members": [3.0, 4.0, 5.0] }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_series() {
        let input = parse_input(SERIES).unwrap();
        assert!(input.baseline.is_empty());
        assert!(!input.is_single_valued());

        let observed = input.observed_series();
        assert_eq!(observed.len(), 2);
        assert!(observed.events()[1].value().is_nan());

        let forecast = input.forecasts[0].to_ensemble_series().unwrap();
        assert_eq!(forecast.len(), 2);
        assert_eq!(forecast.events()[0].lead_duration(), TimeDelta::hours(1));
        assert!(forecast.events()[0].value().members()[1].is_nan());
    }

    #[test]
    fn test_single_valued_detection() {
        let text = SERIES.replace("[1.0, null, 2.0]", "[1.0]").replace("[3.0, 4.0, 5.0]", "[3.0]");
        let input = parse_input(&text).unwrap();
        assert!(input.is_single_valued());
        let forecast = input.forecasts[0].to_single_valued_series().unwrap();
        assert_eq!(*forecast.events()[1].value(), 3.0);
    }

    #[test]
    fn test_empty_members_rejected() {
        let text = SERIES.replace("[3.0, 4.0, 5.0]", "[]");
        let input = parse_input(&text).unwrap();
        assert!(input.forecasts[0].to_ensemble_series().is_err());
    }

    #[test]
    fn test_missing_forecasts_rejected() {
        let err = parse_input(r#"{ "observed": [], "forecasts": [] }"#).unwrap_err();
        assert!(err.to_string().contains("no observed values"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let text = SERIES.replacen("\"observed\"", "\"simulated\": [], \"observed\"", 1);
        assert!(parse_input(&text).is_err());
    }
}
