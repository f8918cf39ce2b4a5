//! Pairing of observed and forecast series by exact valid time.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::PoolError;
use crate::pair::{Admissible, Pair, TimedPair};
use crate::time_series::{ForecastSeries, TimeSeries};

/// Pairs an observed series with a forecast series: an inner join on valid time.
///
/// Forecast events are visited in their original order and the output preserves it.
/// A forecast event without an observation at exactly the same valid time is dropped,
/// as is a pair whose observation is non-finite or whose forecast holds no finite
/// value. No interpolation is performed.
///
/// # Errors
///
/// Returns [`PoolError::EmptySeries`] if either series has no events, and
/// [`PoolError::DuplicateValidTime`] if the observed series repeats a valid time.
pub fn pair_by_exact_time<R>(
    observed: &TimeSeries<f64>,
    forecast: &ForecastSeries<R>,
) -> Result<Vec<TimedPair<f64, R>>, PoolError>
where
    R: Clone + Admissible,
{
    if observed.is_empty() {
        return Err(PoolError::EmptySeries {
            side: "observed".to_string(),
        });
    }
    if forecast.is_empty() {
        return Err(PoolError::EmptySeries {
            side: "forecast".to_string(),
        });
    }

    let lookup = observed_lookup(observed)?;

    let mut pairs = Vec::with_capacity(forecast.len().min(observed.len()));
    let mut unmatched = 0usize;
    let mut inadmissible = 0usize;
    for event in forecast.events() {
        let Some(&obs) = lookup.get(&event.valid_time()) else {
            unmatched += 1;
            continue;
        };
        if !obs.is_admissible() || !event.value().is_admissible() {
            inadmissible += 1;
            continue;
        }
        pairs.push(TimedPair::new(
            event.valid_time(),
            event.lead_duration(),
            Pair::new(obs, event.value().clone()),
        ));
    }

    debug!(
        paired = pairs.len(),
        unmatched, inadmissible, "paired forecast series by exact valid time"
    );

    Ok(pairs)
}

fn observed_lookup(observed: &TimeSeries<f64>) -> Result<HashMap<DateTime<Utc>, f64>, PoolError> {
    let mut lookup = HashMap::with_capacity(observed.len());
    for event in observed.events() {
        if lookup.insert(event.valid_time(), *event.value()).is_some() {
            return Err(PoolError::DuplicateValidTime {
                side: "observed".to_string(),
                valid_time: event.valid_time().to_rfc3339(),
            });
        }
    }
    Ok(lookup)
}
