//! Observed and forecast time series handed over by the reading layer.

use chrono::{DateTime, TimeDelta, Utc};

/// One observed value at a valid time.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<T> {
    valid_time: DateTime<Utc>,
    value: T,
}

impl<T> Event<T> {
    pub fn new(valid_time: DateTime<Utc>, value: T) -> Self {
        Self { valid_time, value }
    }

    pub fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

/// An observed series, in the order supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<T> {
    events: Vec<Event<T>>,
}

impl<T> TimeSeries<T> {
    pub fn new(events: Vec<Event<T>>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[Event<T>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<T> FromIterator<(DateTime<Utc>, T)> for TimeSeries<T> {
    fn from_iter<I: IntoIterator<Item = (DateTime<Utc>, T)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(t, v)| Event::new(t, v)).collect())
    }
}

/// One forecast value (single-valued or ensemble) at a valid time and lead duration.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEvent<R> {
    valid_time: DateTime<Utc>,
    lead_duration: TimeDelta,
    value: R,
}

impl<R> ForecastEvent<R> {
    pub fn new(valid_time: DateTime<Utc>, lead_duration: TimeDelta, value: R) -> Self {
        Self {
            valid_time,
            lead_duration,
            value,
        }
    }

    pub fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }

    pub fn lead_duration(&self) -> TimeDelta {
        self.lead_duration
    }

    pub fn value(&self) -> &R {
        &self.value
    }
}

/// A forecast series, optionally issued at a single reference time.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries<R> {
    reference_time: Option<DateTime<Utc>>,
    events: Vec<ForecastEvent<R>>,
}

impl<R> ForecastSeries<R> {
    /// Creates a series from events that already carry their lead durations.
    pub fn new(events: Vec<ForecastEvent<R>>) -> Self {
        Self {
            reference_time: None,
            events,
        }
    }

    /// Creates a series issued at `reference_time`; each lead duration is
    /// `valid_time - reference_time`.
    pub fn issued_at(reference_time: DateTime<Utc>, events: Vec<Event<R>>) -> Self {
        let events = events
            .into_iter()
            .map(|e| {
                let lead = e.valid_time - reference_time;
                ForecastEvent::new(e.valid_time, lead, e.value)
            })
            .collect();
        Self {
            reference_time: Some(reference_time),
            events,
        }
    }

    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        self.reference_time
    }

    pub fn events(&self) -> &[ForecastEvent<R>] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
