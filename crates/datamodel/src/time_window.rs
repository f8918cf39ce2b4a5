//! Time window bounding the pairs in a pool.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

use crate::error::PoolError;
use crate::pair::TimedPair;

/// Reference-time, valid-time and lead-duration bounds of a pool (all inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    earliest_reference_time: DateTime<Utc>,
    latest_reference_time: DateTime<Utc>,
    earliest_valid_time: DateTime<Utc>,
    latest_valid_time: DateTime<Utc>,
    #[serde(serialize_with = "serialize_seconds")]
    earliest_lead_duration: TimeDelta,
    #[serde(serialize_with = "serialize_seconds")]
    latest_lead_duration: TimeDelta,
}

fn serialize_seconds<S: Serializer>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(duration.num_seconds())
}

impl TimeWindow {
    /// A window with no bounds on any axis.
    pub fn unbounded() -> Self {
        Self {
            earliest_reference_time: DateTime::<Utc>::MIN_UTC,
            latest_reference_time: DateTime::<Utc>::MAX_UTC,
            earliest_valid_time: DateTime::<Utc>::MIN_UTC,
            latest_valid_time: DateTime::<Utc>::MAX_UTC,
            earliest_lead_duration: TimeDelta::MIN,
            latest_lead_duration: TimeDelta::MAX,
        }
    }

    /// Smallest window holding every pair: valid times, reference times (valid time less
    /// lead duration) and lead durations. `None` when there are no pairs.
    pub fn spanning<L, R>(pairs: &[TimedPair<L, R>]) -> Option<Self> {
        let (head, tail) = pairs.split_first()?;
        let bounds_of = |pair: &TimedPair<L, R>| {
            let reference_time = pair.valid_time() - pair.lead_duration();
            Self {
                earliest_reference_time: reference_time,
                latest_reference_time: reference_time,
                earliest_valid_time: pair.valid_time(),
                latest_valid_time: pair.valid_time(),
                earliest_lead_duration: pair.lead_duration(),
                latest_lead_duration: pair.lead_duration(),
            }
        };
        Some(tail.iter().fold(bounds_of(head), |acc, p| acc.union(&bounds_of(p))))
    }

    /// Bounds the reference times.
    pub fn with_reference_times(
        mut self,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Result<Self, PoolError> {
        if latest < earliest {
            return Err(PoolError::InvalidTimeWindow {
                reason: format!("latest reference time {latest} precedes earliest {earliest}"),
            });
        }
        self.earliest_reference_time = earliest;
        self.latest_reference_time = latest;
        Ok(self)
    }

    /// Bounds the valid times.
    pub fn with_valid_times(
        mut self,
        earliest: DateTime<Utc>,
        latest: DateTime<Utc>,
    ) -> Result<Self, PoolError> {
        if latest < earliest {
            return Err(PoolError::InvalidTimeWindow {
                reason: format!("latest valid time {latest} precedes earliest {earliest}"),
            });
        }
        self.earliest_valid_time = earliest;
        self.latest_valid_time = latest;
        Ok(self)
    }

    /// Bounds the lead durations.
    pub fn with_lead_durations(
        mut self,
        earliest: TimeDelta,
        latest: TimeDelta,
    ) -> Result<Self, PoolError> {
        if latest < earliest {
            return Err(PoolError::InvalidTimeWindow {
                reason: format!("latest lead duration {latest} precedes earliest {earliest}"),
            });
        }
        self.earliest_lead_duration = earliest;
        self.latest_lead_duration = latest;
        Ok(self)
    }

    /// Narrows both lead bounds to a single duration.
    pub fn at_lead_duration(mut self, lead: TimeDelta) -> Self {
        self.earliest_lead_duration = lead;
        self.latest_lead_duration = lead;
        self
    }

    /// Smallest window spanning both windows on every axis.
    pub fn union(&self, other: &TimeWindow) -> TimeWindow {
        TimeWindow {
            earliest_reference_time: self.earliest_reference_time.min(other.earliest_reference_time),
            latest_reference_time: self.latest_reference_time.max(other.latest_reference_time),
            earliest_valid_time: self.earliest_valid_time.min(other.earliest_valid_time),
            latest_valid_time: self.latest_valid_time.max(other.latest_valid_time),
            earliest_lead_duration: self.earliest_lead_duration.min(other.earliest_lead_duration),
            latest_lead_duration: self.latest_lead_duration.max(other.latest_lead_duration),
        }
    }

    /// Returns `true` if `lead` lies within the lead bounds.
    pub fn contains_lead_duration(&self, lead: TimeDelta) -> bool {
        lead >= self.earliest_lead_duration && lead <= self.latest_lead_duration
    }

    /// Returns `true` if `valid_time` lies within the valid-time bounds.
    pub fn contains_valid_time(&self, valid_time: DateTime<Utc>) -> bool {
        valid_time >= self.earliest_valid_time && valid_time <= self.latest_valid_time
    }

    pub fn earliest_reference_time(&self) -> DateTime<Utc> {
        self.earliest_reference_time
    }

    pub fn latest_reference_time(&self) -> DateTime<Utc> {
        self.latest_reference_time
    }

    pub fn earliest_valid_time(&self) -> DateTime<Utc> {
        self.earliest_valid_time
    }

    pub fn latest_valid_time(&self) -> DateTime<Utc> {
        self.latest_valid_time
    }

    pub fn earliest_lead_duration(&self) -> TimeDelta {
        self.earliest_lead_duration
    }

    pub fn latest_lead_duration(&self) -> TimeDelta {
        self.latest_lead_duration
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::unbounded()
    }
}
