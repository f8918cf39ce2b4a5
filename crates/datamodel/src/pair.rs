//! Paired samples and the value types they hold.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::PoolError;

/// One aligned (observed, predicted) sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pair<L, R> {
    left: L,
    right: R,
}

impl<L, R> Pair<L, R> {
    /// Creates a pair from an observed (`left`) and a predicted (`right`) value.
    pub fn new(left: L, right: R) -> Self {
        Self { left, right }
    }

    /// Returns the observed value.
    pub fn left(&self) -> &L {
        &self.left
    }

    /// Returns the predicted value.
    pub fn right(&self) -> &R {
        &self.right
    }

    /// Consumes the pair, returning `(left, right)`.
    pub fn into_parts(self) -> (L, R) {
        (self.left, self.right)
    }
}

/// Occurrence of a dichotomous event on each side.
pub type DichotomousPair = Pair<bool, bool>;

/// Observed and forecast probability of an event.
pub type ProbabilityPair = Pair<Probability, Probability>;

/// Observation against an ensemble forecast.
pub type EnsemblePair = Pair<f64, Ensemble>;

/// Observation against a single-valued forecast.
pub type SingleValuedPair = Pair<f64, f64>;

/// A probability in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Probability(f64);

impl Probability {
    /// Probability zero: the event did not occur.
    pub const ZERO: Probability = Probability(0.0);
    /// Probability one: the event occurred.
    pub const ONE: Probability = Probability(1.0);

    /// Creates a probability, rejecting values outside [0, 1].
    pub fn new(value: f64) -> Result<Self, PoolError> {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(PoolError::InvalidProbability { value });
        }
        Ok(Self(value))
    }

    /// Returns `ONE` when `occurred`, `ZERO` otherwise.
    pub fn of_occurrence(occurred: bool) -> Self {
        if occurred { Self::ONE } else { Self::ZERO }
    }

    /// Returns the raw probability.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Returns `true` for a certain event.
    pub fn is_one(self) -> bool {
        self.0 == 1.0
    }
}

/// Ensemble member predictions for one event, in member order.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble {
    members: Vec<f64>,
}

impl Ensemble {
    /// Creates an ensemble. An empty member list is rejected.
    ///
    /// Members may be non-finite; such members are treated as missing by the metrics.
    pub fn new(members: Vec<f64>) -> Result<Self, PoolError> {
        if members.is_empty() {
            return Err(PoolError::EmptyEnsemble);
        }
        Ok(Self { members })
    }

    /// Returns the members in their original order.
    pub fn members(&self) -> &[f64] {
        &self.members
    }

    /// Returns the number of members, including missing ones.
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Returns the finite members sorted ascending.
    pub fn sorted_finite_members(&self) -> Vec<f64> {
        wres_stats::sorted_finite(&self.members)
    }
}

/// A pair tagged with the valid time and lead duration of its forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedPair<L, R> {
    valid_time: DateTime<Utc>,
    lead_duration: TimeDelta,
    pair: Pair<L, R>,
}

impl<L, R> TimedPair<L, R> {
    /// Creates a timed pair.
    pub fn new(valid_time: DateTime<Utc>, lead_duration: TimeDelta, pair: Pair<L, R>) -> Self {
        Self {
            valid_time,
            lead_duration,
            pair,
        }
    }

    /// Valid time shared by the observation and the forecast.
    pub fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }

    /// Lead duration of the forecast.
    pub fn lead_duration(&self) -> TimeDelta {
        self.lead_duration
    }

    /// The underlying pair.
    pub fn pair(&self) -> &Pair<L, R> {
        &self.pair
    }
}

/// Whether a value carries usable data for pairing.
pub trait Admissible {
    /// Returns `true` when the value can participate in a pair.
    fn is_admissible(&self) -> bool;
}

impl Admissible for f64 {
    fn is_admissible(&self) -> bool {
        self.is_finite()
    }
}

impl Admissible for Ensemble {
    fn is_admissible(&self) -> bool {
        self.members.iter().any(|m| m.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_accessors() {
        let pair = Pair::new(1.0, 2.0);
        assert_eq!(*pair.left(), 1.0);
        assert_eq!(*pair.right(), 2.0);
        assert_eq!(pair.into_parts(), (1.0, 2.0));
    }

    #[test]
    fn test_probability_bounds() {
        assert!(Probability::new(0.0).is_ok());
        assert!(Probability::new(1.0).is_ok());
        assert!(matches!(
            Probability::new(1.01),
            Err(PoolError::InvalidProbability { .. })
        ));
        assert!(Probability::new(-0.1).is_err());
        assert!(Probability::new(f64::NAN).is_err());
    }

    #[test]
    fn test_probability_of_occurrence() {
        assert!(Probability::of_occurrence(true).is_one());
        assert!(!Probability::of_occurrence(false).is_one());
    }

    #[test]
    fn test_empty_ensemble_rejected() {
        assert_eq!(Ensemble::new(vec![]), Err(PoolError::EmptyEnsemble));
    }

    #[test]
    fn test_ensemble_sorted_finite_members() {
        let ensemble = Ensemble::new(vec![3.0, f64::NAN, 1.0, 2.0]).unwrap();
        assert_eq!(ensemble.size(), 4);
        assert_eq!(ensemble.sorted_finite_members(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_admissibility() {
        assert!(1.0_f64.is_admissible());
        assert!(!f64::NAN.is_admissible());
        assert!(Ensemble::new(vec![f64::NAN, 1.0]).unwrap().is_admissible());
        assert!(!Ensemble::new(vec![f64::NAN]).unwrap().is_admissible());
    }
}
