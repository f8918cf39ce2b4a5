//! Thresholds that turn continuous pairs into event occurrences.

use std::fmt;

use serde::Serialize;

use wres_stats::doubles_equal;

use crate::error::PoolError;

/// Comparison applied between a value and the threshold bound(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdOperator {
    Greater,
    Less,
    GreaterEqual,
    LessEqual,
    /// Equal to within 1e-8.
    Equal,
    /// `lower <= x < upper`.
    Between,
}

impl fmt::Display for ThresholdOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ThresholdOperator::Greater => ">",
            ThresholdOperator::Less => "<",
            ThresholdOperator::GreaterEqual => ">=",
            ThresholdOperator::LessEqual => "<=",
            ThresholdOperator::Equal => "=",
            ThresholdOperator::Between => ">= & <",
        };
        write!(f, "{symbol}")
    }
}

/// Side(s) of a pair a threshold applies to when filtering.
///
/// For ensemble forecasts, `Right` and `LeftAndRight` require every finite member to meet
/// the condition and `LeftAndAnyRight` requires at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdOrientation {
    Left,
    Right,
    LeftAndRight,
    LeftAndAnyRight,
}

/// Whether the bound(s) are real values or probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThresholdKind {
    Value,
    Probability,
}

/// A value or probability boundary plus an operator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Threshold {
    kind: ThresholdKind,
    lower: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    upper: Option<f64>,
    operator: ThresholdOperator,
    orientation: ThresholdOrientation,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

impl Threshold {
    /// Creates a single-bound value threshold.
    pub fn value(
        value: f64,
        operator: ThresholdOperator,
        orientation: ThresholdOrientation,
    ) -> Result<Self, PoolError> {
        Self::single(ThresholdKind::Value, value, operator, orientation)
    }

    /// Creates a single-bound probability threshold.
    pub fn probability(
        probability: f64,
        operator: ThresholdOperator,
        orientation: ThresholdOrientation,
    ) -> Result<Self, PoolError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(PoolError::InvalidThreshold {
                reason: format!("probability {probability} is outside [0, 1]"),
            });
        }
        Self::single(ThresholdKind::Probability, probability, operator, orientation)
    }

    /// Creates a `lower <= x < upper` value threshold.
    pub fn between(
        lower: f64,
        upper: f64,
        orientation: ThresholdOrientation,
    ) -> Result<Self, PoolError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(PoolError::InvalidThreshold {
                reason: format!("between bounds must be finite, got [{lower}, {upper})"),
            });
        }
        if upper <= lower {
            return Err(PoolError::InvalidThreshold {
                reason: format!("upper bound {upper} must exceed lower bound {lower}"),
            });
        }
        Ok(Self {
            kind: ThresholdKind::Value,
            lower,
            upper: Some(upper),
            operator: ThresholdOperator::Between,
            orientation,
            units: None,
            name: None,
        })
    }

    /// The sentinel meaning "no thresholding": `> -inf` on both sides.
    pub fn all_data() -> Self {
        Self {
            kind: ThresholdKind::Value,
            lower: f64::NEG_INFINITY,
            upper: None,
            operator: ThresholdOperator::Greater,
            orientation: ThresholdOrientation::LeftAndRight,
            units: None,
            name: None,
        }
    }

    fn single(
        kind: ThresholdKind,
        value: f64,
        operator: ThresholdOperator,
        orientation: ThresholdOrientation,
    ) -> Result<Self, PoolError> {
        if operator == ThresholdOperator::Between {
            return Err(PoolError::InvalidThreshold {
                reason: "a between condition requires two bounds".to_string(),
            });
        }
        if !value.is_finite() {
            return Err(PoolError::InvalidThreshold {
                reason: format!("threshold value must be finite, got {value}"),
            });
        }
        Ok(Self {
            kind,
            lower: value,
            upper: None,
            operator,
            orientation,
            units: None,
            name: None,
        })
    }

    /// Attaches measurement units.
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Attaches a display name (e.g. "flood stage").
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns `true` if this is the all-data sentinel.
    pub fn is_all_data(&self) -> bool {
        self.lower == f64::NEG_INFINITY
            && self.operator == ThresholdOperator::Greater
            && self.upper.is_none()
    }

    /// Tests a value against the condition.
    pub fn test(&self, value: f64) -> bool {
        match self.operator {
            ThresholdOperator::Greater => value > self.lower,
            ThresholdOperator::Less => value < self.lower,
            ThresholdOperator::GreaterEqual => value >= self.lower,
            ThresholdOperator::LessEqual => value <= self.lower,
            ThresholdOperator::Equal => doubles_equal(value, self.lower),
            ThresholdOperator::Between => {
                value >= self.lower && self.upper.is_some_and(|upper| value < upper)
            }
        }
    }

    pub fn kind(&self) -> ThresholdKind {
        self.kind
    }

    pub fn lower(&self) -> f64 {
        self.lower
    }

    pub fn upper(&self) -> Option<f64> {
        self.upper
    }

    pub fn operator(&self) -> ThresholdOperator {
        self.operator
    }

    pub fn orientation(&self) -> ThresholdOrientation {
        self.orientation
    }

    pub fn units(&self) -> Option<&str> {
        self.units.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all_data() {
            return write!(f, "All data");
        }
        let prefix = match self.kind {
            ThresholdKind::Value => "",
            ThresholdKind::Probability => "Pr ",
        };
        match self.upper {
            Some(upper) => write!(f, "{prefix}>= {} & < {upper}", self.lower)?,
            None => write!(f, "{prefix}{} {}", self.operator, self.lower)?,
        }
        if let Some(units) = &self.units {
            write!(f, " {units}")?;
        }
        Ok(())
    }
}
