//! Named statistics produced by metrics.
//!
//! A statistic is a metric identity, a set of named components (scalar scores or
//! diagram vectors) and the metadata of the pool it was computed from.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::metadata::PoolMetadata;

/// The kind of pairs a metric consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricGroup {
    /// Pairs of event occurrences.
    Dichotomous,
    /// Pairs of event probabilities.
    DiscreteProbability,
    /// Observations against ensemble forecasts.
    Ensemble,
    /// Observations against single-valued forecasts.
    SingleValued,
}

macro_rules! metric_names {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Identity of a verification metric.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum MetricName {
            $($variant,)+
        }

        impl MetricName {
            /// Every metric, in declaration order.
            pub const ALL: &'static [MetricName] = &[$(MetricName::$variant,)+];

            /// The lower snake-case name used in configuration.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(MetricName::$variant => $name,)+
                }
            }
        }
    };
}

metric_names! {
    ContingencyTable => "contingency_table",
    ThreatScore => "threat_score",
    EquitableThreatScore => "equitable_threat_score",
    FalseAlarmRatio => "false_alarm_ratio",
    FrequencyBias => "frequency_bias",
    ProbabilityOfDetection => "probability_of_detection",
    ProbabilityOfFalseDetection => "probability_of_false_detection",
    PeirceSkillScore => "peirce_skill_score",
    BrierScore => "brier_score",
    BrierSkillScore => "brier_skill_score",
    RelativeOperatingCharacteristicScore => "relative_operating_characteristic_score",
    RelativeOperatingCharacteristicDiagram => "relative_operating_characteristic_diagram",
    ReliabilityDiagram => "reliability_diagram",
    ContinuousRankedProbabilityScore => "continuous_ranked_probability_score",
    ContinuousRankedProbabilitySkillScore => "continuous_ranked_probability_skill_score",
    RankHistogram => "rank_histogram",
    SampleSize => "sample_size",
}

impl MetricName {
    /// Pair groups the metric accepts.
    pub fn input_groups(self) -> &'static [MetricGroup] {
        use MetricGroup::*;
        match self {
            MetricName::ContingencyTable
            | MetricName::ThreatScore
            | MetricName::EquitableThreatScore
            | MetricName::FalseAlarmRatio
            | MetricName::FrequencyBias
            | MetricName::ProbabilityOfDetection
            | MetricName::ProbabilityOfFalseDetection
            | MetricName::PeirceSkillScore => &[Dichotomous],
            MetricName::BrierScore
            | MetricName::BrierSkillScore
            | MetricName::RelativeOperatingCharacteristicScore
            | MetricName::RelativeOperatingCharacteristicDiagram
            | MetricName::ReliabilityDiagram => &[DiscreteProbability],
            MetricName::ContinuousRankedProbabilityScore
            | MetricName::ContinuousRankedProbabilitySkillScore
            | MetricName::RankHistogram => &[Ensemble],
            MetricName::SampleSize => &[Dichotomous, DiscreteProbability, Ensemble, SingleValued],
        }
    }

    /// Returns `true` if the metric accepts pairs of `group`.
    pub fn accepts(self, group: MetricGroup) -> bool {
        self.input_groups().contains(&group)
    }

    /// Returns `true` for scores derived from a contingency table.
    pub fn is_derived_from_contingency_table(self) -> bool {
        matches!(
            self,
            MetricName::ThreatScore
                | MetricName::EquitableThreatScore
                | MetricName::FalseAlarmRatio
                | MetricName::FrequencyBias
                | MetricName::ProbabilityOfDetection
                | MetricName::ProbabilityOfFalseDetection
                | MetricName::PeirceSkillScore
        )
    }

    /// Returns `true` if the metric fails without a baseline.
    pub fn requires_baseline(self) -> bool {
        matches!(self, MetricName::ContinuousRankedProbabilitySkillScore)
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Error returned when parsing an unknown metric name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric '{0}'")]
pub struct UnknownMetric(pub String);

impl FromStr for MetricName {
    type Err = UnknownMetric;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        MetricName::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| UnknownMetric(s.to_string()))
    }
}

/// Identity of one component of a statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComponentName {
    Main,
    TruePositives,
    FalsePositives,
    FalseNegatives,
    TrueNegatives,
    ProbabilityOfDetection,
    ProbabilityOfFalseDetection,
    ForecastProbability,
    ObservedRelativeFrequency,
    SampleSize,
    RankOrder,
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentName::Main => "MAIN",
            ComponentName::TruePositives => "TRUE_POSITIVES",
            ComponentName::FalsePositives => "FALSE_POSITIVES",
            ComponentName::FalseNegatives => "FALSE_NEGATIVES",
            ComponentName::TrueNegatives => "TRUE_NEGATIVES",
            ComponentName::ProbabilityOfDetection => "PROBABILITY_OF_DETECTION",
            ComponentName::ProbabilityOfFalseDetection => "PROBABILITY_OF_FALSE_DETECTION",
            ComponentName::ForecastProbability => "FORECAST_PROBABILITY",
            ComponentName::ObservedRelativeFrequency => "OBSERVED_RELATIVE_FREQUENCY",
            ComponentName::SampleSize => "SAMPLE_SIZE",
            ComponentName::RankOrder => "RANK_ORDER",
        };
        f.write_str(name)
    }
}

/// One scalar component of a score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreComponent {
    name: ComponentName,
    value: f64,
    units: String,
    minimum: f64,
    maximum: f64,
    optimum: f64,
}

impl ScoreComponent {
    /// Creates a dimensionless, unbounded component.
    pub fn new(name: ComponentName, value: f64) -> Self {
        Self {
            name,
            value,
            units: String::new(),
            minimum: f64::NEG_INFINITY,
            maximum: f64::INFINITY,
            optimum: f64::NAN,
        }
    }

    /// Sets the range and optimum of the component.
    pub fn with_bounds(mut self, minimum: f64, maximum: f64, optimum: f64) -> Self {
        self.minimum = minimum;
        self.maximum = maximum;
        self.optimum = optimum;
        self
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn name(&self) -> ComponentName {
        self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    pub fn optimum(&self) -> f64 {
        self.optimum
    }
}

/// A score: one or more scalar components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStatistic {
    metric: MetricName,
    components: Vec<ScoreComponent>,
    metadata: PoolMetadata,
}

impl ScoreStatistic {
    pub fn new(metric: MetricName, metadata: PoolMetadata) -> Self {
        Self {
            metric,
            components: Vec::new(),
            metadata,
        }
    }

    /// Appends a component.
    pub fn with_component(mut self, component: ScoreComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn metric(&self) -> MetricName {
        self.metric
    }

    pub fn components(&self) -> &[ScoreComponent] {
        &self.components
    }

    pub fn metadata(&self) -> &PoolMetadata {
        &self.metadata
    }

    /// Looks up a component by name.
    pub fn component(&self, name: ComponentName) -> Option<&ScoreComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Value of the named component.
    pub fn value(&self, name: ComponentName) -> Option<f64> {
        self.component(name).map(ScoreComponent::value)
    }

    /// Value of the `MAIN` component.
    pub fn main(&self) -> Option<f64> {
        self.value(ComponentName::Main)
    }

    /// The set of component names present.
    pub fn component_names(&self) -> BTreeSet<ComponentName> {
        self.components.iter().map(|c| c.name).collect()
    }
}

/// One vector-valued component of a diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramComponent {
    name: ComponentName,
    values: Vec<f64>,
    units: String,
}

impl DiagramComponent {
    pub fn new(name: ComponentName, values: Vec<f64>) -> Self {
        Self {
            name,
            values,
            units: String::new(),
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn name(&self) -> ComponentName {
        self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn units(&self) -> &str {
        &self.units
    }
}

/// A diagram: several equal-length vectors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagramStatistic {
    metric: MetricName,
    components: Vec<DiagramComponent>,
    metadata: PoolMetadata,
}

impl DiagramStatistic {
    pub fn new(metric: MetricName, metadata: PoolMetadata) -> Self {
        Self {
            metric,
            components: Vec::new(),
            metadata,
        }
    }

    pub fn with_component(mut self, component: DiagramComponent) -> Self {
        self.components.push(component);
        self
    }

    pub fn metric(&self) -> MetricName {
        self.metric
    }

    pub fn components(&self) -> &[DiagramComponent] {
        &self.components
    }

    pub fn metadata(&self) -> &PoolMetadata {
        &self.metadata
    }

    pub fn component(&self, name: ComponentName) -> Option<&DiagramComponent> {
        self.components.iter().find(|c| c.name == name)
    }

    /// Values of the named component.
    pub fn values(&self, name: ComponentName) -> Option<&[f64]> {
        self.component(name).map(DiagramComponent::values)
    }
}

/// Output of any metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Statistic {
    Score(ScoreStatistic),
    Diagram(DiagramStatistic),
}

impl Statistic {
    pub fn metric(&self) -> MetricName {
        match self {
            Statistic::Score(s) => s.metric(),
            Statistic::Diagram(d) => d.metric(),
        }
    }

    pub fn metadata(&self) -> &PoolMetadata {
        match self {
            Statistic::Score(s) => s.metadata(),
            Statistic::Diagram(d) => d.metadata(),
        }
    }

    pub fn as_score(&self) -> Option<&ScoreStatistic> {
        match self {
            Statistic::Score(s) => Some(s),
            Statistic::Diagram(_) => None,
        }
    }

    pub fn as_diagram(&self) -> Option<&DiagramStatistic> {
        match self {
            Statistic::Diagram(d) => Some(d),
            Statistic::Score(_) => None,
        }
    }
}

impl From<ScoreStatistic> for Statistic {
    fn from(score: ScoreStatistic) -> Self {
        Statistic::Score(score)
    }
}

impl From<DiagramStatistic> for Statistic {
    fn from(diagram: DiagramStatistic) -> Self {
        Statistic::Diagram(diagram)
    }
}
