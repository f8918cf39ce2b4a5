//! WRES data model: pairs, pools, thresholds and statistics.
//!
//! Observed and forecast series are paired by [`pair_by_exact_time`], collected into an
//! immutable [`Pool`], and partitioned with the functions in [`slicer`] before metrics
//! turn them into [`Statistic`]s.

mod error;
mod metadata;
mod pair;
mod pairer;
mod pool;
pub mod slicer;
mod statistic;
mod threshold;
mod time_series;
mod time_window;

pub use error::PoolError;
pub use metadata::{DatasetOrientation, PoolMetadata};
pub use pair::{
    Admissible, DichotomousPair, Ensemble, EnsemblePair, Pair, Probability, ProbabilityPair,
    SingleValuedPair, TimedPair,
};
pub use pairer::pair_by_exact_time;
pub use pool::Pool;
pub use statistic::{
    ComponentName, DiagramComponent, DiagramStatistic, MetricGroup, MetricName, ScoreComponent,
    ScoreStatistic, Statistic, UnknownMetric,
};
pub use threshold::{Threshold, ThresholdKind, ThresholdOperator, ThresholdOrientation};
pub use time_series::{Event, ForecastEvent, ForecastSeries, TimeSeries};
pub use time_window::TimeWindow;
