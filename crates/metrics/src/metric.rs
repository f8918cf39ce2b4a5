//! The metric capabilities shared by every score and diagram.

use wres_datamodel::{MetricName, Pool, ScoreStatistic, Statistic};

use crate::error::MetricError;

/// A function from a pool to a statistic.
///
/// Implementations hold only construction-time configuration, so one instance can be
/// applied to many pools from many threads.
pub trait Metric<T>: Send + Sync {
    /// The statistic produced.
    type Output: Into<Statistic>;

    /// Identity of the metric.
    fn name(&self) -> MetricName;

    /// Computes the statistic for `pool`.
    fn apply(&self, pool: &Pool<T>) -> Result<Self::Output, MetricError>;
}

/// A metric that can finish from an intermediate statistic shared with other metrics.
///
/// A [`crate::MetricCollection`] calls [`Collectable::compute_intermediate`] once per
/// group and hands the result to every member's [`Collectable::finish_from`].
pub trait Collectable<T>: Metric<T> {
    /// Identity of the metric whose output is the intermediate.
    fn collection_of(&self) -> MetricName;

    /// Computes the intermediate statistic from the pool.
    fn compute_intermediate(&self, pool: &Pool<T>) -> Result<ScoreStatistic, MetricError>;

    /// Computes the metric from a precomputed intermediate.
    fn finish_from(
        &self,
        intermediate: &ScoreStatistic,
        pool: &Pool<T>,
    ) -> Result<Self::Output, MetricError>;
}

/// Object-safe view of a [`Metric`] with its output erased to [`Statistic`].
pub(crate) trait AnyMetric<T>: Send + Sync {
    fn name(&self) -> MetricName;
    fn apply_any(&self, pool: &Pool<T>) -> Result<Statistic, MetricError>;
}

impl<T, M: Metric<T>> AnyMetric<T> for M {
    fn name(&self) -> MetricName {
        <M as Metric<T>>::name(self)
    }

    fn apply_any(&self, pool: &Pool<T>) -> Result<Statistic, MetricError> {
        self.apply(pool).map(Into::into)
    }
}

/// Object-safe view of a [`Collectable`].
pub(crate) trait AnyCollectable<T>: AnyMetric<T> {
    fn collection_of(&self) -> MetricName;
    fn compute_intermediate(&self, pool: &Pool<T>) -> Result<ScoreStatistic, MetricError>;
    fn finish_any(
        &self,
        intermediate: &ScoreStatistic,
        pool: &Pool<T>,
    ) -> Result<Statistic, MetricError>;
}

impl<T, C: Collectable<T>> AnyCollectable<T> for C {
    fn collection_of(&self) -> MetricName {
        <C as Collectable<T>>::collection_of(self)
    }

    fn compute_intermediate(&self, pool: &Pool<T>) -> Result<ScoreStatistic, MetricError> {
        <C as Collectable<T>>::compute_intermediate(self, pool)
    }

    fn finish_any(
        &self,
        intermediate: &ScoreStatistic,
        pool: &Pool<T>,
    ) -> Result<Statistic, MetricError> {
        self.finish_from(intermediate, pool).map(Into::into)
    }
}
