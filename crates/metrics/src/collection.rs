//! A set of metrics applied together to one pool.

use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;
use tracing::debug;
use wres_datamodel::{MetricName, Pool, Statistic};

use crate::error::MetricError;
use crate::metric::{AnyCollectable, AnyMetric, Collectable, Metric};

/// Metrics applied together to a pool.
///
/// Collectable metrics are grouped by the metric whose output they finish from; that
/// intermediate is computed once per group and pool. When the intermediate metric is
/// itself part of the collection, its output is the shared intermediate and it is not
/// computed a second time. The remaining metrics are evaluated in parallel.
///
/// # Example
///
/// ```
/// use wres_datamodel::{Pair, Pool, PoolMetadata};
/// use wres_metrics::{ContingencyTable, DichotomousScore, MetricCollection};
///
/// let collection = MetricCollection::new()
///     .with_metric(ContingencyTable)
///     .with_collectable(DichotomousScore::ThreatScore);
///
/// let pool = Pool::new(
///     vec![Pair::new(true, true), Pair::new(false, true)],
///     PoolMetadata::new("DRRC2", "streamflow", "CMS"),
/// );
/// let statistics = collection.apply(&pool).unwrap();
/// assert_eq!(statistics.len(), 2);
/// ```
pub struct MetricCollection<T> {
    metrics: Vec<Box<dyn AnyMetric<T>>>,
    collectables: BTreeMap<MetricName, Vec<Box<dyn AnyCollectable<T>>>>,
}

impl<T> MetricCollection<T> {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self {
            metrics: Vec::new(),
            collectables: BTreeMap::new(),
        }
    }

    /// Adds a metric computed directly from the pool.
    pub fn with_metric<M: Metric<T> + 'static>(mut self, metric: M) -> Self {
        self.metrics.push(Box::new(metric));
        self
    }

    /// Adds a metric that finishes from a shared intermediate.
    pub fn with_collectable<C: Collectable<T> + 'static>(mut self, metric: C) -> Self {
        let boxed: Box<dyn AnyCollectable<T>> = Box::new(metric);
        self.collectables
            .entry(boxed.collection_of())
            .or_default()
            .push(boxed);
        self
    }

    /// Names of every metric in the collection, in catalogue order.
    pub fn names(&self) -> Vec<MetricName> {
        let mut names: Vec<MetricName> = self
            .metrics
            .iter()
            .map(|m| m.name())
            .chain(self.collectables.values().flatten().map(|m| m.name()))
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.metrics.len() + self.collectables.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_shared_intermediate(&self, name: MetricName) -> bool {
        self.collectables.contains_key(&name)
    }
}

impl<T: Sync> MetricCollection<T> {
    /// Applies every metric to `pool` and returns the statistics in catalogue order.
    ///
    /// # Errors
    ///
    /// Returns the first [`MetricError`] raised by any metric.
    pub fn apply(&self, pool: &Pool<T>) -> Result<Vec<Statistic>, MetricError> {
        let mut statistics = Vec::with_capacity(self.len());

        for (collection_of, members) in &self.collectables {
            let Some(first) = members.first() else {
                continue;
            };
            let intermediate = first.compute_intermediate(pool)?;
            debug!(
                intermediate = %collection_of,
                dependents = members.len(),
                pairs = pool.len(),
                "computed shared intermediate"
            );
            let finished = members
                .par_iter()
                .map(|m| m.finish_any(&intermediate, pool))
                .collect::<Result<Vec<_>, _>>()?;
            if self.metrics.iter().any(|m| m.name() == *collection_of) {
                statistics.push(intermediate.into());
            }
            statistics.extend(finished);
        }

        let independent = self
            .metrics
            .par_iter()
            .filter(|m| !self.is_shared_intermediate(m.name()))
            .map(|m| m.apply_any(pool))
            .collect::<Result<Vec<_>, _>>()?;
        statistics.extend(independent);

        statistics.sort_by_key(Statistic::metric);
        Ok(statistics)
    }
}

impl<T> Default for MetricCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for MetricCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricCollection")
            .field("metrics", &self.names())
            .finish()
    }
}
