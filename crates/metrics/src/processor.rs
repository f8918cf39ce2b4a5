//! Applies the configured metrics to a pool across every configured threshold.

use rayon::prelude::*;
use tracing::{debug, warn};
use wres_datamodel::slicer::{
    filter_ensemble_by_threshold, filter_single_valued_by_threshold, to_dichotomous,
    to_discrete_probability,
};
use wres_datamodel::{EnsemblePair, Pool, SingleValuedPair, Statistic, Threshold};

use crate::error::MetricError;
use crate::factory::MetricFactory;

fn warn_if_empty<T>(pool: &Pool<T>) {
    if pool.is_empty() {
        warn!(
            feature = pool.metadata().feature(),
            window = ?pool.metadata().time_window(),
            "pool has no pairs; statistics will be missing"
        );
    }
}

/// Computes ensemble statistics for `pool`.
///
/// Ensemble metrics are computed once on all data. Each configured threshold converts
/// the pool to discrete probabilities for the probability metrics. Thresholds are
/// processed in parallel; statistics keep the configured threshold order.
///
/// # Errors
///
/// Returns the first [`MetricError`] raised by any metric.
pub fn process_ensemble_pool(
    pool: &Pool<EnsemblePair>,
    factory: &MetricFactory,
) -> Result<Vec<Statistic>, MetricError> {
    warn_if_empty(pool);
    let has_baseline = pool.has_baseline();

    let all_data = filter_ensemble_by_threshold(pool, &Threshold::all_data());
    let mut statistics = factory.ensemble(has_baseline).apply(&all_data)?;

    let probability = factory.discrete_probability(has_baseline)?;
    if !probability.is_empty() {
        let per_threshold = factory
            .config()
            .thresholds()
            .par_iter()
            .map(|threshold| probability.apply(&to_discrete_probability(pool, threshold)))
            .collect::<Result<Vec<_>, _>>()?;
        statistics.extend(per_threshold.into_iter().flatten());
    }

    debug!(
        feature = pool.metadata().feature(),
        pairs = pool.len(),
        statistics = statistics.len(),
        "processed ensemble pool"
    );
    Ok(statistics)
}

/// Computes single-valued statistics for `pool`.
///
/// Pairs with a missing side are dropped. Each configured threshold converts the pool to
/// event occurrences for the dichotomous metrics.
///
/// # Errors
///
/// Returns the first [`MetricError`] raised by any metric.
pub fn process_single_valued_pool(
    pool: &Pool<SingleValuedPair>,
    factory: &MetricFactory,
) -> Result<Vec<Statistic>, MetricError> {
    warn_if_empty(pool);

    let all_data = filter_single_valued_by_threshold(pool, &Threshold::all_data());
    let mut statistics = factory.single_valued().apply(&all_data)?;

    let dichotomous = factory.dichotomous();
    if !dichotomous.is_empty() {
        let per_threshold = factory
            .config()
            .thresholds()
            .par_iter()
            .map(|threshold| dichotomous.apply(&to_dichotomous(&all_data, threshold)))
            .collect::<Result<Vec<_>, _>>()?;
        statistics.extend(per_threshold.into_iter().flatten());
    }

    debug!(
        feature = pool.metadata().feature(),
        pairs = pool.len(),
        statistics = statistics.len(),
        "processed single-valued pool"
    );
    Ok(statistics)
}
