//! Pure transformations over pools.
//!
//! Every function here returns a new [`Pool`]; the input is never modified. Operations
//! that act on the pairs also act on the baseline, if one is attached.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use wres_stats::is_missing;

use crate::error::PoolError;
use crate::metadata::PoolMetadata;
use crate::pair::{
    DichotomousPair, EnsemblePair, Pair, Probability, ProbabilityPair, SingleValuedPair,
    TimedPair,
};
use crate::pool::Pool;
use crate::threshold::{Threshold, ThresholdOrientation};

/// Builds a new pool (and baseline) from per-pool pairs and metadata mappings.
fn rebuild<T, U>(
    pool: &Pool<T>,
    pairs_of: impl Fn(&Pool<T>) -> Vec<U>,
    metadata_of: impl Fn(&PoolMetadata) -> PoolMetadata,
) -> Pool<U> {
    let main = Pool::new(pairs_of(pool), metadata_of(pool.metadata()));
    match pool.baseline() {
        Some(baseline) => main.with_baseline(pairs_of(baseline), metadata_of(baseline.metadata())),
        None => main,
    }
}

/// Maps every pair through `f`. Metadata is carried over unchanged.
pub fn transform<T, U>(pool: &Pool<T>, f: impl Fn(&T) -> U) -> Pool<U> {
    rebuild(pool, |p| p.iter().map(&f).collect(), PoolMetadata::clone)
}

/// Retains the pairs satisfying `predicate`. The sample size is recomputed.
pub fn filter<T: Clone>(pool: &Pool<T>, predicate: impl Fn(&T) -> bool) -> Pool<T> {
    rebuild(
        pool,
        |p| p.iter().filter(|&pair| predicate(pair)).cloned().collect(),
        PoolMetadata::clone,
    )
}

/// Merges pools describing the same dataset into one pool, preserving pair order.
///
/// The merged time window spans every input window. Either every pool carries a
/// baseline or none does; baselines are merged the same way.
///
/// # Errors
///
/// Returns [`PoolError::NothingToConsolidate`] for an empty slice and
/// [`PoolError::InconsistentPools`] if the pools disagree on feature, variable, unit,
/// reference times, threshold or baseline presence.
pub fn consolidate<T: Clone>(pools: &[Pool<T>]) -> Result<Pool<T>, PoolError> {
    let Some(first) = pools.first() else {
        return Err(PoolError::NothingToConsolidate);
    };

    for (index, pool) in pools.iter().enumerate().skip(1) {
        let (expected, actual) = (first.metadata(), pool.metadata());
        if !expected.same_dataset(actual) {
            return Err(PoolError::InconsistentPools {
                reason: format!(
                    "pool {index} describes '{}/{}' in {} but pool 0 describes '{}/{}' in {}",
                    actual.feature(),
                    actual.variable(),
                    actual.measurement_unit(),
                    expected.feature(),
                    expected.variable(),
                    expected.measurement_unit()
                ),
            });
        }
        let (w0, w) = (expected.time_window(), actual.time_window());
        if w0.earliest_reference_time() != w.earliest_reference_time()
            || w0.latest_reference_time() != w.latest_reference_time()
        {
            return Err(PoolError::InconsistentPools {
                reason: format!(
                    "pool {index} has reference times {}..{} but pool 0 has {}..{}",
                    w.earliest_reference_time(),
                    w.latest_reference_time(),
                    w0.earliest_reference_time(),
                    w0.latest_reference_time()
                ),
            });
        }
        if expected.threshold() != actual.threshold() {
            return Err(PoolError::InconsistentPools {
                reason: format!(
                    "pool {index} has threshold '{}' but pool 0 has '{}'",
                    actual.threshold(),
                    expected.threshold()
                ),
            });
        }
        if first.has_baseline() != pool.has_baseline() {
            return Err(PoolError::InconsistentPools {
                reason: format!("pool {index} disagrees with pool 0 on the presence of a baseline"),
            });
        }
    }

    let pairs: Vec<T> = pools.iter().flat_map(|p| p.iter().cloned()).collect();
    let metadata = merged_metadata(first.metadata(), pools[1..].iter().map(Pool::metadata));
    let merged = Pool::new(pairs, metadata);

    let baselines: Vec<&Pool<T>> = pools.iter().filter_map(Pool::baseline).collect();
    let Some((head, tail)) = baselines.split_first() else {
        return Ok(merged);
    };
    let pairs = baselines.iter().flat_map(|p| p.iter().cloned()).collect();
    let metadata = merged_metadata(head.metadata(), tail.iter().map(|p| p.metadata()));
    Ok(merged.with_baseline(pairs, metadata))
}

/// `first` with a time window spanning every window in `rest`.
fn merged_metadata<'a>(
    first: &PoolMetadata,
    rest: impl Iterator<Item = &'a PoolMetadata>,
) -> PoolMetadata {
    let window = rest.fold(*first.time_window(), |acc, m| acc.union(m.time_window()));
    first.clone().with_time_window(window)
}

/// Partitions a pool of timed pairs by lead duration, in ascending order of lead.
///
/// Each partition's time window is narrowed to its lead duration. A baseline is
/// partitioned the same way; a lead with no baseline pairs gets an empty baseline.
pub fn group_by_lead_duration<L: Clone, R: Clone>(
    pool: &Pool<TimedPair<L, R>>,
) -> BTreeMap<TimeDelta, Pool<TimedPair<L, R>>> {
    fn by_lead<L: Clone, R: Clone>(
        pool: &Pool<TimedPair<L, R>>,
    ) -> BTreeMap<TimeDelta, Vec<TimedPair<L, R>>> {
        let mut groups: BTreeMap<TimeDelta, Vec<TimedPair<L, R>>> = BTreeMap::new();
        for pair in pool {
            groups.entry(pair.lead_duration()).or_default().push(pair.clone());
        }
        groups
    }

    let at_lead = |metadata: &PoolMetadata, lead: TimeDelta| {
        let window = metadata.time_window().at_lead_duration(lead);
        metadata.clone().with_time_window(window)
    };

    let mut baseline_groups = pool.baseline().map(by_lead);

    by_lead(pool)
        .into_iter()
        .map(|(lead, pairs)| {
            let main = Pool::new(pairs, at_lead(pool.metadata(), lead));
            let grouped = match (pool.baseline(), baseline_groups.as_mut()) {
                (Some(baseline), Some(groups)) => main.with_baseline(
                    groups.remove(&lead).unwrap_or_default(),
                    at_lead(baseline.metadata(), lead),
                ),
                _ => main,
            };
            (lead, grouped)
        })
        .collect()
}

/// Strips the valid time and lead duration from every pair.
pub fn unpack<L: Clone, R: Clone>(pool: &Pool<TimedPair<L, R>>) -> Pool<Pair<L, R>> {
    transform(pool, |timed| timed.pair().clone())
}

/// Predicate applying `threshold` to the side(s) of a single-valued pair named by its
/// orientation.
pub fn single_valued_predicate(threshold: &Threshold) -> impl Fn(&SingleValuedPair) -> bool + '_ {
    move |pair| match threshold.orientation() {
        ThresholdOrientation::Left => threshold.test(*pair.left()),
        ThresholdOrientation::Right => threshold.test(*pair.right()),
        ThresholdOrientation::LeftAndRight | ThresholdOrientation::LeftAndAnyRight => {
            threshold.test(*pair.left()) && threshold.test(*pair.right())
        }
    }
}

/// Predicate applying `threshold` to the side(s) of an ensemble pair named by its
/// orientation. Missing members are ignored.
pub fn ensemble_predicate(threshold: &Threshold) -> impl Fn(&EnsemblePair) -> bool + '_ {
    move |pair| {
        let mut members = pair.right().members().iter().filter(|&&m| !is_missing(m));
        match threshold.orientation() {
            ThresholdOrientation::Left => threshold.test(*pair.left()),
            ThresholdOrientation::Right => members.all(|&m| threshold.test(m)),
            ThresholdOrientation::LeftAndRight => {
                threshold.test(*pair.left()) && members.all(|&m| threshold.test(m))
            }
            ThresholdOrientation::LeftAndAnyRight => {
                threshold.test(*pair.left()) && members.any(|&m| threshold.test(m))
            }
        }
    }
}

/// Retains the single-valued pairs meeting `threshold` and tags the pool with it.
pub fn filter_single_valued_by_threshold(
    pool: &Pool<SingleValuedPair>,
    threshold: &Threshold,
) -> Pool<SingleValuedPair> {
    let predicate = single_valued_predicate(threshold);
    rebuild(
        pool,
        |p| p.iter().filter(|&pair| predicate(pair)).copied().collect(),
        |m| m.clone().with_threshold(threshold.clone()),
    )
}

/// Retains the ensemble pairs meeting `threshold` and tags the pool with it.
pub fn filter_ensemble_by_threshold(
    pool: &Pool<EnsemblePair>,
    threshold: &Threshold,
) -> Pool<EnsemblePair> {
    let predicate = ensemble_predicate(threshold);
    rebuild(
        pool,
        |p| p.iter().filter(|&pair| predicate(pair)).cloned().collect(),
        |m| m.clone().with_threshold(threshold.clone()),
    )
}

/// Converts single-valued pairs to event occurrences: each side occurs when it meets
/// `threshold`.
pub fn to_dichotomous(pool: &Pool<SingleValuedPair>, threshold: &Threshold) -> Pool<DichotomousPair> {
    rebuild(
        pool,
        |p| {
            p.iter()
                .map(|pair| Pair::new(threshold.test(*pair.left()), threshold.test(*pair.right())))
                .collect()
        },
        |m| m.clone().with_threshold(threshold.clone()),
    )
}

/// Converts probability pairs to event occurrences by classifying both sides with a
/// probability threshold.
pub fn classify_probabilities(
    pool: &Pool<ProbabilityPair>,
    threshold: &Threshold,
) -> Pool<DichotomousPair> {
    rebuild(
        pool,
        |p| {
            p.iter()
                .map(|pair| {
                    Pair::new(
                        threshold.test(pair.left().value()),
                        threshold.test(pair.right().value()),
                    )
                })
                .collect()
        },
        |m| m.clone().with_threshold(threshold.clone()),
    )
}

/// Converts ensemble pairs to probabilities of meeting `threshold`.
///
/// The observed probability is 0 or 1. The forecast probability is the fraction of
/// finite members meeting the threshold; pairs without a finite member or with a
/// non-finite observation are dropped.
pub fn to_discrete_probability(
    pool: &Pool<EnsemblePair>,
    threshold: &Threshold,
) -> Pool<ProbabilityPair> {
    let convert = |pair: &EnsemblePair| -> Option<ProbabilityPair> {
        if is_missing(*pair.left()) {
            return None;
        }
        let finite: Vec<f64> = pair
            .right()
            .members()
            .iter()
            .copied()
            .filter(|&m| !is_missing(m))
            .collect();
        if finite.is_empty() {
            return None;
        }
        let meeting = finite.iter().filter(|&&m| threshold.test(m)).count();
        let forecast = Probability::new(meeting as f64 / finite.len() as f64).ok()?;
        Some(Pair::new(
            Probability::of_occurrence(threshold.test(*pair.left())),
            forecast,
        ))
    };
    rebuild(
        pool,
        |p| p.iter().filter_map(&convert).collect(),
        |m| m.clone().with_threshold(threshold.clone()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DatasetOrientation;
    use crate::pair::Ensemble;
    use crate::threshold::ThresholdOperator;
    use crate::time_window::TimeWindow;
    use approx::assert_relative_eq;
    use chrono::{DateTime, TimeZone, Utc};

    fn meta() -> PoolMetadata {
        PoolMetadata::new("DRRC2", "streamflow", "CMS")
    }

    fn t(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap() + TimeDelta::hours(hour)
    }

    fn gt(value: f64, orientation: ThresholdOrientation) -> Threshold {
        Threshold::value(value, ThresholdOperator::Greater, orientation).unwrap()
    }

    #[test]
    fn test_transform_applies_to_baseline() {
        let pool = Pool::new(vec![Pair::new(1.0, 2.0)], meta())
            .with_baseline(vec![Pair::new(3.0, 4.0)], meta());
        let doubled = transform(&pool, |p| Pair::new(p.left() * 2.0, p.right() * 2.0));
        assert_eq!(doubled.pairs(), &[Pair::new(2.0, 4.0)]);
        assert_eq!(doubled.baseline().unwrap().pairs(), &[Pair::new(6.0, 8.0)]);
        assert_eq!(doubled.metadata(), pool.metadata());
    }

    #[test]
    fn test_filter_recomputes_sample_size() {
        let pool = Pool::new(
            vec![Pair::new(1.0, 1.0), Pair::new(5.0, 5.0), Pair::new(9.0, 9.0)],
            meta(),
        );
        let filtered = filter(&pool, |p| *p.left() > 2.0);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.metadata().sample_size(), 2);
        assert_eq!(pool.metadata().sample_size(), 3);
    }

    #[test]
    fn test_consolidate_merges_in_order() {
        let w1 = TimeWindow::unbounded().at_lead_duration(TimeDelta::hours(1));
        let w2 = TimeWindow::unbounded().at_lead_duration(TimeDelta::hours(2));
        let a = Pool::new(vec![Pair::new(1.0, 1.0)], meta().with_time_window(w1));
        let b = Pool::new(
            vec![Pair::new(2.0, 2.0), Pair::new(3.0, 3.0)],
            meta().with_time_window(w2),
        );
        let merged = consolidate(&[a, b]).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(*merged.pairs()[0].left(), 1.0);
        assert_eq!(merged.metadata().sample_size(), 3);
        let window = merged.metadata().time_window();
        assert_eq!(window.earliest_lead_duration(), TimeDelta::hours(1));
        assert_eq!(window.latest_lead_duration(), TimeDelta::hours(2));
    }

    #[test]
    fn test_consolidate_rejects_mixed_features() {
        let a = Pool::new(vec![Pair::new(1.0, 1.0)], meta());
        let b = Pool::new(vec![Pair::new(1.0, 1.0)], PoolMetadata::new("OTHER", "streamflow", "CMS"));
        assert!(matches!(
            consolidate(&[a, b]),
            Err(PoolError::InconsistentPools { .. })
        ));
    }

    #[test]
    fn test_consolidate_rejects_mixed_reference_times() {
        let issued_at = |time: DateTime<Utc>| {
            let window = TimeWindow::unbounded().with_reference_times(time, time).unwrap();
            meta().with_time_window(window)
        };
        let a = Pool::new(vec![Pair::new(1.0, 1.0)], issued_at(t(0)));
        let b = Pool::new(vec![Pair::new(2.0, 2.0)], issued_at(t(24 * 517)));
        let err = consolidate(&[a, b]).unwrap_err();
        assert!(matches!(
            err,
            PoolError::InconsistentPools { ref reason } if reason.contains("reference times")
        ));

        let c = Pool::new(vec![Pair::new(3.0, 3.0)], issued_at(t(0)));
        let d = Pool::new(vec![Pair::new(4.0, 4.0)], issued_at(t(0)));
        assert_eq!(consolidate(&[c, d]).unwrap().len(), 2);
    }

    #[test]
    fn test_consolidate_rejects_partial_baselines() {
        let a = Pool::new(vec![Pair::new(1.0, 1.0)], meta())
            .with_baseline(vec![Pair::new(1.0, 1.0)], meta());
        let b = Pool::new(vec![Pair::new(1.0, 1.0)], meta());
        assert!(consolidate(&[a, b]).is_err());
    }

    #[test]
    fn test_consolidate_empty_fails() {
        let pools: Vec<Pool<SingleValuedPair>> = vec![];
        assert_eq!(consolidate(&pools), Err(PoolError::NothingToConsolidate));
    }

    #[test]
    fn test_group_by_lead_partitions_and_narrows_window() {
        let pairs = vec![
            TimedPair::new(t(6), TimeDelta::hours(6), Pair::new(1.0, 1.5)),
            TimedPair::new(t(3), TimeDelta::hours(3), Pair::new(2.0, 2.5)),
            TimedPair::new(t(12), TimeDelta::hours(6), Pair::new(3.0, 3.5)),
        ];
        let pool = Pool::new(pairs, meta())
            .with_baseline(vec![TimedPair::new(t(3), TimeDelta::hours(3), Pair::new(2.0, 2.0))], meta());
        let groups = group_by_lead_duration(&pool);

        let leads: Vec<TimeDelta> = groups.keys().copied().collect();
        assert_eq!(leads, vec![TimeDelta::hours(3), TimeDelta::hours(6)]);

        let six = &groups[&TimeDelta::hours(6)];
        assert_eq!(six.len(), 2);
        assert_eq!(six.metadata().time_window().earliest_lead_duration(), TimeDelta::hours(6));
        assert!(six.baseline().unwrap().is_empty());

        let three = &groups[&TimeDelta::hours(3)];
        assert_eq!(three.baseline().unwrap().len(), 1);
        assert_eq!(
            three.baseline().unwrap().metadata().orientation(),
            DatasetOrientation::Baseline
        );
    }

    #[test]
    fn test_unpack_drops_times() {
        let pool = Pool::new(
            vec![TimedPair::new(t(1), TimeDelta::hours(1), Pair::new(1.0, 2.0))],
            meta(),
        );
        assert_eq!(unpack(&pool).pairs(), &[Pair::new(1.0, 2.0)]);
    }

    #[test]
    fn test_single_valued_orientations() {
        let pair = Pair::new(5.0, 1.0);
        assert!(single_valued_predicate(&gt(2.0, ThresholdOrientation::Left))(&pair));
        assert!(!single_valued_predicate(&gt(2.0, ThresholdOrientation::Right))(&pair));
        assert!(!single_valued_predicate(&gt(2.0, ThresholdOrientation::LeftAndRight))(&pair));
    }

    #[test]
    fn test_ensemble_orientations() {
        let pair = Pair::new(5.0, Ensemble::new(vec![1.0, 3.0, f64::NAN]).unwrap());
        assert!(ensemble_predicate(&gt(2.0, ThresholdOrientation::Left))(&pair));
        assert!(!ensemble_predicate(&gt(2.0, ThresholdOrientation::Right))(&pair));
        assert!(!ensemble_predicate(&gt(2.0, ThresholdOrientation::LeftAndRight))(&pair));
        assert!(ensemble_predicate(&gt(2.0, ThresholdOrientation::LeftAndAnyRight))(&pair));
        assert!(ensemble_predicate(&gt(0.5, ThresholdOrientation::Right))(&pair));
    }

    #[test]
    fn test_filter_by_threshold_tags_metadata() {
        let pool = Pool::new(vec![Pair::new(1.0, 1.0), Pair::new(3.0, 3.0)], meta());
        let threshold = gt(2.0, ThresholdOrientation::Left);
        let filtered = filter_single_valued_by_threshold(&pool, &threshold);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.metadata().threshold(), &threshold);
    }

    #[test]
    fn test_dichotomous_conversion() {
        let pool = Pool::new(
            vec![Pair::new(3.0, 1.0), Pair::new(1.0, 3.0), Pair::new(3.0, 3.0)],
            meta(),
        );
        let converted = to_dichotomous(&pool, &gt(2.0, ThresholdOrientation::LeftAndRight));
        assert_eq!(
            converted.pairs(),
            &[Pair::new(true, false), Pair::new(false, true), Pair::new(true, true)]
        );
    }

    #[test]
    fn test_discrete_probability_conversion() {
        let pool = Pool::new(
            vec![
                Pair::new(3.0, Ensemble::new(vec![1.0, 2.5, 3.0, f64::NAN]).unwrap()),
                Pair::new(1.0, Ensemble::new(vec![f64::NAN]).unwrap()),
            ],
            meta(),
        );
        let converted = to_discrete_probability(&pool, &gt(2.0, ThresholdOrientation::LeftAndRight));
        assert_eq!(converted.len(), 1);
        assert!(converted.pairs()[0].left().is_one());
        assert_relative_eq!(converted.pairs()[0].right().value(), 2.0 / 3.0);
    }

    #[test]
    fn test_classify_probabilities_uses_threshold() {
        let pool = Pool::new(
            vec![
                Pair::new(Probability::ONE, Probability::new(0.7).unwrap()),
                Pair::new(Probability::ZERO, Probability::new(0.2).unwrap()),
            ],
            meta(),
        );
        let threshold =
            Threshold::probability(0.5, ThresholdOperator::Greater, ThresholdOrientation::LeftAndRight)
                .unwrap();
        let classified = classify_probabilities(&pool, &threshold);
        assert_eq!(
            classified.pairs(),
            &[Pair::new(true, true), Pair::new(false, false)]
        );
    }
}
