//! Immutable, metadata-tagged collections of pairs.

use crate::metadata::{DatasetOrientation, PoolMetadata};

/// An ordered collection of pairs with metadata and an optional baseline.
///
/// Pools are never mutated after construction; every slicing operation builds a new
/// pool. A pool is `Send + Sync` whenever its pairs are, so one pool can feed many
/// metrics concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct Pool<T> {
    pairs: Vec<T>,
    metadata: PoolMetadata,
    baseline: Option<Box<Pool<T>>>,
}

impl<T> Pool<T> {
    /// Creates a pool without a baseline. The sample size in `metadata` is set from
    /// `pairs`.
    pub fn new(pairs: Vec<T>, metadata: PoolMetadata) -> Self {
        let metadata = metadata.with_sample_size(pairs.len());
        Self {
            pairs,
            metadata,
            baseline: None,
        }
    }

    /// Attaches baseline pairs. The baseline metadata is re-oriented to
    /// [`DatasetOrientation::Baseline`] and its sample size set from `pairs`.
    pub fn with_baseline(mut self, pairs: Vec<T>, metadata: PoolMetadata) -> Self {
        let metadata = metadata.with_orientation(DatasetOrientation::Baseline);
        self.baseline = Some(Box::new(Pool::new(pairs, metadata)));
        self
    }

    /// Returns the pairs in order.
    pub fn pairs(&self) -> &[T] {
        &self.pairs
    }

    /// Returns an iterator over the pairs.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.pairs.iter()
    }

    /// Returns the pool metadata.
    pub fn metadata(&self) -> &PoolMetadata {
        &self.metadata
    }

    /// Returns the baseline pool, if any.
    pub fn baseline(&self) -> Option<&Pool<T>> {
        self.baseline.as_deref()
    }

    /// Returns `true` when a baseline is attached.
    pub fn has_baseline(&self) -> bool {
        self.baseline.is_some()
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` when the pool holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
