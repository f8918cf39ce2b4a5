//! Verification metrics for WRES pools.
//!
//! Every metric implements [`Metric`]. Scores derived from a contingency table also
//! implement [`Collectable`], so a [`MetricCollection`] computes the table once and
//! finishes each score from it.
//!
//! # Example
//!
//! ```
//! use wres_datamodel::{Ensemble, Pair, Pool, PoolMetadata};
//! use wres_metrics::{MetricFactory, MetricsConfig, process_ensemble_pool};
//!
//! let pool = Pool::new(
//!     vec![
//!         Pair::new(2.0, Ensemble::new(vec![1.0, 2.0, 3.0]).unwrap()),
//!         Pair::new(4.5, Ensemble::new(vec![3.0, 4.0, 6.0]).unwrap()),
//!     ],
//!     PoolMetadata::new("DRRC2", "streamflow", "CMS"),
//! );
//! let factory = MetricFactory::new(MetricsConfig::default()).unwrap();
//! let statistics = process_ensemble_pool(&pool, &factory).unwrap();
//! assert!(!statistics.is_empty());
//! ```

pub mod brier;
pub mod config;
pub mod crps;
pub mod dichotomous;
pub mod error;
pub mod rank_histogram;
pub mod reliability;
pub mod roc;

pub(crate) mod collection;
pub(crate) mod factory;
pub(crate) mod metric;
pub(crate) mod output;
pub(crate) mod processor;
pub(crate) mod sample_size;

pub use brier::{BrierScore, BrierSkillScore};
pub use collection::MetricCollection;
pub use config::MetricsConfig;
pub use crps::{ContinuousRankedProbabilityScore, ContinuousRankedProbabilitySkillScore, crps_of};
pub use dichotomous::{Cells, ContingencyTable, DichotomousScore};
pub use error::MetricError;
pub use factory::MetricFactory;
pub use metric::{Collectable, Metric};
pub use output::to_json;
pub use processor::{process_ensemble_pool, process_single_valued_pool};
pub use rank_histogram::RankHistogram;
pub use reliability::ReliabilityDiagram;
pub use roc::{RocDiagram, RocScore, area_under_curve};
pub use sample_size::SampleSize;
