//! Evaluate command: pair forecasts with observations and compute statistics.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use chrono::TimeDelta;
use rayon::prelude::*;
use tracing::{error, info, info_span};

use wres_datamodel::slicer::{group_by_lead_duration, unpack};
use wres_datamodel::{
    Admissible, ForecastSeries, Pair, Pool, PoolMetadata, Statistic, TimeSeries, TimeWindow,
    TimedPair, pair_by_exact_time,
};
use wres_metrics::{
    MetricError, MetricFactory, process_ensemble_pool, process_single_valued_pool, to_json,
};

use crate::cli::EvaluateArgs;
use crate::config::WresConfig;
use crate::convert;
use crate::input::{ForecastJson, SeriesInput, read_input};

/// Run the evaluation pipeline.
pub fn run(args: EvaluateArgs) -> Result<()> {
    let _cmd = info_span!("evaluate").entered();
    // 1. Load project TOML
    let toml_str = std::fs::read_to_string(&args.config)
        .with_context(|| format!("failed to read config file: {}", args.config.display()))?;
    let mut config: WresConfig =
        toml::from_str(&toml_str).context("failed to parse TOML config")?;
    if let Some(seed) = args.seed {
        config.metrics.seed = seed;
    }
    let factory = MetricFactory::new(convert::build_metrics_config(&config)?)?;

    // 2. Read time series
    let input_path = args
        .input
        .or_else(|| config.evaluation.input.clone())
        .ok_or_else(|| anyhow!("no input path: set [evaluation].input in config or use --input"))?;
    info!(path = %input_path.display(), "reading time series");
    let input = read_input(&input_path)?;
    info!(
        observed = input.observed.len(),
        forecasts = input.forecasts.len(),
        baseline = input.baseline.len(),
        "time series loaded"
    );

    // 3. Pair, pool by lead duration and compute statistics
    let metadata = PoolMetadata::new(
        config.evaluation.feature.as_str(),
        config.evaluation.variable.as_str(),
        config.evaluation.unit.as_str(),
    );
    let results = if input.is_single_valued() {
        info!("every forecast has one member; evaluating single-valued pairs");
        let pool = pool_from(&input, metadata, ForecastJson::to_single_valued_series)?;
        evaluate_by_lead(&pool, &factory, process_single_valued_pool)
    } else {
        let pool = pool_from(&input, metadata, ForecastJson::to_ensemble_series)?;
        evaluate_by_lead(&pool, &factory, process_ensemble_pool)
    };

    // 4. Write statistics JSON, reporting failed pools after the successful ones
    let total = results.len();
    let mut statistics = Vec::new();
    let mut failed = 0;
    for (lead, result) in results {
        match result {
            Ok(s) => statistics.extend(s),
            Err(e) => {
                error!(lead_hours = lead.num_hours(), error = %e, "pool failed");
                failed += 1;
            }
        }
    }
    let json = to_json(&statistics)?;
    write_output(args.output.or_else(|| config.evaluation.output.clone()), &json)?;

    if failed > 0 {
        bail!("{failed} of {total} pools failed");
    }
    Ok(())
}

/// Pairs every forecast with the observations and collects the pairs into one timed pool,
/// with a baseline when the input has baseline forecasts.
fn pool_from<R>(
    input: &SeriesInput,
    metadata: PoolMetadata,
    to_series: fn(&ForecastJson) -> Result<ForecastSeries<R>>,
) -> Result<Pool<TimedPair<f64, R>>>
where
    R: Clone + Admissible,
{
    let observed = input.observed_series();
    let pair_all = |forecasts: &[ForecastJson]| -> Result<Vec<TimedPair<f64, R>>> {
        let mut pairs = Vec::new();
        for forecast in forecasts {
            let series = to_series(forecast)?;
            pairs.extend(pair_series(&observed, &series, forecast)?);
        }
        Ok(pairs)
    };

    let pairs = pair_all(&input.forecasts)?;
    let main_metadata = bounded(&metadata, &pairs);
    let pool = Pool::new(pairs, main_metadata);
    info!(pairs = pool.len(), "paired forecasts");
    if input.baseline.is_empty() {
        return Ok(pool);
    }
    let baseline = pair_all(&input.baseline)?;
    info!(pairs = baseline.len(), "paired baseline forecasts");
    let baseline_metadata = bounded(&metadata, &baseline);
    Ok(pool.with_baseline(baseline, baseline_metadata))
}

/// `metadata` with its time window narrowed to the times of `pairs`.
fn bounded<R>(metadata: &PoolMetadata, pairs: &[TimedPair<f64, R>]) -> PoolMetadata {
    match TimeWindow::spanning(pairs) {
        Some(window) => metadata.clone().with_time_window(window),
        None => metadata.clone(),
    }
}

fn pair_series<R: Clone + Admissible>(
    observed: &TimeSeries<f64>,
    series: &ForecastSeries<R>,
    forecast: &ForecastJson,
) -> Result<Vec<TimedPair<f64, R>>> {
    pair_by_exact_time(observed, series).with_context(|| {
        format!(
            "failed to pair forecast issued at {}",
            forecast.reference_time
        )
    })
}

/// Computes statistics for each lead duration in parallel. Each pool keeps its own
/// result so one failure does not discard the others.
fn evaluate_by_lead<R, F>(
    pool: &Pool<TimedPair<f64, R>>,
    factory: &MetricFactory,
    process: F,
) -> Vec<(TimeDelta, Result<Vec<Statistic>, MetricError>)>
where
    R: Clone + Send + Sync,
    F: Fn(&Pool<Pair<f64, R>>, &MetricFactory) -> Result<Vec<Statistic>, MetricError> + Sync,
{
    let groups: Vec<(TimeDelta, Pool<TimedPair<f64, R>>)> =
        group_by_lead_duration(pool).into_iter().collect();
    info!(pools = groups.len(), "evaluating pools by lead duration");
    groups
        .par_iter()
        .map(|(lead, timed)| {
            let _pool = info_span!("pool", lead_hours = lead.num_hours()).entered();
            (*lead, process(&unpack(timed), factory))
        })
        .collect()
}

fn write_output(path: Option<PathBuf>, json: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write statistics: {}", path.display()))?;
            info!(path = %path.display(), "statistics written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
