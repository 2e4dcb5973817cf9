//! Trace-level counters for the estimation pipelines. Nothing exports them;
//! a subscriber filtering on `estimator.metrics` can aggregate them.

use crate::pipeline::EstimateSource;
use tracing::trace;

/// One finished estimate, labelled by where its value came from.
pub fn estimate_served(pipeline: &'static str, source: EstimateSource) {
    trace!(
        target = "estimator.metrics",
        pipeline = pipeline,
        source = source.label(),
        "estimates_served_total_inc"
    );
}

/// Wall time of a single model round trip, successful or not.
pub fn model_round_trip(elapsed_ms: u128) {
    trace!(
        target = "estimator.metrics",
        elapsed_ms = u64::try_from(elapsed_ms).unwrap_or(u64::MAX),
        "model_round_trip_ms"
    );
}

pub fn images_loaded(requested: usize, loaded: usize, elapsed_ms: u128) {
    trace!(
        target = "estimator.metrics",
        requested = requested,
        loaded = loaded,
        skipped = requested.saturating_sub(loaded),
        elapsed_ms = u64::try_from(elapsed_ms).unwrap_or(u64::MAX),
        "images_loaded"
    );
}
