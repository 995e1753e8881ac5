//! Prometheus metrics for the orphan comment reconciler

use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Histogram, IntCounter,
    IntCounterVec,
};
use std::time::Duration;

/// Total number of reconcile cycles run (success/error)
static RECONCILER_RUNS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "comment_reconciler_runs_total",
        "Total number of orphan comment reconcile cycles (success/error)",
        &["status"]
    )
    .expect("failed to register comment_reconciler_runs_total")
});

static RECONCILER_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "comment_reconciler_duration_seconds",
        "Duration of orphan comment reconcile cycles",
        vec![0.001, 0.01, 0.1, 0.5, 1.0, 5.0, 10.0, 30.0]
    )
    .expect("failed to register comment_reconciler_duration_seconds")
});

static RECLAIMED_COMMENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "comment_reconciler_reclaimed_total",
        "Unreferenced comments removed by the reconciler"
    )
    .expect("failed to register comment_reconciler_reclaimed_total")
});

pub fn record_run(status: &str, duration: Duration) {
    RECONCILER_RUNS_TOTAL.with_label_values(&[status]).inc();
    RECONCILER_DURATION_SECONDS.observe(duration.as_secs_f64());
}

pub fn record_reclaimed(count: u64) {
    RECLAIMED_COMMENTS_TOTAL.inc_by(count);
}
