//! Orphan comment reconciler
//!
//! Comment creation and linking are two separate store calls, as are post
//! deletion and comment cleanup. When the second call fails, comments are
//! left that no post references. This job periodically removes them once
//! they are older than a grace period, so that a comment whose link step is
//! still in flight is never touched.

use crate::config::ReconcilerConfig;
use crate::db::CommentStore;
use crate::error::Result;
use crate::metrics::reconciler as metrics;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, MissedTickBehavior};
use tracing::{debug, error, info};

#[derive(Clone)]
pub struct CommentReconciler {
    comments: Arc<dyn CommentStore>,
    interval: Duration,
    grace_period: Duration,
}

impl CommentReconciler {
    pub fn new(comments: Arc<dyn CommentStore>, config: &ReconcilerConfig) -> Self {
        Self {
            comments,
            interval: Duration::from_secs(config.interval_secs.max(1)),
            grace_period: Duration::from_secs(config.grace_period_secs),
        }
    }

    /// Remove unreferenced comments older than the grace period.
    /// Returns the number of comments removed.
    pub async fn run_once(&self) -> Result<u64> {
        let grace = chrono::Duration::from_std(self.grace_period)
            .unwrap_or_else(|_| chrono::Duration::days(1));
        let cutoff = Utc::now() - grace;

        let removed = self.comments.delete_unreferenced(cutoff).await?;
        metrics::record_reclaimed(removed);
        Ok(removed)
    }

    /// Run until `shutdown` fires. Intended to be spawned on the Tokio runtime.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = interval_at(tokio::time::Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            interval_secs = self.interval.as_secs(),
            grace_period_secs = self.grace_period.as_secs(),
            "Comment reconciler started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.recv() => {
                    info!("Comment reconciler stopping");
                    break;
                }
            }

            let cycle_start = Instant::now();
            match self.run_once().await {
                Ok(removed) => {
                    metrics::record_run("success", cycle_start.elapsed());
                    if removed > 0 {
                        info!(removed, "Reclaimed unreferenced comments");
                    } else {
                        debug!("No unreferenced comments to reclaim");
                    }
                }
                Err(e) => {
                    metrics::record_run("error", cycle_start.elapsed());
                    error!(
                        error = %e,
                        duration_ms = cycle_start.elapsed().as_millis(),
                        "Comment reconcile cycle failed"
                    );
                }
            }
        }
    }

    pub fn spawn(self, shutdown: broadcast::Receiver<()>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }
}
