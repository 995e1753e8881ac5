//! Prometheus metrics for post/comment consistency
//!
//! Tracks link outcomes, orphaned comments, and cascade deletes

use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

/// Comments attached to a post, by outcome (linked/post_missing/store_error)
static COMMENT_LINKS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "blog_comment_links_total",
        "Comment link attempts by outcome",
        &["outcome"]
    )
    .expect("failed to register blog_comment_links_total")
});

/// Comments inserted but left without a post
static ORPHANED_COMMENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_orphaned_comments_total",
        "Comments created whose post could not be linked"
    )
    .expect("failed to register blog_orphaned_comments_total")
});

static CASCADE_DELETED_COMMENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_cascade_deleted_comments_total",
        "Comments removed together with their post"
    )
    .expect("failed to register blog_cascade_deleted_comments_total")
});

static CASCADE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "blog_cascade_failures_total",
        "Post deletions whose comment cleanup failed"
    )
    .expect("failed to register blog_cascade_failures_total")
});

static POST_VIEWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("blog_post_views_total", "Post detail reads")
        .expect("failed to register blog_post_views_total")
});

pub fn record_comment_link(outcome: &str) {
    COMMENT_LINKS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_orphaned_comment() {
    ORPHANED_COMMENTS_TOTAL.inc();
}

pub fn record_cascade_deleted(count: u64) {
    CASCADE_DELETED_COMMENTS_TOTAL.inc_by(count);
}

pub fn record_cascade_failure() {
    CASCADE_FAILURES_TOTAL.inc();
}

pub fn record_post_view() {
    POST_VIEWS_TOTAL.inc();
}
