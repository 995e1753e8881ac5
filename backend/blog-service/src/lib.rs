/// Blog Service Library
///
/// Posts, comments, and authors for a blog, with the per-post comment
/// counter and id list kept consistent with the comment collection.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers and route registration
/// - `models`: Stored documents and response views
/// - `services`: Business logic and the post/comment coordinator
/// - `db`: Store seams, PostgreSQL repositories, in-memory backend
/// - `jobs`: Orphan comment reconciler
/// - `middleware`: Bearer token authentication
/// - `error`: Error types and handling
/// - `config`: Configuration management
/// - `metrics`: Prometheus collectors
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
