/// HTTP handlers for blog endpoints
///
/// This module contains handlers for:
/// - Posts: listing, paging, tags, read, create, update, delete
/// - Comments: add to a post, recent listing
/// - Auth: current user
/// - Health: store reachability and liveness
pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;

use crate::error::AppError;
use crate::middleware::JwtAuthMiddleware;
use actix_web::web;

/// Extractor failures render through `AppError` so every error body is JSON.
/// The only typed path segment is a post id, hence `NotFound` for path errors.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        tracing::debug!(error = %err, "Rejected path parameter");
        AppError::post_not_found().into()
    })
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

/// Register every `/api/v1` route.
///
/// Health routes sit outside the authenticated scope so a stale token never
/// turns them into a 401. Static `/posts/...` segments are registered before
/// `/posts/{id}` so they are not captured as ids.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/health", web::get().to(health::health_summary))
        .route("/api/v1/health/live", web::get().to(health::liveness_check))
        .service(
            web::scope("/api/v1")
                .wrap(JwtAuthMiddleware)
                .app_data(path_config())
                .app_data(json_config())
                .app_data(query_config())
                .route("/auth/me", web::get().to(auth::me))
                .route("/comments/recent", web::get().to(comments::list_recent_comments))
                .route("/tags/{tag}/posts", web::get().to(posts::list_posts_by_tag))
                .service(
                    web::scope("/posts")
                        .service(
                            web::resource("")
                                .route(web::get().to(posts::list_posts))
                                .route(web::post().to(posts::create_post)),
                        )
                        .route("/page", web::get().to(posts::list_posts_page))
                        .route("/mine", web::get().to(posts::list_my_posts))
                        .route("/tags", web::get().to(posts::sample_tags))
                        .service(
                            web::resource("/{id}")
                                .route(web::get().to(posts::get_post))
                                .route(web::patch().to(posts::update_post))
                                .route(web::delete().to(posts::delete_post)),
                        )
                        .route("/{id}/comments", web::post().to(comments::add_comment)),
                ),
        );
}
