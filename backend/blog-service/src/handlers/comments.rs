/// Comment handlers
use crate::error::Result;
use crate::middleware::UserId;
use crate::services::BlogServices;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(length(min = 1, message = "Comment text must not be empty"))]
    pub text: String,
}

/// Add a comment to a post and return the updated post
pub async fn add_comment(
    services: web::Data<BlogServices>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<CommentRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let post = services
        .coordinator
        .add_comment_to_post(*post_id, &req.text, user_id.0)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn list_recent_comments(services: web::Data<BlogServices>) -> Result<HttpResponse> {
    let limit = services.comments.recent_limit();
    let comments = services.comments.list_recent(limit).await?;
    Ok(HttpResponse::Ok().json(comments))
}
