/// Post handlers - HTTP endpoints for post operations
use crate::error::Result;
use crate::middleware::UserId;
use crate::models::{PostFields, PostSort, TagSampling};
use crate::services::BlogServices;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

const DEFAULT_PAGE_LIMIT: i64 = 10;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 10, message = "Text must be at least 10 characters"))]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

impl From<PostRequest> for PostFields {
    fn from(req: PostRequest) -> Self {
        Self {
            title: req.title,
            text: req.text,
            tags: req.tags,
            image_url: req.image_url,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default)]
    pub sort: PostSort,
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[serde(default = "default_page")]
    pub page: i64,
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// Paging for the caller's own posts, always newest first
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OwnPageQuery {
    #[validate(range(min = 1, message = "page must be at least 1"))]
    #[serde(default = "default_page")]
    pub page: i64,
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    DEFAULT_PAGE_LIMIT
}

#[derive(Debug, Deserialize)]
pub struct TagQuery {
    #[serde(default)]
    pub mode: TagSampling,
}

/// All posts in creation order
pub async fn list_posts(services: web::Data<BlogServices>) -> Result<HttpResponse> {
    let posts = services.posts.list_all().await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// One sorted page plus the total number of posts
pub async fn list_posts_page(
    services: web::Data<BlogServices>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    query.validate()?;
    let page = services
        .posts
        .list_paged(query.sort, query.page, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn list_my_posts(
    services: web::Data<BlogServices>,
    user_id: UserId,
    query: web::Query<OwnPageQuery>,
) -> Result<HttpResponse> {
    query.validate()?;
    let page = services
        .posts
        .list_by_owner(user_id.0, query.page, query.limit)
        .await?;
    Ok(HttpResponse::Ok().json(page))
}

pub async fn list_posts_by_tag(
    services: web::Data<BlogServices>,
    tag: web::Path<String>,
) -> Result<HttpResponse> {
    let posts = services.posts.list_by_tag(&tag).await?;
    Ok(HttpResponse::Ok().json(posts))
}

pub async fn sample_tags(
    services: web::Data<BlogServices>,
    query: web::Query<TagQuery>,
) -> Result<HttpResponse> {
    let tags = services.posts.sample_tags(query.mode).await?;
    Ok(HttpResponse::Ok().json(tags))
}

/// Get a post by ID (counts as a view)
pub async fn get_post(
    services: web::Data<BlogServices>,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = services.posts.get_by_id(*post_id).await?;
    Ok(HttpResponse::Ok().json(post))
}

pub async fn create_post(
    services: web::Data<BlogServices>,
    user_id: UserId,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let fields = PostFields::from(req.into_inner());
    let post = services.posts.create(&fields, user_id.0).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Replace a post's fields; the caller becomes its owner
pub async fn update_post(
    services: web::Data<BlogServices>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
    req: web::Json<PostRequest>,
) -> Result<HttpResponse> {
    req.validate()?;
    let fields = PostFields::from(req.into_inner());
    let post = services.posts.update(*post_id, &fields, user_id.0).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post together with its comments
pub async fn delete_post(
    services: web::Data<BlogServices>,
    user_id: UserId,
    post_id: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let post = services.coordinator.remove_post_cascade(*post_id).await?;
    tracing::info!(post_id = %post.id, user_id = %user_id.0, "Post removed");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "message": format!("Post {} deleted", post.id),
    })))
}
