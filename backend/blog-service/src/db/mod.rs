/// Database access layer
///
/// This module provides:
/// - Store seams (`PostStore`, `CommentStore`, `UserStore`) shaped after
///   document-store primitives: find, find-and-update, find-and-delete,
///   insert, delete-many, count
/// - PostgreSQL repositories over a shared connection pool
/// - An in-memory backend with the same atomicity guarantees
/// - Pool creation and migrations
pub mod comment_repo;
pub mod memory;
pub mod pool;
pub mod post_repo;
pub mod user_repo;

pub use comment_repo::PgCommentRepository;
pub use memory::InMemoryStore;
pub use pool::{create_pool, run_migrations, DbConfig};
pub use post_repo::PgPostRepository;
pub use user_repo::PgUserRepository;

use crate::error::StoreResult;
use crate::models::{Comment, NewUser, Post, PostFields, PostSort, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts in natural (creation) order, skipping `skip`, at most `limit`
    async fn find_natural(&self, skip: i64, limit: Option<i64>) -> StoreResult<Vec<Post>>;

    /// One sorted page, optionally restricted to one owner
    async fn find_page(
        &self,
        owner: Option<Uuid>,
        sort: PostSort,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Post>>;

    async fn count(&self, owner: Option<Uuid>) -> StoreResult<i64>;

    /// Posts whose tag list contains `tag` exactly
    async fn find_by_tag(&self, tag: &str) -> StoreResult<Vec<Post>>;

    /// Atomically bump `views_count`, returning the updated post
    async fn increment_views(&self, post_id: Uuid) -> StoreResult<Option<Post>>;

    async fn insert(&self, fields: &PostFields, user_id: Uuid) -> StoreResult<Post>;

    /// Replace the editable fields and the owner, returning the updated post
    async fn replace(
        &self,
        post_id: Uuid,
        fields: &PostFields,
        user_id: Uuid,
    ) -> StoreResult<Option<Post>>;

    /// Remove the post, returning the removed document
    async fn delete(&self, post_id: Uuid) -> StoreResult<Option<Post>>;

    /// Atomically increment `comments_count` and append `comment_id`
    async fn attach_comment(&self, post_id: Uuid, comment_id: Uuid)
        -> StoreResult<Option<Post>>;

    async fn ping(&self) -> StoreResult<()>;
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    async fn insert(&self, text: &str, user_id: Uuid) -> StoreResult<Comment>;

    /// Newest first, at most `limit`
    async fn find_recent(&self, limit: i64) -> StoreResult<Vec<Comment>>;

    /// Comments for the given ids; unknown ids are skipped, order is unspecified
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Comment>>;

    /// Remove the comments with the given ids, returning how many existed
    async fn delete_by_ids(&self, ids: &[Uuid]) -> StoreResult<u64>;

    /// Remove comments created before `cutoff` that no post references
    async fn delete_unreferenced(&self, cutoff: DateTime<Utc>) -> StoreResult<u64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn insert(&self, user: &NewUser) -> StoreResult<User>;

    async fn find_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>>;

    /// Users for the given ids; unknown ids are skipped
    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>>;
}

/// The three store seams, shared across all requests
#[derive(Clone)]
pub struct Stores {
    pub posts: Arc<dyn PostStore>,
    pub comments: Arc<dyn CommentStore>,
    pub users: Arc<dyn UserStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            posts: Arc::new(PgPostRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool)),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_memory(Arc::new(InMemoryStore::new()))
    }

    pub fn from_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            comments: store.clone(),
            users: store,
        }
    }
}
