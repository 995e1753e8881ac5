use super::PostStore;
use crate::error::StoreResult;
use crate::models::{Post, PostFields, PostSort};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed post repository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostStore for PgPostRepository {
    async fn find_natural(&self, skip: i64, limit: Option<i64>) -> StoreResult<Vec<Post>> {
        // LIMIT NULL means no limit in PostgreSQL
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, text, tags, image_url, user_id, views_count, comments_count,
                   comment_ids, created_at, updated_at
            FROM posts
            ORDER BY created_at ASC, seq ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn find_page(
        &self,
        owner: Option<Uuid>,
        sort: PostSort,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Post>> {
        let query = format!(
            r#"
            SELECT id, title, text, tags, image_url, user_id, views_count, comments_count,
                   comment_ids, created_at, updated_at
            FROM posts
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY {}
            LIMIT $2 OFFSET $3
            "#,
            sort.order_clause()
        );

        let posts = sqlx::query_as::<_, Post>(&query)
            .bind(owner)
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;

        Ok(posts)
    }

    async fn count(&self, owner: Option<Uuid>) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM posts WHERE ($1::uuid IS NULL OR user_id = $1)",
        )
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn find_by_tag(&self, tag: &str) -> StoreResult<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, title, text, tags, image_url, user_id, views_count, comments_count,
                   comment_ids, created_at, updated_at
            FROM posts
            WHERE tags @> ARRAY[$1]::text[]
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(tag)
        .fetch_all(&self.pool)
        .await?;

        Ok(posts)
    }

    async fn increment_views(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET views_count = views_count + 1
            WHERE id = $1
            RETURNING id, title, text, tags, image_url, user_id, views_count, comments_count,
                      comment_ids, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn insert(&self, fields: &PostFields, user_id: Uuid) -> StoreResult<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, title, text, tags, image_url, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, text, tags, image_url, user_id, views_count, comments_count,
                      comment_ids, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&fields.title)
        .bind(&fields.text)
        .bind(fields.tags.as_slice())
        .bind(fields.image_url.as_deref())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(post)
    }

    async fn replace(
        &self,
        post_id: Uuid,
        fields: &PostFields,
        user_id: Uuid,
    ) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET title = $2, text = $3, tags = $4, image_url = $5, user_id = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, text, tags, image_url, user_id, views_count, comments_count,
                      comment_ids, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(&fields.title)
        .bind(&fields.text)
        .bind(fields.tags.as_slice())
        .bind(fields.image_url.as_deref())
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn delete(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            DELETE FROM posts
            WHERE id = $1
            RETURNING id, title, text, tags, image_url, user_id, views_count, comments_count,
                      comment_ids, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn attach_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> StoreResult<Option<Post>> {
        // Single-row UPDATE: counter and id list move together
        let post = sqlx::query_as::<_, Post>(
            r#"
            UPDATE posts
            SET comments_count = comments_count + 1,
                comment_ids = array_append(comment_ids, $2),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, text, tags, image_url, user_id, views_count, comments_count,
                      comment_ids, created_at, updated_at
            "#,
        )
        .bind(post_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
