use super::CommentStore;
use crate::error::StoreResult;
use crate::models::Comment;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL-backed comment repository
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentStore for PgCommentRepository {
    async fn insert(&self, text: &str, user_id: Uuid) -> StoreResult<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (id, text, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, text, user_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    async fn find_recent(&self, limit: i64) -> StoreResult<Vec<Comment>> {
        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, text, user_id, created_at, updated_at
            FROM comments
            ORDER BY created_at DESC, seq DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let comments = sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, text, user_id, created_at, updated_at
            FROM comments
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> StoreResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM comments WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_unreferenced(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM comments c
            WHERE c.created_at < $1
              AND NOT EXISTS (
                  SELECT 1 FROM posts p WHERE p.comment_ids @> ARRAY[c.id]
              )
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
