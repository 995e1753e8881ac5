//! In-memory store backend
//!
//! Keeps posts in insertion order (their natural order) and applies every
//! single-document mutation under one write lock, which gives the same
//! atomic read-modify-write guarantee as a single-row `UPDATE ... RETURNING`.

use super::{CommentStore, PostStore, UserStore};
use crate::error::{StoreError, StoreResult};
use crate::models::{Comment, NewUser, Post, PostFields, PostSort, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    users: HashMap<Uuid, User>,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn check_window(skip: i64, limit: Option<i64>) -> StoreResult<()> {
    if skip < 0 {
        return Err(StoreError::InvalidQuery(format!(
            "offset must not be negative (got {skip})"
        )));
    }
    if let Some(limit) = limit {
        if limit < 0 {
            return Err(StoreError::InvalidQuery(format!(
                "limit must not be negative (got {limit})"
            )));
        }
    }
    Ok(())
}

fn window<T>(items: impl Iterator<Item = T>, skip: i64, limit: Option<i64>) -> Vec<T> {
    let items = items.skip(skip as usize);
    match limit {
        Some(limit) => items.take(limit as usize).collect(),
        None => items.collect(),
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn find_natural(&self, skip: i64, limit: Option<i64>) -> StoreResult<Vec<Post>> {
        check_window(skip, limit)?;
        let tables = self.tables.read().await;
        Ok(window(tables.posts.iter().cloned(), skip, limit))
    }

    async fn find_page(
        &self,
        owner: Option<Uuid>,
        sort: PostSort,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Post>> {
        check_window(skip, Some(limit))?;
        let tables = self.tables.read().await;

        // Reverse insertion order plus a stable sort: ties resolve like `seq DESC`
        let mut posts: Vec<Post> = tables
            .posts
            .iter()
            .rev()
            .filter(|post| owner.map_or(true, |owner| post.user_id == owner))
            .cloned()
            .collect();

        match sort {
            PostSort::Newest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            PostSort::Popular => posts.sort_by(|a, b| {
                b.views_count
                    .cmp(&a.views_count)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }

        Ok(window(posts.into_iter(), skip, Some(limit)))
    }

    async fn count(&self, owner: Option<Uuid>) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .posts
            .iter()
            .filter(|post| owner.map_or(true, |owner| post.user_id == owner))
            .count();
        Ok(count as i64)
    }

    async fn find_by_tag(&self, tag: &str) -> StoreResult<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .iter()
            .filter(|post| post.tags.iter().any(|t| t == tag))
            .cloned()
            .collect())
    }

    async fn increment_views(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .map(|post| {
                post.views_count += 1;
                post.clone()
            }))
    }

    async fn insert(&self, fields: &PostFields, user_id: Uuid) -> StoreResult<Post> {
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            title: fields.title.clone(),
            text: fields.text.clone(),
            tags: fields.tags.clone(),
            image_url: fields.image_url.clone(),
            user_id,
            views_count: 0,
            comments_count: 0,
            comment_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.tables.write().await.posts.push(post.clone());
        Ok(post)
    }

    async fn replace(
        &self,
        post_id: Uuid,
        fields: &PostFields,
        user_id: Uuid,
    ) -> StoreResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .map(|post| {
                post.title = fields.title.clone();
                post.text = fields.text.clone();
                post.tags = fields.tags.clone();
                post.image_url = fields.image_url.clone();
                post.user_id = user_id;
                post.updated_at = Utc::now();
                post.clone()
            }))
    }

    async fn delete(&self, post_id: Uuid) -> StoreResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        let position = tables.posts.iter().position(|post| post.id == post_id);
        Ok(position.map(|index| tables.posts.remove(index)))
    }

    async fn attach_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> StoreResult<Option<Post>> {
        let mut tables = self.tables.write().await;
        Ok(tables
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .map(|post| {
                post.comments_count += 1;
                post.comment_ids.push(comment_id);
                post.updated_at = Utc::now();
                post.clone()
            }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[async_trait]
impl CommentStore for InMemoryStore {
    async fn insert(&self, text: &str, user_id: Uuid) -> StoreResult<Comment> {
        let now = Utc::now();
        let comment = Comment {
            id: Uuid::new_v4(),
            text: text.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
        };

        self.tables.write().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn find_recent(&self, limit: i64) -> StoreResult<Vec<Comment>> {
        check_window(0, Some(limit))?;
        let tables = self.tables.read().await;

        let mut comments: Vec<Comment> = tables.comments.iter().rev().cloned().collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        comments.truncate(limit as usize);
        Ok(comments)
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Comment>> {
        let wanted: HashSet<&Uuid> = ids.iter().collect();
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .iter()
            .filter(|comment| wanted.contains(&comment.id))
            .cloned()
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> StoreResult<u64> {
        let doomed: HashSet<&Uuid> = ids.iter().collect();
        let mut tables = self.tables.write().await;
        let before = tables.comments.len();
        tables.comments.retain(|comment| !doomed.contains(&comment.id));
        Ok((before - tables.comments.len()) as u64)
    }

    async fn delete_unreferenced(&self, cutoff: DateTime<Utc>) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let referenced: HashSet<Uuid> = tables
            .posts
            .iter()
            .flat_map(|post| post.comment_ids.iter().copied())
            .collect();

        let before = tables.comments.len();
        tables
            .comments
            .retain(|comment| comment.created_at >= cutoff || referenced.contains(&comment.id));
        Ok((before - tables.comments.len()) as u64)
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert(&self, user: &NewUser) -> StoreResult<User> {
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            created_at: now,
            updated_at: now,
        };

        self.tables
            .write()
            .await
            .users
            .insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }
}
