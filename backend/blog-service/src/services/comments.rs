/// Comment service - comment creation and listing
use super::populate::Populator;
use crate::db::CommentStore;
use crate::error::Result;
use crate::models::{Comment, CommentView};
use std::sync::Arc;
use uuid::Uuid;

/// Default size of the "recent comments" listing
pub const DEFAULT_RECENT_LIMIT: usize = 3;

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    populator: Populator,
    recent_limit: usize,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>, populator: Populator) -> Self {
        Self {
            comments,
            populator,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    pub fn recent_limit(&self) -> usize {
        self.recent_limit
    }

    /// Insert an unlinked comment. Linking is the coordinator's job.
    pub async fn create(&self, text: &str, author_id: Uuid) -> Result<Comment> {
        Ok(self.comments.insert(text, author_id).await?)
    }

    /// Newest comments first, at most `max`, authors resolved
    pub async fn list_recent(&self, max: usize) -> Result<Vec<CommentView>> {
        let limit = i64::try_from(max).unwrap_or(i64::MAX);
        let comments = self.comments.find_recent(limit).await?;
        self.populator.comments_with_authors(comments).await
    }

    /// Remove the given comments; unknown ids are ignored
    pub async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        Ok(self.comments.delete_by_ids(ids).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Stores;

    fn service() -> CommentService {
        let stores = Stores::in_memory();
        CommentService::new(
            stores.comments.clone(),
            Populator::new(stores.users, stores.comments),
        )
    }

    #[tokio::test]
    async fn recent_comments_are_newest_first_and_truncated() {
        let service = service();
        let author = Uuid::new_v4();
        for text in ["first", "second", "third", "fourth"] {
            service.create(text, author).await.unwrap();
        }

        let recent = service.list_recent(service.recent_limit()).await.unwrap();
        let texts: Vec<&str> = recent.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["fourth", "third", "second"]);
        assert!(recent.iter().all(|c| c.user.is_none()));
    }

    #[tokio::test]
    async fn unknown_ids_are_ignored_on_delete() {
        let service = service();
        let kept = service.create("kept", Uuid::new_v4()).await.unwrap();
        let gone = service.create("gone", Uuid::new_v4()).await.unwrap();

        let removed = service
            .delete_by_ids(&[gone.id, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert_eq!(service.delete_by_ids(&[]).await.unwrap(), 0);

        let left = service.list_recent(10).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id, kept.id);
    }
}
