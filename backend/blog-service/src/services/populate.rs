/// Reference resolution: replaces stored user and comment ids with the
/// referenced documents. Dangling ids are tolerated, never an error.
use crate::db::{CommentStore, UserStore};
use crate::error::Result;
use crate::models::{Comment, CommentView, Post, PostComments, PostView, User};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct Populator {
    users: Arc<dyn UserStore>,
    comments: Arc<dyn CommentStore>,
}

impl Populator {
    pub fn new(users: Arc<dyn UserStore>, comments: Arc<dyn CommentStore>) -> Self {
        Self { users, comments }
    }

    /// Resolve the author of every post; comments stay as ids
    pub async fn posts_with_authors(&self, posts: Vec<Post>) -> Result<Vec<PostView>> {
        let authors = self.users_by_id(posts.iter().map(|p| p.user_id)).await?;

        Ok(posts
            .into_iter()
            .map(|post| {
                let user = authors.get(&post.user_id).cloned();
                let ids = post.comment_ids.clone();
                PostView::new(post, user, PostComments::Ids(ids))
            })
            .collect())
    }

    /// Resolve the author, every comment, and every comment author of a post
    pub async fn post_detail(&self, post: Post) -> Result<PostView> {
        let comments = self.comments.find_by_ids(&post.comment_ids).await?;
        let mut by_id: HashMap<Uuid, Comment> =
            comments.into_iter().map(|c| (c.id, c)).collect();

        // Keep the post's own ordering; skip ids whose comment is gone
        let ordered: Vec<Comment> = post
            .comment_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        let user_ids = ordered
            .iter()
            .map(|c| c.user_id)
            .chain(std::iter::once(post.user_id));
        let users = self.users_by_id(user_ids).await?;

        let comments = ordered
            .into_iter()
            .map(|comment| {
                let user = users.get(&comment.user_id).cloned();
                CommentView::new(comment, user)
            })
            .collect();

        let author = users.get(&post.user_id).cloned();
        Ok(PostView::new(post, author, PostComments::Resolved(comments)))
    }

    /// Resolve the author of every comment, keeping input order
    pub async fn comments_with_authors(&self, comments: Vec<Comment>) -> Result<Vec<CommentView>> {
        let users = self.users_by_id(comments.iter().map(|c| c.user_id)).await?;

        Ok(comments
            .into_iter()
            .map(|comment| {
                let user = users.get(&comment.user_id).cloned();
                CommentView::new(comment, user)
            })
            .collect())
    }

    async fn users_by_id(
        &self,
        ids: impl Iterator<Item = Uuid>,
    ) -> Result<HashMap<Uuid, User>> {
        let unique: Vec<Uuid> = ids.collect::<HashSet<_>>().into_iter().collect();
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.find_by_ids(&unique).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
