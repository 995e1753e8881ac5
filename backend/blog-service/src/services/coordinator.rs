//! Post/comment consistency coordinator
//!
//! A post caches its comments as `comments_count` plus an ordered id list.
//! Every flow that creates or destroys comments on behalf of a post goes
//! through here so that both stay in step:
//!
//! - adding a comment inserts it, then links it with one atomic
//!   increment-and-append on the post
//! - removing a post deletes the post, then exactly the comments whose ids
//!   were stored on the deleted document
//!
//! Neither flow is transactional. A comment whose link step fails stays in
//! the store unreferenced, and a cascade whose second step fails leaves
//! comments behind; both are reclaimed later by the orphan reconciler.

use super::{CommentService, PostService};
use crate::error::{AppError, Result};
use crate::metrics::consistency as metrics;
use crate::models::{Post, PostView};
use uuid::Uuid;

#[derive(Clone)]
pub struct PostCommentCoordinator {
    posts: PostService,
    comments: CommentService,
}

impl PostCommentCoordinator {
    pub fn new(posts: PostService, comments: CommentService) -> Self {
        Self { posts, comments }
    }

    /// Create a comment and attach it to `post_id`.
    ///
    /// Returns the updated post with author and comments resolved.
    pub async fn add_comment_to_post(
        &self,
        post_id: Uuid,
        text: &str,
        author_id: Uuid,
    ) -> Result<PostView> {
        let comment = self.comments.create(text, author_id).await?;

        let post = match self.posts.link_comment(post_id, comment.id).await {
            Ok(Some(post)) => post,
            Ok(None) => {
                metrics::record_comment_link("post_missing");
                metrics::record_orphaned_comment();
                tracing::warn!(
                    post_id = %post_id,
                    comment_id = %comment.id,
                    user_id = %author_id,
                    "Post not found while linking comment; comment left unlinked"
                );
                return Err(AppError::post_not_found());
            }
            Err(source) => {
                metrics::record_comment_link("store_error");
                metrics::record_orphaned_comment();
                tracing::error!(
                    post_id = %post_id,
                    comment_id = %comment.id,
                    user_id = %author_id,
                    error = %source,
                    "Failed to link comment to post"
                );
                return Err(AppError::OrphanedComment {
                    comment_id: comment.id,
                    source,
                });
            }
        };

        metrics::record_comment_link("linked");
        tracing::debug!(
            post_id = %post_id,
            comment_id = %comment.id,
            comments_count = post.comments_count,
            "Comment linked to post"
        );

        self.posts.resolve_detail(post).await
    }

    /// Delete a post and the comments it owns. Returns the deleted post.
    pub async fn remove_post_cascade(&self, post_id: Uuid) -> Result<Post> {
        let post = self.posts.delete(post_id).await?;

        match self.comments.delete_by_ids(&post.comment_ids).await {
            Ok(removed) => {
                metrics::record_cascade_deleted(removed);
                tracing::info!(
                    post_id = %post_id,
                    comments_removed = removed,
                    "Post deleted with its comments"
                );
                Ok(post)
            }
            Err(err) => {
                metrics::record_cascade_failure();
                tracing::error!(
                    post_id = %post_id,
                    dangling_comments = post.comment_ids.len(),
                    error = %err,
                    "Post deleted but its comments could not be removed"
                );
                Err(err)
            }
        }
    }
}
