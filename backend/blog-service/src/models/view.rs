use super::{Comment, Post, User};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Comment with its author resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: Uuid,
    pub text: String,
    /// `None` when the author no longer exists
    pub user: Option<User>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CommentView {
    pub fn new(comment: Comment, user: Option<User>) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            user,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

/// Comment list of a post: raw ids in listings, resolved on detail
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PostComments {
    Ids(Vec<Uuid>),
    Resolved(Vec<CommentView>),
}

impl PostComments {
    pub fn len(&self) -> usize {
        match self {
            PostComments::Ids(ids) => ids.len(),
            PostComments::Resolved(comments) => comments.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolved comments, empty for the id form
    pub fn resolved(&self) -> &[CommentView] {
        match self {
            PostComments::Ids(_) => &[],
            PostComments::Resolved(comments) => comments,
        }
    }
}

/// Post with its author (and possibly its comments) resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub user: Option<User>,
    pub views_count: i64,
    pub comments_count: i64,
    pub comments: PostComments,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, user: Option<User>, comments: PostComments) -> Self {
        Self {
            id: post.id,
            title: post.title,
            text: post.text,
            tags: post.tags,
            image_url: post.image_url,
            user,
            views_count: post.views_count,
            comments_count: post.comments_count,
            comments,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// One page of a listing plus the size of the whole filtered set
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPage {
    pub posts: Vec<PostView>,
    pub total_count: i64,
}
