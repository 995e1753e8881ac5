use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post document as stored.
///
/// `comments_count` is a cache of `comment_ids.len()`; both are only ever
/// changed together by a single atomic store update.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub user_id: Uuid,
    pub views_count: i64,
    pub comments_count: i64,
    /// Weak references: ids may outlive the comments they point to
    #[serde(rename = "comments")]
    pub comment_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author-editable fields of a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFields {
    pub title: String,
    pub text: String,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
}

/// Sort order for paged listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum PostSort {
    /// createdAt descending
    #[default]
    #[serde(rename = "new")]
    Newest,
    /// viewsCount descending
    #[serde(rename = "popular")]
    Popular,
}

impl PostSort {
    /// Ties fall back to insertion order, most recent first
    pub fn order_clause(self) -> &'static str {
        match self {
            PostSort::Newest => "created_at DESC, seq DESC",
            PostSort::Popular => "views_count DESC, created_at DESC, seq DESC",
        }
    }
}

/// Tag sampling policy for the tag cloud
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum TagSampling {
    /// Tags of the first five posts, first five tags
    #[default]
    #[serde(rename = "first")]
    FirstFive,
    /// Random offset in [0, 10), first seven tags of the remaining posts
    #[serde(rename = "random")]
    RandomSeven,
}

impl TagSampling {
    pub fn post_limit(self) -> Option<i64> {
        match self {
            TagSampling::FirstFive => Some(5),
            TagSampling::RandomSeven => None,
        }
    }

    pub fn tag_limit(self) -> usize {
        match self {
            TagSampling::FirstFive => 5,
            TagSampling::RandomSeven => 7,
        }
    }
}
