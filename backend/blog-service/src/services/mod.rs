/// Business logic layer for blog-service
///
/// This module provides high-level operations:
/// - Post service: listing, paging, tag sampling, authoring
/// - Comment service: creation, recent listing, batch removal
/// - Coordinator: keeps a post's comment counter and id list in step with
///   the comment collection
/// - Populator: resolves user and comment references for responses
pub mod comments;
pub mod coordinator;
pub mod populate;
pub mod posts;

pub use comments::{CommentService, DEFAULT_RECENT_LIMIT};
pub use coordinator::PostCommentCoordinator;
pub use populate::Populator;
pub use posts::PostService;

use crate::db::Stores;

/// Services wired over one set of stores
#[derive(Clone)]
pub struct BlogServices {
    pub posts: PostService,
    pub comments: CommentService,
    pub coordinator: PostCommentCoordinator,
}

impl BlogServices {
    pub fn new(stores: &Stores, recent_comments_limit: usize) -> Self {
        let populator = Populator::new(stores.users.clone(), stores.comments.clone());
        let posts = PostService::new(stores.posts.clone(), populator.clone());
        let comments = CommentService::new(stores.comments.clone(), populator)
            .with_recent_limit(recent_comments_limit);
        let coordinator = PostCommentCoordinator::new(posts.clone(), comments.clone());

        Self {
            posts,
            comments,
            coordinator,
        }
    }
}
