/// Data models for blog-service
///
/// This module defines structures for:
/// - Post: blog articles with denormalized comment counter and comment ids
/// - Comment: comments, linked to posts only through the post's id list
/// - User: authors, resolved into responses
/// - Views: response shapes with authors and comments resolved
mod comment;
mod post;
mod user;
mod view;

pub use comment::Comment;
pub use post::{Post, PostFields, PostSort, TagSampling};
pub use user::{NewUser, User};
pub use view::{CommentView, PostComments, PostPage, PostView};
