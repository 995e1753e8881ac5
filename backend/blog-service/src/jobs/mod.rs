//! Background jobs

pub mod comment_reconciler;

pub use comment_reconciler::CommentReconciler;
