/// Post service - listing, retrieval, and authoring of posts
use super::populate::Populator;
use crate::db::PostStore;
use crate::error::{AppError, Result, StoreResult};
use crate::metrics::consistency as metrics;
use crate::models::{Post, PostFields, PostPage, PostSort, PostView, TagSampling};
use rand::Rng;
use std::sync::Arc;
use uuid::Uuid;

/// Upper bound (exclusive) of the random offset used by tag sampling
const RANDOM_TAG_OFFSET_BOUND: i64 = 10;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostStore>,
    populator: Populator,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostStore>, populator: Populator) -> Self {
        Self { posts, populator }
    }

    /// All posts in natural order, authors resolved
    pub async fn list_all(&self) -> Result<Vec<PostView>> {
        let posts = self.posts.find_natural(0, None).await?;
        self.populator.posts_with_authors(posts).await
    }

    /// One page of posts plus the total number of posts.
    ///
    /// `page` is 1-based. Out-of-range pages yield an empty list with the
    /// real total; a page below 1 produces a negative offset which the store
    /// rejects.
    pub async fn list_paged(&self, sort: PostSort, page: i64, limit: i64) -> Result<PostPage> {
        self.page(None, sort, page, limit).await
    }

    /// Caller's own posts, newest first
    pub async fn list_by_owner(&self, user_id: Uuid, page: i64, limit: i64) -> Result<PostPage> {
        self.page(Some(user_id), PostSort::Newest, page, limit).await
    }

    async fn page(
        &self,
        owner: Option<Uuid>,
        sort: PostSort,
        page: i64,
        limit: i64,
    ) -> Result<PostPage> {
        let skip = page.saturating_sub(1).saturating_mul(limit);

        let (posts, total_count) = futures::try_join!(
            self.posts.find_page(owner, sort, skip, limit),
            self.posts.count(owner),
        )?;

        let posts = self.populator.posts_with_authors(posts).await?;
        Ok(PostPage { posts, total_count })
    }

    /// Posts carrying `tag` exactly (case-sensitive)
    pub async fn list_by_tag(&self, tag: &str) -> Result<Vec<PostView>> {
        let posts = self.posts.find_by_tag(tag).await?;
        self.populator.posts_with_authors(posts).await
    }

    /// Count a view and return the post with author and comments resolved
    pub async fn get_by_id(&self, post_id: Uuid) -> Result<PostView> {
        let post = self
            .posts
            .increment_views(post_id)
            .await?
            .ok_or_else(AppError::post_not_found)?;

        metrics::record_post_view();
        self.populator.post_detail(post).await
    }

    pub async fn create(&self, fields: &PostFields, author_id: Uuid) -> Result<Post> {
        let post = self.posts.insert(fields, author_id).await?;
        tracing::info!(post_id = %post.id, user_id = %author_id, "Post created");
        Ok(post)
    }

    /// Replace the editable fields. The post is re-owned by `author_id`.
    pub async fn update(&self, post_id: Uuid, fields: &PostFields, author_id: Uuid) -> Result<Post> {
        self.posts
            .replace(post_id, fields, author_id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    /// Remove the post alone; see the coordinator for the cascading variant
    pub async fn delete(&self, post_id: Uuid) -> Result<Post> {
        self.posts
            .delete(post_id)
            .await?
            .ok_or_else(AppError::post_not_found)
    }

    /// Flattened tag sample used for the tag cloud
    pub async fn sample_tags(&self, mode: TagSampling) -> Result<Vec<String>> {
        let skip = match mode {
            TagSampling::FirstFive => 0,
            TagSampling::RandomSeven => rand::thread_rng().gen_range(0..RANDOM_TAG_OFFSET_BOUND),
        };

        let posts = self.posts.find_natural(skip, mode.post_limit()).await?;

        Ok(posts
            .into_iter()
            .flat_map(|post| post.tags)
            .take(mode.tag_limit())
            .collect())
    }

    /// Single atomic increment-and-append on the post
    pub(crate) async fn link_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
    ) -> StoreResult<Option<Post>> {
        self.posts.attach_comment(post_id, comment_id).await
    }

    pub(crate) async fn resolve_detail(&self, post: Post) -> Result<PostView> {
        self.populator.post_detail(post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Stores;

    fn service() -> PostService {
        let stores = Stores::in_memory();
        PostService::new(
            stores.posts.clone(),
            Populator::new(stores.users, stores.comments),
        )
    }

    fn fields(title: &str, tags: &[&str]) -> PostFields {
        PostFields {
            title: title.to_string(),
            text: "long enough body text".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            image_url: None,
        }
    }

    #[tokio::test]
    async fn first_five_tags_come_from_first_posts() {
        let service = service();
        let author = Uuid::new_v4();
        service.create(&fields("one", &["a", "b", "c"]), author).await.unwrap();
        service.create(&fields("two", &["d", "e", "f"]), author).await.unwrap();

        let tags = service.sample_tags(TagSampling::FirstFive).await.unwrap();
        assert_eq!(tags, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn random_tags_are_bounded() {
        let service = service();
        let author = Uuid::new_v4();
        for i in 0..12 {
            service
                .create(&fields(&format!("post {i}"), &["x", "y"]), author)
                .await
                .unwrap();
        }

        let tags = service.sample_tags(TagSampling::RandomSeven).await.unwrap();
        assert!(tags.len() <= 7);
        assert!(tags.iter().all(|t| t == "x" || t == "y"));
    }

    #[tokio::test]
    async fn page_zero_is_a_store_failure() {
        let service = service();
        let err = service.list_paged(PostSort::Newest, 0, 5).await.unwrap_err();
        assert!(matches!(err, AppError::StoreFailure(_)));
    }

    #[tokio::test]
    async fn update_missing_post_is_not_found() {
        let service = service();
        let err = service
            .update(Uuid::new_v4(), &fields("ghost", &[]), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
