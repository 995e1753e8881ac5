//! Integration Tests: Post/Comment Consistency
//!
//! Exercises the services and coordinator over the in-memory store.
//!
//! Coverage:
//! - Comment counter and id list move together on every link
//! - Detail reads count views
//! - Cascade delete removes exactly the comments a post owned
//! - Paging, tag filtering, and batch comment deletion

mod common;

use blog_service::error::AppError;
use blog_service::models::{PostComments, PostSort};
use common::{memory_services, post_fields, seed_user};
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn comment_on_fresh_post_returns_resolved_comment() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let commenter = seed_user(&stores, "Bob").await;

    let post = services
        .posts
        .create(&post_fields("Post A", &[]), author.id)
        .await
        .unwrap();

    let view = services
        .coordinator
        .add_comment_to_post(post.id, "hi", commenter.id)
        .await
        .unwrap();

    assert_eq!(view.comments_count, 1);
    let comments = view.comments.resolved();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "hi");
    assert_eq!(comments[0].user.as_ref().map(|u| u.id), Some(commenter.id));
    assert_eq!(view.user.as_ref().map(|u| u.id), Some(author.id));
}

#[tokio::test]
async fn each_link_appends_exactly_one_id() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let post = services
        .posts
        .create(&post_fields("Counting", &[]), author.id)
        .await
        .unwrap();

    let mut expected_ids = Vec::new();
    for n in 1..=3 {
        let view = services
            .coordinator
            .add_comment_to_post(post.id, &format!("comment {n}"), author.id)
            .await
            .unwrap();

        assert_eq!(view.comments_count, n);
        assert_eq!(view.comments.len() as i64, n);

        let last = view.comments.resolved().last().unwrap().id;
        expected_ids.push(last);
        let ids: Vec<Uuid> = view.comments.resolved().iter().map(|c| c.id).collect();
        assert_eq!(ids, expected_ids);
    }
}

#[tokio::test]
async fn concurrent_comments_keep_counter_in_step() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let post = services
        .posts
        .create(&post_fields("Busy post", &[]), author.id)
        .await
        .unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|n| {
            let coordinator = services.coordinator.clone();
            tokio::spawn(async move {
                coordinator
                    .add_comment_to_post(post.id, &format!("comment {n}"), author.id)
                    .await
            })
        })
        .collect();

    for task in futures::future::join_all(tasks).await {
        task.unwrap().unwrap();
    }

    let view = services.posts.get_by_id(post.id).await.unwrap();
    assert_eq!(view.comments_count, 20);
    assert_eq!(view.comments.len(), 20);
}

#[tokio::test]
async fn reading_a_post_counts_views() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let post = services
        .posts
        .create(&post_fields("Viewed", &[]), author.id)
        .await
        .unwrap();

    let first = services.posts.get_by_id(post.id).await.unwrap();
    let second = services.posts.get_by_id(post.id).await.unwrap();

    assert_eq!(first.views_count, 1);
    assert_eq!(second.views_count, 2);
}

#[tokio::test]
async fn created_post_reads_back_with_one_view_and_no_comments() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let post = services
        .posts
        .create(&post_fields("Fresh", &["news"]), author.id)
        .await
        .unwrap();

    let view = services.posts.get_by_id(post.id).await.unwrap();
    assert_eq!(view.views_count, 1);
    assert_eq!(view.comments_count, 0);
    assert!(matches!(&view.comments, PostComments::Resolved(c) if c.is_empty()));
    assert_eq!(view.tags, vec!["news"]);
}

#[tokio::test]
async fn cascade_delete_hides_owned_comments_from_recent() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let doomed = services
        .posts
        .create(&post_fields("Doomed", &[]), author.id)
        .await
        .unwrap();
    let survivor = services
        .posts
        .create(&post_fields("Survivor", &[]), author.id)
        .await
        .unwrap();

    services
        .coordinator
        .add_comment_to_post(survivor.id, "stays", author.id)
        .await
        .unwrap();
    for text in ["one", "two"] {
        services
            .coordinator
            .add_comment_to_post(doomed.id, text, author.id)
            .await
            .unwrap();
    }

    let deleted = services
        .coordinator
        .remove_post_cascade(doomed.id)
        .await
        .unwrap();

    let recent = services.comments.list_recent(10).await.unwrap();
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].text, "stays");
    assert!(recent.iter().all(|c| !deleted.comment_ids.contains(&c.id)));

    let err = services.posts.get_by_id(doomed.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn newest_page_returns_latest_posts_and_total() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;

    for title in ["t1", "t2", "t3"] {
        services
            .posts
            .create(&post_fields(title, &[]), author.id)
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(2)).await;
    }

    let page = services
        .posts
        .list_paged(PostSort::Newest, 1, 2)
        .await
        .unwrap();
    let titles: Vec<&str> = page.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["t3", "t2"]);
    assert_eq!(page.total_count, 3);

    let beyond = services
        .posts
        .list_paged(PostSort::Newest, 5, 2)
        .await
        .unwrap();
    assert!(beyond.posts.is_empty());
    assert_eq!(beyond.total_count, 3);
}

#[tokio::test]
async fn popular_page_orders_by_views() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let quiet = services
        .posts
        .create(&post_fields("quiet", &[]), author.id)
        .await
        .unwrap();
    let loud = services
        .posts
        .create(&post_fields("loud", &[]), author.id)
        .await
        .unwrap();

    for _ in 0..3 {
        services.posts.get_by_id(loud.id).await.unwrap();
    }
    services.posts.get_by_id(quiet.id).await.unwrap();

    let page = services
        .posts
        .list_paged(PostSort::Popular, 1, 10)
        .await
        .unwrap();
    let titles: Vec<&str> = page.posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["loud", "quiet"]);
}

#[tokio::test]
async fn owner_listing_only_counts_own_posts() {
    let (stores, services) = memory_services();
    let alice = seed_user(&stores, "Alice").await;
    let bob = seed_user(&stores, "Bob").await;

    services.posts.create(&post_fields("a1", &[]), alice.id).await.unwrap();
    services.posts.create(&post_fields("b1", &[]), bob.id).await.unwrap();
    services.posts.create(&post_fields("a2", &[]), alice.id).await.unwrap();

    let page = services.posts.list_by_owner(alice.id, 1, 10).await.unwrap();
    assert_eq!(page.total_count, 2);
    assert!(page
        .posts
        .iter()
        .all(|p| p.user.as_ref().map(|u| u.id) == Some(alice.id)));
}

#[tokio::test]
async fn tag_filter_is_exact_and_case_sensitive() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;

    services
        .posts
        .create(&post_fields("exact", &["rust", "web"]), author.id)
        .await
        .unwrap();
    services
        .posts
        .create(&post_fields("upper", &["Rust"]), author.id)
        .await
        .unwrap();
    services
        .posts
        .create(&post_fields("substring", &["rustacean"]), author.id)
        .await
        .unwrap();

    let posts = services.posts.list_by_tag("rust").await.unwrap();
    let titles: Vec<&str> = posts.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["exact"]);
}

#[tokio::test]
async fn batch_delete_ignores_unknown_ids() {
    let (stores, services) = memory_services();
    let author = seed_user(&stores, "Alice").await;
    let a = services.comments.create("a", author.id).await.unwrap();
    let b = services.comments.create("b", author.id).await.unwrap();

    let removed = services
        .comments
        .delete_by_ids(&[a.id, Uuid::new_v4(), b.id, Uuid::new_v4()])
        .await
        .unwrap();

    assert_eq!(removed, 2);
    assert!(services.comments.list_recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn dangling_references_are_skipped_on_detail() {
    let (_stores, services) = memory_services();
    let post = services
        .posts
        .create(&post_fields("Dangling", &[]), Uuid::new_v4())
        .await
        .unwrap();
    let view = services
        .coordinator
        .add_comment_to_post(post.id, "will vanish", Uuid::new_v4())
        .await
        .unwrap();
    let comment_id = view.comments.resolved()[0].id;

    services.comments.delete_by_ids(&[comment_id]).await.unwrap();

    let detail = services.posts.get_by_id(post.id).await.unwrap();
    assert!(detail.user.is_none());
    assert_eq!(detail.comments_count, 1);
    assert!(detail.comments.is_empty());
}
