//! Shared fixtures for blog-service integration tests

#![allow(dead_code)]

use blog_service::db::Stores;
use blog_service::models::{NewUser, PostFields, User};
use blog_service::services::BlogServices;

pub fn memory_services() -> (Stores, BlogServices) {
    let stores = Stores::in_memory();
    let services = BlogServices::new(&stores, 3);
    (stores, services)
}

pub fn post_fields(title: &str, tags: &[&str]) -> PostFields {
    PostFields {
        title: title.to_string(),
        text: format!("{title} has a body long enough"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        image_url: None,
    }
}

pub async fn seed_user(stores: &Stores, name: &str) -> User {
    stores
        .users
        .insert(&NewUser {
            full_name: name.to_string(),
            email: format!("{}@blog.test", name.to_lowercase()),
            avatar_url: None,
        })
        .await
        .expect("Failed to seed user")
}
