//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;
use tokio::sync::watch;
use trivia_core::domain::{Account, ContentItem, ItemStatus, Language};
use trivia_core::repository::InMemoryStore;
use trivia_core::services::{
    AuthState, FeedFilter, FeedLoader, HomeFeed, HomeOptions, ReactionService,
};

pub const VIEWPORT_WIDTH: f32 = 400.0;

pub fn item(id: &str, category: &str) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        question: format!("Question {}", id),
        answer: format!("Answer {}", id),
        like_count: 0,
        dislike_count: 0,
        language: "fr".to_string(),
        category_id: Some(category.to_string()),
        category_label: category.to_string(),
        status: ItemStatus::Active,
        created_by: None,
        created_at: None,
        updated_at: None,
    }
}

/// `count` active items in one category, ids `{prefix}-000`, `{prefix}-001`, ...
pub fn items(prefix: &str, category: &str, count: usize) -> Vec<ContentItem> {
    (0..count)
        .map(|i| item(&format!("{}-{:03}", prefix, i), category))
        .collect()
}

pub fn home_feed(store: Arc<InMemoryStore>, page_size: usize, prefetch_margin: usize) -> HomeFeed {
    let (_auth_tx, viewer) = watch::channel(AuthState::SignedOut);
    home_feed_for(store, page_size, prefetch_margin, viewer)
}

pub fn home_feed_for(
    store: Arc<InMemoryStore>,
    page_size: usize,
    prefetch_margin: usize,
    viewer: watch::Receiver<AuthState>,
) -> HomeFeed {
    HomeFeed::new(
        FeedLoader::new(store.clone(), page_size),
        ReactionService::new(store.clone(), store),
        FeedFilter::all(Language::Fr),
        viewer,
        HomeOptions {
            prefetch_margin,
            commit_threshold: 0.25,
            viewport_width: VIEWPORT_WIDTH,
        },
    )
}

/// Home feed with its first page loaded
pub async fn started(store: Arc<InMemoryStore>, page_size: usize) -> HomeFeed {
    let mut home = home_feed(store, page_size, 0);
    home.start();
    home.settle().await;
    home
}

pub fn signed_in(uid: &str) -> AuthState {
    AuthState::SignedIn(Account {
        uid: uid.to_string(),
        email: None,
    })
}
