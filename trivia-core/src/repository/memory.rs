//! In-process document store
//!
//! Mirrors the remote store's query and partial-update semantics closely enough
//! to drive the feed and review loop offline. Failure injection and per-filter
//! latency make it usable for exercising degraded-network paths.

use super::{
    CategoryStore, ContentStore, ItemQuery, LocalSettingsStore, StoreError, StoreResult,
    SupportStore, UserStore,
};
use crate::domain::{
    Category, ContactMessage, ContentItem, DeletionRequest, NewContentItem, ReactionKind,
    SettingsPatch, Subscription, UserDocument,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

/// Store operations that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    QueryItems,
    CreateItem,
    IncrementCounter,
    ListCategories,
    GetUser,
    PutUser,
    MergeSettings,
    AppendHistory,
    SetPremium,
    CreateSupportRequest,
}

#[derive(Default)]
struct Inner {
    items: Vec<ContentItem>,
    categories: Vec<Category>,
    users: HashMap<String, UserDocument>,
    contact_messages: Vec<(String, ContactMessage)>,
    deletion_requests: Vec<(String, DeletionRequest)>,
    next_id: u64,
    offline: bool,
    failing: HashSet<Operation>,
    query_delays: HashMap<Option<String>, Duration>,
    query_calls: usize,
    counter_calls: usize,
    history_calls: usize,
}

#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<ContentItem>) -> Self {
        let store = Self::new();
        for item in items {
            store.insert_item(item);
        }
        store
    }

    fn state(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, op: Operation) -> StoreResult<()> {
        let state = self.state();
        if state.offline {
            return Err(StoreError::Unavailable("store offline".into()));
        }
        if state.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("{:?} failed", op)));
        }
        Ok(())
    }

    /// Insert or replace an item, keeping document order
    pub fn insert_item(&self, item: ContentItem) {
        let mut state = self.state();
        match state.items.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => *existing = item,
            None => state.items.push(item),
        }
    }

    pub fn insert_category(&self, category: Category) {
        self.state().categories.push(category);
    }

    pub fn insert_user(&self, uid: &str, doc: UserDocument) {
        self.state().users.insert(uid.to_string(), doc);
    }

    pub fn item(&self, id: &str) -> Option<ContentItem> {
        self.state().items.iter().find(|item| item.id == id).cloned()
    }

    pub fn user(&self, uid: &str) -> Option<UserDocument> {
        self.state().users.get(uid).cloned()
    }

    pub fn contact_messages(&self) -> Vec<ContactMessage> {
        self.state()
            .contact_messages
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn deletion_requests(&self) -> Vec<DeletionRequest> {
        self.state()
            .deletion_requests
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// Every operation fails while offline
    pub fn set_offline(&self, offline: bool) {
        self.state().offline = offline;
    }

    pub fn set_failing(&self, op: Operation, failing: bool) {
        let mut state = self.state();
        if failing {
            state.failing.insert(op);
        } else {
            state.failing.remove(&op);
        }
    }

    /// Delay item queries filtered on `category_id` (`None` = unfiltered)
    pub fn set_query_delay(&self, category_id: Option<&str>, delay: Duration) {
        self.state()
            .query_delays
            .insert(category_id.map(str::to_string), delay);
    }

    pub fn query_calls(&self) -> usize {
        self.state().query_calls
    }

    pub fn counter_calls(&self) -> usize {
        self.state().counter_calls
    }

    pub fn history_calls(&self) -> usize {
        self.state().history_calls
    }

    fn user_mut<'a>(state: &'a mut Inner, uid: &str) -> StoreResult<&'a mut UserDocument> {
        state
            .users
            .get_mut(uid)
            .ok_or_else(|| StoreError::NotFound(format!("user {}", uid)))
    }
}

#[async_trait::async_trait]
impl ContentStore for InMemoryStore {
    async fn query_items(&self, query: &ItemQuery) -> StoreResult<Vec<ContentItem>> {
        let delay = {
            let mut state = self.state();
            state.query_calls += 1;
            state.query_delays.get(&query.category_id).copied()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check(Operation::QueryItems)?;

        let state = self.state();
        let start = match &query.start_after {
            Some(cursor) => state
                .items
                .iter()
                .position(|item| &item.id == cursor)
                .map(|pos| pos + 1)
                .ok_or_else(|| StoreError::NotFound(format!("cursor {}", cursor)))?,
            None => 0,
        };

        let page: Vec<ContentItem> = state.items[start..]
            .iter()
            .filter(|item| query.matches(item))
            .take(query.limit)
            .cloned()
            .collect();

        debug!(
            category = ?query.category_id,
            start_after = ?query.start_after,
            returned = page.len(),
            "In-memory item query"
        );
        Ok(page)
    }

    async fn create_item(&self, item: NewContentItem) -> StoreResult<String> {
        self.check(Operation::CreateItem)?;
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("item-{}", state.next_id);
        state.items.push(item.into_item(id.clone()));
        Ok(id)
    }

    async fn increment_counter(&self, item_id: &str, kind: ReactionKind) -> StoreResult<()> {
        self.state().counter_calls += 1;
        self.check(Operation::IncrementCounter)?;

        let mut state = self.state();
        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| StoreError::NotFound(format!("item {}", item_id)))?;
        match kind {
            ReactionKind::Like => item.like_count += 1,
            ReactionKind::Dislike => item.dislike_count += 1,
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl CategoryStore for InMemoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<Category>> {
        self.check(Operation::ListCategories)?;
        Ok(self.state().categories.clone())
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryStore {
    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserDocument>> {
        self.check(Operation::GetUser)?;
        Ok(self.state().users.get(uid).cloned())
    }

    async fn put_user(&self, uid: &str, doc: UserDocument) -> StoreResult<()> {
        self.check(Operation::PutUser)?;
        self.state().users.insert(uid.to_string(), doc);
        Ok(())
    }

    async fn merge_settings(&self, uid: &str, patch: SettingsPatch) -> StoreResult<()> {
        self.check(Operation::MergeSettings)?;
        let mut state = self.state();
        let user = Self::user_mut(&mut state, uid)?;
        user.settings.get_or_insert_with(SettingsPatch::default).merge(patch);
        Ok(())
    }

    async fn append_history(
        &self,
        uid: &str,
        item_id: &str,
        kind: ReactionKind,
    ) -> StoreResult<()> {
        self.state().history_calls += 1;
        self.check(Operation::AppendHistory)?;

        let mut state = self.state();
        let user = Self::user_mut(&mut state, uid)?;
        let history = match kind {
            ReactionKind::Like => &mut user.liked_items,
            ReactionKind::Dislike => &mut user.disliked_items,
        };
        history.push(item_id.to_string());
        Ok(())
    }

    async fn set_premium_status(&self, uid: &str, status: &str) -> StoreResult<()> {
        self.check(Operation::SetPremium)?;
        let mut state = self.state();
        let user = Self::user_mut(&mut state, uid)?;
        user.subscription = Some(Subscription {
            premium: Some(status.to_string()),
        });
        Ok(())
    }
}

#[async_trait::async_trait]
impl SupportStore for InMemoryStore {
    async fn create_contact_message(&self, message: ContactMessage) -> StoreResult<String> {
        self.check(Operation::CreateSupportRequest)?;
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("contact-{}", state.next_id);
        state.contact_messages.push((id.clone(), message));
        Ok(id)
    }

    async fn create_deletion_request(&self, request: DeletionRequest) -> StoreResult<String> {
        self.check(Operation::CreateSupportRequest)?;
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("deletion-{}", state.next_id);
        state.deletion_requests.push((id.clone(), request));
        Ok(id)
    }
}

/// In-process local key-value store
#[derive(Default)]
pub struct MemoryLocalStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl LocalSettingsStore for MemoryLocalStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.values().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.values().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemStatus;

    fn item(id: &str, category: &str) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            question: format!("{}?", id),
            answer: id.to_string(),
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

    fn query(category: Option<&str>, start_after: Option<&str>, limit: usize) -> ItemQuery {
        ItemQuery {
            language: "fr".into(),
            status: ItemStatus::Active,
            category_id: category.map(str::to_string),
            start_after: start_after.map(str::to_string),
            limit,
        }
    }

    #[tokio::test]
    async fn test_query_filters_and_paginates() {
        let store = InMemoryStore::with_items(vec![
            item("a", "science"),
            item("b", "history"),
            item("c", "science"),
            item("d", "science"),
        ]);

        let first = store.query_items(&query(Some("science"), None, 2)).await.unwrap();
        let ids: Vec<_> = first.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);

        let second = store
            .query_items(&query(Some("science"), Some("c"), 2))
            .await
            .unwrap();
        let ids: Vec<_> = second.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["d"]);
    }

    #[tokio::test]
    async fn test_query_skips_inactive_and_other_language() {
        let mut pending = item("p", "science");
        pending.status = ItemStatus::Pending;
        let mut english = item("e", "science");
        english.language = "en".into();
        let store = InMemoryStore::with_items(vec![pending, english, item("a", "science")]);

        let page = store.query_items(&query(None, None, 10)).await.unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "a");
    }

    #[tokio::test]
    async fn test_history_append_keeps_duplicates() {
        let store = InMemoryStore::new();
        store.insert_user("u1", UserDocument::default());

        store.append_history("u1", "a", ReactionKind::Like).await.unwrap();
        store.append_history("u1", "a", ReactionKind::Like).await.unwrap();

        assert_eq!(store.user("u1").unwrap().liked_items, vec!["a", "a"]);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_operation() {
        let store = InMemoryStore::with_items(vec![item("a", "science")]);
        store.set_offline(true);

        assert!(store.query_items(&query(None, None, 10)).await.is_err());
        assert!(store.increment_counter("a", ReactionKind::Like).await.is_err());
        assert_eq!(store.item("a").unwrap().like_count, 0);
    }
}
