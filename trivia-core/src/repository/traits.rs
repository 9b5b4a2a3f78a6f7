use super::StoreResult;
use crate::domain::{
    Category, ContactMessage, ContentItem, DeletionRequest, ItemStatus, NewContentItem,
    ReactionKind, SettingsPatch, UserDocument,
};

/// One page request against the anecdote collection.
///
/// Equality filters on language, status and (optionally) category, ordered by
/// the store's natural document order, starting strictly after `start_after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub language: String,
    pub status: ItemStatus,
    pub category_id: Option<String>,
    pub start_after: Option<String>,
    pub limit: usize,
}

impl ItemQuery {
    pub fn matches(&self, item: &ContentItem) -> bool {
        item.language == self.language
            && item.status == self.status
            && match &self.category_id {
                Some(category) => item.category_id.as_deref() == Some(category.as_str()),
                None => true,
            }
    }
}

/// Anecdote collection of the remote document store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch at most `query.limit` matching items
    async fn query_items(&self, query: &ItemQuery) -> StoreResult<Vec<ContentItem>>;

    /// Insert a new item, returning its id
    async fn create_item(&self, item: NewContentItem) -> StoreResult<String>;

    /// Increment `{kind}Count` of an item by one
    async fn increment_counter(&self, item_id: &str, kind: ReactionKind) -> StoreResult<()>;
}

/// Category collection of the remote document store
#[async_trait::async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> StoreResult<Vec<Category>>;
}

/// User documents of the remote document store
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, uid: &str) -> StoreResult<Option<UserDocument>>;

    /// Create or overwrite the user document
    async fn put_user(&self, uid: &str, doc: UserDocument) -> StoreResult<()>;

    /// Partial update of the `settings` map; absent fields are left untouched
    async fn merge_settings(&self, uid: &str, patch: SettingsPatch) -> StoreResult<()>;

    /// Array append to `{kind}d_items`. Does not deduplicate.
    async fn append_history(&self, uid: &str, item_id: &str, kind: ReactionKind)
        -> StoreResult<()>;

    /// Set `abonnement.premium`
    async fn set_premium_status(&self, uid: &str, status: &str) -> StoreResult<()>;
}

/// Support collections (`contact-us`, `delete-data-requests`)
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SupportStore: Send + Sync {
    /// Insert a contact message, returning its id
    async fn create_contact_message(&self, message: ContactMessage) -> StoreResult<String>;

    /// Insert a data-deletion request, returning its id
    async fn create_deletion_request(&self, request: DeletionRequest) -> StoreResult<String>;
}

/// Small on-device key-value store for settings that must survive sign-out
#[async_trait::async_trait]
pub trait LocalSettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    async fn remove(&self, key: &str) -> StoreResult<()>;
}
