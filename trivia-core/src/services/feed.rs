//! Feed loading and the client-side feed cache
//!
//! Pagination is cursor based: the cursor is the id of the last item of the
//! most recently fetched page. A page shorter than the page size marks the end
//! of the feed for the current filter.

use crate::domain::{ContentItem, ItemStatus, Language};
use crate::error::ServiceResult;
use crate::repository::{ContentStore, ItemQuery};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

/// Filter applied to the home feed. Status is always `active`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedFilter {
    pub language: Language,
    /// `None` shows every category
    pub category_id: Option<String>,
}

impl FeedFilter {
    pub fn all(language: Language) -> Self {
        Self {
            language,
            category_id: None,
        }
    }

    pub fn with_category(mut self, category_id: Option<String>) -> Self {
        self.category_id = category_id;
        self
    }

    fn query(&self, cursor: &Cursor, limit: usize) -> ItemQuery {
        ItemQuery {
            language: self.language.as_str().to_string(),
            status: ItemStatus::Active,
            category_id: self.category_id.clone(),
            start_after: cursor.last_id.clone(),
            limit,
        }
    }
}

/// Pagination position within one filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    last_id: Option<String>,
    end_reached: bool,
}

impl Cursor {
    /// Start of the feed
    pub fn start() -> Self {
        Self::default()
    }

    pub fn is_start(&self) -> bool {
        self.last_id.is_none()
    }

    pub fn is_end(&self) -> bool {
        self.end_reached
    }

    /// Opaque continuation token
    pub fn token(&self) -> Option<&str> {
        self.last_id.as_deref()
    }
}

/// Result of one page fetch
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<ContentItem>,
    pub next_cursor: Cursor,
}

impl Page {
    pub fn is_end(&self) -> bool {
        self.next_cursor.is_end()
    }
}

/// Fetches pages from the remote content source. Holds no feed state.
#[derive(Clone)]
pub struct FeedLoader {
    store: Arc<dyn ContentStore>,
    page_size: usize,
}

impl FeedLoader {
    pub fn new(store: Arc<dyn ContentStore>, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Fetch the page after `cursor`. Mutates nothing; on error the caller
    /// can re-issue the same call with the same cursor.
    pub async fn load_page(&self, cursor: &Cursor, filter: &FeedFilter) -> ServiceResult<Page> {
        let query = filter.query(cursor, self.page_size);
        let fetched = self.store.query_items(&query).await?;
        let fetched_len = fetched.len();
        let is_end = fetched_len < self.page_size;

        let last_id = match fetched.last() {
            Some(last) => Some(last.id.clone()),
            None => cursor.last_id.clone(),
        };

        // The store filters server-side; anything that slips through is dropped here
        let items: Vec<ContentItem> = fetched
            .into_iter()
            .filter(|item| query.matches(item))
            .collect();
        if items.len() != fetched_len {
            warn!(
                dropped = fetched_len - items.len(),
                "Store returned items outside the requested filter"
            );
        }

        debug!(
            category = ?filter.category_id,
            language = %filter.language,
            returned = items.len(),
            is_end,
            "Feed page loaded"
        );

        Ok(Page {
            items,
            next_cursor: Cursor {
                last_id,
                end_reached: is_end,
            },
        })
    }
}

/// Client-side ordered cache of loaded items for the active filter.
///
/// Append-only between resets; ids are unique.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    items: Vec<ContentItem>,
    ids: HashSet<String>,
    cursor: Cursor,
}

impl Feed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&ContentItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn is_end(&self) -> bool {
        self.cursor.is_end()
    }

    /// Merge a fetched page, skipping ids already present. Returns the number
    /// of items appended.
    pub fn apply_page(&mut self, page: Page) -> usize {
        let before = self.items.len();
        for item in page.items {
            if self.ids.insert(item.id.clone()) {
                self.items.push(item);
            } else {
                debug!(item_id = %item.id, "Skipping duplicate feed item");
            }
        }
        self.cursor = page.next_cursor;
        self.items.len() - before
    }

    /// Back to an empty feed at the start cursor
    pub fn reset(&mut self) {
        self.items.clear();
        self.ids.clear();
        self.cursor = Cursor::start();
    }
}
