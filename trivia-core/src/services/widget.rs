//! Home-screen widget bridge
//!
//! Writes the widget configuration and a snapshot of active anecdotes into
//! the platform-shared storage area. The core never reads the snapshot back;
//! the widget extension owns rendering and its own refresh timeline.

use super::feed::{Cursor, FeedFilter, FeedLoader};
use crate::domain::Language;
use crate::error::ServiceResult;
use crate::repository::ContentStore;
use std::sync::Arc;
use tracing::{info, warn};
use widget_cache::{SnapshotEntry, WidgetCache, WidgetConfiguration, WidgetSnapshot};

/// Widget category meaning "no category filter"
pub const WIDGET_ALL_CATEGORIES: &str = "general";

#[derive(Clone)]
pub struct WidgetBridge {
    cache: WidgetCache,
    loader: FeedLoader,
}

impl WidgetBridge {
    pub fn new(cache: WidgetCache, content: Arc<dyn ContentStore>, snapshot_size: usize) -> Self {
        Self {
            cache,
            loader: FeedLoader::new(content, snapshot_size),
        }
    }

    pub async fn load_configuration(&self) -> ServiceResult<Option<WidgetConfiguration>> {
        Ok(self.cache.get_configuration().await?)
    }

    /// Persist `config` and rebuild the snapshot for its category. Only the
    /// configuration write can fail the call.
    pub async fn save_configuration(
        &self,
        config: &WidgetConfiguration,
        language: Language,
    ) -> ServiceResult<()> {
        self.cache.set_configuration(config).await?;
        info!(
            category = %config.category,
            scroll_interval = config.scroll_interval,
            refresh_interval = config.refresh_interval,
            "Widget configuration saved"
        );

        if let Err(e) = self.refresh_snapshot(&config.category, language).await {
            warn!(category = %config.category, error = %e, "Failed to refresh widget snapshot");
        }
        Ok(())
    }

    /// Fetch up to `snapshot_size` active items and write them for the widget
    pub async fn refresh_snapshot(
        &self,
        category: &str,
        language: Language,
    ) -> ServiceResult<WidgetSnapshot> {
        let category_id = match category.trim() {
            "" | WIDGET_ALL_CATEGORIES => None,
            other => Some(other.to_string()),
        };
        let filter = FeedFilter::all(language).with_category(category_id);
        let page = self.loader.load_page(&Cursor::start(), &filter).await?;

        let entries = page
            .items
            .into_iter()
            .map(|item| SnapshotEntry {
                id: item.id,
                content: item.question,
                category: item.category_label,
            })
            .collect();
        Ok(self.cache.set_snapshot(entries).await?)
    }
}
