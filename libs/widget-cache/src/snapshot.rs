//! Widget blobs
//!
//! Provides:
//! - Widget configuration (category, scroll and refresh intervals)
//! - Anecdote snapshot rendered by the widget timeline

use crate::{CacheError, CacheKey, CacheResult, SharedCache};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Seconds between two anecdotes on the widget
pub const SCROLL_INTERVALS: [u32; 6] = [3, 5, 10, 15, 30, 60];

/// Minutes between two snapshot refreshes
pub const REFRESH_INTERVALS: [u32; 5] = [15, 30, 60, 120, 240];

/// Widget configuration as read by the widget extension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetConfiguration {
    pub category: String,
    /// Seconds
    pub scroll_interval: u32,
    /// Minutes
    pub refresh_interval: u32,
}

impl Default for WidgetConfiguration {
    fn default() -> Self {
        Self {
            category: "general".to_string(),
            scroll_interval: 5,
            refresh_interval: 30,
        }
    }
}

impl WidgetConfiguration {
    pub fn validate(&self) -> CacheResult<()> {
        if self.category.trim().is_empty() {
            return Err(CacheError::InvalidData("empty widget category".into()));
        }
        if !SCROLL_INTERVALS.contains(&self.scroll_interval) {
            return Err(CacheError::InvalidData(format!(
                "unsupported scroll interval: {}s",
                self.scroll_interval
            )));
        }
        if !REFRESH_INTERVALS.contains(&self.refresh_interval) {
            return Err(CacheError::InvalidData(format!(
                "unsupported refresh interval: {}min",
                self.refresh_interval
            )));
        }
        Ok(())
    }
}

/// One anecdote as shown by the widget
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub id: String,
    pub content: String,
    pub category: String,
}

/// Cached anecdote snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetSnapshot {
    pub anecdotes: Vec<SnapshotEntry>,
    pub last_updated: DateTime<Utc>,
    /// Schema version for invalidation on structure changes
    #[serde(default)]
    pub schema_version: u32,
}

impl WidgetSnapshot {
    pub const CURRENT_SCHEMA_VERSION: u32 = 1;

    pub fn new(anecdotes: Vec<SnapshotEntry>) -> Self {
        Self {
            anecdotes,
            last_updated: Utc::now(),
            schema_version: Self::CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn is_stale(&self) -> bool {
        self.schema_version < Self::CURRENT_SCHEMA_VERSION
    }
}

/// Widget blob operations
#[derive(Clone)]
pub struct WidgetCache {
    cache: SharedCache,
}

impl WidgetCache {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }

    pub async fn get_configuration(&self) -> CacheResult<Option<WidgetConfiguration>> {
        self.cache.get(CacheKey::widget_configuration()).await
    }

    pub async fn set_configuration(&self, config: &WidgetConfiguration) -> CacheResult<()> {
        config.validate()?;
        self.cache
            .set(CacheKey::widget_configuration(), config)
            .await?;
        debug!(category = %config.category, "Widget configuration written");
        Ok(())
    }

    pub async fn get_snapshot(&self) -> CacheResult<Option<WidgetSnapshot>> {
        let key = CacheKey::anecdotes();
        match self.cache.get::<WidgetSnapshot>(key).await? {
            Some(snapshot) if !snapshot.is_stale() => Ok(Some(snapshot)),
            Some(_) => {
                // Stale schema version, delete and return miss
                let _ = self.cache.del(key).await;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub async fn set_snapshot(&self, anecdotes: Vec<SnapshotEntry>) -> CacheResult<WidgetSnapshot> {
        let snapshot = WidgetSnapshot::new(anecdotes);
        self.cache.set(CacheKey::anecdotes(), &snapshot).await?;
        debug!(count = snapshot.anecdotes.len(), "Widget snapshot written");
        Ok(snapshot)
    }
}
