/// Configuration management for the client core
///
/// Loads configuration from environment variables (and a `.env` file when present).
use crate::domain::Language;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Home feed and swipe settings
    pub feed: FeedConfig,
    /// Widget bridge settings
    pub widget: WidgetConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Default tracing directive
    pub log_level: String,
}

/// Home feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Prefetch the next page once the current card is this close to the end
    #[serde(default = "default_prefetch_margin")]
    pub prefetch_margin: usize,
    /// Fraction of viewport width a drag must cover to commit a swipe
    #[serde(default = "default_commit_threshold")]
    pub commit_threshold: f32,
    /// Content language before the user picks one
    #[serde(default)]
    pub default_language: Language,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            prefetch_margin: default_prefetch_margin(),
            commit_threshold: default_commit_threshold(),
            default_language: Language::default(),
        }
    }
}

/// Widget bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WidgetConfig {
    /// Root of the platform-shared storage area
    pub shared_dir: String,
    /// App group shared with the widget extension
    pub app_group: String,
    /// Anecdotes kept in the widget snapshot
    #[serde(default = "default_snapshot_size")]
    pub snapshot_size: usize,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            shared_dir: "./shared".to_string(),
            app_group: widget_cache::DEFAULT_APP_GROUP.to_string(),
            snapshot_size: default_snapshot_size(),
        }
    }
}

// Default values
fn default_page_size() -> usize {
    50
}

fn default_prefetch_margin() -> usize {
    5
}

fn default_commit_threshold() -> f32 {
    0.25
}

fn default_snapshot_size() -> usize {
    20
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let feed = FeedConfig {
            page_size: parse_var("FEED_PAGE_SIZE", default_page_size())?,
            prefetch_margin: parse_var("FEED_PREFETCH_MARGIN", default_prefetch_margin())?,
            commit_threshold: parse_var("SWIPE_COMMIT_THRESHOLD", default_commit_threshold())?,
            default_language: parse_var("DEFAULT_LANGUAGE", Language::default())?,
        };

        let widget = WidgetConfig {
            shared_dir: std::env::var("WIDGET_SHARED_DIR")
                .unwrap_or_else(|_| "./shared".to_string()),
            app_group: std::env::var("WIDGET_APP_GROUP")
                .unwrap_or_else(|_| widget_cache::DEFAULT_APP_GROUP.to_string()),
            snapshot_size: parse_var("WIDGET_SNAPSHOT_SIZE", default_snapshot_size())?,
        };

        let config = Config { app, feed, widget };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.page_size == 0 {
            bail!("FEED_PAGE_SIZE must be at least 1");
        }
        if !(self.feed.commit_threshold > 0.0 && self.feed.commit_threshold <= 1.0) {
            bail!(
                "SWIPE_COMMIT_THRESHOLD must be in (0, 1], got {}",
                self.feed.commit_threshold
            );
        }
        if self.widget.snapshot_size == 0 {
            bail!("WIDGET_SNAPSHOT_SIZE must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config {
            app: AppConfig {
                env: "development".into(),
                log_level: "info".into(),
            },
            feed: FeedConfig::default(),
            widget: WidgetConfig::default(),
        };

        assert!(config.validate().is_ok());
        assert_eq!(config.feed.page_size, 50);
        assert_eq!(config.feed.prefetch_margin, 5);
        assert_eq!(config.feed.commit_threshold, 0.25);
        assert_eq!(config.widget.snapshot_size, 20);
        assert_eq!(config.widget.app_group, "group.com.anisse3000.didyouknow");
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let config = Config {
            app: AppConfig {
                env: "test".into(),
                log_level: "debug".into(),
            },
            feed: FeedConfig {
                commit_threshold: 1.5,
                ..Default::default()
            },
            widget: WidgetConfig::default(),
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_env_reads_overrides() {
        std::env::set_var("FEED_PREFETCH_MARGIN", "3");
        std::env::set_var("DEFAULT_LANGUAGE", "en");

        let config = Config::from_env().unwrap();

        assert_eq!(config.feed.prefetch_margin, 3);
        assert_eq!(config.feed.default_language, Language::En);

        std::env::remove_var("FEED_PREFETCH_MARGIN");
        std::env::remove_var("DEFAULT_LANGUAGE");
    }
}
