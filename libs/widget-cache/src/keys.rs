//! Shared storage key schema
//!
//! The widget extension reads these keys verbatim, so they carry no version
//! prefix. Structural changes are tracked by `schema_version` inside the blobs.

/// App group the host app and the widget extension share
pub const DEFAULT_APP_GROUP: &str = "group.com.anisse3000.didyouknow";

/// Shared cache key builder
pub struct CacheKey;

impl CacheKey {
    /// Widget configuration blob
    /// Format: widget_configuration
    pub fn widget_configuration() -> &'static str {
        "widget_configuration"
    }

    /// Anecdote snapshot blob
    /// Format: anecdotes_cache
    pub fn anecdotes() -> &'static str {
        "anecdotes_cache"
    }

    /// Keys are used as file names by the file-backed store
    pub fn is_valid(key: &str) -> bool {
        !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_keys_are_valid() {
        assert!(CacheKey::is_valid(CacheKey::widget_configuration()));
        assert!(CacheKey::is_valid(CacheKey::anecdotes()));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        assert!(!CacheKey::is_valid(""));
        assert!(!CacheKey::is_valid("../etc/passwd"));
        assert!(!CacheKey::is_valid("a/b"));
        assert!(!CacheKey::is_valid(".hidden"));
    }
}
