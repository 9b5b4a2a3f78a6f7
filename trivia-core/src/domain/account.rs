use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed-in account as reported by the auth provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    pub email: Option<String>,
}

/// App language; content and categories are filtered on it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::En => "en",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fr" => Ok(Language::Fr),
            "en" => Ok(Language::En),
            other => Err(format!("unsupported language: {}", other)),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User-facing settings shared by every screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub language: Language,
    pub is_dark_mode: bool,
    pub theme_color: String,
}

impl Settings {
    pub const DEFAULT_THEME_COLOR: &'static str = "#FF6B81";

    /// Overlay the fields present in `patch`
    pub fn merged(&self, patch: &SettingsPatch) -> Settings {
        Settings {
            language: patch.language.unwrap_or(self.language),
            is_dark_mode: patch.is_dark_mode.unwrap_or(self.is_dark_mode),
            theme_color: patch
                .theme_color
                .clone()
                .unwrap_or_else(|| self.theme_color.clone()),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: Language::Fr,
            is_dark_mode: false,
            theme_color: Self::DEFAULT_THEME_COLOR.to_string(),
        }
    }
}

/// Partial settings as stored in the user document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dark_mode: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_color: Option<String>,
}

impl SettingsPatch {
    pub fn language(language: Language) -> Self {
        Self {
            language: Some(language),
            ..Default::default()
        }
    }

    /// Overlay `other` on top of `self`
    pub fn merge(&mut self, other: SettingsPatch) {
        if other.language.is_some() {
            self.language = other.language;
        }
        if other.is_dark_mode.is_some() {
            self.is_dark_mode = other.is_dark_mode;
        }
        if other.theme_color.is_some() {
            self.theme_color = other.theme_color;
        }
    }
}

impl From<&Settings> for SettingsPatch {
    fn from(settings: &Settings) -> Self {
        Self {
            language: Some(settings.language),
            is_dark_mode: Some(settings.is_dark_mode),
            theme_color: Some(settings.theme_color.clone()),
        }
    }
}

/// Subscription block of the user document (`abonnement`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub premium: Option<String>,
}

/// Remote user document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub settings: Option<SettingsPatch>,
    #[serde(default, rename = "abonnement")]
    pub subscription: Option<Subscription>,
    #[serde(default, rename = "liked_items")]
    pub liked_items: Vec<String>,
    #[serde(default, rename = "disliked_items")]
    pub disliked_items: Vec<String>,
}

impl UserDocument {
    pub fn new(email: Option<String>) -> Self {
        Self {
            email,
            created_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    pub fn premium_status(&self) -> Option<&str> {
        self.subscription.as_ref()?.premium.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merged_keeps_absent_fields() {
        let base = Settings {
            language: Language::En,
            is_dark_mode: true,
            theme_color: "#000000".into(),
        };
        let merged = base.merged(&SettingsPatch {
            theme_color: Some("#FFFFFF".into()),
            ..Default::default()
        });

        assert_eq!(merged.language, Language::En);
        assert!(merged.is_dark_mode);
        assert_eq!(merged.theme_color, "#FFFFFF");
    }

    #[test]
    fn test_language_parse() {
        assert_eq!("EN".parse::<Language>().unwrap(), Language::En);
        assert_eq!(" fr ".parse::<Language>().unwrap(), Language::Fr);
        assert!("de".parse::<Language>().is_err());
    }

    #[test]
    fn test_user_document_subscription_field() {
        let doc: UserDocument =
            serde_json::from_str(r#"{"email":"a@b.c","abonnement":{"premium":"active"}}"#)
                .unwrap();
        assert_eq!(doc.premium_status(), Some("active"));
        assert!(doc.liked_items.is_empty());
    }
}
