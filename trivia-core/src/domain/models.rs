use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Moderation status of an anecdote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Active,
    Rejected,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Pending => "pending",
            ItemStatus::Active => "active",
            ItemStatus::Rejected => "rejected",
        }
    }
}

/// One question/answer anecdote as stored remotely.
///
/// Every field except `id` tolerates absence: documents written by older
/// clients or half-moderated proposals still render, with blanks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    pub id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub like_count: i64,
    #[serde(default)]
    pub dislike_count: i64,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_label: String,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    pub fn counter(&self, kind: ReactionKind) -> i64 {
        match kind {
            ReactionKind::Like => self.like_count,
            ReactionKind::Dislike => self.dislike_count,
        }
    }
}

/// Anecdote proposed by a user, before the store assigns an id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContentItem {
    pub question: String,
    pub answer: String,
    pub language: String,
    pub category_id: String,
    pub category_label: String,
    pub status: ItemStatus,
    pub created_by: String,
    pub author_email: Option<String>,
    pub like_count: i64,
    pub dislike_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewContentItem {
    pub fn into_item(self, id: String) -> ContentItem {
        ContentItem {
            id,
            question: self.question,
            answer: self.answer,
            like_count: self.like_count,
            dislike_count: self.dislike_count,
            language: self.language,
            category_id: Some(self.category_id),
            category_label: self.category_label,
            status: self.status,
            created_by: Some(self.created_by),
            created_at: Some(self.created_at),
            updated_at: Some(self.updated_at),
        }
    }
}

/// Feed category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Like or dislike on a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Dislike,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Dislike => "dislike",
        }
    }

    /// User document field holding the reaction history (`{kind}d_items`)
    pub fn history_field(&self) -> &'static str {
        match self {
            ReactionKind::Like => "liked_items",
            ReactionKind::Dislike => "disliked_items",
        }
    }

    /// Item document counter field (`{kind}Count`)
    pub fn counter_field(&self) -> &'static str {
        match self {
            ReactionKind::Like => "likeCount",
            ReactionKind::Dislike => "dislikeCount",
        }
    }
}

impl std::fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_with_missing_fields_deserializes_blank() {
        let item: ContentItem = serde_json::from_str(r#"{"id":"a1","question":"Q?"}"#).unwrap();

        assert_eq!(item.question, "Q?");
        assert_eq!(item.answer, "");
        assert_eq!(item.like_count, 0);
        assert_eq!(item.category_id, None);
        assert_eq!(item.status, ItemStatus::Pending);
    }

    #[test]
    fn test_item_field_names() {
        let item: ContentItem = serde_json::from_str(
            r#"{"id":"a1","likeCount":4,"dislikeCount":1,"categoryId":"c1","categoryLabel":"Science","status":"active"}"#,
        )
        .unwrap();

        assert_eq!(item.counter(ReactionKind::Like), 4);
        assert_eq!(item.counter(ReactionKind::Dislike), 1);
        assert_eq!(item.category_id.as_deref(), Some("c1"));
        assert_eq!(item.status, ItemStatus::Active);
    }

    #[test]
    fn test_reaction_field_names() {
        assert_eq!(ReactionKind::Like.history_field(), "liked_items");
        assert_eq!(ReactionKind::Dislike.history_field(), "disliked_items");
        assert_eq!(ReactionKind::Like.counter_field(), "likeCount");
        assert_eq!(ReactionKind::Dislike.counter_field(), "dislikeCount");
    }
}
