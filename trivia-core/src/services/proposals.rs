//! User-submitted anecdotes
//!
//! Proposals land in the content collection as `pending` with the sentinel
//! category id `"pending"`; moderation happens outside the app.

use crate::domain::{Account, ItemStatus, Language, NewContentItem};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::ContentStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use validator::{Validate, ValidationError};

pub const QUESTION_MAX_CHARS: usize = 200;
pub const ANSWER_MAX_CHARS: usize = 500;
pub const PENDING_CATEGORY_ID: &str = "pending";

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProposalForm {
    #[validate(custom(function = "not_blank"), length(max = 200))]
    pub question: String,

    #[validate(custom(function = "not_blank"), length(max = 500))]
    pub answer: String,

    #[validate(custom(function = "not_blank"))]
    pub category_label: String,

    pub language: Language,
}

impl ProposalForm {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn select_category(&mut self, label: impl Into<String>) {
        self.category_label = label.into();
    }

    /// Categories are per language, so a language change drops the pick
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            self.category_label.clear();
        }
    }

    /// Every failing field at once
    pub fn check(&self) -> Result<(), ProposalErrors> {
        match self.validate() {
            Ok(()) => Ok(()),
            Err(errors) => {
                let fields = errors.field_errors();
                Err(ProposalErrors {
                    question: fields.contains_key("question"),
                    answer: fields.contains_key("answer"),
                    category: fields.contains_key("category_label"),
                })
            }
        }
    }

    fn into_new_item(self, author: &Account) -> NewContentItem {
        let now = Utc::now();
        let category_label = self.category_label.trim().to_string();
        NewContentItem {
            question: self.question.trim().to_string(),
            answer: self.answer.trim().to_string(),
            language: self.language.as_str().to_string(),
            category_id: PENDING_CATEGORY_ID.to_string(),
            category_label,
            status: ItemStatus::Pending,
            created_by: author.uid.clone(),
            author_email: author.email.clone(),
            like_count: 0,
            dislike_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Per-field error flags for the form
#[derive(Error, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[error("invalid proposal (question: {question}, answer: {answer}, category: {category})")]
pub struct ProposalErrors {
    pub question: bool,
    pub answer: bool,
    pub category: bool,
}

impl ProposalErrors {
    pub fn any(&self) -> bool {
        self.question || self.answer || self.category
    }
}

impl From<ProposalErrors> for ServiceError {
    fn from(errors: ProposalErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

#[derive(Clone)]
pub struct ProposalService {
    content: Arc<dyn ContentStore>,
}

impl ProposalService {
    pub fn new(content: Arc<dyn ContentStore>) -> Self {
        Self { content }
    }

    /// Store the proposal and return the new item id
    pub async fn submit(
        &self,
        author: Option<&Account>,
        form: ProposalForm,
    ) -> ServiceResult<String> {
        let author = author.ok_or(ServiceError::Unauthenticated)?;
        form.check()?;

        let id = self.content.create_item(form.into_new_item(author)).await?;
        info!(item_id = %id, uid = %author.uid, "Anecdote proposed");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn author() -> Account {
        Account {
            uid: "u1".into(),
            email: Some("ada@example.com".into()),
        }
    }

    fn filled() -> ProposalForm {
        ProposalForm {
            question: "  Why is the sky blue? ".into(),
            answer: " Rayleigh scattering ".into(),
            category_label: " Science ".into(),
            language: Language::En,
        }
    }

    #[test]
    fn test_blank_fields_flagged_together() {
        let form = ProposalForm {
            question: "   ".into(),
            answer: String::new(),
            category_label: String::new(),
            language: Language::Fr,
        };

        let errors = form.check().unwrap_err();
        assert!(errors.question && errors.answer && errors.category);
    }

    #[test]
    fn test_length_limits() {
        let mut form = filled();
        form.question = "q".repeat(QUESTION_MAX_CHARS + 1);
        form.answer = "a".repeat(ANSWER_MAX_CHARS);

        let errors = form.check().unwrap_err();
        assert!(errors.question);
        assert!(!errors.answer);
        assert!(!errors.category);
    }

    #[test]
    fn test_language_change_clears_category() {
        let mut form = filled();
        form.set_language(Language::En);
        assert_eq!(form.category_label, " Science ");

        form.set_language(Language::Fr);
        assert!(form.category_label.is_empty());
        assert!(form.check().unwrap_err().category);
    }

    #[tokio::test]
    async fn test_submit_creates_pending_item() {
        let store = Arc::new(InMemoryStore::new());
        let service = ProposalService::new(store.clone());

        let id = service.submit(Some(&author()), filled()).await.unwrap();

        let item = store.item(&id).unwrap();
        assert_eq!(item.question, "Why is the sky blue?");
        assert_eq!(item.answer, "Rayleigh scattering");
        assert_eq!(item.category_label, "Science");
        assert_eq!(item.category_id.as_deref(), Some(PENDING_CATEGORY_ID));
        assert_eq!(item.status, ItemStatus::Pending);
        assert_eq!(item.created_by.as_deref(), Some("u1"));
        assert_eq!(item.like_count, 0);
    }

    #[tokio::test]
    async fn test_submit_requires_account() {
        let service = ProposalService::new(Arc::new(InMemoryStore::new()));

        let result = service.submit(None, filled()).await;

        assert!(matches!(result, Err(ServiceError::Unauthenticated)));
    }

    #[tokio::test]
    async fn test_invalid_form_not_stored() {
        let store = Arc::new(InMemoryStore::new());
        let service = ProposalService::new(store.clone());
        let mut form = filled();
        form.answer = " ".into();

        let result = service.submit(Some(&author()), form).await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
        assert_eq!(store.query_calls(), 0);
        assert!(store.item("item-1").is_none());
    }
}
