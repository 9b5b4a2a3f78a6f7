//! Contact messages and data-deletion requests
//!
//! Both land as `pending` documents for the back office; nothing in the app
//! reads them back.

use super::proposals::not_blank;
use crate::domain::{Account, ContactMessage, DeletionKind, DeletionRequest, RequestStatus};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::SupportStore;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(custom(function = "not_blank"))]
    pub subject: String,

    #[validate(custom(function = "not_blank"))]
    pub message: String,
}

impl ContactForm {
    pub fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }

    fn into_message(self, author: &Account) -> ContactMessage {
        ContactMessage {
            user_id: author.uid.clone(),
            user_email: author.email.clone(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            created_at: Utc::now(),
            status: RequestStatus::Pending,
        }
    }
}

#[derive(Clone)]
pub struct SupportService {
    store: Arc<dyn SupportStore>,
}

impl SupportService {
    pub fn new(store: Arc<dyn SupportStore>) -> Self {
        Self { store }
    }

    /// Store a contact message and return its id
    pub async fn send_contact(
        &self,
        author: Option<&Account>,
        form: ContactForm,
    ) -> ServiceResult<String> {
        form.validate()?;
        let author = author.ok_or(ServiceError::Unauthenticated)?;

        let id = self
            .store
            .create_contact_message(form.into_message(author))
            .await?;
        info!(request_id = %id, uid = %author.uid, "Contact message sent");
        Ok(id)
    }

    /// File a request to delete every piece of data held on the account
    pub async fn request_data_deletion(&self, author: Option<&Account>) -> ServiceResult<String> {
        let author = author.ok_or(ServiceError::Unauthenticated)?;

        let request = DeletionRequest {
            user_id: author.uid.clone(),
            user_email: author.email.clone(),
            request_date: Utc::now(),
            status: RequestStatus::Pending,
            kind: DeletionKind::DataDeletion,
        };
        let id = self.store.create_deletion_request(request).await?;
        info!(request_id = %id, uid = %author.uid, "Data deletion requested");
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryStore, MockSupportStore, Operation, StoreError};

    fn author() -> Account {
        Account {
            uid: "u1".into(),
            email: Some("ada@example.com".into()),
        }
    }

    #[tokio::test]
    async fn test_contact_message_is_trimmed_and_pending() {
        let store = Arc::new(InMemoryStore::new());
        let service = SupportService::new(store.clone());

        service
            .send_contact(Some(&author()), ContactForm::new("  Bug ", " Card stuck\n"))
            .await
            .unwrap();

        let messages = store.contact_messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].user_id, "u1");
        assert_eq!(messages[0].user_email.as_deref(), Some("ada@example.com"));
        assert_eq!(messages[0].subject, "Bug");
        assert_eq!(messages[0].message, "Card stuck");
        assert_eq!(messages[0].status, RequestStatus::Pending);
    }

    #[tokio::test]
    async fn test_blank_contact_fields_rejected() {
        let store = Arc::new(InMemoryStore::new());
        let service = SupportService::new(store.clone());

        let blank_subject = service
            .send_contact(Some(&author()), ContactForm::new("   ", "Hello"))
            .await;
        let blank_message = service
            .send_contact(Some(&author()), ContactForm::new("Hello", "\t"))
            .await;

        assert!(matches!(blank_subject, Err(ServiceError::Validation(_))));
        assert!(matches!(blank_message, Err(ServiceError::Validation(_))));
        assert!(store.contact_messages().is_empty());
    }

    #[tokio::test]
    async fn test_support_requires_account() {
        let store = Arc::new(InMemoryStore::new());
        let service = SupportService::new(store.clone());

        let contact = service
            .send_contact(None, ContactForm::new("Bug", "Card stuck"))
            .await;
        let deletion = service.request_data_deletion(None).await;

        assert!(matches!(contact, Err(ServiceError::Unauthenticated)));
        assert!(matches!(deletion, Err(ServiceError::Unauthenticated)));
        assert!(store.contact_messages().is_empty());
        assert!(store.deletion_requests().is_empty());
    }

    #[tokio::test]
    async fn test_deletion_request_recorded() {
        let store = Arc::new(InMemoryStore::new());
        let service = SupportService::new(store.clone());

        service.request_data_deletion(Some(&author())).await.unwrap();

        let requests = store.deletion_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].user_id, "u1");
        assert_eq!(requests[0].status, RequestStatus::Pending);
        assert_eq!(requests[0].kind, DeletionKind::DataDeletion);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let store = Arc::new(InMemoryStore::new());
        store.set_failing(Operation::CreateSupportRequest, true);
        let service = SupportService::new(store.clone());

        let result = service.request_data_deletion(Some(&author())).await;

        assert!(matches!(result, Err(ServiceError::Store(_))));
        assert!(store.deletion_requests().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_form_skips_store() {
        let mut store = MockSupportStore::new();
        store.expect_create_contact_message().never();
        let service = SupportService::new(Arc::new(store));

        let result = service
            .send_contact(Some(&author()), ContactForm::new("", ""))
            .await;

        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mock_store_id_returned() {
        let mut store = MockSupportStore::new();
        store
            .expect_create_contact_message()
            .withf(|message| message.subject == "Hi" && message.user_id == "u1")
            .times(1)
            .returning(|_| Ok("contact-7".to_string()));
        store
            .expect_create_deletion_request()
            .returning(|_| Err(StoreError::Unavailable("down".into())));
        let service = SupportService::new(Arc::new(store));

        let id = service
            .send_contact(Some(&author()), ContactForm::new(" Hi", "There"))
            .await
            .unwrap();
        let deletion = service.request_data_deletion(Some(&author())).await;

        assert_eq!(id, "contact-7");
        assert!(deletion.is_err());
    }
}
