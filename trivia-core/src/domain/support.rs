use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Support requests wait for a human in the back office
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
}

/// Document of the `contact-us` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub user_id: String,
    pub user_email: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub status: RequestStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionKind {
    #[default]
    DataDeletion,
}

/// Document of the `delete-data-requests` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    pub user_id: String,
    pub user_email: Option<String>,
    pub request_date: DateTime<Utc>,
    pub status: RequestStatus,
    #[serde(rename = "type")]
    pub kind: DeletionKind,
}
