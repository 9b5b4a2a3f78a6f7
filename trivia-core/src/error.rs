/// Error types for the client core
use crate::repository::StoreError;
use thiserror::Error;

/// Why the auth provider rejected a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidEmail,
    WrongPassword,
    UserNotFound,
    EmailInUse,
    WeakPassword,
    PasswordMismatch,
    TooManyRequests,
    Network,
    Other,
}

impl AuthErrorKind {
    /// Map a provider error code (`auth/...`) to a kind
    pub fn from_code(code: &str) -> Self {
        match code {
            "auth/invalid-email" => AuthErrorKind::InvalidEmail,
            "auth/wrong-password" | "auth/invalid-credential" => AuthErrorKind::WrongPassword,
            "auth/user-not-found" => AuthErrorKind::UserNotFound,
            "auth/email-already-in-use" => AuthErrorKind::EmailInUse,
            "auth/weak-password" => AuthErrorKind::WeakPassword,
            "auth/too-many-requests" => AuthErrorKind::TooManyRequests,
            "auth/network-request-failed" => AuthErrorKind::Network,
            _ => AuthErrorKind::Other,
        }
    }
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Widget cache error: {0}")]
    Cache(#[from] widget_cache::CacheError),

    #[error("Auth error ({kind:?}): {message}")]
    Auth { kind: AuthErrorKind, message: String },

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn auth(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        ServiceError::Auth {
            kind,
            message: message.into(),
        }
    }

    /// Network-class failures the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ServiceError::Store(StoreError::Unavailable(_))
                | ServiceError::Auth {
                    kind: AuthErrorKind::Network,
                    ..
                }
        )
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ServiceError::Validation(errors.to_string())
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_code_mapping() {
        assert_eq!(
            AuthErrorKind::from_code("auth/email-already-in-use"),
            AuthErrorKind::EmailInUse
        );
        assert_eq!(
            AuthErrorKind::from_code("auth/invalid-credential"),
            AuthErrorKind::WrongPassword
        );
        assert_eq!(AuthErrorKind::from_code("auth/unknown"), AuthErrorKind::Other);
    }

    #[test]
    fn test_retryable() {
        let err = ServiceError::from(StoreError::Unavailable("timeout".into()));
        assert!(err.is_retryable());
        assert!(!ServiceError::Unauthenticated.is_retryable());
    }
}
