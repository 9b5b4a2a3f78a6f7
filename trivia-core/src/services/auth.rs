//! Account session
//!
//! The session is a watch channel over `AuthState`; every screen derives its
//! route from the current value and nothing else.

use crate::domain::{Account, Language, SettingsPatch, UserDocument};
use crate::error::{AuthErrorKind, ServiceError, ServiceResult};
use crate::repository::UserStore;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// Provider has not reported yet
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Account),
}

impl AuthState {
    pub fn account(&self) -> Option<&Account> {
        match self {
            AuthState::SignedIn(account) => Some(account),
            _ => None,
        }
    }

    pub fn uid(&self) -> Option<&str> {
        self.account().map(|account| account.uid.as_str())
    }

    pub fn route(&self) -> Route {
        match self {
            AuthState::Unknown => Route::Splash,
            AuthState::SignedOut => Route::Auth,
            AuthState::SignedIn(_) => Route::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Splash,
    Auth,
    Home,
}

/// Rejection reported by the auth provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthFailure {
    pub kind: AuthErrorKind,
    pub message: String,
}

impl AuthFailure {
    pub fn new(kind: AuthErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Build from a provider error code such as `auth/user-not-found`
    pub fn from_code(code: &str) -> Self {
        Self::new(AuthErrorKind::from_code(code), code)
    }
}

impl From<AuthFailure> for ServiceError {
    fn from(failure: AuthFailure) -> Self {
        ServiceError::Auth {
            kind: failure.kind,
            message: failure.message,
        }
    }
}

/// External identity provider
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait AuthProvider: Send + Sync {
    /// Account restored from a previous session, if any
    async fn current_user(&self) -> Option<Account>;
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthFailure>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<Account, AuthFailure>;
    async fn sign_out(&self) -> Result<(), AuthFailure>;
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthFailure>;
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,

    /// Language picked on the auth screen
    pub language: Language,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignUpRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,

    pub confirm_password: String,

    pub language: Language,
}

#[derive(Debug, Validate)]
struct ResetRequest {
    #[validate(email)]
    email: String,
}

fn check<T: Validate>(request: &T) -> ServiceResult<()> {
    match request.validate() {
        Ok(()) => Ok(()),
        Err(errors) if errors.field_errors().contains_key("email") => Err(ServiceError::auth(
            AuthErrorKind::InvalidEmail,
            "invalid email address",
        )),
        Err(errors) => Err(errors.into()),
    }
}

pub struct AuthSession {
    provider: Arc<dyn AuthProvider>,
    users: Arc<dyn UserStore>,
    state: watch::Sender<AuthState>,
}

impl AuthSession {
    pub fn new(provider: Arc<dyn AuthProvider>, users: Arc<dyn UserStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Unknown);
        Self {
            provider,
            users,
            state,
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn route(&self) -> Route {
        self.state.borrow().route()
    }

    /// Resolve `Unknown` from the provider's persisted session
    pub async fn restore(&self) -> AuthState {
        let next = match self.provider.current_user().await {
            Some(account) => AuthState::SignedIn(account),
            None => AuthState::SignedOut,
        };
        self.state.send_replace(next.clone());
        next
    }

    pub async fn sign_in(&self, mut request: SignInRequest) -> ServiceResult<Account> {
        request.email = request.email.trim().to_string();
        check(&request)?;
        let account = self
            .provider
            .sign_in(&request.email, &request.password)
            .await?;
        info!(uid = %account.uid, "Signed in");

        self.save_language(&account.uid, request.language).await;
        self.state.send_replace(AuthState::SignedIn(account.clone()));
        Ok(account)
    }

    /// Create the account, its user document and initial language setting
    pub async fn sign_up(&self, mut request: SignUpRequest) -> ServiceResult<Account> {
        request.email = request.email.trim().to_string();
        check(&request)?;
        if request.password != request.confirm_password {
            return Err(ServiceError::auth(
                AuthErrorKind::PasswordMismatch,
                "passwords do not match",
            ));
        }

        let email = request.email.as_str();
        let account = self.provider.sign_up(email, &request.password).await?;
        info!(uid = %account.uid, "Account created");

        let doc_email = account.email.clone().unwrap_or_else(|| email.to_string());
        let doc = UserDocument::new(Some(doc_email));
        if let Err(e) = self.users.put_user(&account.uid, doc).await {
            warn!(uid = %account.uid, error = %e, "Failed to create user document");
        }
        self.save_language(&account.uid, request.language).await;

        self.state.send_replace(AuthState::SignedIn(account.clone()));
        Ok(account)
    }

    pub async fn sign_out(&self) -> ServiceResult<()> {
        self.provider.sign_out().await?;
        self.state.send_replace(AuthState::SignedOut);
        info!("Signed out");
        Ok(())
    }

    pub async fn reset_password(&self, email: &str) -> ServiceResult<()> {
        let email = email.trim();
        check(&ResetRequest {
            email: email.to_string(),
        })?;
        self.provider.send_password_reset(email).await?;
        Ok(())
    }

    async fn save_language(&self, uid: &str, language: Language) {
        if let Err(e) = self
            .users
            .merge_settings(uid, SettingsPatch::language(language))
            .await
        {
            warn!(uid = %uid, error = %e, "Failed to save language preference");
        }
    }
}

/// In-process identity provider
#[derive(Default)]
pub struct InMemoryAuthProvider {
    inner: Mutex<ProviderState>,
}

#[derive(Default)]
struct ProviderState {
    accounts: HashMap<String, (Account, String)>,
    current: Option<Account>,
}

impl InMemoryAuthProvider {
    /// Passwords shorter than this are rejected as weak
    pub const MIN_PASSWORD_LEN: usize = 6;

    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, ProviderState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait::async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn current_user(&self) -> Option<Account> {
        self.state().current.clone()
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthFailure> {
        let mut state = self.state();
        let (account, stored) = state
            .accounts
            .get(&email.to_lowercase())
            .cloned()
            .ok_or_else(|| AuthFailure::from_code("auth/user-not-found"))?;
        if stored != password {
            return Err(AuthFailure::from_code("auth/wrong-password"));
        }
        state.current = Some(account.clone());
        Ok(account)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Account, AuthFailure> {
        if password.chars().count() < Self::MIN_PASSWORD_LEN {
            return Err(AuthFailure::from_code("auth/weak-password"));
        }
        let mut state = self.state();
        let key = email.to_lowercase();
        if state.accounts.contains_key(&key) {
            return Err(AuthFailure::from_code("auth/email-already-in-use"));
        }
        let account = Account {
            uid: Uuid::new_v4().to_string(),
            email: Some(email.to_string()),
        };
        state
            .accounts
            .insert(key, (account.clone(), password.to_string()));
        state.current = Some(account.clone());
        Ok(account)
    }

    async fn sign_out(&self) -> Result<(), AuthFailure> {
        self.state().current = None;
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthFailure> {
        if self.state().accounts.contains_key(&email.to_lowercase()) {
            Ok(())
        } else {
            Err(AuthFailure::from_code("auth/user-not-found"))
        }
    }
}
