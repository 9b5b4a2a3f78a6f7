//! Process-wide user settings
//!
//! One `Settings` value behind a watch channel. Load order:
//! - defaults
//! - the language kept in the on-device store (survives sign-out)
//! - the `settings` map of the signed-in user's document, which wins
//!
//! Updates apply locally first and then persist to both stores; persistence
//! failures are logged and the in-memory value stays. Loads and updates are
//! serialized, and a load only overwrites the fields it actually read.

use super::auth::AuthState;
use crate::domain::{Language, Settings, SettingsPatch};
use crate::error::{ServiceError, ServiceResult};
use crate::repository::{LocalSettingsStore, UserStore};
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// On-device key holding the language code
pub const LANGUAGE_KEY: &str = "userLanguage";

pub struct SettingsStore {
    state: watch::Sender<Settings>,
    local: Arc<dyn LocalSettingsStore>,
    users: Arc<dyn UserStore>,
    auth: watch::Receiver<AuthState>,
    writes: Mutex<()>,
}

impl SettingsStore {
    pub fn new(
        defaults: Settings,
        local: Arc<dyn LocalSettingsStore>,
        users: Arc<dyn UserStore>,
        auth: watch::Receiver<AuthState>,
    ) -> Self {
        let (state, _) = watch::channel(defaults);
        Self {
            state,
            local,
            users,
            auth,
            writes: Mutex::new(()),
        }
    }

    pub fn current(&self) -> Settings {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.state.subscribe()
    }

    fn signed_in_uid(&self) -> Option<String> {
        self.auth.borrow().uid().map(str::to_string)
    }

    /// Re-read both stores and publish the result
    pub async fn load(&self) -> Settings {
        let _writes = self.writes.lock().await;
        let mut loaded = SettingsPatch::default();

        match self.local.get(LANGUAGE_KEY).await {
            Ok(Some(code)) => match code.parse::<Language>() {
                Ok(language) => loaded.language = Some(language),
                Err(e) => warn!(value = %code, error = %e, "Ignoring stored language"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read local settings"),
        }

        if let Some(uid) = self.signed_in_uid() {
            match self.users.get_user(&uid).await {
                Ok(Some(doc)) => {
                    if let Some(remote) = doc.settings {
                        loaded.merge(remote);
                    }
                }
                Ok(None) => debug!(uid = %uid, "No user document for settings"),
                Err(e) => warn!(uid = %uid, error = %e, "Failed to read remote settings"),
            }
        }

        self.state.send_modify(|settings| *settings = settings.merged(&loaded));
        self.current()
    }

    pub async fn update_language(&self, language: Language) -> Settings {
        self.apply(SettingsPatch::language(language)).await
    }

    pub async fn update_dark_mode(&self, is_dark_mode: bool) -> Settings {
        self.apply(SettingsPatch {
            is_dark_mode: Some(is_dark_mode),
            ..Default::default()
        })
        .await
    }

    /// Accepts `#RRGGBB`
    pub async fn update_theme_color(&self, theme_color: &str) -> ServiceResult<Settings> {
        if !is_hex_color(theme_color) {
            return Err(ServiceError::Validation(format!(
                "invalid theme color: {}",
                theme_color
            )));
        }
        Ok(self
            .apply(SettingsPatch {
                theme_color: Some(theme_color.to_ascii_uppercase()),
                ..Default::default()
            })
            .await)
    }

    async fn apply(&self, patch: SettingsPatch) -> Settings {
        let _writes = self.writes.lock().await;
        let next = self.current().merged(&patch);
        self.state.send_replace(next.clone());
        self.persist(&next).await;
        next
    }

    async fn persist(&self, settings: &Settings) {
        if let Err(e) = self
            .local
            .set(LANGUAGE_KEY, settings.language.as_str())
            .await
        {
            warn!(error = %e, "Failed to save local settings");
        }

        if let Some(uid) = self.signed_in_uid() {
            if let Err(e) = self
                .users
                .merge_settings(&uid, SettingsPatch::from(settings))
                .await
            {
                warn!(uid = %uid, error = %e, "Failed to save remote settings");
            }
        }
    }

    /// Reload whenever the auth state changes. Ends when the session is dropped.
    pub fn spawn_auth_listener(self: &Arc<Self>) -> JoinHandle<()> {
        let store = Arc::clone(self);
        let mut auth = self.auth.clone();
        auth.borrow_and_update();
        tokio::spawn(async move {
            while auth.changed().await.is_ok() {
                let uid = auth.borrow_and_update().uid().map(str::to_string);
                debug!(uid = ?uid, "Auth state changed, reloading settings");
                store.load().await;
            }
        })
    }
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}
