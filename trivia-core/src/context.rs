//! Service wiring
//!
//! Builds every service from a `Config` and the external collaborators.

use crate::config::Config;
use crate::domain::{Account, Settings};
use crate::repository::{CategoryStore, ContentStore, LocalSettingsStore, SupportStore, UserStore};
use crate::services::{
    AuthProvider, AuthSession, CategoryService, EntitlementPurchaser, FeedFilter, FeedLoader,
    HomeFeed, HomeOptions, PremiumService, ProposalService, ReactionService, SettingsStore,
    SupportService, WidgetBridge,
};
use std::sync::Arc;
use tracing::info;
use widget_cache::{BlobStore, FileBlobStore, SharedCache, WidgetCache};

/// External collaborators the core talks to
#[derive(Clone)]
pub struct Backends {
    pub content: Arc<dyn ContentStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub users: Arc<dyn UserStore>,
    pub support: Arc<dyn SupportStore>,
    pub local: Arc<dyn LocalSettingsStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub purchaser: Arc<dyn EntitlementPurchaser>,
    pub widget_blobs: Arc<dyn BlobStore>,
}

/// File-backed shared storage under `widget.shared_dir/widget.app_group`
pub fn widget_blob_store(config: &Config) -> FileBlobStore {
    FileBlobStore::new(&config.widget.shared_dir, &config.widget.app_group)
}

pub struct AppContext {
    pub config: Config,
    pub session: AuthSession,
    pub settings: Arc<SettingsStore>,
    pub categories: CategoryService,
    pub proposals: ProposalService,
    pub premium: PremiumService,
    pub support: SupportService,
    pub widget: WidgetBridge,
    reactions: ReactionService,
    loader: FeedLoader,
}

impl AppContext {
    pub fn new(config: Config, backends: Backends) -> Self {
        let session = AuthSession::new(backends.auth, backends.users.clone());
        let defaults = Settings {
            language: config.feed.default_language,
            ..Settings::default()
        };
        let settings = Arc::new(SettingsStore::new(
            defaults,
            backends.local,
            backends.users.clone(),
            session.subscribe(),
        ));
        let widget = WidgetBridge::new(
            WidgetCache::new(SharedCache::new(backends.widget_blobs)),
            backends.content.clone(),
            config.widget.snapshot_size,
        );

        info!(
            env = %config.app.env,
            page_size = config.feed.page_size,
            "Client core initialized"
        );

        Self {
            categories: CategoryService::new(backends.categories),
            proposals: ProposalService::new(backends.content.clone()),
            premium: PremiumService::new(backends.users.clone(), backends.purchaser),
            support: SupportService::new(backends.support),
            reactions: ReactionService::new(backends.content.clone(), backends.users),
            loader: FeedLoader::new(backends.content, config.feed.page_size),
            config,
            session,
            settings,
            widget,
        }
    }

    /// Resolve the persisted session, load settings and keep them in sync
    /// with later sign-ins and sign-outs
    pub async fn start(&self) -> Settings {
        self.session.restore().await;
        let settings = self.settings.load().await;
        self.settings.spawn_auth_listener();
        settings
    }

    pub fn account(&self) -> Option<Account> {
        self.session.state().account().cloned()
    }

    /// Home loop for the current language, showing every category
    pub fn home_feed(&self, viewport_width: f32) -> HomeFeed {
        HomeFeed::new(
            self.loader.clone(),
            self.reactions.clone(),
            FeedFilter::all(self.settings.current().language),
            self.session.subscribe(),
            HomeOptions {
                prefetch_margin: self.config.feed.prefetch_margin,
                commit_threshold: self.config.feed.commit_threshold,
                viewport_width,
            },
        )
    }
}
