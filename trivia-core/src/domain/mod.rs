pub mod account;
pub mod models;
pub mod support;

pub use account::{Account, Language, Settings, SettingsPatch, Subscription, UserDocument};
pub use models::{Category, ContentItem, ItemStatus, NewContentItem, ReactionKind};
pub use support::{ContactMessage, DeletionKind, DeletionRequest, RequestStatus};
