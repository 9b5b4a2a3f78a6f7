pub mod auth;
pub mod categories;
pub mod feed;
pub mod gesture;
pub mod home;
pub mod premium;
pub mod proposals;
pub mod reactions;
pub mod review;
pub mod settings;
pub mod support;
pub mod widget;

pub use auth::{
    AuthFailure, AuthProvider, AuthSession, AuthState, InMemoryAuthProvider, Route, SignInRequest,
    SignUpRequest,
};
pub use categories::CategoryService;
pub use feed::{Cursor, Feed, FeedFilter, FeedLoader, Page};
pub use gesture::{DragRelease, GestureState, GestureTracker, SwipeDirection};
pub use home::{AdvanceOutcome, FeedEvent, HomeFeed, HomeOptions, SwipeResult};
pub use premium::{EntitlementPurchaser, PremiumService};
pub use proposals::{ProposalErrors, ProposalForm, ProposalService};
pub use reactions::{EffectStatus, ReactionOutcome, ReactionService};
pub use review::{ReviewPhase, ReviewState};
pub use settings::SettingsStore;
pub use support::{ContactForm, SupportService};
pub use widget::WidgetBridge;
