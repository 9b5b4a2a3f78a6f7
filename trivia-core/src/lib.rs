//! Did You Know? client core
//!
//! Everything below the rendering layer of the trivia app:
//! - paginated feed of anecdotes and the swipe review loop
//! - like / dislike reactions against the remote document store
//! - settings, account session and premium entitlement
//! - anecdote proposals and the home-screen widget bridge

pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod repository;
pub mod services;
pub mod telemetry;

pub use config::Config;
pub use context::{AppContext, Backends};
pub use error::{AuthErrorKind, ServiceError, ServiceResult};
