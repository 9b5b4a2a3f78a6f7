//! Reaction recording (like / dislike)
//!
//! One reaction is two independent remote updates:
//! - append the item id to the user's `{kind}d_items` history
//! - increment the item's `{kind}Count`
//!
//! Either may fail without affecting the other. Nothing is retried.

use crate::domain::ReactionKind;
use crate::repository::{ContentStore, UserStore};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Result of one of the two reaction effects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectStatus {
    Applied,
    /// Not attempted (no signed-in user for the history append)
    Skipped,
    Failed(String),
}

impl EffectStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, EffectStatus::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    pub item_id: String,
    pub kind: ReactionKind,
    pub history: EffectStatus,
    pub counter: EffectStatus,
}

impl ReactionOutcome {
    pub fn is_complete(&self) -> bool {
        !self.history.is_failed() && !self.counter.is_failed()
    }
}

#[derive(Clone)]
pub struct ReactionService {
    content: Arc<dyn ContentStore>,
    users: Arc<dyn UserStore>,
}

impl ReactionService {
    pub fn new(content: Arc<dyn ContentStore>, users: Arc<dyn UserStore>) -> Self {
        Self { content, users }
    }

    /// Apply both effects concurrently and report each one
    pub async fn record_reaction(
        &self,
        user_id: Option<&str>,
        item_id: &str,
        kind: ReactionKind,
    ) -> ReactionOutcome {
        let history = async {
            match user_id {
                Some(uid) => match self.users.append_history(uid, item_id, kind).await {
                    Ok(()) => EffectStatus::Applied,
                    Err(e) => EffectStatus::Failed(e.to_string()),
                },
                None => EffectStatus::Skipped,
            }
        };
        let counter = async {
            match self.content.increment_counter(item_id, kind).await {
                Ok(()) => EffectStatus::Applied,
                Err(e) => EffectStatus::Failed(e.to_string()),
            }
        };
        let (history, counter) = tokio::join!(history, counter);

        ReactionOutcome {
            item_id: item_id.to_string(),
            kind,
            history,
            counter,
        }
    }

    /// Fire-and-forget variant. Failures are logged; dropping the handle
    /// does not cancel the task.
    pub fn spawn_detached(
        &self,
        user_id: Option<String>,
        item_id: String,
        kind: ReactionKind,
    ) -> JoinHandle<ReactionOutcome> {
        let service = self.clone();
        tokio::spawn(async move {
            let outcome = service
                .record_reaction(user_id.as_deref(), &item_id, kind)
                .await;
            if let EffectStatus::Failed(error) = &outcome.history {
                warn!(item_id = %item_id, kind = %kind, error = %error, "Failed to append reaction history");
            }
            if let EffectStatus::Failed(error) = &outcome.counter {
                warn!(item_id = %item_id, kind = %kind, error = %error, "Failed to increment reaction counter");
            }
            if outcome.is_complete() {
                debug!(item_id = %item_id, kind = %kind, "Reaction recorded");
            }
            outcome
        })
    }
}
