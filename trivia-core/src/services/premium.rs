//! Premium entitlement
//!
//! A user is premium when their document carries `abonnement.premium ==
//! "active"`. Anything else, including a failed lookup, means free tier.

use crate::error::{ServiceError, ServiceResult};
use crate::repository::UserStore;
use std::sync::Arc;
use tracing::{info, warn};

pub const PREMIUM_ACTIVE: &str = "active";

/// External purchase flow. Returns once the platform confirms the entitlement.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait EntitlementPurchaser: Send + Sync {
    async fn purchase_premium(&self, uid: &str) -> ServiceResult<()>;
}

#[derive(Clone)]
pub struct PremiumService {
    users: Arc<dyn UserStore>,
    purchaser: Arc<dyn EntitlementPurchaser>,
}

impl PremiumService {
    pub fn new(users: Arc<dyn UserStore>, purchaser: Arc<dyn EntitlementPurchaser>) -> Self {
        Self { users, purchaser }
    }

    pub async fn is_premium(&self, uid: Option<&str>) -> bool {
        let Some(uid) = uid else {
            return false;
        };
        match self.users.get_user(uid).await {
            Ok(Some(doc)) => doc.premium_status() == Some(PREMIUM_ACTIVE),
            Ok(None) => false,
            Err(e) => {
                warn!(uid = %uid, error = %e, "Failed to check premium status");
                false
            }
        }
    }

    pub async fn shows_ads(&self, uid: Option<&str>) -> bool {
        !self.is_premium(uid).await
    }

    /// Run the purchase flow, then mark the user premium
    pub async fn purchase(&self, uid: Option<&str>) -> ServiceResult<()> {
        let uid = uid.ok_or(ServiceError::Unauthenticated)?;
        self.purchaser.purchase_premium(uid).await?;
        self.users.set_premium_status(uid, PREMIUM_ACTIVE).await?;
        info!(uid = %uid, "Premium activated");
        Ok(())
    }
}
