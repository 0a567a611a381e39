use async_trait::async_trait;
use tracing::info;

use super::{Result, SubscriptionProvider};
use crate::web::types::ValidEmail;

/// Used when no email service is configured: the subscriber only shows up in the logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnly;

#[async_trait]
impl SubscriptionProvider for LogOnly {
    fn name(&self) -> &'static str {
        "log-only"
    }

    async fn try_subscribe(&self, email: &ValidEmail) -> Result<()> {
        info!(%email, "New subscription (no email service configured)");
        Ok(())
    }
}
