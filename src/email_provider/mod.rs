//! Adapters for the email-marketing services a new subscriber can be forwarded to.
//!
//! Every adapter implements `SubscriptionProvider`. `SubscriptionProviders` holds the configured
//! ones in priority order, with the log-only fallback always last, and forwards a subscription
//! to the first of them.

mod log_only;
mod mailchimp;
mod mailerlite;

use std::{fmt::Debug, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;

use crate::web::types::ValidEmail;

pub use log_only::LogOnly;
pub use mailchimp::MailchimpClient;
pub use mailerlite::MailerLiteClient;

/// Message used when a provider rejects a subscriber without saying why.
pub const GENERIC_REJECTION: &str = "Subscription failed";

#[async_trait]
pub trait SubscriptionProvider: Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Registers `email` as a subscriber, making at most one outbound call.
    async fn try_subscribe(&self, email: &ValidEmail) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SubscriptionProviders(Vec<Arc<dyn SubscriptionProvider>>);

impl SubscriptionProviders {
    /// `configured` must be in priority order. The log-only fallback is appended so that there
    /// is always a provider to forward to.
    pub fn new(configured: Vec<Arc<dyn SubscriptionProvider>>) -> Self {
        let mut providers = configured;
        providers.push(Arc::new(LogOnly));
        Self(providers)
    }

    /// The provider that handles subscriptions: the first configured one wins.
    pub fn primary(&self) -> &dyn SubscriptionProvider {
        // `new` guarantees at least the fallback.
        self.0
            .first()
            .map(|provider| provider.as_ref())
            .unwrap_or(&LogOnly)
    }

    /// Provider names in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.0.iter().map(|provider| provider.name()).collect()
    }

    #[tracing::instrument(name = "Forwarding subscriber", skip_all, fields(provider = tracing::field::Empty))]
    pub async fn subscribe(&self, email: &ValidEmail) -> Result<()> {
        let provider = self.primary();
        tracing::Span::current().record("provider", provider.name());

        provider.try_subscribe(email).await
    }
}

/// The error bodies of the supported providers, flattened. MailerLite reports `message` (or
/// `error.message`), Mailchimp reports `detail`.
#[derive(Debug, Default, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
    detail: Option<String>,
    error: Option<NestedError>,
}

#[derive(Debug, Deserialize)]
struct NestedError {
    message: Option<String>,
}

impl ProviderErrorBody {
    fn detail(self) -> Option<String> {
        self.message
            .or(self.detail)
            .or(self.error.and_then(|e| e.message))
            .filter(|s| !s.is_empty())
    }
}

/// Turns a non-success provider response into `Error::Rejected`.
async fn rejection(provider: &'static str, resp: reqwest::Response) -> Error {
    let status = resp.status().as_u16();
    let detail = resp
        .json::<ProviderErrorBody>()
        .await
        .ok()
        .and_then(ProviderErrorBody::detail);

    Error::Rejected {
        provider,
        status,
        detail,
    }
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("{provider} rejected the subscriber ({status}): {detail:?}")]
    Rejected {
        provider: &'static str,
        status: u16,
        detail: Option<String>,
    },
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// The message that is passed on to the client.
    pub fn client_message(&self) -> String {
        match self {
            Error::Rejected {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Error::Rejected { detail: None, .. } => GENERIC_REJECTION.to_string(),
            Error::UrlParsing(_) | Error::Reqwest(_) => "Failed to subscribe".to_string(),
        }
    }
}
