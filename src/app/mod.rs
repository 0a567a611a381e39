use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{
    config::{AppConfig, EmailConfig, FrontendConfig},
    email_provider::{MailchimpClient, MailerLiteClient, SubscriptionProvider, SubscriptionProviders},
    payment_client::PaymentClient,
    Result,
};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}

impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let app_state = AppState::from_config(&config)?;

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }
}

/// Fallback product metadata for checkout requests that don't name the product.
#[derive(Debug, Clone)]
pub struct ProductDefaults {
    pub name: String,
    pub description: String,
}

pub struct InternalState {
    pub payment_client: PaymentClient,
    pub subscription_providers: SubscriptionProviders,
    pub frontend_url: String,
    pub product_defaults: ProductDefaults,
    pub frontend_config: FrontendConfig,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(
        payment_client: PaymentClient,
        subscription_providers: SubscriptionProviders,
        frontend_url: String,
        product_defaults: ProductDefaults,
        frontend_config: FrontendConfig,
    ) -> Self {
        AppState(Arc::new(InternalState {
            payment_client,
            subscription_providers,
            frontend_url,
            product_defaults,
            frontend_config,
        }))
    }

    /// Builds every upstream client from the configuration. No network calls are made here.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let payment_config = &config.payment_config;
        if payment_config.secret_key.expose_secret().is_empty() {
            warn!(
                "{:<20} - no payment secret key configured, checkout requests will fail",
                "app state"
            );
        }
        let payment_client = PaymentClient::new(
            &payment_config.api_url,
            payment_config.secret_key.clone(),
            payment_config.timeout(),
        )?;

        let subscription_providers = build_subscription_providers(&config.email_config)?;
        info!(
            "{:<20} - subscription providers: {:?}",
            "app state",
            subscription_providers.names()
        );

        Ok(AppState::new(
            payment_client,
            subscription_providers,
            config.net_config.frontend_url.clone(),
            ProductDefaults {
                name: payment_config.default_product_name.clone(),
                description: payment_config.default_product_description.clone(),
            },
            config.frontend_config.clone(),
        ))
    }
}

/// MailerLite takes priority over Mailchimp; with neither configured only the log-only fallback
/// remains.
fn build_subscription_providers(email_config: &EmailConfig) -> Result<SubscriptionProviders> {
    let mut configured: Vec<Arc<dyn SubscriptionProvider>> = Vec::new();
    let timeout = email_config.timeout();

    let mailerlite = &email_config.mailerlite;
    if let Some(api_key) = mailerlite.api_key() {
        configured.push(Arc::new(MailerLiteClient::new(
            &mailerlite.api_url,
            api_key.clone(),
            mailerlite.group_id().map(str::to_string),
            timeout,
        )?));
    }

    let mailchimp = &email_config.mailchimp;
    if let Some((api_key, list_id)) = mailchimp.credentials() {
        configured.push(Arc::new(MailchimpClient::new(
            mailchimp.base_url()?,
            api_key.clone(),
            list_id.to_string(),
            timeout,
        )?));
    }

    Ok(SubscriptionProviders::new(configured))
}
