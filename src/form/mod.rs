//! The landing page's two forms, checkout and subscribe, as a controller that can be driven by
//! any view. The controller owns the flow: client side validation, the loading state of the
//! submit control, the call to the backend, inline messages and the post-checkout redirect.

mod http_backend;
mod message;
mod redirect;

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Url;
use tracing::{debug, warn};

use crate::{
    config::FrontendConfig,
    web::types::{CheckoutCreated, DeserCheckout, DeserSubscribe, PriceId, Subscribed, ValidEmail},
};

pub use http_backend::HttpFormBackend;
pub use message::{FormMessage, MessageKind, MessageSlots, MESSAGE_TTL};
pub use redirect::{strip_markers, PaymentOutcome, REDIRECT_MARKERS};

pub type Result<T> = core::result::Result<T, Error>;

const INVALID_EMAIL: &str = "Please enter a valid email address.";
const PAYMENT_SUCCEEDED: &str = "Payment successful! Thank you for your order.";
const PAYMENT_CANCELED: &str = "Payment canceled. You can try again whenever you're ready.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormKind {
    Checkout,
    Subscribe,
}

impl FormKind {
    /// Label of the submit control while a request is in flight.
    pub fn loading_label(&self) -> &'static str {
        match self {
            FormKind::Checkout => "Processing...",
            FormKind::Subscribe => "Subscribing...",
        }
    }
}

/// What the controller needs from the page.
pub trait FormView {
    /// Disables the submit control of `form` and swaps its label.
    fn set_loading(&mut self, form: FormKind, label: &str);
    /// Enables the submit control of `form` with its original label.
    fn restore_submit(&mut self, form: FormKind);
    /// Shows `message` next to `form`, replacing whatever was shown there.
    fn show_message(&mut self, form: FormKind, message: &FormMessage);
    fn clear_message(&mut self, form: FormKind);
    fn reset_form(&mut self, form: FormKind);
    fn redirect(&mut self, url: &Url);
    /// Replaces the address bar URL without a reload.
    fn replace_url(&mut self, url: &Url);
}

#[async_trait]
pub trait FormBackend: Send + Sync {
    async fn create_checkout_session(&self, request: &DeserCheckout) -> Result<CheckoutCreated>;
    async fn subscribe(&self, request: &DeserSubscribe) -> Result<Subscribed>;
}

/// What to tell the visitor when the subscribe request fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubscribeFailurePolicy {
    /// Show the failure next to the form.
    #[default]
    ReportFailure,
    /// Show the success message anyway and keep the failure in the logs.
    AlwaysSucceed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Stopped before any request was sent.
    Invalid,
    Redirected(Url),
    Subscribed,
    Failed(String),
}

pub struct FormController<B, V> {
    backend: B,
    view: V,
    config: FrontendConfig,
    failure_policy: SubscribeFailurePolicy,
    messages: MessageSlots,
}

impl<B: FormBackend, V: FormView> FormController<B, V> {
    pub fn new(backend: B, view: V, config: FrontendConfig) -> Self {
        FormController {
            backend,
            view,
            config,
            failure_policy: SubscribeFailurePolicy::default(),
            messages: MessageSlots::default(),
        }
    }

    pub fn with_failure_policy(mut self, policy: SubscribeFailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn visible_message(&self, form: FormKind, now: Instant) -> Option<&FormMessage> {
        self.messages.visible(form, now)
    }

    /// Starts a checkout for the configured product and redirects to the hosted payment page.
    pub async fn submit_checkout(&mut self, email: &str) -> SubmitOutcome {
        let form = FormKind::Checkout;
        let email = match ValidEmail::parse(email.trim()) {
            Ok(email) => email,
            Err(_) => return self.reject(form, INVALID_EMAIL),
        };
        let price_id = match PriceId::parse(&self.config.product.price_id) {
            Ok(price_id) => price_id,
            Err(er) => return self.reject(form, &er.to_string()),
        };

        self.view.set_loading(form, form.loading_label());
        let request = DeserCheckout {
            email: Some(email.to_string()),
            price_id: Some(price_id.as_ref().to_string()),
            product_name: Some(self.config.product.name.clone()),
            product_description: Some(self.config.product.description.clone()),
        };

        let res = self
            .backend
            .create_checkout_session(&request)
            .await
            .and_then(|created| self.hosted_checkout_url(&created.id));

        match res {
            Ok(url) => {
                debug!("{:<20} - Redirecting to {url}", "form");
                self.view.redirect(&url);
                SubmitOutcome::Redirected(url)
            }
            Err(er) => {
                warn!("{:<20} - Checkout failed: {er}", "form");
                let text = er.visitor_message();
                self.show(form, FormMessage::error(text.clone()));
                self.view.restore_submit(form);
                SubmitOutcome::Failed(text)
            }
        }
    }

    pub async fn submit_subscribe(&mut self, email: &str, use_case: Option<&str>) -> SubmitOutcome {
        let form = FormKind::Subscribe;
        let email = match ValidEmail::parse(email.trim()) {
            Ok(email) => email,
            Err(_) => return self.reject(form, INVALID_EMAIL),
        };

        self.view.set_loading(form, form.loading_label());
        let request = DeserSubscribe {
            email: Some(email.to_string()),
            use_case: use_case.map(str::to_string),
        };
        let res = self.backend.subscribe(&request).await;

        let outcome = match (res, self.failure_policy) {
            (Ok(_), _) => SubmitOutcome::Subscribed,
            (Err(er), SubscribeFailurePolicy::AlwaysSucceed) => {
                warn!("{:<20} - Subscribe failed, reported as success: {er}", "form");
                SubmitOutcome::Subscribed
            }
            (Err(er), SubscribeFailurePolicy::ReportFailure) => {
                warn!("{:<20} - Subscribe failed: {er}", "form");
                SubmitOutcome::Failed(er.visitor_message())
            }
        };

        match &outcome {
            SubmitOutcome::Subscribed => {
                let text = format!("Thank you! We'll send updates to {email}.");
                self.show(form, FormMessage::success(text));
                self.view.reset_form(form);
            }
            SubmitOutcome::Failed(text) => self.show(form, FormMessage::error(text.clone())),
            _ => {}
        }
        self.view.restore_submit(form);

        outcome
    }

    /// Reports the outcome of a returning checkout redirect and cleans the URL.
    pub fn on_page_load(&mut self, url: &Url) -> Option<PaymentOutcome> {
        let outcome = PaymentOutcome::from_url(url)?;
        let message = match outcome {
            PaymentOutcome::Succeeded => FormMessage::success(PAYMENT_SUCCEEDED),
            PaymentOutcome::Canceled => FormMessage::error(PAYMENT_CANCELED),
        };
        self.show(FormKind::Checkout, message);
        self.view.replace_url(&strip_markers(url));

        Some(outcome)
    }

    /// Clears the messages that have been visible for longer than `MESSAGE_TTL`.
    pub fn tick_at(&mut self, now: Instant) {
        for form in self.messages.expire(now) {
            self.view.clear_message(form);
        }
    }

    fn hosted_checkout_url(&self, session_id: &str) -> Result<Url> {
        let url = format!(
            "{}/{}",
            self.config.checkout_base_url.trim_end_matches('/'),
            session_id
        );
        Url::parse(&url).map_err(|e| Error::UrlParsing(e.to_string()))
    }

    fn reject(&mut self, form: FormKind, text: &str) -> SubmitOutcome {
        self.show(form, FormMessage::error(text));
        SubmitOutcome::Invalid
    }

    fn show(&mut self, form: FormKind, message: FormMessage) {
        self.view.show_message(form, &message);
        self.messages.show(form, message, Instant::now());
    }
}

// ###################################
// ->   ERROR
// ###################################
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Url parsing error: {0}")]
    UrlParsing(String),
    #[error("Request rejected with {status}: {message}")]
    Rejected { status: u16, message: String },
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// The text shown next to the form.
    pub fn visitor_message(&self) -> String {
        match self {
            Error::Rejected { message, .. } => message.clone(),
            Error::UrlParsing(_) | Error::Reqwest(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}
