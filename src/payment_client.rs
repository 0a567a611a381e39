use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::web::types::{PriceId, ValidEmail};

/// Client for the payment provider's checkout-session API (Stripe wire format).
#[derive(Debug)]
pub struct PaymentClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    secret_key: SecretString,
}

/// Everything needed to open a one-time payment session for a single product.
#[derive(Debug)]
pub struct CheckoutSessionParams<'a> {
    pub price_id: &'a PriceId,
    pub customer_email: &'a ValidEmail,
    pub success_url: String,
    pub cancel_url: String,
    pub product_name: &'a str,
    pub product_description: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
}

impl PaymentClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        secret_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;

        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(PaymentClient {
            http_client,
            url,
            secret_key,
        })
    }

    /// Creates a checkout session with exactly one line item of quantity 1.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutSessionParams<'_>,
    ) -> Result<CheckoutSession> {
        let url = self
            .url
            .join("v1/checkout/sessions")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let resp = self
            .http_client
            .post(url)
            .bearer_auth(self.secret_key.expose_secret())
            .form(&params.form_fields())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::from_error_response(status, resp).await);
        }

        let session = resp.json::<CheckoutSession>().await?;
        Ok(session)
    }
}

impl CheckoutSessionParams<'_> {
    /// The provider takes form-encoded bodies with nested keys in brackets.
    pub fn form_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("payment_method_types[0]", "card"),
            ("line_items[0][price]", self.price_id.as_ref()),
            ("line_items[0][quantity]", "1"),
            ("mode", "payment"),
            ("customer_email", self.customer_email.as_ref()),
            ("success_url", self.success_url.as_str()),
            ("cancel_url", self.cancel_url.as_str()),
            ("metadata[product]", self.product_name),
            ("metadata[email]", self.customer_email.as_ref()),
            ("payment_intent_data[description]", self.product_description),
            ("allow_promotion_codes", "true"),
        ]
    }
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    message: Option<String>,
}

// ###################################
// ->   ERROR & RESULT
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("url parsing error: {0}")]
    UrlParsing(String),
    #[error("payment provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    async fn from_error_response(status: StatusCode, resp: reqwest::Response) -> Self {
        let message = resp
            .json::<ProviderErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown payment provider error")
                    .to_string()
            });

        Error::Rejected {
            status: status.as_u16(),
            message,
        }
    }

    /// The message that is passed on to the client.
    pub fn client_message(&self) -> String {
        match self {
            Error::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
