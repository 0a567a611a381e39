use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::{Error, FormBackend, Result};
use crate::{
    config::FrontendConfig,
    web::types::{CheckoutCreated, DeserCheckout, DeserSubscribe, Subscribed},
};

/// Calls the checkout and subscribe endpoints over HTTP, the way the landing page does.
#[derive(Debug, Clone)]
pub struct HttpFormBackend {
    http_client: Client,
    checkout_url: Url,
    subscribe_url: Url,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: Option<String>,
    message: Option<String>,
}

impl HttpFormBackend {
    /// `site_url` is where the page is served from; the endpoint paths come from `config`.
    pub fn new<S: AsRef<str>>(site_url: S, config: &FrontendConfig) -> Result<Self> {
        let site_url =
            Url::parse(site_url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;
        let join = |path: &str| {
            site_url
                .join(path)
                .map_err(|e| Error::UrlParsing(e.to_string()))
        };

        Ok(HttpFormBackend {
            http_client: Client::new(),
            checkout_url: join(&config.checkout_endpoint)?,
            subscribe_url: join(&config.subscribe_endpoint)?,
        })
    }

    async fn post_json<T, B>(&self, url: &Url, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let resp = self
            .http_client
            .post(url.clone())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let reply = resp.json::<ErrorReply>().await.ok();
            let message = reply
                .and_then(|r| r.message.or(r.error))
                .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));

            return Err(Error::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.json::<T>().await?)
    }
}

#[async_trait]
impl FormBackend for HttpFormBackend {
    async fn create_checkout_session(&self, request: &DeserCheckout) -> Result<CheckoutCreated> {
        self.post_json(&self.checkout_url, request).await
    }

    async fn subscribe(&self, request: &DeserSubscribe) -> Result<Subscribed> {
        self.post_json(&self.subscribe_url, request).await
    }
}
