use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{rejection, Error, Result, SubscriptionProvider};
use crate::web::types::ValidEmail;

#[derive(Debug)]
pub struct MailerLiteClient {
    pub http_client: Client,
    pub url: reqwest::Url,
    pub group_id: Option<String>,
    api_key: SecretString,
}

#[derive(Serialize)]
struct NewSubscriber<'a> {
    email: &'a str,
    groups: Vec<&'a str>,
}

impl MailerLiteClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        api_key: SecretString,
        group_id: Option<String>,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(MailerLiteClient {
            http_client,
            url,
            group_id,
            api_key,
        })
    }
}

#[async_trait]
impl SubscriptionProvider for MailerLiteClient {
    fn name(&self) -> &'static str {
        "mailerlite"
    }

    async fn try_subscribe(&self, email: &ValidEmail) -> Result<()> {
        let url = self
            .url
            .join("api/v2/subscribers")
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let subscriber = NewSubscriber {
            email: email.as_ref(),
            groups: self.group_id.as_deref().into_iter().collect(),
        };

        let resp = self
            .http_client
            .post(url)
            .header("X-MailerLite-ApiKey", self.api_key.expose_secret())
            .json(&subscriber)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(self.name(), resp).await);
        }

        Ok(())
    }
}
