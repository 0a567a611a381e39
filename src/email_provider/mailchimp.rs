use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use super::{rejection, Error, Result, SubscriptionProvider};
use crate::web::types::ValidEmail;

#[derive(Debug)]
pub struct MailchimpClient {
    pub http_client: Client,
    /// Datacenter specific, e.g. `https://us6.api.mailchimp.com`
    pub url: reqwest::Url,
    pub list_id: String,
    api_key: SecretString,
}

#[derive(Serialize)]
struct NewMember<'a> {
    email_address: &'a str,
    status: &'a str,
}

impl MailchimpClient {
    pub fn new<S: AsRef<str>>(
        url: S,
        api_key: SecretString,
        list_id: String,
        timeout: std::time::Duration,
    ) -> Result<Self> {
        let url =
            reqwest::Url::parse(url.as_ref()).map_err(|e| Error::UrlParsing(e.to_string()))?;
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(MailchimpClient {
            http_client,
            url,
            list_id,
            api_key,
        })
    }
}

#[async_trait]
impl SubscriptionProvider for MailchimpClient {
    fn name(&self) -> &'static str {
        "mailchimp"
    }

    async fn try_subscribe(&self, email: &ValidEmail) -> Result<()> {
        let url = self
            .url
            .join(&format!("3.0/lists/{}/members", self.list_id))
            .map_err(|e| Error::UrlParsing(e.to_string()))?;

        let member = NewMember {
            email_address: email.as_ref(),
            status: "subscribed",
        };

        // Mailchimp accepts any username with the api key as the password.
        let resp = self
            .http_client
            .post(url)
            .basic_auth("landomat", Some(self.api_key.expose_secret()))
            .json(&member)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(rejection(self.name(), resp).await);
        }

        Ok(())
    }
}
