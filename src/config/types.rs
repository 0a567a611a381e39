//! The configuration structs that make up the `AppConfig`, and their impls.
use lazy_regex::regex_captures;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub payment_config: PaymentConfig,
    pub email_config: EmailConfig,
    pub frontend_config: FrontendConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
    /// Used to build the checkout redirect URLs when a request carries no `Origin` header.
    pub frontend_url: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct PaymentConfig {
    pub api_url: String,
    pub secret_key: SecretString,
    pub timeout_millis: u64,
    pub default_product_name: String,
    pub default_product_description: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct EmailConfig {
    pub timeout_millis: u64,
    pub mailerlite: MailerLiteConfig,
    pub mailchimp: MailchimpConfig,
}

#[derive(Deserialize, Clone, Debug)]
pub struct MailerLiteConfig {
    pub api_url: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub group_id: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct MailchimpConfig {
    /// Overrides the datacenter URL derived from the api key.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<SecretString>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub list_id: Option<String>,
}

/// The public configuration handed to the browser. Never holds a secret.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct FrontendConfig {
    pub publishable_key: String,
    pub checkout_endpoint: String,
    pub subscribe_endpoint: String,
    pub checkout_base_url: String,
    pub product: ProductDisplay,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct ProductDisplay {
    pub name: String,
    pub description: String,
    pub price_id: String,
    pub display_amount: String,
    pub currency: String,
}

// ###################################
// ->   IMPLs
// ###################################
impl PaymentConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl EmailConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_millis)
    }
}

impl MailerLiteConfig {
    /// The api key, if one is set and not empty.
    pub fn api_key(&self) -> Option<&SecretString> {
        non_empty_secret(self.api_key.as_ref())
    }

    pub fn group_id(&self) -> Option<&str> {
        self.group_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl MailchimpConfig {
    pub fn api_key(&self) -> Option<&SecretString> {
        non_empty_secret(self.api_key.as_ref())
    }

    pub fn list_id(&self) -> Option<&str> {
        self.list_id.as_deref().filter(|id| !id.is_empty())
    }

    /// The api key and audience list, when both are set. Mailchimp is unusable without either.
    pub fn credentials(&self) -> Option<(&SecretString, &str)> {
        self.api_key().zip(self.list_id())
    }

    /// The base URL of the Mailchimp API, either configured explicitly or derived from the
    /// datacenter suffix of the api key: `<key>-us6` -> `https://us6.api.mailchimp.com`.
    pub fn base_url(&self) -> ConfigResult<String> {
        if let Some(url) = self.api_url.as_deref().filter(|url| !url.is_empty()) {
            return Ok(url.to_string());
        }

        let api_key = self
            .api_key()
            .ok_or(ConfigError::MailchimpApiKeyInvalid)?;
        let (_whole, datacenter) =
            regex_captures!(r#"^[^-\s]+-([a-z]+[0-9]+)$"#, api_key.expose_secret())
                .ok_or(ConfigError::MailchimpApiKeyInvalid)?;

        Ok(format!("https://{datacenter}.api.mailchimp.com"))
    }
}

// ###################################
// ->   TRY FROMs
// ###################################
impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail),
        }
    }
}

// ###################################
// ->   HELPERS
// ###################################
fn non_empty_secret(secret: Option<&SecretString>) -> Option<&SecretString> {
    secret.filter(|s| !s.expose_secret().is_empty())
}

/// Group and list ids are sometimes written as bare numbers, in the TOML files or in `APP_`
/// variables.
fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        String(String),
        Unsigned(u64),
        Signed(i64),
    }

    let value = Option::<StringOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        StringOrNumber::String(s) => s,
        StringOrNumber::Unsigned(n) => n.to_string(),
        StringOrNumber::Signed(n) => n.to_string(),
    }))
}
