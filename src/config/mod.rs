//! Builds an `AppConfig` from the TOML files in `config/` and the environment.
//!
//! Sources are layered, later ones win:
//! 1. `config/base.toml`
//! 2. `config/{environment}.toml` where the environment comes from `APP_ENVIRONMENT`
//! 3. the well-known deployment variables (`STRIPE_SECRET_KEY`, `FRONTEND_URL`, ...)
//! 4. `APP_` prefixed variables, `__` separating nested keys

mod error;
mod types;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use tracing::info;

pub use error::{ConfigError, ConfigResult};
pub use types::{
    AppConfig, EmailConfig, Environment, FrontendConfig, MailchimpConfig, MailerLiteConfig,
    NetConfig, PaymentConfig, ProductDisplay,
};

impl AppConfig {
    /// Loads the configuration for the environment named by `APP_ENVIRONMENT` (default: local).
    pub fn load() -> ConfigResult<Self> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()?;

        Self::load_for(environment)
    }

    pub fn load_for(environment: Environment) -> ConfigResult<Self> {
        Self::load_with(environment, |name| std::env::var(name).ok())
    }

    /// `lookup` resolves the deployment variables.
    fn load_with<F>(environment: Environment, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!(
            "{:<20} - Initializing the configuration ({})",
            "config",
            environment.as_ref()
        );
        let config_dir = std::env::current_dir()?.join("config");
        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let config = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(deployment_vars(lookup))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        Ok(config)
    }
}

/// The flat variable names used by serverless platforms and the config keys they set.
const DEPLOYMENT_VARS: [(&str, &str); 8] = [
    ("STRIPE_SECRET_KEY", "payment_config.secret_key"),
    ("FRONTEND_URL", "net_config.frontend_url"),
    ("MAILERLITE_API_KEY", "email_config.mailerlite.api_key"),
    ("MAILERLITE_GROUP_ID", "email_config.mailerlite.group_id"),
    ("MAILERLITE_API_URL", "email_config.mailerlite.api_url"),
    ("MAILCHIMP_API_KEY", "email_config.mailchimp.api_key"),
    ("MAILCHIMP_LIST_ID", "email_config.mailchimp.list_id"),
    ("MAILCHIMP_API_URL", "email_config.mailchimp.api_url"),
];

/// Merges the deployment variables as plain strings. Ids and keys made of digits keep
/// their leading zeros and still deserialize as strings.
fn deployment_vars<F>(lookup: F) -> Figment
where
    F: Fn(&str) -> Option<String>,
{
    DEPLOYMENT_VARS
        .iter()
        .fold(Figment::new(), |figment, (var, key)| match lookup(var) {
            Some(value) => figment.merge(Serialized::default(key, value)),
            None => figment,
        })
}
