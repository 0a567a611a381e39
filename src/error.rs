use crate::{config, email_provider, payment_client};

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("payment client error: {0}")]
    PaymentClient(#[from] payment_client::Error),
    #[error("email provider error: {0}")]
    EmailProvider(#[from] email_provider::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
