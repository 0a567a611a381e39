pub mod checkout;
pub mod frontend_config;
pub mod subscribe;

pub use checkout::{create_checkout_session, create_checkout_session_endpoint};
pub use frontend_config::frontend_config;
pub use subscribe::{subscribe, subscribe_endpoint};
