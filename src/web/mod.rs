mod error;
mod log;
pub mod midware;
pub mod request;
pub mod routes;
pub mod serve;
pub mod types;

pub use error::{ClientError, ClientErrorBody, Error, WebResult};
pub use serve::serve;

pub const REQUEST_ID_HEADER: &str = "x-request-id";
