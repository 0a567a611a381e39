use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;
use strum_macros::AsRefStr;

use crate::{email_provider, payment_client};

use super::types::DataParsingError;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("method not allowed: {0}")]
    MethodNotAllowed(String),
    #[error("request body is not valid json: {0}")]
    InvalidJson(String),
    #[error("no function route for path: {0}")]
    RouteNotFound(String),

    #[error("data parsing error: {0}")]
    DataParsing(#[from] DataParsingError),

    #[error("payment provider error: {0}")]
    PaymentProvider(#[from] payment_client::Error),
    #[error("email provider error: {0}")]
    EmailProvider(#[from] email_provider::Error),
}

impl Error {
    /// The one place where internal errors are mapped to what the client gets to see.
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::MethodNotAllowed(_) => (StatusCode::METHOD_NOT_ALLOWED, MethodNotAllowed),
            Error::InvalidJson(_) => (StatusCode::BAD_REQUEST, InvalidJson),
            Error::RouteNotFound(_) => (StatusCode::NOT_FOUND, NotFound),
            Error::DataParsing(data_er) => {
                (StatusCode::BAD_REQUEST, InvalidInput(data_er.to_string()))
            }
            Error::PaymentProvider(pay_er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                CheckoutFailed(pay_er.client_message()),
            ),
            Error::EmailProvider(email_er) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                SubscribeFailed(email_er.client_message()),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

#[derive(Debug, AsRefStr)]
pub enum ClientError {
    MethodNotAllowed,
    InvalidJson,
    NotFound,
    InvalidInput(String),
    CheckoutFailed(String),
    SubscribeFailed(String),
}

/// The JSON body every failed request answers with: `{ "error": ..., "message"?: ... }`
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ClientErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ClientError {
    pub fn body(&self) -> ClientErrorBody {
        let (error, message) = match self {
            ClientError::MethodNotAllowed => ("Method not allowed".to_string(), None),
            ClientError::InvalidJson => ("Invalid JSON".to_string(), None),
            ClientError::NotFound => ("Not found".to_string(), None),
            ClientError::InvalidInput(msg) => (msg.clone(), None),
            ClientError::CheckoutFailed(msg) => (
                "Failed to create checkout session".to_string(),
                Some(msg.clone()),
            ),
            ClientError::SubscribeFailed(msg) => (msg.clone(), None),
        };

        ClientErrorBody { error, message }
    }
}
