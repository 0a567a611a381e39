//! The request shape shared by every deployment target.
//! Each target converts its own request type into an `ApiRequest` at the boundary.

use axum::{
    body::Bytes,
    http::{header::ORIGIN, HeaderMap, Method},
};
use serde::de::DeserializeOwned;

use super::{Error, WebResult};

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub origin: Option<String>,
    pub body: Bytes,
}

impl ApiRequest {
    pub fn new(method: Method, origin: Option<String>, body: impl Into<Bytes>) -> Self {
        ApiRequest {
            method,
            origin: origin.filter(|o| !o.is_empty()),
            body: body.into(),
        }
    }

    pub fn from_parts(method: Method, headers: &HeaderMap, body: Bytes) -> Self {
        let origin = headers
            .get(ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self::new(method, origin, body)
    }

    pub fn require_post(&self) -> WebResult<()> {
        if self.method != Method::POST {
            return Err(Error::MethodNotAllowed(self.method.to_string()));
        }
        Ok(())
    }

    /// Parses the body as JSON. Empty bodies and bodies of the wrong shape are both invalid.
    pub fn json<T: DeserializeOwned>(&self) -> WebResult<T> {
        serde_json::from_slice(&self.body).map_err(|er| Error::InvalidJson(er.to_string()))
    }
}
