//! Serverless-function deployment of the two form endpoints.
//!
//! The platform hands over an event with the method, headers and the raw body, and expects a
//! response with a status code, headers and a string body. Both are converted to and from
//! `ApiRequest` here; the request handling itself is shared with the HTTP server.

use std::collections::{BTreeMap, HashMap};

use axum::http::{Method, StatusCode};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::{
    web::{
        request::ApiRequest,
        routes::api::{create_checkout_session, subscribe},
        Error, WebResult,
    },
    AppState,
};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Gateway test events send `null` for missing collections.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionRoute {
    CreateCheckoutSession,
    Subscribe,
}

impl FunctionRoute {
    /// Functions are mounted under platform specific prefixes
    /// (`/.netlify/functions/...`, `/api/...`), so only the last path segment counts.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/').rsplit('/').next()? {
            "create-checkout-session" => Some(Self::CreateCheckoutSession),
            "subscribe" => Some(Self::Subscribe),
            _ => None,
        }
    }
}

impl FunctionEvent {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn into_api_request(self) -> WebResult<ApiRequest> {
        let method = Method::from_bytes(self.http_method.to_ascii_uppercase().as_bytes())
            .map_err(|_| Error::MethodNotAllowed(self.http_method.clone()))?;
        let origin = self.header("origin").map(str::to_string);

        let body = match self.body {
            Some(body) if self.is_base64_encoded => STANDARD
                .decode(body.as_bytes())
                .map_err(|er| Error::InvalidJson(er.to_string()))?,
            Some(body) => body.into_bytes(),
            None => Vec::new(),
        };

        Ok(ApiRequest::new(method, origin, body))
    }
}

/// Routes the event by its path and handles it.
pub async fn handle_event(app_state: &AppState, event: FunctionEvent) -> FunctionResponse {
    match FunctionRoute::from_path(&event.path) {
        Some(route) => handle_route(app_state, route, event).await,
        None => error_response(Error::RouteNotFound(event.path)),
    }
}

/// Handles the event as a request to `route`, whatever its path says.
pub async fn handle_route(
    app_state: &AppState,
    route: FunctionRoute,
    event: FunctionEvent,
) -> FunctionResponse {
    let request = match event.into_api_request() {
        Ok(request) => request,
        Err(er) => return error_response(er),
    };

    let body = match route {
        FunctionRoute::CreateCheckoutSession => create_checkout_session(app_state, request)
            .await
            .and_then(to_json),
        FunctionRoute::Subscribe => subscribe(app_state, request).await.and_then(to_json),
    };

    match body {
        Ok(body) => FunctionResponse {
            status_code: StatusCode::OK.as_u16(),
            headers: base_headers(),
            body,
        },
        Err(er) => error_response(er),
    }
}

fn to_json<T: Serialize>(value: T) -> WebResult<String> {
    // Serializing the response types can't fail, they hold only strings and bools.
    serde_json::to_string(&value).map_err(|er| Error::InvalidJson(er.to_string()))
}

fn base_headers() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
        (
            "Access-Control-Allow-Headers".to_string(),
            "Content-Type".to_string(),
        ),
        ("Content-Type".to_string(), "application/json".to_string()),
    ])
}

fn error_response(er: Error) -> FunctionResponse {
    warn!("FUNCTION ERROR: {er}");
    let (status, client_error) = er.status_code_and_client_error();

    let mut headers = base_headers();
    if matches!(er, Error::MethodNotAllowed(_)) {
        headers.insert("Allow".to_string(), "POST".to_string());
    }

    let body = serde_json::to_string(&client_error.body())
        .unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string());

    FunctionResponse {
        status_code: status.as_u16(),
        headers,
        body,
    }
}
