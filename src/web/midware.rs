use std::sync::Arc;

use axum::{
    http::{header::ALLOW, HeaderMap, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::web::{log, Error, REQUEST_ID_HEADER};

/// Turns an `Error` left in the response extensions into the public JSON error body, and logs
/// every request.
pub async fn response_mapper(
    req_method: Method,
    uri: Uri,
    headers: HeaderMap,
    resp: Response,
) -> Response {
    let uuid = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4);

    let web_error = resp.extensions().get::<Arc<Error>>().map(Arc::as_ref);
    let client_status_and_error = web_error.map(Error::status_code_and_client_error);

    if let Some(er) = web_error {
        tracing::warn!("REQUEST ERROR: {er} ID: {uuid}");
    }

    let err_resp = client_status_and_error.as_ref().map(|(status, cl_err)| {
        let mut res = (*status, Json(cl_err.body())).into_response();
        if let Some(req_id) = resp.headers().get(REQUEST_ID_HEADER) {
            res.headers_mut().insert(REQUEST_ID_HEADER, req_id.clone());
        }
        if matches!(web_error, Some(Error::MethodNotAllowed(_))) {
            res.headers_mut()
                .insert(ALLOW, HeaderValue::from_static("POST"));
        }
        res
    });

    log::log_request(
        uuid,
        &req_method,
        &uri,
        resp.status(),
        web_error,
        client_status_and_error.as_ref(),
    );

    err_resp.unwrap_or(resp)
}
