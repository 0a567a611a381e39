use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    Json,
};
use tracing::info;

use crate::{
    web::{
        request::ApiRequest,
        types::{DeserSubscribe, Subscribed, ValidSubscribe},
        WebResult,
    },
    AppState,
};

pub async fn subscribe_endpoint(
    State(app_state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Json<Subscribed>> {
    let request = ApiRequest::from_parts(method, &headers, body);
    let subscribed = subscribe(&app_state, request).await?;
    Ok(Json(subscribed))
}

#[tracing::instrument(name = "Adding a new subscriber", skip_all, fields(method = %request.method))]
pub async fn subscribe(app_state: &AppState, request: ApiRequest) -> WebResult<Subscribed> {
    request.require_post()?;
    let subscriber: ValidSubscribe = request.json::<DeserSubscribe>()?.try_into()?;

    app_state
        .subscription_providers
        .subscribe(&subscriber.email)
        .await?;

    info!(use_case = ?subscriber.use_case, "SUCCESS");
    Ok(Subscribed::ok())
}
