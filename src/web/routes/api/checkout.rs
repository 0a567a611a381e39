use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    Json,
};
use tracing::info;

use crate::{
    payment_client::CheckoutSessionParams,
    web::{
        request::ApiRequest,
        types::{CheckoutCreated, DeserCheckout, ValidCheckout},
        WebResult,
    },
    AppState,
};

/// HTTP adapter for `create_checkout_session`.
pub async fn create_checkout_session_endpoint(
    State(app_state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> WebResult<Json<CheckoutCreated>> {
    let request = ApiRequest::from_parts(method, &headers, body);
    let created = create_checkout_session(&app_state, request).await?;
    Ok(Json(created))
}

/// Validates the checkout form and opens a one-time payment session for it.
/// The browser is redirected back to `{origin}/?success=true` or `{origin}/?canceled=true`.
#[tracing::instrument(
    name = "Creating a checkout session",
    skip_all,
    fields(method = %request.method, origin = ?request.origin)
)]
pub async fn create_checkout_session(
    app_state: &AppState,
    request: ApiRequest,
) -> WebResult<CheckoutCreated> {
    request.require_post()?;
    let checkout: ValidCheckout = request.json::<DeserCheckout>()?.try_into()?;

    let redirect_base = request
        .origin
        .as_deref()
        .unwrap_or(&app_state.frontend_url)
        .trim_end_matches('/');
    let defaults = &app_state.product_defaults;

    let params = CheckoutSessionParams {
        price_id: &checkout.price_id,
        customer_email: &checkout.email,
        success_url: format!("{redirect_base}/?success=true&session_id={{CHECKOUT_SESSION_ID}}"),
        cancel_url: format!("{redirect_base}/?canceled=true"),
        product_name: checkout.product_name.as_deref().unwrap_or(&defaults.name),
        product_description: checkout
            .product_description
            .as_deref()
            .unwrap_or(&defaults.description),
    };

    let session = app_state
        .payment_client
        .create_checkout_session(&params)
        .await?;

    info!(session_id = %session.id, "checkout session created");
    Ok(CheckoutCreated { id: session.id })
}
