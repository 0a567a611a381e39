use std::collections::HashMap;

use anyhow::Result;
use landomat::function::{handle_event, handle_route, FunctionEvent, FunctionRoute};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{spawn_test_app, FormField};

fn post(path: &str, body: Value) -> FunctionEvent {
    FunctionEvent {
        http_method: "POST".into(),
        path: path.into(),
        headers: HashMap::from([("origin".to_string(), "https://fn.atma.example".to_string())]),
        body: Some(body.to_string()),
        is_base64_encoded: false,
    }
}

#[tokio::test]
async fn function_checkout_shares_the_server_behavior() -> Result<()> {
    let app = spawn_test_app().await?;

    Mock::given(path("/v1/checkout/sessions"))
        .and(method("POST"))
        .and(FormField("cancel_url", "https://fn.atma.example/?canceled=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cs_fn_1"})))
        .expect(1)
        .mount(&app.stripe_server)
        .await;

    let event = post(
        "/.netlify/functions/create-checkout-session",
        json!({"email": "ursula@domain.com", "priceId": "price_123"}),
    );
    let resp = handle_event(&app.app_state, event).await;

    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(resp.headers["Content-Type"], "application/json");
    assert_eq!(
        serde_json::from_str::<Value>(&resp.body)?,
        json!({"id": "cs_fn_1"})
    );
    Ok(())
}

#[tokio::test]
async fn function_validation_errors_match_the_server() -> Result<()> {
    let app = spawn_test_app().await?;

    let event = post(
        "/.netlify/functions/create-checkout-session",
        json!({"email": "ursula@domain.com"}),
    );
    let resp = handle_event(&app.app_state, event).await;

    assert_eq!(resp.status_code, 400);
    assert_eq!(
        serde_json::from_str::<Value>(&resp.body)?,
        json!({"error": "Price ID is required"})
    );
    Ok(())
}

#[tokio::test]
async fn function_subscribe_and_method_check() -> Result<()> {
    let app = spawn_test_app().await?;

    let event = post("/api/subscribe", json!({"email": "ursula@domain.com"}));
    let resp = handle_event(&app.app_state, event).await;
    assert_eq!(resp.status_code, 200);
    assert_eq!(
        serde_json::from_str::<Value>(&resp.body)?,
        json!({"success": true, "message": "Subscribed successfully"})
    );

    let event = FunctionEvent {
        http_method: "GET".into(),
        ..Default::default()
    };
    let resp = handle_route(&app.app_state, FunctionRoute::Subscribe, event).await;
    assert_eq!(resp.status_code, 405);
    assert_eq!(resp.headers["Allow"], "POST");
    Ok(())
}

#[tokio::test]
async fn function_unknown_path_is_404() -> Result<()> {
    let app = spawn_test_app().await?;

    let resp = handle_event(&app.app_state, post("/api/unsubscribe", json!({}))).await;

    assert_eq!(resp.status_code, 404);
    Ok(())
}
