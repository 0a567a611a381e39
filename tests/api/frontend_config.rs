use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

use crate::helpers::spawn_test_app;

#[tokio::test]
async fn frontend_config_is_public_and_camel_case() -> Result<()> {
    let app = spawn_test_app().await?;

    let res = app.client.get(app.url("/api/config")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;

    assert_eq!(body["checkoutEndpoint"], "/api/create-checkout-session");
    assert_eq!(body["subscribeEndpoint"], "/api/subscribe");
    assert_eq!(body["product"]["priceId"], "price_123");
    assert_eq!(body["product"]["displayAmount"], "$149");

    let raw = body.to_string();
    assert!(!raw.contains("sk_test_123"), "secret key leaked: {raw}");
    Ok(())
}
