use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use wiremock::{
    matchers::{any, body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{spawn_test_app, ProviderSetup, TestApp};

#[tokio::test]
async fn subscribe_without_provider_succeeds() -> Result<()> {
    let app = spawn_test_app().await?;
    assert_eq!(app.app_state.subscription_providers.names(), vec!["log-only"]);
    for server in [&app.mailerlite_server, &app.mailchimp_server] {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(server)
            .await;
    }

    let res = app
        .post_subscribe(&json!({"email": "ursula@domain.com", "useCase": "studio"}))
        .await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"success": true, "message": "Subscribed successfully"})
    );
    Ok(())
}

#[tokio::test]
async fn subscribe_mailerlite_ok() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;

    Mock::given(path("/api/v2/subscribers"))
        .and(method("POST"))
        .and(header("X-MailerLite-ApiKey", "ml_key"))
        .and(body_json(json!({
            "email": "ursula@domain.com",
            "groups": ["112233"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1})))
        .expect(1)
        .mount(&app.mailerlite_server)
        .await;

    let res = app.post_subscribe(&json!({"email": "ursula@domain.com"})).await?;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?["success"], true);
    Ok(())
}

#[tokio::test]
async fn subscribe_mailerlite_failure_is_500_with_detail() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 123, "message": "Invalid email address"}
        })))
        .expect(1)
        .mount(&app.mailerlite_server)
        .await;

    let res = app.post_subscribe(&json!({"email": "ursula@domain.com"})).await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"error": "Invalid email address"})
    );
    Ok(())
}

#[tokio::test]
async fn subscribe_provider_failure_without_detail() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&app.mailerlite_server)
        .await;

    let res = app.post_subscribe(&json!({"email": "ursula@domain.com"})).await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"error": "Subscription failed"})
    );
    Ok(())
}

#[tokio::test]
async fn subscribe_mailchimp_ok() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::Mailchimp).await?;

    Mock::given(path("/3.0/lists/list42/members"))
        .and(method("POST"))
        .and(body_json(json!({
            "email_address": "ursula@domain.com",
            "status": "subscribed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "abc"})))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let res = app.post_subscribe(&json!({"email": "ursula@domain.com"})).await?;

    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn subscribe_mailchimp_failure_passes_detail() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::Mailchimp).await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Member Exists",
            "status": 400,
            "detail": "ursula@domain.com is already a list member."
        })))
        .expect(1)
        .mount(&app.mailchimp_server)
        .await;

    let res = app.post_subscribe(&json!({"email": "ursula@domain.com"})).await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.json::<Value>().await?,
        json!({"error": "ursula@domain.com is already a list member."})
    );
    Ok(())
}

#[tokio::test]
async fn subscribe_invalid_email_is_400_without_upstream_call() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailerlite_server)
        .await;

    for body in [
        json!({}),
        json!({"email": ""}),
        json!({"email": "ursuladomain.com", "useCase": "studio"}),
    ] {
        let res = app.post_subscribe(&body).await?;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(
            res.json::<Value>().await?,
            json!({"error": "Valid email is required"})
        );
    }
    Ok(())
}

#[tokio::test]
async fn subscribe_rejects_other_methods_and_bad_json() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.mailerlite_server)
        .await;

    for req in [
        app.client.get(app.url("/api/subscribe")),
        app.client.put(app.url("/api/subscribe")),
    ] {
        let res = req.json(&json!({"email": "ursula@domain.com"})).send().await?;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()["allow"], "POST");
    }

    let res = app.post_raw("/api/subscribe", "{\"email\":").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Invalid JSON"}));
    Ok(())
}
