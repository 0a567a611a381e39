use std::time::Instant;

use anyhow::Result;
use landomat::form::{
    FormController, FormKind, FormMessage, FormView, HttpFormBackend, SubmitOutcome,
};
use reqwest::Url;
use serde_json::json;
use wiremock::{
    matchers::{any, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{spawn_test_app, ProviderSetup, TestApp};

/// Keeps what a page would display.
#[derive(Default)]
struct PageState {
    loading: Vec<FormKind>,
    messages: Vec<(FormKind, FormMessage)>,
    resets: Vec<FormKind>,
    location: Option<String>,
}

impl FormView for PageState {
    fn set_loading(&mut self, form: FormKind, _label: &str) {
        self.loading.push(form);
    }
    fn restore_submit(&mut self, form: FormKind) {
        self.loading.retain(|f| *f != form);
    }
    fn show_message(&mut self, form: FormKind, message: &FormMessage) {
        self.messages.retain(|(f, _)| *f != form);
        self.messages.push((form, message.clone()));
    }
    fn clear_message(&mut self, form: FormKind) {
        self.messages.retain(|(f, _)| *f != form);
    }
    fn reset_form(&mut self, form: FormKind) {
        self.resets.push(form);
    }
    fn redirect(&mut self, url: &Url) {
        self.location = Some(url.to_string());
    }
    fn replace_url(&mut self, url: &Url) {
        self.location = Some(url.to_string());
    }
}

fn controller(app: &TestApp) -> Result<FormController<HttpFormBackend, PageState>> {
    let config = app.config.frontend_config.clone();
    let backend = HttpFormBackend::new(app.url("/"), &config)?;
    Ok(FormController::new(backend, PageState::default(), config))
}

#[tokio::test]
async fn form_checkout_redirects_to_hosted_checkout() -> Result<()> {
    let app = spawn_test_app().await?;
    Mock::given(path("/v1/checkout/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "cs_form_1"})))
        .expect(1)
        .mount(&app.stripe_server)
        .await;
    let mut ctrl = controller(&app)?;

    let outcome = ctrl.submit_checkout(" ursula@domain.com ").await;

    let expected = format!(
        "{}/cs_form_1",
        app.config.frontend_config.checkout_base_url.trim_end_matches('/')
    );
    assert_eq!(outcome, SubmitOutcome::Redirected(Url::parse(&expected)?));
    assert_eq!(ctrl.view().location.as_deref(), Some(expected.as_str()));
    Ok(())
}

#[tokio::test]
async fn form_checkout_failure_shows_server_message() -> Result<()> {
    let app = spawn_test_app().await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(402).set_body_json(json!({
            "error": {"message": "Your card was declined."}
        })))
        .expect(1)
        .mount(&app.stripe_server)
        .await;
    let mut ctrl = controller(&app)?;

    let outcome = ctrl.submit_checkout("ursula@domain.com").await;

    assert_eq!(outcome, SubmitOutcome::Failed("Your card was declined.".into()));
    assert!(ctrl.view().loading.is_empty(), "submit control not restored");
    assert_eq!(
        ctrl.visible_message(FormKind::Checkout, Instant::now()),
        Some(&FormMessage::error("Your card was declined."))
    );
    Ok(())
}

#[tokio::test]
async fn form_subscribe_roundtrip() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;
    Mock::given(path("/api/v2/subscribers"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.mailerlite_server)
        .await;
    let mut ctrl = controller(&app)?;

    let outcome = ctrl
        .submit_subscribe("ursula@domain.com", Some("live sound"))
        .await;

    assert_eq!(outcome, SubmitOutcome::Subscribed);
    assert_eq!(ctrl.view().resets, vec![FormKind::Subscribe]);
    assert_eq!(
        ctrl.view().messages,
        vec![(
            FormKind::Subscribe,
            FormMessage::success("Thank you! We'll send updates to ursula@domain.com.")
        )]
    );
    Ok(())
}

#[tokio::test]
async fn form_subscribe_failure_is_reported() -> Result<()> {
    let app = TestApp::spawn_with(ProviderSetup::MailerLite).await?;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.mailerlite_server)
        .await;
    let mut ctrl = controller(&app)?;

    let outcome = ctrl.submit_subscribe("ursula@domain.com", None).await;

    assert_eq!(outcome, SubmitOutcome::Failed("Subscription failed".into()));
    assert!(ctrl.view().resets.is_empty());
    Ok(())
}
