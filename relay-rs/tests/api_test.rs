//! Router-level tests for the form endpoints
//!
//! Drives the real router with a recording mail transport, so every
//! status code and send sequence is checked without opening sockets.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use relay_rs::api::ApiServer;
use relay_rs::config::Config;
use relay_rs::error::{RelayError, Result};
use relay_rs::filter::dns::DnsResolver;
use relay_rs::filter::EmailFilter;
use relay_rs::mailer::{MailTransport, OutgoingEmail};
use serde_json::Value;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Resolver stub; DNS verification is off in these tests
struct NoopResolver;

#[async_trait]
impl DnsResolver for NoopResolver {
    async fn mx_records(&self, _domain: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn ipv4_records(&self, _domain: &str) -> Result<Vec<Ipv4Addr>> {
        Ok(Vec::new())
    }

    async fn ipv6_records(&self, _domain: &str) -> Result<Vec<Ipv6Addr>> {
        Ok(Vec::new())
    }
}

/// Transport double that records every send
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Transport double that fails every send, counting attempts
#[derive(Default)]
struct FailingMailer {
    attempts: Mutex<u32>,
}

#[async_trait]
impl MailTransport for FailingMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(RelayError::Config("connection refused".to_string()))
    }
}

fn test_router(expose_reasons: bool, mailer: Arc<dyn MailTransport>) -> Router {
    let mut config = Config::default();
    config.filter.expose_reasons = expose_reasons;

    let filter = EmailFilter::new(false, Arc::new(NoopResolver)).unwrap();
    ApiServer::new(&config, filter, mailer).router()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_contact_accepted_sends_notification_then_autoresponse() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer.clone());

    let response = app
        .oneshot(post_json(
            "/api/contact",
            r#"{"name":"Jane Doe","email":"jane.doe@gmail.com","message":"Hello there"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["ok"], true);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);

    // Admin notification first, with Reply-To pointing at the submitter
    assert_eq!(sent[0].to, "admin@localhost");
    assert_eq!(sent[0].reply_to.as_deref(), Some("jane.doe@gmail.com"));
    assert!(sent[0].body_text.contains("Jane Doe"));
    assert!(sent[0].body_text.contains("Hello there"));

    // Autoresponder second
    assert_eq!(sent[1].to, "jane.doe@gmail.com");
    assert!(sent[1].reply_to.is_none());
    assert!(sent[1].body_html.is_some());
}

#[tokio::test]
async fn test_subscribe_accepted_sends_notification_then_confirmation() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer.clone());

    let response = app
        .oneshot(post_json(
            "/api/subscribe",
            r#"{"email":"jane.doe@gmail.com","name":"Jane"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "admin@localhost");
    assert_eq!(sent[1].to, "jane.doe@gmail.com");
    assert!(sent[1].body_text.contains("Hi Jane,"));
}

#[tokio::test]
async fn test_subscribe_blocks_role_account() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer.clone());

    let response = app
        .oneshot(post_json("/api/subscribe", r#"{"email":"test@gmail.com"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["code"], "email_role_or_test");
    assert_eq!(body["field"], "email");
    // internal reason stays internal by default
    assert!(body.get("reason").is_none());

    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_contact_rejects_invalid_format() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer.clone());

    let response = app
        .oneshot(post_json(
            "/api/contact",
            r#"{"name":"Jane","email":"not-an-email","message":"Hi"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "email_invalid_format");
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_contact_missing_fields_is_400_before_filtering() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer.clone());

    // email present but name and message missing
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/contact",
            r#"{"email":"jane.doe@gmail.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);
    assert!(body["error"].is_string());

    // whitespace-only required fields count as missing
    let response = app
        .oneshot(post_json(
            "/api/contact",
            r#"{"name":"  ","email":"jane.doe@gmail.com","message":"Hi"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_subscribe_missing_email_is_400() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer.clone());

    let response = app
        .oneshot(post_json("/api/subscribe", r#"{"name":"Jane"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(mailer.sent().is_empty());
}

#[tokio::test]
async fn test_send_failure_is_500_and_aborts_second_send() {
    let mailer = Arc::new(FailingMailer::default());
    let app = test_router(false, mailer.clone());

    let response = app
        .oneshot(post_json(
            "/api/contact",
            r#"{"name":"Jane","email":"jane.doe@gmail.com","message":"Hi"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["ok"], false);

    // notification failed, the autoresponse was never attempted
    assert_eq!(*mailer.attempts.lock().unwrap(), 1);
}

#[tokio::test]
async fn test_expose_reasons_includes_internal_reason() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(true, mailer.clone());

    let response = app
        .oneshot(post_json(
            "/api/subscribe",
            r#"{"email":"user@mailinator.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["code"], "email_disposable");
    assert_eq!(body["reason"], "disposable email provider");
}

#[tokio::test]
async fn test_health() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_rate_limit_kicks_in() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = test_router(false, mailer);

    // without a socket every request shares the same "unknown" peer
    for _ in 0..30 {
        let response = app
            .clone()
            .oneshot(post_json("/api/subscribe", r#"{}"#))
            .await
            .unwrap();
        assert_ne!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    let response = app
        .oneshot(post_json("/api/subscribe", r#"{}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
}
