//! Form submission handlers
//!
//! Both form endpoints follow the same sequence: trim and require
//! fields (400), run the acceptability filter (422), then send the
//! admin notification followed by the submitter-facing email (500 on
//! the first failure, the second send is not attempted).

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::config::FormsConfig;
use crate::filter::{to_user_message, EmailFilter, Reason, Verdict};
use crate::mailer::{templates, ContactSubmission, MailTransport, OutgoingEmail, SubscribeSubmission};

/// Shared application state
pub struct AppState {
    pub filter: EmailFilter,
    pub mailer: Arc<dyn MailTransport>,
    pub forms: FormsConfig,
    /// Include the internal rejection reason in 422 bodies (debug only)
    pub expose_reasons: bool,
}

/// Contact form body; everything optional so missing fields reach our
/// own 400 path instead of a deserialization rejection
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

/// Subscribe form body
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: &str) -> Self {
        Self {
            ok: false,
            error: msg.to_string(),
        }
    }
}

/// 422 body: the stable code/message/field triple from the mapper
#[derive(Debug, Serialize)]
pub struct RejectionResponse {
    pub ok: bool,
    pub code: &'static str,
    pub message: &'static str,
    pub field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// POST /api/contact - Relay a contact form submission
pub async fn contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ContactRequest>,
) -> impl IntoResponse {
    let name = req.name.as_deref().map(str::trim).unwrap_or("");
    let email = req.email.as_deref().map(str::trim).unwrap_or("");
    let message = req.message.as_deref().map(str::trim).unwrap_or("");

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("name, email and message are required")),
        )
            .into_response();
    }

    if let Verdict::Rejected(reason) = state.filter.check(email).await {
        return rejection_response(&state, reason);
    }

    let submission = ContactSubmission {
        name: name.to_string(),
        email: email.to_string(),
        phone: trimmed(req.phone),
        subject: trimmed(req.subject),
        message: message.to_string(),
        project: trimmed(req.project),
    };

    let notification = templates::contact_notification(&state.forms.site_name, &submission);
    let notify_email = OutgoingEmail {
        to: state.forms.notify_address.clone(),
        reply_to: Some(submission.email.clone()),
        subject: notification.subject,
        body_text: notification.body_text,
        body_html: notification.body_html,
    };

    if let Err(e) = state.mailer.send(&notify_email).await {
        error!("Failed to send contact notification: {}", e);
        return send_failure();
    }

    let reply = templates::contact_autoresponse(&state.forms.site_name, &submission);
    let reply_email = OutgoingEmail {
        to: submission.email.clone(),
        reply_to: None,
        subject: reply.subject,
        body_text: reply.body_text,
        body_html: reply.body_html,
    };

    if let Err(e) = state.mailer.send(&reply_email).await {
        error!("Failed to send contact autoresponse: {}", e);
        return send_failure();
    }

    (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
}

/// POST /api/subscribe - Relay a newsletter subscription
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubscribeRequest>,
) -> impl IntoResponse {
    let email = req.email.as_deref().map(str::trim).unwrap_or("");

    if email.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("email is required")),
        )
            .into_response();
    }

    if let Verdict::Rejected(reason) = state.filter.check(email).await {
        return rejection_response(&state, reason);
    }

    let submission = SubscribeSubmission {
        email: email.to_string(),
        name: trimmed(req.name),
        project: trimmed(req.project),
    };

    let notification = templates::subscribe_notification(&state.forms.site_name, &submission);
    let notify_email = OutgoingEmail {
        to: state.forms.notify_address.clone(),
        reply_to: None,
        subject: notification.subject,
        body_text: notification.body_text,
        body_html: notification.body_html,
    };

    if let Err(e) = state.mailer.send(&notify_email).await {
        error!("Failed to send subscribe notification: {}", e);
        return send_failure();
    }

    let confirmation = templates::subscribe_confirmation(&state.forms.site_name, &submission);
    let confirm_email = OutgoingEmail {
        to: submission.email.clone(),
        reply_to: None,
        subject: confirmation.subject,
        body_text: confirmation.body_text,
        body_html: confirmation.body_html,
    };

    if let Err(e) = state.mailer.send(&confirm_email).await {
        error!("Failed to send subscribe confirmation: {}", e);
        return send_failure();
    }

    (StatusCode::OK, Json(OkResponse { ok: true })).into_response()
}

/// GET /api/health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "healthy",
            "service": "relay-rs",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

fn rejection_response(state: &AppState, reason: Reason) -> axum::response::Response {
    warn!("Submission rejected: {}", reason);

    let message = to_user_message(&reason);
    let body = RejectionResponse {
        ok: false,
        code: message.code,
        message: message.message,
        field: message.field,
        reason: state.expose_reasons.then(|| reason.to_string()),
    };

    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn send_failure() -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Failed to send email")),
    )
        .into_response()
}

/// Trim an optional field, dropping it entirely when blank
fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
