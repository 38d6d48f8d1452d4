//! Outbound message templates with variable substitution
//!
//! Four messages leave this service: the admin notification and the
//! autoresponder for contact submissions, and the admin notification
//! and the confirmation for newsletter subscriptions. Bodies are static
//! templates with `{{var}}` placeholders; `{{date}}` is filled from the
//! clock, everything else from the submission.

use chrono::Utc;
use std::collections::HashMap;

/// Fields of an accepted contact submission
#[derive(Debug, Clone)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub project: Option<String>,
}

/// Fields of an accepted subscribe submission
#[derive(Debug, Clone)]
pub struct SubscribeSubmission {
    pub email: String,
    pub name: Option<String>,
    pub project: Option<String>,
}

/// A rendered subject and body pair, HTML alternative optional
#[derive(Debug, Clone)]
pub struct RenderedEmail {
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
}

const CONTACT_NOTIFY_SUBJECT: &str = "[{{site_name}}] New contact form message from {{name}}";

const CONTACT_NOTIFY_TEXT: &str = "\
New contact form submission on {{site_name}}.

Name: {{name}}
Email: {{email}}
Phone: {{phone}}
Subject: {{subject}}
Project: {{project}}
Received: {{date}}

Message:
{{message}}
";

const CONTACT_REPLY_SUBJECT: &str = "Thanks for contacting {{site_name}}";

const CONTACT_REPLY_TEXT: &str = "\
Hi {{name}},

Thanks for reaching out to {{site_name}}. Your message has been
received and we'll get back to you as soon as we can.

For reference, here is what you sent us:

{{message}}

The {{site_name}} team
";

const CONTACT_REPLY_HTML: &str = "\
<p>Hi {{name}},</p>
<p>Thanks for reaching out to {{site_name}}. Your message has been
received and we'll get back to you as soon as we can.</p>
<p>For reference, here is what you sent us:</p>
<blockquote>{{message}}</blockquote>
<p>The {{site_name}} team</p>
";

const SUBSCRIBE_NOTIFY_SUBJECT: &str = "[{{site_name}}] New newsletter subscriber";

const SUBSCRIBE_NOTIFY_TEXT: &str = "\
New newsletter subscription on {{site_name}}.

Email: {{email}}
Name: {{name}}
Project: {{project}}
Received: {{date}}
";

const SUBSCRIBE_CONFIRM_SUBJECT: &str = "Welcome to the {{site_name}} newsletter";

const SUBSCRIBE_CONFIRM_TEXT: &str = "\
Hi {{name}},

You're now subscribed to updates from {{site_name}}. If this wasn't
you, just ignore this email and you won't hear from us again.

The {{site_name}} team
";

const SUBSCRIBE_CONFIRM_HTML: &str = "\
<p>Hi {{name}},</p>
<p>You're now subscribed to updates from {{site_name}}. If this wasn't
you, just ignore this email and you won't hear from us again.</p>
<p>The {{site_name}} team</p>
";

pub fn contact_notification(site_name: &str, submission: &ContactSubmission) -> RenderedEmail {
    let vars = contact_vars(site_name, submission);

    RenderedEmail {
        subject: render(CONTACT_NOTIFY_SUBJECT, &vars),
        body_text: render(CONTACT_NOTIFY_TEXT, &vars),
        body_html: None,
    }
}

pub fn contact_autoresponse(site_name: &str, submission: &ContactSubmission) -> RenderedEmail {
    let vars = contact_vars(site_name, submission);

    RenderedEmail {
        subject: render(CONTACT_REPLY_SUBJECT, &vars),
        body_text: render(CONTACT_REPLY_TEXT, &vars),
        body_html: Some(render(CONTACT_REPLY_HTML, &vars)),
    }
}

pub fn subscribe_notification(site_name: &str, submission: &SubscribeSubmission) -> RenderedEmail {
    let vars = subscribe_vars(site_name, submission);

    RenderedEmail {
        subject: render(SUBSCRIBE_NOTIFY_SUBJECT, &vars),
        body_text: render(SUBSCRIBE_NOTIFY_TEXT, &vars),
        body_html: None,
    }
}

pub fn subscribe_confirmation(site_name: &str, submission: &SubscribeSubmission) -> RenderedEmail {
    let vars = subscribe_vars(site_name, submission);

    RenderedEmail {
        subject: render(SUBSCRIBE_CONFIRM_SUBJECT, &vars),
        body_text: render(SUBSCRIBE_CONFIRM_TEXT, &vars),
        body_html: Some(render(SUBSCRIBE_CONFIRM_HTML, &vars)),
    }
}

fn contact_vars(site_name: &str, submission: &ContactSubmission) -> HashMap<&'static str, String> {
    HashMap::from([
        ("site_name", site_name.to_string()),
        ("name", submission.name.clone()),
        ("email", submission.email.clone()),
        ("phone", optional(&submission.phone)),
        ("subject", optional(&submission.subject)),
        ("project", optional(&submission.project)),
        ("message", submission.message.clone()),
    ])
}

fn subscribe_vars(
    site_name: &str,
    submission: &SubscribeSubmission,
) -> HashMap<&'static str, String> {
    HashMap::from([
        ("site_name", site_name.to_string()),
        ("email", submission.email.clone()),
        (
            "name",
            submission.name.clone().unwrap_or_else(|| "there".to_string()),
        ),
        ("project", optional(&submission.project)),
    ])
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_else(|| "(not provided)".to_string())
}

/// Render a template string with variable substitution
///
/// `{{date}}` is a system variable; unknown placeholders are left
/// intact so a missing variable is visible instead of silently blank.
fn render(template_str: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template_str.to_string();

    let now = Utc::now();
    result = result.replace("{{date}}", &now.format("%Y-%m-%d %H:%M:%S UTC").to_string());

    for (key, value) in vars {
        let placeholder = format!("{{{{{}}}}}", key);
        result = result.replace(&placeholder, value);
    }

    result
}
