//! Rejection reasons translated to stable user-facing messages
//!
//! The mapper matches substrings of the lowercase reason text against a
//! fixed table in order; the first matching row wins and anything
//! unmatched falls back to a generic code. Matching on text rather than
//! on the `Reason` variants keeps the code/message pairs stable even if
//! reason wording gains detail, at the cost of being fragile for future
//! reasons whose text happens to contain an earlier row's needle.

use crate::filter::Reason;
use serde::Serialize;

/// Safe-to-expose translation of a rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserMessage {
    pub code: &'static str,
    pub message: &'static str,
    pub field: &'static str,
}

/// Substring needles → (code, message); row order is load-bearing
const MESSAGE_TABLE: &[(&[&str], &str, &str)] = &[
    (
        &["empty"],
        "email_missing",
        "Please enter your email address.",
    ),
    (
        &["invalid format", "invalid local", "invalid domain"],
        "email_invalid_format",
        "That email address doesn't look right. Please check it and try again.",
    ),
    (
        &["too long"],
        "email_too_long",
        "That email address is too long.",
    ),
    (
        &["blocked domain", "example"],
        "email_blocked_domain",
        "Please use a real email address rather than a placeholder one.",
    ),
    (
        &["disposable", "temp"],
        "email_disposable",
        "Disposable email addresses aren't accepted. Please use a personal or work address.",
    ),
    (
        &["role", "test", "dummy"],
        "email_role_or_test",
        "Please use a personal email address rather than a role or test mailbox.",
    ),
    (
        &["no mail servers", "domain verification failed"],
        "email_domain_unverified",
        "We couldn't verify that this email domain can receive mail.",
    ),
];

const FALLBACK: UserMessage = UserMessage {
    code: "email_unacceptable",
    message: "This email address can't be accepted.",
    field: "email",
};

/// Translate a rejection reason into its user-facing message
///
/// Total: every reason maps to a row or to the fallback; never fails.
pub fn to_user_message(reason: &Reason) -> UserMessage {
    let text = reason.to_string().to_lowercase();

    for &(needles, code, message) in MESSAGE_TABLE {
        if needles.iter().any(|needle| text.contains(needle)) {
            return UserMessage {
                code,
                message,
                field: "email",
            };
        }
    }

    FALLBACK
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_REASONS: &[Reason] = &[
        Reason::Empty,
        Reason::InvalidFormat,
        Reason::LocalPartTooLong,
        Reason::DomainTooLong,
        Reason::InvalidLocalPart,
        Reason::InvalidDomain,
        Reason::PlaceholderDomain,
        Reason::DisposableDomain,
        Reason::RoleAccount,
        Reason::TestPattern,
        Reason::NumericDomain,
        Reason::NoMailServers,
        Reason::VerificationFailed,
    ];

    #[test]
    fn test_known_codes() {
        assert_eq!(to_user_message(&Reason::Empty).code, "email_missing");
        assert_eq!(
            to_user_message(&Reason::InvalidFormat).code,
            "email_invalid_format"
        );
        assert_eq!(
            to_user_message(&Reason::InvalidLocalPart).code,
            "email_invalid_format"
        );
        assert_eq!(
            to_user_message(&Reason::InvalidDomain).code,
            "email_invalid_format"
        );
        assert_eq!(
            to_user_message(&Reason::LocalPartTooLong).code,
            "email_too_long"
        );
        assert_eq!(to_user_message(&Reason::DomainTooLong).code, "email_too_long");
        assert_eq!(
            to_user_message(&Reason::PlaceholderDomain).code,
            "email_blocked_domain"
        );
        assert_eq!(
            to_user_message(&Reason::DisposableDomain).code,
            "email_disposable"
        );
        assert_eq!(
            to_user_message(&Reason::RoleAccount).code,
            "email_role_or_test"
        );
        assert_eq!(
            to_user_message(&Reason::TestPattern).code,
            "email_role_or_test"
        );
        assert_eq!(
            to_user_message(&Reason::NoMailServers).code,
            "email_domain_unverified"
        );
        assert_eq!(
            to_user_message(&Reason::VerificationFailed).code,
            "email_domain_unverified"
        );
    }

    #[test]
    fn test_unmatched_reason_falls_back() {
        // "suspicious domain" has no row of its own
        assert_eq!(
            to_user_message(&Reason::NumericDomain).code,
            "email_unacceptable"
        );
    }

    #[test]
    fn test_total_over_all_reasons() {
        let known_codes = [
            "email_missing",
            "email_invalid_format",
            "email_too_long",
            "email_blocked_domain",
            "email_disposable",
            "email_role_or_test",
            "email_domain_unverified",
            "email_unacceptable",
        ];

        for reason in ALL_REASONS {
            let message = to_user_message(reason);
            assert!(
                known_codes.contains(&message.code),
                "unknown code {} for reason {}",
                message.code,
                reason
            );
            assert_eq!(message.field, "email");
            assert!(!message.message.is_empty());
        }
    }

    #[test]
    fn test_deterministic() {
        for reason in ALL_REASONS {
            assert_eq!(to_user_message(reason), to_user_message(reason));
        }
    }
}
