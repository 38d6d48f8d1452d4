//! Static blocklists consulted by the acceptability filter
//!
//! All three sets are process-wide constants. Membership tests are
//! case-insensitive; entries are stored lowercase.

/// Reserved placeholder domains (RFC 2606)
///
/// Subdomains and lookalikes are caught separately by the "example"
/// substring rule in the filter.
const PLACEHOLDER_DOMAINS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "example.edu",
];

/// Known disposable/throwaway email providers
///
/// Curated from public disposable-domain lists. Exact-match only:
/// a provider's secondary domains need their own entries.
const DISPOSABLE_DOMAINS: &[&str] = &[
    "10minutemail.com",
    "burnermail.io",
    "discard.email",
    "dispostable.com",
    "fakeinbox.com",
    "getnada.com",
    "guerrillamail.com",
    "guerrillamail.net",
    "maildrop.cc",
    "mailinator.com",
    "mailnesia.com",
    "mintemail.com",
    "mytemp.email",
    "sharklasers.com",
    "spamgourmet.com",
    "temp-mail.org",
    "tempinbox.com",
    "tempmail.com",
    "throwaway.email",
    "trashmail.com",
    "yopmail.com",
];

/// Role and test mailbox names that never belong to a real submitter
const ROLE_ACCOUNTS: &[&str] = &[
    "abuse",
    "admin",
    "administrator",
    "demo",
    "do-not-reply",
    "donotreply",
    "dummy",
    "hostmaster",
    "mailer-daemon",
    "no-reply",
    "noreply",
    "postmaster",
    "root",
    "sample",
    "support",
    "test",
    "testing",
    "webmaster",
];

pub fn is_placeholder_domain(domain: &str) -> bool {
    PLACEHOLDER_DOMAINS
        .iter()
        .any(|d| d.eq_ignore_ascii_case(domain))
}

pub fn is_disposable_domain(domain: &str) -> bool {
    DISPOSABLE_DOMAINS
        .iter()
        .any(|d| d.eq_ignore_ascii_case(domain))
}

pub fn is_role_account(local: &str) -> bool {
    ROLE_ACCOUNTS.iter().any(|l| l.eq_ignore_ascii_case(local))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_domains() {
        assert!(is_placeholder_domain("example.com"));
        assert!(is_placeholder_domain("EXAMPLE.ORG"));
        assert!(!is_placeholder_domain("gmail.com"));
    }

    #[test]
    fn test_disposable_domains() {
        assert!(is_disposable_domain("mailinator.com"));
        assert!(is_disposable_domain("Yopmail.com"));
        assert!(!is_disposable_domain("fastmail.com"));
    }

    #[test]
    fn test_role_accounts() {
        assert!(is_role_account("admin"));
        assert!(is_role_account("Postmaster"));
        assert!(is_role_account("noreply"));
        assert!(!is_role_account("jane"));
    }
}
