//! Email acceptability filter
//!
//! Decides whether a submitted address is worth relaying mail for,
//! before any transport work happens. Rules run in a fixed order and
//! the first failing rule determines the rejection reason, even when
//! several rules would fail. Network-touching verification (DNS) runs
//! last and only when enabled, so the common rejection paths never
//! leave the process.
//!
//! The blocklists are intentionally conservative and accept false
//! positives: a legitimate local part that merely contains "test" is
//! rejected. Tighten the lists rather than reordering rules; the order
//! is what keeps rejection reasons deterministic.

pub mod blocklist;
pub mod dns;
pub mod messages;

pub use messages::{to_user_message, UserMessage};

use crate::error::Result;
use crate::filter::dns::DnsResolver;
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of an acceptability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Reason),
}

/// Which rule failed, one variant per rule outcome
///
/// The `Display` rendering is the internal reason text; the mapper in
/// [`messages`] matches on it to build the user-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    Empty,
    InvalidFormat,
    LocalPartTooLong,
    DomainTooLong,
    InvalidLocalPart,
    InvalidDomain,
    PlaceholderDomain,
    DisposableDomain,
    RoleAccount,
    TestPattern,
    NumericDomain,
    NoMailServers,
    VerificationFailed,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reason::Empty => "empty",
            Reason::InvalidFormat => "invalid format",
            Reason::LocalPartTooLong => "local part too long",
            Reason::DomainTooLong => "domain too long",
            Reason::InvalidLocalPart => "invalid local",
            Reason::InvalidDomain => "invalid domain",
            Reason::PlaceholderDomain => "blocked domain (example)",
            Reason::DisposableDomain => "disposable email provider",
            Reason::RoleAccount => "role or test account blocked",
            Reason::TestPattern => "test/dummy address blocked",
            Reason::NumericDomain => "suspicious domain",
            Reason::NoMailServers => "no mail servers for domain (MX/A/AAAA missing)",
            Reason::VerificationFailed => "domain verification failed",
        };
        f.write_str(text)
    }
}

/// Acceptability filter over candidate addresses
///
/// Stateless between calls; holds only the pre-compiled patterns, the
/// DNS toggle and the resolver handle.
pub struct EmailFilter {
    /// `local@domain.tld` shape, no whitespace, single `@`
    format: Regex,
    /// `test` followed by optional digits, whole local part
    test_local: Regex,
    verify_dns: bool,
    resolver: Arc<dyn DnsResolver>,
}

impl EmailFilter {
    pub fn new(verify_dns: bool, resolver: Arc<dyn DnsResolver>) -> Result<Self> {
        Ok(Self {
            format: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
            test_local: Regex::new(r"^test[0-9]*$")?,
            verify_dns,
            resolver,
        })
    }

    /// Run the rule chain against a candidate address
    ///
    /// Suspends only for DNS verification, and only when that is
    /// enabled. DNS failures reject the address (fail closed); they are
    /// never treated as "skip this check".
    pub async fn check(&self, candidate: &str) -> Verdict {
        let candidate = candidate.trim();

        if candidate.is_empty() {
            return Verdict::Rejected(Reason::Empty);
        }

        if !self.format.is_match(candidate) {
            return Verdict::Rejected(Reason::InvalidFormat);
        }

        let Some((local, domain)) = candidate.split_once('@') else {
            return Verdict::Rejected(Reason::InvalidFormat);
        };

        // Ordered predicate chain; first failure wins
        let rules: &[&(dyn Fn() -> Option<Reason> + Send + Sync)] = &[
            &|| check_lengths(local, domain),
            &|| check_local_shape(local),
            &|| check_domain_shape(domain),
            &|| check_placeholder_domain(domain),
            &|| check_disposable_domain(domain),
            &|| check_role_account(local),
            &|| self.check_test_pattern(local),
            &|| check_numeric_domain(domain),
        ];

        for rule in rules {
            if let Some(reason) = rule() {
                debug!("Rejected candidate address: {}", reason);
                return Verdict::Rejected(reason);
            }
        }

        if self.verify_dns {
            if let Some(reason) = self.verify_domain(domain).await {
                debug!("Rejected candidate address: {}", reason);
                return Verdict::Rejected(reason);
            }
        }

        Verdict::Accepted
    }

    fn check_test_pattern(&self, local: &str) -> Option<Reason> {
        let local = local.to_ascii_lowercase();
        if self.test_local.is_match(&local) || local.contains("test") || local.contains("dummy") {
            return Some(Reason::TestPattern);
        }
        None
    }

    /// Rule 11: the domain must be able to receive mail
    ///
    /// MX first; a domain without MX can still receive mail through its
    /// address records, so fall back to A then AAAA. All three empty
    /// means nothing accepts mail there.
    async fn verify_domain(&self, domain: &str) -> Option<Reason> {
        let mx = match self.resolver.mx_records(domain).await {
            Ok(mx) => mx,
            Err(e) => {
                warn!("MX lookup failed for {}: {}", domain, e);
                return Some(Reason::VerificationFailed);
            }
        };
        if !mx.is_empty() {
            return None;
        }

        let a = match self.resolver.ipv4_records(domain).await {
            Ok(a) => a,
            Err(e) => {
                warn!("A lookup failed for {}: {}", domain, e);
                return Some(Reason::VerificationFailed);
            }
        };
        if !a.is_empty() {
            return None;
        }

        let aaaa = match self.resolver.ipv6_records(domain).await {
            Ok(aaaa) => aaaa,
            Err(e) => {
                warn!("AAAA lookup failed for {}: {}", domain, e);
                return Some(Reason::VerificationFailed);
            }
        };
        if !aaaa.is_empty() {
            return None;
        }

        Some(Reason::NoMailServers)
    }
}

fn check_lengths(local: &str, domain: &str) -> Option<Reason> {
    if local.len() > 64 {
        return Some(Reason::LocalPartTooLong);
    }
    if domain.len() > 255 {
        return Some(Reason::DomainTooLong);
    }
    None
}

fn check_local_shape(local: &str) -> Option<Reason> {
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Some(Reason::InvalidLocalPart);
    }
    None
}

fn check_domain_shape(domain: &str) -> Option<Reason> {
    if domain.starts_with('-') || domain.ends_with('-') || domain.contains("..") {
        return Some(Reason::InvalidDomain);
    }
    None
}

fn check_placeholder_domain(domain: &str) -> Option<Reason> {
    if blocklist::is_placeholder_domain(domain)
        || domain.to_ascii_lowercase().contains("example")
    {
        return Some(Reason::PlaceholderDomain);
    }
    None
}

fn check_disposable_domain(domain: &str) -> Option<Reason> {
    if blocklist::is_disposable_domain(domain) {
        return Some(Reason::DisposableDomain);
    }
    None
}

fn check_role_account(local: &str) -> Option<Reason> {
    if blocklist::is_role_account(local) {
        return Some(Reason::RoleAccount);
    }
    None
}

fn check_numeric_domain(domain: &str) -> Option<Reason> {
    let digits: String = domain.chars().filter(|c| *c != '.').collect();
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return Some(Reason::NumericDomain);
    }
    None
}
