//! DNS resolution for submitter-domain verification
//!
//! The filter only needs three record capabilities (MX, A, AAAA), so the
//! resolver sits behind a trait and tests inject a deterministic fake.
//!
//! Lookup outcomes are split into two cases the filter relies on:
//! - a domain that resolves but has no records of the requested type
//!   returns an empty list (the filter falls through to the next record
//!   type),
//! - NXDOMAIN and transport-level failures (network errors, timeouts)
//!   return an error (the filter fails closed).

use crate::error::{RelayError, Result};
use async_trait::async_trait;
use std::net::{Ipv4Addr, Ipv6Addr};
use tracing::debug;
use trust_dns_resolver::config::*;
use trust_dns_resolver::error::{ResolveError, ResolveErrorKind};
use trust_dns_resolver::proto::op::ResponseCode;
use trust_dns_resolver::TokioAsyncResolver;

/// Record lookups needed to decide whether a domain can receive mail
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DnsResolver: Send + Sync {
    /// MX exchange hosts for `domain`, sorted by preference
    async fn mx_records(&self, domain: &str) -> Result<Vec<String>>;

    /// A records for `domain`
    async fn ipv4_records(&self, domain: &str) -> Result<Vec<Ipv4Addr>>;

    /// AAAA records for `domain`
    async fn ipv6_records(&self, domain: &str) -> Result<Vec<Ipv6Addr>>;
}

/// Production resolver over the system/default DNS configuration
pub struct TrustDnsResolver {
    resolver: TokioAsyncResolver,
}

impl TrustDnsResolver {
    pub fn new() -> Self {
        let resolver = TokioAsyncResolver::tokio(
            ResolverConfig::default(),
            ResolverOpts::default(),
        );

        Self { resolver }
    }
}

impl Default for TrustDnsResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a resolver error to the empty-vs-failed split described above
fn empty_or_error<T>(err: ResolveError) -> Result<Vec<T>> {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. }
            if *response_code == ResponseCode::NXDomain =>
        {
            Err(RelayError::DnsLookup(format!(
                "domain does not exist: {}",
                err
            )))
        }
        ResolveErrorKind::NoRecordsFound { .. } => Ok(Vec::new()),
        _ => Err(RelayError::DnsLookup(err.to_string())),
    }
}

#[async_trait]
impl DnsResolver for TrustDnsResolver {
    async fn mx_records(&self, domain: &str) -> Result<Vec<String>> {
        let lookup = match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => lookup,
            Err(e) => return empty_or_error(e),
        };

        // Extract and sort MX records by preference (lowest first)
        let mut records: Vec<(u16, String)> = lookup
            .iter()
            .map(|mx| {
                let preference = mx.preference();
                let exchange = mx.exchange().to_string().trim_end_matches('.').to_string();
                (preference, exchange)
            })
            .collect();

        records.sort_by_key(|(preference, _)| *preference);

        debug!("Found {} MX records for {}", records.len(), domain);

        Ok(records.into_iter().map(|(_, host)| host).collect())
    }

    async fn ipv4_records(&self, domain: &str) -> Result<Vec<Ipv4Addr>> {
        match self.resolver.ipv4_lookup(domain).await {
            Ok(lookup) => Ok(lookup.iter().map(|a| a.0).collect()),
            Err(e) => empty_or_error(e),
        }
    }

    async fn ipv6_records(&self, domain: &str) -> Result<Vec<Ipv6Addr>> {
        match self.resolver.ipv6_lookup(domain).await {
            Ok(lookup) => Ok(lookup.iter().map(|aaaa| aaaa.0).collect()),
            Err(e) => empty_or_error(e),
        }
    }
}
