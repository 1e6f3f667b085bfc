//! Network reachability probes used by the contact and website checks.

use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use tracing::debug;

/// Existence checks for mail and web infrastructure behind a domain.
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// True when the bare domain answers over HTTPS or HTTP with a
    /// non-error status.
    async fn domain_resolves(&self, domain: &str) -> bool;

    /// True when the domain publishes at least one MX record.
    async fn has_mx_records(&self, domain: &str) -> bool;
}

/// Probe implementation using live HTTP requests and DNS lookups.
pub struct HttpProbe {
    client: reqwest::Client,
    resolver: TokioAsyncResolver,
}

impl HttpProbe {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let resolver =
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default());
        Ok(Self { client, resolver })
    }
}

#[async_trait]
impl ReachabilityProbe for HttpProbe {
    async fn domain_resolves(&self, domain: &str) -> bool {
        for scheme in ["https", "http"] {
            match self.client.get(format!("{scheme}://{domain}/")).send().await {
                Ok(response) if response.status().as_u16() < 400 => return true,
                Ok(response) => {
                    debug!("{scheme}://{domain} answered {}", response.status());
                }
                Err(e) => {
                    debug!("{scheme}://{domain} unreachable: {e}");
                }
            }
        }
        false
    }

    async fn has_mx_records(&self, domain: &str) -> bool {
        match self.resolver.mx_lookup(domain).await {
            Ok(lookup) => lookup.iter().next().is_some(),
            Err(e) => {
                debug!("MX lookup failed for {domain}: {e}");
                false
            }
        }
    }
}

/// Whether a domain shares a token longer than two characters with the
/// company name.
pub fn domain_matches_company(domain: &str, company_name: &str) -> bool {
    let domain = domain.to_lowercase();
    company_name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.len() > 2)
        .any(|token| domain.contains(&token.to_lowercase()))
}
