//! Rate-limited registry HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::config::RegistrySettings;

use super::models::{CompanyProfile, CompanySearchResults, OfficerList};

const USER_AGENT: &str = concat!("contracheck/", env!("CARGO_PKG_VERSION"));

/// Classified outcome of one registry call.
///
/// Transient failures (timeouts, 429/503) and hard unavailability are
/// separate variants so each check can pick its own degraded score.
#[derive(Debug, Clone)]
pub enum RegistryOutcome<T> {
    Found(T),
    NotFound,
    RateLimited,
    Transient(String),
    Unavailable(String),
}

impl<T> RegistryOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            RegistryOutcome::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Registry operations the scoring engine depends on.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    async fn company_profile(&self, number: &str) -> RegistryOutcome<CompanyProfile>;
    async fn search_companies(&self, query: &str) -> RegistryOutcome<CompanySearchResults>;
    async fn company_officers(&self, number: &str) -> RegistryOutcome<OfficerList>;
}

/// HTTP client for the company information API.
///
/// A counting semaphore caps in-flight requests system-wide; callers
/// over the cap suspend until a permit frees up.
pub struct RegistryClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    gate: Arc<Semaphore>,
}

impl RegistryClient {
    pub fn new(settings: &RegistrySettings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(settings.timeout())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            gate: Arc::new(Semaphore::new(settings.max_concurrent_requests.max(1))),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> RegistryOutcome<T> {
        // Held for the whole request, including body download.
        let _permit = match self.gate.acquire().await {
            Ok(permit) => permit,
            Err(_) => return RegistryOutcome::Unavailable("client shut down".to_string()),
        };

        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.basic_auth(key, Some(""));
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                return RegistryOutcome::Transient(format!("timeout: {e}"));
            }
            Err(e) => return RegistryOutcome::Transient(e.to_string()),
        };

        match response.status() {
            status if status.is_success() => match response.json::<T>().await {
                Ok(body) => RegistryOutcome::Found(body),
                Err(e) => RegistryOutcome::Unavailable(format!("malformed response: {e}")),
            },
            StatusCode::NOT_FOUND => RegistryOutcome::NotFound,
            StatusCode::TOO_MANY_REQUESTS => RegistryOutcome::RateLimited,
            StatusCode::SERVICE_UNAVAILABLE => {
                RegistryOutcome::Transient("service unavailable".to_string())
            }
            status => {
                debug!("registry returned {status} for {path}");
                RegistryOutcome::Unavailable(format!("unexpected status {status}"))
            }
        }
    }
}

#[async_trait]
impl RegistryApi for RegistryClient {
    async fn company_profile(&self, number: &str) -> RegistryOutcome<CompanyProfile> {
        self.get_json(&format!("/company/{number}"), &[]).await
    }

    async fn search_companies(&self, query: &str) -> RegistryOutcome<CompanySearchResults> {
        self.get_json("/search/companies", &[("q", query)]).await
    }

    async fn company_officers(&self, number: &str) -> RegistryOutcome<OfficerList> {
        self.get_json(
            &format!("/company/{number}/officers"),
            &[("items_per_page", "100")],
        )
        .await
    }
}
