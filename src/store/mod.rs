//! Company cache and suspicious-company store.
//!
//! The scoring engine reads and upserts company records through the
//! `CompanyStore` trait. Records are keyed by company number, upserted
//! atomically per key, and considered fresh for a TTL after their last
//! update. Two implementations: an in-memory map and a SQLite file.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store task failed: {0}")]
    Task(String),
}

/// Lifecycle status of a registered company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompanyStatus {
    Active,
    Dissolved,
    Unknown,
}

impl CompanyStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "active" => CompanyStatus::Active,
            "dissolved" => CompanyStatus::Dissolved,
            _ => CompanyStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "active",
            CompanyStatus::Dissolved => "dissolved",
            CompanyStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached company record, at most one per company number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub name: String,
    pub company_number: String,
    pub registered_address: Option<String>,
    pub status: CompanyStatus,
    /// Score contribution recorded at fetch time.
    pub score: i32,
    pub website_domain: Option<String>,
    pub last_updated: DateTime<Utc>,
}

impl CompanyRecord {
    /// Whether the record is still inside its freshness window.
    pub fn is_fresh(&self, ttl: chrono::Duration, now: DateTime<Utc>) -> bool {
        now - self.last_updated < ttl
    }

    pub fn is_active(&self) -> bool {
        self.status == CompanyStatus::Active
    }
}

/// Known-bad company entry maintained out of band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspiciousCompany {
    pub company_name: String,
    pub company_number: Option<String>,
    pub evidence: Option<String>,
    pub active: bool,
}

/// Narrow persistence interface consumed by the scoring engine.
///
/// Upserts are atomic per company number; last-writer-wins is fine
/// since the registry is the source of truth.
#[async_trait]
pub trait CompanyStore: Send + Sync {
    async fn get_company_by_number(&self, number: &str)
        -> Result<Option<CompanyRecord>, StoreError>;

    /// Insert or update the record keyed by its company number,
    /// returning the row id.
    async fn upsert_company(&self, record: CompanyRecord) -> Result<i64, StoreError>;

    /// Companies whose name matches exactly, case-insensitively.
    async fn get_companies_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, StoreError>;

    async fn delete_company_by_number(&self, number: &str) -> Result<bool, StoreError>;

    /// Look up an active suspicious-company entry by number first, then
    /// by name substring.
    async fn find_suspicious(
        &self,
        number: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<SuspiciousCompany>, StoreError>;

    /// Best-effort insert of a suspicious-company entry.
    async fn add_suspicious(&self, entry: SuspiciousCompany) -> Result<(), StoreError>;
}
