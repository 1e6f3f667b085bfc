//! In-memory company store.
//!
//! Default cache when no SQLite path is configured; also the stub of
//! choice in scoring tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CompanyRecord, CompanyStore, StoreError, SuspiciousCompany};

#[derive(Default)]
pub struct MemoryStore {
    companies: RwLock<HashMap<String, (i64, CompanyRecord)>>,
    suspicious: RwLock<Vec<SuspiciousCompany>>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CompanyStore for MemoryStore {
    async fn get_company_by_number(
        &self,
        number: &str,
    ) -> Result<Option<CompanyRecord>, StoreError> {
        let companies = self.companies.read().await;
        Ok(companies.get(number).map(|(_, record)| record.clone()))
    }

    async fn upsert_company(&self, record: CompanyRecord) -> Result<i64, StoreError> {
        let mut companies = self.companies.write().await;
        let key = record.company_number.clone();
        match companies.get_mut(&key) {
            Some((id, existing)) => {
                *existing = record;
                Ok(*id)
            }
            None => {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
                companies.insert(key, (id, record));
                Ok(id)
            }
        }
    }

    async fn get_companies_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, StoreError> {
        let wanted = name.to_lowercase();
        let companies = self.companies.read().await;
        Ok(companies
            .values()
            .filter(|(_, record)| record.name.to_lowercase() == wanted)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn delete_company_by_number(&self, number: &str) -> Result<bool, StoreError> {
        let mut companies = self.companies.write().await;
        Ok(companies.remove(number).is_some())
    }

    async fn find_suspicious(
        &self,
        number: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<SuspiciousCompany>, StoreError> {
        let suspicious = self.suspicious.read().await;
        if let Some(number) = number {
            return Ok(suspicious
                .iter()
                .find(|entry| entry.active && entry.company_number.as_deref() == Some(number))
                .cloned());
        }
        if let Some(name) = name {
            let wanted = name.to_lowercase();
            return Ok(suspicious
                .iter()
                .find(|entry| entry.active && entry.company_name.to_lowercase().contains(&wanted))
                .cloned());
        }
        Ok(None)
    }

    async fn add_suspicious(&self, entry: SuspiciousCompany) -> Result<(), StoreError> {
        self.suspicious.write().await.push(entry);
        Ok(())
    }
}
