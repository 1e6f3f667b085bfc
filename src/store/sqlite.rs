//! SQLite-backed company store.
//!
//! Connection access is serialized behind a mutex and every query runs
//! on the blocking pool. Upserts use `ON CONFLICT(company_number)` so a
//! company number can never occupy two rows.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{CompanyRecord, CompanyStatus, CompanyStore, StoreError, SuspiciousCompany};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    company_number TEXT NOT NULL UNIQUE,
    registered_address TEXT,
    status TEXT NOT NULL DEFAULT 'unknown',
    score INTEGER NOT NULL DEFAULT 0,
    website_domain TEXT,
    last_updated TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_companies_name ON companies(name);

CREATE TABLE IF NOT EXISTS suspicious_companies (
    id INTEGER PRIMARY KEY,
    company_name TEXT NOT NULL,
    company_number TEXT UNIQUE,
    evidence TEXT,
    active INTEGER NOT NULL DEFAULT 1
);
";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| StoreError::Task("connection mutex poisoned".to_string()))?;
            op(&guard)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<CompanyRecord> {
    let status: String = row.get("status")?;
    let last_updated: String = row.get("last_updated")?;
    Ok(CompanyRecord {
        name: row.get("name")?,
        company_number: row.get("company_number")?,
        registered_address: row.get("registered_address")?,
        status: CompanyStatus::parse(&status),
        score: row.get("score")?,
        website_domain: row.get("website_domain")?,
        last_updated: DateTime::parse_from_rfc3339(&last_updated)
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[async_trait]
impl CompanyStore for SqliteStore {
    async fn get_company_by_number(
        &self,
        number: &str,
    ) -> Result<Option<CompanyRecord>, StoreError> {
        let number = number.to_string();
        self.with_conn(move |conn| {
            let record = conn
                .query_row(
                    "SELECT * FROM companies WHERE company_number = ?1",
                    params![number],
                    row_to_record,
                )
                .optional()?;
            Ok(record)
        })
        .await
    }

    async fn upsert_company(&self, record: CompanyRecord) -> Result<i64, StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO companies
                     (name, company_number, registered_address, status, score,
                      website_domain, last_updated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                 ON CONFLICT(company_number) DO UPDATE SET
                     name = excluded.name,
                     registered_address = excluded.registered_address,
                     status = excluded.status,
                     score = excluded.score,
                     website_domain = excluded.website_domain,
                     last_updated = excluded.last_updated",
                params![
                    record.name,
                    record.company_number,
                    record.registered_address,
                    record.status.as_str(),
                    record.score,
                    record.website_domain,
                    record.last_updated.to_rfc3339(),
                ],
            )?;
            let id = conn.query_row(
                "SELECT id FROM companies WHERE company_number = ?1",
                params![record.company_number],
                |row| row.get(0),
            )?;
            Ok(id)
        })
        .await
    }

    async fn get_companies_by_name(&self, name: &str) -> Result<Vec<CompanyRecord>, StoreError> {
        let name = name.to_string();
        self.with_conn(move |conn| {
            let mut statement =
                conn.prepare("SELECT * FROM companies WHERE LOWER(name) = LOWER(?1)")?;
            let rows = statement.query_map(params![name], row_to_record)?;
            let mut records = Vec::new();
            for row in rows {
                records.push(row?);
            }
            Ok(records)
        })
        .await
    }

    async fn delete_company_by_number(&self, number: &str) -> Result<bool, StoreError> {
        let number = number.to_string();
        self.with_conn(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM companies WHERE company_number = ?1",
                params![number],
            )?;
            Ok(deleted > 0)
        })
        .await
    }

    async fn find_suspicious(
        &self,
        number: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<SuspiciousCompany>, StoreError> {
        let number = number.map(str::to_string);
        let name = name.map(str::to_string);
        self.with_conn(move |conn| {
            let to_entry = |row: &Row<'_>| -> rusqlite::Result<SuspiciousCompany> {
                Ok(SuspiciousCompany {
                    company_name: row.get("company_name")?,
                    company_number: row.get("company_number")?,
                    evidence: row.get("evidence")?,
                    active: row.get::<_, i64>("active")? != 0,
                })
            };
            if let Some(number) = number {
                return Ok(conn
                    .query_row(
                        "SELECT * FROM suspicious_companies
                         WHERE company_number = ?1 AND active = 1",
                        params![number],
                        to_entry,
                    )
                    .optional()?);
            }
            if let Some(name) = name {
                let pattern = format!("%{}%", name.to_lowercase());
                return Ok(conn
                    .query_row(
                        "SELECT * FROM suspicious_companies
                         WHERE LOWER(company_name) LIKE ?1 AND active = 1",
                        params![pattern],
                        to_entry,
                    )
                    .optional()?);
            }
            Ok(None)
        })
        .await
    }

    async fn add_suspicious(&self, entry: SuspiciousCompany) -> Result<(), StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO suspicious_companies (company_name, company_number, evidence, active)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(company_number) DO UPDATE SET
                     company_name = excluded.company_name,
                     evidence = excluded.evidence,
                     active = excluded.active",
                params![
                    entry.company_name,
                    entry.company_number,
                    entry.evidence,
                    entry.active as i64,
                ],
            )?;
            Ok(())
        })
        .await
    }
}
