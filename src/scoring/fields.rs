//! Typed contract fields.
//!
//! The external AI extractor emits a JSON object with human-readable
//! keys; this is its fixed-shape counterpart. Every member is optional
//! and whitespace-only values count as missing, so the scoring rules
//! never see empty strings.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The ten semantic fields extracted from contract text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractFields {
    #[serde(rename = "Contract Number", default)]
    pub contract_number: Option<String>,
    #[serde(rename = "Company Name", default)]
    pub company_name: Option<String>,
    #[serde(rename = "Company Number", default)]
    pub company_number: Option<String>,
    #[serde(rename = "Registered Address", default)]
    pub registered_address: Option<String>,
    #[serde(rename = "Contact Details", default)]
    pub contact_details: Option<String>,
    #[serde(rename = "Responsible Person Full Name", default)]
    pub responsible_person: Option<String>,
    #[serde(rename = "Contract Date", default)]
    pub contract_date: Option<String>,
    #[serde(rename = "Website Domain", default)]
    pub website_domain: Option<String>,
    #[serde(rename = "Suspicious Phrases Found", default)]
    pub suspicious_phrases: Option<Vec<String>>,
    #[serde(rename = "Text Style", default)]
    pub text_style: Option<String>,
}

impl ContractFields {
    pub fn contract_number(&self) -> Option<&str> {
        clean(&self.contract_number)
    }

    pub fn company_name(&self) -> Option<&str> {
        clean(&self.company_name)
    }

    pub fn company_number(&self) -> Option<&str> {
        clean(&self.company_number)
    }

    pub fn registered_address(&self) -> Option<&str> {
        clean(&self.registered_address)
    }

    pub fn contact_details(&self) -> Option<&str> {
        clean(&self.contact_details)
    }

    pub fn responsible_person(&self) -> Option<&str> {
        clean(&self.responsible_person)
    }

    pub fn contract_date(&self) -> Option<&str> {
        clean(&self.contract_date)
    }

    pub fn website_domain(&self) -> Option<&str> {
        clean(&self.website_domain)
    }

    pub fn text_style(&self) -> Option<&str> {
        clean(&self.text_style)
    }

    /// All present values joined into one haystack for phrase scanning.
    pub fn concatenated(&self) -> String {
        let mut parts: Vec<&str> = [
            &self.contract_number,
            &self.company_name,
            &self.company_number,
            &self.registered_address,
            &self.contact_details,
            &self.responsible_person,
            &self.contract_date,
            &self.website_domain,
            &self.text_style,
        ]
        .into_iter()
        .filter_map(|field| clean(field))
        .collect();
        if let Some(phrases) = &self.suspicious_phrases {
            parts.extend(phrases.iter().map(String::as_str));
        }
        parts.join(" ")
    }
}

fn clean(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Error)]
pub enum FieldExtractionError {
    #[error("data extraction failed: {0}")]
    Failed(String),
}

/// External AI-based field extraction, treated as an atomic fallible call.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    async fn extract(&self, contract_text: &str) -> Result<ContractFields, FieldExtractionError>;
}
