//! Registry API response models.

use serde::Deserialize;

/// Full company profile from `GET /company/{number}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_number: String,
    #[serde(default)]
    pub company_status: String,
    #[serde(default)]
    pub registered_office_address: Option<RegisteredAddress>,
}

impl CompanyProfile {
    pub fn is_active(&self) -> bool {
        self.company_status.eq_ignore_ascii_case("active")
    }

    /// Single-line formatted registered address, empty when unknown.
    pub fn formatted_address(&self) -> String {
        self.registered_office_address
            .as_ref()
            .map(RegisteredAddress::formatted)
            .unwrap_or_default()
    }
}

/// Registered office address fields the scoring engine compares against.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisteredAddress {
    #[serde(default)]
    pub address_line_1: Option<String>,
    #[serde(default)]
    pub address_line_2: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl RegisteredAddress {
    /// Join the populated parts with commas.
    pub fn formatted(&self) -> String {
        [
            &self.address_line_1,
            &self.address_line_2,
            &self.locality,
            &self.postal_code,
        ]
        .into_iter()
        .filter_map(|part| part.as_deref())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// Response body of `GET /search/companies`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanySearchResults {
    #[serde(default)]
    pub items: Vec<CompanySearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanySearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_number: String,
    #[serde(default)]
    pub company_status: String,
}

impl CompanySearchItem {
    pub fn is_active(&self) -> bool {
        self.company_status == "active"
    }
}

/// Response body of `GET /company/{number}/officers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficerList {
    #[serde(default)]
    pub items: Vec<Officer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Officer {
    #[serde(default)]
    pub name: String,
    /// Present once the officer has resigned.
    #[serde(default)]
    pub resigned_on: Option<String>,
}

impl Officer {
    pub fn is_serving(&self) -> bool {
        self.resigned_on.is_none()
    }
}
