//! Company registry client.
//!
//! Thin, rate-limited HTTP client for the UK company information API,
//! with every call outcome classified into an explicit variant instead
//! of raised errors. The `RegistryApi` trait is the seam the scoring
//! engine consumes, so tests can substitute a stub.

mod client;
mod models;

pub use client::{RegistryApi, RegistryClient, RegistryOutcome};
pub use models::{
    CompanyProfile, CompanySearchItem, CompanySearchResults, Officer, OfficerList,
    RegisteredAddress,
};
