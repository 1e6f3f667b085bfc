//! The ten-check scoring engine.
//!
//! One `score` call runs all ten checks concurrently over a shared
//! resolved-company slot, then applies the data-match bonus once every
//! check has finished. A check that hits a transient registry or store
//! failure settles on its own degraded score; nothing here aborts the
//! run.

use std::sync::{Arc, OnceLock};

use chrono::{Local, NaiveDate, Utc};
use regex::Regex;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::registry::{CompanyProfile, RegistryApi, RegistryOutcome};
use crate::store::{CompanyRecord, CompanyStatus, CompanyStore};

use super::fields::ContractFields;
use super::probes::{domain_matches_company, ReachabilityProbe};
use super::report::ScoreReport;

const SUSPICIOUS_PHRASES: [&str; 8] = [
    "urgent payment",
    "no interview required",
    "send money",
    "confidential fee",
    "suspicious link",
    "payment before work",
    "wire transfer",
    "advance fee",
];

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d %B %Y", "%d %b %Y", "%B %d, %Y"];

struct ContactPatterns {
    email: Regex,
    phone: Regex,
    scheme_prefix: Regex,
}

fn patterns() -> &'static ContactPatterns {
    static PATTERNS: OnceLock<ContactPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| ContactPatterns {
        email: Regex::new(r"[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+")
            .expect("static pattern"),
        phone: Regex::new(r"\+44\d{10}|\+44\s?\d{3}\s?\d{3}\s?\d{4}|0\d{10}")
            .expect("static pattern"),
        scheme_prefix: Regex::new(r"(?i)^(https?://|www\.)").expect("static pattern"),
    })
}

/// Scores extracted contract fields against the registry, the company
/// cache and live reachability probes.
pub struct ContractScorer {
    registry: Arc<dyn RegistryApi>,
    store: Arc<dyn CompanyStore>,
    probe: Arc<dyn ReachabilityProbe>,
    cache_ttl: chrono::Duration,
}

impl ContractScorer {
    pub fn new(
        registry: Arc<dyn RegistryApi>,
        store: Arc<dyn CompanyStore>,
        probe: Arc<dyn ReachabilityProbe>,
        cache_ttl: chrono::Duration,
    ) -> Self {
        Self {
            registry,
            store,
            probe,
            cache_ttl,
        }
    }

    /// Run all ten checks and aggregate into a report.
    pub async fn score(&self, fields: &ContractFields) -> ScoreReport {
        let run = ScoringRun {
            registry: self.registry.as_ref(),
            store: self.store.as_ref(),
            probe: self.probe.as_ref(),
            cache_ttl: self.cache_ttl,
            fields,
            resolved: RwLock::new(None),
        };

        let (s0, s1, s2, s3, s4, s5, s6, s7, s8, s9) = tokio::join!(
            run.contract_number(),
            run.company_number(),
            run.company_name(),
            run.registered_address(),
            run.contact_details(),
            run.suspicious_phrases(),
            run.text_style(),
            run.website_domain(),
            run.responsible_person(),
            run.contract_date(),
        );

        // The bonus reads the resolved slot only after every check has
        // finished, so it sees whichever record the number or name check
        // settled on.
        let bonus = run.data_match_bonus().await;

        ScoreReport::new([s0, s1 + bonus, s2, s3, s4, s5, s6, s7, s8, s9])
    }
}

/// Per-call state shared by the ten checks.
struct ScoringRun<'a> {
    registry: &'a dyn RegistryApi,
    store: &'a dyn CompanyStore,
    probe: &'a dyn ReachabilityProbe,
    cache_ttl: chrono::Duration,
    fields: &'a ContractFields,
    resolved: RwLock<Option<CompanyRecord>>,
}

impl ScoringRun<'_> {
    async fn set_resolved(&self, record: CompanyRecord) {
        *self.resolved.write().await = Some(record);
    }

    async fn set_resolved_if_empty(&self, record: CompanyRecord) {
        let mut slot = self.resolved.write().await;
        if slot.is_none() {
            *slot = Some(record);
        }
    }

    async fn contract_number(&self) -> i32 {
        if self.fields.contract_number().is_some() {
            10
        } else {
            0
        }
    }

    async fn company_number(&self) -> i32 {
        let Some(number) = self.fields.company_number() else {
            return 0;
        };

        let cached = match self.store.get_company_by_number(number).await {
            Ok(record) => record,
            Err(e) => {
                warn!("cache lookup failed for {number}: {e}");
                None
            }
        };

        if let Some(record) = &cached {
            if record.is_active() && record.is_fresh(self.cache_ttl, Utc::now()) {
                self.set_resolved(record.clone()).await;
                return 30;
            }
        }

        match self.registry.company_profile(number).await {
            RegistryOutcome::Found(profile) => {
                let score = if profile.is_active() { 30 } else { 0 };
                let record = self.record_from_profile(number, &profile, score);
                self.set_resolved(record.clone()).await;
                if let Err(e) = self.store.upsert_company(record).await {
                    warn!("cache upsert failed for {number}: {e}");
                }
                score
            }
            RegistryOutcome::NotFound => {
                if cached.is_some() {
                    if let Err(e) = self.store.delete_company_by_number(number).await {
                        warn!("stale cache eviction failed for {number}: {e}");
                    }
                }
                0
            }
            outcome => {
                debug!("registry degraded for {number}: {outcome:?}");
                // A previously cached active record is still worth
                // partial credit when the registry is unreachable.
                match cached {
                    Some(record) => {
                        let score = if record.is_active() { 20 } else { 0 };
                        self.set_resolved(record).await;
                        score
                    }
                    None => 0,
                }
            }
        }
    }

    async fn company_name(&self) -> i32 {
        let Some(name) = self.fields.company_name() else {
            return 0;
        };

        let local = match self.store.get_companies_by_name(name).await {
            Ok(records) => records,
            Err(e) => {
                warn!("cache name lookup failed: {e}");
                Vec::new()
            }
        };
        if let Some(active) = local.into_iter().find(CompanyRecord::is_active) {
            self.set_resolved_if_empty(active).await;
            return 30;
        }

        let results = match self.registry.search_companies(name).await {
            RegistryOutcome::Found(results) => results,
            outcome => {
                debug!("company search degraded: {outcome:?}");
                return 0;
            }
        };
        if !results.items.iter().any(|item| item.is_active()) {
            return 0;
        }

        let exact = results
            .items
            .iter()
            .find(|item| item.is_active() && item.title.to_lowercase() == name.to_lowercase());
        if let Some(hit) = exact {
            if let Some(profile) = self
                .registry
                .company_profile(&hit.company_number)
                .await
                .found()
            {
                let record = self.record_from_profile(&hit.company_number, &profile, 30);
                self.set_resolved(record.clone()).await;
                if let Err(e) = self.store.upsert_company(record).await {
                    warn!("cache upsert failed for {}: {e}", hit.company_number);
                }
            }
        }
        30
    }

    async fn registered_address(&self) -> i32 {
        let Some(addr) = self.fields.registered_address() else {
            return 0;
        };
        let addr = addr.to_lowercase();

        if let Some(record) = self.resolved.read().await.as_ref() {
            let record_addr = record
                .registered_address
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            return if !record_addr.is_empty() && substring_match(&addr, &record_addr) {
                10
            } else {
                -10
            };
        }

        let Some(number) = self.fields.company_number() else {
            return 0;
        };
        match self.registry.company_profile(number).await {
            RegistryOutcome::Found(profile) => {
                let record_addr = profile.formatted_address().to_lowercase();
                if !record_addr.is_empty() && substring_match(&addr, &record_addr) {
                    10
                } else {
                    -10
                }
            }
            outcome => {
                debug!("address lookup degraded for {number}: {outcome:?}");
                0
            }
        }
    }

    async fn contact_details(&self) -> i32 {
        let Some(contact) = self.fields.contact_details() else {
            return -10;
        };

        let rules = patterns();
        let emails: Vec<&str> = rules.email.find_iter(contact).map(|m| m.as_str()).collect();
        let phones: Vec<&str> = rules.phone.find_iter(contact).map(|m| m.as_str()).collect();
        if emails.is_empty() && phones.is_empty() {
            return -10;
        }

        let phone_score = if phones.iter().any(|p| is_valid_uk_phone(p)) {
            5
        } else {
            0
        };

        let company_lower = self.fields.company_name().unwrap_or_default().to_lowercase();
        let person_lower = self
            .fields
            .responsible_person()
            .unwrap_or_default()
            .to_lowercase();

        let mut email_score = 0;
        for email in emails {
            let Some((local_part, domain)) = email.split_once('@') else {
                continue;
            };
            let domain = domain.to_lowercase();
            let deliverable = self.probe.has_mx_records(&domain).await
                && self.probe.domain_resolves(&domain).await;
            if !deliverable {
                email_score = -5;
                continue;
            }

            email_score = 5;
            if domain_matches_company(&domain, &company_lower) {
                email_score += 5;
            }
            let local_part = local_part.to_lowercase();
            if !person_lower.is_empty()
                && (person_lower.contains(&local_part)
                    || person_lower
                        .split_whitespace()
                        .any(|word| local_part.contains(word)))
            {
                email_score += 5;
            }
            break;
        }

        (phone_score + email_score).clamp(-10, 10)
    }

    async fn suspicious_phrases(&self) -> i32 {
        let haystack = self.fields.concatenated().to_lowercase();
        let mut score = if SUSPICIOUS_PHRASES.iter().any(|p| haystack.contains(p)) {
            -20
        } else {
            0
        };

        match self
            .store
            .find_suspicious(self.fields.company_number(), self.fields.company_name())
            .await
        {
            Ok(Some(entry)) => {
                debug!("suspicious-company hit: {}", entry.company_name);
                score -= 20;
            }
            Ok(None) => {}
            Err(e) => warn!("suspicious-company lookup failed: {e}"),
        }
        score
    }

    async fn text_style(&self) -> i32 {
        match self.fields.text_style() {
            Some("professional") => 10,
            Some("template-like") => 0,
            _ => -10,
        }
    }

    async fn website_domain(&self) -> i32 {
        let Some(raw) = self.fields.website_domain() else {
            return -10;
        };
        let domain = patterns().scheme_prefix.replace(raw, "");
        let domain = domain.trim_matches('/');
        if domain.is_empty() {
            return -10;
        }

        let company_lower = self.fields.company_name().unwrap_or_default().to_lowercase();
        let exists = self.probe.domain_resolves(domain).await;
        if exists && domain_matches_company(domain, &company_lower) {
            10
        } else {
            -10
        }
    }

    async fn responsible_person(&self) -> i32 {
        let Some(name) = self.fields.responsible_person() else {
            return 0;
        };
        // Without a company number there is nothing to disprove the name
        // against, so it gets the benefit of the doubt.
        let Some(number) = self.fields.company_number() else {
            return 10;
        };

        match self.registry.company_officers(number).await {
            RegistryOutcome::Found(officers) => {
                let name_lower = name.to_lowercase();
                let serving_match = officers
                    .items
                    .iter()
                    .any(|o| o.is_serving() && o.name.to_lowercase().contains(&name_lower));
                if serving_match {
                    10
                } else {
                    0
                }
            }
            outcome => {
                debug!("officer lookup degraded for {number}: {outcome:?}");
                10
            }
        }
    }

    async fn contract_date(&self) -> i32 {
        let Some(raw) = self.fields.contract_date() else {
            return 0;
        };
        let parsed = DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok());
        match parsed {
            Some(date) => {
                let age_days = (Local::now().date_naive() - date).num_days();
                if (0..=30).contains(&age_days) {
                    10
                } else {
                    -10
                }
            }
            None => 0,
        }
    }

    async fn data_match_bonus(&self) -> i32 {
        let slot = self.resolved.read().await;
        let Some(record) = slot.as_ref() else {
            return 0;
        };

        let mut bonus = 0;
        if let Some(name) = self.fields.company_name() {
            if name.to_lowercase() == record.name.to_lowercase() {
                bonus += 10;
            }
        }
        if let Some(addr) = self.fields.registered_address() {
            let addr = addr.to_lowercase();
            let record_addr = record
                .registered_address
                .as_deref()
                .unwrap_or_default()
                .to_lowercase();
            if substring_match(&addr, &record_addr) {
                bonus += 10;
            }
        }
        bonus
    }

    fn record_from_profile(
        &self,
        number: &str,
        profile: &CompanyProfile,
        score: i32,
    ) -> CompanyRecord {
        let address = profile.formatted_address();
        CompanyRecord {
            name: profile.company_name.clone(),
            company_number: number.to_string(),
            registered_address: (!address.is_empty()).then_some(address),
            status: CompanyStatus::parse(&profile.company_status),
            score,
            website_domain: self.fields.website_domain().map(str::to_string),
            last_updated: Utc::now(),
        }
    }
}

fn substring_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

fn is_valid_uk_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    (digits.starts_with("44") && digits.len() == 12)
        || (digits.starts_with('0') && digits.len() == 11)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, Utc};

    use crate::registry::{
        CompanyProfile, CompanySearchItem, CompanySearchResults, Officer, OfficerList,
        RegisteredAddress,
    };
    use crate::store::{MemoryStore, SuspiciousCompany};
    use crate::scoring::report::{CheckKind, SafetyStatus};

    use super::*;

    #[derive(Default)]
    struct StubRegistry {
        profile: Option<RegistryOutcome<CompanyProfile>>,
        search: Option<RegistryOutcome<CompanySearchResults>>,
        officers: Option<RegistryOutcome<OfficerList>>,
        calls: AtomicUsize,
    }

    impl StubRegistry {
        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RegistryApi for StubRegistry {
        async fn company_profile(&self, _number: &str) -> RegistryOutcome<CompanyProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.profile.clone().unwrap_or(RegistryOutcome::NotFound)
        }

        async fn search_companies(&self, _query: &str) -> RegistryOutcome<CompanySearchResults> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.search.clone().unwrap_or(RegistryOutcome::NotFound)
        }

        async fn company_officers(&self, _number: &str) -> RegistryOutcome<OfficerList> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.officers.clone().unwrap_or(RegistryOutcome::NotFound)
        }
    }

    /// Probe where nothing resolves.
    struct DeadProbe;

    #[async_trait]
    impl ReachabilityProbe for DeadProbe {
        async fn domain_resolves(&self, _domain: &str) -> bool {
            false
        }

        async fn has_mx_records(&self, _domain: &str) -> bool {
            false
        }
    }

    /// Probe where everything resolves.
    struct LiveProbe;

    #[async_trait]
    impl ReachabilityProbe for LiveProbe {
        async fn domain_resolves(&self, _domain: &str) -> bool {
            true
        }

        async fn has_mx_records(&self, _domain: &str) -> bool {
            true
        }
    }

    fn scorer(
        registry: Arc<StubRegistry>,
        store: Arc<MemoryStore>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> ContractScorer {
        ContractScorer::new(registry, store, probe, Duration::days(7))
    }

    fn active_record(number: &str, name: &str, age: Duration) -> CompanyRecord {
        CompanyRecord {
            name: name.to_string(),
            company_number: number.to_string(),
            registered_address: Some("1 Main Street, London, SW1A 1AA".to_string()),
            status: CompanyStatus::Active,
            score: 30,
            website_domain: None,
            last_updated: Utc::now() - age,
        }
    }

    fn active_profile(number: &str, name: &str) -> CompanyProfile {
        CompanyProfile {
            company_name: name.to_string(),
            company_number: number.to_string(),
            company_status: "active".to_string(),
            registered_office_address: Some(RegisteredAddress {
                address_line_1: Some("1 Main Street".to_string()),
                address_line_2: None,
                locality: Some("London".to_string()),
                postal_code: Some("SW1A 1AA".to_string()),
            }),
        }
    }

    #[tokio::test]
    async fn empty_fields_score_the_unsafe_baseline() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry.clone(), Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let report = scorer.score(&ContractFields::default()).await;

        assert_eq!(report.total, -30);
        assert_eq!(report.status, SafetyStatus::Unsafe);
        assert_eq!(report.score(CheckKind::ContactDetails), -10);
        assert_eq!(report.score(CheckKind::TextStyle), -10);
        assert_eq!(report.score(CheckKind::WebsiteDomain), -10);
        assert_eq!(report.score(CheckKind::CompanyNumber), 0);
        assert_eq!(registry.call_count(), 0);
    }

    #[tokio::test]
    async fn fresh_cached_company_skips_the_registry() {
        let registry = Arc::new(StubRegistry::default());
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_company(active_record("01234567", "ACME LTD", Duration::zero()))
            .await
            .unwrap();
        let scorer = scorer(registry.clone(), store, Arc::new(DeadProbe));

        let fields = ContractFields {
            company_number: Some("01234567".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::CompanyNumber), 30);
        assert_eq!(registry.call_count(), 0);
    }

    #[tokio::test]
    async fn stale_cached_company_is_refetched() {
        let registry = Arc::new(StubRegistry {
            profile: Some(RegistryOutcome::Found(active_profile("01234567", "ACME LTD"))),
            ..Default::default()
        });
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_company(active_record(
                "01234567",
                "ACME LTD",
                Duration::days(7) + Duration::seconds(1),
            ))
            .await
            .unwrap();
        let scorer = scorer(registry.clone(), store.clone(), Arc::new(DeadProbe));

        let fields = ContractFields {
            company_number: Some("01234567".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::CompanyNumber), 30);
        assert_eq!(registry.call_count(), 1);
        let refreshed = store.get_company_by_number("01234567").await.unwrap().unwrap();
        assert!(refreshed.is_fresh(Duration::days(7), Utc::now()));
    }

    #[tokio::test]
    async fn transient_registry_failure_degrades_to_twenty() {
        let registry = Arc::new(StubRegistry {
            profile: Some(RegistryOutcome::Transient("timeout".to_string())),
            ..Default::default()
        });
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_company(active_record("01234567", "ACME LTD", Duration::days(8)))
            .await
            .unwrap();
        let scorer = scorer(registry, store, Arc::new(DeadProbe));

        let fields = ContractFields {
            company_number: Some("01234567".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::CompanyNumber), 20);
    }

    #[tokio::test]
    async fn registry_not_found_evicts_the_stale_record() {
        let registry = Arc::new(StubRegistry::default());
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_company(active_record("01234567", "ACME LTD", Duration::days(8)))
            .await
            .unwrap();
        let scorer = scorer(registry, store.clone(), Arc::new(DeadProbe));

        let fields = ContractFields {
            company_number: Some("01234567".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::CompanyNumber), 0);
        assert!(store.get_company_by_number("01234567").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn local_name_match_scores_and_earns_the_name_bonus() {
        let registry = Arc::new(StubRegistry::default());
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_company(active_record("01234567", "ACME LTD", Duration::days(30)))
            .await
            .unwrap();
        let scorer = scorer(registry.clone(), store, Arc::new(DeadProbe));

        // No company number, so the bonus lands on an otherwise-zero slot.
        let fields = ContractFields {
            company_name: Some("acme ltd".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::CompanyName), 30);
        assert_eq!(report.score(CheckKind::CompanyNumber), 10);
        assert_eq!(registry.call_count(), 0);
    }

    #[tokio::test]
    async fn search_hit_resolves_and_caches_the_profile() {
        let registry = Arc::new(StubRegistry {
            search: Some(RegistryOutcome::Found(CompanySearchResults {
                items: vec![CompanySearchItem {
                    title: "ACME LTD".to_string(),
                    company_number: "01234567".to_string(),
                    company_status: "active".to_string(),
                }],
            })),
            profile: Some(RegistryOutcome::Found(active_profile("01234567", "ACME LTD"))),
            ..Default::default()
        });
        let store = Arc::new(MemoryStore::new());
        let scorer = scorer(registry, store.clone(), Arc::new(DeadProbe));

        let fields = ContractFields {
            company_name: Some("Acme Ltd".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::CompanyName), 30);
        // Exact-title match resolved the record and earned the name bonus.
        assert_eq!(report.score(CheckKind::CompanyNumber), 10);
        assert!(store.get_company_by_number("01234567").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn address_compares_against_the_resolved_record() {
        let registry = Arc::new(StubRegistry::default());
        let store = Arc::new(MemoryStore::new());
        store
            .upsert_company(active_record("01234567", "ACME LTD", Duration::zero()))
            .await
            .unwrap();
        let scorer = scorer(registry, store, Arc::new(DeadProbe));

        let matching = ContractFields {
            company_number: Some("01234567".to_string()),
            registered_address: Some("1 Main Street, London".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&matching).await;
        assert_eq!(report.score(CheckKind::RegisteredAddress), 10);
        // Substring address match also feeds the data-match bonus.
        assert_eq!(report.score(CheckKind::CompanyNumber), 40);

        let mismatched = ContractFields {
            company_number: Some("01234567".to_string()),
            registered_address: Some("99 Nowhere Lane, Leeds".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&mismatched).await;
        assert_eq!(report.score(CheckKind::RegisteredAddress), -10);
        assert_eq!(report.score(CheckKind::CompanyNumber), 30);
    }

    #[tokio::test]
    async fn uk_phone_alone_scores_five() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let fields = ContractFields {
            contact_details: Some("Call us on 01234567890".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::ContactDetails), 5);
    }

    #[tokio::test]
    async fn deliverable_matching_email_scores_ten() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(LiveProbe));

        let fields = ContractFields {
            company_name: Some("ACME Widgets Ltd".to_string()),
            contact_details: Some("jobs@acme.com".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        // 5 for a deliverable mailbox, 5 more for the domain matching
        // the company name.
        assert_eq!(report.score(CheckKind::ContactDetails), 10);
    }

    #[tokio::test]
    async fn undeliverable_email_scores_minus_five() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let fields = ContractFields {
            contact_details: Some("jobs@acme.com".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::ContactDetails), -5);
    }

    #[tokio::test]
    async fn suspicious_phrase_and_store_hit_stack() {
        let registry = Arc::new(StubRegistry::default());
        let store = Arc::new(MemoryStore::new());
        store
            .add_suspicious(SuspiciousCompany {
                company_name: "Shady Recruiting Ltd".to_string(),
                company_number: None,
                evidence: None,
                active: true,
            })
            .await
            .unwrap();
        let scorer = scorer(registry, store, Arc::new(DeadProbe));

        let fields = ContractFields {
            company_name: Some("Shady Recruiting".to_string()),
            contact_details: Some("urgent payment required before work starts".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::SuspiciousPhrases), -40);
    }

    #[tokio::test]
    async fn professional_style_and_recent_date_lift_the_baseline_to_zero() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let fields = ContractFields {
            text_style: Some("professional".to_string()),
            contract_date: Some(Local::now().date_naive().format("%Y-%m-%d").to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::TextStyle), 10);
        assert_eq!(report.score(CheckKind::ContractDate), 10);
        assert_eq!(report.total, 0);
    }

    #[tokio::test]
    async fn old_or_garbled_dates() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let old = ContractFields {
            contract_date: Some("2020-01-15".to_string()),
            ..Default::default()
        };
        assert_eq!(scorer.score(&old).await.score(CheckKind::ContractDate), -10);

        let garbled = ContractFields {
            contract_date: Some("sometime soon".to_string()),
            ..Default::default()
        };
        assert_eq!(scorer.score(&garbled).await.score(CheckKind::ContractDate), 0);
    }

    #[tokio::test]
    async fn responsible_person_without_number_gets_benefit_of_the_doubt() {
        let registry = Arc::new(StubRegistry::default());
        let scorer = scorer(registry.clone(), Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let fields = ContractFields {
            responsible_person: Some("Jane Smith".to_string()),
            ..Default::default()
        };
        let report = scorer.score(&fields).await;

        assert_eq!(report.score(CheckKind::ResponsiblePerson), 10);
        assert_eq!(registry.call_count(), 0);
    }

    #[tokio::test]
    async fn responsible_person_is_checked_against_serving_officers() {
        let officers = OfficerList {
            items: vec![
                Officer {
                    name: "SMITH, Jane".to_string(),
                    resigned_on: Some("2020-01-01".to_string()),
                },
                Officer {
                    name: "DOE, John".to_string(),
                    resigned_on: None,
                },
            ],
        };
        let registry = Arc::new(StubRegistry {
            officers: Some(RegistryOutcome::Found(officers)),
            ..Default::default()
        });
        let scorer = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(DeadProbe));

        let serving = ContractFields {
            company_number: Some("01234567".to_string()),
            responsible_person: Some("Doe".to_string()),
            ..Default::default()
        };
        assert_eq!(
            scorer.score(&serving).await.score(CheckKind::ResponsiblePerson),
            10
        );

        // A resigned officer does not count.
        let resigned = ContractFields {
            company_number: Some("01234567".to_string()),
            responsible_person: Some("Smith".to_string()),
            ..Default::default()
        };
        assert_eq!(
            scorer.score(&resigned).await.score(CheckKind::ResponsiblePerson),
            0
        );
    }

    #[tokio::test]
    async fn website_needs_both_reachability_and_a_name_match() {
        let registry = Arc::new(StubRegistry::default());
        let live = scorer(
            registry.clone(),
            Arc::new(MemoryStore::new()),
            Arc::new(LiveProbe),
        );

        let fields = ContractFields {
            company_name: Some("ACME Widgets Ltd".to_string()),
            website_domain: Some("https://acme.com/".to_string()),
            ..Default::default()
        };
        assert_eq!(live.score(&fields).await.score(CheckKind::WebsiteDomain), 10);

        let unrelated = ContractFields {
            company_name: Some("ACME Widgets Ltd".to_string()),
            website_domain: Some("https://totally-else.com".to_string()),
            ..Default::default()
        };
        assert_eq!(
            live.score(&unrelated).await.score(CheckKind::WebsiteDomain),
            -10
        );

        let dead = scorer(registry, Arc::new(MemoryStore::new()), Arc::new(DeadProbe));
        assert_eq!(dead.score(&fields).await.score(CheckKind::WebsiteDomain), -10);
    }

    #[test]
    fn uk_phone_validation() {
        assert!(is_valid_uk_phone("+441234567890"));
        assert!(is_valid_uk_phone("01234567890"));
        assert!(!is_valid_uk_phone("+4412345"));
        assert!(!is_valid_uk_phone("012345678901"));
    }
}
