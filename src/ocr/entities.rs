//! Structured entity extraction from recognized text.
//!
//! Pulls out phone numbers, email addresses and website domains. Their
//! mere presence feeds the quality metric; the values themselves surface
//! in the extraction result for downstream field matching.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

/// Phones, emails and domains found in one text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedEntities {
    pub phone_numbers: Vec<String>,
    pub emails: Vec<String>,
    pub domains: Vec<String>,
}

impl ExtractedEntities {
    pub fn is_empty(&self) -> bool {
        self.phone_numbers.is_empty() && self.emails.is_empty() && self.domains.is_empty()
    }
}

struct Patterns {
    phone: Regex,
    email: Regex,
    domain: Regex,
    non_digit: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        phone: Regex::new(r"(\+?\d{1,3}[-. ]?)?(\(?\d{3}\)?[-. ]?)(\d{3}[-. ]?)(\d{4})")
            .expect("static pattern"),
        email: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .expect("static pattern"),
        domain: Regex::new(
            r"(?i)(?:https?://|www\.)?([a-zA-Z0-9-]+\.(?:com|org|net|info|biz|co|tj|ru|uz|kz|[a-zA-Z]{2,}))",
        )
        .expect("static pattern"),
        non_digit: Regex::new(r"[^\d]").expect("static pattern"),
    })
}

/// Extract phones, emails and domains from text.
pub fn extract_entities(text: &str) -> ExtractedEntities {
    let patterns = patterns();
    let mut entities = ExtractedEntities::default();

    for capture in patterns.phone.find_iter(text) {
        let raw = capture.as_str().trim();
        let digits = patterns.non_digit.replace_all(raw, "");
        if digits.len() >= 7 {
            entities.phone_numbers.push(raw.to_string());
        }
    }

    let mut seen = HashSet::new();
    for capture in patterns.email.find_iter(text) {
        if seen.insert(capture.as_str().to_lowercase()) {
            entities.emails.push(capture.as_str().to_string());
        }
    }

    let mut seen = HashSet::new();
    for capture in patterns.domain.captures_iter(text) {
        let domain = capture[1].to_lowercase();
        if domain.contains('.') && seen.insert(domain.clone()) {
            entities.domains.push(domain);
        }
    }

    entities
}
