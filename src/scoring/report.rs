//! Score report types.

use serde::Serialize;

/// The ten scoring checks, in score-slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckKind {
    ContractNumber,
    CompanyNumber,
    CompanyName,
    RegisteredAddress,
    ContactDetails,
    SuspiciousPhrases,
    TextStyle,
    WebsiteDomain,
    ResponsiblePerson,
    ContractDate,
}

impl CheckKind {
    pub const ALL: [CheckKind; 10] = [
        CheckKind::ContractNumber,
        CheckKind::CompanyNumber,
        CheckKind::CompanyName,
        CheckKind::RegisteredAddress,
        CheckKind::ContactDetails,
        CheckKind::SuspiciousPhrases,
        CheckKind::TextStyle,
        CheckKind::WebsiteDomain,
        CheckKind::ResponsiblePerson,
        CheckKind::ContractDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::ContractNumber => "Contract Number",
            CheckKind::CompanyNumber => "Company Number",
            CheckKind::CompanyName => "Company Name",
            CheckKind::RegisteredAddress => "Registered Address",
            CheckKind::ContactDetails => "Contact Details",
            CheckKind::SuspiciousPhrases => "Suspicious Phrases",
            CheckKind::TextStyle => "Text Style",
            CheckKind::WebsiteDomain => "Website Domain",
            CheckKind::ResponsiblePerson => "Responsible Person",
            CheckKind::ContractDate => "Contract Date",
        }
    }
}

/// Tri-state safety verdict derived from the total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SafetyStatus {
    Safe,
    Warning,
    Unsafe,
}

impl SafetyStatus {
    /// Total >= 80 is Safe, [50, 80) is Warning, below 50 is Unsafe.
    pub fn from_total(total: i32) -> Self {
        if total >= 80 {
            SafetyStatus::Safe
        } else if total >= 50 {
            SafetyStatus::Warning
        } else {
            SafetyStatus::Unsafe
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SafetyStatus::Safe => "Safe",
            SafetyStatus::Warning => "Warning",
            SafetyStatus::Unsafe => "Unsafe",
        }
    }
}

impl std::fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal, immutable result of one scoring run.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreReport {
    pub total: i32,
    pub status: SafetyStatus,
    /// Per-check scores in slot order; the company-number slot already
    /// includes the data-match bonus.
    pub scores: Vec<(CheckKind, i32)>,
}

impl ScoreReport {
    pub fn new(slots: [i32; 10]) -> Self {
        let total = slots.iter().sum();
        Self {
            total,
            status: SafetyStatus::from_total(total),
            scores: CheckKind::ALL.iter().copied().zip(slots).collect(),
        }
    }

    pub fn score(&self, kind: CheckKind) -> i32 {
        self.scores
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, score)| *score)
            .unwrap_or(0)
    }
}
