//! Configuration management for contracheck.
//!
//! Settings are read from an optional TOML file and overridden by
//! environment variables (a `.env` file is loaded at startup). Every
//! section has sensible defaults so the tool runs with no config at all.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable holding the registry API key.
pub const REGISTRY_API_KEY_ENV: &str = "COMPANIES_HOUSE_API";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ocr: OcrSettings,
    #[serde(default)]
    pub registry: RegistrySettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file is absent. Environment overrides are applied afterwards.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let raw = fs::read_to_string(p)?;
                toml::from_str(&raw)?
            }
            Some(p) => {
                anyhow::bail!("config file not found: {}", p.display());
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var(REGISTRY_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.registry.api_key = Some(key);
            }
        }
    }
}

/// OCR extraction pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract language packs, joined with `+` when invoking the engine.
    pub languages: Vec<String>,
    /// Minimum token confidence for a preprocessed recognition attempt.
    pub min_confidence: f32,
    /// Lower confidence bar used only by the no-preprocessing fallback.
    pub fallback_confidence: f32,
    /// Wall-clock budget for a whole extraction call, in seconds.
    pub timeout_secs: u64,
    /// Bound on concurrently processed documents in batch mode.
    pub batch_concurrency: usize,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            languages: vec!["eng".to_string(), "rus".to_string()],
            min_confidence: 0.5,
            fallback_confidence: 0.1,
            timeout_secs: 180,
            batch_concurrency: 3,
        }
    }
}

impl OcrSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn language_spec(&self) -> String {
        self.languages.join("+")
    }
}

/// Company registry client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub base_url: String,
    /// API key sent as the basic-auth username. Taken from the
    /// `COMPANIES_HOUSE_API` environment variable when unset here.
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    /// Timeout for domain-existence probes.
    pub probe_timeout_secs: u64,
    /// Global cap on in-flight registry requests.
    pub max_concurrent_requests: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.company-information.service.gov.uk".to_string(),
            api_key: None,
            timeout_secs: 15,
            probe_timeout_secs: 6,
            max_concurrent_requests: 2,
        }
    }
}

impl RegistrySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// Company cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Freshness window for cached company records, in days.
    pub ttl_days: i64,
    /// SQLite database path. The in-memory store is used when unset.
    pub path: Option<PathBuf>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl_days: 7,
            path: None,
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.ttl_days)
    }
}
