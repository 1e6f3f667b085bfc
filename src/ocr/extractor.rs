//! Extraction orchestrator.
//!
//! Tries every preprocessing strategy in order, recognizes all bitmap
//! variants of each (concurrently, on the blocking pool), and picks the
//! candidate maximizing quality x confidence. Selection happens only
//! after all attempts complete, so the outcome is deterministic for a
//! deterministic backend. Per-strategy failures are logged and skipped;
//! the call as a whole always terminates in a success or error result
//! within the configured wall-clock budget.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::OcrSettings;

use super::backend::{OcrBackend, RecognizedText};
use super::entities::{extract_entities, ExtractedEntities};
use super::normalize::normalize_text;
use super::preprocess::{load_validated, PreprocessStrategy};
use super::quality::{calculate_quality, QualityScores};
use super::variants::bitmap_variants;

/// Diagnostic for an extraction that produced no usable text.
pub const NO_TEXT_DIAGNOSTIC: &str = "No reliable text found with any method";
/// Diagnostic for an extraction that exceeded its time budget.
pub const TIMEOUT_DIAGNOSTIC: &str = "OCR processing timeout";

/// One (strategy, variant) recognition attempt that cleared the bar.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionCandidate {
    pub strategy: &'static str,
    pub variant: &'static str,
    /// Normalized text.
    pub text: String,
    pub raw_text: String,
    pub confidence: f32,
    pub quality: QualityScores,
    pub word_count: usize,
    pub character_count: usize,
    pub entities: ExtractedEntities,
}

impl ExtractionCandidate {
    fn ranking_key(&self) -> f32 {
        self.quality.overall * self.confidence
    }
}

/// Terminal output of one extraction call.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    pub best: Option<ExtractionCandidate>,
    /// Number of recognition attempts that produced a candidate or were
    /// evaluated in the fallback step.
    pub attempts: usize,
    pub timestamp: DateTime<Utc>,
    /// Fixed diagnostic message, set only when `best` is `None`.
    pub diagnostic: Option<String>,
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        self.best.is_some()
    }

    fn failed(diagnostic: &str, attempts: usize) -> Self {
        Self {
            best: None,
            attempts,
            timestamp: Utc::now(),
            diagnostic: Some(diagnostic.to_string()),
        }
    }
}

/// Multi-strategy text extractor.
pub struct TextExtractor {
    backend: Arc<dyn OcrBackend>,
    min_confidence: f32,
    fallback_confidence: f32,
    timeout: std::time::Duration,
    batch_concurrency: usize,
}

impl TextExtractor {
    pub fn new(backend: Arc<dyn OcrBackend>, settings: &OcrSettings) -> Self {
        Self {
            backend,
            min_confidence: settings.min_confidence,
            fallback_confidence: settings.fallback_confidence,
            timeout: settings.timeout(),
            batch_concurrency: settings.batch_concurrency.max(1),
        }
    }

    /// Extract the most reliable text from a scanned document image.
    pub async fn extract(&self, path: &Path) -> ExtractionResult {
        match tokio::time::timeout(self.timeout, self.extract_inner(path)).await {
            Ok(result) => result,
            Err(_) => {
                warn!("extraction timed out for {}", path.display());
                ExtractionResult::failed(TIMEOUT_DIAGNOSTIC, 0)
            }
        }
    }

    /// Extract from several documents with bounded concurrency.
    pub async fn extract_batch(&self, paths: &[PathBuf]) -> Vec<(PathBuf, ExtractionResult)> {
        let gate = Arc::new(Semaphore::new(self.batch_concurrency));
        let futures = paths.iter().map(|path| {
            let gate = gate.clone();
            async move {
                let _permit = gate.acquire().await;
                (path.clone(), self.extract(path).await)
            }
        });
        futures::future::join_all(futures).await
    }

    async fn extract_inner(&self, path: &Path) -> ExtractionResult {
        let mut candidates: Vec<ExtractionCandidate> = Vec::new();
        let mut attempts = 0usize;

        for strategy in PreprocessStrategy::ordered() {
            let strategy_path = path.to_owned();
            let preprocessed =
                tokio::task::spawn_blocking(move || strategy.apply(&strategy_path)).await;

            let base = match preprocessed {
                Ok(Ok(image)) => image,
                Ok(Err(e)) => {
                    debug!("strategy {} skipped: {}", strategy.name(), e);
                    continue;
                }
                Err(e) => {
                    warn!("strategy {} panicked: {}", strategy.name(), e);
                    continue;
                }
            };

            // All variants of one strategy recognize concurrently.
            let mut handles = Vec::new();
            for (variant, image) in bitmap_variants(&base) {
                let backend = self.backend.clone();
                handles.push(tokio::task::spawn_blocking(move || {
                    (variant, backend.recognize(&image))
                }));
            }

            for handle in handles {
                attempts += 1;
                let (variant, recognized) = match handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        warn!("recognition task failed: {e}");
                        continue;
                    }
                };
                let recognized = match recognized {
                    Ok(r) => r,
                    Err(e) => {
                        debug!("variant {variant} failed: {e}");
                        continue;
                    }
                };
                if recognized.text.trim().is_empty() || recognized.confidence < self.min_confidence
                {
                    continue;
                }
                let candidate = build_candidate(strategy.name(), variant, recognized);
                info!(
                    "candidate ({}, {}): confidence {:.3}, {} words",
                    candidate.strategy, candidate.variant, candidate.confidence, candidate.word_count
                );
                candidates.push(candidate);
            }
        }

        // Last resort: recognize the unprocessed original at a lower bar.
        if candidates.is_empty() {
            attempts += 1;
            let fallback_path = path.to_owned();
            let backend = self.backend.clone();
            let recognized = tokio::task::spawn_blocking(move || {
                load_validated(&fallback_path).and_then(|image| backend.recognize(&image))
            })
            .await;

            match recognized {
                Ok(Ok(r))
                    if !r.text.trim().is_empty() && r.confidence > self.fallback_confidence =>
                {
                    candidates.push(build_candidate("fallback", "original", r));
                }
                Ok(Ok(_)) => {}
                Ok(Err(e)) => debug!("fallback recognition failed: {e}"),
                Err(e) => warn!("fallback task failed: {e}"),
            }
        }

        match select_best(candidates) {
            Some(best) => {
                info!(
                    "best result: strategy={}, variant={}, confidence={:.3}, quality={:.3}",
                    best.strategy, best.variant, best.confidence, best.quality.overall
                );
                ExtractionResult {
                    best: Some(best),
                    attempts,
                    timestamp: Utc::now(),
                    diagnostic: None,
                }
            }
            None => ExtractionResult::failed(NO_TEXT_DIAGNOSTIC, attempts),
        }
    }
}

fn build_candidate(
    strategy: &'static str,
    variant: &'static str,
    recognized: RecognizedText,
) -> ExtractionCandidate {
    let text = normalize_text(&recognized.text);
    let quality = calculate_quality(&text, recognized.confidence);
    let entities = extract_entities(&text);
    ExtractionCandidate {
        strategy,
        variant,
        word_count: text.split_whitespace().count(),
        character_count: text.chars().count(),
        raw_text: recognized.text,
        confidence: recognized.confidence,
        quality,
        entities,
        text,
    }
}

/// Pick the candidate maximizing quality x confidence; ties keep the
/// earliest candidate in strategy/variant iteration order.
fn select_best(candidates: Vec<ExtractionCandidate>) -> Option<ExtractionCandidate> {
    let mut best: Option<ExtractionCandidate> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.ranking_key() <= current.ranking_key() => {}
            _ => best = Some(candidate),
        }
    }
    best
}
