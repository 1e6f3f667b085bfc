//! OCR backend abstraction.
//!
//! The pipeline only needs "bitmap in, text plus confidence out", so the
//! backend is a trait. The default implementation shells out to the
//! Tesseract binary and reads its TSV output for token-level confidences.

use std::process::Command;

use image::GrayImage;
use thiserror::Error;

/// Errors from OCR backends and image preparation.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Raw recognition output for one bitmap.
#[derive(Debug, Clone, PartialEq)]
pub struct RecognizedText {
    /// Recognized text, line structure preserved where the engine reports it.
    pub text: String,
    /// Mean token confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Trait for OCR backends.
pub trait OcrBackend: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Check if this backend is usable (binary installed, models present).
    fn is_available(&self) -> bool;

    /// Human-readable hint on what is needed to make the backend usable.
    fn availability_hint(&self) -> String;

    /// Run recognition on a grayscale bitmap.
    fn recognize(&self, image: &GrayImage) -> Result<RecognizedText, OcrError>;
}

/// Tesseract OCR backend invoked via the command line.
pub struct TesseractBackend {
    languages: String,
    min_confidence: f32,
}

impl TesseractBackend {
    pub fn new(languages: &str, min_confidence: f32) -> Self {
        Self {
            languages: languages.to_string(),
            min_confidence,
        }
    }

    /// Run tesseract against a staged image file with the given config tail.
    fn run_tesseract(&self, image_path: &std::path::Path, tail: &[&str]) -> Result<String, OcrError> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .args(["--oem", "3", "--psm", "3"])
            .args(["-l", &self.languages])
            .args(tail)
            .output();

        match output {
            Ok(output) => {
                if output.status.success() {
                    Ok(String::from_utf8_lossy(&output.stdout).to_string())
                } else {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    Err(OcrError::RecognitionFailed(format!(
                        "tesseract failed: {}",
                        stderr.trim()
                    )))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(OcrError::BackendNotAvailable(
                    "tesseract not found (install tesseract-ocr)".to_string(),
                ))
            }
            Err(e) => Err(OcrError::Io(e)),
        }
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new("eng", 0.5)
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn availability_hint(&self) -> String {
        format!(
            "tesseract binary with '{}' language packs must be on PATH",
            self.languages
        )
    }

    fn recognize(&self, image: &GrayImage) -> Result<RecognizedText, OcrError> {
        let staging = tempfile::tempdir()?;
        let image_path = staging.path().join("page.png");
        image
            .save(&image_path)
            .map_err(|e| OcrError::InvalidImage(e.to_string()))?;

        let tsv = self.run_tesseract(&image_path, &["tsv"])?;
        let words = parse_tsv(&tsv);

        let reliable: Vec<&TsvWord> = words
            .iter()
            .filter(|w| w.confidence >= self.min_confidence)
            .collect();

        if reliable.is_empty() {
            // No token clears the bar; fall back to the plain transcription
            // with the mean confidence over everything the engine saw.
            let text = self.run_tesseract(&image_path, &[])?;
            let confidence = mean_confidence(&words);
            return Ok(RecognizedText {
                text: text.trim_end().to_string(),
                confidence,
            });
        }

        let text = join_lines(&reliable);
        let confidence = reliable.iter().map(|w| w.confidence).sum::<f32>() / reliable.len() as f32;
        Ok(RecognizedText { text, confidence })
    }
}

/// One word row from tesseract TSV output.
#[derive(Debug)]
struct TsvWord {
    /// (block, paragraph, line) grouping key.
    line_key: (u32, u32, u32),
    confidence: f32,
    text: String,
}

/// Parse tesseract TSV output, keeping only word rows with a confidence.
fn parse_tsv(tsv: &str) -> Vec<TsvWord> {
    let mut words = Vec::new();
    for line in tsv.lines().skip(1) {
        let cols: Vec<&str> = line.split('\t').collect();
        if cols.len() < 12 {
            continue;
        }
        let conf: f32 = match cols[10].parse() {
            Ok(c) => c,
            Err(_) => continue,
        };
        if conf < 0.0 {
            continue;
        }
        let text = cols[11].trim();
        if text.is_empty() {
            continue;
        }
        let key = (
            cols[2].parse().unwrap_or(0),
            cols[3].parse().unwrap_or(0),
            cols[4].parse().unwrap_or(0),
        );
        words.push(TsvWord {
            line_key: key,
            confidence: conf / 100.0,
            text: text.to_string(),
        });
    }
    words
}

fn mean_confidence(words: &[TsvWord]) -> f32 {
    if words.is_empty() {
        return 0.0;
    }
    words.iter().map(|w| w.confidence).sum::<f32>() / words.len() as f32
}

/// Join words with spaces, starting a new line whenever the engine's
/// block/paragraph/line grouping changes.
fn join_lines(words: &[&TsvWord]) -> String {
    let mut out = String::new();
    let mut current_key = None;
    for word in words {
        match current_key {
            None => {}
            Some(key) if key == word.line_key => out.push(' '),
            Some(_) => out.push('\n'),
        }
        out.push_str(&word.text);
        current_key = Some(word.line_key);
    }
    out
}
