//! Multi-strategy text extraction pipeline.
//!
//! Given a possibly low-quality scanned image, runs several competing
//! preprocessing strategies, derives bitmap variants from each, recognizes
//! every variant with the OCR backend, and selects the best candidate by
//! a quality-times-confidence metric. Falls back to recognizing the raw
//! unprocessed image when every strategy comes up empty.
//!
//! CPU-bound preprocessing and recognition run on the blocking thread
//! pool; the whole extraction call is bounded by a wall-clock budget.

mod backend;
mod entities;
mod extractor;
mod normalize;
mod preprocess;
mod quality;
mod variants;

pub use backend::{OcrBackend, OcrError, RecognizedText, TesseractBackend};
pub use entities::{extract_entities, ExtractedEntities};
pub use extractor::{ExtractionCandidate, ExtractionResult, TextExtractor};
pub use normalize::normalize_text;
pub use preprocess::PreprocessStrategy;
pub use quality::{calculate_quality, QualityScores};
pub use variants::bitmap_variants;
