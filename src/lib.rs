//! Contracheck - employment contract verification and trust scoring.
//!
//! Pairs a multi-strategy OCR extraction pipeline with a concurrent
//! risk-scoring engine that cross-checks extracted contract fields
//! against the UK company registry and a local company cache.

pub mod cli;
pub mod config;
pub mod ocr;
pub mod registry;
pub mod scoring;
pub mod store;
