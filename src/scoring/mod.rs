//! Concurrent contract risk-scoring engine.
//!
//! Ten independent checks each produce a bounded partial score; the
//! checks run concurrently, share one resolved-company slot, and are
//! aggregated into a total score and a tri-state safety verdict. The
//! registry, the company cache and the network probes all sit behind
//! traits so every check is testable without I/O.

mod engine;
mod fields;
mod probes;
mod report;

pub use engine::ContractScorer;
pub use fields::{ContractFields, FieldExtractionError, FieldExtractor};
pub use probes::{domain_matches_company, HttpProbe, ReachabilityProbe};
pub use report::{CheckKind, SafetyStatus, ScoreReport};
