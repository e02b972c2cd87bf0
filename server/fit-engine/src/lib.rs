//! Behavioral fit & psychosocial risk scoring engine: deterministic, rule-based.
//!
//! Ingests psychometric score containers in any key spelling, resolves the six
//! canonical Attribute Index dimensions, compares the candidate with a job
//! benchmark and emits mismatch risk, combined NR-1/PSA occupational risk and
//! psychosocial flags as one EvaluationSummary JSON object.
//!
//! No AI, no DB, no network; pure computation over the request payload.

pub mod combined;
pub mod comparison;
pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod flags;
pub mod keys;
pub mod narrative;
pub mod normalize;
pub mod resolver;
pub mod risk;
pub mod telemetry;
pub mod types;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use keys::normalize_key;
pub use resolver::get_score;
pub use types::{EvaluationRequest, EvaluationSummary};
