//! Response types for the fit API.

use fit_engine::types::ErrorOutput;
use fit_engine::EvaluationSummary;
use serde::Serialize;
use uuid::Uuid;

/// One batch slot: the summary, or the error for that request alone.
#[derive(Serialize)]
#[serde(untagged)]
pub enum BatchItem {
  Summary(Box<EvaluationSummary>),
  Error(ErrorOutput),
}

#[derive(Serialize)]
pub struct BatchResponse {
  pub batch_id: Uuid,
  pub evaluated: usize,
  pub failed: usize,
  pub results: Vec<BatchItem>,
}
