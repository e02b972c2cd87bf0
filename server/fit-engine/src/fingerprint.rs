//! Stable evaluation identifier.

use serde_json::Value;

use crate::types::EvaluationRequest;

/// `eval-` + the first 16 hex chars of a blake3 hash over the request payload.
///
/// Containers are hashed through their serialized JSON, which keeps document order,
/// so the same request always yields the same id.
pub fn evaluation_id(request: &EvaluationRequest) -> String {
  let mut hasher = blake3::Hasher::new();
  hasher.update(request.report_id.as_deref().unwrap_or_default().as_bytes());
  hasher.update(b"|");
  hasher.update(request.assessed_at.as_deref().unwrap_or_default().as_bytes());

  for part in [
    &request.scores,
    &request.survey,
    &request.values,
    &request.disc,
    &request.benchmark,
  ] {
    hasher.update(b"|");
    hash_value(&mut hasher, part);
  }

  hasher.update(b"|");
  if let Some(fit) = request.average_fit {
    hasher.update(&fit.to_le_bytes());
  }
  hasher.update(b"|");
  hasher.update(request.narrative.as_deref().unwrap_or_default().as_bytes());

  let hex = hasher.finalize().to_hex();
  format!("eval-{}", &hex[..16])
}

fn hash_value(hasher: &mut blake3::Hasher, value: &Value) {
  if !value.is_null() {
    hasher.update(value.to_string().as_bytes());
  }
}
