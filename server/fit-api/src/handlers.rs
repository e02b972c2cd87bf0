//! HTTP handlers for the fit API.

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use fit_engine::types::ErrorOutput;
use fit_engine::{EvaluationRequest, EvaluationSummary};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::state::AppState;
use crate::types::{BatchItem, BatchResponse};

type ApiError = (StatusCode, Json<ErrorOutput>);

pub async fn health() -> &'static str {
  "ok"
}

pub async fn evaluate(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<EvaluationSummary>, ApiError> {
  let request: EvaluationRequest = serde_json::from_slice(&body).map_err(json_error)?;
  match state.engine.evaluate(&request) {
    Ok(summary) => Ok(Json(summary)),
    Err(e) => {
      tracing::warn!(error = %e, "evaluate: rejected");
      Err(bad_request(ErrorOutput::from(&e)))
    }
  }
}

/// Body is a JSON array of requests. A bad element fails only its own slot.
pub async fn evaluate_batch(
  State(state): State<Arc<AppState>>,
  body: Bytes,
) -> Result<Json<BatchResponse>, ApiError> {
  let items: Vec<Value> = serde_json::from_slice(&body).map_err(json_error)?;
  if items.len() > state.max_batch {
    return Err(bad_request(
      ErrorOutput::new(format!("batch exceeds {} requests", state.max_batch)).with_field("requests"),
    ));
  }

  let batch_id = Uuid::new_v4();
  let results: Vec<BatchItem> = items
    .into_iter()
    .map(|item| {
      let outcome = serde_json::from_value::<EvaluationRequest>(item)
        .map_err(|e| ErrorOutput::new(format!("json parse: {}", e)))
        .and_then(|request| state.engine.evaluate(&request).map_err(|e| ErrorOutput::from(&e)));
      match outcome {
        Ok(summary) => BatchItem::Summary(Box::new(summary)),
        Err(err) => BatchItem::Error(err),
      }
    })
    .collect();

  let failed = results.iter().filter(|r| matches!(r, BatchItem::Error(_))).count();
  tracing::info!(%batch_id, size = results.len(), failed, "evaluate_batch: done");

  Ok(Json(BatchResponse {
    batch_id,
    evaluated: results.len() - failed,
    failed,
    results,
  }))
}

fn json_error(e: serde_json::Error) -> ApiError {
  tracing::warn!(error = %e, "request body is not valid JSON");
  bad_request(ErrorOutput::new(format!("json parse: {}", e)))
}

fn bad_request(err: ErrorOutput) -> ApiError {
  (StatusCode::BAD_REQUEST, Json(err))
}
