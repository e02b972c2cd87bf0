//! Validate an inbound request and ingest its containers into an `Evaluation`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::config::QualitativeAnchors;
use crate::container::ScoreSheet;
use crate::error::EngineError;
use crate::types::{BenchmarkSheets, Evaluation, EvaluationRequest};

/// Only the envelope is validated; score containers never fail, they degrade to empty sheets.
pub fn normalize(raw: &EvaluationRequest, anchors: &QualitativeAnchors) -> Result<Evaluation, EngineError> {
  let assessed_at = match raw.assessed_at.as_deref() {
    Some(ts) => Some(
      DateTime::parse_from_rfc3339(ts)
        .map_err(|e| EngineError::validation("assessed_at", &format!("invalid RFC3339: {}", e)))?
        .with_timezone(&Utc),
    ),
    None => None,
  };

  if let Some(fit) = raw.average_fit {
    if !fit.is_finite() || !(0.0..=100.0).contains(&fit) {
      return Err(EngineError::validation("average_fit", "must be within 0-100"));
    }
  }

  if let Some(id) = &raw.report_id {
    if id.trim().is_empty() {
      return Err(EngineError::validation("report_id", "must not be blank"));
    }
  }

  let scores = ScoreSheet::from_value(&raw.scores);
  // PSA answers may ride along in the scores container.
  let survey = match &raw.survey {
    Value::Object(_) | Value::Array(_) => ScoreSheet::from_value(&raw.survey),
    _ => scores.clone(),
  };

  let benchmark = BenchmarkSheets {
    attributes: ScoreSheet::from_value(section(&raw.benchmark, "attributes")),
    values: ScoreSheet::from_value_with_anchors(section(&raw.benchmark, "values"), anchors),
    disc: ScoreSheet::from_value(section(&raw.benchmark, "disc")),
  };

  Ok(Evaluation {
    report_id: raw.report_id.clone(),
    assessed_at,
    scores,
    survey,
    values: ScoreSheet::from_value(&raw.values),
    disc: ScoreSheet::from_value(&raw.disc),
    benchmark,
    average_fit: raw.average_fit,
    narrative: raw.narrative.clone().filter(|n| !n.trim().is_empty()),
  })
}

static NULL: Value = Value::Null;

fn section<'v>(benchmark: &'v Value, name: &str) -> &'v Value {
  benchmark.get(name).unwrap_or(&NULL)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::container::ContainerShape;
  use serde_json::json;

  fn anchors() -> QualitativeAnchors {
    QualitativeAnchors::default()
  }

  #[test]
  fn rejects_bad_timestamp() {
    let raw = EvaluationRequest {
      assessed_at: Some("yesterday".into()),
      ..Default::default()
    };
    let err = normalize(&raw, &anchors()).unwrap_err();
    assert!(err.to_string().contains("assessed_at"));
  }

  #[test]
  fn rejects_out_of_range_fit() {
    for fit in [-1.0, 100.5, f64::NAN] {
      let raw = EvaluationRequest {
        average_fit: Some(fit),
        ..Default::default()
      };
      let err = normalize(&raw, &anchors()).unwrap_err();
      assert!(err.to_string().contains("average_fit"));
    }
  }

  #[test]
  fn rejects_blank_report_id() {
    let raw = EvaluationRequest {
      report_id: Some("  ".into()),
      ..Default::default()
    };
    assert!(normalize(&raw, &anchors()).is_err());
  }

  #[test]
  fn empty_request_normalizes_to_empty_sheets() {
    let ev = normalize(&EvaluationRequest::default(), &anchors()).unwrap();
    assert!(ev.scores.is_empty());
    assert!(ev.survey.is_empty());
    assert!(ev.benchmark.is_empty());
    assert_eq!(ev.assessed_at, None);
  }

  #[test]
  fn survey_falls_back_to_scores_container() {
    let raw = EvaluationRequest {
      scores: json!({ "Empatia": 7.0, "apoio-0": 4 }),
      ..Default::default()
    };
    let ev = normalize(&raw, &anchors()).unwrap();
    assert_eq!(ev.survey.literal("apoio-0"), Some(4.0));

    let raw = EvaluationRequest {
      scores: json!({ "apoio-0": 4 }),
      survey: json!([{ "name": "apoio-0", "score": 2 }]),
      ..Default::default()
    };
    let ev = normalize(&raw, &anchors()).unwrap();
    assert_eq!(ev.survey.shape(), ContainerShape::Itemized);
  }

  #[test]
  fn benchmark_sections_and_qualitative_values() {
    let raw = EvaluationRequest {
      assessed_at: Some("2025-03-01T12:00:00-03:00".into()),
      benchmark: json!({
        "attributes": { "Empatia": 7 },
        "values": { "Teórico": "Médio" },
        "disc": "not a container"
      }),
      ..Default::default()
    };
    let ev = normalize(&raw, &anchors()).unwrap();
    assert_eq!(ev.benchmark.attributes.literal("Empatia"), Some(7.0));
    assert_eq!(ev.benchmark.values.literal("Teórico"), Some(50.0));
    assert!(ev.benchmark.disc.is_empty());
    assert_eq!(
      ev.assessed_at.map(|t| t.to_rfc3339()),
      Some("2025-03-01T15:00:00+00:00".to_string())
    );
  }
}
