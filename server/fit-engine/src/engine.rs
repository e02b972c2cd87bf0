//! Core engine: runs one evaluation request through every scoring stage.

use serde_json::Value;

use crate::comparison::{self, CandidateProfile};
use crate::combined;
use crate::config::EngineConfig;
use crate::container::ScoreSheet;
use crate::error::EngineError;
use crate::fingerprint;
use crate::flags;
use crate::narrative;
use crate::normalize;
use crate::resolver::Resolver;
use crate::risk;
use crate::types::*;

/// The scoring engine. Stateless apart from its configuration; safe to share.
#[derive(Debug, Clone, Default)]
pub struct Engine {
  config: EngineConfig,
}

impl Engine {
  pub fn new(config: EngineConfig) -> Self {
    Self { config }
  }

  pub fn with_defaults() -> Self {
    Self::new(EngineConfig::default())
  }

  pub fn config(&self) -> &EngineConfig {
    &self.config
  }

  pub fn resolver(&self) -> Resolver<'_> {
    Resolver::from_config(&self.config)
  }

  /// Full pipeline for one request.
  ///
  /// `average_fit` for the risk model is the request value, else the comparison fit score,
  /// else the configured baseline.
  pub fn evaluate(&self, raw: &EvaluationRequest) -> Result<EvaluationSummary, EngineError> {
    let ev = normalize::normalize(raw, &self.config.taxonomy.value_anchors)?;
    let resolver = self.resolver();

    // Resolve once; every stage below reads this vector.
    let attributes = resolver.attributes(&ev.scores);
    let ideal = resolver.attributes(&ev.benchmark.attributes);

    let candidate = CandidateProfile {
      attributes,
      values: ev.values,
      disc: ev.disc,
    };
    let comparison =
      comparison::build_comparison(&resolver, &candidate, &ev.benchmark, &self.config.comparison);

    let average_fit = ev.average_fit.or(comparison.fit_score);
    let scientific_risk = risk::scientific_risk(
      &attributes,
      &ideal,
      average_fit,
      &self.config.taxonomy,
      &self.config.risk_model,
    );
    let combined_risk = combined::combined_risk(&attributes, &ev.survey, &self.config.combined);
    let psychosocial = flags::detect_flags(&attributes, &self.config.flags);

    let narrative_issues = ev
      .narrative
      .as_deref()
      .map(|text| narrative::check_narrative(text, &comparison, &self.config.narrative));

    let evaluation_id = fingerprint::evaluation_id(raw);
    tracing::debug!(
      evaluation_id = %evaluation_id,
      attributes_found = attributes.found(),
      items = comparison.items.len(),
      "evaluation complete"
    );

    Ok(EvaluationSummary {
      evaluation_id,
      report_id: ev.report_id,
      assessed_at: ev.assessed_at.map(|t| t.to_rfc3339()),
      attributes: Attribute::ALL
        .iter()
        .map(|a| ResolvedAttribute {
          attribute: *a,
          label: self.config.taxonomy.label(*a).to_string(),
          score: attributes.get(*a),
        })
        .collect(),
      comparison,
      scientific_risk,
      combined_risk,
      psychosocial,
      narrative_issues,
    })
  }

  /// Score for `name` inside a raw container.
  pub fn score(&self, name: &str, container: &Value) -> Option<f64> {
    self.resolver().by_name(&ScoreSheet::from_value(container), name)
  }

  /// Canonical attribute vector of a raw container.
  pub fn attributes(&self, container: &Value) -> AttributeScores {
    self.resolver().attributes(&ScoreSheet::from_value(container))
  }

  pub fn scientific_risk(
    &self,
    candidate: &Value,
    benchmark: &Value,
    average_fit: Option<f64>,
  ) -> ScientificRisk {
    risk::scientific_risk(
      &self.attributes(candidate),
      &self.attributes(benchmark),
      average_fit,
      &self.config.taxonomy,
      &self.config.risk_model,
    )
  }

  /// Combined index over one container carrying attribute scores and/or survey answers.
  pub fn combined_risk(&self, scores: &Value) -> CombinedRisk {
    let sheet = ScoreSheet::from_value(scores);
    combined::combined_risk(&self.resolver().attributes(&sheet), &sheet, &self.config.combined)
  }

  pub fn detect_flags(&self, scores: &Value) -> PsychosocialScreen {
    flags::detect_flags(&self.attributes(scores), &self.config.flags)
  }

  /// Structured context for the narrative generator.
  pub fn narrative_context(&self, comparison: &Comparison) -> NarrativeContext {
    comparison::narrative_context(comparison)
  }

  pub fn check_narrative(&self, text: &str, comparison: &Comparison) -> Vec<NarrativeIssue> {
    narrative::check_narrative(text, comparison, &self.config.narrative)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn request(v: Value) -> EvaluationRequest {
    serde_json::from_value(v).unwrap()
  }

  #[test]
  fn evaluates_full_request() {
    let engine = Engine::with_defaults();
    let summary = engine
      .evaluate(&request(json!({
        "report_id": "rep-42",
        "assessed_at": "2025-02-10T09:00:00Z",
        "scores": {
          "Empatia": 7.0, "Pensamento Prático": 6.0, "Julgamento Sistêmico": 7.5,
          "Autoestima": 6.5, "Consciência Funcional": 7.0, "Autodireção": 3.0
        },
        "benchmark": { "attributes": {
          "Empatia": 7.0, "Pensamento Prático": 6.0, "Julgamento Sistêmico": 7.0,
          "Autoestima": 6.0, "Consciência Funcional": 7.0, "Autodireção": 7.0
        } },
        "narrative": "Bom perfil geral."
      })))
      .unwrap();

    assert_eq!(summary.report_id.as_deref(), Some("rep-42"));
    assert_eq!(summary.assessed_at.as_deref(), Some("2025-02-10T09:00:00+00:00"));
    assert_eq!(summary.attributes.len(), 6);
    assert_eq!(summary.comparison.fit_basis, FitBasis::Benchmark);
    assert_eq!(summary.scientific_risk.critical_gaps(), ["Autodireção".to_string()]);
    assert_eq!(summary.combined_risk.sources_used(), ["NR-1 (Innermetrix)".to_string()]);
    assert!(summary.psychosocial.detected_risks().is_empty());
    assert_eq!(
      summary.narrative_issues,
      Some(vec![NarrativeIssue::OmittedCriticalGap {
        label: "Autodireção".into()
      }])
    );
  }

  #[test]
  fn empty_request_is_insufficient_everywhere() {
    let summary = Engine::with_defaults().evaluate(&EvaluationRequest::default()).unwrap();
    assert!(summary.scientific_risk.is_insufficient());
    assert!(summary.combined_risk.is_insufficient());
    assert_eq!(summary.psychosocial, PsychosocialScreen::InsufficientData);
    assert_eq!(summary.comparison.fit_score, None);
    assert!(summary.narrative_issues.is_none());
    assert!(summary.attributes.iter().all(|a| a.score.is_none()));
  }

  #[test]
  fn request_fit_overrides_comparison_fit() {
    let engine = Engine::with_defaults();
    let base = json!({ "scores": {
      "Empatia": 5.0, "Pensamento Prático": 5.0, "Julgamento Sistêmico": 5.0,
      "Autoestima": 5.0, "Consciência Funcional": 5.0, "Autodireção": 5.0
    } });
    let without = engine.evaluate(&request(base.clone())).unwrap();
    let mut with = base;
    with["average_fit"] = json!(10.0);
    let with = engine.evaluate(&request(with)).unwrap();
    assert!(with.scientific_risk.score() > without.scientific_risk.score());
  }

  #[test]
  fn convenience_entry_points() {
    let engine = Engine::with_defaults();
    assert_eq!(engine.score("Empatia", &json!({ "empathy": 6.0 })), Some(6.0));
    assert_eq!(engine.combined_risk(&json!({ "Empatia": 10.0 })).risk_percentage(), 0);
    assert!(engine.detect_flags(&json!({})).detected_risks().is_empty());
    assert!(engine
      .scientific_risk(&json!({}), &json!({ "Empatia": 5.0 }), None)
      .is_insufficient());
  }

  #[test]
  fn convenience_risk_ignores_unusable_fit() {
    let engine = Engine::with_defaults();
    let candidate = json!({ "Empatia": 1.0 });
    let baseline = engine.scientific_risk(&candidate, &json!({}), None);
    let nan = engine.scientific_risk(&candidate, &json!({}), Some(f64::NAN));
    assert_eq!(nan, baseline);
    assert!(nan.score() > 0);
    assert_eq!(
      engine.scientific_risk(&candidate, &json!({}), Some(400.0)),
      engine.scientific_risk(&candidate, &json!({}), Some(100.0))
    );
  }

  #[test]
  fn invalid_envelope_is_an_error() {
    let err = Engine::with_defaults()
      .evaluate(&request(json!({ "average_fit": 140 })))
      .unwrap_err();
    assert!(matches!(err, EngineError::Validation { .. }));
  }
}
