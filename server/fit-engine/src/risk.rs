//! Non-compensatory mismatch risk between a candidate and a job benchmark.
//!
//! S = (100 - fit) / fit_divisor + Σ gap_i · w_i   over attributes with real < ideal
//! gap_i = (ideal - real) / ideal,  w_i = axial_weight | standard_weight
//! risk  = 1 - e^(-decay · S)
//!
//! Surplus on one attribute never offsets a deficit on another.

use crate::config::{RiskModelConfig, Taxonomy};
use crate::types::{Attribute, AttributeScores, MismatchRisk, RiskLabel, ScientificRisk};

/// Mismatch risk for `candidate` against `benchmark`.
///
/// `average_fit` defaults to `config.baseline_fit`, which also replaces a non-finite fit; finite
/// values are clamped to 0-100. Missing benchmark attributes use
/// `config.default_ideal`, missing candidate attributes `config.default_real`. A candidate
/// with none of the six attributes yields `InsufficientData`.
pub fn scientific_risk(
  candidate: &AttributeScores,
  benchmark: &AttributeScores,
  average_fit: Option<f64>,
  taxonomy: &Taxonomy,
  config: &RiskModelConfig,
) -> ScientificRisk {
  if candidate.is_empty() {
    tracing::warn!("mismatch risk skipped: candidate has no canonical attributes");
    return ScientificRisk::InsufficientData;
  }

  let fit = average_fit
    .filter(|f| f.is_finite())
    .unwrap_or(config.baseline_fit)
    .clamp(0.0, 100.0);
  let mut s = (100.0 - fit) / config.fit_divisor;
  let mut critical_gaps = Vec::new();

  for attribute in Attribute::ALL {
    let ideal = benchmark.get_or(attribute, config.default_ideal);
    let real = candidate.get_or(attribute, config.default_real);
    if real < ideal && ideal > 0.0 {
      let gap = (ideal - real) / ideal;
      s += gap * weight(attribute, config);
      if gap >= config.critical_gap_ratio {
        critical_gaps.push(taxonomy.label(attribute).to_string());
      }
    }
  }

  let risk = 1.0 - (-config.decay * s).exp();
  let score = (risk * 100.0).round().clamp(0.0, 100.0) as u8;

  ScientificRisk::Assessed(MismatchRisk {
    score,
    label: classify(score, config),
    critical_gaps,
    accumulator: (s * 1000.0).round() / 1000.0,
  })
}

fn weight(attribute: Attribute, config: &RiskModelConfig) -> f64 {
  if config.axial.contains(&attribute) {
    config.axial_weight
  } else {
    config.standard_weight
  }
}

/// `score >= critical` → CRÍTICO, `>= moderate` → MODERADO, else BAIXO.
pub fn classify(score: u8, config: &RiskModelConfig) -> RiskLabel {
  if score >= config.critical_threshold {
    RiskLabel::Critico
  } else if score >= config.moderate_threshold {
    RiskLabel::Moderado
  } else {
    RiskLabel::Baixo
  }
}
