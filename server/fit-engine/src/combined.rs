//! Combined occupational risk index (NR-1 behavioral inventory + PSA survey).
//!
//! NR-1: clamp((scale_max - mean attribute) * 100 / scale_max, 0, 100)
//! PSA:  clamp((likert_max - mean answer) * 100 / likert_max, 0, 100)
//! Headline: arithmetic mean of whichever sub-risks are present.

use crate::config::{CombinedRiskConfig, OccupationalLevels};
use crate::container::ScoreSheet;
use crate::types::{
  AttributeScores, CombinedRisk, OccupationalRisk, OccupationalRiskLevel, RiskDetails,
};

/// PSA answers found under `"{dimension}-{question}"` keys, in survey order.
/// Answers outside the Likert range are skipped.
pub fn survey_answers(sheet: &ScoreSheet, config: &CombinedRiskConfig) -> Vec<f64> {
  let mut answers = Vec::new();
  for dimension in &config.survey {
    for key in dimension.keys() {
      let Some(v) = sheet.literal(&key) else {
        continue;
      };
      if v < config.likert_min || v > config.likert_max {
        tracing::debug!(key = %key, value = v, "survey answer outside likert range, skipped");
        continue;
      }
      answers.push(v);
    }
  }
  answers
}

/// Behavioral-inventory sub-risk; `None` when no attribute was found.
pub fn nr1_risk(attributes: &AttributeScores, config: &CombinedRiskConfig) -> Option<f64> {
  let avg = attributes.mean()?;
  let max = config.attribute_scale_max;
  Some(((max - avg) * (100.0 / max)).clamp(0.0, 100.0))
}

/// Survey sub-risk; `None` when no answer was found.
pub fn psa_risk(answers: &[f64], config: &CombinedRiskConfig) -> Option<f64> {
  if answers.is_empty() {
    return None;
  }
  let avg = answers.iter().sum::<f64>() / answers.len() as f64;
  let max = config.likert_max;
  Some(((max - avg) * (100.0 / max)).clamp(0.0, 100.0))
}

/// Combined index over the resolved attribute vector and the survey sheet.
pub fn combined_risk(
  attributes: &AttributeScores,
  survey: &ScoreSheet,
  config: &CombinedRiskConfig,
) -> CombinedRisk {
  let psa = psa_risk(&survey_answers(survey, config), config);
  let nr1 = nr1_risk(attributes, config);

  let mut sources_used = Vec::new();
  let mut parts = Vec::new();
  if let Some(r) = psa {
    sources_used.push(config.psa_source.clone());
    parts.push(r);
  }
  if let Some(r) = nr1 {
    sources_used.push(config.nr1_source.clone());
    parts.push(r);
  }

  if parts.is_empty() {
    tracing::warn!("combined risk skipped: neither NR-1 nor PSA data present");
    return CombinedRisk::InsufficientData;
  }

  let mean = parts.iter().sum::<f64>() / parts.len() as f64;
  let risk_percentage = mean.round().clamp(0.0, 100.0) as u8;

  CombinedRisk::Assessed(OccupationalRisk {
    risk_percentage,
    level: classify(f64::from(risk_percentage), &config.levels),
    details: RiskDetails {
      psa_risk: psa.map(round1),
      nr1_risk: nr1.map(round1),
      sources_used,
    },
  })
}

/// `>= critical` Crítico, `>= high` Alto, `>= moderate` Moderado, else Baixo.
pub fn classify(percentage: f64, levels: &OccupationalLevels) -> OccupationalRiskLevel {
  if percentage >= levels.critical {
    OccupationalRiskLevel::Critico
  } else if percentage >= levels.high {
    OccupationalRiskLevel::Alto
  } else if percentage >= levels.moderate {
    OccupationalRiskLevel::Moderado
  } else {
    OccupationalRiskLevel::Baixo
  }
}

fn round1(v: f64) -> f64 {
  (v * 10.0).round() / 10.0
}
