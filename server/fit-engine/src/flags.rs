//! Psychosocial risk flags from fixed threshold conjunctions.

use crate::config::FlagConfig;
use crate::types::{AttributeScores, FlagReport, FlagRiskLevel, PsychosocialScreen, RiskFlag};

/// Evaluate every rule against the attribute vector (missing attributes read as 0).
///
/// Overall level: Alto when an escalating flag fires or `high_count` flags fire,
/// Moderado for any other non-empty set, else Baixo. A vector with none of the six
/// attributes yields `InsufficientData`.
pub fn detect_flags(attributes: &AttributeScores, config: &FlagConfig) -> PsychosocialScreen {
  if attributes.is_empty() {
    tracing::warn!("psychosocial screen skipped: no canonical attributes");
    return PsychosocialScreen::InsufficientData;
  }

  let detected: Vec<RiskFlag> = config
    .rules
    .iter()
    .filter(|rule| {
      rule
        .conditions
        .iter()
        .all(|c| c.holds(attributes.get_or(c.attribute, 0.0)))
    })
    .map(|rule| rule.flag)
    .collect();

  let risk_level = if detected.len() >= config.high_count
    || detected.iter().any(|f| config.escalating.contains(f))
  {
    FlagRiskLevel::Alto
  } else if !detected.is_empty() {
    FlagRiskLevel::Moderado
  } else {
    FlagRiskLevel::Baixo
  };

  let explanations = detected.iter().map(|f| f.describe().to_string()).collect();

  PsychosocialScreen::Assessed(FlagReport {
    risk_level,
    detected_risks: detected,
    explanations,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::types::Attribute;

  fn screen(pairs: &[(Attribute, f64)]) -> FlagReport {
    let mut scores = AttributeScores::uniform(5.0);
    for (a, v) in pairs {
      scores.set(*a, *v);
    }
    match detect_flags(&scores, &FlagConfig::default()) {
      PsychosocialScreen::Assessed(r) => r,
      PsychosocialScreen::InsufficientData => panic!("expected assessed screen"),
    }
  }

  #[test]
  fn burnout_forces_alto() {
    let r = screen(&[
      (Attribute::FunctionalAwareness, 9.0),
      (Attribute::SelfEsteem, 3.0),
      (Attribute::PracticalThinking, 3.0),
    ]);
    assert!(r.detected_risks.contains(&RiskFlag::Burnout));
    assert_eq!(r.risk_level, FlagRiskLevel::Alto);
    assert_eq!(r.explanations.len(), r.detected_risks.len());
  }

  #[test]
  fn neutral_profile_is_clean() {
    let r = screen(&[]);
    assert!(r.detected_risks.is_empty());
    assert_eq!(r.risk_level, FlagRiskLevel::Baixo);
  }

  #[test]
  fn single_non_escalating_flag_is_moderado() {
    let r = screen(&[(Attribute::SelfEsteem, 3.0), (Attribute::SelfDirection, 3.5)]);
    assert_eq!(r.detected_risks, vec![RiskFlag::AssedioVitima]);
    assert_eq!(r.risk_level, FlagRiskLevel::Moderado);
  }

  #[test]
  fn three_flags_escalate() {
    // Assedio_Agressor, Conflito and Procrastinacao together
    let r = screen(&[
      (Attribute::SelfDirection, 9.0),
      (Attribute::Empathy, 3.0),
      (Attribute::PracticalThinking, 3.0),
      (Attribute::SystemsJudgment, 9.0),
    ]);
    assert_eq!(
      r.detected_risks,
      vec![RiskFlag::AssedioAgressor, RiskFlag::Procrastinacao, RiskFlag::Conflito]
    );
    assert_eq!(r.risk_level, FlagRiskLevel::Alto);
  }

  #[test]
  fn impulsive_decision_rule() {
    let r = screen(&[(Attribute::SystemsJudgment, 3.0), (Attribute::PracticalThinking, 8.5)]);
    assert_eq!(r.detected_risks, vec![RiskFlag::DecisaoImpulsiva]);
  }

  #[test]
  fn thresholds_are_strict() {
    let r = screen(&[(Attribute::SelfEsteem, 4.0), (Attribute::SelfDirection, 4.0)]);
    assert!(r.detected_risks.is_empty());
  }

  #[test]
  fn missing_attributes_read_as_zero() {
    let scores: AttributeScores = [(Attribute::Empathy, 5.0)].into_iter().collect();
    let r = detect_flags(&scores, &FlagConfig::default());
    assert_eq!(r.detected_risks(), [RiskFlag::AssedioVitima]);
  }

  #[test]
  fn empty_vector_is_insufficient() {
    let r = detect_flags(&AttributeScores::default(), &FlagConfig::default());
    assert_eq!(r, PsychosocialScreen::InsufficientData);
    assert!(r.detected_risks().is_empty());
    assert_eq!(r.risk_level(), None);
  }
}
