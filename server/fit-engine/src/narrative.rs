//! Consistency check of a generated narrative against the numeric comparison.
//!
//! Text and terms are compared in normalized form, so accents, case and spacing
//! never hide a match.

use crate::config::NarrativeConfig;
use crate::keys::normalize_key;
use crate::types::{Comparison, GapStatus, NarrativeIssue};

/// Issues found in `text`; empty when the narrative agrees with the numbers.
///
/// - a risk term while fit is at or above `high_fit`
/// - a praise term while fit is below `low_fit`
/// - a critical gap whose label never appears
pub fn check_narrative(text: &str, comparison: &Comparison, config: &NarrativeConfig) -> Vec<NarrativeIssue> {
  let body = normalize_key(text);
  let mut issues = Vec::new();

  if let Some(fit) = comparison.fit_score {
    if fit >= config.high_fit {
      issues.extend(
        matching_terms(&body, &config.risk_terms).map(|term| NarrativeIssue::UnsupportedRisk { term }),
      );
    }
    if fit < config.low_fit {
      issues.extend(
        matching_terms(&body, &config.praise_terms)
          .map(|term| NarrativeIssue::UnsupportedStrength { term }),
      );
    }
  }

  for item in comparison.items.iter().filter(|i| i.status == GapStatus::Critical) {
    let label = normalize_key(&item.label);
    if !label.is_empty() && !body.contains(&label) {
      issues.push(NarrativeIssue::OmittedCriticalGap {
        label: item.label.clone(),
      });
    }
  }

  if !issues.is_empty() {
    tracing::debug!(count = issues.len(), "narrative disagrees with comparison");
  }
  issues
}

fn matching_terms<'t>(body: &'t str, terms: &'t [String]) -> impl Iterator<Item = String> + 't {
  terms.iter().filter_map(move |t| {
    let key = normalize_key(t);
    (!key.is_empty() && body.contains(&key)).then(|| t.clone())
  })
}
