//! Candidate-vs-benchmark comparison items and the unified fit score.

use std::collections::HashSet;

use crate::config::{ComparisonConfig, DomainThresholds};
use crate::container::ScoreSheet;
use crate::keys::normalize_key;
use crate::resolver::Resolver;
use crate::types::{
  Attribute, AttributeScores, BenchmarkSheets, Comparison, ComparisonItem, Domain, FitBasis,
  GapStatus, NarrativeContext,
};

/// Candidate side of a comparison: the resolved attribute vector plus the raw
/// motivational-value and DISC sheets.
#[derive(Debug, Clone, Default)]
pub struct CandidateProfile {
  pub attributes: AttributeScores,
  pub values: ScoreSheet,
  pub disc: ScoreSheet,
}

/// One item per attribute, value and DISC factor present on both sides.
///
/// `fit_score` is the mean item fit; with no items it falls back to the mean candidate
/// attribute rescaled to 0–100, and is absent when there is nothing to score.
pub fn build_comparison(
  resolver: &Resolver<'_>,
  candidate: &CandidateProfile,
  benchmark: &BenchmarkSheets,
  config: &ComparisonConfig,
) -> Comparison {
  let mut items = Vec::new();

  let ideal = resolver.attributes(&benchmark.attributes);
  for attribute in Attribute::ALL {
    if let (Some(c), Some(b)) = (candidate.attributes.get(attribute), ideal.get(attribute)) {
      let label = resolver.taxonomy().label(attribute);
      items.push(item(label, Domain::Attribute, c, b, &config.attribute));
    }
  }

  let mut seen = HashSet::new();
  for (entry, b) in benchmark.values.numeric() {
    if !seen.insert(entry.normalized.clone()) {
      continue;
    }
    if let Some(c) = resolver.by_name(&candidate.values, &entry.key) {
      items.push(item(&entry.key, Domain::Value, c, b, &config.value));
    }
  }

  for factor in &resolver.taxonomy().disc {
    let c = resolver.disc(&candidate.disc, factor);
    let b = resolver.disc(&benchmark.disc, factor);
    if let (Some(c), Some(b)) = (c, b) {
      items.push(item(&factor.label, Domain::Disc, c, b, &config.disc));
    }
  }

  if !items.is_empty() {
    let mean = items.iter().map(|i| i.fit).sum::<f64>() / items.len() as f64;
    return Comparison {
      items,
      fit_score: Some(round_to(mean, 1)),
      fit_basis: FitBasis::Benchmark,
    };
  }

  match candidate.attributes.mean() {
    Some(avg) => Comparison {
      items,
      fit_score: Some(round_to(
        (avg * 100.0 / config.attribute.scale_max).clamp(0.0, 100.0),
        1,
      )),
      fit_basis: FitBasis::AttributesOnly,
    },
    None => Comparison {
      items,
      fit_score: None,
      fit_basis: FitBasis::InsufficientData,
    },
  }
}

fn item(label: &str, domain: Domain, candidate: f64, benchmark: f64, t: &DomainThresholds) -> ComparisonItem {
  let delta = candidate - benchmark;
  let abs = delta.abs();
  ComparisonItem {
    label: label.to_string(),
    domain,
    candidate_score: candidate,
    benchmark_score: benchmark,
    delta: round_to(delta, 2),
    status: status(abs, t),
    fit: round_to((100.0 - abs / t.scale_max * 100.0).clamp(0.0, 100.0), 1),
  }
}

/// `critical` above the large threshold, `moderate` above the mid one, else `aligned`.
pub fn status(abs_delta: f64, t: &DomainThresholds) -> GapStatus {
  if abs_delta > t.critical {
    GapStatus::Critical
  } else if abs_delta > t.moderate {
    GapStatus::Moderate
  } else {
    GapStatus::Aligned
  }
}

/// Structured context for the narrative generator.
pub fn narrative_context(comparison: &Comparison) -> NarrativeContext {
  let labels = |status: GapStatus| {
    comparison
      .items
      .iter()
      .filter(|i| i.status == status)
      .map(|i| i.label.clone())
      .collect::<Vec<_>>()
  };
  NarrativeContext {
    fit_score: comparison.fit_score,
    critical_gaps: labels(GapStatus::Critical),
    moderate_gaps: labels(GapStatus::Moderate),
    items: comparison.items.clone(),
  }
}

/// Comparison items for `label`, matched on normalized form.
pub fn find_item<'c>(comparison: &'c Comparison, label: &str) -> Option<&'c ComparisonItem> {
  let key = normalize_key(label);
  comparison.items.iter().find(|i| normalize_key(&i.label) == key)
}

fn round_to(v: f64, places: i32) -> f64 {
  let f = 10f64.powi(places);
  (v * f).round() / f
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::EngineConfig;
  use serde_json::json;

  fn profile(attributes: AttributeScores, values: serde_json::Value, disc: serde_json::Value) -> CandidateProfile {
    CandidateProfile {
      attributes,
      values: ScoreSheet::from_value(&values),
      disc: ScoreSheet::from_value(&disc),
    }
  }

  fn benchmark(config: &EngineConfig, attributes: serde_json::Value, values: serde_json::Value, disc: serde_json::Value) -> BenchmarkSheets {
    BenchmarkSheets {
      attributes: ScoreSheet::from_value(&attributes),
      values: ScoreSheet::from_value_with_anchors(&values, &config.taxonomy.value_anchors),
      disc: ScoreSheet::from_value(&disc),
    }
  }

  #[test]
  fn builds_items_across_domains() {
    let config = EngineConfig::default();
    let resolver = Resolver::from_config(&config);
    let candidate = profile(
      AttributeScores::uniform(7.0),
      json!({ "teorico": 50, "Econômico": 80 }),
      json!({ "Dominance": 70 }),
    );
    let bench = benchmark(
      &config,
      json!({ "Empathy": 9.0, "Pensamento Prático": 4.0 }),
      json!({ "Teórico": "alto", "Altruísta": "baixo" }),
      json!({ "D": 60 }),
    );
    let cmp = build_comparison(&resolver, &candidate, &bench, &config.comparison);

    assert_eq!(cmp.fit_basis, FitBasis::Benchmark);
    assert_eq!(cmp.items.len(), 4);

    let empathy = find_item(&cmp, "Empatia").unwrap();
    assert_eq!(empathy.delta, -2.0);
    assert_eq!(empathy.status, GapStatus::Moderate);
    assert_eq!(empathy.fit, 80.0);

    let practical = find_item(&cmp, "Pensamento Prático").unwrap();
    assert_eq!(practical.status, GapStatus::Critical);
    assert_eq!(practical.fit, 70.0);

    let theoretical = find_item(&cmp, "Teórico").unwrap();
    assert_eq!(theoretical.domain, Domain::Value);
    assert_eq!(theoretical.benchmark_score, 85.0);
    assert_eq!(theoretical.status, GapStatus::Critical);
    assert_eq!(theoretical.fit, 65.0);

    let dominance = find_item(&cmp, "Dominância").unwrap();
    assert_eq!(dominance.domain, Domain::Disc);
    assert_eq!(dominance.status, GapStatus::Aligned);
    assert_eq!(dominance.fit, 90.0);

    // (80 + 70 + 65 + 90) / 4
    assert_eq!(cmp.fit_score, Some(76.3));
  }

  #[test]
  fn falls_back_to_attribute_only_fit() {
    let config = EngineConfig::default();
    let resolver = Resolver::from_config(&config);
    let candidate = profile(AttributeScores::uniform(6.5), json!(null), json!(null));
    let cmp = build_comparison(&resolver, &candidate, &BenchmarkSheets::default(), &config.comparison);
    assert!(cmp.items.is_empty());
    assert_eq!(cmp.fit_basis, FitBasis::AttributesOnly);
    assert_eq!(cmp.fit_score, Some(65.0));
  }

  #[test]
  fn nothing_to_score_has_no_fit() {
    let config = EngineConfig::default();
    let resolver = Resolver::from_config(&config);
    let cmp = build_comparison(
      &resolver,
      &CandidateProfile::default(),
      &BenchmarkSheets::default(),
      &config.comparison,
    );
    assert_eq!(cmp.fit_score, None);
    assert_eq!(cmp.fit_basis, FitBasis::InsufficientData);
  }

  #[test]
  fn status_thresholds_are_exclusive() {
    let t = EngineConfig::default().comparison.attribute;
    assert_eq!(status(1.0, &t), GapStatus::Aligned);
    assert_eq!(status(1.01, &t), GapStatus::Moderate);
    assert_eq!(status(2.0, &t), GapStatus::Moderate);
    assert_eq!(status(2.5, &t), GapStatus::Critical);
  }

  #[test]
  fn fit_never_negative() {
    let t = EngineConfig::default().comparison.attribute;
    let i = item("Empatia", Domain::Attribute, 0.0, 14.0, &t);
    assert_eq!(i.fit, 0.0);
  }

  #[test]
  fn narrative_context_groups_gaps() {
    let config = EngineConfig::default();
    let resolver = Resolver::from_config(&config);
    let mut attributes = AttributeScores::uniform(5.0);
    attributes.set(Attribute::SelfDirection, 2.0);
    attributes.set(Attribute::Empathy, 6.5);
    let candidate = profile(attributes, json!(null), json!(null));
    let bench = benchmark(&config, json!({ "Autodireção": 6.0, "Empatia": 5.0 }), json!(null), json!(null));
    let cmp = build_comparison(&resolver, &candidate, &bench, &config.comparison);
    let ctx = narrative_context(&cmp);
    assert_eq!(ctx.critical_gaps, vec!["Autodireção".to_string()]);
    assert_eq!(ctx.moderate_gaps, vec!["Empatia".to_string()]);
    assert_eq!(ctx.fit_score, cmp.fit_score);
  }
}
