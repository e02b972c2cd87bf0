//! Synonym resolution and the score extraction facade.
//!
//! Lookup tiers for one dimension against one sheet:
//! 1. literal key equal to the requested name (flat maps only)
//! 2. normalized key equal to any normalized synonym
//! 3. normalized key containing, or contained in, a normalized synonym (flat maps only);
//!    both sides must be at least `fuzzy_min_len` long, so short keys never match here
//!
//! The first numeric hit wins; "not found" is `None`, never zero.

use serde_json::Value;

use crate::config::{EngineConfig, LookupConfig, SynonymSet, Taxonomy};
use crate::container::ScoreSheet;
use crate::keys::normalize_key;
use crate::types::{Attribute, AttributeScores};

/// Which synonym set a free-form name belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension<'a> {
  Attribute(Attribute),
  Disc(&'a SynonymSet),
}

pub struct Resolver<'a> {
  taxonomy: &'a Taxonomy,
  lookup: &'a LookupConfig,
}

impl<'a> Resolver<'a> {
  pub fn new(taxonomy: &'a Taxonomy, lookup: &'a LookupConfig) -> Self {
    Self { taxonomy, lookup }
  }

  pub fn from_config(config: &'a EngineConfig) -> Self {
    Self::new(&config.taxonomy, &config.lookup)
  }

  pub fn taxonomy(&self) -> &'a Taxonomy {
    self.taxonomy
  }

  /// Value of one canonical attribute.
  pub fn attribute(&self, sheet: &ScoreSheet, attribute: Attribute) -> Option<f64> {
    let label = self.taxonomy.label(attribute);
    let candidates = self.attribute_keys(attribute);
    self.lookup(sheet, label, &candidates)
  }

  /// The full canonical vector; this is the one normalization step before scoring.
  pub fn attributes(&self, sheet: &ScoreSheet) -> AttributeScores {
    Attribute::ALL
      .iter()
      .filter_map(|a| self.attribute(sheet, *a).map(|v| (*a, v)))
      .collect()
  }

  /// Value of one DISC factor.
  pub fn disc(&self, sheet: &ScoreSheet, factor: &SynonymSet) -> Option<f64> {
    self.lookup(sheet, &factor.label, &candidate_keys(factor))
  }

  /// Value for an arbitrary name. Names belonging to a known dimension use its synonyms;
  /// anything else matches on its own normalized form.
  pub fn by_name(&self, sheet: &ScoreSheet, name: &str) -> Option<f64> {
    let candidates = match self.dimension_of(name) {
      Some(Dimension::Attribute(a)) => self.attribute_keys(a),
      Some(Dimension::Disc(set)) => candidate_keys(set),
      None => {
        let key = normalize_key(name);
        if key.is_empty() {
          Vec::new()
        } else {
          vec![key]
        }
      }
    };
    self.lookup(sheet, name, &candidates)
  }

  /// Canonical dimension a free-form name refers to, if any (normalized-exact on synonyms).
  pub fn dimension_of(&self, name: &str) -> Option<Dimension<'a>> {
    let key = normalize_key(name);
    if key.is_empty() {
      return None;
    }
    if let Some(a) = Attribute::ALL
      .iter()
      .find(|a| self.attribute_keys(**a).contains(&key))
    {
      return Some(Dimension::Attribute(*a));
    }
    self
      .taxonomy
      .disc
      .iter()
      .find(|set| candidate_keys(set).contains(&key))
      .map(Dimension::Disc)
  }

  fn attribute_keys(&self, attribute: Attribute) -> Vec<String> {
    match self.taxonomy.synonyms(attribute) {
      Some(set) => candidate_keys(set),
      None => vec![normalize_key(attribute.default_label())],
    }
  }

  fn lookup(&self, sheet: &ScoreSheet, literal: &str, candidates: &[String]) -> Option<f64> {
    let flat = sheet.is_flat();
    if flat {
      if let Some(v) = sheet.literal(literal) {
        return Some(v);
      }
    }

    if let Some((e, v)) = sheet
      .numeric()
      .find(|(e, _)| candidates.contains(&e.normalized))
    {
      tracing::debug!(requested = literal, matched = %e.key, "resolved by normalized key");
      return Some(v);
    }

    if !flat {
      return None;
    }

    let min = self.lookup.fuzzy_min_len;
    let (e, v) = sheet.numeric().find(|(e, _)| {
      e.normalized.len() >= min
        && candidates.iter().any(|c| {
          c.len() >= min && (e.normalized.contains(c.as_str()) || c.contains(e.normalized.as_str()))
        })
    })?;
    tracing::debug!(requested = literal, matched = %e.key, "resolved by substring match");
    Some(v)
  }
}

/// Normalized label + synonyms, deduplicated, empty forms dropped.
pub fn candidate_keys(set: &SynonymSet) -> Vec<String> {
  let mut keys: Vec<String> = Vec::with_capacity(set.synonyms.len() + 1);
  for raw in std::iter::once(&set.label).chain(set.synonyms.iter()) {
    let key = normalize_key(raw);
    if !key.is_empty() && !keys.contains(&key) {
      keys.push(key);
    }
  }
  keys
}

/// Single entry point for untyped callers: score for `name` in a raw JSON container.
pub fn get_score(name: &str, container: &Value, config: &EngineConfig) -> Option<f64> {
  let sheet = ScoreSheet::from_value(container);
  Resolver::from_config(config).by_name(&sheet, name)
}
