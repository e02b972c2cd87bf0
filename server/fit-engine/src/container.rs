//! Raw score container ingestion.
//!
//! Assessment data arrives either as a flat `key -> number` map or as a list of
//! `{component|attribute|name, score}` items. Both shapes are converted once into a
//! `ScoreSheet` so lookups never sniff the JSON shape again.

use serde_json::{Map, Value};

use crate::config::QualitativeAnchors;
use crate::keys::normalize_key;

const ITEM_KEY_FIELDS: [&str; 3] = ["component", "attribute", "name"];
const NESTED_VALUE_FIELDS: [&str; 2] = ["score", "value"];

/// The two raw shapes accepted at the ingestion boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum ScoreContainer {
  Flat(Map<String, Value>),
  Itemized(Vec<Value>),
}

impl ScoreContainer {
  /// Objects become `Flat`, arrays `Itemized`; anything else is treated as absent.
  pub fn from_value(value: &Value) -> Option<Self> {
    match value {
      Value::Object(map) => Some(Self::Flat(map.clone())),
      Value::Array(items) => Some(Self::Itemized(items.clone())),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContainerShape {
  #[default]
  Absent,
  Flat,
  Itemized,
}

/// One raw key with its normalized form. `value` is `None` when the raw value was not numeric;
/// such entries never match a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
  pub key: String,
  pub normalized: String,
  pub value: Option<f64>,
}

/// Canonical internal form of one raw container, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreSheet {
  shape: ContainerShape,
  entries: Vec<ScoreEntry>,
}

impl ScoreSheet {
  pub fn from_value(value: &Value) -> Self {
    ScoreContainer::from_value(value)
      .map(|c| Self::ingest(c, None))
      .unwrap_or_default()
  }

  /// Like `from_value`, but qualitative strings (`alto`/`medio`/`baixo`) map to numeric anchors.
  pub fn from_value_with_anchors(value: &Value, anchors: &QualitativeAnchors) -> Self {
    ScoreContainer::from_value(value)
      .map(|c| Self::ingest(c, Some(anchors)))
      .unwrap_or_default()
  }

  fn ingest(container: ScoreContainer, anchors: Option<&QualitativeAnchors>) -> Self {
    match container {
      ScoreContainer::Flat(map) => Self {
        shape: ContainerShape::Flat,
        entries: map
          .iter()
          .map(|(key, raw)| ScoreEntry {
            key: key.clone(),
            normalized: normalize_key(key),
            value: flat_value(raw, anchors),
          })
          .collect(),
      },
      ScoreContainer::Itemized(items) => Self {
        shape: ContainerShape::Itemized,
        entries: items
          .iter()
          .filter_map(|item| {
            let obj = item.as_object()?;
            let key = ITEM_KEY_FIELDS
              .iter()
              .find_map(|f| obj.get(*f).and_then(Value::as_str))?;
            Some(ScoreEntry {
              key: key.to_string(),
              normalized: normalize_key(key),
              value: obj.get("score").and_then(|v| scalar(v, anchors)),
            })
          })
          .collect(),
      },
    }
  }

  pub fn shape(&self) -> ContainerShape {
    self.shape
  }

  /// The literal fast path and the substring fallback only apply to flat maps.
  pub fn is_flat(&self) -> bool {
    self.shape == ContainerShape::Flat
  }

  /// Entries carrying a numeric value, in document order.
  pub fn numeric(&self) -> impl Iterator<Item = (&ScoreEntry, f64)> {
    self.entries.iter().filter_map(|e| e.value.map(|v| (e, v)))
  }

  /// Numeric value stored under exactly `key` (no normalization).
  pub fn literal(&self, key: &str) -> Option<f64> {
    self.numeric().find(|(e, _)| e.key == key).map(|(_, v)| v)
  }

  /// True when no entry carries a numeric value.
  pub fn is_empty(&self) -> bool {
    self.numeric().next().is_none()
  }
}

/// Flat map value: a number, or an object wrapping one under `score` / `value`.
fn flat_value(raw: &Value, anchors: Option<&QualitativeAnchors>) -> Option<f64> {
  match raw {
    Value::Object(obj) => NESTED_VALUE_FIELDS
      .iter()
      .find_map(|f| obj.get(*f).and_then(|v| scalar(v, anchors))),
    other => scalar(other, anchors),
  }
}

fn scalar(raw: &Value, anchors: Option<&QualitativeAnchors>) -> Option<f64> {
  match raw {
    Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
    Value::String(s) => anchors.and_then(|a| qualitative(s, a)),
    _ => None,
  }
}

fn qualitative(s: &str, anchors: &QualitativeAnchors) -> Option<f64> {
  match normalize_key(s).as_str() {
    "alto" | "alta" | "high" => Some(anchors.high),
    "medio" | "media" | "medium" => Some(anchors.medium),
    "baixo" | "baixa" | "low" => Some(anchors.low),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn flat_map_keeps_document_order_and_non_numeric_keys() {
    let sheet = ScoreSheet::from_value(&json!({ "Empatia": 7.3, "notes": "n/a", "DISC D": 55 }));
    assert_eq!(sheet.shape(), ContainerShape::Flat);
    let keys: Vec<&str> = sheet.numeric().map(|(e, _)| e.key.as_str()).collect();
    assert_eq!(keys, vec!["Empatia", "DISC D"]);
    assert!(sheet.is_flat());
    assert_eq!(sheet.literal("Empatia"), Some(7.3));
    assert_eq!(sheet.literal("notes"), None);
  }

  #[test]
  fn nested_score_objects_are_unwrapped() {
    let sheet = ScoreSheet::from_value(&json!({
      "Autoestima": { "score": 6.5, "percentile": 40 },
      "Empatia": { "value": 4.0 },
      "Autodireção": { "label": "alto" }
    }));
    assert_eq!(sheet.literal("Autoestima"), Some(6.5));
    assert_eq!(sheet.literal("Empatia"), Some(4.0));
    assert_eq!(sheet.literal("Autodireção"), None);
  }

  #[test]
  fn itemized_reads_component_attribute_or_name() {
    let sheet = ScoreSheet::from_value(&json!([
      { "component": "Pensamento Prático", "score": 8.1 },
      { "attribute": "Empatia", "score": 5 },
      { "name": "Autoestima", "score": "high" },
      { "score": 3.0 },
      42
    ]));
    assert_eq!(sheet.shape(), ContainerShape::Itemized);
    assert_eq!(sheet.numeric().count(), 2);
    assert_eq!(sheet.literal("Pensamento Prático"), Some(8.1));
    assert_eq!(sheet.literal("Empatia"), Some(5.0));
    assert_eq!(sheet.literal("Autoestima"), None);
    assert!(!sheet.is_flat());
  }

  #[test]
  fn malformed_containers_are_absent() {
    for raw in [json!(null), json!("scores"), json!(12), json!(true)] {
      let sheet = ScoreSheet::from_value(&raw);
      assert_eq!(sheet.shape(), ContainerShape::Absent);
      assert!(sheet.is_empty());
    }
  }

  #[test]
  fn qualitative_strings_need_anchors() {
    let raw = json!({ "Teórico": "Alto", "Econômico": "médio", "Político": "baixo", "Estético": 62 });
    let plain = ScoreSheet::from_value(&raw);
    assert_eq!(plain.numeric().count(), 1);

    let anchored = ScoreSheet::from_value_with_anchors(&raw, &QualitativeAnchors::default());
    assert_eq!(anchored.literal("Teórico"), Some(85.0));
    assert_eq!(anchored.literal("Econômico"), Some(50.0));
    assert_eq!(anchored.literal("Político"), Some(15.0));
    assert_eq!(anchored.literal("Estético"), Some(62.0));
  }
}
