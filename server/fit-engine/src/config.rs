//! Engine configuration with the production defaults.
//!
//! Every taxonomy entry, survey dimension, weight and threshold the scoring
//! functions use lives here. A partial TOML file overrides only what it names.

use serde::Deserialize;
use std::path::Path;

use crate::error::EngineError;
use crate::types::Attribute;

/// Environment variable naming a TOML config file.
pub const CONFIG_ENV: &str = "FIT_ENGINE_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  pub taxonomy: Taxonomy,
  pub lookup: LookupConfig,
  pub risk_model: RiskModelConfig,
  pub combined: CombinedRiskConfig,
  pub flags: FlagConfig,
  pub comparison: ComparisonConfig,
  pub narrative: NarrativeConfig,
}

impl EngineConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, EngineError> {
    let config: Self = toml::from_str(s)?;
    config.validate()?;
    Ok(config)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    Self::from_toml_str(&contents)
  }

  /// Config named by `FIT_ENGINE_CONFIG`, or the defaults when unset.
  /// An unreadable or invalid file is logged and replaced by the defaults.
  pub fn from_env() -> Self {
    match std::env::var(CONFIG_ENV) {
      Ok(path) if !path.trim().is_empty() => match Self::load(&path) {
        Ok(config) => {
          tracing::info!(path = %path, "engine config loaded");
          config
        }
        Err(e) => {
          tracing::warn!(path = %path, error = %e, "engine config rejected, using defaults");
          Self::default()
        }
      },
      _ => Self::default(),
    }
  }

  /// Reject settings the scoring functions cannot interpret.
  pub fn validate(&self) -> Result<(), EngineError> {
    let rm = &self.risk_model;
    if !(rm.decay > 0.0) {
      return Err(EngineError::validation("risk_model.decay", "must be > 0"));
    }
    if !(rm.fit_divisor > 0.0) {
      return Err(EngineError::validation("risk_model.fit_divisor", "must be > 0"));
    }
    if rm.moderate_threshold > rm.critical_threshold {
      return Err(EngineError::validation(
        "risk_model.moderate_threshold",
        "must not exceed critical_threshold",
      ));
    }

    let c = &self.combined;
    if !(c.likert_max > 0.0) {
      return Err(EngineError::validation("combined.likert_max", "must be > 0"));
    }
    if c.likert_min >= c.likert_max {
      return Err(EngineError::validation("combined.likert_min", "must be < likert_max"));
    }
    if !(c.attribute_scale_max > 0.0) {
      return Err(EngineError::validation(
        "combined.attribute_scale_max",
        "must be > 0",
      ));
    }
    let l = &c.levels;
    if !(l.moderate <= l.high && l.high <= l.critical) {
      return Err(EngineError::validation(
        "combined.levels",
        "expected moderate <= high <= critical",
      ));
    }

    for (field, d) in [
      ("comparison.attribute", &self.comparison.attribute),
      ("comparison.value", &self.comparison.value),
      ("comparison.disc", &self.comparison.disc),
    ] {
      if !(d.scale_max > 0.0) {
        return Err(EngineError::validation(field, "scale_max must be > 0"));
      }
      if d.moderate > d.critical {
        return Err(EngineError::validation(field, "moderate must not exceed critical"));
      }
    }
    Ok(())
  }
}

// ---------------------------------------------------------------------------
// Taxonomy
// ---------------------------------------------------------------------------

/// Display label + known alternate spellings for one dimension.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SynonymSet {
  pub label: String,
  #[serde(default)]
  pub synonyms: Vec<String>,
}

impl SynonymSet {
  pub fn new(label: &str, synonyms: &[&str]) -> Self {
    Self {
      label: label.to_string(),
      synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttributeSynonyms {
  pub attribute: Attribute,
  #[serde(flatten)]
  pub set: SynonymSet,
}

/// Numeric anchors for qualitative motivational-value benchmarks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct QualitativeAnchors {
  pub high: f64,
  pub medium: f64,
  pub low: f64,
}

impl Default for QualitativeAnchors {
  fn default() -> Self {
    Self {
      high: 85.0,
      medium: 50.0,
      low: 15.0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Taxonomy {
  pub attributes: Vec<AttributeSynonyms>,
  pub disc: Vec<SynonymSet>,
  pub value_anchors: QualitativeAnchors,
}

impl Taxonomy {
  pub fn synonyms(&self, attribute: Attribute) -> Option<&SynonymSet> {
    self
      .attributes
      .iter()
      .find(|a| a.attribute == attribute)
      .map(|a| &a.set)
  }

  pub fn label(&self, attribute: Attribute) -> &str {
    self
      .synonyms(attribute)
      .map(|s| s.label.as_str())
      .unwrap_or_else(|| attribute.default_label())
  }
}

impl Default for Taxonomy {
  fn default() -> Self {
    let attr = |attribute: Attribute, synonyms: &[&str]| AttributeSynonyms {
      attribute,
      set: SynonymSet::new(attribute.default_label(), synonyms),
    };
    Self {
      attributes: vec![
        attr(
          Attribute::Empathy,
          &["Empathy", "empatia", "Compreensão dos Outros", "Understanding Others", "EMP"],
        ),
        attr(
          Attribute::PracticalThinking,
          &[
            "Practical Thinking",
            "Practical_Thinking",
            "Pensamento_Pratico",
            "Pensamento Pratico",
            "Raciocínio Prático",
            "PT",
          ],
        ),
        attr(
          Attribute::SystemsJudgment,
          &[
            "Systems Judgment",
            "Systems Judgement",
            "Systems_Judgment",
            "Julgamento de Sistemas",
            "Julgamento Sistemico",
            "Pensamento Sistêmico",
            "JS",
          ],
        ),
        attr(
          Attribute::SelfEsteem,
          &["Self-Esteem", "Self Esteem", "Self_Esteem", "Auto-Estima", "Auto Estima", "AE", "SE"],
        ),
        attr(
          Attribute::FunctionalAwareness,
          &[
            "Functional Awareness",
            "Role Awareness",
            "Consciencia_Funcional",
            "Consciência de Papel",
            "Consciência do Papel",
            "CF",
          ],
        ),
        attr(
          Attribute::SelfDirection,
          &[
            "Self-Direction",
            "Self Direction",
            "Self_Direction",
            "Auto-Direção",
            "Auto Direção",
            "Autodirecionamento",
            "AD",
            "SD",
          ],
        ),
      ],
      disc: vec![
        SynonymSet::new("Dominância", &["D", "Dominance", "Dominancia"]),
        SynonymSet::new("Influência", &["I", "Influence", "Influencia"]),
        SynonymSet::new("Estabilidade", &["S", "Steadiness", "Stability"]),
        SynonymSet::new("Conformidade", &["C", "Compliance", "Conscientiousness"]),
      ],
      value_anchors: QualitativeAnchors::default(),
    }
  }
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
  /// Normalized keys shorter than this never take part in substring matching, on either side.
  /// Stricter than plain bidirectional containment: with the default of 3 a key like `em` no
  /// longer matches Empatia, and two-letter abbreviations only resolve exactly.
  pub fuzzy_min_len: usize,
}

impl Default for LookupConfig {
  fn default() -> Self {
    Self { fuzzy_min_len: 3 }
  }
}

// ---------------------------------------------------------------------------
// Non-compensatory risk model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RiskModelConfig {
  /// Fit assumed when the caller has none.
  pub baseline_fit: f64,
  /// Baseline modulator: (100 - fit) / fit_divisor.
  pub fit_divisor: f64,
  /// Benchmark ideal assumed for an attribute the benchmark lacks.
  pub default_ideal: f64,
  /// Candidate value assumed for an attribute the report lacks.
  pub default_real: f64,
  /// Attributes treated as non-negotiable for job performance.
  pub axial: Vec<Attribute>,
  pub axial_weight: f64,
  pub standard_weight: f64,
  /// Normalized gap at or above which the attribute is reported as critical.
  pub critical_gap_ratio: f64,
  /// k in 1 - e^(-k·S).
  pub decay: f64,
  pub critical_threshold: u8,
  pub moderate_threshold: u8,
}

impl Default for RiskModelConfig {
  fn default() -> Self {
    Self {
      baseline_fit: 70.0,
      fit_divisor: 50.0,
      default_ideal: 5.0,
      default_real: 0.0,
      axial: vec![
        Attribute::PracticalThinking,
        Attribute::SelfDirection,
        Attribute::FunctionalAwareness,
      ],
      axial_weight: 3.0,
      standard_weight: 2.0,
      critical_gap_ratio: 0.40,
      decay: 0.35,
      critical_threshold: 60,
      moderate_threshold: 30,
    }
  }
}

// ---------------------------------------------------------------------------
// Combined occupational risk index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SurveyDimension {
  pub id: String,
  pub questions: usize,
}

impl SurveyDimension {
  fn new(id: &str, questions: usize) -> Self {
    Self {
      id: id.to_string(),
      questions,
    }
  }

  /// Answer keys in question order: `"{id}-0"`, `"{id}-1"`, ...
  pub fn keys(&self) -> impl Iterator<Item = String> + '_ {
    (0..self.questions).map(move |q| format!("{}-{}", self.id, q))
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OccupationalLevels {
  pub critical: f64,
  pub high: f64,
  pub moderate: f64,
}

impl Default for OccupationalLevels {
  fn default() -> Self {
    Self {
      critical: 60.0,
      high: 40.0,
      moderate: 20.0,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombinedRiskConfig {
  pub survey: Vec<SurveyDimension>,
  pub likert_min: f64,
  pub likert_max: f64,
  /// Upper bound of the behavioral inventory scale.
  pub attribute_scale_max: f64,
  pub nr1_source: String,
  pub psa_source: String,
  pub levels: OccupationalLevels,
}

impl Default for CombinedRiskConfig {
  fn default() -> Self {
    Self {
      survey: vec![
        SurveyDimension::new("demandas", 6),
        SurveyDimension::new("controle", 5),
        SurveyDimension::new("apoio", 5),
        SurveyDimension::new("relacionamentos", 4),
        SurveyDimension::new("reconhecimento", 4),
      ],
      likert_min: 1.0,
      likert_max: 5.0,
      attribute_scale_max: 10.0,
      nr1_source: "NR-1 (Innermetrix)".into(),
      psa_source: "PSA (Pesquisa Psicossocial)".into(),
      levels: OccupationalLevels::default(),
    }
  }
}

// ---------------------------------------------------------------------------
// Psychosocial flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparator {
  Above,
  Below,
}

/// `attribute` strictly above / below `threshold`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Condition {
  pub attribute: Attribute,
  pub op: Comparator,
  pub threshold: f64,
}

impl Condition {
  fn above(attribute: Attribute, threshold: f64) -> Self {
    Self {
      attribute,
      op: Comparator::Above,
      threshold,
    }
  }

  fn below(attribute: Attribute, threshold: f64) -> Self {
    Self {
      attribute,
      op: Comparator::Below,
      threshold,
    }
  }

  pub fn holds(&self, value: f64) -> bool {
    match self.op {
      Comparator::Above => value > self.threshold,
      Comparator::Below => value < self.threshold,
    }
  }
}

/// A flag fires when every condition holds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlagRule {
  pub flag: crate::types::RiskFlag,
  pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FlagConfig {
  pub rules: Vec<FlagRule>,
  /// Flag count at which the overall level becomes Alto.
  pub high_count: usize,
  /// Flags that force Alto on their own.
  pub escalating: Vec<crate::types::RiskFlag>,
}

impl Default for FlagConfig {
  fn default() -> Self {
    use crate::types::RiskFlag;
    use Attribute::*;
    Self {
      rules: vec![
        FlagRule {
          flag: RiskFlag::Burnout,
          conditions: vec![
            Condition::above(FunctionalAwareness, 8.0),
            Condition::below(SelfEsteem, 4.0),
            Condition::below(PracticalThinking, 4.5),
          ],
        },
        FlagRule {
          flag: RiskFlag::AssedioVitima,
          conditions: vec![
            Condition::below(SelfEsteem, 4.0),
            Condition::below(SelfDirection, 4.0),
          ],
        },
        FlagRule {
          flag: RiskFlag::AssedioAgressor,
          conditions: vec![
            Condition::above(SelfDirection, 8.0),
            Condition::below(Empathy, 3.5),
          ],
        },
        FlagRule {
          flag: RiskFlag::Procrastinacao,
          conditions: vec![
            Condition::below(PracticalThinking, 4.0),
            Condition::above(SystemsJudgment, 8.0),
          ],
        },
        FlagRule {
          flag: RiskFlag::DecisaoImpulsiva,
          conditions: vec![
            Condition::below(SystemsJudgment, 3.5),
            Condition::above(PracticalThinking, 8.0),
          ],
        },
        FlagRule {
          flag: RiskFlag::Conflito,
          conditions: vec![
            Condition::below(Empathy, 4.0),
            Condition::above(SelfDirection, 7.5),
          ],
        },
      ],
      high_count: 3,
      escalating: vec![RiskFlag::Burnout],
    }
  }
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainThresholds {
  pub scale_max: f64,
  pub moderate: f64,
  pub critical: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
  pub attribute: DomainThresholds,
  pub value: DomainThresholds,
  pub disc: DomainThresholds,
}

impl Default for ComparisonConfig {
  fn default() -> Self {
    Self {
      attribute: DomainThresholds {
        scale_max: 10.0,
        moderate: 1.0,
        critical: 2.0,
      },
      value: DomainThresholds {
        scale_max: 100.0,
        moderate: 15.0,
        critical: 30.0,
      },
      disc: DomainThresholds {
        scale_max: 100.0,
        moderate: 15.0,
        critical: 30.0,
      },
    }
  }
}

// ---------------------------------------------------------------------------
// Narrative consistency
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
  pub high_fit: f64,
  pub low_fit: f64,
  pub risk_terms: Vec<String>,
  pub praise_terms: Vec<String>,
}

impl Default for NarrativeConfig {
  fn default() -> Self {
    let owned = |terms: &[&str]| terms.iter().map(|t| t.to_string()).collect();
    Self {
      high_fit: 75.0,
      low_fit: 40.0,
      risk_terms: owned(&[
        "alto risco",
        "risco elevado",
        "risco crítico",
        "incompatível",
        "inadequado",
        "high risk",
        "critical risk",
        "poor fit",
      ]),
      praise_terms: owned(&[
        "excelente",
        "perfeitamente alinhado",
        "altamente compatível",
        "perfil ideal",
        "excellent fit",
        "perfect fit",
        "ideal candidate",
      ]),
    }
  }
}
