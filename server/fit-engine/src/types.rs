//! Core types for the fit engine (JSON contracts + internal models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::container::ScoreSheet;

// ---------------------------------------------------------------------------
// Canonical attributes (Attribute Index axes)
// ---------------------------------------------------------------------------

/// One of the six fixed behavioral dimensions, scored 0–10.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
  Empathy,
  PracticalThinking,
  SystemsJudgment,
  SelfEsteem,
  FunctionalAwareness,
  SelfDirection,
}

impl Attribute {
  pub const ALL: [Attribute; 6] = [
    Attribute::Empathy,
    Attribute::PracticalThinking,
    Attribute::SystemsJudgment,
    Attribute::SelfEsteem,
    Attribute::FunctionalAwareness,
    Attribute::SelfDirection,
  ];

  pub fn index(self) -> usize {
    self as usize
  }

  /// Label used when the taxonomy does not override it.
  pub fn default_label(self) -> &'static str {
    match self {
      Self::Empathy => "Empatia",
      Self::PracticalThinking => "Pensamento Prático",
      Self::SystemsJudgment => "Julgamento Sistêmico",
      Self::SelfEsteem => "Autoestima",
      Self::FunctionalAwareness => "Consciência Funcional",
      Self::SelfDirection => "Autodireção",
    }
  }
}

/// Resolved value per canonical attribute; `None` means not found in the source.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AttributeScores([Option<f64>; 6]);

impl AttributeScores {
  pub fn get(&self, attribute: Attribute) -> Option<f64> {
    self.0[attribute.index()]
  }

  pub fn set(&mut self, attribute: Attribute, value: f64) {
    self.0[attribute.index()] = Some(value);
  }

  /// Value with the caller's default applied to missing attributes.
  pub fn get_or(&self, attribute: Attribute, default: f64) -> f64 {
    self.get(attribute).unwrap_or(default)
  }

  pub fn found(&self) -> usize {
    self.0.iter().filter(|v| v.is_some()).count()
  }

  pub fn is_empty(&self) -> bool {
    self.found() == 0
  }

  /// Mean over found attributes only.
  pub fn mean(&self) -> Option<f64> {
    let found: Vec<f64> = self.0.iter().flatten().copied().collect();
    if found.is_empty() {
      None
    } else {
      Some(found.iter().sum::<f64>() / found.len() as f64)
    }
  }

  /// Same value on every axis.
  pub fn uniform(value: f64) -> Self {
    Self([Some(value); 6])
  }
}

impl FromIterator<(Attribute, f64)> for AttributeScores {
  fn from_iter<I: IntoIterator<Item = (Attribute, f64)>>(iter: I) -> Self {
    let mut scores = Self::default();
    for (attribute, value) in iter {
      scores.set(attribute, value);
    }
    scores
  }
}

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: what the caller sends)
// ---------------------------------------------------------------------------

/// One evaluation request. Score containers stay untyped JSON so that
/// malformed shapes degrade to "not found" instead of failing the request.
/// Unknown fields are silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationRequest {
  #[serde(default)]
  pub report_id: Option<String>,
  #[serde(default)]
  pub assessed_at: Option<String>,
  /// Attribute scores; may also carry PSA answers keyed `"{dimension}-{question}"`.
  #[serde(default)]
  pub scores: Value,
  /// Dedicated PSA answers container; when present it replaces `scores` as the survey source.
  #[serde(default)]
  pub survey: Value,
  #[serde(default)]
  pub values: Value,
  #[serde(default)]
  pub disc: Value,
  /// `{ "attributes": .., "values": .., "disc": .. }` for the job role.
  #[serde(default)]
  pub benchmark: Value,
  #[serde(default)]
  pub average_fit: Option<f64>,
  /// Generated narrative to post-check against the comparison.
  #[serde(default)]
  pub narrative: Option<String>,
}

// ---------------------------------------------------------------------------
// Internal normalized types
// ---------------------------------------------------------------------------

/// Benchmark containers for one job role.
#[derive(Debug, Clone, Default)]
pub struct BenchmarkSheets {
  pub attributes: ScoreSheet,
  pub values: ScoreSheet,
  pub disc: ScoreSheet,
}

impl BenchmarkSheets {
  pub fn is_empty(&self) -> bool {
    self.attributes.is_empty() && self.values.is_empty() && self.disc.is_empty()
  }
}

/// Canonical evaluation input after validation + ingestion.
#[derive(Debug, Clone)]
pub struct Evaluation {
  pub report_id: Option<String>,
  pub assessed_at: Option<DateTime<Utc>>,
  pub scores: ScoreSheet,
  pub survey: ScoreSheet,
  pub values: ScoreSheet,
  pub disc: ScoreSheet,
  pub benchmark: BenchmarkSheets,
  pub average_fit: Option<f64>,
  pub narrative: Option<String>,
}

// ---------------------------------------------------------------------------
// Non-compensatory risk model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLabel {
  #[serde(rename = "BAIXO")]
  Baixo,
  #[serde(rename = "MODERADO")]
  Moderado,
  #[serde(rename = "CRÍTICO")]
  Critico,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MismatchRisk {
  /// 0–100, increasing with danger.
  pub score: u8,
  pub label: RiskLabel,
  /// Labels of attributes whose normalized gap reached the critical ratio.
  pub critical_gaps: Vec<String>,
  /// Raw accumulator before the exponential transform.
  pub accumulator: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScientificRisk {
  Assessed(MismatchRisk),
  InsufficientData,
}

impl ScientificRisk {
  /// Score, or 0 when nothing contributed. Check `is_insufficient` first.
  pub fn score(&self) -> u8 {
    match self {
      Self::Assessed(r) => r.score,
      Self::InsufficientData => 0,
    }
  }

  pub fn critical_gaps(&self) -> &[String] {
    match self {
      Self::Assessed(r) => &r.critical_gaps,
      Self::InsufficientData => &[],
    }
  }

  pub fn is_insufficient(&self) -> bool {
    matches!(self, Self::InsufficientData)
  }
}

// ---------------------------------------------------------------------------
// Combined occupational risk index
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OccupationalRiskLevel {
  Baixo,
  Moderado,
  Alto,
  #[serde(rename = "Crítico")]
  Critico,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDetails {
  pub psa_risk: Option<f64>,
  pub nr1_risk: Option<f64>,
  pub sources_used: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupationalRisk {
  pub risk_percentage: u8,
  pub level: OccupationalRiskLevel,
  pub details: RiskDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CombinedRisk {
  Assessed(OccupationalRisk),
  InsufficientData,
}

impl CombinedRisk {
  /// Percentage, or 0 when neither instrument contributed. Check `is_insufficient` first.
  pub fn risk_percentage(&self) -> u8 {
    match self {
      Self::Assessed(r) => r.risk_percentage,
      Self::InsufficientData => 0,
    }
  }

  pub fn level(&self) -> Option<OccupationalRiskLevel> {
    match self {
      Self::Assessed(r) => Some(r.level),
      Self::InsufficientData => None,
    }
  }

  pub fn sources_used(&self) -> &[String] {
    match self {
      Self::Assessed(r) => &r.details.sources_used,
      Self::InsufficientData => &[],
    }
  }

  pub fn is_insufficient(&self) -> bool {
    matches!(self, Self::InsufficientData)
  }
}

// ---------------------------------------------------------------------------
// Psychosocial flags
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFlag {
  Burnout,
  #[serde(rename = "Assedio_Vitima")]
  AssedioVitima,
  #[serde(rename = "Assedio_Agressor")]
  AssedioAgressor,
  Procrastinacao,
  #[serde(rename = "Decisao_Impulsiva")]
  DecisaoImpulsiva,
  Conflito,
}

impl RiskFlag {
  pub fn describe(self) -> &'static str {
    match self {
      Self::Burnout => "High role responsibility with low self-regard and low execution capacity",
      Self::AssedioVitima => "Low self-esteem with low self-direction: exposure to harassment",
      Self::AssedioAgressor => "Strong self-direction with very low empathy: risk of harassing others",
      Self::Procrastinacao => "Strong systems judgment with weak practical execution",
      Self::DecisaoImpulsiva => "Strong practical drive with weak systems judgment",
      Self::Conflito => "Low empathy combined with strong self-direction",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FlagRiskLevel {
  Baixo,
  Moderado,
  Alto,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlagReport {
  pub risk_level: FlagRiskLevel,
  pub detected_risks: Vec<RiskFlag>,
  pub explanations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PsychosocialScreen {
  Assessed(FlagReport),
  InsufficientData,
}

impl PsychosocialScreen {
  pub fn detected_risks(&self) -> &[RiskFlag] {
    match self {
      Self::Assessed(r) => &r.detected_risks,
      Self::InsufficientData => &[],
    }
  }

  pub fn risk_level(&self) -> Option<FlagRiskLevel> {
    match self {
      Self::Assessed(r) => Some(r.risk_level),
      Self::InsufficientData => None,
    }
  }
}

// ---------------------------------------------------------------------------
// Comparison / gap builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
  Attribute,
  Value,
  Disc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapStatus {
  Aligned,
  Moderate,
  Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonItem {
  pub label: String,
  pub domain: Domain,
  pub candidate_score: f64,
  pub benchmark_score: f64,
  /// candidate − benchmark
  pub delta: f64,
  pub status: GapStatus,
  /// Per-item contribution, 0–100.
  pub fit: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitBasis {
  Benchmark,
  AttributesOnly,
  InsufficientData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
  pub items: Vec<ComparisonItem>,
  pub fit_score: Option<f64>,
  pub fit_basis: FitBasis,
}

/// Structured context handed to the external narrative generator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeContext {
  pub fit_score: Option<f64>,
  pub critical_gaps: Vec<String>,
  pub moderate_gaps: Vec<String>,
  pub items: Vec<ComparisonItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NarrativeIssue {
  UnsupportedRisk { term: String },
  UnsupportedStrength { term: String },
  OmittedCriticalGap { label: String },
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAttribute {
  pub attribute: Attribute,
  pub label: String,
  pub score: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary {
  pub evaluation_id: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub report_id: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub assessed_at: Option<String>,
  pub attributes: Vec<ResolvedAttribute>,
  pub comparison: Comparison,
  pub scientific_risk: ScientificRisk,
  pub combined_risk: CombinedRisk,
  pub psychosocial: PsychosocialScreen,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub narrative_issues: Option<Vec<NarrativeIssue>>,
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for invalid input lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub field: Option<String>,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
      field: None,
    }
  }

  pub fn with_field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }
}

impl From<&crate::error::EngineError> for ErrorOutput {
  fn from(err: &crate::error::EngineError) -> Self {
    match err {
      crate::error::EngineError::Validation { field, reason } => {
        ErrorOutput::new(reason.clone()).with_field(field.clone())
      }
      other => ErrorOutput::new(other.to_string()),
    }
  }
}
