//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an EvaluationRequest. Each output line is either:
//! - An EvaluationSummary
//! - An ErrorOutput (when the line is not JSON or the envelope is invalid)

use fit_engine::types::ErrorOutput;
use fit_engine::{telemetry, Engine, EngineConfig, EngineError, EvaluationRequest};
use std::io::{self, BufRead, Write};

fn main() {
  if let Err(e) = telemetry::init(telemetry::DEFAULT_FILTER) {
    let _ = writeln!(io::stderr(), "fit-engine: {}", e);
  }

  let engine = Engine::new(EngineConfig::from_env());
  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());

  for line in stdin.lock().lines() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        tracing::error!(error = %e, "stdin read failed");
        let _ = out.flush();
        std::process::exit(1);
      }
    };

    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    let raw: EvaluationRequest = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        emit(&mut out, &ErrorOutput::from(&EngineError::from(e)));
        continue;
      }
    };

    match engine.evaluate(&raw) {
      Ok(summary) => emit(&mut out, &summary),
      Err(e) => {
        tracing::warn!(error = %e, "evaluation rejected");
        emit(&mut out, &ErrorOutput::from(&e));
      }
    }
  }

  let _ = out.flush();
}

fn emit<W: Write, T: serde::Serialize>(out: &mut W, value: &T) {
  let _ = serde_json::to_writer(&mut *out, value);
  let _ = writeln!(out);
}
