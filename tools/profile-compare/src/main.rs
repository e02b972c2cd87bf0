//! profile-compare: candidate vs job benchmark gap table
//!
//! Usage:
//!   profile-compare <candidate.json> <benchmark.json>       # print the comparison table
//!   profile-compare <candidate.json> <benchmark.json> -q    # quiet: exit 0 if no critical gap, 1 otherwise
//!   profile-compare <candidate.json> <benchmark.json> --json
//!
//! The candidate file carries `scores`, `values` and `disc`; the benchmark file carries
//! `attributes`, `values` and `disc`. Set FIT_ENGINE_CONFIG to score with a custom config.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use fit_engine::types::{Comparison, ComparisonItem, Domain, GapStatus, ScientificRisk};
use fit_engine::{Engine, EngineConfig, EvaluationRequest};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "profile-compare", about = "Candidate vs job benchmark gap table")]
struct Args {
    /// Candidate profile JSON
    candidate: PathBuf,
    /// Job benchmark JSON
    benchmark: PathBuf,
    /// Only the exit code (0 = no critical gap, 1 = critical gap)
    #[arg(short, long)]
    quiet: bool,
    /// Print the full evaluation summary as JSON
    #[arg(long, conflicts_with = "quiet")]
    json: bool,
}

#[derive(serde::Deserialize, Default)]
struct CandidateFile {
    #[serde(default)]
    scores: Value,
    #[serde(default)]
    values: Value,
    #[serde(default)]
    disc: Value,
}

fn load_json(path: &Path) -> Value {
    let contents = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("profile-compare: cannot read {}: {}", path.display(), e);
        process::exit(2);
    });
    serde_json::from_str(&contents).unwrap_or_else(|e| {
        eprintln!("profile-compare: invalid JSON in {}: {}", path.display(), e);
        process::exit(2);
    })
}

fn build_request(candidate: Value, benchmark: Value) -> EvaluationRequest {
    let file: CandidateFile = serde_json::from_value(candidate).unwrap_or_default();
    EvaluationRequest {
        scores: file.scores,
        values: file.values,
        disc: file.disc,
        benchmark,
        ..Default::default()
    }
}

fn has_critical(comparison: &Comparison) -> bool {
    comparison
        .items
        .iter()
        .any(|i| i.status == GapStatus::Critical)
}

fn marker(status: GapStatus) -> char {
    match status {
        GapStatus::Critical => '!',
        GapStatus::Moderate => '~',
        GapStatus::Aligned => ' ',
    }
}

fn domain_name(domain: Domain) -> &'static str {
    match domain {
        Domain::Attribute => "attribute",
        Domain::Value => "value",
        Domain::Disc => "disc",
    }
}

fn format_item(item: &ComparisonItem) -> String {
    format!(
        "{} {:<26} {:<9} {:>7.1} {:>7.1} {:>+7.1}",
        marker(item.status),
        item.label,
        domain_name(item.domain),
        item.candidate_score,
        item.benchmark_score,
        item.delta
    )
}

fn main() {
    let args = Args::parse();

    let engine = Engine::new(EngineConfig::from_env());
    let request = build_request(load_json(&args.candidate), load_json(&args.benchmark));
    let summary = engine.evaluate(&request).unwrap_or_else(|e| {
        eprintln!("profile-compare: {}", e);
        process::exit(2);
    });

    let critical = has_critical(&summary.comparison);
    if args.quiet {
        process::exit(if critical { 1 } else { 0 });
    }

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("profile-compare: {}", e);
                process::exit(2);
            }
        }
        process::exit(if critical { 1 } else { 0 });
    }

    let comparison = &summary.comparison;
    if comparison.items.is_empty() {
        println!("No comparable items.");
    } else {
        println!(
            "  {:<26} {:<9} {:>7} {:>7} {:>7}",
            "label", "domain", "cand", "bench", "delta"
        );
        for item in &comparison.items {
            println!("{}", format_item(item));
        }
    }

    match comparison.fit_score {
        Some(fit) => println!("fit: {:.1}", fit),
        None => println!("fit: n/a"),
    }
    match &summary.scientific_risk {
        ScientificRisk::Assessed(risk) => {
            println!("mismatch risk: {}", risk.score);
            if !risk.critical_gaps.is_empty() {
                println!("critical gaps: {}", risk.critical_gaps.join(", "));
            }
        }
        ScientificRisk::InsufficientData => println!("mismatch risk: insufficient data"),
    }

    process::exit(if critical { 1 } else { 0 });
}
