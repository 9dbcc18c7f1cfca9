//! Seed scan records.
//!
//! A scan runs one draw per seed and writes one JSON line per seed, usually
//! after a `{"meta": {...}}` header line. Records are self-contained so they
//! can be written in completion order and aggregated later.

use crate::config::{DrawConfig, DrawOptions};
use crate::draw::{run_full_draw, DrawOutcome, Fallback};
use crate::error::DrawError;
use crate::models::Pots;
use crate::validation::validate_groups;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

/// Header describing the seed range of a scan file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMeta {
    pub start: u32,
    pub end: u32,
    pub workers: usize,
}

/// Result of the draw for one seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub seed: u32,
    pub success: bool,
    pub error: Option<String>,
    pub used_seed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<Fallback>,
}

impl ScanRecord {
    pub fn failure(seed: u32, error: impl Into<String>) -> Self {
        Self {
            seed,
            success: false,
            error: Some(error.into()),
            used_seed: None,
            groups: None,
            fallback: None,
        }
    }
}

/// Any line of a scan file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanLine {
    Meta { meta: ScanMeta },
    Record(ScanRecord),
}

impl ScanLine {
    pub fn record(&self) -> Option<&ScanRecord> {
        match self {
            ScanLine::Meta { .. } => None,
            ScanLine::Record(record) => Some(record),
        }
    }
}

/// Settings shared by every seed of a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    pub config: DrawConfig,
    pub options: DrawOptions,
    /// Attempt budget for the single retry of an infeasible seed.
    pub retry_attempts: u32,
    /// Re-check every successful draw with `validate_groups`.
    pub self_check: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            config: DrawConfig::default(),
            options: DrawOptions::with_max_attempts(2000),
            retry_attempts: 10_000,
            self_check: false,
        }
    }
}

/// Draw one seed. An infeasible seed is retried once with the larger
/// `retry_attempts` budget before it is recorded as a failure. Input errors
/// are recorded right away.
pub fn run_seed(pots: &Pots, seed: u32, settings: &ScanSettings) -> ScanRecord {
    let first = run_full_draw(pots, Some(seed), &settings.options, &settings.config);
    let result = match first {
        Err(DrawError::InfeasibleSeed { .. }) => {
            let retry = DrawOptions {
                max_attempts: settings.retry_attempts,
                ..settings.options
            };
            run_full_draw(pots, Some(seed), &retry, &settings.config)
        }
        other => other,
    };

    match result {
        Ok(outcome) if settings.self_check => {
            let violations = validate_groups(&outcome.groups, pots, &settings.config);
            if violations.is_empty() {
                success_record(seed, outcome)
            } else {
                warn!(seed, count = violations.len(), "draw failed self-check");
                ScanRecord::failure(seed, format!("Self-check failed: {}", violations.join("; ")))
            }
        }
        Ok(outcome) => success_record(seed, outcome),
        Err(err) => {
            warn!(seed, error = %err, "seed failed");
            ScanRecord::failure(seed, err.to_string())
        }
    }
}

fn success_record(seed: u32, outcome: DrawOutcome) -> ScanRecord {
    ScanRecord {
        seed,
        success: true,
        error: None,
        used_seed: Some(outcome.seed),
        groups: Some(outcome.groups.to_names()),
        fallback: outcome.fallback,
    }
}
