//! Post-processing of scan files: aggregate statistics, single-seed
//! validation and host-city probabilities.

use crate::scan::read_scan;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use wc_core::venues::all_team_city_probabilities;
use wc_core::{
    aggregate_records, validate_groups, DrawConfig, DrawStats, Groups, Pots, ScanLine, ScanRecord,
    VenueSchedule,
};

/// Statistics file written by `wc_draw aggregate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    /// RFC 3339 timestamp.
    pub generated_at: String,
    pub source: String,
    #[serde(flatten)]
    pub stats: DrawStats,
}

impl StatsReport {
    pub fn from_scan(path: &Path) -> Result<Self> {
        let lines = read_scan(path)?;
        Ok(Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            source: path.display().to_string(),
            stats: aggregate_records(&lines),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialise statistics")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write statistics: {}", path.display()))?;
        Ok(())
    }
}

/// Read statistics written by `aggregate`. Bare `DrawStats` JSON is accepted
/// too.
pub fn load_stats(path: &Path) -> Result<DrawStats> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read statistics: {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse statistics: {}", path.display()))
}

/// The record for `seed`, if the scan has one. The last record wins when a
/// seed was scanned more than once.
pub fn find_seed_record(lines: &[ScanLine], seed: u32) -> Option<&ScanRecord> {
    lines
        .iter()
        .filter_map(ScanLine::record)
        .filter(|r| r.seed == seed)
        .last()
}

/// Check a scanned draw against the roster. Returns the violations; an
/// empty list means the draw is valid.
pub fn validate_record(record: &ScanRecord, pots: &Pots, config: &DrawConfig) -> Result<Vec<String>> {
    if !record.success {
        bail!(
            "Seed {} failed in the scan: {}",
            record.seed,
            record.error.as_deref().unwrap_or("unknown error")
        );
    }
    let Some(names) = &record.groups else {
        bail!("Seed {} has no groups recorded", record.seed);
    };
    let groups = Groups::from_names(names, pots.all_teams())
        .with_context(|| format!("Seed {} does not match the roster", record.seed))?;
    Ok(validate_groups(&groups, pots, config))
}

/// Per-team city percentages from scan statistics and a venue schedule.
pub fn city_report(
    stats: &DrawStats,
    pots: &Pots,
    schedule_path: &Path,
) -> Result<BTreeMap<String, BTreeMap<String, f64>>> {
    let text = fs::read_to_string(schedule_path)
        .with_context(|| format!("Failed to read schedule: {}", schedule_path.display()))?;
    let schedule = VenueSchedule::from_json(&text)
        .with_context(|| format!("Failed to parse schedule: {}", schedule_path.display()))?;
    let map = schedule.city_probability_map()?;
    Ok(all_team_city_probabilities(stats, pots, &map))
}
