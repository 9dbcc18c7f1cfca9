//! Aggregate statistics over scan records.

use crate::scan::{ScanLine, ScanRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Percentages are relative to successful draws.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub group_pct: BTreeMap<String, f64>,
    pub pair_pct: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawStats {
    pub total_runs: usize,
    pub successes: usize,
    pub success_rate: f64,
    pub teams: BTreeMap<String, TeamStats>,
    #[serde(default)]
    pub fallbacks: BTreeMap<String, usize>,
}

/// Running counts; feed records with [`StatsBuilder::add`] and call
/// [`StatsBuilder::finish`] at the end.
#[derive(Debug, Default)]
pub struct StatsBuilder {
    total_runs: usize,
    successes: usize,
    group_counts: BTreeMap<String, BTreeMap<String, usize>>,
    pair_counts: BTreeMap<String, BTreeMap<String, usize>>,
    fallbacks: BTreeMap<String, usize>,
}

impl StatsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Meta lines are skipped.
    pub fn add_line(&mut self, line: &ScanLine) {
        if let Some(record) = line.record() {
            self.add(record);
        }
    }

    pub fn add(&mut self, record: &ScanRecord) {
        self.total_runs += 1;
        if !record.success {
            return;
        }
        self.successes += 1;
        if let Some(fallback) = &record.fallback {
            *self.fallbacks.entry(fallback.kind().to_string()).or_default() += 1;
        }
        let Some(groups) = &record.groups else {
            return;
        };
        for (label, names) in groups {
            for (i, name) in names.iter().enumerate() {
                *self
                    .group_counts
                    .entry(name.clone())
                    .or_default()
                    .entry(label.clone())
                    .or_default() += 1;
                for other in &names[i + 1..] {
                    *self
                        .pair_counts
                        .entry(name.clone())
                        .or_default()
                        .entry(other.clone())
                        .or_default() += 1;
                    *self
                        .pair_counts
                        .entry(other.clone())
                        .or_default()
                        .entry(name.clone())
                        .or_default() += 1;
                }
            }
        }
    }

    pub fn finish(self) -> DrawStats {
        let successes = self.successes;
        let pct = |count: usize| {
            if successes == 0 {
                0.0
            } else {
                count as f64 / successes as f64 * 100.0
            }
        };
        let to_pct = |counts: Option<&BTreeMap<String, usize>>| -> BTreeMap<String, f64> {
            counts
                .map(|m| m.iter().map(|(k, &v)| (k.clone(), pct(v))).collect())
                .unwrap_or_default()
        };

        let teams = self
            .group_counts
            .iter()
            .map(|(team, groups)| {
                (
                    team.clone(),
                    TeamStats {
                        group_pct: to_pct(Some(groups)),
                        pair_pct: to_pct(self.pair_counts.get(team)),
                    },
                )
            })
            .collect();

        DrawStats {
            total_runs: self.total_runs,
            successes,
            success_rate: if self.total_runs == 0 {
                0.0
            } else {
                successes as f64 / self.total_runs as f64
            },
            teams,
            fallbacks: self.fallbacks,
        }
    }
}

pub fn aggregate_records<'r, I>(lines: I) -> DrawStats
where
    I: IntoIterator<Item = &'r ScanLine>,
{
    let mut builder = StatsBuilder::new();
    for line in lines {
        builder.add_line(line);
    }
    builder.finish()
}
