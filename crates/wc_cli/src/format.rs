//! Text and JSON renderings for the command line.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use wc_core::{DrawOutcome, Fallback, Pots, Slot, Team};

/// Display label for a team: the slot's combined flags when it has them,
/// else the team's own flag or name, with `/` separators written compactly.
pub fn team_label(team: &Team, slots: &[Slot]) -> String {
    let slot_flags = slots
        .iter()
        .find(|s| s.name == team.name)
        .and_then(|s| s.flags.as_deref());
    let raw = slot_flags.unwrap_or_else(|| team.label());
    raw.split('/').map(str::trim).collect::<Vec<_>>().join("/")
}

pub fn format_pots(pots: &Pots, slots: &[Slot]) -> String {
    pots.iter()
        .map(|(pot, teams)| {
            let labels: Vec<String> = teams.iter().map(|t| team_label(t, slots)).collect();
            format!("Pot {}: {}", pot, labels.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_slots(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|slot| {
            let mut parts = vec![format!("{} (pot {})", slot.name, slot.pot)];
            if !slot.allowed_confederations.is_empty() {
                let codes: Vec<&str> = slot.allowed_confederations.iter().map(|c| c.code()).collect();
                parts.push(format!("allowed: {}", codes.join(",")));
            }
            if let Some(candidates) = slot.candidates.as_ref().filter(|c| !c.is_empty()) {
                parts.push(format!("candidates: {}", candidates.join(", ")));
            }
            if let Some(group) = slot.fixed_group {
                parts.push(format!("fixed_group: {}", group));
            }
            if let Some(flags) = &slot.flags {
                parts.push(format!("flags: {}", flags.replace(" / ", "/")));
            }
            format!(" - {}", parts.join(" | "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_fallback(fallback: &Fallback) -> String {
    match fallback {
        Fallback::AlternateOrdering { ordering } => {
            let order: Vec<String> = ordering.iter().map(u8::to_string).collect();
            format!("alternate pot ordering {}", order.join(" -> "))
        }
        Fallback::GlobalBacktracking => "global backtracking".to_string(),
    }
}

/// `Seed: N`, a blank line, then one `A: t1, t2, t3, t4` line per group.
pub fn format_draw(outcome: &DrawOutcome, slots: &[Slot]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Seed: {}", outcome.seed);
    let _ = writeln!(out, "\nDraw:");
    for (label, group) in outcome.groups.iter() {
        let labels: Vec<String> = group.teams().map(|t| team_label(t, slots)).collect();
        let _ = writeln!(out, "{}: {}", label, labels.join(", "));
    }
    if let Some(fallback) = &outcome.fallback {
        let _ = writeln!(out, "\nFallback: {}", format_fallback(fallback));
    }
    out
}

/// JSON body of `wc_draw pots --json`.
#[derive(Debug, Serialize)]
pub struct PotsReport<'a> {
    pub pots: BTreeMap<String, Vec<&'a str>>,
    pub slots: &'a [Slot],
}

impl<'a> PotsReport<'a> {
    pub fn new(pots: &'a Pots, slots: &'a [Slot]) -> Self {
        let pots = pots
            .iter()
            .map(|(n, teams)| (n.to_string(), teams.iter().map(|t| t.name.as_str()).collect()))
            .collect();
        Self { pots, slots }
    }
}

/// City percentages, highest first.
pub fn format_cities(team: &str, cities: &BTreeMap<String, f64>) -> String {
    let mut ranked: Vec<(&String, &f64)> = cities.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let mut out = format!("{}:", team);
    for (city, pct) in ranked {
        let _ = write!(out, "\n  {:<16} {:5.1}%", city, pct);
    }
    out
}
