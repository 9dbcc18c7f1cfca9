use super::team::{Confederation, Team};
use serde::{Deserialize, Serialize};

/// A draw position held for a qualifier that is not decided yet
/// (e.g. "UEFA Playoff A"). Only used for reporting; the engine sees the
/// matching `Team`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub pot: u8,
    pub allowed_confederations: Vec<Confederation>,
    #[serde(default)]
    pub candidates: Option<Vec<String>>,
    #[serde(default)]
    pub fixed_group: Option<char>,
    /// Combined flag glyphs of the candidates, "/"-separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

impl Slot {
    /// Playoff and path entries are slots; everything else is a decided team.
    pub fn is_slot_name(name: &str) -> bool {
        let lower = name.to_lowercase();
        lower.contains("playoff") || lower.contains("path")
    }

    pub fn from_team(team: &Team, candidates: Option<Vec<String>>) -> Option<Self> {
        if !Self::is_slot_name(&team.name) {
            return None;
        }
        Some(Self {
            name: team.name.clone(),
            pot: team.pot,
            allowed_confederations: team.confederation.candidates().to_vec(),
            candidates,
            fixed_group: team.fixed_group,
            flags: team.flag.clone(),
        })
    }
}
