//! Group draw engine
//!
//! - `pot1`: seeds and hosts, optionally under bracket separation
//! - `placement`: one pot at a time, randomized with backtracking fallback
//! - `backtrack`: the shared solver
//! - `orchestrator`: the full draw and its fallback chain

pub mod backtrack;
pub mod eligibility;
pub mod orchestrator;
pub mod placement;
pub mod pot1;

pub use backtrack::{solve, standard_eligibility};
pub use eligibility::is_eligible;
pub use orchestrator::{fresh_seed, run_full_draw, ALTERNATE_ORDERINGS, CLASSICAL_ORDER};
pub use placement::{candidate_groups, draw_pot};
pub use pot1::draw_pot1;

use crate::error::RosterError;
use crate::models::{Groups, Pots};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Strategy that rescued a draw after the classical pot order failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Fallback {
    AlternateOrdering { ordering: Vec<u8> },
    GlobalBacktracking,
}

impl Fallback {
    /// Short name used when counting fallbacks.
    pub fn kind(&self) -> &'static str {
        match self {
            Fallback::AlternateOrdering { .. } => "alternate_ordering",
            Fallback::GlobalBacktracking => "global_backtracking",
        }
    }
}

/// A completed draw borrowing its teams from the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawOutcome<'a> {
    pub groups: Groups<'a>,
    pub seed: u32,
    pub fallback: Option<Fallback>,
}

impl DrawOutcome<'_> {
    pub fn to_record(&self) -> DrawRecord {
        DrawRecord {
            groups: self.groups.to_names(),
            seed: self.seed,
            fallback: self.fallback.clone(),
        }
    }
}

/// Name-only form of a draw, as written to JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub groups: BTreeMap<String, Vec<String>>,
    pub seed: u32,
    #[serde(default)]
    pub fallback: Option<Fallback>,
}

impl DrawRecord {
    /// Resolve team names against `pots`.
    pub fn resolve<'a>(&self, pots: &'a Pots) -> Result<Groups<'a>, RosterError> {
        Groups::from_names(&self.groups, pots.all_teams())
    }
}
