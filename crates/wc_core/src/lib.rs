//! # wc_core - World Cup Group Draw Engine
//!
//! Simulates the 48-team group-stage draw: twelve groups (A-L), one team per
//! pot in each, under confederation caps and optional bracket separation.
//!
//! ## Features
//! - Deterministic draws (same seed = same groups)
//! - Placeholder slots that reserve capacity in every candidate confederation
//! - Fallback chain: randomized retries, backtracking, alternate pot orders,
//!   global backtracking
//! - Seed-scan records, aggregate statistics and host-city probabilities

// Scan and venue helpers take several tuning parameters.
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod bracket;
pub mod config;
pub mod draw;
pub mod error;
pub mod models;
pub mod positions;
pub mod pot_assignment;
pub mod scan;
pub mod stats;
pub mod validation;
pub mod venues;

#[cfg(test)]
pub(crate) mod test_fixtures; // Shared 2026 roster for engine tests

pub use bracket::{identify_top4, validate_top4_separation, Quadrant, Top4BracketTracker};
pub use config::{DrawConfig, DrawOptions};
pub use draw::{run_full_draw, DrawOutcome, DrawRecord, Fallback};
pub use error::{DrawError, Result, RosterError};
pub use models::{Confederation, ConfederationSet, Group, Groups, Pots, Slot, Team};
pub use positions::{pot_for_position, position_for_pot, position_order};
pub use pot_assignment::assign_pots;
pub use scan::{run_seed, ScanLine, ScanMeta, ScanRecord, ScanSettings};
pub use stats::{aggregate_records, DrawStats, StatsBuilder, TeamStats};
pub use validation::validate_groups;
pub use venues::{normalize_city, team_city_probabilities, CityProbabilityMap, VenueSchedule};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
