//! wc_cli - roster files, seed scans and reports for the `wc_draw` tool
//!
//! - `roster`: CSV roster parsing and slot extraction
//! - `format`: text/JSON output
//! - `scan`: parallel seed scans into an append-only JSONL file
//! - `report`: aggregation, seed validation and city probabilities

pub mod format;
pub mod report;
pub mod roster;
pub mod scan;

pub use report::{city_report, find_seed_record, load_stats, validate_record, StatsReport};
pub use roster::{load_roster, parse_roster, Roster, RosterEntry, DEFAULT_ROSTER};
pub use scan::{read_scan, run_scan, write_header_if_new, JsonlWriter, ScanSummary};
