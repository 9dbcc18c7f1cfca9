//! Draw configuration
//!
//! `DrawConfig` holds the feature toggles that add constraints on top of the
//! base confederation caps. It is built once per draw and passed by reference
//! into every placement call. `DrawOptions` holds the engine's search budgets.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Feature toggles for the draw. All features default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// UEFA qualifying group winners may not share a World Cup group.
    pub uefa_group_winners_separated: bool,
    /// UEFA playoff paths are seeded into pots by ranking instead of going
    /// straight to pot 4.
    pub uefa_playoffs_seeded: bool,
    /// Official procedure: top-4 bracket quadrant/half separation in pot 1.
    pub fifa_official_constraints: bool,
}

impl DrawConfig {
    pub const KEYS: [&'static str; 3] = [
        "uefa_group_winners_separated",
        "uefa_playoffs_seeded",
        "fifa_official_constraints",
    ];

    /// Plain key/value form for serialization.
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        let mut map = BTreeMap::new();
        map.insert(
            "uefa_group_winners_separated".to_string(),
            Value::Bool(self.uefa_group_winners_separated),
        );
        map.insert(
            "uefa_playoffs_seeded".to_string(),
            Value::Bool(self.uefa_playoffs_seeded),
        );
        map.insert(
            "fifa_official_constraints".to_string(),
            Value::Bool(self.fifa_official_constraints),
        );
        map
    }

    /// Build from a key/value map. Unknown keys are ignored, as are values
    /// that are not booleans (the field keeps its default).
    pub fn from_map(map: &BTreeMap<String, Value>) -> Self {
        let flag = |key: &str| map.get(key).and_then(Value::as_bool).unwrap_or(false);
        Self {
            uefa_group_winners_separated: flag("uefa_group_winners_separated"),
            uefa_playoffs_seeded: flag("uefa_playoffs_seeded"),
            fifa_official_constraints: flag("fifa_official_constraints"),
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    fn enabled_features(&self) -> Vec<&'static str> {
        let mut features = Vec::new();
        if self.uefa_group_winners_separated {
            features.push("UEFA group winners separated");
        }
        if self.uefa_playoffs_seeded {
            features.push("UEFA playoffs seeded");
        }
        if self.fifa_official_constraints {
            features.push("FIFA official constraints");
        }
        features
    }
}

impl fmt::Display for DrawConfig {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let features = self.enabled_features();
        if features.is_empty() {
            write!(f, "DrawConfig(default - all features off)")
        } else {
            write!(f, "DrawConfig({})", features.join(", "))
        }
    }
}

/// Search budgets for the placement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DrawOptions {
    /// Randomized greedy attempts per pot before falling back to backtracking.
    pub max_attempts: u32,
    /// Upper bound on nodes visited by one backtracking search.
    /// `None` searches exhaustively.
    pub backtrack_node_limit: Option<u64>,
}

impl DrawOptions {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 5000;
    pub const DEFAULT_NODE_LIMIT: u64 = 250_000;

    pub fn with_max_attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Self::default()
        }
    }
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            backtrack_node_limit: Some(Self::DEFAULT_NODE_LIMIT),
        }
    }
}
