use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Continental federation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confederation {
    Uefa,
    Conmebol,
    Concacaf,
    Caf,
    Afc,
    Ofc,
}

impl Confederation {
    pub const ALL: [Confederation; 6] = [
        Confederation::Uefa,
        Confederation::Conmebol,
        Confederation::Concacaf,
        Confederation::Caf,
        Confederation::Afc,
        Confederation::Ofc,
    ];

    /// Maximum number of teams from this confederation in one group.
    pub fn cap(self) -> usize {
        match self {
            Confederation::Uefa => 2,
            _ => 1,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Confederation::Uefa => "UEFA",
            Confederation::Conmebol => "CONMEBOL",
            Confederation::Concacaf => "CONCACAF",
            Confederation::Caf => "CAF",
            Confederation::Afc => "AFC",
            Confederation::Ofc => "OFC",
        }
    }
}

impl fmt::Display for Confederation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Confederation {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        Confederation::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| RosterError::UnknownConfederation(code.to_string()))
    }
}

/// A team's confederation: a single fixed value, or the set of candidates
/// for a not-yet-decided qualifier.
///
/// A placeholder is treated as potentially belonging to every candidate at
/// once, so it consumes capacity in all of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ConfederationSet {
    Fixed(Confederation),
    OneOf(Vec<Confederation>),
}

impl ConfederationSet {
    /// Every confederation this team could contribute to a group.
    pub fn candidates(&self) -> &[Confederation] {
        match self {
            ConfederationSet::Fixed(c) => std::slice::from_ref(c),
            ConfederationSet::OneOf(set) => set,
        }
    }

    pub fn contains(&self, confederation: Confederation) -> bool {
        self.candidates().contains(&confederation)
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ConfederationSet::OneOf(_))
    }

    /// The single confederation, if this is not a placeholder.
    pub fn fixed(&self) -> Option<Confederation> {
        match self {
            ConfederationSet::Fixed(c) => Some(*c),
            ConfederationSet::OneOf(_) => None,
        }
    }
}

impl From<Confederation> for ConfederationSet {
    fn from(c: Confederation) -> Self {
        ConfederationSet::Fixed(c)
    }
}

impl FromStr for ConfederationSet {
    type Err = RosterError;

    /// Parses `"UEFA"` or pipe-joined alternatives like `"AFC|CONMEBOL|CONCACAF"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = Vec::new();
        for part in s.split('|').map(str::trim).filter(|p| !p.is_empty()) {
            let conf: Confederation = part.parse()?;
            if !set.contains(&conf) {
                set.push(conf);
            }
        }
        match set.len() {
            0 => Err(RosterError::UnknownConfederation(s.to_string())),
            1 => Ok(ConfederationSet::Fixed(set[0])),
            _ => Ok(ConfederationSet::OneOf(set)),
        }
    }
}

impl TryFrom<String> for ConfederationSet {
    type Error = RosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConfederationSet> for String {
    fn from(value: ConfederationSet) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ConfederationSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let codes: Vec<&str> = self.candidates().iter().map(|c| c.code()).collect();
        f.write_str(&codes.join("|"))
    }
}

/// A team (or placeholder slot) in the draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub confederation: ConfederationSet,
    pub pot: u8,
    #[serde(default)]
    pub host: bool,
    #[serde(default)]
    pub fixed_group: Option<char>,
    /// FIFA ranking; lower is better, 0 means unranked.
    #[serde(default)]
    pub fifa_ranking: u32,
    #[serde(default)]
    pub uefa_group_winner: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
}

impl Team {
    pub fn new(name: impl Into<String>, confederation: impl Into<ConfederationSet>, pot: u8) -> Self {
        Self {
            name: name.into(),
            confederation: confederation.into(),
            pot,
            host: false,
            fixed_group: None,
            fifa_ranking: 0,
            uefa_group_winner: false,
            flag: None,
        }
    }

    /// Mark as a host nation fixed to `group`.
    pub fn host_of(mut self, group: char) -> Self {
        self.host = true;
        self.fixed_group = Some(group);
        self
    }

    pub fn ranked(mut self, ranking: u32) -> Self {
        self.fifa_ranking = ranking;
        self
    }

    pub fn group_winner(mut self) -> Self {
        self.uefa_group_winner = true;
        self
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Sort key for rankings: unranked teams sort after every ranked team.
    pub fn ranking_key(&self) -> u32 {
        if self.fifa_ranking == 0 {
            u32::MAX
        } else {
            self.fifa_ranking
        }
    }

    /// Placeholders and playoff/path slots are the hardest teams to place.
    pub fn is_special(&self) -> bool {
        let name = self.name.to_lowercase();
        self.confederation.is_placeholder() || name.contains("playoff") || name.contains("path")
    }

    /// Display label: flag glyph if present, otherwise the name.
    pub fn label(&self) -> &str {
        self.flag.as_deref().unwrap_or(&self.name)
    }
}
