//! Host-city probabilities.
//!
//! Once a team's pot and group are known, its position follows from the
//! position table, and the schedule tells which cities that position can play
//! in. Host groups have fixed fixtures. In the other groups each position
//! plays one match out of each consecutive pair of fixtures.

use crate::error::{DrawError, Result};
use crate::models::{Pots, GROUP_LABELS};
use crate::positions::position_for_pot;
use crate::stats::DrawStats;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Probability (0-1) of playing at least one match in each city.
pub type CityProbabilities = BTreeMap<String, f64>;

/// City probabilities for every (group, pot).
pub type CityProbabilityMap = BTreeMap<(char, u8), CityProbabilities>;

const METRO_AREAS: [(&str, &str); 8] = [
    ("east rutherford", "new-york"),
    ("santa clara", "san-francisco"),
    ("inglewood", "los-angeles"),
    ("zapopan", "guadalajara"),
    ("guadalupe", "monterrey"),
    ("foxborough", "boston"),
    ("miami gardens", "miami"),
    ("arlington", "dallas"),
];

/// Canonical city key for a venue: the part after the last comma
/// ("Stadium, City"), lower-cased, suburbs folded into their metro area,
/// spaces turned into dashes.
pub fn normalize_city(venue: &str) -> Option<String> {
    let city = venue.rsplit(',').next()?.trim().to_lowercase();
    if city.is_empty() {
        return None;
    }
    let metro = METRO_AREAS
        .iter()
        .find(|(suburb, _)| *suburb == city)
        .map(|(_, metro)| metro.to_string())
        .unwrap_or(city);
    Some(metro.replace(' ', "-"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch {
    pub match_num: u32,
    /// Position label of the first team, e.g. "A1".
    pub position1: String,
    pub position2: String,
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSchedule {
    #[serde(default)]
    pub is_host: bool,
    pub matches: Vec<ScheduledMatch>,
}

/// Group-stage fixtures keyed by group letter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueSchedule {
    pub groups: BTreeMap<char, GroupSchedule>,
}

fn at_least_once(hits: BTreeMap<String, Vec<f64>>) -> CityProbabilities {
    hits.into_iter()
        .map(|(city, probs)| {
            let avoid: f64 = probs.iter().map(|p| 1.0 - p).product();
            (city, 1.0 - avoid)
        })
        .collect()
}

impl VenueSchedule {
    /// Parse a schedule and normalise its city names.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut schedule: Self = serde_json::from_str(json)?;
        for group in schedule.groups.values_mut() {
            for fixture in &mut group.matches {
                if let Some(city) = normalize_city(&fixture.city) {
                    fixture.city = city;
                }
            }
        }
        Ok(schedule)
    }

    /// Cities for the team at `position` of `group`. Groups missing from the
    /// schedule, and non-host groups without exactly six fixtures, give an
    /// empty map.
    pub fn position_city_probabilities(
        &self,
        group: char,
        position: u8,
    ) -> Result<CityProbabilities> {
        if !GROUP_LABELS.contains(&group) || !(1..=4).contains(&position) {
            return Err(DrawError::InvalidPositionKey {
                group,
                kind: "position",
                value: position,
            });
        }
        let Some(schedule) = self.groups.get(&group) else {
            return Ok(CityProbabilities::new());
        };

        let mut hits: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        if schedule.is_host {
            let label = format!("{}{}", group, position);
            for fixture in &schedule.matches {
                if fixture.position1 == label || fixture.position2 == label {
                    hits.entry(fixture.city.clone()).or_default().push(1.0);
                }
            }
        } else {
            if schedule.matches.len() != 6 {
                return Ok(CityProbabilities::new());
            }
            for pair in schedule.matches.chunks(2) {
                for fixture in pair {
                    hits.entry(fixture.city.clone()).or_default().push(0.5);
                }
            }
        }
        Ok(at_least_once(hits))
    }

    pub fn pot_city_probabilities(&self, group: char, pot: u8) -> Result<CityProbabilities> {
        let position = position_for_pot(group, pot)?;
        self.position_city_probabilities(group, position)
    }

    /// City probabilities for all 48 (group, pot) pairs.
    pub fn city_probability_map(&self) -> Result<CityProbabilityMap> {
        let mut map = CityProbabilityMap::new();
        for group in GROUP_LABELS {
            for pot in 1..=4 {
                map.insert((group, pot), self.pot_city_probabilities(group, pot)?);
            }
        }
        Ok(map)
    }
}

/// Weight the (group, pot) city probabilities by a team's group
/// distribution. `group_pct` and the result are percentages.
pub fn team_city_probabilities(
    group_pct: &BTreeMap<String, f64>,
    pot: u8,
    map: &CityProbabilityMap,
) -> BTreeMap<String, f64> {
    let mut overall: BTreeMap<String, f64> = BTreeMap::new();
    for (label, pct) in group_pct {
        let Some(group) = label.chars().next() else {
            continue;
        };
        let Some(cities) = map.get(&(group, pot)) else {
            continue;
        };
        for (city, prob) in cities {
            *overall.entry(city.clone()).or_default() += pct / 100.0 * prob;
        }
    }
    overall.into_iter().map(|(c, p)| (c, p * 100.0)).collect()
}

/// City percentages for every team in `stats` that appears in `pots`.
pub fn all_team_city_probabilities(
    stats: &DrawStats,
    pots: &Pots,
    map: &CityProbabilityMap,
) -> BTreeMap<String, BTreeMap<String, f64>> {
    stats
        .teams
        .iter()
        .filter_map(|(name, team)| {
            let pot = pots.find(name)?.pot;
            Some((name.clone(), team_city_probabilities(&team.group_pct, pot, map)))
        })
        .collect()
}
