use super::group::{group_index, GROUP_COUNT, POT_COUNT};
use super::team::Team;
use crate::error::RosterError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Teams partitioned by pot number (1-4).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pots {
    pots: BTreeMap<u8, Vec<Team>>,
}

impl Pots {
    pub const TEAMS_PER_POT: usize = GROUP_COUNT;

    pub fn new() -> Self {
        Self::default()
    }

    /// Group teams by their `pot` field, preserving input order within a pot.
    pub fn from_teams(teams: impl IntoIterator<Item = Team>) -> Self {
        let mut pots = Self::new();
        for team in teams {
            pots.push(team);
        }
        pots
    }

    pub fn push(&mut self, team: Team) {
        self.pots.entry(team.pot).or_default().push(team);
    }

    /// Teams in pot `number`; empty if the pot does not exist.
    pub fn pot(&self, number: u8) -> &[Team] {
        self.pots.get(&number).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &[Team])> + '_ {
        self.pots.iter().map(|(n, teams)| (*n, teams.as_slice()))
    }

    pub fn all_teams(&self) -> impl Iterator<Item = &Team> + Clone + '_ {
        self.pots.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.pots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find(&self, name: &str) -> Option<&Team> {
        self.all_teams().find(|t| t.name == name)
    }

    /// Check the shape the draw requires: four pots of twelve, unique names,
    /// and hosts holding distinct valid fixed groups.
    pub fn validate(&self) -> Result<(), RosterError> {
        let mut names = HashSet::new();
        let mut host_groups = HashSet::new();

        for team in self.all_teams() {
            if !(1..=POT_COUNT as u8).contains(&team.pot) {
                return Err(RosterError::InvalidPot {
                    team: team.name.clone(),
                    pot: team.pot,
                });
            }
            if !names.insert(team.name.as_str()) {
                return Err(RosterError::DuplicateTeam(team.name.clone()));
            }
            if let Some(group) = team.fixed_group {
                if group_index(group).is_none() {
                    return Err(RosterError::InvalidGroup(group.to_string()));
                }
            }
            if team.host {
                let group = team.fixed_group.ok_or_else(|| RosterError::HostWithoutGroup {
                    team: team.name.clone(),
                })?;
                if !host_groups.insert(group) {
                    return Err(RosterError::InvalidGroup(format!(
                        "{} (claimed by two hosts)",
                        group
                    )));
                }
            }
        }

        for pot in 1..=POT_COUNT as u8 {
            let found = self.pot(pot).len();
            if found != Self::TEAMS_PER_POT {
                return Err(RosterError::PotSize {
                    pot,
                    found,
                    expected: Self::TEAMS_PER_POT,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::team::Confederation;

    fn full_pots() -> Pots {
        let mut teams = Vec::new();
        for pot in 1..=4u8 {
            for i in 0..12 {
                teams.push(Team::new(format!("T{}-{}", pot, i), Confederation::Uefa, pot));
            }
        }
        Pots::from_teams(teams)
    }

    #[test]
    fn test_from_teams_groups_by_pot() {
        let pots = Pots::from_teams(vec![
            Team::new("Argentina", Confederation::Conmebol, 1),
            Team::new("Japan", Confederation::Afc, 2),
            Team::new("Mexico", Confederation::Concacaf, 1).host_of('A'),
        ]);
        assert_eq!(pots.pot(1).len(), 2);
        assert_eq!(pots.pot(2).len(), 1);
        assert!(pots.pot(3).is_empty());
        assert_eq!(pots.len(), 3);
        assert_eq!(pots.find("Japan").map(|t| t.pot), Some(2));
    }

    #[test]
    fn test_validate_accepts_full_roster() {
        assert_eq!(full_pots().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_short_pot() {
        let mut pots = full_pots();
        pots.pots.get_mut(&3).unwrap().pop();
        assert_eq!(
            pots.validate(),
            Err(RosterError::PotSize {
                pot: 3,
                found: 11,
                expected: 12
            })
        );
    }

    #[test]
    fn test_validate_rejects_duplicate_host_group() {
        let mut pots = full_pots();
        let pot1 = pots.pots.get_mut(&1).unwrap();
        pot1[0] = pot1[0].clone().host_of('A');
        pot1[1] = pot1[1].clone().host_of('A');
        assert!(matches!(pots.validate(), Err(RosterError::InvalidGroup(_))));
    }

    #[test]
    fn test_validate_rejects_host_without_group() {
        let mut pots = full_pots();
        pots.pots.get_mut(&1).unwrap()[0].host = true;
        assert!(matches!(
            pots.validate(),
            Err(RosterError::HostWithoutGroup { .. })
        ));
    }
}
