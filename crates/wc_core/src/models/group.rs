//! Group state for a draw in progress.
//!
//! A `Group` has one slot per pot, so its teams always read pot 1..4 in order
//! no matter which pot was placed first. `Groups` is a plain `Copy` value:
//! every attempt works on its own copy and only a successful attempt is
//! handed back to the caller.

use super::team::{Confederation, Team};
use crate::error::RosterError;
use std::collections::BTreeMap;

pub const GROUP_COUNT: usize = 12;
pub const POT_COUNT: usize = 4;
pub const GROUP_LABELS: [char; GROUP_COUNT] =
    ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L'];

/// Index (0..12) of a group letter.
pub fn group_index(label: char) -> Option<usize> {
    GROUP_LABELS.iter().position(|&g| g == label)
}

pub fn group_label(index: usize) -> char {
    GROUP_LABELS[index % GROUP_COUNT]
}

/// Parse a group letter from roster/CLI text.
pub fn parse_group(text: &str) -> Result<char, RosterError> {
    let trimmed = text.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if group_index(c.to_ascii_uppercase()).is_some() => {
            Ok(c.to_ascii_uppercase())
        }
        _ => Err(RosterError::InvalidGroup(trimmed.to_string())),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Group<'a> {
    slots: [Option<&'a Team>; POT_COUNT],
}

impl<'a> Group<'a> {
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Teams in pot order.
    pub fn teams(&self) -> impl Iterator<Item = &'a Team> + '_ {
        self.slots.iter().filter_map(|s| *s)
    }

    pub fn pot_team(&self, pot: u8) -> Option<&'a Team> {
        let slot = usize::from(pot).checked_sub(1)?;
        self.slots.get(slot).copied().flatten()
    }

    pub fn has_pot(&self, pot: u8) -> bool {
        self.pot_team(pot).is_some()
    }

    /// Number of teams that could belong to `confederation`; placeholders
    /// count toward each of their candidates.
    pub fn occupancy(&self, confederation: Confederation) -> usize {
        self.teams()
            .filter(|t| t.confederation.contains(confederation))
            .count()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.teams().any(|t| t.name == name)
    }

    /// Put `team` into the slot for its pot. Returns false when the pot is
    /// out of range or the slot is taken.
    pub fn insert(&mut self, team: &'a Team) -> bool {
        let Some(slot) = usize::from(team.pot)
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i))
        else {
            return false;
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(team);
        true
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Groups<'a> {
    groups: [Group<'a>; GROUP_COUNT],
}

impl<'a> Groups<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, label: char) -> Option<&Group<'a>> {
        group_index(label).map(|i| &self.groups[i])
    }

    pub fn at(&self, index: usize) -> &Group<'a> {
        &self.groups[index]
    }

    /// Insert `team` into group `index`; see [`Group::insert`].
    pub fn place(&mut self, index: usize, team: &'a Team) -> bool {
        self.groups
            .get_mut(index)
            .map(|g| g.insert(team))
            .unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, &Group<'a>)> + '_ {
        GROUP_LABELS.iter().copied().zip(self.groups.iter())
    }

    pub fn max_len(&self) -> usize {
        self.groups.iter().map(Group::len).max().unwrap_or(0)
    }

    pub fn min_len(&self) -> usize {
        self.groups.iter().map(Group::len).min().unwrap_or(0)
    }

    pub fn total_teams(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.groups.iter().all(Group::is_full)
    }

    /// Group letter holding the team called `name`.
    pub fn find(&self, name: &str) -> Option<char> {
        self.iter().find(|(_, g)| g.contains(name)).map(|(l, _)| l)
    }

    /// Name-only view keyed by group letter.
    pub fn to_names(&self) -> BTreeMap<String, Vec<String>> {
        self.iter()
            .map(|(label, group)| {
                (
                    label.to_string(),
                    group.teams().map(|t| t.name.clone()).collect(),
                )
            })
            .collect()
    }

    /// Rebuild groups from a name-only view, resolving names against `teams`.
    pub fn from_names<I>(
        names: &BTreeMap<String, Vec<String>>,
        teams: I,
    ) -> Result<Self, RosterError>
    where
        I: IntoIterator<Item = &'a Team> + Clone,
    {
        let mut groups = Groups::new();
        for (label, members) in names {
            let index = group_index(parse_group(label)?)
                .ok_or_else(|| RosterError::InvalidGroup(label.clone()))?;
            for name in members {
                let team = teams
                    .clone()
                    .into_iter()
                    .find(|t| &t.name == name)
                    .ok_or_else(|| RosterError::UnknownTeam(name.clone()))?;
                if !groups.place(index, team) {
                    return Err(RosterError::InvalidGroup(format!(
                        "{} (two pot {} teams)",
                        label, team.pot
                    )));
                }
            }
        }
        Ok(groups)
    }
}
