//! Top-4 bracket separation
//!
//! The twelve groups are split into four knockout-bracket quadrants of three
//! groups; quadrants pair into two halves. When official constraints are on,
//! the four best-ranked pot 1 teams must land in four different quadrants,
//! with the first/second and third/fourth seeds in opposite halves.
//!
//! Reservation rule: a non-top-4 team may not fill the last empty group of a
//! quadrant that has no top-4 team yet. That keeps one group per quadrant
//! open until a top-4 team claims it, so the pot 1 draw can never deadlock.

use crate::models::{group_index, group_label, Groups, Team, GROUP_COUNT};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Blue,
    Turquoise,
    Green,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Half {
    First,
    Second,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Blue,
        Quadrant::Turquoise,
        Quadrant::Green,
        Quadrant::Red,
    ];

    pub fn groups(self) -> [char; 3] {
        match self {
            Quadrant::Blue => ['E', 'I', 'F'],
            Quadrant::Turquoise => ['H', 'D', 'G'],
            Quadrant::Green => ['C', 'A', 'L'],
            Quadrant::Red => ['J', 'B', 'K'],
        }
    }

    /// Blue and turquoise meet in one semi-final, green and red in the other.
    pub fn half(self) -> Half {
        match self {
            Quadrant::Blue | Quadrant::Turquoise => Half::First,
            Quadrant::Green | Quadrant::Red => Half::Second,
        }
    }

    pub fn for_group(label: char) -> Option<Quadrant> {
        Quadrant::ALL
            .into_iter()
            .find(|q| q.groups().contains(&label))
    }

    fn for_index(index: usize) -> Quadrant {
        // Every group letter belongs to exactly one quadrant.
        Quadrant::for_group(group_label(index)).unwrap_or(Quadrant::Blue)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Quadrant::Blue => "blue",
            Quadrant::Turquoise => "turquoise",
            Quadrant::Green => "green",
            Quadrant::Red => "red",
        };
        f.write_str(name)
    }
}

/// The four best-ranked teams, best first. Unranked teams sort last.
pub fn identify_top4(pot1: &[Team]) -> Vec<&Team> {
    let mut sorted: Vec<&Team> = pot1.iter().collect();
    sorted.sort_by_key(|t| t.ranking_key());
    sorted.truncate(4);
    sorted
}

/// Per-group state while pot 1 is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupOccupancy {
    Unassigned,
    Top4,
    Other,
}

/// Why a pot 1 placement is not allowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BracketBlock {
    #[error("Group {0} already occupied")]
    Occupied(char),

    #[error("Quadrant {0} already has a top-4 team")]
    QuadrantTaken(Quadrant),

    #[error("{team} must be in the opposite half from {partner} (in {partner_quadrant})")]
    SameHalf {
        team: String,
        partner: String,
        partner_quadrant: Quadrant,
    },

    #[error("Cannot fill last group in quadrant {0} - reserved for a top-4 team")]
    ReservedForTop4(Quadrant),
}

/// Quadrant bookkeeping for one pot 1 draw. Created when pot 1 starts and
/// dropped once it is placed.
#[derive(Debug, Clone)]
pub struct Top4BracketTracker<'a> {
    top4: Vec<&'a Team>,
    assignments: [Option<&'a Team>; GROUP_COUNT],
    quadrant_has_top4: [bool; 4],
}

impl<'a> Top4BracketTracker<'a> {
    pub fn new(pot1: &'a [Team]) -> Self {
        Self {
            top4: identify_top4(pot1),
            assignments: [None; GROUP_COUNT],
            quadrant_has_top4: [false; 4],
        }
    }

    pub fn top4(&self) -> &[&'a Team] {
        &self.top4
    }

    /// Position (0-3) among the top four, best first.
    pub fn seed_index(&self, team: &Team) -> Option<usize> {
        self.top4.iter().position(|t| t.name == team.name)
    }

    pub fn is_top4(&self, team: &Team) -> bool {
        self.seed_index(team).is_some()
    }

    pub fn occupancy(&self, index: usize) -> GroupOccupancy {
        match self.assignments.get(index).copied().flatten() {
            None => GroupOccupancy::Unassigned,
            Some(team) if self.is_top4(team) => GroupOccupancy::Top4,
            Some(_) => GroupOccupancy::Other,
        }
    }

    /// Occupied groups in a quadrant (0-3).
    pub fn quadrant_occupancy(&self, quadrant: Quadrant) -> usize {
        quadrant
            .groups()
            .iter()
            .filter_map(|&g| group_index(g))
            .filter(|&i| self.assignments[i].is_some())
            .count()
    }

    /// Placed top-4 teams with their quadrants.
    pub fn placed_top4(&self) -> Vec<(&'a Team, Quadrant)> {
        self.assignments
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.map(|t| (t, Quadrant::for_index(i))))
            .filter(|(t, _)| self.is_top4(t))
            .collect()
    }

    pub fn check(&self, team: &Team, index: usize) -> Result<(), BracketBlock> {
        if self.assignments[index].is_some() {
            return Err(BracketBlock::Occupied(group_label(index)));
        }
        let quadrant = Quadrant::for_index(index);
        match self.seed_index(team) {
            Some(seed) => self.check_top4(team, seed, quadrant),
            None => self.check_other(quadrant),
        }
    }

    pub fn can_place(&self, team: &Team, index: usize) -> bool {
        self.check(team, index).is_ok()
    }

    fn check_top4(&self, team: &Team, seed: usize, quadrant: Quadrant) -> Result<(), BracketBlock> {
        if self.quadrant_has_top4[quadrant.slot()] {
            return Err(BracketBlock::QuadrantTaken(quadrant));
        }
        // Seeds pair up as (0, 1) and (2, 3).
        let partner_seed = seed ^ 1;
        let Some(partner) = self.top4.get(partner_seed) else {
            return Ok(());
        };
        let partner_quadrant = self
            .placed_top4()
            .into_iter()
            .find(|(t, _)| t.name == partner.name)
            .map(|(_, q)| q);
        match partner_quadrant {
            Some(pq) if pq.half() == quadrant.half() => Err(BracketBlock::SameHalf {
                team: team.name.clone(),
                partner: partner.name.clone(),
                partner_quadrant: pq,
            }),
            _ => Ok(()),
        }
    }

    fn check_other(&self, quadrant: Quadrant) -> Result<(), BracketBlock> {
        if self.quadrant_has_top4[quadrant.slot()] {
            return Ok(());
        }
        if self.quadrant_occupancy(quadrant) + 1 >= quadrant.groups().len() {
            return Err(BracketBlock::ReservedForTop4(quadrant));
        }
        Ok(())
    }

    /// Record a placement. Callers check legality first.
    pub fn place(&mut self, team: &'a Team, index: usize) -> Result<(), BracketBlock> {
        if self.assignments[index].is_some() {
            return Err(BracketBlock::Occupied(group_label(index)));
        }
        self.assignments[index] = Some(team);
        if self.is_top4(team) {
            self.quadrant_has_top4[Quadrant::for_index(index).slot()] = true;
        }
        Ok(())
    }

    /// Groups (by index) where `team` may go right now.
    pub fn available_groups(&self, team: &Team) -> Vec<usize> {
        (0..GROUP_COUNT).filter(|&i| self.can_place(team, i)).collect()
    }

    /// Separation problems in the tracker's current assignments.
    pub fn validate_final(&self) -> Vec<String> {
        let placements: Vec<(usize, Quadrant)> = self
            .placed_top4()
            .into_iter()
            .filter_map(|(t, q)| self.seed_index(t).map(|s| (s, q)))
            .collect();
        separation_violations(&self.top4, &placements)
    }
}

/// Check top-4 separation on a finished (or pot 1 only) draw.
pub fn validate_top4_separation(groups: &Groups, pot1: &[Team]) -> Vec<String> {
    let top4 = identify_top4(pot1);
    let placements: Vec<(usize, Quadrant)> = top4
        .iter()
        .enumerate()
        .filter_map(|(seed, team)| {
            groups
                .find(&team.name)
                .and_then(Quadrant::for_group)
                .map(|q| (seed, q))
        })
        .collect();
    separation_violations(&top4, &placements)
}

fn separation_violations(top4: &[&Team], placements: &[(usize, Quadrant)]) -> Vec<String> {
    let mut errors = Vec::new();
    if placements.len() != top4.len() {
        errors.push(format!(
            "Expected {} top-4 teams placed, found {}",
            top4.len(),
            placements.len()
        ));
        return errors;
    }

    let mut seen = [false; 4];
    for &(_, quadrant) in placements {
        if std::mem::replace(&mut seen[quadrant.slot()], true) {
            errors.push(format!("Top-4 teams share quadrant {}", quadrant));
        }
    }

    let quadrant_of = |seed: usize| placements.iter().find(|(s, _)| *s == seed).map(|(_, q)| *q);
    for (a, b) in [(0, 1), (2, 3)] {
        if let (Some(qa), Some(qb)) = (quadrant_of(a), quadrant_of(b)) {
            if qa.half() == qb.half() {
                errors.push(format!(
                    "{} ({}) and {} ({}) are in the same half",
                    top4[a].name, qa, top4[b].name, qb
                ));
            }
        }
    }
    errors
}
