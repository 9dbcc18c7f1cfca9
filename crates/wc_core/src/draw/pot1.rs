//! Pot 1 placement
//!
//! Hosts go to their fixed groups first, then the remaining seeds are drawn
//! one at a time into a random empty group. Any bijection of the remaining
//! teams onto the empty groups is valid, so no backtracking is needed. With
//! official constraints on, a bracket tracker filters the empty groups.

use crate::bracket::Top4BracketTracker;
use crate::config::DrawConfig;
use crate::error::{DrawError, Result};
use crate::models::{group_index, group_label, Groups, Team, GROUP_COUNT};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

pub fn draw_pot1<'a, R: Rng + ?Sized>(
    pot1: &'a [Team],
    rng: &mut R,
    config: &DrawConfig,
) -> Result<Groups<'a>> {
    let mut groups = Groups::new();
    let mut tracker = config
        .fifa_official_constraints
        .then(|| Top4BracketTracker::new(pot1));

    let mut remaining: Vec<&'a Team> = Vec::with_capacity(pot1.len());
    for team in pot1 {
        let Some(label) = team.fixed_group.filter(|_| team.host) else {
            remaining.push(team);
            continue;
        };
        let index = group_index(label).ok_or_else(|| DrawError::InvalidFixedGroup {
            team: team.name.clone(),
            group: label,
        })?;
        if !groups.at(index).is_empty() {
            return Err(DrawError::DuplicateGroup {
                group: label,
                pot: 1,
            });
        }
        if let Some(tracker) = tracker.as_mut() {
            tracker
                .check(team, index)
                .and_then(|_| tracker.place(team, index))
                .map_err(|_| DrawError::BracketConflict {
                    team: team.name.clone(),
                    group: label,
                })?;
        }
        groups.place(index, team);
    }

    while !remaining.is_empty() {
        let pick = rng.gen_range(0..remaining.len());
        let team = remaining[pick];
        let possible: Vec<usize> = (0..GROUP_COUNT)
            .filter(|&i| groups.at(i).is_empty())
            .filter(|&i| tracker.as_ref().map_or(true, |t| t.can_place(team, i)))
            .collect();
        let &index = possible
            .choose(rng)
            .ok_or_else(|| DrawError::NoAvailableGroup {
                team: team.name.clone(),
            })?;

        if let Some(tracker) = tracker.as_mut() {
            tracker
                .place(team, index)
                .map_err(|_| DrawError::NoAvailableGroup {
                    team: team.name.clone(),
                })?;
        }
        groups.place(index, team);
        remaining.remove(pick);
        debug!(team = %team.name, group = %group_label(index), "pot 1 placement");
    }

    Ok(groups)
}
