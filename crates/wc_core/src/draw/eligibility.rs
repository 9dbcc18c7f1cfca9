//! Group eligibility
//!
//! A team may join a group when:
//! 1. the group has no team from the same pot,
//! 2. (group-winner separation on) it is not a second UEFA group winner,
//! 3. every confederation the team could contribute is still under its cap,
//!    where placeholders already in the group count toward each of their
//!    candidates.
//!
//! Rule 3 covers single-confederation teams and placeholders alike: a
//! placeholder reserves capacity in all of its candidates at once.

use crate::config::DrawConfig;
use crate::models::{Group, Team};

/// At most one UEFA qualifying group winner per World Cup group.
pub fn group_winner_allowed(team: &Team, group: &Group) -> bool {
    !team.uefa_group_winner || !group.teams().any(|t| t.uefa_group_winner)
}

/// Every confederation `team` could contribute still has room in `group`.
pub fn confederations_allowed(team: &Team, group: &Group) -> bool {
    team.confederation
        .candidates()
        .iter()
        .all(|&conf| group.occupancy(conf) < conf.cap())
}

pub fn is_eligible(team: &Team, group: &Group, config: &DrawConfig) -> bool {
    if group.has_pot(team.pot) {
        return false;
    }
    if config.uefa_group_winners_separated && !group_winner_allowed(team, group) {
        return false;
    }
    confederations_allowed(team, group)
}
