//! Pot assignment by FIFA ranking.
//!
//! Hosts (by name) open pot 1, the best-ranked teams fill it up to twelve,
//! then twelve each go to pots 2 and 3 and the rest to pot 4. Unless UEFA
//! playoff paths are seeded, they skip the ranking and go to pot 4.

use crate::config::DrawConfig;
use crate::models::{Pots, Team};
use tracing::debug;

const PLAYOFF_PREFIX: &str = "UEFA Playoff";

pub fn assign_pots(pots: &Pots, config: &DrawConfig) -> Pots {
    let mut hosts: Vec<Team> = pots.all_teams().filter(|t| t.host).cloned().collect();
    hosts.sort_by(|a, b| a.name.cmp(&b.name));

    let (mut ranked, playoffs): (Vec<Team>, Vec<Team>) = pots
        .all_teams()
        .filter(|t| !t.host)
        .cloned()
        .partition(|t| config.uefa_playoffs_seeded || !t.name.starts_with(PLAYOFF_PREFIX));
    ranked.sort_by_key(Team::ranking_key);

    let pot1_free = Pots::TEAMS_PER_POT.saturating_sub(hosts.len());
    let mut ranked = ranked.into_iter();
    let mut assigned = Pots::new();
    let mut put = |team: Team, pot: u8| assigned.push(Team { pot, ..team });

    for team in hosts {
        put(team, 1);
    }
    for team in ranked.by_ref().take(pot1_free) {
        put(team, 1);
    }
    for pot in 2..=3 {
        for team in ranked.by_ref().take(Pots::TEAMS_PER_POT) {
            put(team, pot);
        }
    }
    for team in ranked.chain(playoffs) {
        put(team, 4);
    }

    debug!(
        seeded_playoffs = config.uefa_playoffs_seeded,
        teams = assigned.len(),
        "pots reassigned by ranking"
    );
    assigned
}
