//! Deterministic backtracking solver shared by the per-pot fallback and the
//! cross-pot global solve.
//!
//! Teams are assigned most-constrained first (fewest open groups, first in
//! input order on ties). Candidate groups are tried in label order. A branch
//! is cut when an unplaced team has no open group, or when the unplaced teams
//! of a pot can no longer cover every group still missing that pot.

use crate::config::DrawConfig;
use crate::draw::eligibility::is_eligible;
use crate::error::{DrawError, Result};
use crate::models::{group_index, Groups, Team, GROUP_COUNT, POT_COUNT};
use tracing::{debug, warn};

enum Step<'a> {
    Found(Groups<'a>),
    DeadEnd,
    Aborted,
}

struct Search<'f, F> {
    eligible: &'f F,
    nodes: u64,
    limit: Option<u64>,
}

/// The usual eligibility for a backtracking search: fixed-group teams may only
/// take their own group, everyone else any open group that passes
/// [`is_eligible`].
pub fn standard_eligibility<'c>(
    config: &'c DrawConfig,
) -> impl Fn(&Team, usize, &Groups) -> bool + 'c {
    move |team, index, groups| {
        if let Some(label) = team.fixed_group {
            if group_index(label) != Some(index) {
                return false;
            }
        }
        let group = groups.at(index);
        !group.is_full() && is_eligible(team, group, config)
    }
}

/// Place every team in `teams` on top of `start`.
///
/// Returns the first complete assignment found. Fails with
/// `BacktrackExhausted` when the search space is empty, or with
/// `BacktrackLimitReached` when `node_limit` cut the search short.
pub fn solve<'a, F>(
    teams: &[&'a Team],
    start: Groups<'a>,
    eligible: &F,
    node_limit: Option<u64>,
) -> Result<Groups<'a>>
where
    F: Fn(&Team, usize, &Groups) -> bool,
{
    let mut search = Search {
        eligible,
        nodes: 0,
        limit: node_limit,
    };
    let mut remaining = teams.to_vec();
    match search.run(start, &mut remaining) {
        Step::Found(groups) => {
            debug!(nodes = search.nodes, teams = teams.len(), "backtracking solved");
            Ok(groups)
        }
        Step::DeadEnd => Err(DrawError::BacktrackExhausted {
            nodes: search.nodes,
        }),
        Step::Aborted => {
            let limit = node_limit.unwrap_or(search.nodes);
            warn!(limit, teams = teams.len(), "backtracking hit node limit");
            Err(DrawError::BacktrackLimitReached { limit })
        }
    }
}

impl<'f, F> Search<'f, F>
where
    F: Fn(&Team, usize, &Groups) -> bool,
{
    fn run<'a>(&mut self, groups: Groups<'a>, remaining: &mut Vec<&'a Team>) -> Step<'a> {
        if remaining.is_empty() {
            return Step::Found(groups);
        }
        self.nodes += 1;
        if self.limit.is_some_and(|limit| self.nodes > limit) {
            return Step::Aborted;
        }

        let options: Vec<Vec<usize>> = remaining
            .iter()
            .map(|&team| {
                (0..GROUP_COUNT)
                    .filter(|&i| (self.eligible)(team, i, &groups))
                    .collect()
            })
            .collect();
        if options.iter().any(Vec::is_empty) || !covers_open_groups(remaining, &options, &groups)
        {
            return Step::DeadEnd;
        }

        let mut pick = 0;
        for (i, opts) in options.iter().enumerate() {
            if opts.len() < options[pick].len() {
                pick = i;
            }
        }

        let team = remaining.remove(pick);
        for &index in &options[pick] {
            let mut next = groups;
            if !next.place(index, team) {
                continue;
            }
            match self.run(next, remaining) {
                Step::DeadEnd => continue,
                done => {
                    remaining.insert(pick, team);
                    return done;
                }
            }
        }
        remaining.insert(pick, team);
        Step::DeadEnd
    }
}

/// When a pot has exactly as many unplaced teams as groups missing that pot,
/// each of those groups has to be reachable by at least one of the teams.
fn covers_open_groups(remaining: &[&Team], options: &[Vec<usize>], groups: &Groups) -> bool {
    for pot in 1..=POT_COUNT as u8 {
        let mut count = 0usize;
        let mut reachable = 0u16;
        for (team, opts) in remaining.iter().zip(options) {
            if team.pot == pot {
                count += 1;
                reachable |= opts.iter().fold(0u16, |mask, &i| mask | (1 << i));
            }
        }
        if count == 0 {
            continue;
        }
        let missing: Vec<usize> = (0..GROUP_COUNT)
            .filter(|&i| !groups.at(i).has_pot(pot))
            .collect();
        if count > missing.len() {
            return false;
        }
        if count == missing.len() && missing.iter().any(|&i| reachable & (1 << i) == 0) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confederation, ConfederationSet};

    fn seeds() -> Vec<Team> {
        vec![
            Team::new("Spain", Confederation::Uefa, 1),
            Team::new("Argentina", Confederation::Conmebol, 1),
            Team::new("Mexico", Confederation::Concacaf, 1),
        ]
    }

    fn start(pot1: &[Team]) -> Groups<'_> {
        let mut groups = Groups::new();
        for (i, team) in pot1.iter().enumerate() {
            assert!(groups.place(i, team));
        }
        groups
    }

    fn first_three(config: &DrawConfig) -> impl Fn(&Team, usize, &Groups) -> bool + '_ {
        let standard = standard_eligibility(config);
        move |team, index, groups| index < 3 && standard(team, index, groups)
    }

    fn pot2() -> Vec<Team> {
        vec![
            Team::new("Japan", Confederation::Afc, 2),
            Team::new("Ghana", Confederation::Caf, 2),
            Team::new("Iran", Confederation::Afc, 2),
        ]
    }

    #[test]
    fn test_solves_constrained_assignment() {
        let pot1 = seeds();
        let pot2 = vec![
            Team::new("Uruguay", Confederation::Conmebol, 2),
            Team::new("Panama", Confederation::Concacaf, 2),
            Team::new("Japan", Confederation::Afc, 2),
        ];
        let teams: Vec<&Team> = pot2.iter().collect();
        let config = DrawConfig::default();
        let groups = solve(&teams, start(&pot1), &first_three(&config), None).unwrap();

        assert_ne!(groups.find("Uruguay"), Some('B'));
        assert_ne!(groups.find("Panama"), Some('C'));
        assert_eq!(groups.total_teams(), 6);
        assert!((0..3).all(|i| groups.at(i).len() == 2));
    }

    #[test]
    fn test_deterministic() {
        let pot1 = seeds();
        let pot2 = pot2();
        let teams: Vec<&Team> = pot2.iter().collect();
        let config = DrawConfig::default();
        let eligible = first_three(&config);
        let a = solve(&teams, start(&pot1), &eligible, None).unwrap();
        let b = solve(&teams, start(&pot1), &eligible, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_infeasible_reports_exhaustion() {
        let pot1 = seeds();
        // Both placeholders need room in CONMEBOL and CONCACAF, so only
        // Spain's group can take them.
        let ph = "CONMEBOL|CONCACAF".parse::<ConfederationSet>().unwrap();
        let pot2 = vec![
            Team::new("Playoff 1", ph.clone(), 2),
            Team::new("Playoff 2", ph, 2),
            Team::new("Japan", Confederation::Afc, 2),
        ];
        let teams: Vec<&Team> = pot2.iter().collect();
        let config = DrawConfig::default();
        let err = solve(&teams, start(&pot1), &first_three(&config), None).unwrap_err();
        assert!(matches!(err, DrawError::BacktrackExhausted { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_node_limit_aborts() {
        let pot1 = seeds();
        let pot2 = pot2();
        let teams: Vec<&Team> = pot2.iter().collect();
        let config = DrawConfig::default();
        let err = solve(&teams, start(&pot1), &first_three(&config), Some(1)).unwrap_err();
        assert_eq!(err, DrawError::BacktrackLimitReached { limit: 1 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_fixed_group_respected() {
        let pot1 = seeds();
        let mut pot2 = pot2();
        pot2[0].fixed_group = Some('C');
        let teams: Vec<&Team> = pot2.iter().collect();
        let config = DrawConfig::default();
        let groups = solve(&teams, start(&pot1), &first_three(&config), None).unwrap();
        assert_eq!(groups.find("Japan"), Some('C'));
    }

    #[test]
    fn test_coverage_check() {
        let pot1 = seeds();
        let fillers: Vec<Team> = (3..GROUP_COUNT)
            .map(|i| Team::new(format!("Filler {}", i), Confederation::Ofc, 2))
            .collect();
        let mut groups = start(&pot1);
        for (offset, team) in fillers.iter().enumerate() {
            assert!(groups.place(offset + 3, team));
        }

        let pot2 = [
            Team::new("Uruguay", Confederation::Conmebol, 2),
            Team::new("Paraguay", Confederation::Conmebol, 2),
            Team::new("Chile", Confederation::Conmebol, 2),
        ];
        let remaining: Vec<&Team> = pot2.iter().collect();

        // A, B and C lack pot 2; nobody can reach B.
        let blocked = vec![vec![0, 2], vec![0, 2], vec![0, 2]];
        assert!(!covers_open_groups(&remaining, &blocked, &groups));

        let open = vec![vec![0, 2], vec![1], vec![0, 2]];
        assert!(covers_open_groups(&remaining, &open, &groups));

        // Four teams for three open groups can never fit.
        let extra = Team::new("Bolivia", Confederation::Conmebol, 2);
        let mut crowded = remaining.clone();
        crowded.push(&extra);
        let mut crowded_opts = open.clone();
        crowded_opts.push(vec![0]);
        assert!(!covers_open_groups(&crowded, &crowded_opts, &groups));
    }
}
