//! Placement of one pot (2-4) onto groups that already hold pot 1.
//!
//! Randomized greedy attempts come first. Each attempt works on its own copy
//! of the groups and is thrown away on the first team with nowhere to go.
//! When every attempt fails the pot falls back to the backtracking solver.

use crate::config::{DrawConfig, DrawOptions};
use crate::draw::backtrack::{solve, standard_eligibility};
use crate::draw::eligibility::is_eligible;
use crate::error::{DrawError, Result};
use crate::models::{group_index, Groups, Team, GROUP_COUNT};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info};

/// Groups `team` may join in the current state.
///
/// `expected` is the size groups should have before this pot is drawn. When
/// no group has that size the least-filled eligible groups are used instead,
/// but only if early placement is allowed or the pot is drawn before its
/// turn.
pub fn candidate_groups(
    team: &Team,
    groups: &Groups,
    expected: usize,
    allow_early: bool,
    config: &DrawConfig,
) -> Vec<usize> {
    if let Some(label) = team.fixed_group {
        return group_index(label)
            .filter(|&i| !groups.at(i).is_full() && is_eligible(team, groups.at(i), config))
            .into_iter()
            .collect();
    }

    let open: Vec<usize> = (0..GROUP_COUNT)
        .filter(|&i| !groups.at(i).is_full() && is_eligible(team, groups.at(i), config))
        .collect();

    if team.pot == 4 {
        let untouched: Vec<usize> = open
            .iter()
            .copied()
            .filter(|&i| groups.at(i).len() == 1)
            .collect();
        return if untouched.is_empty() { open } else { untouched };
    }

    let exact: Vec<usize> = open
        .iter()
        .copied()
        .filter(|&i| groups.at(i).len() == expected)
        .collect();
    if !exact.is_empty() {
        return exact;
    }

    let early = expected > groups.max_len();
    if !(allow_early || early) {
        return Vec::new();
    }
    let Some(least) = open.iter().map(|&i| groups.at(i).len()).min() else {
        return Vec::new();
    };
    open.into_iter()
        .filter(|&i| groups.at(i).len() == least)
        .collect()
}

/// Place every team of `pot` (all from the same pot) and return the new
/// groups. `groups` itself is never touched.
pub fn draw_pot<'a, R: Rng + ?Sized>(
    pot: &'a [Team],
    groups: Groups<'a>,
    rng: &mut R,
    options: &DrawOptions,
    allow_early: bool,
    config: &DrawConfig,
) -> Result<Groups<'a>> {
    let Some(pot_number) = pot.first().map(|t| t.pot) else {
        return Ok(groups);
    };
    let expected = usize::from(pot_number.saturating_sub(1));

    let mut order: Vec<&'a Team> = pot.iter().collect();
    for attempt in 1..=options.max_attempts {
        order.shuffle(rng);
        if pot_number == 4 {
            // Placeholders and playoff slots are the hardest to fit.
            let (special, rest): (Vec<&'a Team>, Vec<&'a Team>) =
                order.drain(..).partition(|t| t.is_special());
            order = special.into_iter().chain(rest).collect();
        }

        if let Some(placed) = attempt_pot(&order, groups, rng, expected, allow_early, config) {
            if attempt > 1 {
                debug!(pot = pot_number, attempt, "pot placed after retries");
            }
            return Ok(placed);
        }
    }

    info!(
        pot = pot_number,
        attempts = options.max_attempts,
        "randomized placement exhausted, backtracking"
    );
    let teams: Vec<&'a Team> = pot.iter().collect();
    solve(
        &teams,
        groups,
        &standard_eligibility(config),
        options.backtrack_node_limit,
    )
    .map_err(|_| DrawError::UnplaceablePot {
        pot: pot_number,
        attempts: options.max_attempts,
    })
}

fn attempt_pot<'a, R: Rng + ?Sized>(
    order: &[&'a Team],
    start: Groups<'a>,
    rng: &mut R,
    expected: usize,
    allow_early: bool,
    config: &DrawConfig,
) -> Option<Groups<'a>> {
    let mut working = start;
    for &team in order {
        let candidates = candidate_groups(team, &working, expected, allow_early, config);
        let index = match team.fixed_group {
            Some(_) => candidates.first().copied()?,
            None => candidates.choose(rng).copied()?,
        };
        if !working.place(index, team) {
            return None;
        }
    }
    Some(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::pot1::draw_pot1;
    use crate::models::{Confederation, ConfederationSet};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team(name: &str, conf: Confederation, pot: u8) -> Team {
        Team::new(name, conf, pot)
    }

    fn pot1() -> Vec<Team> {
        vec![
            team("Mexico", Confederation::Concacaf, 1).host_of('A'),
            team("Canada", Confederation::Concacaf, 1).host_of('B'),
            team("United States", Confederation::Concacaf, 1).host_of('D'),
            team("Spain", Confederation::Uefa, 1),
            team("Argentina", Confederation::Conmebol, 1),
            team("France", Confederation::Uefa, 1),
            team("England", Confederation::Uefa, 1),
            team("Brazil", Confederation::Conmebol, 1),
            team("Portugal", Confederation::Uefa, 1),
            team("Netherlands", Confederation::Uefa, 1),
            team("Belgium", Confederation::Uefa, 1),
            team("Germany", Confederation::Uefa, 1),
        ]
    }

    fn pot2() -> Vec<Team> {
        vec![
            team("Croatia", Confederation::Uefa, 2),
            team("Morocco", Confederation::Caf, 2),
            team("Colombia", Confederation::Conmebol, 2),
            team("Uruguay", Confederation::Conmebol, 2),
            team("Switzerland", Confederation::Uefa, 2),
            team("Japan", Confederation::Afc, 2),
            team("Senegal", Confederation::Caf, 2),
            team("Iran", Confederation::Afc, 2),
            team("South Korea", Confederation::Afc, 2),
            team("Ecuador", Confederation::Conmebol, 2),
            team("Austria", Confederation::Uefa, 2),
            team("Australia", Confederation::Afc, 2),
        ]
    }

    #[test]
    fn test_pot2_fills_every_group() {
        let p1 = pot1();
        let p2 = pot2();
        let config = DrawConfig::default();
        let options = DrawOptions::default();
        for seed in 0..25 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
            let placed = draw_pot(&p2, groups, &mut rng, &options, false, &config).unwrap();
            for (label, group) in placed.iter() {
                assert_eq!(group.len(), 2, "group {}", label);
                assert!(group.has_pot(2));
                for conf in Confederation::ALL {
                    assert!(group.occupancy(conf) <= conf.cap(), "group {}", label);
                }
            }
        }
    }

    #[test]
    fn test_input_groups_untouched() {
        let p1 = pot1();
        let p2 = pot2();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let before = groups;
        let _ = draw_pot(&p2, groups, &mut rng, &DrawOptions::default(), false, &config).unwrap();
        assert_eq!(groups, before);
    }

    #[test]
    fn test_empty_pot_is_noop() {
        let p1 = pot1();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let same = draw_pot(&[], groups, &mut rng, &DrawOptions::default(), false, &config);
        assert_eq!(same.unwrap(), groups);
    }

    #[test]
    fn test_backtracking_rescues_zero_attempts() {
        let p1 = pot1();
        let p2 = pot2();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let options = DrawOptions::with_max_attempts(0);
        let placed = draw_pot(&p2, groups, &mut rng, &options, false, &config).unwrap();
        assert_eq!(placed.total_teams(), 24);
    }

    #[test]
    fn test_impossible_pot_is_unplaceable() {
        let p1 = pot1();
        // Twelve CONCACAF teams can never join the three host groups.
        let p2: Vec<Team> = (0..12)
            .map(|i| team(&format!("Island {}", i), Confederation::Concacaf, 2))
            .collect();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let err = draw_pot(&p2, groups, &mut rng, &DrawOptions::with_max_attempts(20), false, &config)
            .unwrap_err();
        assert_eq!(err, DrawError::UnplaceablePot { pot: 2, attempts: 20 });
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_candidates_respect_expected_size() {
        let p1 = pot1();
        let p2 = pot2();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let norway = team("Norway", Confederation::Uefa, 3);

        // Pot 3 before pot 2: nobody has the expected size of two.
        assert!(candidate_groups(&norway, &groups, 2, false, &config).len() == 12);

        let placed = draw_pot(&p2, groups, &mut rng, &DrawOptions::default(), false, &config)
            .unwrap();
        let candidates = candidate_groups(&norway, &placed, 2, false, &config);
        assert!(!candidates.is_empty());
        for i in candidates {
            assert!(placed.at(i).occupancy(Confederation::Uefa) < 2);
        }
    }

    #[test]
    fn test_late_pot2_gets_no_candidates() {
        let p1 = pot1();
        let p2 = pot2();
        let fillers: Vec<Team> = (0..GROUP_COUNT)
            .map(|i| team(&format!("Filler {}", i), Confederation::Ofc, 4))
            .collect();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        for (i, filler) in fillers.iter().enumerate() {
            assert!(groups.place(i, filler));
        }

        let croatia = &p2[0];
        assert!(candidate_groups(croatia, &groups, 1, false, &config).is_empty());
        assert!(!candidate_groups(croatia, &groups, 1, true, &config).is_empty());

        let order: Vec<&Team> = p2.iter().collect();
        assert!(attempt_pot(&order, groups, &mut rng, 1, false, &config).is_none());
    }

    #[test]
    fn test_pot4_prefers_groups_with_only_pot1() {
        let p1 = pot1();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let japan = team("Japan", Confederation::Afc, 2);
        let a = group_index('A').unwrap();
        assert!(groups.place(a, &japan));

        let ghana = team("Ghana", Confederation::Caf, 4);
        let candidates = candidate_groups(&ghana, &groups, 3, true, &config);
        assert_eq!(candidates.len(), 11);
        assert!(!candidates.contains(&a));
    }

    #[test]
    fn test_fixed_group_candidate() {
        let p1 = pot1();
        let config = DrawConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let groups = draw_pot1(&p1, &mut rng, &config).unwrap();
        let mut slot = Team::new(
            "Intercontinental Playoff 1",
            "CAF|CONCACAF|OFC".parse::<ConfederationSet>().unwrap(),
            4,
        );
        slot.fixed_group = Some('A');
        // Mexico already holds the only CONCACAF place in A.
        assert!(candidate_groups(&slot, &groups, 3, true, &config).is_empty());
        slot.fixed_group = Some('L');
        let l = group_index('L').unwrap();
        assert_eq!(candidate_groups(&slot, &groups, 3, true, &config), vec![l]);
    }
}
