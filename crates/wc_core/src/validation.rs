//! Structural checks on a finished draw.

use crate::bracket::validate_top4_separation;
use crate::config::DrawConfig;
use crate::models::{group_index, Confederation, Groups, Pots, POT_COUNT};

/// Every rule a completed draw must satisfy under `config`. Returns the list
/// of violations; empty means the draw is valid.
pub fn validate_groups(groups: &Groups, pots: &Pots, config: &DrawConfig) -> Vec<String> {
    let mut errors = Vec::new();

    for (label, group) in groups.iter() {
        if group.len() != POT_COUNT {
            errors.push(format!(
                "Group {} has {} teams (expected {})",
                label,
                group.len(),
                POT_COUNT
            ));
        }
        for pot in 1..=POT_COUNT as u8 {
            if !group.has_pot(pot) {
                errors.push(format!("Group {} has no pot {} team", label, pot));
            }
        }
        for conf in Confederation::ALL {
            let count = group.occupancy(conf);
            if count > conf.cap() {
                errors.push(format!(
                    "Group {} has {} {} teams (max {})",
                    label,
                    count,
                    conf,
                    conf.cap()
                ));
            }
        }
        if config.uefa_group_winners_separated {
            let winners: Vec<&str> = group
                .teams()
                .filter(|t| t.uefa_group_winner)
                .map(|t| t.name.as_str())
                .collect();
            if winners.len() > 1 {
                errors.push(format!(
                    "Group {} has multiple UEFA group winners: {}",
                    label,
                    winners.join(", ")
                ));
            }
        }
    }

    for team in pots.all_teams().filter(|t| t.host) {
        let Some(fixed) = team.fixed_group else {
            continue;
        };
        match groups.find(&team.name) {
            Some(actual) if actual == fixed => {}
            Some(actual) => errors.push(format!(
                "Host {} is in group {} instead of {}",
                team.name, actual, fixed
            )),
            None if group_index(fixed).is_some() => {
                errors.push(format!("Host {} was not drawn", team.name))
            }
            None => {}
        }
    }

    if config.fifa_official_constraints {
        errors.extend(validate_top4_separation(groups, pots.pot(1)));
    }

    errors
}
