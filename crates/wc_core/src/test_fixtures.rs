//! Test Fixtures Module
//!
//! The 2026 pots as used by the engine tests.
//!
//! ## Usage
//! ```rust,ignore
//! use crate::test_fixtures::*;
//! ```

use crate::models::{Confederation, ConfederationSet, Pots, Team};

use Confederation::{Afc, Caf, Concacaf, Conmebol, Ofc, Uefa};

// =============================================================================
// Roster
// =============================================================================

fn placeholder(name: &str, confederations: &str) -> Team {
    let set = confederations
        .parse::<ConfederationSet>()
        .unwrap_or_else(|e| panic!("bad fixture confederations {}: {}", confederations, e));
    Team::new(name, set, 4)
}

/// The 48 teams in their 2026 pots. Hosts are fixed to A, B and D; the
/// twelve UEFA qualifying group winners are marked.
pub fn pots_2026() -> Pots {
    let teams = vec![
        // Pot 1
        Team::new("Mexico", Concacaf, 1).host_of('A').ranked(15),
        Team::new("Canada", Concacaf, 1).host_of('B').ranked(27),
        Team::new("United States", Concacaf, 1).host_of('D').ranked(14),
        Team::new("Spain", Uefa, 1).ranked(1).group_winner(),
        Team::new("Argentina", Conmebol, 1).ranked(2),
        Team::new("France", Uefa, 1).ranked(3).group_winner(),
        Team::new("England", Uefa, 1).ranked(4).group_winner(),
        Team::new("Brazil", Conmebol, 1).ranked(5),
        Team::new("Portugal", Uefa, 1).ranked(6).group_winner(),
        Team::new("Netherlands", Uefa, 1).ranked(7).group_winner(),
        Team::new("Belgium", Uefa, 1).ranked(8).group_winner(),
        Team::new("Germany", Uefa, 1).ranked(9).group_winner(),
        // Pot 2
        Team::new("Croatia", Uefa, 2).ranked(10).group_winner(),
        Team::new("Morocco", Caf, 2).ranked(11),
        Team::new("Colombia", Conmebol, 2).ranked(13),
        Team::new("Uruguay", Conmebol, 2).ranked(16),
        Team::new("Switzerland", Uefa, 2).ranked(17).group_winner(),
        Team::new("Japan", Afc, 2).ranked(18),
        Team::new("Senegal", Caf, 2).ranked(19),
        Team::new("Iran", Afc, 2).ranked(20),
        Team::new("South Korea", Afc, 2).ranked(22),
        Team::new("Ecuador", Conmebol, 2).ranked(23),
        Team::new("Austria", Uefa, 2).ranked(24).group_winner(),
        Team::new("Australia", Afc, 2).ranked(26),
        // Pot 3
        Team::new("Norway", Uefa, 3).ranked(29).group_winner(),
        Team::new("Panama", Concacaf, 3).ranked(30),
        Team::new("Egypt", Caf, 3).ranked(34),
        Team::new("Algeria", Caf, 3).ranked(35),
        Team::new("Scotland", Uefa, 3).ranked(36).group_winner(),
        Team::new("Paraguay", Conmebol, 3).ranked(39),
        Team::new("Tunisia", Caf, 3).ranked(40),
        Team::new("Ivory Coast", Caf, 3).ranked(42),
        Team::new("Uzbekistan", Afc, 3).ranked(50),
        Team::new("Qatar", Afc, 3).ranked(51),
        Team::new("Saudi Arabia", Afc, 3).ranked(60),
        Team::new("South Africa", Caf, 3).ranked(61),
        // Pot 4
        Team::new("Jordan", Afc, 4).ranked(66),
        Team::new("Cape Verde", Caf, 4).ranked(68),
        Team::new("Ghana", Caf, 4).ranked(72),
        Team::new("Curaçao", Concacaf, 4).ranked(82),
        Team::new("Haiti", Concacaf, 4).ranked(84),
        Team::new("New Zealand", Ofc, 4).ranked(86),
        Team::new("UEFA Playoff A", Uefa, 4).ranked(12),
        Team::new("UEFA Playoff B", Uefa, 4).ranked(20),
        Team::new("UEFA Playoff C", Uefa, 4).ranked(25),
        Team::new("UEFA Playoff D", Uefa, 4).ranked(21),
        placeholder("Intercontinental Playoff 1", "CAF|CONCACAF|OFC"),
        placeholder("Intercontinental Playoff 2", "AFC|CONMEBOL|CONCACAF"),
    ];
    Pots::from_teams(teams)
}

/// The 2026 pots with the team called `name` swapped for `replacement`.
pub fn pots_2026_with(name: &str, replacement: Team) -> Pots {
    let teams = pots_2026()
        .all_teams()
        .map(|t| {
            if t.name == name {
                replacement.clone()
            } else {
                t.clone()
            }
        })
        .collect::<Vec<_>>();
    Pots::from_teams(teams)
}
