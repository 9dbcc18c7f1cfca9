//! Full draw: pot 1, then pots 2-4, with fallbacks.
//!
//! Primary order is 2, 3, 4. On placement exhaustion the draw is repeated in
//! each alternate order (pot 1 redrawn from the same RNG stream), and as a
//! last resort pots 2-4 are solved together on top of the first pot 1 draw.

use super::backtrack::{solve, standard_eligibility};
use super::placement::draw_pot;
use super::pot1::draw_pot1;
use super::{DrawOutcome, Fallback};
use crate::config::{DrawConfig, DrawOptions};
use crate::error::{DrawError, Result};
use crate::models::{Groups, Pots, Team};
use rand::rngs::OsRng;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

pub const CLASSICAL_ORDER: [u8; 3] = [2, 3, 4];

pub const ALTERNATE_ORDERINGS: [[u8; 3]; 3] = [[2, 4, 3], [4, 2, 3], [3, 4, 2]];

/// A fresh seed from the operating system, for draws run without one.
pub fn fresh_seed() -> u32 {
    OsRng.gen()
}

pub fn run_full_draw<'a>(
    pots: &'a Pots,
    seed: Option<u32>,
    options: &DrawOptions,
    config: &DrawConfig,
) -> Result<DrawOutcome<'a>> {
    let seed = seed.unwrap_or_else(fresh_seed);
    let mut rng = ChaCha8Rng::seed_from_u64(u64::from(seed));

    let pot1 = draw_pot1(pots.pot(1), &mut rng, config)?;
    let primary = match place_pots(pots, pot1, &CLASSICAL_ORDER, &mut rng, options, config) {
        Ok(groups) => {
            return Ok(DrawOutcome {
                groups,
                seed,
                fallback: None,
            })
        }
        Err(err) if err.is_recoverable() => err,
        Err(err) => return Err(err),
    };
    debug!(seed, error = %primary, "classical pot order failed");

    for ordering in ALTERNATE_ORDERINGS {
        let attempt = draw_pot1(pots.pot(1), &mut rng, config)
            .and_then(|start| place_pots(pots, start, &ordering, &mut rng, options, config));
        match attempt {
            Ok(groups) => {
                info!(seed, ?ordering, "draw resolved by alternate pot order");
                return Ok(DrawOutcome {
                    groups,
                    seed,
                    fallback: Some(Fallback::AlternateOrdering {
                        ordering: ordering.to_vec(),
                    }),
                });
            }
            Err(err) if err.is_recoverable() => {
                debug!(seed, ?ordering, error = %err, "alternate pot order failed");
            }
            Err(err) => return Err(err),
        }
    }

    let teams: Vec<&'a Team> = (2..=4).flat_map(|p| pots.pot(p)).collect();
    match solve(
        &teams,
        pot1,
        &standard_eligibility(config),
        options.backtrack_node_limit,
    ) {
        Ok(groups) => {
            info!(seed, "draw resolved by global backtracking");
            Ok(DrawOutcome {
                groups,
                seed,
                fallback: Some(Fallback::GlobalBacktracking),
            })
        }
        Err(err) => {
            debug!(seed, error = %err, "global backtracking failed");
            Err(DrawError::InfeasibleSeed {
                seed,
                cause: Box::new(primary),
            })
        }
    }
}

/// Place pots in `order` on top of a pot 1 placement. Pots 3 and 4 may be
/// placed before the groups reach their expected size.
fn place_pots<'a, R: Rng + ?Sized>(
    pots: &'a Pots,
    start: Groups<'a>,
    order: &[u8],
    rng: &mut R,
    options: &DrawOptions,
    config: &DrawConfig,
) -> Result<Groups<'a>> {
    order.iter().try_fold(start, |groups, &pot| {
        draw_pot(pots.pot(pot), groups, rng, options, pot >= 3, config)
    })
}
