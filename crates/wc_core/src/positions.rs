//! Group position table.
//!
//! Each group holds one team per pot, but the schedule refers to positions
//! (A1..A4) and position n is not pot n. Position 1 is always the pot 1 team.

use crate::error::{DrawError, Result};
use crate::models::group_index;

/// Pot at positions 1-4, per group A-L.
const POSITION_TO_POT: [[u8; 4]; 12] = [
    [1, 3, 2, 4], // A
    [1, 4, 3, 2], // B
    [1, 2, 4, 3], // C
    [1, 3, 2, 4], // D
    [1, 4, 3, 2], // E
    [1, 2, 4, 3], // F
    [1, 3, 2, 4], // G
    [1, 4, 3, 2], // H
    [1, 2, 4, 3], // I
    [1, 3, 2, 4], // J
    [1, 4, 3, 2], // K
    [1, 2, 4, 3], // L
];

fn row(group: char, kind: &'static str, value: u8) -> Result<&'static [u8; 4]> {
    let invalid = || DrawError::InvalidPositionKey { group, kind, value };
    if !(1..=4).contains(&value) {
        return Err(invalid());
    }
    group_index(group)
        .map(|i| &POSITION_TO_POT[i])
        .ok_or_else(invalid)
}

/// Pot of the team at `position` (1-4) in `group`.
pub fn pot_for_position(group: char, position: u8) -> Result<u8> {
    let row = row(group, "position", position)?;
    Ok(row[usize::from(position - 1)])
}

/// Position (1-4) taken by the pot `pot` team in `group`.
pub fn position_for_pot(group: char, pot: u8) -> Result<u8> {
    let row = row(group, "pot", pot)?;
    row.iter()
        .position(|&p| p == pot)
        .map(|i| i as u8 + 1)
        .ok_or(DrawError::InvalidPositionKey {
            group,
            kind: "pot",
            value: pot,
        })
}

/// Pots in position order 1-4.
pub fn position_order(group: char) -> Result<[u8; 4]> {
    row(group, "position", 1).copied()
}
