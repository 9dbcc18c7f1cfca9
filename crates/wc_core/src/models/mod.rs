//! Team, slot, pot and group models

pub mod group;
pub mod pots;
pub mod slot;
pub mod team;

pub use group::{
    group_index, group_label, parse_group, Group, Groups, GROUP_COUNT, GROUP_LABELS, POT_COUNT,
};
pub use pots::Pots;
pub use slot::Slot;
pub use team::{Confederation, ConfederationSet, Team};
