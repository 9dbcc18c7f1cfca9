use thiserror::Error;

/// Problems with the roster itself. Always fatal; the input data must be fixed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("Unknown confederation code: '{0}'")]
    UnknownConfederation(String),

    #[error("Empty confederation field for {team}")]
    EmptyConfederation { team: String },

    #[error("Invalid pot {pot} for {team} (expected 1-4)")]
    InvalidPot { team: String, pot: u8 },

    #[error("Invalid group letter: '{0}'")]
    InvalidGroup(String),

    #[error("Host {team} has no fixed group")]
    HostWithoutGroup { team: String },

    #[error("Duplicate team name: {0}")]
    DuplicateTeam(String),

    #[error("Pot {pot} has {found} teams, expected {expected}")]
    PotSize {
        pot: u8,
        found: usize,
        expected: usize,
    },

    #[error("Unknown team in draw record: {0}")]
    UnknownTeam(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawError {
    #[error("Invalid fixed group '{group}' for {team}")]
    InvalidFixedGroup { team: String, group: char },

    #[error("Group {group} already has a pot {pot} team")]
    DuplicateGroup { group: char, pot: u8 },

    #[error("Host {team} cannot take group {group} under bracket separation")]
    BracketConflict { team: String, group: char },

    #[error("No available group to place {team}")]
    NoAvailableGroup { team: String },

    #[error("Unable to place pot {pot} after {attempts} attempts")]
    UnplaceablePot { pot: u8, attempts: u32 },

    #[error("Backtracking search exhausted after {nodes} nodes")]
    BacktrackExhausted { nodes: u64 },

    #[error("Backtracking search stopped at the {limit} node limit")]
    BacktrackLimitReached { limit: u64 },

    #[error("Draw infeasible for seed {seed}: {cause}")]
    InfeasibleSeed { seed: u32, cause: Box<DrawError> },

    #[error("Invalid group/{kind} combination: {group}/{value}")]
    InvalidPositionKey {
        group: char,
        kind: &'static str,
        value: u8,
    },

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}

impl DrawError {
    /// Placement exhaustion can be escalated to another strategy; everything
    /// else is either bad input or a seed that has run out of strategies.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DrawError::UnplaceablePot { .. } => true,
            DrawError::BacktrackExhausted { .. } => true,
            DrawError::BacktrackLimitReached { .. } => true,
            DrawError::InvalidFixedGroup { .. } => false,
            DrawError::DuplicateGroup { .. } => false,
            DrawError::BracketConflict { .. } => false,
            DrawError::NoAvailableGroup { .. } => false,
            DrawError::InfeasibleSeed { .. } => false,
            DrawError::InvalidPositionKey { .. } => false,
            DrawError::Roster(_) => false,
        }
    }

    /// Seed attached to an infeasible-seed failure, if any.
    pub fn seed(&self) -> Option<u32> {
        match self {
            DrawError::InfeasibleSeed { seed, .. } => Some(*seed),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DrawError>;
