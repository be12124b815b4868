//! Rejections raised by the command surface, power prompts and match setup.
//!
//! Every variant is recoverable: the state is left untouched and the caller may retry.

use thiserror::Error;
use crate::role::Role;

/// Coarse category of a [`MatchError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedCommand,
    UnknownEntity,
    IllegalRole,
    PhaseViolation,
    ForcedActionViolation,
    InvalidSelection,
    InsufficientRoles,
    InvalidSetup,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// Command tokens did not match any verb or had the wrong arity
    #[error("usage: {usage}")]
    MalformedCommand {
        usage: &'static str,
    },

    #[error("no such player {0}")]
    UnknownPlayer(String),

    #[error("no such table card {name}: there are {count} table cards")]
    UnknownTableCard {
        name: String,
        count: usize,
    },

    #[error("no such role {0}")]
    UnknownRole(String),

    #[error("the {0} can never be announced")]
    NotAnnounceable(Role),

    #[error("the {0} is not in this match")]
    RoleNotInMatch(Role),

    #[error("you must respond to {claimant}'s claim of {role}")]
    ClaimOutstanding {
        claimant: String,
        role: Role,
    },

    #[error("no role has been announced")]
    NoClaim,

    #[error("it is {active}'s turn, not {actor}'s")]
    NotYourTurn {
        actor: String,
        active: String,
    },

    #[error("the match is over")]
    GameOver,

    #[error("for the first {turns} turns, you must swap (or not)")]
    OpeningTurns {
        turns: u32,
    },

    #[error("because you revealed your card on the previous turn, you must swap (or not)")]
    RevealedLastTurn,

    #[error("you can't swap with yourself, {0}")]
    SelfSwap(String),

    #[error("you must select {expected} different choices, got {actual}")]
    WrongSelectionCount {
        expected: usize,
        actual: usize,
    },

    #[error("you selected {0} twice")]
    DuplicateSelection(String),

    #[error("{0} is not one of the choices")]
    NotACandidate(String),

    #[error("expected yes or no, got {0}")]
    NotABoolean(String),

    #[error("not enough roles ({roles}) for the players ({players})")]
    InsufficientRoles {
        roles: usize,
        players: usize,
    },

    #[error("a match needs at least 2 players, got {0}")]
    NotEnoughPlayers(usize),

    #[error("player {0} is already seated")]
    DuplicatePlayer(String),

    #[error("invalid player name {0:?}")]
    InvalidPlayerName(String),
}

impl MatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchError::MalformedCommand { .. } => ErrorKind::MalformedCommand,
            MatchError::UnknownPlayer(_)
            | MatchError::UnknownTableCard { .. }
            | MatchError::UnknownRole(_) => ErrorKind::UnknownEntity,
            MatchError::NotAnnounceable(_) | MatchError::RoleNotInMatch(_) => ErrorKind::IllegalRole,
            MatchError::ClaimOutstanding { .. }
            | MatchError::NoClaim
            | MatchError::NotYourTurn { .. }
            | MatchError::GameOver => ErrorKind::PhaseViolation,
            MatchError::OpeningTurns { .. } | MatchError::RevealedLastTurn => ErrorKind::ForcedActionViolation,
            MatchError::SelfSwap(_)
            | MatchError::WrongSelectionCount { .. }
            | MatchError::DuplicateSelection(_)
            | MatchError::NotACandidate(_)
            | MatchError::NotABoolean(_) => ErrorKind::InvalidSelection,
            MatchError::InsufficientRoles { .. } => ErrorKind::InsufficientRoles,
            MatchError::NotEnoughPlayers(_)
            | MatchError::DuplicatePlayer(_)
            | MatchError::InvalidPlayerName(_) => ErrorKind::InvalidSetup,
        }
    }
}

pub type Result<T> = std::result::Result<T, MatchError>;
