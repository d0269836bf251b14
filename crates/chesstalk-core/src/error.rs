use thiserror::Error;

use crate::interfaces::{CastleSide, PieceKind};
use crate::language::{Language, Phrase};

/// Failures reported by a rules-engine collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid square: {0}")]
    InvalidSquare(String),
}

pub type RulesResult<T> = Result<T, RulesError>;

/// Recoverable failures of a single voice or UI command.
///
/// None of these are fatal: the dispatcher reports them to the user and leaves
/// game and offer state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Command not recognized")]
    UnrecognizedCommand,

    #[error("Could not identify piece or destination")]
    MissingParameter,

    #[error("Invalid move for {} to {square}", piece.symbol())]
    NoLegalMove {
        piece: PieceKind,
        square: crate::interfaces::Square,
    },

    #[error("Castling not allowed ({})", side.notation())]
    CastlingNotAllowed { side: CastleSide },

    #[error("No moves to undo")]
    NothingToUndo,

    #[error("No pending offer to answer")]
    NoPendingOffer,

    #[error("The game is over")]
    GameOver,

    #[error("Voice recognition error: {code}")]
    Recognition { code: String },

    #[error(transparent)]
    Rules(#[from] RulesError),
}

impl CommandError {
    /// User-facing message in the given language.
    pub fn localized(&self, language: Language) -> String {
        Phrase::Failure(self).render(language)
    }
}
