pub mod config;
pub mod error;
pub mod interfaces;
pub mod language;
pub mod lifecycle;

pub use error::{CommandError, RulesError, RulesResult};
pub use interfaces::{
    AppliedMove, BoardRenderer, CastleSide, Color, GameOutcome, LegalDestinations, MoveCandidate,
    PieceKind, RulesEngine, SpeechOutput, Square,
};
pub use language::{Language, Phrase};
