//! Utterance → intent pipeline: normalize, classify, extract, resolve.

pub mod classifier;
pub mod extractor;
pub mod normalizer;
pub mod resolver;

use chesstalk_core::CastleSide;
use serde::Serialize;

pub use classifier::{IntentClassifier, IntentRule};
pub use extractor::{extract_move, MoveParameters};
pub use normalizer::{normalize, NormalizedCommand, Token};
pub use resolver::{resolve_move, ResolvedMove};

/// Classified purpose of one utterance, before its parameters are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", rename_all = "snake_case")]
pub enum Intent {
    Move,
    Castle { side: CastleSide },
    Resign,
    OfferDraw,
    Undo,
    ReadHistory,
    Unrecognized { reason: String },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::Move => "move",
            Intent::Castle { .. } => "castle",
            Intent::Resign => "resign",
            Intent::OfferDraw => "offer_draw",
            Intent::Undo => "undo",
            Intent::ReadHistory => "read_history",
            Intent::Unrecognized { .. } => "unrecognized",
        }
    }
}
