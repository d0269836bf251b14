//! Shared chess types and the collaborator contracts the interpreter consumes.
//!
//! The interpreter never owns chess rules, rendering or audio. It reaches them
//! through the traits below; `chesstalk-rules` and the binary provide the
//! concrete implementations.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RulesError, RulesResult};
use crate::language::Language;

/// Side to move / owner of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

/// Piece kind, keyed by the canonical one-letter symbol {p,n,b,r,q,k}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    pub fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.symbol() == c)
    }

    /// Parse a canonical token ("p", "n", ...). Anything longer than one char is not a piece.
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_symbol(c),
            _ => None,
        }
    }
}

/// A board square, `[a-h][1-8]`. File and rank are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Self> {
        (file < 8 && rank < 8).then_some(Self { file, rank })
    }

    /// Parse a well-formed square token such as "e4". Case-sensitive: files are lowercase.
    pub fn parse(token: &str) -> Option<Self> {
        let bytes = token.as_bytes();
        if bytes.len() != 2 {
            return None;
        }
        Self::from_parts(bytes[0] as char, bytes[1] as char)
    }

    /// Build a square from a separate file letter and rank digit.
    pub fn from_parts(file: char, rank: char) -> Option<Self> {
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Some(Self {
            file: file as u8 - b'a',
            rank: rank as u8 - b'1',
        })
    }

    pub fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    pub fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// First or eighth rank, where a pawn promotes.
    pub fn is_back_rank(self) -> bool {
        self.rank == 0 || self.rank == 7
    }

    /// Every square, a1..h8 by file then rank.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|file| (0..8u8).map(move |rank| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> RulesResult<Self> {
        Square::parse(s).ok_or_else(|| RulesError::InvalidSquare(s.to_string()))
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = RulesError;

    fn try_from(value: String) -> RulesResult<Self> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CastleSide {
    Kingside,
    Queenside,
}

impl CastleSide {
    pub fn notation(self) -> &'static str {
        match self {
            CastleSide::Kingside => "O-O",
            CastleSide::Queenside => "O-O-O",
        }
    }
}

/// One legal move as enumerated by the rules engine. Read-only for the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCandidate {
    pub piece: PieceKind,
    pub from: Square,
    /// Destination of the moving piece; for castling this is the king's target square.
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub castle: Option<CastleSide>,
    pub san: String,
}

/// What the rules engine reports back after mutating the position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedMove {
    pub san: String,
    pub color: Color,
}

/// How a game ended, if it has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameOutcome {
    Checkmate { winner: Color },
    Draw,
    DrawAgreed,
    Resignation { resigned: Color },
}

/// Legal destinations for the side to move, keyed by origin square.
pub type LegalDestinations = BTreeMap<Square, Vec<Square>>;

/// Chess rules collaborator. Owns the single mutable current position.
///
/// Implementations must leave the position untouched when a mutation fails.
pub trait RulesEngine: Send {
    /// Legal moves of the side to move, in the engine's enumeration order.
    fn legal_moves(&self) -> Vec<MoveCandidate>;

    fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> RulesResult<AppliedMove>;

    fn apply_castle(&mut self, side: CastleSide) -> RulesResult<AppliedMove>;

    /// Take back the last move. `None` when there is nothing to undo.
    fn undo(&mut self) -> Option<AppliedMove>;

    fn history_san(&self) -> Vec<String>;
    fn is_check(&self) -> bool;
    fn is_checkmate(&self) -> bool;
    fn is_draw(&self) -> bool;
    fn turn(&self) -> Color;
    fn fen(&self) -> String;

    /// Back to the starting position with an empty history.
    fn reset(&mut self);

    fn is_terminal(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }

    fn legal_destinations(&self) -> LegalDestinations {
        let mut dests = LegalDestinations::new();
        for candidate in self.legal_moves() {
            let entry = dests.entry(candidate.from).or_default();
            if !entry.contains(&candidate.to) {
                entry.push(candidate.to);
            }
        }
        dests
    }
}

/// Board-rendering sink. Receives the new position after every accepted command.
pub trait BoardRenderer: Send {
    fn render(&mut self, fen: &str, dests: &LegalDestinations);
}

/// Speech synthesis sink. Fire-and-forget; a new call supersedes one still playing.
pub trait SpeechOutput: Send {
    fn speak(&mut self, text: &str, language: Language);

    /// Stop whatever is currently playing. Default is a no-op for sinks without playback.
    fn cancel(&mut self) {}
}
