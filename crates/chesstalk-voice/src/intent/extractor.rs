use chesstalk_core::{CommandError, PieceKind, Square};
use serde::Serialize;

use super::normalizer::NormalizedCommand;
use crate::vocabulary::TokenCategory;

/// Piece and destination pulled out of a Move utterance. Both optional until validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MoveParameters {
    pub piece: Option<PieceKind>,
    pub destination: Option<Square>,
}

impl MoveParameters {
    /// A Move with either field missing is invalid.
    pub fn validate(self) -> Result<(PieceKind, Square), CommandError> {
        match (self.piece, self.destination) {
            (Some(piece), Some(square)) => Ok((piece, square)),
            _ => Err(CommandError::MissingParameter),
        }
    }
}

/// Piece: first piece token after the leading word. Destination: last square,
/// either as one token ("e4") or as a file letter followed by a rank digit ("e 4").
pub fn extract_move(cmd: &NormalizedCommand) -> MoveParameters {
    let piece = cmd
        .tokens
        .iter()
        .skip(1)
        .filter(|t| t.category == Some(TokenCategory::Piece))
        .find_map(|t| PieceKind::from_token(&t.canonical));

    MoveParameters {
        piece,
        destination: last_square(cmd),
    }
}

fn last_square(cmd: &NormalizedCommand) -> Option<Square> {
    let tokens = &cmd.tokens;
    for i in (0..tokens.len()).rev() {
        if let Some(square) = Square::parse(&tokens[i].canonical) {
            return Some(square);
        }
        if i > 0 {
            if let Some(square) = split_square(&tokens[i - 1].spoken, &tokens[i].spoken) {
                return Some(square);
            }
        }
    }
    None
}

fn split_square(file: &str, rank: &str) -> Option<Square> {
    let mut file_chars = file.chars();
    let mut rank_chars = rank.chars();
    match (
        file_chars.next(),
        file_chars.next(),
        rank_chars.next(),
        rank_chars.next(),
    ) {
        (Some(f), None, Some(r), None) => Square::from_parts(f, r),
        _ => None,
    }
}
