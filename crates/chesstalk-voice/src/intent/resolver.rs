use chesstalk_core::{CommandError, MoveCandidate, PieceKind, Square};
use serde::Serialize;

/// A legal move picked for a spoken piece + destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedMove {
    pub piece: PieceKind,
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
    pub san: String,
}

/// Match a piece and destination against the engine's legal moves.
///
/// Pawns reaching the back rank always promote to a queen. When several
/// candidates match (two knights reaching the same square), the first one in
/// the engine's enumeration order is taken.
pub fn resolve_move(
    piece: PieceKind,
    destination: Square,
    candidates: &[MoveCandidate],
) -> Result<ResolvedMove, CommandError> {
    let matching: Vec<&MoveCandidate> = candidates
        .iter()
        .filter(|c| c.piece == piece && c.to == destination)
        .collect();

    let first = *matching.first().ok_or(CommandError::NoLegalMove {
        piece,
        square: destination,
    })?;

    let promotion =
        (piece == PieceKind::Pawn && destination.is_back_rank()).then_some(PieceKind::Queen);
    let chosen = matching
        .iter()
        .copied()
        .find(|c| c.from == first.from && c.promotion == promotion)
        .unwrap_or(first);

    let origins = matching
        .iter()
        .map(|c| c.from)
        .collect::<std::collections::BTreeSet<_>>();
    if origins.len() > 1 {
        tracing::debug!(
            "Ambiguous {} to {destination}: {} origins, taking {}",
            piece.symbol(),
            origins.len(),
            chosen.from
        );
    }

    Ok(ResolvedMove {
        piece,
        from: chosen.from,
        to: chosen.to,
        promotion,
        san: chosen.san.clone(),
    })
}
