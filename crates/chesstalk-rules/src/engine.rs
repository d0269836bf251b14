use chesstalk_core::{
    AppliedMove, CastleSide, Color, MoveCandidate, PieceKind, RulesEngine, RulesError,
    RulesResult, Square,
};
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::{CastlingMode, CastlingSide, Chess, EnPassantMode, Move, Position, Role};

/// Halfmove clock value at which the fifty-move rule ends the game.
const FIFTY_MOVE_PLIES: u32 = 100;

struct PlayedMove {
    before: Chess,
    applied: AppliedMove,
}

/// `RulesEngine` on top of shakmaty's standard chess position.
///
/// Keeps a stack of previous positions so moves can be taken back.
pub struct ShakmatyEngine {
    start: Chess,
    position: Chess,
    history: Vec<PlayedMove>,
    /// Repetition keys of every position reached, starting position included.
    seen: Vec<String>,
}

impl ShakmatyEngine {
    /// Standard starting position.
    pub fn new() -> Self {
        Self::with_position(Chess::default())
    }

    /// Start from a custom position.
    pub fn from_fen(fen: &str) -> RulesResult<Self> {
        let parsed: Fen = fen
            .trim()
            .parse()
            .map_err(|e: shakmaty::fen::ParseFenError| RulesError::InvalidFen(e.to_string()))?;
        let position: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| RulesError::InvalidFen(e.to_string()))?;
        Ok(Self::with_position(position))
    }

    fn with_position(position: Chess) -> Self {
        let seen = vec![repetition_key(&position)];
        Self {
            start: position.clone(),
            position,
            history: Vec::new(),
            seen,
        }
    }

    fn candidate(&self, m: &Move) -> Option<MoveCandidate> {
        let from = from_shakmaty_square(m.from()?)?;
        let (to, castle) = match m.castling_side() {
            Some(side) => (side.king_to(self.position.turn()), Some(from_castling_side(side))),
            None => (m.to(), None),
        };
        Some(MoveCandidate {
            piece: from_role(m.role()),
            from,
            to: from_shakmaty_square(to)?,
            promotion: m.promotion().map(from_role),
            castle,
            san: San::from_move(&self.position, m).to_string(),
        })
    }

    fn play(&mut self, m: &Move) -> AppliedMove {
        let color = from_color(self.position.turn());
        let before = self.position.clone();
        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, m).to_string();
        self.seen.push(repetition_key(&self.position));

        let applied = AppliedMove { san, color };
        tracing::debug!("Engine applied {} for {:?}", applied.san, applied.color);
        self.history.push(PlayedMove {
            before,
            applied: applied.clone(),
        });
        applied
    }

    fn is_threefold_repetition(&self) -> bool {
        self.seen
            .last()
            .map(|current| self.seen.iter().filter(|key| *key == current).count() >= 3)
            .unwrap_or(false)
    }
}

impl Default for ShakmatyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesEngine for ShakmatyEngine {
    fn legal_moves(&self) -> Vec<MoveCandidate> {
        self.position
            .legal_moves()
            .iter()
            .filter_map(|m| self.candidate(m))
            .collect()
    }

    fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> RulesResult<AppliedMove> {
        let found = self.position.legal_moves().into_iter().find(|m| {
            self.candidate(m)
                .map(|c| c.from == from && c.to == to && c.promotion == promotion)
                .unwrap_or(false)
        });
        match found {
            Some(m) => Ok(self.play(&m)),
            None => Err(RulesError::IllegalMove(format!("{from}{to}"))),
        }
    }

    fn apply_castle(&mut self, side: CastleSide) -> RulesResult<AppliedMove> {
        let wanted = to_castling_side(side);
        let found = self
            .position
            .legal_moves()
            .into_iter()
            .find(|m| m.castling_side() == Some(wanted));
        match found {
            Some(m) => Ok(self.play(&m)),
            None => Err(RulesError::IllegalMove(side.notation().to_string())),
        }
    }

    fn undo(&mut self) -> Option<AppliedMove> {
        let last = self.history.pop()?;
        self.position = last.before;
        self.seen.pop();
        Some(last.applied)
    }

    fn history_san(&self) -> Vec<String> {
        self.history.iter().map(|p| p.applied.san.clone()).collect()
    }

    fn is_check(&self) -> bool {
        self.position.is_check()
    }

    fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    fn is_draw(&self) -> bool {
        self.position.is_stalemate()
            || self.position.is_insufficient_material()
            || self.position.halfmoves() >= FIFTY_MOVE_PLIES
            || self.is_threefold_repetition()
    }

    fn turn(&self) -> Color {
        from_color(self.position.turn())
    }

    fn fen(&self) -> String {
        Fen::from_position(self.position.clone(), EnPassantMode::Legal).to_string()
    }

    fn reset(&mut self) {
        self.position = self.start.clone();
        self.history.clear();
        self.seen = vec![repetition_key(&self.position)];
    }
}

/// Board, side to move, castling rights and en passant square.
fn repetition_key(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal)
        .to_string()
        .split_whitespace()
        .take(4)
        .collect::<Vec<_>>()
        .join(" ")
}

fn from_shakmaty_square(sq: shakmaty::Square) -> Option<Square> {
    Square::parse(&sq.to_string())
}

fn from_role(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

fn from_color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

fn from_castling_side(side: CastlingSide) -> CastleSide {
    match side {
        CastlingSide::KingSide => CastleSide::Kingside,
        CastlingSide::QueenSide => CastleSide::Queenside,
    }
}

fn to_castling_side(side: CastleSide) -> CastlingSide {
    match side {
        CastleSide::Kingside => CastlingSide::KingSide,
        CastleSide::Queenside => CastlingSide::QueenSide,
    }
}
