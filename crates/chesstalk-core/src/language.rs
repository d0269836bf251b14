//! Active language and the bilingual message catalogue.
//!
//! Every user-facing string (status line, spoken announcement, error text)
//! is produced here so that command logic stays language-independent.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::interfaces::{CastleSide, Color, PieceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
}

impl Language {
    /// BCP-47 tag handed to speech recognition and synthesis.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Language::En => "en-US",
            Language::Es => "es-ES",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "en-us" | "english" => Ok(Language::En),
            "es" | "es-es" | "spanish" | "español" | "espanol" => Ok(Language::Es),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// A message to render in the active language.
#[derive(Debug, Clone, Copy)]
pub enum Phrase<'a> {
    Welcome,
    MoveMade { color: Color, san: &'a str },
    Castled { color: Color, side: CastleSide },
    MoveUndone { color: Color, san: &'a str },
    History { color: Color, moves: &'a [String] },
    MadeCheck { color: Color },
    MadeCheckmate { color: Color },
    ResignPrompt { color: Color },
    Resigned { color: Color },
    ResignCancelled { color: Color },
    DrawProposed { color: Color },
    DrawAccepted { color: Color },
    DrawRejected { color: Color },
    TurnStatus { color: Color },
    CheckStatus { color: Color },
    CheckmateStatus { winner: Color },
    DrawStatus,
    ResignRequestedStatus,
    DrawRequestedStatus,
    ResignedStatus,
    DrawAgreedStatus,
    VoiceUnsupported,
    Failure(&'a CommandError),
    ErrorAnnouncement(&'a str),
}

impl Phrase<'_> {
    pub fn render(&self, language: Language) -> String {
        match language {
            Language::En => self.render_en(),
            Language::Es => self.render_es(),
        }
    }

    fn render_en(&self) -> String {
        match *self {
            Phrase::Welcome => "Welcome to ChessTalk. White begins".into(),
            Phrase::MoveMade { color, san } => {
                format!("{} made the move {san}", player(color, Language::En))
            }
            Phrase::Castled { color, side } => {
                let side = match side {
                    CastleSide::Kingside => "kingside",
                    CastleSide::Queenside => "queenside",
                };
                format!("{} made the move Castle {side}", player(color, Language::En))
            }
            Phrase::MoveUndone { color, san } => {
                format!("{} move undone: {san}", player(color, Language::En))
            }
            Phrase::History { color, moves } => {
                let list = if moves.is_empty() {
                    "No moves".to_string()
                } else {
                    moves.join(", ")
                };
                format!(
                    "{} these are the moves made: {list}",
                    player(color, Language::En)
                )
            }
            Phrase::MadeCheck { color } => format!("{} made Check", player(color, Language::En)),
            Phrase::MadeCheckmate { color } => {
                format!("{} made Checkmate", player(color, Language::En))
            }
            Phrase::ResignPrompt { color } => format!(
                "{} are you sure you want to resign?",
                player(color, Language::En)
            ),
            Phrase::Resigned { color } => format!("{} resigned", player(color, Language::En)),
            Phrase::ResignCancelled { color } => {
                format!("{} cancelled the resignation", player(color, Language::En))
            }
            Phrase::DrawProposed { color } => {
                format!("{} has proposed a draw", player(color, Language::En))
            }
            Phrase::DrawAccepted { color } => {
                format!("{} accepted the draw", player(color, Language::En))
            }
            Phrase::DrawRejected { color } => {
                format!("{} rejected the draw", player(color, Language::En))
            }
            Phrase::TurnStatus { color } => format!("{}'s turn", side_name(color, Language::En)),
            Phrase::CheckStatus { color } => {
                format!("Check! {}'s turn", side_name(color, Language::En))
            }
            Phrase::CheckmateStatus { winner } => {
                format!("Checkmate! {} wins", side_name(winner, Language::En))
            }
            Phrase::DrawStatus => "Draw! The game has ended".into(),
            Phrase::ResignRequestedStatus => {
                "The player has requested to resign. Please confirm or cancel".into()
            }
            Phrase::DrawRequestedStatus => {
                "The player has requested a draw. Please confirm or cancel".into()
            }
            Phrase::ResignedStatus => "The player has resigned".into(),
            Phrase::DrawAgreedStatus => "Draw agreed!".into(),
            Phrase::VoiceUnsupported => "Voice recognition is not supported".into(),
            Phrase::Failure(err) => failure_en(err),
            Phrase::ErrorAnnouncement(reason) => format!("Error: {reason}"),
        }
    }

    fn render_es(&self) -> String {
        match *self {
            Phrase::Welcome => "Bienvenido a ChessTalk. Empiezan las blancas".into(),
            Phrase::MoveMade { color, san } => {
                format!("{} hizo la jugada {san}", player(color, Language::Es))
            }
            Phrase::Castled { color, side } => {
                let side = match side {
                    CastleSide::Kingside => "corto",
                    CastleSide::Queenside => "largo",
                };
                format!("{} hizo la jugada enroque {side}", player(color, Language::Es))
            }
            Phrase::MoveUndone { color, san } => {
                format!("{} jugada deshecha: {san}", player(color, Language::Es))
            }
            Phrase::History { color, moves } => {
                let list = if moves.is_empty() {
                    "Sin jugadas".to_string()
                } else {
                    moves.join(", ")
                };
                format!(
                    "{} estas son las jugadas realizadas: {list}",
                    player(color, Language::Es)
                )
            }
            Phrase::MadeCheck { color } => format!("{} dio jaque", player(color, Language::Es)),
            Phrase::MadeCheckmate { color } => {
                format!("{} dio jaque mate", player(color, Language::Es))
            }
            Phrase::ResignPrompt { color } => format!(
                "{} ¿seguro que quieres rendirte?",
                player(color, Language::Es)
            ),
            Phrase::Resigned { color } => format!("{} se ha rendido", player(color, Language::Es)),
            Phrase::ResignCancelled { color } => {
                format!("{} canceló la rendición", player(color, Language::Es))
            }
            Phrase::DrawProposed { color } => {
                format!("{} ha propuesto tablas", player(color, Language::Es))
            }
            Phrase::DrawAccepted { color } => {
                format!("{} aceptó las tablas", player(color, Language::Es))
            }
            Phrase::DrawRejected { color } => {
                format!("{} rechazó las tablas", player(color, Language::Es))
            }
            Phrase::TurnStatus { color } => format!("Turno de {}", side_name(color, Language::Es)),
            Phrase::CheckStatus { color } => {
                format!("¡Jaque! Turno de {}", side_name(color, Language::Es))
            }
            Phrase::CheckmateStatus { winner } => {
                format!("¡Jaque mate! Ganan {}", side_name(winner, Language::Es))
            }
            Phrase::DrawStatus => "¡Tablas! La partida ha terminado".into(),
            Phrase::ResignRequestedStatus => {
                "El jugador ha pedido rendirse. Por favor confirma o cancela".into()
            }
            Phrase::DrawRequestedStatus => {
                "El jugador ha propuesto tablas. Por favor confirma o cancela".into()
            }
            Phrase::ResignedStatus => "El jugador se ha rendido".into(),
            Phrase::DrawAgreedStatus => "¡Tablas acordadas!".into(),
            Phrase::VoiceUnsupported => "El reconocimiento de voz no está disponible".into(),
            Phrase::Failure(err) => failure_es(err),
            Phrase::ErrorAnnouncement(reason) => format!("Error: {reason}"),
        }
    }
}

fn player(color: Color, language: Language) -> &'static str {
    match (language, color) {
        (Language::En, Color::White) => "Player 1",
        (Language::En, Color::Black) => "Player 2",
        (Language::Es, Color::White) => "Jugador 1",
        (Language::Es, Color::Black) => "Jugador 2",
    }
}

fn side_name(color: Color, language: Language) -> &'static str {
    match (language, color) {
        (Language::En, Color::White) => "White",
        (Language::En, Color::Black) => "Black",
        (Language::Es, Color::White) => "las blancas",
        (Language::Es, Color::Black) => "las negras",
    }
}

fn piece_name(piece: PieceKind, language: Language) -> &'static str {
    match language {
        Language::En => match piece {
            PieceKind::Pawn => "pawn",
            PieceKind::Knight => "knight",
            PieceKind::Bishop => "bishop",
            PieceKind::Rook => "rook",
            PieceKind::Queen => "queen",
            PieceKind::King => "king",
        },
        Language::Es => match piece {
            PieceKind::Pawn => "peón",
            PieceKind::Knight => "caballo",
            PieceKind::Bishop => "alfil",
            PieceKind::Rook => "torre",
            PieceKind::Queen => "dama",
            PieceKind::King => "rey",
        },
    }
}

fn failure_en(err: &CommandError) -> String {
    match err {
        CommandError::UnrecognizedCommand => "Command not recognized".into(),
        CommandError::MissingParameter => "Could not identify piece or destination".into(),
        CommandError::NoLegalMove { piece, square } => format!(
            "Invalid move for {} to {square}",
            piece_name(*piece, Language::En)
        ),
        CommandError::CastlingNotAllowed { .. } => "Castling not allowed".into(),
        CommandError::NothingToUndo => "No moves to undo".into(),
        CommandError::NoPendingOffer => "There is no pending offer to answer".into(),
        CommandError::GameOver => "The game is over".into(),
        CommandError::Recognition { code } => format!("Voice recognition error: {code}"),
        CommandError::Rules(_) => "That move is not allowed".into(),
    }
}

fn failure_es(err: &CommandError) -> String {
    match err {
        CommandError::UnrecognizedCommand => "Comando no reconocido".into(),
        CommandError::MissingParameter => "No se pudo identificar la pieza o el destino".into(),
        CommandError::NoLegalMove { piece, square } => format!(
            "Movimiento inválido para {} a {square}",
            piece_name(*piece, Language::Es)
        ),
        CommandError::CastlingNotAllowed { .. } => "Enroque no permitido".into(),
        CommandError::NothingToUndo => "No hay jugadas para deshacer".into(),
        CommandError::NoPendingOffer => "No hay ninguna oferta pendiente".into(),
        CommandError::GameOver => "La partida ha terminado".into(),
        CommandError::Recognition { code } => format!("Error de reconocimiento de voz: {code}"),
        CommandError::Rules(_) => "Ese movimiento no está permitido".into(),
    }
}
