//! Console stand-in for the speech recognizer and the board UI controls.

use chesstalk_core::{Language, Square};
use chesstalk_voice::{OfferResponse, VoiceEvent};

/// One line typed on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    /// What the recognizer would have reported.
    Voice(VoiceEvent),
    StartListening,
    StopListening,
    Offer(OfferResponse),
    ManualMove(Square, Square),
    SetLanguage(Language),
    NewGame,
    Quit,
    Invalid(String),
}

/// Plain text is a transcript, `!code` a recognition error, `:cmd` a UI control.
pub fn parse_line(line: &str) -> Option<ConsoleInput> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if let Some(code) = line.strip_prefix('!') {
        return Some(ConsoleInput::Voice(VoiceEvent::RecognitionError(
            code.trim().to_string(),
        )));
    }
    let Some(control) = line.strip_prefix(':') else {
        return Some(ConsoleInput::Voice(VoiceEvent::TranscriptReady(
            line.to_string(),
        )));
    };

    let mut parts = control.split_whitespace();
    let input = match (parts.next().unwrap_or_default(), parts.next(), parts.next()) {
        ("listen", None, None) => ConsoleInput::StartListening,
        ("stop", None, None) => ConsoleInput::StopListening,
        ("accept", None, None) => ConsoleInput::Offer(OfferResponse::AcceptDraw),
        ("reject", None, None) => ConsoleInput::Offer(OfferResponse::RejectDraw),
        ("confirm", None, None) => ConsoleInput::Offer(OfferResponse::ConfirmResign),
        ("cancel", None, None) => ConsoleInput::Offer(OfferResponse::CancelResign),
        ("new", None, None) => ConsoleInput::NewGame,
        ("quit" | "exit", None, None) => ConsoleInput::Quit,
        ("lang", Some(code), None) => match code.parse::<Language>() {
            Ok(language) => ConsoleInput::SetLanguage(language),
            Err(e) => ConsoleInput::Invalid(e),
        },
        ("move", Some(from), Some(to)) => match (Square::parse(from), Square::parse(to)) {
            (Some(from), Some(to)) => ConsoleInput::ManualMove(from, to),
            _ => ConsoleInput::Invalid(format!("bad squares: {from} {to}")),
        },
        _ => ConsoleInput::Invalid(format!("unknown control: {line}")),
    };
    Some(input)
}

pub const HELP: &str = "\
Type what you would say, e.g. \"move knight to f3\" or \"mueve caballo a f3\".
  !code            simulate a recognition error
  :listen / :stop  start or stop listening
  :accept :reject  answer a draw offer
  :confirm :cancel answer a resignation
  :move e2 e4      move on the board directly
  :lang en|es      switch language
  :new             start a new game
  :quit            exit";
