use chesstalk_core::{Language, LegalDestinations};
use serde::Serialize;

use crate::command_log::LogEntry;

/// Side effects of one dispatched command, in emission order.
///
/// A successful command yields a board update, a status line, a spoken
/// announcement and a log entry. A failed one yields an error and its spoken
/// form, and nothing else.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    BoardUpdated {
        fen: String,
        dests: LegalDestinations,
    },
    Status {
        text: String,
    },
    Announcement {
        text: String,
        language: Language,
    },
    LogAppended {
        entry: LogEntry,
    },
    Error {
        message: String,
    },
}

/// Events from the speech-input collaborator to the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    ListeningStarted,
    TranscriptReady(String),
    RecognitionError(String),
    ListeningStopped,
}
