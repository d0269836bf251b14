use chrono::{DateTime, Utc};
use serde::Serialize;

/// Kind of a move/command log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogKind {
    /// A board mutation (move, castle, undo).
    Move,
    /// An accepted non-board command (offers, history read-back, new game).
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    pub ts: DateTime<Utc>,
    pub kind: LogKind,
    pub text: String,
}

/// Append-only textual log of the session, in the active language at the time of each entry.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    entries: Vec<LogEntry>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and return a copy for event emission.
    pub fn push(&mut self, kind: LogKind, text: impl Into<String>) -> LogEntry {
        let entry = LogEntry {
            ts: Utc::now(),
            kind,
            text: text.into(),
        };
        self.entries.push(entry.clone());
        entry
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Number SAN history in white/black pairs: "1. e4 e5", "2. Nf3".
pub fn format_move_list(history: &[String]) -> Vec<String> {
    history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect()
}
