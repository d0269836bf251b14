use chesstalk_core::{BoardRenderer, Language, LegalDestinations, SpeechOutput};
use chesstalk_voice::{DispatchReport, Effect};

/// Draws the position as an ASCII board on stdout.
pub struct ConsoleRenderer {
    muted: bool,
}

impl ConsoleRenderer {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl BoardRenderer for ConsoleRenderer {
    fn render(&mut self, fen: &str, dests: &LegalDestinations) {
        if self.muted {
            return;
        }
        println!("{}", ascii_board(fen));
        let movable = dests.len();
        tracing::debug!("{movable} pieces can move");
    }
}

/// Prints announcements when no synthesizer is configured.
pub struct ConsoleSpeech {
    muted: bool,
}

impl ConsoleSpeech {
    pub fn new(muted: bool) -> Self {
        Self { muted }
    }
}

impl SpeechOutput for ConsoleSpeech {
    fn speak(&mut self, text: &str, language: Language) {
        if !self.muted && !text.is_empty() {
            println!("[{}] {text}", language.speech_tag());
        }
    }
}

/// Render the piece-placement field of a FEN, rank 8 at the top.
pub fn ascii_board(fen: &str) -> String {
    let placement = fen.split_whitespace().next().unwrap_or_default();
    let mut out = String::new();
    for (i, rank) in placement.split('/').enumerate() {
        out.push_str(&format!("{} ", 8 - i));
        for c in rank.chars() {
            match c.to_digit(10) {
                Some(n) => (0..n).for_each(|_| out.push_str(" .")),
                None => {
                    out.push(' ');
                    out.push(c);
                }
            }
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h");
    out
}

/// Print the textual side of a report: status, log line or error.
pub fn print_report(report: &DispatchReport, json: bool) {
    print_effects(&report.effects, json);
}

pub fn print_effects(effects: &[Effect], json: bool) {
    for effect in effects {
        if json {
            match serde_json::to_string(effect) {
                Ok(line) => println!("{line}"),
                Err(e) => tracing::error!("Failed to serialize effect: {e}"),
            }
            continue;
        }
        match effect {
            Effect::Status { text } => println!("-- {text}"),
            Effect::Error { message } => println!("!! {message}"),
            Effect::LogAppended { entry } => {
                tracing::debug!("log [{}] {:?}: {}", entry.ts.format("%H:%M:%S"), entry.kind, entry.text)
            }
            Effect::BoardUpdated { .. } | Effect::Announcement { .. } => {}
        }
    }
}
