use chesstalk_core::Language;
use serde::Serialize;

use crate::vocabulary::{TokenCategory, Vocabulary};

/// One normalized position in the utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Lowercased spoken text; several words when a phrase matched.
    pub spoken: String,
    pub canonical: String,
    /// `None` for tokens the vocabulary does not know.
    pub category: Option<TokenCategory>,
}

/// Ordered canonical tokens of one transcript plus their joined form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedCommand {
    pub tokens: Vec<Token>,
    pub text: String,
}

impl NormalizedCommand {
    pub fn canonical_tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.canonical.as_str())
    }

    pub fn contains_token(&self, canonical: &str) -> bool {
        self.canonical_tokens().any(|t| t == canonical)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Lowercase, tokenize and map a transcript through the active vocabulary.
///
/// Multi-word vocabulary phrases are matched longest-first. Unknown tokens are
/// kept unchanged so later stages can report precise errors.
pub fn normalize(transcript: &str, language: Language, vocabulary: &Vocabulary) -> NormalizedCommand {
    let lowered = transcript.to_lowercase();
    let words: Vec<&str> = lowered
        .split_whitespace()
        .map(strip_punctuation)
        .filter(|w| !w.is_empty())
        .collect();

    let max_words = vocabulary.max_phrase_words(language).max(1);
    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;

    'outer: while i < words.len() {
        let longest = max_words.min(words.len() - i);
        for len in (1..=longest).rev() {
            let phrase = words[i..i + len].join(" ");
            if let Some(entry) = vocabulary.lookup(language, &phrase) {
                tokens.push(Token {
                    spoken: phrase,
                    canonical: entry.canonical.clone(),
                    category: Some(entry.category),
                });
                i += len;
                continue 'outer;
            }
        }
        tokens.push(Token {
            spoken: words[i].to_string(),
            canonical: words[i].to_string(),
            category: None,
        });
        i += 1;
    }

    let text = tokens
        .iter()
        .map(|t| t.canonical.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    NormalizedCommand { tokens, text }
}

/// Recognizers add sentence punctuation ("Move knight to f3.").
fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| matches!(c, '.' | ',' | '!' | '?' | '¿' | '¡' | ';' | ':' | '"'))
}
