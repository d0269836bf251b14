//! Bilingual vocabulary: spoken words and phrases → canonical tokens.
//!
//! Canonical pieces are the six symbols {p,n,b,r,q,k}; canonical squares are
//! `[a-h][1-8]`; keywords are the fixed strings in [`keyword`]. Spoken entries
//! may span several words ("castle kingside", "enroque corto").

use std::collections::HashMap;

use chesstalk_core::{Language, PieceKind, Square};
use serde::Serialize;
use thiserror::Error;

/// Canonical keyword tokens understood by the classifier.
pub mod keyword {
    pub const MOVE: &str = "move";
    pub const TO: &str = "to";
    pub const TAKES: &str = "takes";
    pub const CASTLE_KINGSIDE: &str = "O-O";
    pub const CASTLE_QUEENSIDE: &str = "O-O-O";
    pub const CHECK: &str = "+";
    pub const CHECKMATE: &str = "#";
    pub const RESIGN: &str = "resignation";
    pub const DRAW: &str = "draw";
    pub const UNDO: &str = "undo";
    pub const READ: &str = "read";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenCategory {
    Square,
    Piece,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyEntry {
    pub spoken: String,
    pub canonical: String,
    pub category: TokenCategory,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VocabularyError {
    #[error("Spoken token '{spoken}' already defined for {language}")]
    DuplicateSpoken { language: Language, spoken: String },

    #[error("Canonical piece token must be one of p,n,b,r,q,k: '{0}'")]
    InvalidPiece(String),

    #[error("Canonical square token must match [a-h][1-8]: '{0}'")]
    InvalidSquare(String),

    #[error("Spoken token is empty")]
    EmptySpoken,
}

#[derive(Debug, Default)]
struct LanguageTable {
    entries: HashMap<String, VocabularyEntry>,
    /// Longest spoken phrase in words, bounds the normalizer's lookahead.
    max_words: usize,
}

/// Static spoken→canonical mapping per language.
#[derive(Debug, Default)]
pub struct Vocabulary {
    tables: HashMap<Language, LanguageTable>,
}

const EN_PIECES: &[(&str, char)] = &[
    ("pawn", 'p'),
    ("knight", 'n'),
    ("bishop", 'b'),
    ("rook", 'r'),
    ("queen", 'q'),
    ("king", 'k'),
];

const ES_PIECES: &[(&str, char)] = &[
    ("peón", 'p'),
    ("peon", 'p'),
    ("caballo", 'n'),
    ("alfil", 'b'),
    ("torre", 'r'),
    ("dama", 'q'),
    ("reina", 'q'),
    ("rey", 'k'),
];

const EN_KEYWORDS: &[(&str, &str)] = &[
    ("move", keyword::MOVE),
    ("to", keyword::TO),
    ("takes", keyword::TAKES),
    ("capture", keyword::TAKES),
    ("castle kingside", keyword::CASTLE_KINGSIDE),
    ("castle queenside", keyword::CASTLE_QUEENSIDE),
    ("short castle", keyword::CASTLE_KINGSIDE),
    ("long castle", keyword::CASTLE_QUEENSIDE),
    ("o-o", keyword::CASTLE_KINGSIDE),
    ("o-o-o", keyword::CASTLE_QUEENSIDE),
    ("check", keyword::CHECK),
    ("checkmate", keyword::CHECKMATE),
    ("resign", keyword::RESIGN),
    ("draw", keyword::DRAW),
    ("undo", keyword::UNDO),
    ("read", keyword::READ),
];

const ES_KEYWORDS: &[(&str, &str)] = &[
    ("mueve", keyword::MOVE),
    ("mover", keyword::MOVE),
    ("muevo", keyword::MOVE),
    ("a", keyword::TO),
    ("hacia", keyword::TO),
    ("captura", keyword::TAKES),
    ("come", keyword::TAKES),
    ("enroque corto", keyword::CASTLE_KINGSIDE),
    ("enroque largo", keyword::CASTLE_QUEENSIDE),
    ("o-o", keyword::CASTLE_KINGSIDE),
    ("o-o-o", keyword::CASTLE_QUEENSIDE),
    ("jaque", keyword::CHECK),
    ("jaque mate", keyword::CHECKMATE),
    ("rendirse", keyword::RESIGN),
    ("rendición", keyword::RESIGN),
    ("rendicion", keyword::RESIGN),
    ("abandono", keyword::RESIGN),
    ("tablas", keyword::DRAW),
    ("deshacer", keyword::UNDO),
    ("leer", keyword::READ),
];

impl Vocabulary {
    /// Empty vocabulary; unknown tokens pass through the normalizer unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// English and Spanish entries for squares, pieces and command keywords.
    pub fn builtin() -> Self {
        let mut vocab = Self::new();
        vocab.load(Language::En, EN_PIECES, EN_KEYWORDS);
        vocab.load(Language::Es, ES_PIECES, ES_KEYWORDS);
        vocab
    }

    fn load(&mut self, language: Language, pieces: &[(&str, char)], keywords: &[(&str, &str)]) {
        let squares = Square::all().map(|sq| sq.to_string()).collect::<Vec<_>>();
        for sq in &squares {
            self.insert_or_warn(language, sq, sq, TokenCategory::Square);
        }
        for (spoken, symbol) in pieces {
            self.insert_or_warn(language, spoken, &symbol.to_string(), TokenCategory::Piece);
        }
        for (spoken, canonical) in keywords {
            self.insert_or_warn(language, spoken, canonical, TokenCategory::Keyword);
        }
    }

    fn insert_or_warn(&mut self, language: Language, spoken: &str, canonical: &str, category: TokenCategory) {
        if let Err(e) = self.insert(language, spoken, canonical, category) {
            tracing::warn!("Skipping vocabulary entry: {e}");
        }
    }

    /// Add one entry. Spoken tokens are lowercased and must be unique within a language.
    pub fn insert(
        &mut self,
        language: Language,
        spoken: &str,
        canonical: &str,
        category: TokenCategory,
    ) -> Result<(), VocabularyError> {
        let spoken = spoken.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        if spoken.is_empty() {
            return Err(VocabularyError::EmptySpoken);
        }
        match category {
            TokenCategory::Piece if PieceKind::from_token(canonical).is_none() => {
                return Err(VocabularyError::InvalidPiece(canonical.to_string()));
            }
            TokenCategory::Square if Square::parse(canonical).is_none() => {
                return Err(VocabularyError::InvalidSquare(canonical.to_string()));
            }
            _ => {}
        }

        let table = self.tables.entry(language).or_default();
        if table.entries.contains_key(&spoken) {
            return Err(VocabularyError::DuplicateSpoken { language, spoken });
        }
        table.max_words = table.max_words.max(spoken.split(' ').count());
        table.entries.insert(
            spoken.clone(),
            VocabularyEntry {
                spoken,
                canonical: canonical.to_string(),
                category,
            },
        );
        Ok(())
    }

    /// Look up an already-lowercased spoken token or phrase (words separated by one space).
    pub fn lookup(&self, language: Language, spoken: &str) -> Option<&VocabularyEntry> {
        self.tables.get(&language)?.entries.get(spoken)
    }

    pub fn max_phrase_words(&self, language: Language) -> usize {
        self.tables.get(&language).map(|t| t.max_words).unwrap_or(0)
    }

    pub fn len(&self, language: Language) -> usize {
        self.tables.get(&language).map(|t| t.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self, language: Language) -> bool {
        self.len(language) == 0
    }
}
