use chesstalk_core::CastleSide;

use super::normalizer::NormalizedCommand;
use super::Intent;
use crate::vocabulary::keyword;

/// One entry of the ordered classification table.
#[derive(Clone, Copy)]
pub struct IntentRule {
    pub name: &'static str,
    matches: fn(&NormalizedCommand) -> bool,
    build: fn(&NormalizedCommand) -> Intent,
}

impl IntentRule {
    pub fn new(
        name: &'static str,
        matches: fn(&NormalizedCommand) -> bool,
        build: fn(&NormalizedCommand) -> Intent,
    ) -> Self {
        Self {
            name,
            matches,
            build,
        }
    }
}

impl std::fmt::Debug for IntentRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentRule").field("name", &self.name).finish()
    }
}

/// Default priority order. First match wins, so a Move-shaped phrase that also
/// says "draw" is still a Move.
pub fn default_rules() -> Vec<IntentRule> {
    vec![
        IntentRule::new(
            "move",
            |cmd| cmd.contains_token(keyword::MOVE) || cmd.contains_token(keyword::TO),
            |_| Intent::Move,
        ),
        IntentRule::new(
            "castle",
            |cmd| cmd.text.contains(keyword::CASTLE_KINGSIDE),
            |cmd| {
                let side = if cmd.text.contains(keyword::CASTLE_QUEENSIDE) {
                    CastleSide::Queenside
                } else {
                    CastleSide::Kingside
                };
                Intent::Castle { side }
            },
        ),
        IntentRule::new(
            "resign",
            |cmd| cmd.contains_token(keyword::RESIGN),
            |_| Intent::Resign,
        ),
        IntentRule::new(
            "offer_draw",
            |cmd| cmd.contains_token(keyword::DRAW),
            |_| Intent::OfferDraw,
        ),
        IntentRule::new(
            "undo",
            |cmd| cmd.contains_token(keyword::UNDO),
            |_| Intent::Undo,
        ),
        IntentRule::new(
            "read_history",
            |cmd| cmd.contains_token(keyword::READ),
            |_| Intent::ReadHistory,
        ),
    ]
}

/// Keyword-membership classifier driven by an ordered rule list.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    rules: Vec<IntentRule>,
}

impl IntentClassifier {
    pub fn new() -> Self {
        Self::with_rules(default_rules())
    }

    pub fn with_rules(rules: Vec<IntentRule>) -> Self {
        Self { rules }
    }

    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    pub fn classify(&self, cmd: &NormalizedCommand) -> Intent {
        if cmd.is_empty() {
            return Intent::Unrecognized {
                reason: "empty command".into(),
            };
        }
        for rule in &self.rules {
            if (rule.matches)(cmd) {
                let intent = (rule.build)(cmd);
                tracing::debug!("Rule '{}' matched '{}'", rule.name, cmd.text);
                return intent;
            }
        }
        Intent::Unrecognized {
            reason: format!("no command keyword in '{}'", cmd.text),
        }
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::normalizer::normalize;
    use crate::vocabulary::Vocabulary;
    use chesstalk_core::Language;

    fn classify(text: &str, lang: Language) -> Intent {
        let cmd = normalize(text, lang, &Vocabulary::builtin());
        IntentClassifier::new().classify(&cmd)
    }

    #[test]
    fn rule_order_is_visible() {
        assert_eq!(
            IntentClassifier::new().rule_names(),
            vec!["move", "castle", "resign", "offer_draw", "undo", "read_history"]
        );
    }

    #[test]
    fn classifies_each_intent() {
        assert_eq!(classify("move pawn to e4", Language::En), Intent::Move);
        assert_eq!(
            classify("castle kingside", Language::En),
            Intent::Castle {
                side: CastleSide::Kingside
            }
        );
        assert_eq!(
            classify("castle queenside", Language::En),
            Intent::Castle {
                side: CastleSide::Queenside
            }
        );
        assert_eq!(classify("I resign", Language::En), Intent::Resign);
        assert_eq!(classify("draw", Language::En), Intent::OfferDraw);
        assert_eq!(classify("undo", Language::En), Intent::Undo);
        assert_eq!(classify("read moves", Language::En), Intent::ReadHistory);
    }

    #[test]
    fn classifies_spanish() {
        assert_eq!(classify("mueve caballo a f3", Language::Es), Intent::Move);
        assert_eq!(
            classify("enroque largo", Language::Es),
            Intent::Castle {
                side: CastleSide::Queenside
            }
        );
        assert_eq!(classify("tablas", Language::Es), Intent::OfferDraw);
        assert_eq!(classify("deshacer", Language::Es), Intent::Undo);
        assert_eq!(classify("leer", Language::Es), Intent::ReadHistory);
        assert_eq!(classify("rendirse", Language::Es), Intent::Resign);
    }

    #[test]
    fn move_takes_precedence_over_draw() {
        assert_eq!(classify("move pawn to draw", Language::En), Intent::Move);
    }

    #[test]
    fn castle_takes_precedence_over_resign() {
        assert_eq!(
            classify("castle kingside or resign", Language::En),
            Intent::Castle {
                side: CastleSide::Kingside
            }
        );
    }

    #[test]
    fn unrecognized_carries_reason() {
        match classify("hello there", Language::En) {
            Intent::Unrecognized { reason } => assert!(reason.contains("hello there")),
            other => panic!("expected Unrecognized, got {other:?}"),
        }
        assert!(matches!(
            classify("", Language::En),
            Intent::Unrecognized { .. }
        ));
    }

    #[test]
    fn canonical_tokens_classify_in_any_language() {
        assert_eq!(classify("undo", Language::Es), Intent::Undo);
        assert_eq!(classify("move p to e4", Language::Es), Intent::Move);
    }

    #[test]
    fn custom_rule_order() {
        let mut rules = default_rules();
        rules.reverse();
        let classifier = IntentClassifier::with_rules(rules);
        let cmd = normalize("move pawn to draw", Language::En, &Vocabulary::builtin());
        assert_eq!(classifier.classify(&cmd), Intent::OfferDraw);
    }
}
