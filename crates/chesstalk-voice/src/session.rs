use chesstalk_core::{GameOutcome, Language, RulesEngine};
use uuid::Uuid;

use crate::command_log::CommandLog;
use crate::offers::OfferStateMachine;

/// Everything one game session owns: active language, the rules engine, pending
/// offers, the declared outcome and the command log.
///
/// Interpreter stages read language and game state only through this value.
pub struct SessionContext {
    id: Uuid,
    language: Language,
    rules: Box<dyn RulesEngine>,
    offers: OfferStateMachine,
    /// Outcomes the engine cannot see: agreed draws and resignations.
    declared: Option<GameOutcome>,
    log: CommandLog,
}

impl SessionContext {
    pub fn new(rules: Box<dyn RulesEngine>, language: Language) -> Self {
        let id = Uuid::new_v4();
        tracing::info!("Session {id} started ({language})");
        Self {
            id,
            language,
            rules,
            offers: OfferStateMachine::new(),
            declared: None,
            log: CommandLog::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        if language != self.language {
            tracing::info!("Language switched {} -> {}", self.language, language);
        }
        self.language = language;
    }

    pub fn rules(&self) -> &dyn RulesEngine {
        self.rules.as_ref()
    }

    pub(crate) fn rules_mut(&mut self) -> &mut dyn RulesEngine {
        self.rules.as_mut()
    }

    pub fn offers(&self) -> &OfferStateMachine {
        &self.offers
    }

    pub(crate) fn offers_mut(&mut self) -> &mut OfferStateMachine {
        &mut self.offers
    }

    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    pub(crate) fn log_mut(&mut self) -> &mut CommandLog {
        &mut self.log
    }

    /// Outcome by agreement or resignation, if any.
    pub fn declared_outcome(&self) -> Option<GameOutcome> {
        self.declared
    }

    pub(crate) fn declare_outcome(&mut self, outcome: GameOutcome) {
        tracing::info!("Game over: {outcome:?}");
        self.declared = Some(outcome);
    }

    /// How the game has ended, declared or detected on the board.
    pub fn outcome(&self) -> Option<GameOutcome> {
        if let Some(outcome) = self.declared {
            return Some(outcome);
        }
        if self.rules.is_checkmate() {
            Some(GameOutcome::Checkmate {
                winner: self.rules.turn().opposite(),
            })
        } else if self.rules.is_draw() {
            Some(GameOutcome::Draw)
        } else {
            None
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome().is_some()
    }

    /// Fresh game on the same engine: position, offers, outcome and log reset.
    pub(crate) fn new_game(&mut self) {
        self.rules.reset();
        self.offers.reset();
        self.declared = None;
        self.log.clear();
        tracing::info!("Session {} new game", self.id);
    }
}
