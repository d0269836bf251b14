//! Command dispatch: runs one utterance or UI control through the interpreter
//! and turns the result into effects.
//!
//! Dispatch is all-or-nothing. Every mutation happens only after its inputs
//! are validated, and the rules engine leaves the position alone when it
//! rejects a move. So a failure leaves game, offer and log state exactly as
//! it was and emits only the error and its spoken form.

use chesstalk_core::{
    BoardRenderer, CastleSide, Color, CommandError, GameOutcome, Language, Phrase, RulesError,
    SpeechOutput, Square,
};
use serde::Serialize;

use crate::command_log::{format_move_list, LogKind};
use crate::events::Effect;
use crate::intent::{
    extract_move, normalize, resolve_move, Intent, IntentClassifier, NormalizedCommand,
};
use crate::offers::{OfferEvent, OfferState, OfferTransition};
use crate::session::SessionContext;
use crate::vocabulary::Vocabulary;

/// UI controls that answer a pending draw offer or resignation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferResponse {
    AcceptDraw,
    RejectDraw,
    ConfirmResign,
    CancelResign,
}

impl OfferResponse {
    fn event(self) -> OfferEvent {
        match self {
            OfferResponse::AcceptDraw => OfferEvent::AcceptDraw,
            OfferResponse::RejectDraw => OfferEvent::RejectDraw,
            OfferResponse::ConfirmResign => OfferEvent::ConfirmResign,
            OfferResponse::CancelResign => OfferEvent::CancelResign,
        }
    }
}

/// Outcome of one dispatched command.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReport {
    /// Classified intent, for voice commands.
    pub intent: Option<Intent>,
    pub outcome: Result<(), CommandError>,
    pub effects: Vec<Effect>,
}

impl DispatchReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// What a successful command wants announced and logged.
struct Accepted {
    announcement: String,
    kind: LogKind,
}

pub struct CommandDispatcher {
    vocabulary: Vocabulary,
    classifier: IntentClassifier,
    renderer: Box<dyn BoardRenderer>,
    speech: Box<dyn SpeechOutput>,
}

impl CommandDispatcher {
    pub fn new(renderer: Box<dyn BoardRenderer>, speech: Box<dyn SpeechOutput>) -> Self {
        Self {
            vocabulary: Vocabulary::builtin(),
            classifier: IntentClassifier::new(),
            renderer,
            speech,
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Normalize and classify without touching any game.
    pub fn interpret(&self, transcript: &str, language: Language) -> (NormalizedCommand, Intent) {
        let cmd = normalize(transcript, language, &self.vocabulary);
        let intent = self.classifier.classify(&cmd);
        (cmd, intent)
    }

    /// Handle a final speech-recognition transcript.
    pub fn handle_transcript(
        &mut self,
        session: &mut SessionContext,
        transcript: &str,
    ) -> DispatchReport {
        let (cmd, intent) = self.interpret(transcript, session.language());
        tracing::info!(
            "Transcript '{}' -> {} (tokens: {})",
            transcript,
            intent.name(),
            cmd.text
        );
        let result = execute_intent(session, &intent, &cmd);
        self.finish(session, Some(intent), result)
    }

    /// Move dragged on the board UI. Same pipeline and promotion policy as voice moves.
    pub fn apply_manual_move(
        &mut self,
        session: &mut SessionContext,
        from: Square,
        to: Square,
    ) -> DispatchReport {
        tracing::info!("Manual move {from}{to}");
        let result = manual_move(session, from, to);
        self.finish(session, None, result)
    }

    pub fn respond_to_offer(
        &mut self,
        session: &mut SessionContext,
        response: OfferResponse,
    ) -> DispatchReport {
        tracing::info!("Offer response {response:?}");
        let result = answer_offer(session, response);
        self.finish(session, None, result)
    }

    /// Report a speech-recognition failure as a spoken and logged error.
    pub fn report_recognition_error(
        &mut self,
        session: &mut SessionContext,
        code: &str,
    ) -> DispatchReport {
        tracing::warn!("Recognition error: {code}");
        let result = Err(CommandError::Recognition {
            code: code.to_string(),
        });
        self.finish(session, None, result)
    }

    /// Announce the current game, as at startup.
    pub fn welcome(&mut self, session: &mut SessionContext) -> DispatchReport {
        let announcement = Phrase::Welcome.render(session.language());
        self.finish(
            session,
            None,
            Ok(Accepted {
                announcement,
                kind: LogKind::Notice,
            }),
        )
    }

    /// Reset position, offers, outcome and log, then welcome again.
    pub fn start_new_game(&mut self, session: &mut SessionContext) -> DispatchReport {
        session.new_game();
        self.welcome(session)
    }

    /// Tell the user that voice input is unavailable. No state changes.
    pub fn announce_voice_unsupported(&mut self, session: &SessionContext) -> Vec<Effect> {
        let language = session.language();
        let text = Phrase::VoiceUnsupported.render(language);
        let effects = vec![
            Effect::Status { text: text.clone() },
            Effect::Announcement { text, language },
        ];
        self.emit(&effects);
        effects
    }

    fn finish(
        &mut self,
        session: &mut SessionContext,
        intent: Option<Intent>,
        result: Result<Accepted, CommandError>,
    ) -> DispatchReport {
        let language = session.language();
        let (outcome, effects) = match result {
            Ok(accepted) => {
                let rules = session.rules();
                let board = Effect::BoardUpdated {
                    fen: rules.fen(),
                    dests: rules.legal_destinations(),
                };
                let status = Effect::Status {
                    text: status_text(session),
                };
                let entry = session
                    .log_mut()
                    .push(accepted.kind, accepted.announcement.clone());
                let effects = vec![
                    board,
                    status,
                    Effect::Announcement {
                        text: accepted.announcement,
                        language,
                    },
                    Effect::LogAppended { entry },
                ];
                (Ok(()), effects)
            }
            Err(err) => {
                let message = err.localized(language);
                tracing::warn!("Command failed: {err}");
                let effects = vec![
                    Effect::Error {
                        message: message.clone(),
                    },
                    Effect::Announcement {
                        text: Phrase::ErrorAnnouncement(&message).render(language),
                        language,
                    },
                ];
                (Err(err), effects)
            }
        };
        self.emit(&effects);
        DispatchReport {
            intent,
            outcome,
            effects,
        }
    }

    /// Route effects to the collaborators that consume them.
    fn emit(&mut self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::BoardUpdated { fen, dests } => self.renderer.render(fen, dests),
                Effect::Announcement { text, language } => self.speech.speak(text, *language),
                _ => {}
            }
        }
    }
}

fn execute_intent(
    session: &mut SessionContext,
    intent: &Intent,
    cmd: &NormalizedCommand,
) -> Result<Accepted, CommandError> {
    match intent {
        Intent::Move => {
            ensure_in_play(session)?;
            let (piece, destination) = extract_move(cmd).validate()?;
            let resolved = resolve_move(piece, destination, &session.rules().legal_moves())?;
            tracing::debug!("Resolved {} {}{}", resolved.san, resolved.from, resolved.to);
            let applied = session
                .rules_mut()
                .apply_move(resolved.from, resolved.to, resolved.promotion)
                .map_err(|err| {
                    tracing::warn!("Engine rejected resolved move: {err}");
                    CommandError::NoLegalMove {
                        piece,
                        square: destination,
                    }
                })?;
            let text = Phrase::MoveMade {
                color: applied.color,
                san: &applied.san,
            }
            .render(session.language());
            Ok(board_move(session, applied.color, text))
        }
        Intent::Castle { side } => castle(session, *side),
        Intent::Resign => {
            let turn = session.rules().turn();
            request_offer(session, OfferEvent::Resign(turn))
        }
        Intent::OfferDraw => {
            let turn = session.rules().turn();
            request_offer(session, OfferEvent::OfferDraw(turn))
        }
        Intent::Undo => undo(session),
        Intent::ReadHistory => {
            let moves = format_move_list(&session.rules().history_san());
            let announcement = Phrase::History {
                color: session.rules().turn(),
                moves: &moves,
            }
            .render(session.language());
            Ok(Accepted {
                announcement,
                kind: LogKind::Notice,
            })
        }
        Intent::Unrecognized { reason } => {
            tracing::debug!("Unrecognized: {reason}");
            Err(CommandError::UnrecognizedCommand)
        }
    }
}

fn castle(session: &mut SessionContext, side: CastleSide) -> Result<Accepted, CommandError> {
    ensure_in_play(session)?;
    let allowed = session
        .rules()
        .legal_moves()
        .iter()
        .any(|c| c.castle == Some(side));
    if !allowed {
        return Err(CommandError::CastlingNotAllowed { side });
    }
    let applied = session
        .rules_mut()
        .apply_castle(side)
        .map_err(|_| CommandError::CastlingNotAllowed { side })?;
    let text = Phrase::Castled {
        color: applied.color,
        side,
    }
    .render(session.language());
    Ok(board_move(session, applied.color, text))
}

fn undo(session: &mut SessionContext) -> Result<Accepted, CommandError> {
    if session.rules().history_san().is_empty() {
        return Err(CommandError::NothingToUndo);
    }
    // Checkmate and engine draws can be taken back; agreements and resignations cannot.
    if session.declared_outcome().is_some() {
        return Err(CommandError::GameOver);
    }
    let applied = session
        .rules_mut()
        .undo()
        .ok_or(CommandError::NothingToUndo)?;
    let announcement = Phrase::MoveUndone {
        color: applied.color,
        san: &applied.san,
    }
    .render(session.language());
    Ok(Accepted {
        announcement,
        kind: LogKind::Move,
    })
}

fn manual_move(
    session: &mut SessionContext,
    from: Square,
    to: Square,
) -> Result<Accepted, CommandError> {
    ensure_in_play(session)?;
    let from_origin: Vec<_> = session
        .rules()
        .legal_moves()
        .into_iter()
        .filter(|c| c.from == from)
        .collect();
    let piece = from_origin
        .iter()
        .find(|c| c.to == to)
        .map(|c| c.piece)
        .ok_or_else(|| RulesError::IllegalMove(format!("{from}{to}")))?;
    let resolved = resolve_move(piece, to, &from_origin)?;
    let applied = session
        .rules_mut()
        .apply_move(resolved.from, resolved.to, resolved.promotion)?;
    let text = Phrase::MoveMade {
        color: applied.color,
        san: &applied.san,
    }
    .render(session.language());
    Ok(board_move(session, applied.color, text))
}

fn request_offer(session: &mut SessionContext, event: OfferEvent) -> Result<Accepted, CommandError> {
    ensure_in_play(session)?;
    let transition = session.offers_mut().apply(event)?;
    let language = session.language();
    let phrase = match transition {
        OfferTransition::DrawOffered { by } | OfferTransition::DrawReannounced { by } => {
            Phrase::DrawProposed { color: by }
        }
        OfferTransition::ResignRequested { by } | OfferTransition::ResignReannounced { by } => {
            Phrase::ResignPrompt { color: by }
        }
        OfferTransition::OtherOfferPending(OfferState::DrawPending { offered_by }) => {
            Phrase::DrawProposed { color: offered_by }
        }
        OfferTransition::OtherOfferPending(OfferState::ResignPending { resigning }) => {
            Phrase::ResignPrompt { color: resigning }
        }
        other => {
            tracing::error!("Unexpected offer transition for a request: {other:?}");
            return Err(CommandError::UnrecognizedCommand);
        }
    };
    Ok(Accepted {
        announcement: phrase.render(language),
        kind: LogKind::Notice,
    })
}

fn answer_offer(
    session: &mut SessionContext,
    response: OfferResponse,
) -> Result<Accepted, CommandError> {
    let transition = session.offers_mut().apply(response.event())?;
    let phrase = match transition {
        OfferTransition::DrawAccepted { offered_by } => {
            session.declare_outcome(GameOutcome::DrawAgreed);
            Phrase::DrawAccepted {
                color: offered_by.opposite(),
            }
        }
        OfferTransition::DrawRejected { offered_by } => Phrase::DrawRejected {
            color: offered_by.opposite(),
        },
        OfferTransition::Resigned { by } => {
            session.declare_outcome(GameOutcome::Resignation { resigned: by });
            Phrase::Resigned { color: by }
        }
        OfferTransition::ResignCancelled { by } => Phrase::ResignCancelled { color: by },
        other => {
            tracing::error!("Unexpected offer transition for a response: {other:?}");
            return Err(CommandError::NoPendingOffer);
        }
    };
    Ok(Accepted {
        announcement: phrase.render(session.language()),
        kind: LogKind::Notice,
    })
}

fn ensure_in_play(session: &SessionContext) -> Result<(), CommandError> {
    match session.outcome() {
        Some(_) => Err(CommandError::GameOver),
        None => Ok(()),
    }
}

/// Announcement for an applied move, with check or mate called out.
fn board_move(session: &SessionContext, mover: Color, text: String) -> Accepted {
    let language = session.language();
    let rules = session.rules();
    let suffix = if rules.is_checkmate() {
        Some(Phrase::MadeCheckmate { color: mover })
    } else if rules.is_check() {
        Some(Phrase::MadeCheck { color: mover })
    } else {
        None
    };
    let announcement = match suffix {
        Some(phrase) => format!("{text}. {}", phrase.render(language)),
        None => text,
    };
    Accepted {
        announcement,
        kind: LogKind::Move,
    }
}

/// Status line: game result first, then a pending offer, then check, then whose turn.
pub fn status_text(session: &SessionContext) -> String {
    let language = session.language();
    let rules = session.rules();
    let phrase = match session.outcome() {
        Some(GameOutcome::Checkmate { winner }) => Phrase::CheckmateStatus { winner },
        Some(GameOutcome::Draw) => Phrase::DrawStatus,
        Some(GameOutcome::DrawAgreed) => Phrase::DrawAgreedStatus,
        Some(GameOutcome::Resignation { .. }) => Phrase::ResignedStatus,
        None => match session.offers().state() {
            OfferState::ResignPending { .. } => Phrase::ResignRequestedStatus,
            OfferState::DrawPending { .. } => Phrase::DrawRequestedStatus,
            OfferState::Idle if rules.is_check() => Phrase::CheckStatus {
                color: rules.turn(),
            },
            OfferState::Idle => Phrase::TurnStatus {
                color: rules.turn(),
            },
        },
    };
    phrase.render(language)
}
