use std::sync::{Arc, Mutex};

use chesstalk_core::{
    BoardRenderer, CastleSide, Color, CommandError, GameOutcome, Language, LegalDestinations,
    PieceKind, SpeechOutput, Square,
};
use chesstalk_rules::ShakmatyEngine;
use chesstalk_voice::offers::OfferState;
use chesstalk_voice::{
    CommandDispatcher, DispatchReport, Effect, Intent, LogKind, OfferResponse, SessionContext,
};

const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const CASTLING_FEN: &str = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";

#[derive(Clone, Default)]
struct Recorder {
    boards: Arc<Mutex<Vec<String>>>,
    spoken: Arc<Mutex<Vec<(String, Language)>>>,
}

struct RecordingRenderer(Arc<Mutex<Vec<String>>>);

impl BoardRenderer for RecordingRenderer {
    fn render(&mut self, fen: &str, _dests: &LegalDestinations) {
        self.0.lock().unwrap().push(fen.to_string());
    }
}

struct RecordingSpeech(Arc<Mutex<Vec<(String, Language)>>>);

impl SpeechOutput for RecordingSpeech {
    fn speak(&mut self, text: &str, language: Language) {
        self.0.lock().unwrap().push((text.to_string(), language));
    }
}

fn harness(fen: Option<&str>, language: Language) -> (CommandDispatcher, SessionContext, Recorder) {
    let recorder = Recorder::default();
    let dispatcher = CommandDispatcher::new(
        Box::new(RecordingRenderer(recorder.boards.clone())),
        Box::new(RecordingSpeech(recorder.spoken.clone())),
    );
    let engine = match fen {
        Some(fen) => ShakmatyEngine::from_fen(fen).unwrap(),
        None => ShakmatyEngine::new(),
    };
    let session = SessionContext::new(Box::new(engine), language);
    (dispatcher, session, recorder)
}

fn sq(s: &str) -> Square {
    Square::parse(s).unwrap()
}

fn status(report: &DispatchReport) -> Option<&str> {
    report.effects.iter().find_map(|e| match e {
        Effect::Status { text } => Some(text.as_str()),
        _ => None,
    })
}

fn announcement(report: &DispatchReport) -> Option<&str> {
    report.effects.iter().find_map(|e| match e {
        Effect::Announcement { text, .. } => Some(text.as_str()),
        _ => None,
    })
}

fn say(d: &mut CommandDispatcher, s: &mut SessionContext, text: &str) -> DispatchReport {
    let report = d.handle_transcript(s, text);
    assert!(report.is_ok(), "'{text}' failed: {:?}", report.outcome);
    report
}

#[test]
fn pawn_to_e4_from_opening() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = say(&mut d, &mut s, "move pawn to e4");
    assert_eq!(report.intent, Some(Intent::Move));
    assert_eq!(s.rules().history_san(), vec!["e4"]);
    assert_eq!(s.rules().turn(), Color::Black);
    assert!(s.rules().fen().starts_with("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b"));
}

#[test]
fn knight_to_f3_emits_all_four_effects() {
    let (mut d, mut s, rec) = harness(None, Language::En);
    let report = say(&mut d, &mut s, "move knight to f3");

    assert_eq!(report.effects.len(), 4);
    match &report.effects[0] {
        Effect::BoardUpdated { fen, dests } => {
            assert!(fen.contains("5N2"));
            assert!(dests.contains_key(&sq("e7")));
        }
        other => panic!("expected board update first, got {other:?}"),
    }
    assert_eq!(status(&report), Some("Black's turn"));
    assert_eq!(announcement(&report), Some("Player 1 made the move Nf3"));
    assert!(matches!(report.effects[3], Effect::LogAppended { .. }));

    assert_eq!(s.log().len(), 1);
    assert_eq!(s.log().entries()[0].kind, LogKind::Move);
    assert_eq!(rec.boards.lock().unwrap().len(), 1);
    assert_eq!(
        rec.spoken.lock().unwrap()[0],
        ("Player 1 made the move Nf3".to_string(), Language::En)
    );
}

#[test]
fn unrecognized_command_changes_nothing() {
    let (mut d, mut s, rec) = harness(None, Language::En);
    let report = d.handle_transcript(&mut s, "hello there");
    assert_eq!(report.outcome, Err(CommandError::UnrecognizedCommand));
    assert!(matches!(report.intent, Some(Intent::Unrecognized { .. })));
    assert_eq!(s.rules().fen(), START_FEN);
    assert!(rec.boards.lock().unwrap().is_empty());
    assert_eq!(
        rec.spoken.lock().unwrap()[0].0,
        "Error: Command not recognized"
    );
    assert!(s.log().is_empty());
    assert_eq!(report.effects.len(), 2);
}

#[test]
fn missing_destination_is_reported() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = d.handle_transcript(&mut s, "move the knight");
    assert_eq!(report.outcome, Err(CommandError::MissingParameter));
    assert!(report
        .effects
        .iter()
        .any(|e| matches!(e, Effect::Error { message } if message == "Could not identify piece or destination")));
}

#[test]
fn illegal_move_names_piece_and_square() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = d.handle_transcript(&mut s, "move pawn to e5");
    assert_eq!(
        report.outcome,
        Err(CommandError::NoLegalMove {
            piece: PieceKind::Pawn,
            square: sq("e5")
        })
    );
    assert_eq!(announcement(&report), Some("Error: Invalid move for pawn to e5"));
    assert_eq!(s.rules().fen(), START_FEN);
}

#[test]
fn castling_blocked_at_start() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = d.handle_transcript(&mut s, "castle kingside");
    assert_eq!(report.intent, Some(Intent::Castle { side: CastleSide::Kingside }));
    assert_eq!(
        report.outcome,
        Err(CommandError::CastlingNotAllowed {
            side: CastleSide::Kingside
        })
    );
    assert_eq!(s.rules().fen(), START_FEN);
    assert!(s.rules().history_san().is_empty());
}

#[test]
fn castling_applies_when_clear() {
    let (mut d, mut s, _) = harness(Some(CASTLING_FEN), Language::En);
    let report = say(&mut d, &mut s, "castle kingside");
    assert_eq!(s.rules().history_san(), vec!["O-O"]);
    assert_eq!(
        announcement(&report),
        Some("Player 1 made the move Castle kingside")
    );

    let report = say(&mut d, &mut s, "castle queenside");
    assert_eq!(report.intent, Some(Intent::Castle { side: CastleSide::Queenside }));
    assert_eq!(s.rules().history_san(), vec!["O-O", "O-O-O"]);
}

#[test]
fn undo_on_empty_history_fails_without_mutation() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = d.handle_transcript(&mut s, "undo");
    assert_eq!(report.outcome, Err(CommandError::NothingToUndo));
    assert_eq!(s.rules().fen(), START_FEN);
    assert_eq!(s.offers().state(), OfferState::Idle);
    assert!(s.log().is_empty());
    assert!(matches!(report.effects[0], Effect::Error { .. }));
    assert_eq!(announcement(&report), Some("Error: No moves to undo"));
    assert!(!report
        .effects
        .iter()
        .any(|e| matches!(e, Effect::LogAppended { .. })));
}

#[test]
fn undo_takes_back_last_move() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "move pawn to e4");
    let report = say(&mut d, &mut s, "undo");
    assert_eq!(announcement(&report), Some("Player 1 move undone: e4"));
    assert_eq!(s.rules().fen(), START_FEN);
    assert_eq!(status(&report), Some("White's turn"));
}

#[test]
fn read_history_lists_numbered_moves() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = say(&mut d, &mut s, "read");
    assert_eq!(
        announcement(&report),
        Some("Player 1 these are the moves made: No moves")
    );

    say(&mut d, &mut s, "move pawn to e4");
    say(&mut d, &mut s, "move pawn to e5");
    say(&mut d, &mut s, "move knight to f3");
    let report = say(&mut d, &mut s, "read the moves");
    assert_eq!(
        announcement(&report),
        Some("Player 2 these are the moves made: 1. e4 e5, 2. Nf3")
    );
}

#[test]
fn repeated_draw_offer_is_idempotent() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let first = say(&mut d, &mut s, "draw");
    let pending = s.offers().state();
    assert_eq!(pending, OfferState::DrawPending { offered_by: Color::White });
    assert_eq!(
        status(&first),
        Some("The player has requested a draw. Please confirm or cancel")
    );

    let second = say(&mut d, &mut s, "draw");
    assert_eq!(s.offers().state(), pending);
    assert_eq!(announcement(&second), Some("Player 1 has proposed a draw"));
}

#[test]
fn pending_offer_survives_moves_and_can_be_accepted() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "draw");
    say(&mut d, &mut s, "move pawn to e4");
    assert!(s.offers().is_pending());

    let report = d.respond_to_offer(&mut s, OfferResponse::AcceptDraw);
    assert!(report.is_ok());
    assert_eq!(announcement(&report), Some("Player 2 accepted the draw"));
    assert_eq!(status(&report), Some("Draw agreed!"));
    assert_eq!(s.outcome(), Some(GameOutcome::DrawAgreed));
}

#[test]
fn rejected_draw_continues_game() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "draw");
    let report = d.respond_to_offer(&mut s, OfferResponse::RejectDraw);
    assert!(report.is_ok());
    assert_eq!(s.outcome(), None);
    assert_eq!(status(&report), Some("White's turn"));
}

#[test]
fn response_without_offer_fails() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = d.respond_to_offer(&mut s, OfferResponse::ConfirmResign);
    assert_eq!(report.outcome, Err(CommandError::NoPendingOffer));
    assert_eq!(s.outcome(), None);
}

#[test]
fn resignation_ends_the_game() {
    let (mut d, mut s, _) = harness(None, Language::En);
    let report = say(&mut d, &mut s, "resign");
    assert_eq!(
        announcement(&report),
        Some("Player 1 are you sure you want to resign?")
    );

    let report = d.respond_to_offer(&mut s, OfferResponse::ConfirmResign);
    assert_eq!(announcement(&report), Some("Player 1 resigned"));
    assert_eq!(status(&report), Some("The player has resigned"));
    assert_eq!(
        s.outcome(),
        Some(GameOutcome::Resignation {
            resigned: Color::White
        })
    );

    let report = d.handle_transcript(&mut s, "move pawn to e4");
    assert_eq!(report.outcome, Err(CommandError::GameOver));
    let report = d.handle_transcript(&mut s, "undo");
    assert_eq!(report.outcome, Err(CommandError::NothingToUndo));
    assert!(d.handle_transcript(&mut s, "read").is_ok());
}

#[test]
fn cancelled_resignation_keeps_playing() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "resign");
    let report = d.respond_to_offer(&mut s, OfferResponse::CancelResign);
    assert_eq!(announcement(&report), Some("Player 1 cancelled the resignation"));
    say(&mut d, &mut s, "move pawn to d4");
}

#[test]
fn fools_mate_reports_checkmate() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "move pawn to f3");
    say(&mut d, &mut s, "move pawn to e5");
    say(&mut d, &mut s, "move pawn to g4");
    let report = say(&mut d, &mut s, "move queen to h4");

    assert_eq!(status(&report), Some("Checkmate! Black wins"));
    assert_eq!(
        announcement(&report),
        Some("Player 2 made the move Qh4#. Player 2 made Checkmate")
    );
    assert_eq!(
        s.outcome(),
        Some(GameOutcome::Checkmate {
            winner: Color::Black
        })
    );
    let report = d.handle_transcript(&mut s, "move pawn to a3");
    assert_eq!(report.outcome, Err(CommandError::GameOver));

    // Board mates can be taken back.
    say(&mut d, &mut s, "undo");
    assert_eq!(s.outcome(), None);
}

#[test]
fn check_is_announced() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "move pawn to e4");
    say(&mut d, &mut s, "move pawn to f6");
    let report = say(&mut d, &mut s, "move queen to h5");
    assert_eq!(status(&report), Some("Check! Black's turn"));
    assert_eq!(
        announcement(&report),
        Some("Player 1 made the move Qh5+. Player 1 made Check")
    );
}

#[test]
fn ambiguous_knights_resolve_deterministically() {
    let fen = "4k3/8/8/8/8/8/8/1N2KN2 w - - 0 1";
    let mut results = Vec::new();
    for _ in 0..3 {
        let (mut d, mut s, _) = harness(Some(fen), Language::En);
        say(&mut d, &mut s, "move knight to d2");
        results.push(s.rules().fen());
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn pawn_promotes_to_queen() {
    let (mut d, mut s, _) = harness(Some("4k3/P7/8/8/8/8/8/4K3 w - - 0 1"), Language::En);
    let report = say(&mut d, &mut s, "move pawn to a8");
    assert_eq!(s.rules().history_san(), vec!["a8=Q+"]);
    assert_eq!(status(&report), Some("Check! Black's turn"));
}

#[test]
fn language_changes_text_not_game() {
    let (mut d_en, mut en, _) = harness(None, Language::En);
    let (mut d_es, mut es, _) = harness(None, Language::Es);

    let en_report = say(&mut d_en, &mut en, "move knight to f3");
    let es_report = say(&mut d_es, &mut es, "mueve caballo a f3");

    assert_eq!(en.rules().fen(), es.rules().fen());
    assert_eq!(status(&en_report), Some("Black's turn"));
    assert_eq!(status(&es_report), Some("Turno de las negras"));
    assert_eq!(announcement(&es_report), Some("Jugador 1 hizo la jugada Nf3"));
}

#[test]
fn spanish_split_square_with_a_file() {
    let (mut d, mut s, _) = harness(Some("4k3/8/8/8/8/8/8/R3K3 w - - 0 1"), Language::Es);
    say(&mut d, &mut s, "mueve torre a a 5");
    assert_eq!(s.rules().history_san(), vec!["Ra5"]);
}

#[test]
fn switching_language_mid_game() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "move pawn to e4");
    s.set_language(Language::Es);
    let report = say(&mut d, &mut s, "mueve peón a e5");
    assert_eq!(status(&report), Some("Turno de las blancas"));
    assert_eq!(s.rules().history_san(), vec!["e4", "e5"]);
}

#[test]
fn manual_move_uses_same_pipeline() {
    let (mut d, mut s, rec) = harness(None, Language::En);
    let report = d.apply_manual_move(&mut s, sq("g1"), sq("f3"));
    assert!(report.is_ok());
    assert_eq!(report.intent, None);
    assert_eq!(announcement(&report), Some("Player 1 made the move Nf3"));
    assert_eq!(rec.boards.lock().unwrap().len(), 1);

    let report = d.apply_manual_move(&mut s, sq("e2"), sq("e4"));
    assert!(report.outcome.is_err());
    assert_eq!(s.rules().history_san(), vec!["Nf3"]);
}

#[test]
fn recognition_error_is_spoken() {
    let (mut d, mut s, rec) = harness(None, Language::Es);
    let report = d.report_recognition_error(&mut s, "no-speech");
    assert_eq!(
        report.outcome,
        Err(CommandError::Recognition {
            code: "no-speech".into()
        })
    );
    assert_eq!(
        rec.spoken.lock().unwrap()[0].0,
        "Error: Error de reconocimiento de voz: no-speech"
    );
}

#[test]
fn new_game_resets_everything() {
    let (mut d, mut s, _) = harness(None, Language::En);
    say(&mut d, &mut s, "move pawn to e4");
    say(&mut d, &mut s, "resign");
    d.respond_to_offer(&mut s, OfferResponse::ConfirmResign);
    assert!(s.is_over());

    let report = d.start_new_game(&mut s);
    assert_eq!(
        announcement(&report),
        Some("Welcome to ChessTalk. White begins")
    );
    assert_eq!(s.rules().fen(), START_FEN);
    assert!(!s.is_over());
    assert_eq!(s.offers().state(), OfferState::Idle);
    assert_eq!(s.log().len(), 1);
}

#[test]
fn custom_vocabulary_and_rule_order() {
    use chesstalk_voice::intent::classifier::default_rules;
    use chesstalk_voice::vocabulary::TokenCategory;
    use chesstalk_voice::{IntentClassifier, Vocabulary};

    let mut vocabulary = Vocabulary::builtin();
    vocabulary
        .insert(Language::En, "horse", "n", TokenCategory::Piece)
        .unwrap();
    // Draw checked before move: "move ... draw" now offers a draw.
    let mut rules = default_rules();
    let draw = rules.iter().position(|r| r.name == "offer_draw").unwrap();
    let rule = rules.remove(draw);
    rules.insert(0, rule);

    let (d, mut s, _) = harness(None, Language::En);
    let mut d = d
        .with_vocabulary(vocabulary)
        .with_classifier(IntentClassifier::with_rules(rules));

    say(&mut d, &mut s, "move horse to f3");
    assert_eq!(s.rules().history_san(), vec!["Nf3"]);

    let report = say(&mut d, &mut s, "move pawn to draw");
    assert_eq!(report.intent, Some(Intent::OfferDraw));
}
