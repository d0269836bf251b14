use anyhow::{Context, Result};
use chesstalk_core::config::AppConfig;
use chesstalk_core::SpeechOutput;
use chesstalk_rules::ShakmatyEngine;
use chesstalk_voice::{
    CommandDispatcher, ListenerAction, ListenerTrigger, PiperTts, RelistenPolicy, SessionContext,
    VoiceListener,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::console::{print_effects, print_report, ConsoleRenderer, ConsoleSpeech};
use crate::input::{parse_line, ConsoleInput, HELP};

/// Interactive session: stdin stands in for the recognizer and the board controls.
pub async fn run(config: AppConfig, json: bool) -> Result<()> {
    let engine = match &config.session.start_fen {
        Some(fen) => ShakmatyEngine::from_fen(fen).context("Invalid start position")?,
        None => ShakmatyEngine::new(),
    };
    let mut session = SessionContext::new(Box::new(engine), config.session.language);

    let speech: Box<dyn SpeechOutput> = if config.voice.tts_enabled {
        tracing::info!("Piper TTS enabled ({})", config.voice.piper_binary);
        Box::new(PiperTts::from_config(&config.voice))
    } else {
        Box::new(ConsoleSpeech::new(json))
    };
    let mut dispatcher = CommandDispatcher::new(Box::new(ConsoleRenderer::new(json)), speech);

    let mut listener = if config.voice.enabled {
        let listener = VoiceListener::new(RelistenPolicy::from_flag(config.voice.auto_relisten));
        tracing::info!("Voice input enabled ({:?})", listener.policy());
        listener
    } else {
        tracing::info!("Voice input disabled in config");
        VoiceListener::disabled()
    };

    let (tx, mut rx) = mpsc::channel::<ConsoleInput>(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Some(input) = parse_line(&line) {
                        if tx.send(input).await.is_err() {
                            break;
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("stdin read failed: {e}");
                    break;
                }
            }
        }
    });

    if !json {
        println!("{HELP}");
    }
    if config.session.announce_welcome {
        print_report(&dispatcher.welcome(&mut session), json);
    }
    if config.voice.enabled {
        let actions = listener.handle(ListenerTrigger::StartRequested);
        perform(&mut dispatcher, &mut session, &mut listener, actions, json);
    }

    while let Some(input) = rx.recv().await {
        match input {
            ConsoleInput::Voice(event) => {
                if let Some(trigger) = ListenerTrigger::from_event(event) {
                    let actions = listener.handle(trigger);
                    if actions.is_empty() && !json {
                        println!("(not listening, type :listen)");
                    }
                    perform(&mut dispatcher, &mut session, &mut listener, actions, json);
                }
            }
            ConsoleInput::StartListening => {
                let actions = listener.handle(ListenerTrigger::StartRequested);
                perform(&mut dispatcher, &mut session, &mut listener, actions, json);
            }
            ConsoleInput::StopListening => {
                let actions = listener.handle(ListenerTrigger::StopRequested);
                perform(&mut dispatcher, &mut session, &mut listener, actions, json);
            }
            ConsoleInput::Offer(response) => {
                print_report(&dispatcher.respond_to_offer(&mut session, response), json);
            }
            ConsoleInput::ManualMove(from, to) => {
                print_report(&dispatcher.apply_manual_move(&mut session, from, to), json);
            }
            ConsoleInput::SetLanguage(language) => {
                session.set_language(language);
                if !json {
                    println!("-- language: {language}");
                }
            }
            ConsoleInput::NewGame => {
                print_report(&dispatcher.start_new_game(&mut session), json);
            }
            ConsoleInput::Quit => break,
            ConsoleInput::Invalid(reason) => {
                tracing::warn!("Ignoring input: {reason}");
                if !json {
                    println!("?? {reason}");
                }
            }
        }
    }

    tracing::info!(
        "Session {} ended after {} log entries",
        session.id(),
        session.log().len()
    );
    Ok(())
}

/// Carry out listener actions. Dispatching finishes processing, which may
/// restart listening per the relisten policy.
fn perform(
    dispatcher: &mut CommandDispatcher,
    session: &mut SessionContext,
    listener: &mut VoiceListener,
    actions: Vec<ListenerAction>,
    json: bool,
) {
    let mut pending = actions;
    while !pending.is_empty() {
        let mut next = Vec::new();
        for action in pending {
            match action {
                ListenerAction::StartRecognition => {
                    tracing::debug!("Listening ({})", session.language().speech_tag());
                }
                ListenerAction::StopRecognition => tracing::debug!("Stopped listening"),
                ListenerAction::Dispatch(text) => {
                    print_report(&dispatcher.handle_transcript(session, &text), json);
                    next.extend(listener.handle(ListenerTrigger::ProcessingFinished));
                }
                ListenerAction::ReportError(code) => {
                    print_report(&dispatcher.report_recognition_error(session, &code), json);
                    next.extend(listener.handle(ListenerTrigger::ProcessingFinished));
                }
                ListenerAction::Unsupported => {
                    print_effects(&dispatcher.announce_voice_unsupported(session), json);
                }
            }
        }
        pending = next;
    }
}
