use anyhow::Result;
use chesstalk_core::Language;
use chesstalk_voice::intent::{extract_move, normalize, MoveParameters, Token};
use chesstalk_voice::{Intent, IntentClassifier, Vocabulary};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ParseOutput {
    pub language: Language,
    pub tokens: Vec<Token>,
    pub text: String,
    pub intent: Intent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<MoveParameters>,
}

/// Run an utterance through normalize, classify and extract without a game.
pub fn interpret(utterance: &str, language: Language) -> ParseOutput {
    let vocabulary = Vocabulary::builtin();
    let cmd = normalize(utterance, language, &vocabulary);
    let intent = IntentClassifier::new().classify(&cmd);
    let parameters = (intent == Intent::Move).then(|| extract_move(&cmd));
    ParseOutput {
        language,
        tokens: cmd.tokens,
        text: cmd.text,
        intent,
        parameters,
    }
}

pub fn parse(utterance: &str, language: Language, json: bool) -> Result<()> {
    let output = interpret(utterance, language);
    if json {
        println!("{}", serde_json::to_string(&output)?);
        return Ok(());
    }
    println!("language:   {}", output.language);
    println!("normalized: {}", output.text);
    for token in &output.tokens {
        let category = token
            .category
            .map(|c| format!("{c:?}"))
            .unwrap_or_else(|| "-".into());
        println!("  {:<16} -> {:<10} {category}", token.spoken, token.canonical);
    }
    println!("intent:     {}", output.intent.name());
    if let Intent::Unrecognized { reason } = &output.intent {
        println!("reason:     {reason}");
    }
    if let Some(params) = output.parameters {
        let piece = params
            .piece
            .map(|p| p.symbol().to_string())
            .unwrap_or_else(|| "?".into());
        let square = params
            .destination
            .map(|s| s.to_string())
            .unwrap_or_else(|| "?".into());
        println!("piece:      {piece}");
        println!("square:     {square}");
    }
    Ok(())
}
