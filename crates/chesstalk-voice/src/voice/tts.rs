use std::io::Write;
use std::process::{Child, ChildStdout, Command, Stdio};

use anyhow::{Context, Result};
use chesstalk_core::config::VoiceConfig;
use chesstalk_core::{Language, SpeechOutput};

/// Piper model files for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PiperVoice {
    model_path: String,
    config_path: String,
}

/// A `piper | aplay` pair still producing audio.
struct Playback {
    piper: Child,
    aplay: Child,
}

impl Playback {
    fn stop(mut self) {
        let _ = self.piper.kill();
        let _ = self.aplay.kill();
        let _ = self.piper.wait();
        let _ = self.aplay.wait();
    }
}

/// Write the utterance to piper and hand back its audio stream. The child is
/// killed and reaped if either end of the pipe is unusable.
fn feed_text(piper: &mut Child, text: &str) -> Result<ChildStdout> {
    let fed = match piper.stdin.take() {
        Some(mut stdin) => stdin
            .write_all(text.as_bytes())
            .context("Failed to write to piper stdin"),
        None => Ok(()),
    };
    let stdout = fed.and_then(|()| piper.stdout.take().context("No piper stdout"));
    if stdout.is_err() {
        let _ = piper.kill();
        let _ = piper.wait();
    }
    stdout
}

/// Text-to-speech using Piper as a subprocess, one voice per language.
///
/// Playback is not awaited. A new announcement kills the one still playing.
pub struct PiperTts {
    piper_binary: String,
    english: PiperVoice,
    spanish: PiperVoice,
    playing: Option<Playback>,
}

impl PiperTts {
    pub fn new(piper_binary: &str) -> Self {
        let empty = PiperVoice {
            model_path: String::new(),
            config_path: String::new(),
        };
        Self {
            piper_binary: piper_binary.to_string(),
            english: empty.clone(),
            spanish: empty,
            playing: None,
        }
    }

    pub fn from_config(config: &VoiceConfig) -> Self {
        let mut tts = Self::new(&config.piper_binary);
        for language in [Language::En, Language::Es] {
            let (model, cfg) = config.piper_voice(language);
            tts = tts.with_voice(language, model, cfg);
        }
        tts
    }

    pub fn with_voice(mut self, language: Language, model_path: &str, config_path: &str) -> Self {
        let voice = PiperVoice {
            model_path: model_path.to_string(),
            config_path: config_path.to_string(),
        };
        match language {
            Language::En => self.english = voice,
            Language::Es => self.spanish = voice,
        }
        self
    }

    fn voice(&self, language: Language) -> &PiperVoice {
        match language {
            Language::En => &self.english,
            Language::Es => &self.spanish,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing.is_some()
    }

    /// Stop any current playback and start speaking `text`.
    pub fn try_speak(&mut self, text: &str, language: Language) -> Result<()> {
        self.stop_playback();
        if text.is_empty() {
            return Ok(());
        }

        let voice = self.voice(language);
        if voice.model_path.is_empty() {
            anyhow::bail!("No Piper model configured for language '{language}'");
        }
        tracing::debug!("TTS speaking ({language}): {text}");

        // piper --model X --config Y --output-raw | aplay -r 22050 -f S16_LE -c 1
        let mut piper = Command::new(&self.piper_binary)
            .args([
                "--model",
                &voice.model_path,
                "--config",
                &voice.config_path,
                "--output-raw",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .context("Failed to spawn piper")?;

        let piper_stdout = feed_text(&mut piper, text)?;

        let aplay = match Command::new("aplay")
            .args(["-r", "22050", "-f", "S16_LE", "-c", "1", "-q"])
            .stdin(piper_stdout)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                let _ = piper.kill();
                let _ = piper.wait();
                return Err(e).context("Failed to spawn aplay");
            }
        };

        self.playing = Some(Playback { piper, aplay });
        Ok(())
    }

    fn stop_playback(&mut self) {
        if let Some(playback) = self.playing.take() {
            tracing::debug!("TTS cancelling current playback");
            playback.stop();
        }
    }
}

impl SpeechOutput for PiperTts {
    fn speak(&mut self, text: &str, language: Language) {
        if let Err(e) = self.try_speak(text, language) {
            tracing::warn!("TTS failed: {e:#}");
        }
    }

    fn cancel(&mut self) {
        self.stop_playback();
    }
}

impl Drop for PiperTts {
    fn drop(&mut self) {
        self.stop_playback();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn failed_stdin_write_reaps_piper() {
        // Stands in for a piper that dies before reading its input.
        let mut child = Command::new("sh")
            .args(["-c", "exec 0<&-; sleep 30"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let text = "e4 ".repeat(200_000);
        let err = feed_text(&mut child, &text).unwrap_err();
        assert!(err.to_string().contains("piper stdin"));
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn fed_text_keeps_piper_running() {
        let mut child = Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();
        let mut stdout = feed_text(&mut child, "Player 1 made the move e4").unwrap();
        let mut echoed = String::new();
        std::io::Read::read_to_string(&mut stdout, &mut echoed).unwrap();
        assert_eq!(echoed, "Player 1 made the move e4");
        assert!(child.wait().unwrap().success());
    }

    #[test]
    fn speak_empty_text_is_noop() {
        let mut tts = PiperTts::new("nonexistent-piper").with_voice(
            Language::En,
            "model.onnx",
            "model.onnx.json",
        );
        assert!(tts.try_speak("", Language::En).is_ok());
        assert!(!tts.is_playing());
    }

    #[test]
    fn speak_with_missing_binary_fails() {
        let mut tts = PiperTts::new("/nonexistent/piper").with_voice(
            Language::En,
            "model.onnx",
            "model.onnx.json",
        );
        let result = tts.try_speak("Player 1 made the move e4", Language::En);
        assert!(result.is_err(), "Should fail when piper binary doesn't exist");
        assert!(!tts.is_playing());
    }

    #[test]
    fn missing_model_for_language_fails() {
        let mut tts = PiperTts::new("/nonexistent/piper").with_voice(
            Language::En,
            "en.onnx",
            "en.onnx.json",
        );
        let err = tts.try_speak("Turno de las negras", Language::Es).unwrap_err();
        assert!(err.to_string().contains("'es'"));
    }

    #[test]
    fn voices_come_from_config() {
        let config = VoiceConfig {
            piper_model_es: "es.onnx".into(),
            piper_config_es: "es.onnx.json".into(),
            ..VoiceConfig::default()
        };
        let tts = PiperTts::from_config(&config);
        assert_eq!(tts.voice(Language::Es).model_path, "es.onnx");
        assert!(tts.voice(Language::En).model_path.is_empty());
    }

    #[test]
    fn trait_speak_swallows_errors() {
        let mut tts = PiperTts::new("/nonexistent/piper");
        SpeechOutput::speak(&mut tts, "hello", Language::En);
        tts.cancel();
        assert!(!tts.is_playing());
    }
}
