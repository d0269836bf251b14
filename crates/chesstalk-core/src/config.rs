use serde::Deserialize;
use std::path::Path;

use crate::language::Language;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_true")]
    pub announce_welcome: bool,
    /// Optional FEN to start from instead of the standard position.
    #[serde(default)]
    pub start_fen: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            announce_welcome: true,
            start_fen: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    /// When false, speech input is treated as unavailable.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Go back to listening after each result or error until explicitly stopped.
    #[serde(default = "default_true")]
    pub auto_relisten: bool,
    #[serde(default)]
    pub tts_enabled: bool,
    #[serde(default = "default_piper_binary")]
    pub piper_binary: String,
    #[serde(default)]
    pub piper_model_en: String,
    #[serde(default)]
    pub piper_config_en: String,
    #[serde(default)]
    pub piper_model_es: String,
    #[serde(default)]
    pub piper_config_es: String,
}

fn default_piper_binary() -> String {
    "piper".into()
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auto_relisten: true,
            tts_enabled: false,
            piper_binary: default_piper_binary(),
            piper_model_en: String::new(),
            piper_config_en: String::new(),
            piper_model_es: String::new(),
            piper_config_es: String::new(),
        }
    }
}

impl VoiceConfig {
    /// Piper model and config paths for a language.
    pub fn piper_voice(&self, language: Language) -> (&str, &str) {
        match language {
            Language::En => (&self.piper_model_en, &self.piper_config_en),
            Language::Es => (&self.piper_model_es, &self.piper_config_es),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            voice: VoiceConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config with fallback chain: explicit path → ./config/default.toml → hardcoded defaults.
    pub fn load_or_default(explicit_path: Option<&Path>) -> Self {
        if let Some(path) = explicit_path {
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {e}", path.display());
                }
            }
        }

        let default_path = Path::new("config/default.toml");
        if default_path.exists() {
            match Self::load(default_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    tracing::warn!("Failed to load default config: {e}");
                }
            }
        }

        tracing::info!("Using hardcoded default configuration");
        Self::default()
    }
}
