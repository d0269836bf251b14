pub mod listener;
pub mod tts;

pub use listener::{ListenerAction, ListenerState, ListenerTrigger, RelistenPolicy, VoiceListener};
pub use tts::PiperTts;
