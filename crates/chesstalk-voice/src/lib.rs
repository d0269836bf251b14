pub mod command_log;
pub mod dispatcher;
pub mod events;
pub mod intent;
pub mod offers;
pub mod session;
pub mod vocabulary;
pub mod voice;

pub use command_log::{CommandLog, LogEntry, LogKind};
pub use dispatcher::{status_text, CommandDispatcher, DispatchReport, OfferResponse};
pub use events::{Effect, VoiceEvent};
pub use intent::{Intent, IntentClassifier, NormalizedCommand};
pub use offers::{OfferState, OfferStateMachine};
pub use session::SessionContext;
pub use vocabulary::Vocabulary;
pub use voice::{ListenerAction, ListenerTrigger, PiperTts, RelistenPolicy, VoiceListener};
