pub mod engine;

pub use chesstalk_core::{RulesEngine, RulesError, RulesResult};
pub use engine::ShakmatyEngine;
