use std::path::PathBuf;

use chesstalk_core::Language;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "chesstalk", about = "ChessTalk: play chess by voice")]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Active language (en, es); overrides the config
    #[arg(long, global = true)]
    pub lang: Option<Language>,

    /// Start from this position instead of the standard one
    #[arg(long, global = true)]
    pub fen: Option<String>,

    /// Print every effect as a JSON line instead of the console board
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive game session (default)
    Run,

    /// Show how an utterance is normalized and classified, without playing it
    Parse {
        /// The utterance, e.g. "move knight to f3"
        utterance: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_to_no_subcommand() {
        let cli = Cli::try_parse_from(["chesstalk"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parse_subcommand_with_language() {
        let cli =
            Cli::try_parse_from(["chesstalk", "parse", "--lang", "es", "mueve", "torre", "a", "a5"])
                .unwrap();
        assert_eq!(cli.lang, Some(Language::Es));
        match cli.command {
            Some(Commands::Parse { utterance }) => assert_eq!(utterance.join(" "), "mueve torre a a5"),
            _ => panic!("expected parse"),
        }
    }

    #[test]
    fn rejects_unknown_language() {
        assert!(Cli::try_parse_from(["chesstalk", "--lang", "fr"]).is_err());
    }
}
