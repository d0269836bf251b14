mod cli;
mod commands;
mod console;
mod input;
mod run;

use anyhow::Result;
use chesstalk_core::config::AppConfig;
use chesstalk_core::lifecycle;
use clap::Parser;

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    lifecycle::init_tracing();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref());
    if let Some(language) = cli.lang {
        config.session.language = language;
    }
    if let Some(fen) = cli.fen {
        config.session.start_fen = Some(fen);
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            lifecycle::log_startup();
            let result = run::run(config, cli.json).await;
            lifecycle::log_shutdown();
            result?;
        }
        Commands::Parse { utterance } => {
            commands::parse(&utterance.join(" "), config.session.language, cli.json)?;
        }
    }

    Ok(())
}
