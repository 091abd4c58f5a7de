//! Consultant terminal chat client entry point.
//!
//! Binary name: `consult`
//!
//! Parses CLI arguments, initializes tracing and configuration, then
//! dispatches to the command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use consultant_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_filter};

use cli::{Cli, Commands, SessionAction};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(verbosity_filter(cli.verbose, cli.quiet), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "consult", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.config_dir.clone(), cli.backend_url.as_deref()).await?;

    let result = match cli.command {
        Commands::Chat => cli::chat::loop_runner::run_chat_loop(&state).await,
        Commands::Ask { text } => cli::ask::ask(&state, &text.join(" "), cli.json).await,
        Commands::Upload { file } => cli::upload::upload(&state, &file, cli.json).await,
        Commands::Session { action } => match action {
            SessionAction::New => cli::session::new_session(&state, cli.json).await,
            SessionAction::Show { id } => cli::session::show_session(&state, &id, cli.json).await,
        },
        Commands::Completions { .. } => Ok(()),
    };

    shutdown_tracing();
    result
}
