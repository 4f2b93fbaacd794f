use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use giri_common::observability::init_logging;

mod cli;
mod headless;
mod wiring;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command();

    // 1) Load config (env wins)
    let cfg = wiring::load_config(cli.config.as_deref())?;

    // 2) Logging; stderr stays quiet while the UI owns the terminal
    let emit_stderr = cli.log_stderr && command != Commands::Tui;
    let log_path = init_logging(wiring::log_config(&cfg, emit_stderr))?;
    tracing::info!(log = %log_path.display(), command = ?command, "giri starting");

    // 3) One session for this process
    let (mut session, key_notice) = wiring::build_session(&cfg)?;

    let result = match command {
        Commands::Tui => giri_tui::run(session, key_notice).await.map(|mut s| s.end()),
        Commands::List { query, json } => {
            let r = headless::list(&mut session, &query, json).await;
            session.end();
            r
        }
        Commands::Ask { prompt } => {
            let r = headless::ask(&mut session, &prompt).await;
            session.end();
            r
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "giri exited with error");
    }
    result
}
