use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "giri")]
#[command(about = "Free certificate finder and AI chat assistant")]
pub struct Cli {
    /// YAML config file (must exist); defaults to the user and local giri.yaml
    #[arg(short, long, global = true, env = "GIRI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to stderr (ignored by the terminal UI)
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand, PartialEq, Eq)]
pub enum Commands {
    /// Interactive terminal UI (default)
    Tui,
    /// Print the current free certificates
    List {
        /// Keep only titles containing this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        query: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Send one prompt to the configured provider and print the reply
    Ask {
        /// Your question
        prompt: String,
    },
}

impl Cli {
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Tui)
    }
}
