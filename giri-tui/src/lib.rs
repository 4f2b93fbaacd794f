//! Terminal front end: a Certificates tab and a Chat tab over one [`Session`].

mod command;
mod feeders;
mod input;
mod state;
mod styles;
mod transcript;
mod tui;
mod view;

use giri_session::Session;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

pub use feeders::spawn_tui_feeders;
pub use state::{Effect, Tab, TuiState};
pub use tui::{Tui, TuiMsg};

/// Run the UI until the user quits, then return the session.
///
/// `key_notice` is shown in the Chat tab when a configured key was loaded.
pub async fn run(session: Session, key_notice: Option<&str>) -> anyhow::Result<Session> {
    let (tx, rx) = mpsc::channel(256);
    let shutdown = CancellationToken::new();
    let tui = Tui::new(TuiState::new(session, key_notice), tx.clone(), shutdown.clone())?;
    spawn_tui_feeders(tx, shutdown);
    tui.run(rx).await
}
