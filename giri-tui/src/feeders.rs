use crate::tui::TuiMsg;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;
use tokio_util::sync::CancellationToken;

const INPUT_POLL: Duration = Duration::from_millis(100);
const TICK: Duration = Duration::from_millis(80);

/// Terminal input and redraw ticks, both stopped by `shutdown`.
pub fn spawn_tui_feeders(tx: mpsc::Sender<TuiMsg>, shutdown: CancellationToken) {
    // One blocking thread polls so it can notice the shutdown between reads.
    let tx_in = tx.clone();
    let shutdown_input = shutdown.clone();
    tokio::task::spawn_blocking(move || {
        while !shutdown_input.is_cancelled() {
            match crossterm::event::poll(INPUT_POLL) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(e) => {
                    let _ = tx_in.blocking_send(TuiMsg::OpError(format!("input: {e}")));
                    break;
                }
            }
            let msg = match crossterm::event::read() {
                Ok(ev) => TuiMsg::InputEvent(ev),
                Err(e) => TuiMsg::OpError(format!("input: {e}")),
            };
            if tx_in.blocking_send(msg).is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut interval = time::interval(TICK);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    let _ = tx.try_send(TuiMsg::Tick);
                }
            }
        }
    });
}
