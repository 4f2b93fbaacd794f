use crate::{
    state::{Effect, TuiState},
    view,
};
use anyhow::Result;
use crossterm::{
    event::{Event as CtEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use giri_listings::ListingRecord;
use giri_llm::traits::LlmResponse;
use giri_session::Session;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self, Stdout},
    time::{Duration, Instant},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    ListingsDone(giri_common::Result<Vec<ListingRecord>>),
    ChatDone(giri_common::Result<LlmResponse>),
    OpError(String),
    Shutdown,
}

/// Leaves raw mode and the alternate screen when dropped, including on
/// early returns and panics unwinding through the loop.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

pub struct Tui {
    state: TuiState,

    // terminal
    term: Terminal<CrosstermBackend<Stdout>>,
    _guard: TerminalGuard,
    tick_rate: Duration,
    last_tick: Instant,
    spin_idx: usize,

    // self-address for background work
    tx: mpsc::Sender<TuiMsg>,
    shutdown: CancellationToken,
}

impl Tui {
    pub fn new(state: TuiState, tx: mpsc::Sender<TuiMsg>, shutdown: CancellationToken) -> Result<Self> {
        let mut stdout = io::stdout();
        enable_raw_mode()?;
        let guard = TerminalGuard;
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;
        term.clear()?;

        Ok(Self {
            state,
            term,
            _guard: guard,
            tick_rate: Duration::from_millis(80),
            last_tick: Instant::now(),
            spin_idx: 0,
            tx,
            shutdown,
        })
    }

    /// Process messages until quit, then hand the session back.
    pub async fn run(mut self, mut rx: mpsc::Receiver<TuiMsg>) -> Result<Session> {
        if let Some(effect) = self.state.start() {
            self.dispatch(effect);
        }
        self.draw()?;

        loop {
            let msg = tokio::select! {
                _ = self.shutdown.cancelled() => break,
                msg = rx.recv() => msg,
            };
            match msg {
                Some(TuiMsg::Shutdown) | None => break,
                Some(msg) => self.handle(msg)?,
            }
        }

        self.shutdown.cancel();
        tracing::info!("tui.exit");
        let Tui { state, .. } = self;
        Ok(state.into_session())
    }

    fn spinner(&self) -> &'static str {
        if self.state.is_busy() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }

    fn step_spinner(&mut self) {
        if self.state.is_busy() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.state.mark_dirty();
        }
    }

    fn draw(&mut self) -> Result<()> {
        let snap = self.state.snapshot(self.spinner());
        view::draw(&mut self.term, &snap)
    }

    fn dispatch(&mut self, effect: Effect) {
        match effect {
            Effect::FetchListings => {
                let service = self.state.session().listing_service().clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let fetched = service.fetch_records().await;
                    let _ = tx.send(TuiMsg::ListingsDone(fetched)).await;
                });
            }
            Effect::SendChat(call) => {
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = call.run().await;
                    let _ = tx.send(TuiMsg::ChatDone(result)).await;
                });
            }
            Effect::Quit => self.shutdown.cancel(),
        }
    }

    fn handle(&mut self, msg: TuiMsg) -> Result<()> {
        match msg {
            TuiMsg::InputEvent(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                if let Some(effect) = self.state.on_key(key) {
                    self.dispatch(effect);
                }
            }
            TuiMsg::InputEvent(CtEvent::Resize(_, _)) => self.state.mark_dirty(),
            TuiMsg::InputEvent(_) => {}
            TuiMsg::ListingsDone(fetched) => {
                if let Some(effect) = self.state.on_listings(fetched) {
                    self.dispatch(effect);
                }
            }
            TuiMsg::ChatDone(result) => self.state.on_chat(result),
            TuiMsg::OpError(e) => {
                tracing::warn!(error = %e, "tui.op_error");
                self.state.on_error(&e);
            }
            TuiMsg::Tick => {
                self.step_spinner();
                if self.state.is_dirty() || self.last_tick.elapsed() >= self.tick_rate {
                    self.draw()?;
                    self.last_tick = Instant::now();
                    self.state.mark_clean();
                }
            }
            TuiMsg::Shutdown => self.shutdown.cancel(),
        }
        Ok(())
    }
}
