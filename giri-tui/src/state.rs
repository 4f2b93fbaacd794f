//! Screen state and key handling, kept free of the terminal so it can be
//! driven directly in tests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use giri_common::Result as GiriResult;
use giri_listings::{ListingOutcome, ListingRecord};
use giri_llm::traits::LlmResponse;
use giri_session::{ChatMessage, ChatOutcome, NO_KEY_WARNING, PendingCall, RelayState, Session};

use crate::command::{Command, parse_command};
use crate::input::InputLine;
use crate::styles;
use crate::transcript::{TranscriptLine, chat_lines, listing_lines};
use crate::view::ViewSnap;

pub const THINKING: &str = "GIRI is thinking…";
const FETCHING: &str = "Fetching certificates…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Certificates,
    Chat,
}

impl Tab {
    pub fn toggle(self) -> Self {
        match self {
            Tab::Certificates => Tab::Chat,
            Tab::Chat => Tab::Certificates,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Certificates => 0,
            Tab::Chat => 1,
        }
    }
}

/// Work the terminal loop has to start on behalf of the state.
pub enum Effect {
    FetchListings,
    SendChat(PendingCall),
    Quit,
}

pub struct TuiState {
    session: Session,
    tab: Tab,
    filter: InputLine,
    prompt: InputLine,
    cert_lines: Vec<TranscriptLine>,
    chat_lines: Vec<TranscriptLine>,
    cert_scroll: usize,
    chat_scroll: usize,
    notice: Option<TranscriptLine>,
    fetching: bool,
    /// A refresh arrived while a fetch was in flight.
    refetch_queued: bool,
    dirty: bool,
}

impl TuiState {
    pub fn new(session: Session, key_notice: Option<&str>) -> Self {
        let mut state = Self {
            session,
            tab: Tab::Certificates,
            filter: InputLine::default(),
            prompt: InputLine::default(),
            cert_lines: vec![TranscriptLine::new("Loading certificates…", styles::system())],
            chat_lines: Vec::new(),
            cert_scroll: 0,
            chat_scroll: 0,
            notice: None,
            fetching: false,
            refetch_queued: false,
            dirty: true,
        };
        match key_notice {
            Some(msg) if state.session.relay().state() == RelayState::Ready => {
                state.push_chat(format!("✓ {msg}"), styles::success());
            }
            _ => state.push_no_key_hint(),
        }
        state.push_chat_blank();
        state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_busy(&self) -> bool {
        self.fetching || self.session.relay().state() == RelayState::Sent
    }

    /// Initial load on start-up.
    pub fn start(&mut self) -> Option<Effect> {
        self.request_listings(false)
    }

    fn push_chat(&mut self, text: impl Into<String>, style: ratatui::style::Style) {
        self.chat_lines.push(TranscriptLine::new(text, style));
        self.chat_scroll = 0;
        self.dirty = true;
    }

    fn push_chat_blank(&mut self) {
        self.chat_lines.push(TranscriptLine::blank());
    }

    fn push_no_key_hint(&mut self) {
        self.push_chat(format!("⚠ {NO_KEY_WARNING}"), styles::warning());
        self.push_chat(
            "Tip: use `/key <value>`, or set GEMINI_API_KEY to avoid typing it daily.",
            styles::dim(),
        );
    }

    fn set_notice(&mut self, text: impl Into<String>, style: ratatui::style::Style) {
        self.notice = Some(TranscriptLine::new(text, style));
        self.dirty = true;
    }

    fn show_listings(&mut self, outcome: &ListingOutcome) {
        self.cert_lines = listing_lines(outcome);
        self.cert_scroll = 0;
        self.dirty = true;
    }

    fn request_listings(&mut self, force: bool) -> Option<Effect> {
        if force {
            self.session.invalidate_listings();
        }
        if let Some(hit) = self.session.cached_listings(self.filter_query()) {
            self.show_listings(&hit);
            return None;
        }
        if self.fetching {
            self.refetch_queued |= force;
            return None;
        }
        self.fetching = true;
        self.dirty = true;
        Some(Effect::FetchListings)
    }

    /// Filter text; a half-typed command does not filter.
    fn filter_query(&self) -> &str {
        let q = self.filter.as_str();
        if q.starts_with('/') { "" } else { q }
    }

    /// Settle a finished fetch. A result that predates a refresh is dropped
    /// and the fetch is issued again.
    pub fn on_listings(&mut self, fetched: GiriResult<Vec<ListingRecord>>) -> Option<Effect> {
        if std::mem::take(&mut self.refetch_queued) {
            tracing::debug!("tui.listings_superseded");
            return Some(Effect::FetchListings);
        }
        self.fetching = false;
        let query = self.filter_query().to_string();
        let outcome = self.session.settle_listings(fetched, &query);
        self.show_listings(&outcome);
        None
    }

    pub fn on_chat(&mut self, result: GiriResult<LlmResponse>) {
        match self.session.finish_chat(result) {
            ChatOutcome::Replied(_) => {
                let lines = self
                    .session
                    .transcript()
                    .last()
                    .map(chat_lines)
                    .unwrap_or_default();
                self.chat_lines.extend(lines);
                self.chat_scroll = 0;
                self.dirty = true;
            }
            other => {
                if let Some(msg) = other.message() {
                    self.push_chat(format!("× {msg}"), styles::error());
                    self.push_chat_blank();
                }
            }
        }
    }

    pub fn on_error(&mut self, message: &str) {
        self.set_notice(format!("× Error: {message}"), styles::error());
    }

    fn active_input(&mut self) -> &mut InputLine {
        match self.tab {
            Tab::Certificates => &mut self.filter,
            Tab::Chat => &mut self.prompt,
        }
    }

    fn scroll_by(&mut self, delta: isize) {
        let scroll = match self.tab {
            Tab::Certificates => &mut self.cert_scroll,
            Tab::Chat => &mut self.chat_scroll,
        };
        *scroll = scroll.saturating_add_signed(delta);
        self.dirty = true;
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Option<Effect> {
        let before = self.filter.as_str().to_string();
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Some(Effect::Quit),
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => {
                self.tab = self.tab.toggle();
                self.notice = None;
            }
            (KeyCode::PageUp, _) => self.scroll_by(5),
            (KeyCode::PageDown, _) => self.scroll_by(-5),
            (KeyCode::Up, _) => self.scroll_by(1),
            (KeyCode::Down, _) => self.scroll_by(-1),
            (KeyCode::Enter, _) => {
                self.dirty = true;
                return self.submit();
            }
            (KeyCode::Left, _) => self.active_input().left(),
            (KeyCode::Right, _) => self.active_input().right(),
            (KeyCode::Home, _) => self.active_input().home(),
            (KeyCode::End, _) => self.active_input().end(),
            (KeyCode::Backspace, _) => self.active_input().backspace(),
            (KeyCode::Delete, _) => self.active_input().delete(),
            (KeyCode::Esc, _) => self.active_input().clear(),
            (KeyCode::Char(ch), _) => self.active_input().insert(ch),
            _ => return None,
        }
        self.dirty = true;

        // Live filtering while the keyword changes.
        if self.tab == Tab::Certificates && self.filter.as_str() != before {
            return self.request_listings(false);
        }
        None
    }

    fn submit(&mut self) -> Option<Effect> {
        let is_command = self.active_input().as_str().trim_start().starts_with('/');
        if is_command {
            let line = self.active_input().take();
            return self.handle_command(parse_command(&line));
        }

        match self.tab {
            Tab::Certificates => self.request_listings(false),
            Tab::Chat => {
                let line = self.prompt.take();
                let prompt = line.trim();
                match self.session.begin_chat(prompt) {
                    Ok(call) => {
                        self.chat_lines.extend(chat_lines(&ChatMessage::user(prompt)));
                        self.chat_scroll = 0;
                        Some(Effect::SendChat(call))
                    }
                    Err(outcome) => {
                        if let Some(msg) = outcome.message() {
                            self.push_chat(format!("⚠ {msg}"), styles::warning());
                            self.push_chat_blank();
                        }
                        None
                    }
                }
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) -> Option<Effect> {
        match cmd {
            Command::Quit => return Some(Effect::Quit),
            Command::Refresh => {
                self.tab = Tab::Certificates;
                self.set_notice("↻ Refreshing list", styles::system());
                return self.request_listings(true);
            }
            Command::Key(raw) => match self.session.enter_key(&raw) {
                Ok(()) => {
                    let hint = self
                        .session
                        .relay()
                        .credential()
                        .map(|c| c.hint())
                        .unwrap_or_default();
                    self.push_chat(format!("✓ API key set ({hint})"), styles::success());
                    self.push_chat_blank();
                }
                Err(e) => {
                    self.push_chat(format!("× Invalid API key: {e}"), styles::error());
                    self.push_chat_blank();
                }
            },
            Command::ClearKey => match self.session.clear_key() {
                Ok(()) => {
                    self.push_chat("✓ API key cleared.", styles::system());
                    self.push_no_key_hint();
                    self.push_chat_blank();
                }
                Err(e) => {
                    self.push_chat(format!("× {e}"), styles::error());
                    self.push_chat_blank();
                }
            },
            Command::Help => {
                self.tab = Tab::Chat;
                self.push_chat("Commands:", styles::label());
                for line in [
                    "  /refresh        drop the cached list and fetch again",
                    "  /key <value>    set the API key for this session",
                    "  /clear-key      forget the API key",
                    "  /quit           exit",
                    "  Tab             switch between Certificates and Chat",
                ] {
                    self.push_chat(line, styles::value());
                }
                self.push_chat_blank();
            }
            Command::Unknown(s) => {
                self.set_notice(format!("× Unknown command: {s}. Try `/help`."), styles::error());
            }
        }
        None
    }

    fn status_text(&self) -> String {
        let key = match self.session.relay().credential() {
            Some(c) => format!("{} key {}", self.session.relay().provider_label(), c.hint()),
            None => "no API key".to_string(),
        };
        format!("{key} • Tab: switch • /help")
    }

    pub fn busy_label(&self) -> Option<&'static str> {
        if self.session.relay().state() == RelayState::Sent {
            Some(THINKING)
        } else if self.fetching {
            Some(FETCHING)
        } else {
            None
        }
    }

    pub fn snapshot(&self, spinner: &'static str) -> ViewSnap {
        let (input, lines, scroll) = match self.tab {
            Tab::Certificates => (&self.filter, &self.cert_lines, self.cert_scroll),
            Tab::Chat => (&self.prompt, &self.chat_lines, self.chat_scroll),
        };
        ViewSnap {
            tab: self.tab,
            input: input.display(),
            input_cursor: input.display_cursor(),
            lines: lines.clone(),
            scroll,
            busy: self.busy_label(),
            spinner,
            notice: self.notice.clone(),
            status: self.status_text(),
        }
    }
}
