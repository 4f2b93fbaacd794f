use giri_listings::{ListingOutcome, ListingRecord};
use giri_session::{ChatMessage, ChatRole};
use ratatui::style::Style;

use crate::styles;

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptLine {
    pub text: String,
    pub style: Style,
}

impl TranscriptLine {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    pub fn blank() -> Self {
        Self::new(String::new(), Style::default())
    }
}

/// Header plus indented body for one chat turn.
pub fn chat_lines(message: &ChatMessage) -> Vec<TranscriptLine> {
    let (header, header_style, style) = match message.role {
        ChatRole::User => ("→ [You]", styles::user_header(), styles::user_text()),
        ChatRole::Assistant => ("← [GIRI]", styles::llm_header(), styles::llm_text()),
    };
    let mut out = vec![TranscriptLine::new(header, header_style)];
    out.extend(
        message
            .content
            .lines()
            .map(|line| TranscriptLine::new(format!("  {line}"), style)),
    );
    out.push(TranscriptLine::blank());
    out
}

fn card_lines(record: &ListingRecord) -> Vec<TranscriptLine> {
    let mut out = vec![
        TranscriptLine::new(format!("▌ {}", record.title), styles::card_title()),
        TranscriptLine::new(format!("  👉 GRAB FOR FREE  {}", record.link), styles::link()),
    ];
    if let Some(image) = &record.image {
        out.push(TranscriptLine::new(format!("  🖼  {image}"), styles::dim()));
    }
    out.push(TranscriptLine::blank());
    out
}

/// Certificates tab body for one load.
pub fn listing_lines(outcome: &ListingOutcome) -> Vec<TranscriptLine> {
    let mut out = Vec::new();
    if let Some(err) = &outcome.error {
        out.push(TranscriptLine::new(format!("× Error scraping: {err}"), styles::error()));
        out.push(TranscriptLine::blank());
    }
    match outcome.empty_hint() {
        Some(hint) => out.push(TranscriptLine::new(hint, styles::system())),
        None => {
            out.push(TranscriptLine::new(
                format!(
                    "{} of {} course(s){}",
                    outcome.records.len(),
                    outcome.total,
                    if outcome.from_cache { " (cached)" } else { "" }
                ),
                styles::dim(),
            ));
            out.push(TranscriptLine::blank());
            out.extend(outcome.records.iter().flat_map(card_lines));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_outcome_shows_hint_and_error() {
        let outcome = ListingOutcome {
            records: vec![],
            total: 0,
            from_cache: false,
            fetched_at: None,
            error: Some(giri_common::GiriError::Network("refused".into())),
        };
        let text: Vec<String> = listing_lines(&outcome).into_iter().map(|l| l.text).collect();
        assert!(text[0].contains("Network error: refused"));
        assert_eq!(text.last().unwrap(), "No certificates found. Try a different keyword.");
    }

    #[test]
    fn cards_carry_title_and_link() {
        let outcome = ListingOutcome {
            records: vec![ListingRecord::new("Rust 101", "https://x.test/r")],
            total: 3,
            from_cache: true,
            fetched_at: None,
            error: None,
        };
        let text: Vec<String> = listing_lines(&outcome).into_iter().map(|l| l.text).collect();
        assert_eq!(text[0], "1 of 3 course(s) (cached)");
        assert!(text.contains(&"▌ Rust 101".to_string()));
        assert!(text.iter().any(|l| l.ends_with("https://x.test/r")));
    }

    #[test]
    fn multi_line_reply_is_indented() {
        let lines = chat_lines(&ChatMessage::assistant("one\ntwo"));
        let text: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(text, ["← [GIRI]", "  one", "  two", ""]);
    }
}
