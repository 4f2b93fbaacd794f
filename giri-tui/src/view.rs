use crate::state::Tab;
use crate::transcript::TranscriptLine;
use anyhow::Result;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
};
use std::io::Stdout;
use textwrap::wrap;

const TAB_TITLES: [&str; 2] = ["🎓 Free Certificates", "💬 Chat with GIRI"];

pub struct ViewSnap {
    pub tab: Tab,
    pub input: String,
    pub input_cursor: usize,
    pub lines: Vec<TranscriptLine>,
    pub scroll: usize,
    pub busy: Option<&'static str>,
    pub spinner: &'static str,
    pub notice: Option<TranscriptLine>,
    pub status: String,
}

fn body_title(tab: Tab) -> &'static str {
    match tab {
        Tab::Certificates => " Find 100% OFF Courses ",
        Tab::Chat => " Ask GIRI Anything ",
    }
}

fn input_title(tab: Tab) -> &'static str {
    match tab {
        Tab::Certificates => " Filter Certificates (e.g., Python, Marketing) ",
        Tab::Chat => " Ask about career, skills, or courses... ",
    }
}

pub fn draw(term: &mut Terminal<CrosstermBackend<Stdout>>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(3),
            ])
            .split(area);

        // Header
        let header = Paragraph::new(Line::from(vec![Span::styled(
            " 🤖 GIRI: The AI Assistant ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]))
        .wrap(Wrap { trim: true });
        frame.render_widget(header, layout[0]);

        let tabs = Tabs::new(TAB_TITLES)
            .select(snap.tab.index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[1]);

        // Body window
        let visible_h = layout[2].height.saturating_sub(2) as usize;
        let content_width = layout[2].width.saturating_sub(2) as usize;
        let wrapped = wrap_lines(&snap.lines, content_width);
        let (start, end) = visible_range(wrapped.len(), visible_h, snap.scroll);

        let items: Vec<ListItem> = wrapped[start..end]
            .iter()
            .map(|(text, style)| ListItem::new(Line::from(Span::styled(text.clone(), *style))))
            .collect();

        let body = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .title(body_title(snap.tab)),
        );
        frame.render_widget(body, layout[2]);

        // Input box
        let input_box = Paragraph::new(snap.input.clone()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(input_title(snap.tab)),
        );
        frame.render_widget(Clear, layout[3]);
        frame.render_widget(input_box, layout[3]);

        let caret_x = layout[3].x + 1 + visual_caret_col(&snap.input, snap.input_cursor);
        let caret_y = layout[3].y + 1;
        frame.set_cursor_position(Position {
            x: caret_x,
            y: caret_y,
        });

        // Status bar
        let mut spans = vec![
            Span::raw(" "),
            Span::styled(snap.spinner, Style::default().fg(Color::Yellow)),
            Span::raw(" "),
        ];
        match snap.busy {
            Some(label) => spans.push(Span::styled(label, Style::default().fg(Color::Yellow))),
            None => spans.push(Span::styled("Idle", Style::default().fg(Color::Green))),
        }
        if let Some(notice) = &snap.notice {
            spans.push(Span::raw(" • "));
            spans.push(Span::styled(notice.text.clone(), notice.style));
        }
        spans.push(Span::styled(
            format!(" • {}", snap.status),
            Style::default().fg(Color::DarkGray),
        ));
        let status = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title(" Status "));
        frame.render_widget(status, layout[4]);
    })?;

    Ok(())
}

fn visual_caret_col(input: &str, cursor: usize) -> u16 {
    use unicode_width::UnicodeWidthStr;
    UnicodeWidthStr::width(&input[..cursor.min(input.len())]) as u16
}

/// Window of `total` wrapped rows to show, `scroll` rows up from the bottom.
fn visible_range(total: usize, height: usize, scroll: usize) -> (usize, usize) {
    let scroll = scroll.min(total.saturating_sub(height));
    let end = total - scroll;
    (end.saturating_sub(height), end)
}

fn wrap_lines(lines: &[TranscriptLine], width: usize) -> Vec<(String, Style)> {
    let effective_width = width.max(1);
    let mut out = Vec::new();

    for entry in lines {
        let style = entry.style;
        if entry.text.is_empty() {
            out.push((String::new(), style));
            continue;
        }

        for raw_line in entry.text.split('\n') {
            let segments = wrap(raw_line, effective_width);
            if segments.is_empty() {
                out.push((String::new(), style));
            } else {
                out.extend(segments.into_iter().map(|seg| (seg.into_owned(), style)));
            }
        }
    }

    out
}
