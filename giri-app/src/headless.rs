//! Non-interactive subcommands driving the same session handlers as the UI.

use anyhow::{Result, bail};
use giri_listings::ListingOutcome;
use giri_session::{ChatOutcome, Session};
use std::io::Write;

pub async fn list(session: &mut Session, query: &str, json: bool) -> Result<()> {
    let outcome = session.load_listings(query, false).await;
    if let Some(err) = &outcome.error {
        eprintln!("Error scraping: {err}");
    }
    let mut out = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut out, &outcome.records)?;
        writeln!(out)?;
    } else {
        out.write_all(render_listing(&outcome).as_bytes())?;
    }
    Ok(())
}

pub fn render_listing(outcome: &ListingOutcome) -> String {
    if let Some(hint) = outcome.empty_hint() {
        return format!("{hint}\n");
    }
    outcome
        .records
        .iter()
        .map(|r| format!("{}\n  {}\n", r.title, r.link))
        .collect()
}

pub async fn ask(session: &mut Session, prompt: &str) -> Result<()> {
    eprintln!("GIRI is thinking…");
    match session.submit_chat(prompt).await {
        ChatOutcome::Replied(text) => {
            println!("{text}");
            Ok(())
        }
        other => match other.message() {
            Some(msg) => bail!(msg),
            None => bail!("nothing to send"),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use giri_listings::ListingRecord;

    fn outcome(records: Vec<ListingRecord>) -> ListingOutcome {
        ListingOutcome {
            total: records.len(),
            records,
            from_cache: false,
            fetched_at: None,
            error: None,
        }
    }

    #[test]
    fn renders_title_and_link_per_record() {
        let text = render_listing(&outcome(vec![
            ListingRecord::new("Intro to Python", "https://x.test/a"),
            ListingRecord::new("Python Advanced", "https://x.test/c"),
        ]));
        assert_eq!(
            text,
            "Intro to Python\n  https://x.test/a\nPython Advanced\n  https://x.test/c\n"
        );
    }

    #[test]
    fn empty_listing_prints_hint() {
        assert_eq!(
            render_listing(&outcome(vec![])),
            "No certificates found. Try a different keyword.\n"
        );
    }
}
