//! Selector-driven extraction of listing records from page markup.

use crate::record::ListingRecord;
use crate::settings::{MAX_LISTING_ITEMS, SelectorSet};
use giri_common::{GiriError, Result};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selector set plus the item cap.
///
/// Containers are taken in document order and truncated to `max_items`
/// *before* incomplete ones are dropped, so the output can be shorter than
/// the cap even when the page has more valid cards further down.
#[derive(Debug, Clone)]
pub struct Extractor {
    container: Selector,
    title: Selector,
    link: Selector,
    image: Option<Selector>,
    max_items: usize,
    base: Option<Url>,
}

fn compile(kind: &str, raw: &str) -> Result<Selector> {
    Selector::parse(raw).map_err(|e| GiriError::Parse(format!("invalid {kind} selector {raw:?}: {e}")))
}

impl Extractor {
    pub fn new(selectors: &SelectorSet, max_items: usize) -> Result<Self> {
        Ok(Self {
            container: compile("container", &selectors.container)?,
            title: compile("title", &selectors.title)?,
            link: compile("link", &selectors.link)?,
            image: selectors
                .image
                .as_deref()
                .map(|raw| compile("image", raw))
                .transpose()?,
            max_items: max_items.min(MAX_LISTING_ITEMS),
            base: None,
        })
    }

    /// Resolve relative `href`/`src` values against `base`.
    pub fn with_base_url(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    pub fn max_items(&self) -> usize {
        self.max_items
    }

    pub fn extract(&self, html: &str) -> Vec<ListingRecord> {
        let document = Html::parse_document(html);
        let mut skipped = 0usize;

        let records: Vec<ListingRecord> = document
            .select(&self.container)
            .take(self.max_items)
            .filter_map(|card| {
                let record = self.record_from(card);
                if record.is_none() {
                    skipped += 1;
                }
                record
            })
            .collect();

        tracing::debug!(
            records = records.len(),
            skipped,
            cap = self.max_items,
            "listings.extract"
        );
        records
    }

    fn record_from(&self, card: ElementRef<'_>) -> Option<ListingRecord> {
        let title = card
            .select(&self.title)
            .next()
            .map(|el| normalize_text(el.text()))
            .filter(|t| !t.is_empty())?;

        let href = card.select(&self.link).next()?.value().attr("href")?;
        let link = self.resolve(href)?;

        let image = self.image.as_ref().and_then(|sel| {
            let img = card.select(sel).next()?;
            let src = img
                .value()
                .attr("src")
                .filter(|s| !s.trim().is_empty())
                .or_else(|| img.value().attr("data-src"))?;
            self.resolve(src)
        });

        Some(ListingRecord { title, link, image })
    }

    fn resolve(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        match &self.base {
            Some(base) => base.join(raw).ok().map(String::from),
            None => Some(raw.to_string()),
        }
    }
}

fn normalize_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(title: &str, href: &str) -> String {
        format!(
            r#"<div class="col-xl-4 col-md-6"><a href="{href}"><img src="/img/{title}.png"><h3>{title}</h3></a></div>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><div class=\"row\">{}</div></body></html>", cards.join(""))
    }

    fn extractor() -> Extractor {
        Extractor::new(&SelectorSet::default(), MAX_LISTING_ITEMS).unwrap()
    }

    #[test]
    fn caps_at_twenty_in_document_order() {
        let cards: Vec<String> = (0..25)
            .map(|i| card(&format!("Course {i}"), &format!("https://x.test/{i}")))
            .collect();
        let out = extractor().extract(&page(&cards));
        assert_eq!(out.len(), 20);
        assert_eq!(out[0].title, "Course 0");
        assert_eq!(out[19].title, "Course 19");
        assert_eq!(out[19].link, "https://x.test/19");
    }

    #[test]
    fn incomplete_cards_are_skipped() {
        let html = page(&[
            card("Good", "https://x.test/good"),
            r#"<div class="col-xl-4 col-md-6"><a href="https://x.test/untitled">no heading</a></div>"#
                .to_string(),
            r#"<div class="col-xl-4 col-md-6"><h3>Linkless</h3></div>"#.to_string(),
            r#"<div class="col-xl-4 col-md-6"><h3>No href</h3><a name="x">anchor</a></div>"#
                .to_string(),
            r#"<div class="col-xl-4 col-md-6"><h3>   </h3><a href="https://x.test/blank">b</a></div>"#
                .to_string(),
        ]);
        let out = extractor().extract(&html);
        assert_eq!(out, vec![ListingRecord::new("Good", "https://x.test/good").with_image("/img/Good.png")]);
    }

    #[test]
    fn cap_applies_before_skipping() {
        let mut cards = vec![r#"<div class="col-xl-4 col-md-6"><h3>broken</h3></div>"#.to_string()];
        cards.extend((0..20).map(|i| card(&format!("C{i}"), "https://x.test/")));
        let out = extractor().extract(&page(&cards));
        assert_eq!(out.len(), 19);
    }

    #[test]
    fn container_classes_match_in_any_order_and_with_extras() {
        let html = page(&[
            r#"<div class="col-md-6 col-xl-4"><h3>Swapped</h3><a href="https://x.test/s">s</a></div>"#
                .to_string(),
            r#"<div class="col-xl-4 col-md-6 promo"><h3>Extra</h3><a href="https://x.test/e">e</a></div>"#
                .to_string(),
            r#"<div class="col-xl-4"><h3>Partial</h3><a href="https://x.test/p">p</a></div>"#.to_string(),
        ]);
        let titles: Vec<String> = extractor().extract(&html).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, ["Swapped", "Extra"]);
    }

    #[test]
    fn garbage_markup_yields_nothing() {
        assert!(extractor().extract("<<<not html at all").is_empty());
        assert!(extractor().extract("").is_empty());
    }

    #[test]
    fn relative_links_resolve_against_page() {
        let base = Url::parse("https://www.real.discount/store/udemy/").unwrap();
        let html = page(&[
            r#"<div class="col-xl-4 col-md-6"><h3>Rust
                 for   Everyone</h3><a href="/offer/rust-101"></a><img data-src="thumbs/r.jpg"></div>"#
                .to_string(),
        ]);
        let out = extractor().with_base_url(base).extract(&html);
        assert_eq!(out[0].title, "Rust for Everyone");
        assert_eq!(out[0].link, "https://www.real.discount/offer/rust-101");
        assert_eq!(
            out[0].image.as_deref(),
            Some("https://www.real.discount/store/udemy/thumbs/r.jpg")
        );
    }

    #[test]
    fn image_extraction_can_be_disabled() {
        let selectors = SelectorSet {
            image: None,
            ..Default::default()
        };
        let out = Extractor::new(&selectors, 20)
            .unwrap()
            .extract(&page(&[card("A", "https://x.test/a")]));
        assert_eq!(out[0].image, None);
    }

    #[test]
    fn invalid_selector_is_parse_error() {
        let selectors = SelectorSet {
            container: "div[".into(),
            ..Default::default()
        };
        let err = Extractor::new(&selectors, 20).unwrap_err();
        assert!(matches!(err, GiriError::Parse(_)));
    }

    #[test]
    fn oversized_cap_is_clamped() {
        assert_eq!(Extractor::new(&SelectorSet::default(), 99).unwrap().max_items(), 20);
    }
}
