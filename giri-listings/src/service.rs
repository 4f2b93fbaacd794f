use std::sync::Arc;

use chrono::{DateTime, Utc};
use giri_common::{GiriError, Result};
use url::Url;

use crate::cache::FetchCache;
use crate::extract::Extractor;
use crate::fetch::{HttpListingSource, ListingSource};
use crate::filter::filter_records;
use crate::record::ListingRecord;
use crate::settings::ListingSettings;

/// Shown when a load ends with nothing to display.
pub const EMPTY_HINT: &str = "No certificates found. Try a different keyword.";

pub type ListingCache = FetchCache<Vec<ListingRecord>>;

/// Result of one listing load. Never an `Err`: failures degrade to an empty
/// list with the error attached for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingOutcome {
    /// Records after filtering.
    pub records: Vec<ListingRecord>,
    /// Records before filtering.
    pub total: usize,
    pub from_cache: bool,
    pub fetched_at: Option<DateTime<Utc>>,
    pub error: Option<GiriError>,
}

impl ListingOutcome {
    pub fn empty_hint(&self) -> Option<&'static str> {
        self.records.is_empty().then_some(EMPTY_HINT)
    }
}

/// Fetch → extract → filter, memoised through a caller-owned cache.
#[derive(Clone)]
pub struct ListingService {
    source: Arc<dyn ListingSource>,
    extractor: Extractor,
}

impl ListingService {
    pub fn new(settings: &ListingSettings) -> Result<Self> {
        let source = HttpListingSource::new(settings)?;
        Self::with_source(Arc::new(source), settings)
    }

    pub fn with_source(source: Arc<dyn ListingSource>, settings: &ListingSettings) -> Result<Self> {
        let mut extractor = Extractor::new(&settings.selectors, settings.effective_max_items())?;
        if let Ok(base) = Url::parse(source.page_url()) {
            extractor = extractor.with_base_url(base);
        }
        Ok(Self { source, extractor })
    }

    /// Uncached fetch and extract.
    pub async fn fetch_records(&self) -> Result<Vec<ListingRecord>> {
        let html = self.source.fetch_page().await?;
        Ok(self.extractor.extract(&html))
    }

    /// The cached listing filtered by `query`, if still fresh at `now`.
    pub fn cached(&self, cache: &ListingCache, query: &str, now: DateTime<Utc>) -> Option<ListingOutcome> {
        let all = cache.get(now)?;
        tracing::debug!(total = all.len(), "listings.cache.hit");
        Some(ListingOutcome {
            records: filter_records(&all, query),
            total: all.len(),
            from_cache: true,
            fetched_at: cache.entry().map(|e| e.fetched_at),
            error: None,
        })
    }

    /// Fold a finished fetch into `cache` and filter it. Failures are not cached.
    pub fn settle(
        &self,
        cache: &mut ListingCache,
        fetched: Result<Vec<ListingRecord>>,
        query: &str,
        now: DateTime<Utc>,
    ) -> ListingOutcome {
        match fetched {
            Ok(all) => {
                tracing::info!(total = all.len(), "listings.fetched");
                let records = filter_records(&all, query);
                let total = all.len();
                cache.put(all, now);
                ListingOutcome {
                    records,
                    total,
                    from_cache: false,
                    fetched_at: Some(now),
                    error: None,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, url = self.source.page_url(), "listings.fetch.failed");
                ListingOutcome {
                    records: Vec::new(),
                    total: 0,
                    from_cache: false,
                    fetched_at: None,
                    error: Some(err),
                }
            }
        }
    }

    /// Serve from `cache` while fresh, otherwise fetch and store on success.
    ///
    /// `force_refresh` invalidates first.
    pub async fn load(
        &self,
        cache: &mut ListingCache,
        query: &str,
        force_refresh: bool,
        now: DateTime<Utc>,
    ) -> ListingOutcome {
        if force_refresh {
            tracing::info!("listings.cache.invalidate");
            cache.invalidate();
        }
        if let Some(hit) = self.cached(cache, query, now) {
            return hit;
        }
        let fetched = self.fetch_records().await;
        self.settle(cache, fetched, query, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StaticPage {
        html: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ListingSource for StaticPage {
        async fn fetch_page(&self) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.html.clone())
        }

        fn page_url(&self) -> &str {
            "https://listing.test/store/"
        }
    }

    struct DeadSource;

    #[async_trait]
    impl ListingSource for DeadSource {
        async fn fetch_page(&self) -> Result<String> {
            Err(GiriError::Network("connection refused".into()))
        }

        fn page_url(&self) -> &str {
            "https://listing.test/store/"
        }
    }

    fn page() -> String {
        ["Intro to Python", "Data Science", "Python Advanced"]
            .iter()
            .map(|t| format!(r#"<div class="col-xl-4 col-md-6"><h3>{t}</h3><a href="/c/{t}">go</a></div>"#))
            .collect()
    }

    #[tokio::test]
    async fn second_load_is_served_from_cache() {
        let source = Arc::new(StaticPage {
            html: page(),
            calls: AtomicUsize::new(0),
        });
        let svc = ListingService::with_source(source.clone(), &ListingSettings::default()).unwrap();
        let mut cache = ListingCache::new(Duration::from_secs(3600));
        let now = Utc::now();

        let first = svc.load(&mut cache, "", false, now).await;
        assert_eq!(first.records.len(), 3);
        assert!(!first.from_cache);
        assert_eq!(first.records[0].link, "https://listing.test/c/Intro%20to%20Python");

        let second = svc.load(&mut cache, "python", false, now).await;
        assert!(second.from_cache);
        assert_eq!(second.records.len(), 2);
        assert_eq!(second.total, 3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        svc.load(&mut cache, "", true, now).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failure_degrades_to_empty_and_is_not_cached() {
        let svc = ListingService::with_source(Arc::new(DeadSource), &ListingSettings::default()).unwrap();
        let mut cache = ListingCache::new(Duration::from_secs(3600));

        let out = svc.load(&mut cache, "", false, Utc::now()).await;
        assert!(out.records.is_empty());
        assert_eq!(out.error, Some(GiriError::Network("connection refused".into())));
        assert_eq!(out.empty_hint(), Some(EMPTY_HINT));
        assert!(cache.entry().is_none());
    }
}
