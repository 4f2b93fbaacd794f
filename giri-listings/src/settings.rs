use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard cap on candidate containers taken from one page.
pub const MAX_LISTING_ITEMS: usize = 20;

pub const DEFAULT_LISTING_URL: &str = "https://www.real.discount/store/udemy/";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// CSS selectors used to pull records out of the listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSet {
    pub container: String,
    pub title: String,
    pub link: String,
    /// `None` disables image extraction.
    pub image: Option<String>,
}

impl Default for SelectorSet {
    fn default() -> Self {
        Self {
            container: "div.col-xl-4.col-md-6".to_string(),
            title: "h3".to_string(),
            link: "a".to_string(),
            image: Some("img".to_string()),
        }
    }
}

/// Where and how the listing page is fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    pub url: String,
    pub user_agent: String,
    pub max_items: usize,
    pub cache_ttl_secs: u64,
    /// No deadline on the GET unless set.
    pub timeout_secs: Option<u64>,
    pub selectors: SelectorSet,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_LISTING_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_items: MAX_LISTING_ITEMS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            timeout_secs: None,
            selectors: SelectorSet::default(),
        }
    }
}

impl ListingSettings {
    /// `max_items` clamped to [`MAX_LISTING_ITEMS`].
    pub fn effective_max_items(&self) -> usize {
        self.max_items.min(MAX_LISTING_ITEMS)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
