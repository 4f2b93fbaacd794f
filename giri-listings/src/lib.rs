//! Certificate listing acquisition for GIRI.
//!
//! - Fetch the listing page with a fixed `User-Agent` (`fetch`)
//! - Extract up to 20 `{title, link, image}` records with CSS selectors (`extract`)
//! - Case-insensitive title filter (`filter`)
//! - One-slot TTL cache with a pure expiry check (`cache`)
//! - [`ListingService`] tying them together with degrade-to-empty semantics
//!
//! ```
//! use giri_listings::{ListingRecord, filter::filter_records};
//!
//! let records = vec![
//!     ListingRecord::new("Intro to Python", "https://example.com/a"),
//!     ListingRecord::new("Data Science", "https://example.com/b"),
//! ];
//! assert_eq!(filter_records(&records, "PYTHON").len(), 1);
//! ```

pub mod cache;
pub mod extract;
pub mod fetch;
pub mod filter;
pub mod record;
pub mod service;
pub mod settings;

pub use cache::{FetchCache, is_expired};
pub use extract::Extractor;
pub use fetch::{HttpListingSource, ListingSource};
pub use record::ListingRecord;
pub use service::{EMPTY_HINT, ListingCache, ListingOutcome, ListingService};
pub use settings::{ListingSettings, MAX_LISTING_ITEMS, SelectorSet};
