use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use giri_common::Result;
use giri_listings::{ListingCache, ListingOutcome, ListingRecord, ListingService};
use giri_llm::connector::Connector;
use giri_llm::traits::LlmResponse;
use uuid::Uuid;

use crate::credential::CredentialSource;
use crate::relay::{ChatOutcome, ChatRelay, PendingCall};
use crate::transcript::Transcript;

pub const KEY_LOADED_MESSAGE: &str = "API key loaded";

/// Per-user state passed into every handler: listing cache, transcript and
/// chat relay.
///
/// Nothing here is global; two sessions never see each other's data.
pub struct Session {
    id: Uuid,
    started_at: DateTime<Utc>,
    listings: ListingService,
    cache: ListingCache,
    transcript: Transcript,
    relay: ChatRelay,
    ended: bool,
}

impl Session {
    pub fn start(listings: ListingService, cache_ttl: Duration, connector: Arc<dyn Connector>) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session = %id, "session.start");
        Self {
            id,
            started_at: Utc::now(),
            listings,
            cache: ListingCache::new(cache_ttl),
            transcript: Transcript::new(),
            relay: ChatRelay::new(connector),
            ended: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn relay(&self) -> &ChatRelay {
        &self.relay
    }

    pub fn listing_service(&self) -> &ListingService {
        &self.listings
    }

    /// Install a key from configuration; the relay goes straight to `Ready`.
    pub fn preload_key(&mut self, key: &str) -> Result<&'static str> {
        self.relay.set_key(key, CredentialSource::Configured)?;
        Ok(KEY_LOADED_MESSAGE)
    }

    pub fn enter_key(&mut self, key: &str) -> Result<()> {
        self.relay.set_key(key, CredentialSource::Entered)
    }

    pub fn clear_key(&mut self) -> Result<()> {
        self.relay.clear_key()
    }

    /// Cached-or-fetched listing filtered by `query`.
    pub async fn load_listings(&mut self, query: &str, force_refresh: bool) -> ListingOutcome {
        self.listings
            .load(&mut self.cache, query, force_refresh, Utc::now())
            .await
    }

    /// Fresh cached listing for `query`, without touching the network.
    pub fn cached_listings(&self, query: &str) -> Option<ListingOutcome> {
        self.listings.cached(&self.cache, query, Utc::now())
    }

    /// Store a fetch that ran elsewhere (the TUI runs it on a task).
    pub fn settle_listings(&mut self, fetched: Result<Vec<ListingRecord>>, query: &str) -> ListingOutcome {
        self.listings.settle(&mut self.cache, fetched, query, Utc::now())
    }

    pub fn invalidate_listings(&mut self) {
        self.cache.invalidate();
    }

    pub async fn submit_chat(&mut self, prompt: &str) -> ChatOutcome {
        self.relay.submit(&mut self.transcript, prompt).await
    }

    /// First half of [`Session::submit_chat`] for callers that await elsewhere.
    pub fn begin_chat(&mut self, prompt: &str) -> std::result::Result<PendingCall, ChatOutcome> {
        self.relay.begin(&mut self.transcript, prompt)
    }

    pub fn finish_chat(&mut self, result: Result<LlmResponse>) -> ChatOutcome {
        self.relay.finish(&mut self.transcript, result)
    }

    /// Drop the transcript, cached listing and key. Idempotent.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.transcript.clear();
        self.cache.invalidate();
        self.relay.reset();
        self.ended = true;
        tracing::info!(session = %self.id, "session.end");
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.end();
    }
}
