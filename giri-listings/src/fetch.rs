use async_trait::async_trait;
use giri_common::{GiriError, Result};
use giri_http::{HttpClient, HttpError, RequestOpts};

use crate::settings::ListingSettings;

/// Something that can hand back the raw listing page.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_page(&self) -> Result<String>;

    /// Page URL, used to resolve relative links.
    fn page_url(&self) -> &str;
}

/// Single GET against the configured URL with a fixed `User-Agent`.
pub struct HttpListingSource {
    client: HttpClient,
    url: String,
    user_agent: String,
}

impl HttpListingSource {
    pub fn new(settings: &ListingSettings) -> Result<Self> {
        let mut client = HttpClient::new(&settings.url).map_err(fetch_error)?;
        if let Some(timeout) = settings.timeout() {
            client = client.with_timeout(timeout);
        }
        Ok(Self {
            client,
            url: settings.url.clone(),
            user_agent: settings.user_agent.clone(),
        })
    }
}

#[async_trait]
impl ListingSource for HttpListingSource {
    async fn fetch_page(&self) -> Result<String> {
        let mut opts = RequestOpts::with_user_agent(&self.user_agent).map_err(fetch_error)?;
        opts.allow_absolute = true;
        let body = self
            .client
            .get_text(&self.url, opts)
            .await
            .map_err(fetch_error)?;
        tracing::debug!(url = %self.url, bytes = body.len(), "listings.fetch.ok");
        Ok(body)
    }

    fn page_url(&self) -> &str {
        &self.url
    }
}

/// Everything on the fetch path, including a non-2xx page, is a network failure.
fn fetch_error(e: HttpError) -> GiriError {
    match e {
        HttpError::Decode(msg, _) => GiriError::Parse(msg),
        other => GiriError::Network(other.to_string()),
    }
}
