//! Race report fetching.
//!
//! The fetcher is the only I/O boundary of an extraction: it turns a
//! [`RaceQuery`] into a URL and downloads the page once, without retries.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{FetcherConfig, RaceQuery};
use crate::utils::http::{create_async_client, fetch_text};
use crate::utils::url::{get_domain, race_page_url};

/// A downloaded race report page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub url: String,
    pub body: String,
}

/// Source of race report pages.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    /// URL the page for `query` is fetched from.
    fn source_url(&self, query: &RaceQuery) -> String;

    /// Download the page for `query`.
    ///
    /// Errors are [`crate::error::AppError::Fetch`] and carry the source URL.
    async fn fetch(&self, query: &RaceQuery) -> Result<Document>;
}

/// Fetches race reports over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher with its own HTTP client.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self::with_client(create_async_client(config)?, &config.base_url))
    }

    /// Create a fetcher sharing an existing client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    fn source_url(&self, query: &RaceQuery) -> String {
        race_page_url(&self.base_url, query)
    }

    async fn fetch(&self, query: &RaceQuery) -> Result<Document> {
        let url = self.source_url(query);
        log::debug!(
            "Fetching {} {} from {}",
            query.year,
            query.race_name,
            get_domain(&url).unwrap_or_default()
        );

        let body = fetch_text(&self.client, &url).await?;
        log::debug!("Fetched {} bytes from {}", body.len(), url);

        Ok(Document { url, body })
    }
}
