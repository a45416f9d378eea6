//! Fetch-and-render client
//!
//! Reads the token id from the page, asks the twin service for the pair and
//! writes the result back into the page. Failures are never surfaced to the
//! caller of [`TwinFetcher::fetch_and_render`]; they go to a [`DiagnosticSink`].

use crate::error::FetchError;
use crate::page::{self, Page};
use crate::record::TwinResponse;
use crate::render::{render, RenderTargets};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Configuration for the client
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Lookup endpoint without query string
    pub endpoint: String,

    /// Name of the query parameter carrying the token id
    pub query_param: String,

    /// Page element whose value supplies the token id
    pub input: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:6660/twin".to_string(),
            query_param: "token_id".to_string(),
            input: page::TOKEN_ID.to_string(),
        }
    }
}

/// Developer-facing channel for failed fetches
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, error: &FetchError);
}

/// Default sink: one `error!` event per failure
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, err: &FetchError) {
        error!(error = %err, "twin fetch failed");
    }
}

#[derive(Clone)]
pub struct TwinFetcher {
    client: reqwest::Client,
    config: FetcherConfig,
    page: Page,
    targets: RenderTargets,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl TwinFetcher {
    /// Create a fetcher rendering into `page` with the default targets
    pub fn new(config: FetcherConfig, page: Page) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self::with_client(client, config, page))
    }

    /// Create a fetcher sharing an existing HTTP client
    pub fn with_client(client: reqwest::Client, config: FetcherConfig, page: Page) -> Self {
        Self {
            client,
            config,
            page,
            targets: RenderTargets::default(),
            diagnostics: Arc::new(TracingSink),
        }
    }

    #[must_use]
    pub fn with_targets(mut self, targets: RenderTargets) -> Self {
        self.targets = targets;
        self
    }

    #[must_use]
    pub fn with_diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Build the lookup URL; the token id is appended verbatim
    pub fn request_url(&self, token_id: &str) -> String {
        format!(
            "{}?{}={}",
            self.config.endpoint, self.config.query_param, token_id
        )
    }

    /// Issue the lookup and decode the body without touching the page
    pub async fn fetch(&self, token_id: &str) -> Result<TwinResponse, FetchError> {
        let url = self.request_url(token_id);
        debug!(%url, "fetching twin");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;

        Ok(TwinResponse::from_json(&body)?)
    }

    /// Read the input, fetch and render, returning the first failure
    pub async fn try_fetch_and_render(&self) -> Result<(), FetchError> {
        let token_id = self.page.value(&self.config.input)?;
        let response = self.fetch(&token_id).await?;
        render(&self.page, &self.targets, &response)
    }

    /// Read the input, fetch and render; failures go to the diagnostic sink
    pub async fn fetch_and_render(&self) {
        if let Err(err) = self.try_fetch_and_render().await {
            self.diagnostics.report(&err);
        }
    }

    /// Run [`Self::fetch_and_render`] as a detached task.
    ///
    /// Overlapping spawns are not coordinated: whichever response arrives
    /// last is what the page shows.
    pub fn spawn(&self) -> JoinHandle<()> {
        let fetcher = self.clone();
        tokio::spawn(async move { fetcher.fetch_and_render().await })
    }
}
