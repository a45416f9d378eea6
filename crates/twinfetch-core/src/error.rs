//! Error types for the client and the catalog

use thiserror::Error;

/// Everything that can abort a fetch-and-render pass.
///
/// All variants are handled the same way by [`crate::TwinFetcher::fetch_and_render`]:
/// reported once to the diagnostic sink, never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("response body is not a twin payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response has no `{0}` record")]
    MissingRecord(&'static str),

    #[error("page has no element with id `{0}`")]
    MissingElement(String),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Deathbat #{0} not found")]
    NotFound(i64),
}
