//! Service errors and their HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use twinfetch_core::CatalogError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid token id {0:?}, must be between 1 and 10000 inclusive")]
    InvalidTokenId(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("failed to encode twin payload: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidTokenId(_) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(_) | ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors carry no body; the status code is the whole answer.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}

#[derive(Debug, Error)]
pub enum OwnerError {
    #[error("owner request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("opensea.io unresponsive (status {0})")]
    Unresponsive(reqwest::StatusCode),
}
