//! Request handlers for the twin service and the frontend

use crate::error::ApiError;
use crate::owner::OwnerLookup;
use axum::extract::{Query, State};
use axum::http::{header, Method, Uri};
use axum::response::{Html, IntoResponse, Response};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use twinfetch_core::catalog::{MAX_TOKEN_ID, MIN_TOKEN_ID};
use twinfetch_core::page::TOKEN_ID;
use twinfetch_core::{find_twin, Catalog, Deathbat, FetcherConfig, Page, TwinFetcher};

/// Shared state of the `/twin` backend
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub owners: Arc<dyn OwnerLookup>,
}

/// Shared state of the server-rendered frontend
#[derive(Clone)]
pub struct FrontendState {
    pub client: reqwest::Client,
    pub fetcher: FetcherConfig,
}

/// Raw query pairs, kept in request order so repeated keys never reject a request
pub type QueryPairs = Vec<(String, String)>;

/// Body of a successful lookup
#[derive(Debug, Serialize)]
pub struct TwinPayload {
    #[serde(rename = "Source")]
    pub source: Deathbat,
    #[serde(rename = "Twin")]
    pub twin: Deathbat,
}

/// `GET /twin?token_id=N`
pub async fn twin(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    Query(params): Query<QueryPairs>,
) -> Result<Response, ApiError> {
    info!(%method, %uri, "twin request");

    let token_id = first_param(params, "token_id").unwrap_or_default();
    let payload = match lookup(&state, &token_id).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!(%token_id, error = %err, "twin lookup failed");
            return Err(err);
        }
    };

    let body = serde_json::to_vec(&payload)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

async fn lookup(state: &AppState, raw_token_id: &str) -> Result<TwinPayload, ApiError> {
    let token_id = parse_token_id(raw_token_id)?;

    let source = state.catalog.get(token_id)?;
    let twin = find_twin(&state.catalog, source);

    let mut payload = TwinPayload {
        source: source.clone(),
        twin: twin.clone(),
    };
    refresh_owner(state.owners.as_ref(), &mut payload.source).await;
    refresh_owner(state.owners.as_ref(), &mut payload.twin).await;

    Ok(payload)
}

/// First value of `name`; later repeats are ignored
pub fn first_param(params: QueryPairs, name: &str) -> Option<String> {
    params
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
}

/// Token ids are decimal integers in `1..=10000`
pub fn parse_token_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| (MIN_TOKEN_ID..=MAX_TOKEN_ID).contains(id))
        .ok_or_else(|| ApiError::InvalidTokenId(raw.to_string()))
}

async fn refresh_owner(owners: &dyn OwnerLookup, deathbat: &mut Deathbat) {
    match owners.owner_of(deathbat.id).await {
        Ok(Some(owner)) => deathbat.owner = owner,
        Ok(None) => {}
        Err(err) => warn!(token_id = deathbat.id, error = %err, "owner lookup failed"),
    }
}

/// `GET /` renders the twin page, populated when `token_id` is given
pub async fn index(
    State(state): State<FrontendState>,
    Query(params): Query<QueryPairs>,
) -> Html<String> {
    let page = Page::twin_template();

    if let Some(token_id) = first_param(params, "token_id") {
        match page.set_value(TOKEN_ID, token_id) {
            Ok(()) => {
                TwinFetcher::with_client(state.client.clone(), state.fetcher.clone(), page.clone())
                    .fetch_and_render()
                    .await;
            }
            Err(err) => warn!(error = %err, "twin page has no input"),
        }
    }

    Html(document(&page))
}

fn document(page: &Page) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Deathbat Twin</title></head>\n<body>\n<form method=\"get\" action=\"/\">\n{}<button type=\"submit\">Find twin</button>\n</form>\n</body>\n</html>\n",
        page.to_html()
    )
}
