//! Current-owner lookup
//!
//! Owners in the catalog go stale as tokens trade, so the service asks the
//! marketplace for each Deathbat it returns. A failed lookup keeps the
//! catalog owner.

use crate::error::OwnerError;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tracing::debug;

#[async_trait]
pub trait OwnerLookup: Send + Sync {
    /// Current owner of `token_id`, or `None` if the source does not know
    async fn owner_of(&self, token_id: i64) -> Result<Option<String>, OwnerError>;
}

/// Fixed answers, no network. Empty by default, which keeps catalog owners.
#[derive(Debug, Clone, Default)]
pub struct StaticOwners {
    owners: HashMap<i64, String>,
}

impl StaticOwners {
    pub fn new(owners: HashMap<i64, String>) -> Self {
        Self { owners }
    }
}

#[async_trait]
impl OwnerLookup for StaticOwners {
    async fn owner_of(&self, token_id: i64) -> Result<Option<String>, OwnerError> {
        Ok(self.owners.get(&token_id).cloned())
    }
}

/// Asks the OpenSea asset API: `GET <base>/<token_id>`
#[derive(Debug, Clone)]
pub struct OpenSeaOwners {
    client: reqwest::Client,
    base_url: String,
}

impl OpenSeaOwners {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl OwnerLookup for OpenSeaOwners {
    async fn owner_of(&self, token_id: i64) -> Result<Option<String>, OwnerError> {
        let url = format!("{}/{}", self.base_url, token_id);
        debug!(%url, "looking up owner");

        let response = self.client.get(&url).send().await?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(OwnerError::Unresponsive(response.status()));
        }

        let asset: JsonValue = response.json().await?;
        Ok(owner_from_asset(&asset))
    }
}

/// Prefer the owner's username, fall back to the wallet address
fn owner_from_asset(asset: &JsonValue) -> Option<String> {
    let owner = asset.get("owner")?;
    owner
        .pointer("/user/username")
        .and_then(JsonValue::as_str)
        .filter(|name| !name.is_empty())
        .or_else(|| owner.get("address").and_then(JsonValue::as_str))
        .map(str::to_string)
}
