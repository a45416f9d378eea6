//! Deathbat catalog
//!
//! The whole collection is loaded once from a JSON array and kept in memory.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

/// Lowest and highest token ids in the collection
pub const MIN_TOKEN_ID: i64 = 1;
pub const MAX_TOKEN_ID: i64 = 10_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

/// Named trait slots; empty slots are omitted when serialized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Traits {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub background: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub brooks_wackerman: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub eyes: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub facial_hair: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub head: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub johnny_christ: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mask: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub mouth: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub shadows: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nose: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub perk: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub skin: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub synyster_gates: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub zacky_vengeance: String,
}

impl Traits {
    /// True for the band member one-of-ones, which have no twin
    pub fn is_one_of_one(&self) -> bool {
        [
            &self.brooks_wackerman,
            &self.johnny_christ,
            &self.shadows,
            &self.synyster_gates,
            &self.zacky_vengeance,
        ]
        .iter()
        .any(|slot| !slot.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deathbat {
    pub id: i64,
    pub name: String,
    pub description: JsonValue,
    pub minted: bool,
    pub image: String,
    pub attributes: Vec<Attribute>,
    pub traits: Traits,
    pub hyperlink: String,
    pub owner: String,
}

impl Deathbat {
    /// Multi-line listing: id, traits, owner and marketplace link
    pub fn summary(&self) -> String {
        let traits = self
            .attributes
            .iter()
            .map(|a| format!("{}: {}", a.trait_type, a.value))
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = String::new();
        let _ = writeln!(out, "Deathbat #{}", self.id);
        let _ = writeln!(out, "{traits}");
        let _ = writeln!(out, "Owner: {}", self.owner);
        let _ = writeln!(out, "OpenSea.io link: {}", self.hyperlink);
        out
    }
}

/// In-memory collection
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    deathbats: Vec<Deathbat>,
}

impl Catalog {
    pub fn new(deathbats: Vec<Deathbat>) -> Self {
        Self { deathbats }
    }

    /// Load the JSON array at `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_slice(&bytes)?;
        info!(path = %path.display(), count = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CatalogError> {
        Ok(Self::new(serde_json::from_slice(bytes)?))
    }

    pub fn len(&self) -> usize {
        self.deathbats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deathbats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Deathbat> {
        self.deathbats.iter()
    }

    /// Look up by token id. Sorted catalogs hit position `id - 1` directly.
    pub fn get(&self, token_id: i64) -> Result<&Deathbat, CatalogError> {
        let fast = token_id
            .checked_sub(1)
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| self.deathbats.get(index))
            .filter(|d| d.id == token_id);

        fast.or_else(|| self.deathbats.iter().find(|d| d.id == token_id))
            .ok_or(CatalogError::NotFound(token_id))
    }
}
