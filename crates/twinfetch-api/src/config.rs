//! Server configuration
//!
//! Defaults layered with `TWINFETCH_*` environment variables, e.g.
//! `TWINFETCH_CATALOG=/data/deathbats.json` or `TWINFETCH_OWNER_LOOKUP=false`.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the twin service and the frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// JSON array of every Deathbat
    #[serde(rename = "catalog")]
    pub catalog_path: PathBuf,

    /// Address of the `/twin` backend
    pub backend_addr: SocketAddr,

    /// Address of the server-rendered frontend
    pub frontend_addr: SocketAddr,

    /// Endpoint the frontend fetches twins from
    #[serde(rename = "endpoint")]
    pub twin_endpoint: String,

    /// Whether owners are refreshed from the marketplace on every lookup
    pub owner_lookup: bool,

    /// Marketplace asset API, including the contract address
    #[serde(rename = "owner_api")]
    pub owner_api_base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("deathbats.json"),
            backend_addr: SocketAddr::from(([0, 0, 0, 0], 6660)),
            frontend_addr: SocketAddr::from(([0, 0, 0, 0], 6661)),
            twin_endpoint: "http://localhost:6660/twin".to_string(),
            owner_lookup: true,
            owner_api_base:
                "https://api.opensea.io/api/v1/asset/0x1D3aDa5856B14D9dF178EA5Cab137d436dC55F1D"
                    .to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `TWINFETCH_*` environment variables
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(ServerConfig::default()))
            .merge(Env::prefixed("TWINFETCH_"))
    }

    pub fn from_env() -> Result<Self, figment::Error> {
        Self::from_figment(Self::figment())
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        let mut cfg: Self = figment.extract()?;
        cfg.owner_api_base = cfg.owner_api_base.trim_end_matches('/').to_string();
        Ok(cfg)
    }
}
