//! Twinfetch Core
//!
//! Client and domain model for looking up a Deathbat and its closest twin:
//! - Lenient decoding of the `Source`/`Twin` lookup payload
//! - An explicit page model that the renderer writes into
//! - The fetch-and-render client with a pluggable diagnostic sink
//! - Catalog loading and weighted trait matching used by the service

pub mod catalog;
pub mod error;
pub mod fetcher;
pub mod matching;
pub mod page;
pub mod record;
pub mod render;

pub use catalog::{Attribute, Catalog, Deathbat, Traits};
pub use error::{CatalogError, FetchError};
pub use fetcher::{DiagnosticSink, FetcherConfig, TracingSink, TwinFetcher};
pub use matching::find_twin;
pub use page::{Element, ElementKind, Page};
pub use record::{Record, TwinResponse};
pub use render::{render, RenderTargets, SideTargets};
