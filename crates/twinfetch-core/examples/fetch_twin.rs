//! Look up one token against a running twin service and print the page
//!
//! `cargo run -p twinfetch-core --example fetch_twin -- 42`

use anyhow::Context;
use twinfetch_core::page::TOKEN_ID;
use twinfetch_core::{FetcherConfig, Page, TwinFetcher};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let token_id = std::env::args().nth(1).unwrap_or_else(|| "1".to_string());

    let page = Page::twin_template();
    page.set_value(TOKEN_ID, token_id)?;

    let fetcher = TwinFetcher::new(FetcherConfig::default(), page.clone())
        .context("building fetcher")?;
    fetcher.fetch_and_render().await;

    println!("{}", page.to_html());
    Ok(())
}
