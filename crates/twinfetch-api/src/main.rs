use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use twinfetch_api::config::ServerConfig;
use twinfetch_core::page::{self, TOKEN_ID};
use twinfetch_core::{FetcherConfig, Page, TwinFetcher};

#[derive(Parser)]
#[command(name = "twinfetch", about = "Deathbat twin service and client", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the twin service and the frontend (default)
    Serve,
    /// Look up one token through the client and print the rendered fields
    Fetch {
        /// Sent verbatim, invalid ids included
        #[arg(allow_hyphen_values = true)]
        token_id: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = ServerConfig::from_env().context("loading config")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(catalog = %cfg.catalog_path.display(), "starting twin service");
            twinfetch_api::serve(cfg).await
        }
        Command::Fetch { token_id } => fetch(&cfg, token_id).await,
    }
}

/// One lookup through the client, printed as `element: content` lines
async fn fetch(cfg: &ServerConfig, token_id: String) -> anyhow::Result<()> {
    let page = Page::twin_template();
    page.set_value(TOKEN_ID, token_id)?;

    let config = FetcherConfig {
        endpoint: cfg.twin_endpoint.clone(),
        ..FetcherConfig::default()
    };
    TwinFetcher::new(config, page.clone())
        .context("building fetcher")?
        .fetch_and_render()
        .await;

    for (id, attribute) in [
        (page::SOURCE_NAME, None),
        (page::SOURCE_IMG, Some("src")),
        (page::SOURCE_OWNER, None),
        (page::SOURCE_HYPERLINK, Some("href")),
        (page::TWIN_NAME, None),
        (page::TWIN_IMG, Some("src")),
        (page::TWIN_OWNER, None),
        (page::TWIN_HYPERLINK, Some("href")),
    ] {
        let Some(element) = page.element(id) else {
            continue;
        };
        match attribute {
            Some(name) if element.text.is_empty() => {
                println!("{id}: {}", element.attribute(name).unwrap_or_default());
            }
            Some(name) => {
                println!("{id}: {} <{}>", element.text, element.attribute(name).unwrap_or_default());
            }
            None => println!("{id}: {}", element.text),
        }
    }

    Ok(())
}
