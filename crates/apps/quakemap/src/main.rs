use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use layers::MapBuilder;
use quakemap::server::{self, AppState};
use quakemap::{Cli, Command, FeedLoader, HttpFeedSource, OverlaySlots, render};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.map.access_token.is_empty() {
        warn!("no tile access token configured; base map tiles will not load");
    }

    let builder = MapBuilder::new(cli.map.view(), &cli.map.tile_provider())
        .context("invalid map configuration")?;

    let source = Arc::new(HttpFeedSource::new(
        reqwest::Client::new(),
        cli.feeds.max_feed_bytes,
    ));
    let loader = FeedLoader::new(
        source,
        cli.feeds.earthquakes_location(),
        cli.feeds.plates_location(),
    );
    info!(
        earthquakes = %cli.feeds.earthquakes_location(),
        plates = %cli.feeds.plates_location(),
        "feeds configured"
    );

    match cli.command {
        Command::Render { out, feed_timeout } => {
            let deadline = std::time::Duration::from_secs(feed_timeout);
            let html = render::render_once(&loader, &builder, deadline).await?;
            render::write_output(&out, &html).await?;
        }
        Command::Serve { addr } => {
            let slots = Arc::new(OverlaySlots::new());
            // Handles are dropped: the tasks run on, each filling its slot
            // whenever its feed answers.
            drop(loader.spawn(slots.clone()));
            let state = AppState {
                slots,
                builder: Arc::new(builder),
            };
            server::serve(addr, state).await?;
        }
    }

    Ok(())
}
