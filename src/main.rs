use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use headlines::app::{App, AppEvent};
use headlines::config::Config;
use headlines::feed::{FeedClient, FeedLoader};
use headlines::ui;
use headlines::util::ConnectivityCheck;

/// Get the config directory path (~/.config/headlines/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("headlines"))
}

#[derive(Parser, Debug)]
#[command(name = "headlines", about = "Terminal news reader for the Guardian content API")]
struct Args {
    /// Config file (default: ~/.config/headlines/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip the network and show the offline state
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout belongs to the TUI
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::debug!(config = ?config, "Effective configuration");

    let request_url = config
        .request_url()
        .context("Failed to build request URL")?;
    let client = FeedClient::from_config(&config).context("Failed to create HTTP client")?;

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    let loader = FeedLoader::new(client, event_tx.clone());
    let connectivity = ConnectivityCheck::new(config.api_endpoint(), args.offline);

    let mut app = App::new(loader, request_url.into(), connectivity);

    let available = app.connectivity.is_available().await;
    app.start_load(available);

    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
