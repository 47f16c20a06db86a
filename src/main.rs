use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use gifstash::application::{PreviewPrefetcher, ResultFeed};
use gifstash::domain::{RemoteImage, SearchQuery};
use gifstash::infrastructure::{
    AppConfig, CliArgs, Command, GiphySearchClient, OriginalDownloaded, OriginalImageCache,
    StorageManager,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

fn print_result(index: usize, image: &RemoteImage) {
    let size = image.thumbnail_size();
    println!(
        "{index:>4}  {:<20} {:>3}x{:<4} {}  {}",
        image.id().as_str(),
        size.width,
        size.height,
        image.original_url(),
        image.title()
    );
}

async fn run_search(config: &AppConfig, query: &str, offset: u32, limit: Option<u32>) -> Result<()> {
    let client = GiphySearchClient::from_config(&config.giphy)?;
    let query = SearchQuery::new(query, offset, limit.unwrap_or(config.giphy.page_size))?;

    let results = client.search(&query).await?;
    info!(query = %query.text(), count = results.len(), "Search finished");

    for (i, image) in results.iter().enumerate() {
        print_result(offset as usize + i, image);
    }

    Ok(())
}

async fn run_fetch(config: &AppConfig, query: &str, index: usize) -> Result<()> {
    let timeout = Duration::from_secs(config.giphy.timeout_secs);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<OriginalDownloaded>();

    let cache = Arc::new(OriginalImageCache::new(
        config.effective_cache_dir(),
        timeout,
        &event_tx,
    )?);
    let client = Arc::new(GiphySearchClient::from_config(&config.giphy)?);

    let mut feed = ResultFeed::new(client, config.giphy.page_size);
    feed.search(query).await?;

    let image = feed
        .results()
        .get(index)
        .cloned()
        .ok_or_else(|| eyre!("no result at index {index} ({} results)", feed.len()))?;
    print_result(index, &image);

    let prefetcher = PreviewPrefetcher::new(cache.clone());
    let started = prefetcher.prefetch_around(feed.results(), index);
    info!(id = %image.id(), started, "Requested originals");

    if let Some(path) = prefetcher.resolve(&image) {
        println!("{}", path.display());
        return Ok(());
    }

    let downloaded = tokio::time::timeout(timeout, async {
        while let Some(event) = event_rx.recv().await {
            if event.id == *image.id() {
                return Some(event.path);
            }
        }
        None
    })
    .await
    .ok()
    .flatten();

    match downloaded.or_else(|| prefetcher.resolve(&image)) {
        Some(path) => {
            image.set_local_original(path.clone());
            println!("{}", path.display());
            Ok(())
        }
        None => {
            warn!(id = %image.id(), "Original did not arrive in time");
            Err(eyre!("original for {} could not be downloaded", image.id()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let config = load_config(&args)?;

    init_logging(&config)?;

    info!(version = gifstash::VERSION, "Starting {}", gifstash::NAME);

    match &args.command {
        Command::Search {
            query,
            offset,
            limit,
        } => run_search(&config, query, *offset, *limit).await,
        Command::Fetch { query, index } => run_fetch(&config, query, *index).await,
        Command::Evict => {
            let (event_tx, _event_rx) = mpsc::unbounded_channel();
            let cache = OriginalImageCache::new(
                config.effective_cache_dir(),
                Duration::from_secs(config.giphy.timeout_secs),
                &event_tx,
            )?;
            cache.evict_all()?;
            println!("Cleared {}", cache.root().display());
            Ok(())
        }
    }
}
