use crate::configuration::{CityFeed, Configuration, FeedSource};
use anyhow::Context;
use gtfs_decode::{decode_feed, Feed};
use gtfs_schedule::FeedStore;
use log::{error, info};
use std::time::Duration;

pub fn http_client(configuration: &Configuration) -> anyhow::Result<reqwest::Client> {
    reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(configuration.fetch_timeout_secs))
        .build()
        .context("impossible to build the http client")
}

/// Archive bytes of a feed, downloaded or read from disk
pub async fn fetch(city: &CityFeed, client: &reqwest::Client) -> anyhow::Result<Vec<u8>> {
    match &city.source {
        FeedSource::Url(url) => {
            info!("Downloading {} from {}", city.id, url);
            let response = client
                .get(url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("impossible to download {}", url))?;
            let bytes = response
                .bytes()
                .await
                .with_context(|| format!("impossible to download {}", url))?;
            Ok(bytes.to_vec())
        }
        FeedSource::Path(path) => {
            info!("Reading {} from {}", city.id, path.display());
            tokio::fs::read(path)
                .await
                .with_context(|| format!("impossible to read {}", path.display()))
        }
    }
}

/// Fetches and decodes the feed of one city
///
/// Decoding runs on a blocking worker with its own decoder, so several feeds can be decoded
/// at the same time.
pub async fn load_feed(city: &CityFeed, client: &reqwest::Client) -> anyhow::Result<Feed> {
    let bytes = fetch(city, client).await?;
    let feed = tokio::task::spawn_blocking(move || decode_feed(&bytes))
        .await
        .context("decoding task failed")?
        .with_context(|| format!("invalid feed for {}", city.id))?;
    info!("Loaded {} ({})", city.id, feed.sha256());
    feed.log_stats();
    Ok(feed)
}

/// Loads every configured feed concurrently into the store
///
/// A feed that cannot be fetched or decoded is logged and left out. Returns the ids of the
/// cities that were installed.
pub async fn load_all_feeds(
    configuration: &Configuration,
    store: &FeedStore,
) -> anyhow::Result<Vec<String>> {
    let client = http_client(configuration)?;
    let client = &client;
    let loads = configuration
        .cities
        .iter()
        .map(|city| async move { (city, load_feed(city, client).await) });

    let mut loaded = Vec::new();
    for (city, result) in futures::future::join_all(loads).await {
        match result {
            Ok(feed) => {
                store.replace(city.id.clone(), feed);
                loaded.push(city.id.clone());
            }
            Err(e) => error!("Skipping {}: {:#}", city.id, e),
        }
    }
    info!(
        "{} of {} feeds loaded",
        loaded.len(),
        configuration.cities.len()
    );
    Ok(loaded)
}

/// Loads the feed of one city into the store. `Ok(false)` if the city is not configured
pub async fn load_city(
    configuration: &Configuration,
    store: &FeedStore,
    id: &str,
) -> anyhow::Result<bool> {
    let Some(city) = configuration.city(id) else {
        log::warn!("{} is not a configured city", id);
        return Ok(false);
    };
    let client = http_client(configuration)?;
    let feed = load_feed(city, &client).await?;
    store.replace(city.id.clone(), feed);
    Ok(true)
}
