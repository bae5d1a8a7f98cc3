use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Places searched for the configuration when none is given on the command line
const DEFAULT_LOCATIONS: [&str; 2] = ["/data/cities.json", "cities.json"];

fn default_batch_size() -> usize {
    gtfs_decode::DEFAULT_BATCH_SIZE
}

fn default_fetch_timeout_secs() -> u64 {
    120
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Configuration {
    pub cities: Vec<CityFeed>,
    /// Departures handed to a sink at once when streaming
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
}

/// One city and where its feed archive comes from
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct CityFeed {
    pub id: String,
    #[serde(flatten)]
    pub source: FeedSource,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Url(String),
    Path(PathBuf),
}

impl Configuration {
    /// Reads the configuration from `explicit`, or from the first default location that exists
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match DEFAULT_LOCATIONS.iter().map(Path::new).find(|p| p.exists()) {
                Some(path) => path.to_path_buf(),
                None => bail!(
                    "no configuration given and none found in {}",
                    DEFAULT_LOCATIONS.join(", ")
                ),
            },
        };
        log::info!("Loading configuration from {}", path.display());
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("impossible to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid configuration {}", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let configuration: Configuration = serde_json::from_str(text)?;
        for (i, city) in configuration.cities.iter().enumerate() {
            if configuration.cities[..i].iter().any(|c| c.id == city.id) {
                bail!("city {} is configured twice", city.id);
            }
        }
        Ok(configuration)
    }

    pub fn city(&self, id: &str) -> Option<&CityFeed> {
        self.cities.iter().find(|c| c.id == id)
    }

    pub fn city_ids(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.id.as_str()).collect()
    }
}
