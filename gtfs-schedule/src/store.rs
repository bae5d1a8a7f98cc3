use crate::query::{departures_at_stop, shape_points};
use chrono::NaiveDate;
use gtfs_decode::{Departure, Feed, Route, ShapePoint, Stop, Trip};
use rustc_hash::FxHashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Decoded feeds by city id
///
/// Each feed is an immutable snapshot. Replacing a feed swaps the snapshot in one step:
/// a query sees either the old or the new feed, never a mix, and queries running on the
/// old snapshot finish on it.
#[derive(Default)]
pub struct FeedStore {
    feeds: RwLock<FxHashMap<String, Arc<Feed>>>,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the feed of a city, returning the one it replaces
    pub fn replace(&self, city: impl Into<String>, feed: Feed) -> Option<Arc<Feed>> {
        let city = city.into();
        log::info!("installing feed {} ({})", city, feed.sha256());
        let feed = Arc::new(feed);
        self.feeds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(city, feed)
    }

    pub fn remove(&self, city: &str) -> Option<Arc<Feed>> {
        self.feeds
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(city)
    }

    /// Current snapshot of a city
    pub fn get(&self, city: &str) -> Option<Arc<Feed>> {
        self.feeds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(city)
            .cloned()
    }

    /// Loaded city ids, sorted
    pub fn cities(&self) -> Vec<String> {
        let mut cities: Vec<String> = self
            .feeds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        cities.sort();
        cities
    }

    pub fn stops(&self, city: &str) -> Vec<Stop> {
        self.get(city)
            .map(|feed| feed.stops.clone())
            .unwrap_or_default()
    }

    pub fn routes(&self, city: &str) -> Vec<Route> {
        self.get(city)
            .map(|feed| feed.routes.clone())
            .unwrap_or_default()
    }

    pub fn trips(&self, city: &str) -> Vec<Trip> {
        self.get(city)
            .map(|feed| feed.trips.clone())
            .unwrap_or_default()
    }

    /// Every departure of a city in file order, whatever its service
    pub fn all_departures(&self, city: &str) -> Vec<Departure> {
        self.get(city)
            .map(|feed| feed.departures.clone())
            .unwrap_or_default()
    }

    /// Every shape point of a city in file order
    pub fn shapes(&self, city: &str) -> Vec<ShapePoint> {
        self.get(city)
            .map(|feed| feed.shapes.clone())
            .unwrap_or_default()
    }

    /// Departures of a stop on a date. Empty for an unknown city
    pub fn departures(&self, city: &str, stop_id: &str, date: NaiveDate) -> Vec<Departure> {
        let Some(feed) = self.get(city) else {
            log::debug!("departures requested for unknown city {}", city);
            return Vec::new();
        };
        let departures: Vec<Departure> = departures_at_stop(&feed, stop_id, date)
            .into_iter()
            .cloned()
            .collect();
        departures
    }

    /// Ordered points of a shape. Empty for an unknown city
    pub fn shape(&self, city: &str, shape_id: &str) -> Vec<ShapePoint> {
        let Some(feed) = self.get(city) else {
            return Vec::new();
        };
        let points: Vec<ShapePoint> = shape_points(&feed.shapes, shape_id)
            .into_iter()
            .cloned()
            .collect();
        points
    }
}
