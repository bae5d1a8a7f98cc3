use crate::calendar::{active_services, today};
use chrono::NaiveDate;
use geo_types::{Coord, LineString};
use gtfs_decode::{Departure, Feed, ServiceTime, ShapePoint};
use rustc_hash::FxHashMap;

/// Points of a shape, ascending by sequence
///
/// Points sharing a sequence number keep their file order. An unknown shape gives no points.
pub fn shape_points<'f>(shapes: &'f [ShapePoint], shape_id: &str) -> Vec<&'f ShapePoint> {
    let mut points: Vec<&ShapePoint> = shapes
        .iter()
        .filter(|p| &*p.shape_id == shape_id)
        .collect();
    points.sort_by_key(|p| p.sequence);
    points
}

/// Line through ordered shape points, with x as longitude and y as latitude
pub fn shape_line_string(points: &[&ShapePoint]) -> LineString {
    let coords: Vec<Coord> = points
        .iter()
        .map(|point| Coord {
            x: point.longitude,
            y: point.latitude,
        })
        .collect();
    LineString::new(coords)
}

/// Departures from a stop on a service date, in departure time order
///
/// A departure is kept when its trip belongs to a service running on `date`. Departures
/// without a time come last, and departures with equal times keep their file order.
/// Times past `24:00:00` belong to `date` and sort after the evening ones.
pub fn departures_at_stop<'f>(feed: &'f Feed, stop_id: &str, date: NaiveDate) -> Vec<&'f Departure> {
    let active = active_services(date, &feed.calendars, &feed.calendar_exceptions);
    if active.is_empty() {
        log::debug!("no service runs on {}", date);
        return Vec::new();
    }

    let trip_services: FxHashMap<&str, &str> = feed
        .trips
        .iter()
        .map(|trip| (&*trip.id, &*trip.service_id))
        .collect();

    let mut departures: Vec<&Departure> = feed
        .departures
        .iter()
        .filter(|d| &*d.stop_id == stop_id)
        .filter(|d| {
            trip_services
                .get(&*d.trip_id)
                .map_or(false, |service| active.contains(service))
        })
        .collect();
    departures.sort_by_key(|d| departure_order(d.departure_time));
    departures
}

/// [departures_at_stop] for the current local date
pub fn departures_at_stop_today<'f>(feed: &'f Feed, stop_id: &str) -> Vec<&'f Departure> {
    departures_at_stop(feed, stop_id, today())
}

fn departure_order(time: Option<ServiceTime>) -> (bool, ServiceTime) {
    (time.is_none(), time.unwrap_or_default())
}
