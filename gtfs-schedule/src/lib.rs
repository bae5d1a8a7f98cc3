//! Answers schedule questions over decoded feeds: which services run on a date, which
//! departures leave a stop, what path a shape follows.
//!
//! Feeds are held as immutable snapshots in a [FeedStore]. Queries never fail: an unknown
//! feed, stop or shape gives an empty result.

pub mod calendar;
pub mod query;
mod store;

pub use calendar::{active_services, service_date, today, ActiveServices};
pub use query::{departures_at_stop, departures_at_stop_today, shape_line_string, shape_points};
pub use store::FeedStore;
