use chrono::{DateTime, Local, NaiveDate, TimeZone};
use gtfs_decode::{Calendar, CalendarException, Exception};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Service ids running on one date
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveServices {
    services: FxHashSet<Arc<str>>,
}

impl ActiveServices {
    pub fn contains(&self, service_id: &str) -> bool {
        self.services.contains(service_id)
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// In no particular order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(|s| &**s)
    }
}

/// Computes the services that run on `date`
///
/// Weekly patterns are applied first, for every calendar. Exceptions of that date are applied
/// on top, so an exception always wins over the weekly pattern, whatever the row order.
/// Exceptions of unknown kind are ignored.
pub fn active_services(
    date: NaiveDate,
    calendars: &[Calendar],
    exceptions: &[CalendarException],
) -> ActiveServices {
    let mut services: FxHashSet<Arc<str>> = calendars
        .iter()
        .filter(|c| c.runs_on(date))
        .map(|c| Arc::clone(&c.service_id))
        .collect();

    for exception in exceptions.iter().filter(|e| e.date == date) {
        match exception.exception_type {
            Exception::Added => {
                services.insert(Arc::clone(&exception.service_id));
            }
            Exception::Removed => {
                services.remove(&*exception.service_id);
            }
            Exception::Unknown(code) => {
                log::debug!(
                    "ignoring exception {} of service {} on {}",
                    code,
                    exception.service_id,
                    date
                );
            }
        }
    }
    ActiveServices { services }
}

/// The service date of an instant, in the time zone of the instant
pub fn service_date<Tz: TimeZone>(moment: &DateTime<Tz>) -> NaiveDate {
    moment.date_naive()
}

/// Today, in the local time zone
pub fn today() -> NaiveDate {
    service_date(&Local::now())
}
