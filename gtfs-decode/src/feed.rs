use crate::decoder::{DecodeReport, FeedDecoder};
use crate::objects::*;
use crate::Error;

/// Every table of a feed, fully decoded
///
/// Records are kept in file order. Strings are shared between the records of this feed only.
#[derive(Debug, Clone, Default)]
pub struct Feed {
    /// `stops.txt`
    pub stops: Vec<Stop>,
    /// `routes.txt`
    pub routes: Vec<Route>,
    /// `trips.txt`
    pub trips: Vec<Trip>,
    /// `stop_times.txt`
    pub departures: Vec<Departure>,
    /// `calendar.txt`, possibly empty
    pub calendars: Vec<Calendar>,
    /// `calendar_dates.txt`, possibly empty
    pub calendar_exceptions: Vec<CalendarException>,
    /// `shapes.txt`, possibly empty
    pub shapes: Vec<ShapePoint>,
    /// How the decode went
    pub report: DecodeReport,
}

impl Feed {
    /// Hash of the archive the feed was decoded from
    pub fn sha256(&self) -> &str {
        &self.report.sha256
    }

    /// Logs the size of every table
    pub fn log_stats(&self) {
        log::info!("Feed data:");
        log::info!("  Read in {} ms", self.report.read_duration);
        log::info!("  Stops: {}", self.stops.len());
        log::info!("  Routes: {}", self.routes.len());
        log::info!("  Trips: {}", self.trips.len());
        log::info!("  Departures: {}", self.departures.len());
        log::info!("  Calendars: {}", self.calendars.len());
        log::info!("  Calendar exceptions: {}", self.calendar_exceptions.len());
        log::info!("  Shape points: {}", self.shapes.len());
        log::info!("  Interned strings: {}", self.report.interned_strings);
    }
}

/// Decodes a whole feed archive held in memory
pub fn decode_feed(bytes: &[u8]) -> Result<Feed, Error> {
    FeedDecoder::new(bytes)?.decode_all()
}
