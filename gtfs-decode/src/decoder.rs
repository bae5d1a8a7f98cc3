use crate::archive::{FeedArchive, Table};
use crate::error::SinkError;
use crate::feed::Feed;
use crate::interner::Interner;
use crate::objects::*;
use crate::Error;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Number of records handed to a consumer at once when streaming big tables
pub const DEFAULT_BATCH_SIZE: usize = 15_000;

/// What happened while decoding one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableReport {
    /// Rows decoded into records
    pub rows: u64,
    /// Fields that could not be parsed and took their zero value
    pub malformed_fields: u64,
    /// Rows dropped because they could not be read at all
    pub skipped_rows: u64,
}

/// Statistics of a feed decode
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecodeReport {
    /// One entry per table read, by file name. Absent optional tables have zero rows
    ///
    /// A table read again replaces its entry, so the counts describe the last pass.
    pub tables: BTreeMap<&'static str, TableReport>,
    /// Distinct strings held by the interner of the feed
    pub interned_strings: usize,
    /// Time needed to read and parse the archive in milliseconds
    pub read_duration: i64,
    /// Hash of the archive bytes, lowercase hexadecimal
    pub sha256: String,
}

impl DecodeReport {
    /// Report of a single table, if it was read
    pub fn table(&self, table: Table) -> Option<&TableReport> {
        self.tables.get(table.file_name())
    }

    /// Malformed fields over all tables
    pub fn malformed_fields(&self) -> u64 {
        self.tables.values().map(|t| t.malformed_fields).sum()
    }

    /// Skipped rows over all tables
    pub fn skipped_rows(&self) -> u64 {
        self.tables.values().map(|t| t.skipped_rows).sum()
    }
}

/// Outcome of [FeedDecoder::stream]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Records handed to the consumer
    pub rows: usize,
    /// Number of calls to the consumer
    pub batches: usize,
}

/// Decodes the tables of one feed archive
///
/// The decoder owns the [Interner] of the feed: every record it produces shares its strings
/// with the other records of the same feed, and with nothing else. Records stay valid after
/// the decoder is dropped.
///
/// ```no_run
/// # fn run(bytes: &[u8]) -> Result<(), gtfs_decode::Error> {
/// let mut decoder = gtfs_decode::FeedDecoder::new(bytes)?;
/// let stops = decoder.stops()?;
/// decoder.stream_departures(15_000, |batch| {
///     println!("{} departures", batch.len());
///     Ok(())
/// })?;
/// println!("{} stops, {} ms", stops.len(), decoder.finish().read_duration);
/// # Ok(())
/// # }
/// ```
pub struct FeedDecoder<'a> {
    archive: FeedArchive<'a>,
    interner: Interner,
    report: DecodeReport,
    started: DateTime<Utc>,
}

impl<'a> FeedDecoder<'a> {
    /// Opens an archive held in memory
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        let started = Utc::now();
        let archive = FeedArchive::new(bytes)?;
        Ok(FeedDecoder {
            archive,
            interner: Interner::new(),
            report: DecodeReport {
                sha256: format!("{:x}", Sha256::digest(bytes)),
                ..DecodeReport::default()
            },
            started,
        })
    }

    /// The underlying archive
    pub fn archive(&self) -> &FeedArchive<'a> {
        &self.archive
    }

    /// The interner shared by the records of this feed
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Statistics so far
    pub fn report(&self) -> DecodeReport {
        DecodeReport {
            interned_strings: self.interner.len(),
            read_duration: Utc::now()
                .signed_duration_since(self.started)
                .num_milliseconds(),
            ..self.report.clone()
        }
    }

    /// Final statistics. The interner is released with the decoder
    pub fn finish(self) -> DecodeReport {
        self.report()
    }

    /// Reads every record of a table
    ///
    /// An absent optional table gives an empty collection.
    pub fn read<T: Record>(&mut self) -> Result<Vec<T>, Error> {
        let mut records = Vec::new();
        self.read_table(|record: T| {
            records.push(record);
            Ok(())
        })?;
        Ok(records)
    }

    /// All `stops.txt` records
    pub fn stops(&mut self) -> Result<Vec<Stop>, Error> {
        self.read()
    }

    /// All `routes.txt` records
    pub fn routes(&mut self) -> Result<Vec<Route>, Error> {
        self.read()
    }

    /// All `trips.txt` records
    pub fn trips(&mut self) -> Result<Vec<Trip>, Error> {
        self.read()
    }

    /// All `stop_times.txt` records. See [FeedDecoder::stream_departures] for big feeds
    pub fn departures(&mut self) -> Result<Vec<Departure>, Error> {
        self.read()
    }

    /// All `calendar.txt` records, empty if only `calendar_dates.txt` exists
    pub fn calendars(&mut self) -> Result<Vec<Calendar>, Error> {
        self.read()
    }

    /// All `calendar_dates.txt` records, empty if only `calendar.txt` exists
    pub fn calendar_exceptions(&mut self) -> Result<Vec<CalendarException>, Error> {
        self.read()
    }

    /// All `shapes.txt` records, empty if the feed has no shapes
    pub fn shapes(&mut self) -> Result<Vec<ShapePoint>, Error> {
        self.read()
    }

    /// Hands the records of a table to `sink` in batches, in file order
    ///
    /// Every batch has `batch_size` records except the last one, which has what is left.
    /// A `batch_size` of 0 is read as 1. Batches are owned by the consumer and outlive the
    /// decoder. If the consumer returns an error, reading stops and [Error::Sink] is returned.
    pub fn stream<T, F>(&mut self, batch_size: usize, mut sink: F) -> Result<StreamSummary, Error>
    where
        T: Record,
        F: FnMut(Vec<T>) -> Result<(), SinkError>,
    {
        let batch_size = batch_size.max(1);
        let capacity = batch_size.min(DEFAULT_BATCH_SIZE);
        let sink_error = |source: SinkError| Error::Sink {
            file_name: T::TABLE.file_name().to_owned(),
            source,
        };

        let mut summary = StreamSummary::default();
        let mut batch = Vec::with_capacity(capacity);
        self.read_table(|record: T| {
            batch.push(record);
            if batch.len() >= batch_size {
                let full = std::mem::replace(&mut batch, Vec::with_capacity(capacity));
                summary.rows += full.len();
                summary.batches += 1;
                sink(full).map_err(sink_error)?;
            }
            Ok(())
        })?;

        if !batch.is_empty() {
            summary.rows += batch.len();
            summary.batches += 1;
            sink(batch).map_err(sink_error)?;
        }
        log::debug!(
            "{}: {} records in {} batches",
            T::TABLE,
            summary.rows,
            summary.batches
        );
        Ok(summary)
    }

    /// [FeedDecoder::stream] over `stop_times.txt`
    pub fn stream_departures<F>(&mut self, batch_size: usize, sink: F) -> Result<StreamSummary, Error>
    where
        F: FnMut(Vec<Departure>) -> Result<(), SinkError>,
    {
        self.stream(batch_size, sink)
    }

    /// Reads every table
    ///
    /// The calendar tables are checked first, so a feed without them fails before any
    /// big table is read.
    pub fn decode_all(mut self) -> Result<Feed, Error> {
        self.archive.check_calendar()?;
        let calendars = self.calendars()?;
        let calendar_exceptions = self.calendar_exceptions()?;
        let stops = self.stops()?;
        let routes = self.routes()?;
        let trips = self.trips()?;
        let departures = self.departures()?;
        let shapes = self.shapes()?;
        Ok(Feed {
            stops,
            routes,
            trips,
            departures,
            calendars,
            calendar_exceptions,
            shapes,
            report: self.finish(),
        })
    }

    fn read_table<T, F>(&mut self, mut each: F) -> Result<(), Error>
    where
        T: Record,
        F: FnMut(T) -> Result<(), Error>,
    {
        let table = T::TABLE;
        let mut stats = TableReport::default();

        if let Some(mut reader) = self.archive.open(table)? {
            while let Some(mut row) = reader.next_row()? {
                let record = T::decode(&mut row, &mut self.interner);
                stats.rows += 1;
                each(record)?;
            }
            stats.malformed_fields = reader.malformed_fields();
            stats.skipped_rows = reader.skipped_rows();
            log::info!("{}: {} rows decoded", table, stats.rows);
        } else {
            log::info!("{}: not in the archive", table);
        }

        if stats.malformed_fields > 0 || stats.skipped_rows > 0 {
            log::warn!(
                "{}: {} malformed fields replaced by zero values, {} rows skipped",
                table,
                stats.malformed_fields,
                stats.skipped_rows
            );
        }

        self.report.tables.insert(table.file_name(), stats);
        Ok(())
    }
}
