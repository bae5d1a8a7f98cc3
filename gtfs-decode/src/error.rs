//! Module for the error management
use thiserror::Error;

/// Boxed error returned by a batch consumer
pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

/// An error that aborts the decoding of one feed.
///
/// Malformed fields are not errors: they fall back to zero values and are only
/// counted in the [crate::DecodeReport].
#[derive(Error, Debug)]
pub enum Error {
    /// The bytes are not a readable zip archive
    #[error("invalid feed archive")]
    InvalidArchive(#[from] zip::result::ZipError),
    /// A mandatory file is not present in the archive
    #[error("Could not find file {0}")]
    MissingFile(String),
    /// Neither `calendar.txt` nor `calendar_dates.txt` is present
    #[error("the feed has neither calendar.txt nor calendar_dates.txt")]
    NoCalendar,
    /// Impossible to open a file of the archive
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        /// The file name that could not be read
        file_name: String,
        /// The inital error that caused the unability to read the file
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Impossible to read a CSV file
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        /// File name that could not be parsed as CSV
        file_name: String,
        /// The initial error by the csv library
        #[source]
        source: csv::Error,
    },
    /// The consumer of a batch stream gave up
    #[error("the consumer of '{file_name}' batches failed")]
    Sink {
        /// File being streamed
        file_name: String,
        /// Error returned by the consumer
        #[source]
        source: SinkError,
    },
}

/// A time that is not written `HH:MM:SS`
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a valid time; HH:MM:SS format is expected.")]
pub struct InvalidTime(pub String);

impl Error {
    /// True when the feed itself is unusable (bad archive, missing table, no calendar)
    ///
    /// A [Error::Sink] failure comes from the consumer, not from the feed.
    pub fn is_fatal_feed_error(&self) -> bool {
        !matches!(self, Error::Sink { .. })
    }
}
