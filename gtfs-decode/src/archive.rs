use crate::row::{HeaderIndex, Row};
use crate::Error;
use rustc_hash::FxHashMap;
use std::fmt;
use std::io::{Cursor, Read};

/// The tables of a feed that this crate reads, by conventional file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    /// `stops.txt`
    Stops,
    /// `routes.txt`
    Routes,
    /// `trips.txt`
    Trips,
    /// `stop_times.txt`, the departures
    StopTimes,
    /// `calendar.txt`, optional when `calendar_dates.txt` is present
    Calendar,
    /// `calendar_dates.txt`, optional when `calendar.txt` is present
    CalendarDates,
    /// `shapes.txt`, always optional
    Shapes,
}

impl Table {
    /// Every table, in the order a full decode reads them
    pub const ALL: [Table; 7] = [
        Table::Calendar,
        Table::CalendarDates,
        Table::Stops,
        Table::Routes,
        Table::Trips,
        Table::StopTimes,
        Table::Shapes,
    ];

    /// Name of the file inside the archive
    pub fn file_name(self) -> &'static str {
        match self {
            Table::Stops => "stops.txt",
            Table::Routes => "routes.txt",
            Table::Trips => "trips.txt",
            Table::StopTimes => "stop_times.txt",
            Table::Calendar => "calendar.txt",
            Table::CalendarDates => "calendar_dates.txt",
            Table::Shapes => "shapes.txt",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// A feed archive held in memory, with its tables located by file name
///
/// Tables may sit in a sub-directory of the archive; only the file name is matched.
pub struct FeedArchive<'a> {
    archive: zip::ZipArchive<Cursor<&'a [u8]>>,
    file_mapping: FxHashMap<Table, usize>,
    files: Vec<String>,
}

impl<'a> FeedArchive<'a> {
    /// Opens the archive. Fails with [Error::InvalidArchive] if the bytes are not a zip archive
    pub fn new(bytes: &'a [u8]) -> Result<Self, Error> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
        let mut file_mapping = FxHashMap::default();
        let mut files = Vec::with_capacity(archive.len());

        // Raw access reads the names without a decompressor, so entries in an unsupported
        // compression fail only if they are tables
        for i in 0..archive.len() {
            let archive_file = archive.by_index_raw(i)?;
            files.push(archive_file.name().to_owned());

            let path = std::path::Path::new(archive_file.name());
            for table in Table::ALL {
                if path.file_name() == Some(std::ffi::OsStr::new(table.file_name())) {
                    // The first entry wins if an archive carries the same table twice
                    file_mapping.entry(table).or_insert(i);
                    break;
                }
            }
        }

        Ok(FeedArchive {
            archive,
            file_mapping,
            files,
        })
    }

    /// All the entries of the archive, including the ones that are not read
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// Is the table present in the archive
    pub fn contains(&self, table: Table) -> bool {
        self.file_mapping.contains_key(&table)
    }

    /// Opens a table that must be present
    pub fn table(&mut self, table: Table) -> Result<TableReader<'_>, Error> {
        self.optional_table(table)?
            .ok_or_else(|| Error::MissingFile(table.file_name().to_owned()))
    }

    /// Opens a table that may be absent. `Ok(None)` when it is not in the archive
    pub fn optional_table(&mut self, table: Table) -> Result<Option<TableReader<'_>>, Error> {
        let Some(&index) = self.file_mapping.get(&table) else {
            return Ok(None);
        };
        let file = self
            .archive
            .by_index(index)
            .map_err(|e| Error::NamedFileIO {
                file_name: table.file_name().to_owned(),
                source: Box::new(e),
            })?;
        TableReader::from_reader(table, file).map(Some)
    }

    /// Opens a table following the presence rules of a feed
    ///
    /// - `shapes.txt` is optional,
    /// - `calendar.txt` and `calendar_dates.txt` are optional, but at least one of them must exist,
    /// - every other table is mandatory.
    pub fn open(&mut self, table: Table) -> Result<Option<TableReader<'_>>, Error> {
        match table {
            Table::Shapes => self.optional_table(table),
            Table::Calendar | Table::CalendarDates => {
                self.check_calendar()?;
                self.optional_table(table)
            }
            _ => self.table(table).map(Some),
        }
    }

    /// Fails with [Error::NoCalendar] if the feed has no calendar table at all
    pub fn check_calendar(&self) -> Result<(), Error> {
        if self.contains(Table::Calendar) || self.contains(Table::CalendarDates) {
            Ok(())
        } else {
            Err(Error::NoCalendar)
        }
    }
}

/// Rows of one table, read one at a time into a reused buffer
pub struct TableReader<'r> {
    table: Table,
    reader: csv::Reader<Box<dyn Read + 'r>>,
    header: HeaderIndex,
    record: csv::StringRecord,
    malformed_fields: u64,
    skipped_rows: u64,
}

impl<'r> TableReader<'r> {
    /// Reads the header of the table from any reader
    ///
    /// Tolerates a byte order mark, whitespace around names and rows that are longer or
    /// shorter than the header. Names that are not valid UTF-8 are decoded lossily.
    pub fn from_reader<R: Read + 'r>(table: Table, reader: R) -> Result<Self, Error> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(Box::new(reader) as Box<dyn Read + 'r>);

        let names: Vec<String> = reader
            .byte_headers()
            .map_err(|e| Error::CSVError {
                file_name: table.file_name().to_owned(),
                source: e,
            })?
            .iter()
            .map(|name| String::from_utf8_lossy(name).into_owned())
            .collect();
        let header = HeaderIndex::new(names.iter().map(String::as_str));

        Ok(TableReader {
            table,
            reader,
            header,
            record: csv::StringRecord::new(),
            malformed_fields: 0,
            skipped_rows: 0,
        })
    }

    /// Which table is read
    pub fn table(&self) -> Table {
        self.table
    }

    /// Column positions from the header
    pub fn header(&self) -> &HeaderIndex {
        &self.header
    }

    /// Fields that could not be parsed so far and fell back to their zero value
    pub fn malformed_fields(&self) -> u64 {
        self.malformed_fields
    }

    /// Rows that could not be decoded at all (e.g. invalid UTF-8) and were dropped
    pub fn skipped_rows(&self) -> u64 {
        self.skipped_rows
    }

    /// Next row of the table, `None` at the end
    ///
    /// The row borrows the reader buffer: it is overwritten by the next call.
    /// Only I/O failures are errors, a row that cannot be decoded is skipped.
    pub fn next_row(&mut self) -> Result<Option<Row<'_>>, Error> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => break,
                Ok(false) => return Ok(None),
                Err(e) if e.is_io_error() => {
                    return Err(Error::CSVError {
                        file_name: self.table.file_name().to_owned(),
                        source: e,
                    })
                }
                Err(e) => {
                    if self.skipped_rows == 0 {
                        log::warn!("{}: skipping undecodable row: {}", self.table, e);
                    }
                    self.skipped_rows += 1;
                }
            }
        }
        Ok(Some(Row::new(
            &self.record,
            &self.header,
            &mut self.malformed_fields,
        )))
    }
}
