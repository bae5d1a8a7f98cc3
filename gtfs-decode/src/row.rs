use crate::interner::Interner;
use crate::objects::ServiceTime;
use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::str::FromStr;
use std::sync::Arc;

/// Dates that cannot be parsed fall back to this value
///
/// A calendar with such a bound never matches a real date.
pub const ZERO_DATE: NaiveDate = NaiveDate::MIN;

/// Column name to column position, built from a header row
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    columns: FxHashMap<String, usize>,
}

impl HeaderIndex {
    /// Indexes the header names. A leading byte order mark and surrounding whitespace are removed
    ///
    /// If a name is repeated, the first column wins.
    pub fn new<'h>(names: impl IntoIterator<Item = &'h str>) -> Self {
        let mut columns = FxHashMap::default();
        for (position, name) in names.into_iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').trim();
            columns.entry(name.to_owned()).or_insert(position);
        }
        HeaderIndex { columns }
    }

    /// Position of a column, if the table has it
    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Number of distinct columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True for a table without header
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One row of a table, with typed and lenient access to its fields by column name
///
/// Missing columns and empty fields give the zero value of the type. Non-empty fields
/// that cannot be parsed also give the zero value and are counted as malformed.
pub struct Row<'r> {
    record: &'r csv::StringRecord,
    header: &'r HeaderIndex,
    malformed: &'r mut u64,
}

impl<'r> Row<'r> {
    pub(crate) fn new(
        record: &'r csv::StringRecord,
        header: &'r HeaderIndex,
        malformed: &'r mut u64,
    ) -> Self {
        Row {
            record,
            header,
            malformed,
        }
    }

    /// Raw text of a field, empty if the column or the field is missing
    pub fn text(&self, column: &str) -> &'r str {
        self.header
            .position(column)
            .and_then(|i| self.record.get(i))
            .unwrap_or("")
    }

    /// Owned, deduplicated copy of a field
    pub fn string(&self, column: &str, interner: &mut Interner) -> Arc<str> {
        interner.intern(self.text(column))
    }

    /// Floating point field, `0.0` if missing or malformed
    pub fn float(&mut self, column: &str) -> f64 {
        self.parse_or_zero(column)
    }

    /// Unsigned field such as a sequence number, `0` if missing or malformed
    pub fn unsigned(&mut self, column: &str) -> u32 {
        self.parse_or_zero(column)
    }

    /// Integer code of an enumeration, `0` if missing or malformed
    pub fn code(&mut self, column: &str) -> i32 {
        self.parse_or_zero(column)
    }

    /// `1` is true, `0` or nothing is false. Anything else is false and malformed
    pub fn flag(&mut self, column: &str) -> bool {
        match self.text(column) {
            "1" => true,
            "0" | "" => false,
            _ => self.malformed(false),
        }
    }

    /// Date in the compact `YYYYMMDD` form, [ZERO_DATE] if missing or malformed
    pub fn date(&mut self, column: &str) -> NaiveDate {
        match self.text(column) {
            "" => ZERO_DATE,
            s => match NaiveDate::parse_from_str(s, "%Y%m%d") {
                Ok(date) => date,
                Err(_) => self.malformed(ZERO_DATE),
            },
        }
    }

    /// Time of the service day in `HH:MM:SS`, `None` if missing or malformed
    pub fn time(&mut self, column: &str) -> Option<ServiceTime> {
        match self.text(column) {
            "" => None,
            s => match s.parse() {
                Ok(time) => Some(time),
                Err(_) => self.malformed(None),
            },
        }
    }

    fn parse_or_zero<T: FromStr + Default>(&mut self, column: &str) -> T {
        match self.text(column) {
            "" => T::default(),
            s => match s.parse() {
                Ok(v) => v,
                Err(_) => self.malformed(T::default()),
            },
        }
    }

    fn malformed<T>(&mut self, fallback: T) -> T {
        *self.malformed += 1;
        fallback
    }
}
