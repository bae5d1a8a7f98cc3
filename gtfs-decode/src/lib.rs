/*! Decoding of static [GTFS](https://gtfs.org/) feeds held in memory.

A feed is a zip archive of CSV tables. This crate opens the tables of one
archive, decodes their rows into typed records and deduplicates the repeated
strings of the feed.

To get started, see [FeedDecoder] or the one-shot [decode_feed].

## Design decisions

### Columns by name

Every table is read through its header row. Fields are looked up by column
name, so column order and extra columns never matter. A missing column gives
the zero value of the field (empty string, `0`, `false`).

### Lenient fields, fatal structure

A malformed number, flag, date or time never aborts a table. The field takes
its zero value and the failure is counted in the [DecodeReport]. Only an
unreadable archive, a missing mandatory table or a feed without any calendar
table is an [Error].

### One interner per feed

Identifiers, colors and names repeat across millions of rows. The [Interner]
hands out shared `Arc<str>` copies. It belongs to a single [FeedDecoder] and is
dropped with it, so feeds decoded one after another (or at the same time on
different threads) never share cache state.

### Batches for big tables

`stop_times.txt` can have millions of rows. [FeedDecoder::stream_departures]
emits them in batches of owned records instead of materializing the table.
*/
#![warn(missing_docs)]

mod archive;
mod decoder;
mod enums;
pub mod error;
mod feed;
mod interner;
mod objects;
mod row;


pub use archive::{FeedArchive, Table, TableReader};
pub use decoder::{DecodeReport, FeedDecoder, StreamSummary, TableReport, DEFAULT_BATCH_SIZE};
pub use enums::*;
pub use error::Error;
pub use feed::{decode_feed, Feed};
pub use interner::Interner;
pub use objects::*;
pub use row::{HeaderIndex, Row, ZERO_DATE};
