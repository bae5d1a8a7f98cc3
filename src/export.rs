use crate::configuration::Configuration;
use crate::ingest;
use anyhow::Context;
use gtfs_decode::{FeedDecoder, StreamSummary};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Exports the departures of a configured city to `out`
///
/// The file is created once the archive is fetched, so a failed download leaves nothing
/// behind. An unknown city gives an empty file.
pub async fn export_city(
    configuration: &Configuration,
    city: &str,
    out: &Path,
    batch_size: Option<usize>,
) -> anyhow::Result<StreamSummary> {
    let create = |out: &Path| {
        File::create(out).with_context(|| format!("impossible to create {}", out.display()))
    };
    let Some(feed) = configuration.city(city) else {
        log::warn!("{} is not a configured city, nothing exported", city);
        create(out)?;
        return Ok(StreamSummary::default());
    };
    let client = ingest::http_client(configuration)?;
    let bytes = ingest::fetch(feed, &client).await?;
    let file = create(out)?;
    let batch_size = batch_size.unwrap_or(configuration.batch_size);
    let summary =
        tokio::task::spawn_blocking(move || export_departures(&bytes, file, batch_size)).await??;
    log::info!("{} departures written to {}", summary.rows, out.display());
    Ok(summary)
}

/// Writes the departures of a feed archive as JSON lines, one departure per line
///
/// The table is streamed in batches of `batch_size`, so the whole table is never held in
/// memory. Lines keep the file order.
pub fn export_departures<W: Write>(
    bytes: &[u8],
    out: W,
    batch_size: usize,
) -> anyhow::Result<StreamSummary> {
    let mut out = BufWriter::new(out);
    let mut decoder = FeedDecoder::new(bytes)?;
    let summary = decoder.stream_departures(batch_size, |batch| {
        for departure in &batch {
            serde_json::to_writer(&mut out, departure)?;
            out.write_all(b"\n")?;
        }
        Ok(())
    })?;
    out.flush()?;

    let report = decoder.finish();
    log::info!(
        "Exported {} departures in {} batches ({} ms)",
        summary.rows,
        summary.batches,
        report.read_duration
    );
    Ok(summary)
}
