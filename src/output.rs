//! Output formatting for reports and raw trip rows.
//!
//! Supports JSON reports and CSV windows of records.

use std::io::Write;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use crate::records::TripRecord;

/// Writes a value as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes a window of trips as CSV rows.
///
/// The header is only written when `with_header` is set, so successive
/// windows can be streamed to the same output.
pub fn write_rows<W: Write>(writer: W, rows: &[TripRecord], with_header: bool) -> Result<()> {
    debug!(rows = rows.len(), with_header, "Writing trip rows");

    let mut writer = WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
