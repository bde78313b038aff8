//! Status log output
//!
//! Writes the aggregated events as CSV (`DATE,WELL,I,J,K,OP/SH`) or as a
//! JSON array, to a file or to stdout.

use crate::config::OutputFormat;
use anyhow::{Context, Result};
use chrono::Timelike;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use wellconn_status::StatusEvent;

/// CSV header, one name per event field
pub const CSV_HEADER: [&str; 6] = ["DATE", "WELL", "I", "J", "K", "OP/SH"];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Write events to `destination` ("-" means stdout)
pub fn write_report(events: &[StatusEvent], destination: &str, format: OutputFormat) -> Result<()> {
    if destination == "-" {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        write_events(events, &mut out, format).context("Failed to write to stdout")?;
        out.flush()?;
        return Ok(());
    }

    let path = Path::new(destination);
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    let mut out = BufWriter::new(file);
    write_events(events, &mut out, format)
        .with_context(|| format!("Failed to write output file: {:?}", path))?;
    out.flush()?;

    log::info!("Wrote {} status changes to {:?}", events.len(), path);
    Ok(())
}

/// Write events in the given format
pub fn write_events<W: Write>(events: &[StatusEvent], out: &mut W, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(events, out)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, events)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Write events as CSV with a header row
///
/// Dates are written without a time of day when every event falls on
/// midnight.
pub fn write_csv<W: Write>(events: &[StatusEvent], out: &mut W) -> io::Result<()> {
    let dates_only = events
        .iter()
        .all(|e| e.date.num_seconds_from_midnight() == 0 && e.date.nanosecond() == 0);
    let date_format = if dates_only { DATE_FORMAT } else { DATETIME_FORMAT };

    writeln!(out, "{}", CSV_HEADER.join(","))?;
    for event in events {
        writeln!(
            out,
            "{},{},{},{},{},{}",
            event.date.format(date_format),
            event.well,
            event.i,
            event.j,
            event.k,
            event.status
        )?;
    }
    Ok(())
}
