use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use slogscope_types::{CollapsedEntry, LogRecord};

use crate::error::Result;

/// Default export file name for the given time
pub fn export_file_name(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("slogscope-{}.log", now.format("%Y%m%d-%H%M%S")))
}

/// Write flat records, one line each followed by their indented stack trace
pub fn write_records<W: Write>(out: &mut W, records: &[impl AsRef<LogRecord>]) -> Result<usize> {
    for record in records {
        let record = record.as_ref();
        writeln!(
            out,
            "{} [{}] [{}] {}",
            record.timestamp.format("%Y-%m-%dT%H:%M:%S%.3f"),
            record.severity.as_str(),
            record.group,
            record.raw_text
        )?;
        write_trace(out, &record.stack_trace)?;
    }
    Ok(records.len())
}

/// Write collapsed buckets with their repeat count
pub fn write_collapsed<W: Write>(out: &mut W, entries: &[CollapsedEntry]) -> Result<usize> {
    for entry in entries {
        writeln!(
            out,
            "{} x{} [{}] [{}] {}",
            entry.last_seen.format("%Y-%m-%dT%H:%M:%S%.3f"),
            entry.count,
            entry.severity.as_str(),
            entry.group,
            entry.first_seen_raw_text
        )?;
        write_trace(out, &entry.latest_stack_trace)?;
    }
    Ok(entries.len())
}

fn write_trace<W: Write>(out: &mut W, stack_trace: &str) -> Result<()> {
    for line in stack_trace.lines().filter(|l| !l.trim().is_empty()) {
        writeln!(out, "    {}", line.trim_end())?;
    }
    Ok(())
}

/// Export flat records to `path`, returning how many were written
pub fn export_records(path: &Path, records: &[impl AsRef<LogRecord>]) -> Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let written = write_records(&mut out, records)?;
    out.flush()?;
    tracing::info!(path = %path.display(), written, "exported records");
    Ok(written)
}

/// Export collapsed buckets to `path`, returning how many were written
pub fn export_collapsed(path: &Path, entries: &[CollapsedEntry]) -> Result<usize> {
    let mut out = BufWriter::new(File::create(path)?);
    let written = write_collapsed(&mut out, entries)?;
    out.flush()?;
    tracing::info!(path = %path.display(), written, "exported collapsed entries");
    Ok(written)
}
