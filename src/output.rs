//! Hand-off of finished traces to files a renderer can pick up.

use crate::universe::Universe;
use anyhow::{Context, Result};
use log::{error, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use trajectory_common::TraceRecord;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceFormat {
    Json,
    Bincode,
    MessagePack,
    Csv,
}

impl TraceFormat {
    /// Parses a configured format name. Unknown names fall back to JSON.
    pub fn from_name(name: Option<&str>) -> Self {
        match name.unwrap_or("json") {
            "json" => TraceFormat::Json,
            "bincode" => TraceFormat::Bincode,
            "messagepack" => TraceFormat::MessagePack,
            "csv" => TraceFormat::Csv,
            other => {
                error!("Unknown output format: {}. Using JSON instead.", other);
                TraceFormat::Json
            }
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            TraceFormat::Json => "json",
            TraceFormat::Bincode => "bin",
            TraceFormat::MessagePack => "msgpack",
            TraceFormat::Csv => "csv",
        }
    }
}

/// One record per body, in universe order, keeping every `stride`-th point.
pub fn collect_traces(universe: &Universe, stride: usize) -> Vec<TraceRecord> {
    universe
        .bodies()
        .iter()
        .map(|b| TraceRecord::downsampled(b.name(), b.kind_label(), b.trace(), stride))
        .collect()
}

/// `<base_filename>_traces.<ext>`
pub fn trace_path(base_filename: &str, format: TraceFormat) -> PathBuf {
    PathBuf::from(format!("{}_traces.{}", base_filename, format.extension()))
}

/// Writes the records to `path` in the given format.
pub fn write_traces(path: &Path, format: TraceFormat, records: &[TraceRecord]) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Error creating trace file '{}'", path.display()))?;
    let mut writer = BufWriter::new(file);

    match format {
        TraceFormat::Json => {
            serde_json::to_writer(&mut writer, records)
                .context("Error serializing traces to JSON")?;
        }
        TraceFormat::Bincode => {
            bincode::serialize_into(&mut writer, records)
                .context("Error serializing traces to bincode")?;
        }
        TraceFormat::MessagePack => {
            rmp_serde::encode::write(&mut writer, records)
                .context("Error serializing traces to MessagePack")?;
        }
        TraceFormat::Csv => {
            let mut csv_writer = csv::Writer::from_writer(&mut writer);
            csv_writer.write_record(["name", "kind", "index", "x", "y"])?;
            for record in records {
                for (i, (x, y)) in record.points.iter().enumerate() {
                    let index = i * record.stride;
                    csv_writer.write_record([
                        record.name.clone(),
                        record.kind.clone(),
                        index.to_string(),
                        x.to_string(),
                        y.to_string(),
                    ])?;
                }
            }
            csv_writer.flush()?;
        }
    }

    writer.flush()?;
    info!("Traces of {} bodies saved to {}", records.len(), path.display());
    Ok(())
}
