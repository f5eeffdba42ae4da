/// Merging scan capture files into one per-device summary
use log::{debug, info};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

use crate::config::AggregatorConfig;
use crate::error::{Error, Result};
use crate::models::{CaptureDocument, CaptureRecord, DeviceSummary, ScanSummaryDocument};
use crate::utils::format_datetime;

/// Folds capture records into one [`DeviceSummary`] per device id.
///
/// The first record seen for a device is taken as-is, including the
/// min/max/avg that the capture file computed for itself. Every later record
/// appends its raw reading and recomputes min/max/avg from the collected
/// readings. Summaries keep the order in which devices were first seen.
#[derive(Debug, Default)]
pub struct Aggregator {
    summaries: Vec<DeviceSummary>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_record(&mut self, record: &CaptureRecord) {
        match self.index.get(&record.device_id) {
            Some(&position) => {
                let summary = &mut self.summaries[position];
                summary.count += record.count;
                summary.rssi_samples.push(record.rssi_raw);
                recompute_statistics(summary);
            }
            None => {
                self.index.insert(record.device_id.clone(), self.summaries.len());
                self.summaries.push(DeviceSummary {
                    technology: record.technology.clone(),
                    ssid: record.ssid.clone(),
                    device_id: record.device_id.clone(),
                    count: record.count,
                    rssi_samples: vec![record.rssi_raw],
                    rssi_min: record.rssi_min,
                    rssi_max: record.rssi_max,
                    rssi_avg: record.rssi_avg,
                });
            }
        }
    }

    pub fn add_records<'a>(&mut self, records: impl IntoIterator<Item = &'a CaptureRecord>) {
        for record in records {
            self.add_record(record);
        }
    }

    pub fn device_count(&self) -> usize {
        self.summaries.len()
    }

    pub fn into_summaries(self) -> Vec<DeviceSummary> {
        self.summaries
    }
}

fn recompute_statistics(summary: &mut DeviceSummary) {
    let samples = &summary.rssi_samples;
    summary.rssi_min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    summary.rssi_max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    // Half-way means go to the even neighbour, e.g. -60.5 -> -60.
    summary.rssi_avg = mean.round_ties_even();
}

/// Parse one capture file. Any parse failure or a missing `scanData` array
/// is an error for the whole run.
pub fn read_capture(path: &Path) -> Result<Vec<CaptureRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let document: CaptureDocument =
        serde_json::from_str(&contents).map_err(|source| Error::MalformedCapture {
            path: path.to_path_buf(),
            source,
        })?;
    document.scan_data.ok_or_else(|| Error::MissingScanData {
        path: path.to_path_buf(),
    })
}

/// Merge every capture file in `config.capture_dir`.
///
/// The summary is stamped with the time the run started. Subdirectories are
/// skipped; every other entry must be a capture document.
pub fn aggregate_directory(config: &AggregatorConfig) -> Result<ScanSummaryDocument> {
    let started = OffsetDateTime::now_utc();
    info!(
        "Merging captures from {} (run started {})",
        config.capture_dir.display(),
        format_datetime(&started)
    );

    let entries =
        fs::read_dir(&config.capture_dir).map_err(|e| Error::io(&config.capture_dir, e))?;
    let mut aggregator = Aggregator::new();
    let mut files = 0usize;

    for entry in entries {
        let entry = entry.map_err(|e| Error::io(&config.capture_dir, e))?;
        let path = entry.path();
        if path.is_dir() {
            debug!("Skipping directory {}", path.display());
            continue;
        }

        let records = read_capture(&path)?;
        debug!("{}: {} records", path.display(), records.len());
        aggregator.add_records(&records);
        files += 1;
    }

    info!(
        "Merged {} capture files into {} devices",
        files,
        aggregator.device_count()
    );

    Ok(ScanSummaryDocument {
        timestamp: started.unix_timestamp(),
        property_name: config.property_name.clone(),
        poi_name: config.poi_name.clone(),
        group: config.group.clone(),
        scan_data: aggregator.into_summaries(),
    })
}

/// Write `summary` as `<timestamp>.json` inside `dir`, indented by four spaces.
///
/// Never overwrites: an existing file with the same timestamp is an error.
pub fn write_summary(dir: &Path, summary: &ScanSummaryDocument) -> Result<PathBuf> {
    let path = dir.join(format!("{}.json", summary.timestamp));
    let file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| Error::io(&path, e))?;
    let mut writer = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    summary.serialize(&mut serializer)?;
    writer.flush().map_err(|e| Error::io(&path, e))?;

    info!("Summary written to {}", path.display());
    Ok(path)
}

/// One complete merge: read the capture directory, write the summary file.
pub fn run(config: &AggregatorConfig) -> Result<PathBuf> {
    let summary = aggregate_directory(config)?;
    write_summary(&config.summary_dir, &summary)
}
