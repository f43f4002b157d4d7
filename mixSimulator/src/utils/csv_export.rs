use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use tracing::{debug, info};

use super::logging::{self, FileIOType, OperationCategory};
use super::traits::FlatRecord;
use crate::core::availability::AvailabilitySample;

/// Writes result tables into a timestamped directory under the output root.
pub struct CsvExporter {
    output_dir: PathBuf,
    timestamp: String,
    verbose_logging: bool,
}

impl CsvExporter {
    /// Create a new exporter, making `<output_dir>/<timestamp>/` on the way.
    pub fn new(output_dir: impl AsRef<Path>, verbose_logging: bool) -> anyhow::Result<Self> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(&timestamp);
        std::fs::create_dir_all(&full_path)
            .with_context(|| format!("Failed to create output directory {}", full_path.display()))?;

        Ok(Self {
            output_dir: full_path,
            timestamp,
            verbose_logging,
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Write `records` to `<name>.csv`, one column per field. Nothing is
    /// written for an empty slice.
    pub fn export_records<R: FlatRecord>(&self, name: &str, records: &[R]) -> anyhow::Result<Option<PathBuf>> {
        let _timing = logging::start_timing(
            "export_records",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave },
        );
        let Some(first) = records.first() else {
            debug!(name, "no records to export");
            return Ok(None);
        };

        let path = self.output_dir.join(format!("{}.csv", name));
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;

        writer.write_record(first.fields().iter().map(|(column, _)| *column))?;
        for record in records {
            writer.write_record(record.fields().iter().map(|(_, value)| value.as_str()))?;
        }
        writer.flush()?;

        if self.verbose_logging {
            println!("Exported {} rows to: {}", records.len(), path.display());
        }
        Ok(Some(path))
    }

    /// Raw wind/sway trials, serialized straight from the sample struct.
    pub fn export_availability_samples(&self, samples: &[AvailabilitySample]) -> anyhow::Result<PathBuf> {
        let path = self.output_dir.join("availability_samples.csv");
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        for sample in samples {
            writer.serialize(sample)?;
        }
        writer.flush()?;
        debug!(rows = samples.len(), path = %path.display(), "availability samples exported");
        Ok(path)
    }

    /// Pretty-printed JSON dump of any serializable summary.
    pub fn export_summary<T: Serialize>(&self, name: &str, summary: &T) -> anyhow::Result<PathBuf> {
        let _timing = logging::start_timing(
            "export_summary",
            OperationCategory::FileIO { subcategory: FileIOType::ResultsSave },
        );
        let path = self.output_dir.join(format!("{}.json", name));
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let json = serde_json::to_string_pretty(summary)?;
        file.write_all(json.as_bytes())?;

        info!(path = %path.display(), "summary written");
        Ok(path)
    }
}
