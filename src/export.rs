//! Writing masks and mask reports.
//!
//! Two formats are supported:
//! - `csv`: the full per-sample mask, one `0`/`1` per line
//! - `json`: a [`MaskReport`] with sections and coverage, without the
//!   per-sample array

use crate::config::Config;
use crate::core::{BoundaryPolicy, MaskBuilder, MaskError, MaskSummary, RunEnd, SampleSection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use thiserror::Error;

/// The name of this producer.
pub const PRODUCER_NAME: &str = "somnum";

/// Output format for the `mask` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Producer metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Producer {
    pub name: String,
    pub version: String,
}

impl Default for Producer {
    fn default() -> Self {
        Self {
            name: PRODUCER_NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

/// Description of a computed mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskReport {
    pub producer: Producer,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Path or name of the state file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub fs: f64,
    pub unit: f64,
    pub samples_per_window: usize,
    pub keep_states: Vec<String>,
    pub boundary_policy: BoundaryPolicy,
    pub run_end: RunEnd,
    pub summary: MaskSummary,
    /// Kept sample ranges, half-open
    pub sections: Vec<SampleSection>,
}

impl MaskReport {
    /// Assemble a report from the configuration and builder that produced
    /// the sections.
    pub fn new(
        config: &Config,
        builder: &MaskBuilder,
        summary: MaskSummary,
        sections: Vec<SampleSection>,
    ) -> Self {
        Self {
            producer: Producer::default(),
            generated_at: Utc::now(),
            source: None,
            fs: config.sampling.fs,
            unit: config.sampling.unit,
            samples_per_window: builder.factor().samples_per_window(),
            keep_states: config.keep_states.clone(),
            boundary_policy: builder.boundary_policy(),
            run_end: builder.run_end(),
            summary,
            sections,
        }
    }

    /// Compute sections and coverage for a label sequence and describe them.
    pub fn from_states<T>(
        config: &Config,
        builder: &MaskBuilder,
        states: &[T],
    ) -> Result<Self, MaskError>
    where
        T: AsRef<str>,
    {
        let keep: HashSet<&str> = config.keep_states.iter().map(String::as_str).collect();
        let labels: Vec<&str> = states.iter().map(|s| s.as_ref()).collect();

        let sections = builder.sections(&labels, &keep)?;
        let summary = MaskSummary::from_sections(
            &sections,
            labels.len(),
            builder.factor(),
            config.sampling.unit,
        )?;
        let sample_sections = sections
            .iter()
            .map(|section| section.to_samples(builder.factor()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(config, builder, summary, sample_sections))
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Errors that can occur while exporting.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown export format {0:?} (expected csv or json)")]
    UnknownFormat(String),
}

/// Write the mask as one `0`/`1` per line.
pub fn write_mask_csv<W: Write>(mask: &[bool], writer: W) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for &on in mask {
        writer.write_record([if on { "1" } else { "0" }])?;
    }
    writer.flush()?;

    Ok(())
}

/// Write a report as pretty-printed JSON.
pub fn write_report_json<W: Write>(report: &MaskReport, mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
