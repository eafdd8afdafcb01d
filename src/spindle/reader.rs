//! Reading sleep-state columns out of SPINDLE output files.
//!
//! SPINDLE writes one row per scored window. Only a single column is of
//! interest here; every other column is ignored and rows may be ragged.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Delimited-text options passed through to the CSV reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderOptions {
    /// Field delimiter (ASCII)
    pub delimiter: char,
    /// Quote character (ASCII)
    pub quote: char,
    /// Whether the first row is a header to skip
    pub has_headers: bool,
    /// Trim whitespace around fields
    pub trim: bool,
    /// Lines starting with this character are skipped (ASCII)
    pub comment: Option<char>,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            has_headers: false,
            trim: false,
            comment: None,
        }
    }
}

impl ReaderOptions {
    fn builder(&self) -> Result<csv::ReaderBuilder, SpindleError> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(ascii(self.delimiter)?)
            .quote(ascii(self.quote)?)
            .has_headers(self.has_headers)
            .flexible(true)
            .trim(if self.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            });
        if let Some(comment) = self.comment {
            builder.comment(Some(ascii(comment)?));
        }
        Ok(builder)
    }
}

/// Errors that can occur while reading a state file.
#[derive(Debug, Error)]
pub enum SpindleError {
    #[error("could not open {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line} has {width} column(s), column {column} was requested")]
    MissingColumn {
        line: u64,
        column: usize,
        width: usize,
    },

    #[error("{0:?} is not an ASCII character")]
    InvalidDelimiter(char),
}

/// Read one column of a state file, one token per row, in file order.
///
/// The file is opened, fully read and closed before returning.
pub fn read<P: AsRef<Path>>(
    path: P,
    column: usize,
    options: &ReaderOptions,
) -> Result<Vec<String>, SpindleError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SpindleError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let states = read_from(file, column, options)?;
    tracing::debug!(path = ?path, rows = states.len(), column, "read sleep states");
    Ok(states)
}

/// Read one column from any delimited source.
pub fn read_from<R: io::Read>(
    reader: R,
    column: usize,
    options: &ReaderOptions,
) -> Result<Vec<String>, SpindleError> {
    let mut reader = options.builder()?.from_reader(reader);
    let mut states = Vec::new();

    for record in reader.records() {
        let record = record?;
        let state = record.get(column).ok_or_else(|| SpindleError::MissingColumn {
            line: record.position().map_or(0, |p| p.line()),
            column,
            width: record.len(),
        })?;
        states.push(state.to_string());
    }

    Ok(states)
}

fn ascii(c: char) -> Result<u8, SpindleError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(SpindleError::InvalidDelimiter(c))
    }
}
