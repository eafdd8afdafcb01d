//! Somnum - sample-resolution masks from windowed sleep-state annotations.
//!
//! Sleep scorers such as SPINDLE emit one categorical state per fixed-duration
//! window (wake, NREM, REM, artefact...). Downstream signal processing works
//! per sample. This crate turns the former into a boolean mask over the
//! latter, selecting only the samples whose window was scored as one of a
//! chosen set of states.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                            Somnum                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐         │
//! │  │   SPINDLE   │──▶│  Sections   │──▶│    Mask     │         │
//! │  │ state file  │   │ (window idx)│   │ (sample idx)│         │
//! │  └─────────────┘   └─────────────┘   └─────────────┘         │
//! │                           │                 │                │
//! │                           ▼                 ▼                │
//! │                    ┌─────────────┐   ┌─────────────┐         │
//! │                    │   Summary   │──▶│   Export    │         │
//! │                    └─────────────┘   └─────────────┘         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use std::collections::HashSet;
//! use somnum::build_mask;
//!
//! // One state per window, 1 window per second, sampled at 1 Hz
//! let states = ["w", "r", "r", "w"];
//! let keep: HashSet<&str> = HashSet::from(["r"]);
//!
//! let mask = build_mask(&states, &keep, 1.0, 1.0).unwrap();
//! assert_eq!(mask, vec![false, true, true, false]);
//! ```

pub mod config;
pub mod core;
pub mod export;
pub mod spindle;

// Re-export key types at crate root for convenience
pub use config::{parse_states, Config, ConfigError, SamplingConfig};
pub use core::{
    build_mask, BoundaryPolicy, ExpansionFactor, MaskBuilder, MaskError, MaskSummary, RunEnd,
    SampleSection, Section,
};
pub use export::{write_mask_csv, write_report_json, ExportError, ExportFormat, MaskReport};
pub use spindle::{ReaderOptions, SpindleError};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
