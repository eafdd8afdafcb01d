//! Core mask construction.
//!
//! This module contains:
//! - Validation of the window-to-sample expansion factor
//! - Run detection over the window mask
//! - The mask builder itself
//! - Coverage summaries of a built mask

pub mod expansion;
pub mod mask;
pub mod sections;
pub mod summary;

// Re-export commonly used types
pub use expansion::ExpansionFactor;
pub use mask::{build_mask, BoundaryPolicy, MaskBuilder, MaskError, MIN_WINDOWS};
pub use sections::{RunEnd, SampleSection, Section};
pub use summary::MaskSummary;
