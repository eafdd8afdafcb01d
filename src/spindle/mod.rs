//! Sleep-state annotations produced by SPINDLE.
//!
//! The mask builder only needs an ordered list of state tokens; this module
//! supplies it from delimited files.

pub mod reader;

pub use reader::{read, read_from, ReaderOptions, SpindleError};
