//! Window-resolution labels to sample-resolution selection mask.
//!
//! The pipeline is:
//! 1. membership test of every label against the keep-set
//! 2. boundary handling (see [`BoundaryPolicy`])
//! 3. edge detection and pairing into [`Section`]s
//! 4. scaling each section by the [`ExpansionFactor`] and filling the output

use crate::core::expansion::ExpansionFactor;
use crate::core::sections::{
    pair_sections, transitions, window_mask, RunEnd, SampleSection, Section,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;
use thiserror::Error;

/// Minimum number of windows a label sequence must contain.
pub const MIN_WINDOWS: usize = 2;

/// Errors raised while building a mask.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MaskError {
    #[error("label sequence has {len} window(s), at least 2 are required")]
    TooFewWindows { len: usize },

    #[error("found {count} transitions in the window mask, expected an even number")]
    UnpairedTransitions { count: usize },

    #[error("{name} must be a finite positive number, got {value}")]
    InvalidSampling { name: &'static str, value: f64 },

    #[error("fs ({fs}) * unit ({unit}) = {product} is not a whole number of samples per window")]
    NonIntegralExpansion { fs: f64, unit: f64, product: f64 },

    #[error("fs ({fs}) * unit ({unit}) = {product} samples per window is too large")]
    FactorTooLarge { fs: f64, unit: f64, product: f64 },

    #[error("{windows} windows of {samples_per_window} samples do not fit in memory")]
    OutputTooLarge { windows: usize, samples_per_window: usize },
}

/// How runs touching the first or last window are treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// The first and last windows are always unselected. A run starting at
    /// window 0 loses that window; a run that is only the first or last
    /// window disappears entirely.
    #[default]
    ForceFalse,
    /// The sequence is treated as if bordered by unselected windows, so runs
    /// touching either end are kept whole.
    Preserve,
}

/// Builds sample-resolution masks for a fixed sampling configuration.
///
/// The builder holds no per-call state; one instance can serve any number of
/// label sequences, from any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskBuilder {
    factor: ExpansionFactor,
    boundary: BoundaryPolicy,
    run_end: RunEnd,
}

impl MaskBuilder {
    /// Create a builder for signals sampled at `fs` with one label per `unit`.
    pub fn new(fs: f64, unit: f64) -> Result<Self, MaskError> {
        Ok(Self::with_factor(ExpansionFactor::new(fs, unit)?))
    }

    /// Create a builder from an already validated factor.
    pub fn with_factor(factor: ExpansionFactor) -> Self {
        Self {
            factor,
            boundary: BoundaryPolicy::default(),
            run_end: RunEnd::default(),
        }
    }

    pub fn with_boundary_policy(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_run_end(mut self, run_end: RunEnd) -> Self {
        self.run_end = run_end;
        self
    }

    pub fn factor(&self) -> ExpansionFactor {
        self.factor
    }

    pub fn boundary_policy(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn run_end(&self) -> RunEnd {
        self.run_end
    }

    /// Runs of kept labels, in window units.
    pub fn sections<T>(&self, labels: &[T], keep: &HashSet<T>) -> Result<Vec<Section>, MaskError>
    where
        T: Eq + Hash,
    {
        let n_windows = labels.len();
        if n_windows < MIN_WINDOWS {
            return Err(MaskError::TooFewWindows { len: n_windows });
        }
        if keep.is_empty() {
            tracing::warn!("empty keep-set, every sample will be masked out");
        }

        let mut mask = window_mask(labels, keep);
        let boundaries = match self.boundary {
            BoundaryPolicy::ForceFalse => {
                mask[0] = false;
                mask[n_windows - 1] = false;
                transitions(&mask)
            }
            BoundaryPolicy::Preserve => {
                let mut padded = Vec::with_capacity(n_windows + 2);
                padded.push(false);
                padded.extend_from_slice(&mask);
                padded.push(false);
                // Shift back from padded coordinates
                transitions(&padded).into_iter().map(|b| b - 1).collect()
            }
        };

        let sections = pair_sections(&boundaries, self.run_end, n_windows)?;
        tracing::debug!(
            windows = n_windows,
            sections = sections.len(),
            "detected runs of kept states"
        );
        Ok(sections)
    }

    /// Runs of kept labels, in sample units.
    pub fn sample_sections<T>(
        &self,
        labels: &[T],
        keep: &HashSet<T>,
    ) -> Result<Vec<SampleSection>, MaskError>
    where
        T: Eq + Hash,
    {
        self.sections(labels, keep)?
            .iter()
            .map(|section| section.to_samples(self.factor))
            .collect()
    }

    /// Build the per-sample mask, `labels.len() * fs * unit` entries long.
    pub fn build<T>(&self, labels: &[T], keep: &HashSet<T>) -> Result<Vec<bool>, MaskError>
    where
        T: Eq + Hash,
    {
        let sections = self.sample_sections(labels, keep)?;
        let len = self.factor.to_samples(labels.len())?;

        let mut mask = vec![false; len];
        for section in &sections {
            mask[section.start..section.stop].fill(true);
        }

        tracing::debug!(
            samples = len,
            samples_per_window = self.factor.samples_per_window(),
            "built sample mask"
        );
        Ok(mask)
    }
}

/// Build a sample-resolution mask with the default policies.
///
/// Equivalent to `MaskBuilder::new(fs, unit)?.build(labels, keep)`. Masks
/// from the legacy `as_mask` routine also cover the window after each run;
/// reproduce those with [`RunEnd::Trailing`].
pub fn build_mask<T>(
    labels: &[T],
    keep: &HashSet<T>,
    fs: f64,
    unit: f64,
) -> Result<Vec<bool>, MaskError>
where
    T: Eq + Hash,
{
    MaskBuilder::new(fs, unit)?.build(labels, keep)
}
