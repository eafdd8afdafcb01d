//! Conversion between window resolution and sample resolution.
//!
//! Each label covers `unit` time and the signal is sampled at `fs`, so one
//! window spans `fs * unit` samples. The product is validated once here and
//! carried around as an integer from then on.

use crate::core::mask::MaskError;
use serde::{Deserialize, Serialize};

/// Relative tolerance used when deciding whether `fs * unit` is integral.
pub const INTEGRAL_TOLERANCE: f64 = 1e-9;

/// Number of samples covered by a single window. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ExpansionFactor(usize);

impl ExpansionFactor {
    /// Derive the factor from a sampling rate and a window duration.
    ///
    /// Both values must be finite and positive, and their product must be a
    /// whole number of samples (up to [`INTEGRAL_TOLERANCE`]). Products such as
    /// `0.1 * 30.0` that land a rounding error away from an integer are accepted.
    pub fn new(fs: f64, unit: f64) -> Result<Self, MaskError> {
        check_positive("fs", fs)?;
        check_positive("unit", unit)?;

        let product = fs * unit;
        let rounded = product.round();
        let drift = (product - rounded).abs();

        if rounded < 1.0 || drift > INTEGRAL_TOLERANCE * rounded.max(1.0) {
            return Err(MaskError::NonIntegralExpansion { fs, unit, product });
        }
        if rounded >= usize::MAX as f64 {
            return Err(MaskError::FactorTooLarge { fs, unit, product });
        }

        Ok(Self(rounded as usize))
    }

    /// Build a factor directly from a sample count.
    pub fn from_samples(samples_per_window: usize) -> Result<Self, MaskError> {
        if samples_per_window == 0 {
            return Err(MaskError::InvalidSampling {
                name: "samples_per_window",
                value: 0.0,
            });
        }
        Ok(Self(samples_per_window))
    }

    /// Samples per window.
    pub fn samples_per_window(self) -> usize {
        self.0
    }

    /// Convert a window index (or count) into a sample index (or count).
    pub fn to_samples(self, windows: usize) -> Result<usize, MaskError> {
        windows
            .checked_mul(self.0)
            .ok_or(MaskError::OutputTooLarge {
                windows,
                samples_per_window: self.0,
            })
    }
}

impl TryFrom<usize> for ExpansionFactor {
    type Error = MaskError;

    fn try_from(samples_per_window: usize) -> Result<Self, Self::Error> {
        Self::from_samples(samples_per_window)
    }
}

impl From<ExpansionFactor> for usize {
    fn from(factor: ExpansionFactor) -> Self {
        factor.0
    }
}

fn check_positive(name: &'static str, value: f64) -> Result<(), MaskError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MaskError::InvalidSampling { name, value })
    }
}
