//! Aggregate statistics over a computed mask.

use crate::core::expansion::ExpansionFactor;
use crate::core::mask::MaskError;
use crate::core::sections::Section;
use serde::{Deserialize, Serialize};

/// Coverage figures for one mask.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaskSummary {
    /// Number of labelled windows
    pub window_count: usize,
    /// Windows covered by a section
    pub kept_windows: usize,
    /// Number of sections
    pub section_count: usize,
    /// Length of the longest section, in windows
    pub longest_section: usize,
    /// Length of the output mask
    pub sample_count: usize,
    /// Samples set in the output mask
    pub kept_samples: usize,
    /// Share of samples kept (0-1)
    pub kept_fraction: f64,
    /// Time covered by kept windows, in the unit of `unit`
    pub kept_duration: f64,
}

impl MaskSummary {
    /// Summarise the sections of a sequence of `n_windows` labels.
    pub fn from_sections(
        sections: &[Section],
        n_windows: usize,
        factor: ExpansionFactor,
        unit: f64,
    ) -> Result<Self, MaskError> {
        let kept_windows: usize = sections.iter().map(Section::len).sum();
        let sample_count = factor.to_samples(n_windows)?;
        let kept_samples = factor.to_samples(kept_windows)?;

        let kept_fraction = if sample_count > 0 {
            kept_samples as f64 / sample_count as f64
        } else {
            0.0
        };

        Ok(Self {
            window_count: n_windows,
            kept_windows,
            section_count: sections.len(),
            longest_section: sections.iter().map(Section::len).max().unwrap_or(0),
            sample_count,
            kept_samples,
            kept_fraction,
            kept_duration: kept_windows as f64 * unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts() {
        let sections = [Section::new(2, 4), Section::new(6, 9)];
        let factor = ExpansionFactor::from_samples(40).unwrap();
        let summary = MaskSummary::from_sections(&sections, 10, factor, 4.0).unwrap();

        assert_eq!(summary.window_count, 10);
        assert_eq!(summary.kept_windows, 5);
        assert_eq!(summary.section_count, 2);
        assert_eq!(summary.longest_section, 3);
        assert_eq!(summary.sample_count, 400);
        assert_eq!(summary.kept_samples, 200);
        assert!((summary.kept_fraction - 0.5).abs() < 1e-12);
        assert!((summary.kept_duration - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_without_sections() {
        let factor = ExpansionFactor::from_samples(1).unwrap();
        let summary = MaskSummary::from_sections(&[], 4, factor, 30.0).unwrap();
        assert_eq!(summary.kept_samples, 0);
        assert_eq!(summary.longest_section, 0);
        assert_eq!(summary.kept_fraction, 0.0);
    }
}
