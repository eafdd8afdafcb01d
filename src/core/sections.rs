//! Run detection over the window-resolution mask.
//!
//! Runs of kept windows are found from the edges of the boolean mask. Edges
//! alternate rising/falling, so consecutive pairs of edges are sections.

use crate::core::expansion::ExpansionFactor;
use crate::core::mask::MaskError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::hash::Hash;

/// Where a section ends relative to the last kept window of its run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunEnd {
    /// The section stops right after the last kept window.
    #[default]
    Exact,
    /// The section also covers the window following the run (capped at the
    /// end of the sequence). Matches masks produced by older SPINDLE tooling.
    Trailing,
}

/// A contiguous run of kept windows, half-open in window units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Section {
    pub start: usize,
    pub stop: usize,
}

impl Section {
    pub fn new(start: usize, stop: usize) -> Self {
        Self { start, stop }
    }

    /// Number of windows covered.
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scale both boundaries to sample units.
    pub fn to_samples(&self, factor: ExpansionFactor) -> Result<SampleSection, MaskError> {
        Ok(SampleSection {
            start: factor.to_samples(self.start)?,
            stop: factor.to_samples(self.stop)?,
        })
    }
}

/// A section expressed in samples, half-open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleSection {
    pub start: usize,
    pub stop: usize,
}

impl SampleSection {
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Mark every label that belongs to the keep-set.
pub fn window_mask<T>(labels: &[T], keep: &HashSet<T>) -> Vec<bool>
where
    T: Eq + Hash,
{
    labels.iter().map(|label| keep.contains(label)).collect()
}

/// Positions where the mask changes value.
///
/// Each position is the index of the first window holding the new value, so
/// a rising edge is the start of a run and a falling edge is one past its end.
pub fn transitions(mask: &[bool]) -> Vec<usize> {
    mask.windows(2)
        .enumerate()
        .filter(|(_, pair)| pair[0] != pair[1])
        .map(|(i, _)| i + 1)
        .collect()
}

/// Pair edge positions into sections.
///
/// `boundaries` must alternate rising/falling starting with a rising edge,
/// which holds whenever the mask they came from starts and ends `false`.
pub fn pair_sections(
    boundaries: &[usize],
    run_end: RunEnd,
    n_windows: usize,
) -> Result<Vec<Section>, MaskError> {
    if boundaries.len() % 2 != 0 {
        return Err(MaskError::UnpairedTransitions {
            count: boundaries.len(),
        });
    }

    let sections = boundaries
        .chunks_exact(2)
        .map(|edge| {
            let stop = match run_end {
                RunEnd::Exact => edge[1],
                RunEnd::Trailing => (edge[1] + 1).min(n_windows),
            };
            Section::new(edge[0], stop)
        })
        .collect();

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keep(states: &[&'static str]) -> HashSet<&'static str> {
        states.iter().copied().collect()
    }

    #[test]
    fn test_window_mask_membership() {
        let labels = ["w", "n", "r", "n", "w"];
        assert_eq!(
            window_mask(&labels, &keep(&["n"])),
            vec![false, true, false, true, false]
        );
        assert_eq!(
            window_mask(&labels, &keep(&["n", "r"])),
            vec![false, true, true, true, false]
        );
        assert_eq!(window_mask(&labels, &keep(&[])), vec![false; 5]);
        assert_eq!(window_mask(&labels, &keep(&["a"])), vec![false; 5]);
    }

    #[test]
    fn test_transitions_are_first_index_of_new_value() {
        let mask = [false, true, true, false, false, true, false];
        assert_eq!(transitions(&mask), vec![1, 3, 5, 6]);
        assert!(transitions(&[false, false, false]).is_empty());
        assert!(transitions(&[true]).is_empty());
        assert!(transitions(&[]).is_empty());
    }

    #[test]
    fn test_pair_sections_exact() {
        let sections = pair_sections(&[1, 3, 5, 6], RunEnd::Exact, 7).unwrap();
        assert_eq!(sections, vec![Section::new(1, 3), Section::new(5, 6)]);
        assert_eq!(sections[1].len(), 1);
    }

    #[test]
    fn test_pair_sections_trailing_is_capped() {
        let sections = pair_sections(&[1, 3, 5, 7], RunEnd::Trailing, 7).unwrap();
        assert_eq!(sections, vec![Section::new(1, 4), Section::new(5, 7)]);
    }

    #[test]
    fn test_odd_boundary_count_is_an_error() {
        let err = pair_sections(&[1, 3, 5], RunEnd::Exact, 7).unwrap_err();
        assert!(matches!(err, MaskError::UnpairedTransitions { count: 3 }));
    }

    #[test]
    fn test_section_to_samples() {
        let factor = ExpansionFactor::from_samples(40).unwrap();
        let samples = Section::new(11, 16).to_samples(factor).unwrap();
        assert_eq!(samples, SampleSection { start: 440, stop: 640 });
        assert_eq!(samples.len(), 200);
        assert!(Section::new(3, 3).is_empty());
    }
}
