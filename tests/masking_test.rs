//! Integration tests for mask generation from SPINDLE state files

use somnum::{
    build_mask, spindle, write_mask_csv, BoundaryPolicy, Config, MaskBuilder, MaskReport,
    ReaderOptions, RunEnd,
};
use std::collections::HashSet;
use std::ops::Range;
use std::path::PathBuf;

const FS: f64 = 10.0;
const UNIT: f64 = 4.0;
const SAMPLES_PER_WINDOW: usize = 40;

/// 100 windows of wake with REM and NREM runs at fixed positions.
fn scored_night() -> (Vec<(&'static str, Range<usize>)>, Vec<String>) {
    let sections = vec![
        ("r", 11..16),
        ("r", 30..44),
        ("n", 66..67),
        ("n", 90..94),
    ];

    let mut states = vec!["w".to_string(); 100];
    for (state, range) in &sections {
        for window in range.clone() {
            states[window] = state.to_string();
        }
    }

    (sections, states)
}

fn keep(states: &[&str]) -> HashSet<String> {
    states.iter().map(|s| s.to_string()).collect()
}

fn expected_mask(
    sections: &[(&str, Range<usize>)],
    kept: &[&str],
    extra_windows: usize,
) -> Vec<bool> {
    let mut expected = vec![false; 100 * SAMPLES_PER_WINDOW];
    for (state, range) in sections {
        if kept.contains(state) {
            let start = range.start * SAMPLES_PER_WINDOW;
            let stop = (range.end + extra_windows) * SAMPLES_PER_WINDOW;
            expected[start..stop].fill(true);
        }
    }
    expected
}

fn test_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("somnum-integration-test");
    std::fs::create_dir_all(&dir).expect("Failed to create test dir");
    dir
}

#[test]
fn test_mask_covers_exact_runs() {
    let (sections, states) = scored_night();

    for kept in [vec!["r"], vec!["n"], vec!["r", "n"]] {
        let mask = build_mask(&states, &keep(&kept), FS, UNIT).unwrap();
        assert_eq!(mask, expected_mask(&sections, &kept, 0), "keep {kept:?}");
    }
}

#[test]
fn test_trailing_window_matches_legacy_masks() {
    // Older tooling covered [start, stop + 1) windows for a run start..stop
    let (sections, states) = scored_night();
    let builder = MaskBuilder::new(FS, UNIT)
        .unwrap()
        .with_run_end(RunEnd::Trailing);

    for kept in [vec!["r"], vec!["n"], vec!["r", "n"]] {
        let mask = builder.build(&states, &keep(&kept)).unwrap();
        assert_eq!(mask, expected_mask(&sections, &kept, 1), "keep {kept:?}");
    }
}

#[test]
fn test_boundary_runs_depend_on_policy() {
    let mut states = vec!["w".to_string(); 20];
    for window in (0..3).chain(10..12).chain(19..20) {
        states[window] = "n".to_string();
    }
    let kept = keep(&["n"]);

    let forced = MaskBuilder::new(1.0, 1.0).unwrap();
    assert_eq!(
        forced.sections(&states, &kept).unwrap(),
        vec![somnum::Section::new(1, 3), somnum::Section::new(10, 12)]
    );

    let preserved = forced.with_boundary_policy(BoundaryPolicy::Preserve);
    assert_eq!(
        preserved.sections(&states, &kept).unwrap(),
        vec![
            somnum::Section::new(0, 3),
            somnum::Section::new(10, 12),
            somnum::Section::new(19, 20),
        ]
    );

    let mask = preserved.build(&states, &kept).unwrap();
    assert!(mask[0] && mask[19]);
}

#[test]
fn test_state_file_to_mask_file() {
    let dir = test_dir();
    let input = dir.join("night.csv");
    let output = dir.join("night_mask.csv");

    let rows: Vec<String> = ["w", "w", "n", "n", "n", "w", "r", "w"]
        .iter()
        .enumerate()
        .map(|(i, state)| format!("{},{state},0.9", i * 4))
        .collect();
    std::fs::write(&input, rows.join("\n")).unwrap();

    let states = spindle::read(&input, 1, &ReaderOptions::default()).unwrap();
    assert_eq!(states.len(), 8);

    let mask = MaskBuilder::new(0.5, 4.0)
        .unwrap()
        .build(&states, &keep(&["n", "r"]))
        .unwrap();
    assert_eq!(mask.len(), 16);

    let file = std::fs::File::create(&output).unwrap();
    write_mask_csv(&mask, file).unwrap();

    let written = std::fs::read_to_string(&output).unwrap();
    let values: Vec<&str> = written.lines().collect();
    assert_eq!(
        values,
        vec!["0", "0", "0", "0", "1", "1", "1", "1", "1", "1", "0", "0", "1", "1", "0", "0"]
    );

    let _ = std::fs::remove_file(&input);
    let _ = std::fs::remove_file(&output);
}

#[test]
fn test_report_from_config() {
    let (_, states) = scored_night();

    let mut config = Config::default();
    config.sampling.fs = FS;
    config.sampling.unit = UNIT;
    config.keep_states = vec!["r".to_string()];

    let builder = config.mask_builder().unwrap();
    let report = MaskReport::from_states(&config, &builder, &states).unwrap();

    assert_eq!(report.samples_per_window, SAMPLES_PER_WINDOW);
    assert_eq!(report.summary.section_count, 2);
    assert_eq!(report.summary.kept_windows, 5 + 14);
    assert_eq!(report.summary.longest_section, 14);
    assert_eq!(report.summary.sample_count, 4000);
    assert_eq!(report.sections[0].start, 440);
    assert_eq!(report.sections[1].stop, 1760);
    assert!((report.summary.kept_duration - 76.0).abs() < 1e-9);

    let mask = builder.build(&states, &config.keep_set()).unwrap();
    let kept = mask.iter().filter(|&&on| on).count();
    assert_eq!(kept, report.summary.kept_samples);
}
