//! Integration tests for the accelerometer conditioning pipeline.
//!
//! These tests drive the pipeline file to file and check the written table.

use accel_processing::utils::column_to_f64;
use accel_processing::{
    ConditioningConfig, Pipeline, PipelineStage, ProcessingError, ScalingPolicy, load_csv,
};
use polars::prelude::*;
use pretty_assertions::assert_eq;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write input CSV");
    path
}

/// `rows` samples at 50 Hz with a slow 1 Hz component on every axis, plus
/// an optional 20 Hz ripple of amplitude `ripple` on X and Y.
fn sinusoid_csv(rows: usize, ripple: f64) -> String {
    let mut csv = String::from("Accel_X,Accel_Y,Accel_Z,activity\n");
    for i in 0..rows {
        let t = i as f64 / 50.0;
        let jitter = ripple * (2.0 * PI * 20.0 * t).sin();
        csv.push_str(&format!(
            "{:.6},{:.6},{:.6},walking\n",
            (2.0 * PI * t).sin() + jitter,
            0.5 * (2.0 * PI * t).cos() + jitter,
            9.81 + 0.1 * (2.0 * PI * t).sin()
        ));
    }
    csv
}

fn run_default(input: &Path, output: &Path) -> accel_processing::ProcessingResult<DataFrame> {
    Pipeline::builder()
        .build()?
        .run(input, output)
        .map(|result| result.data)
}

fn read_output(path: &Path) -> DataFrame {
    load_csv(path).expect("Failed to read output CSV")
}

fn diff_variance(values: &[f64]) -> f64 {
    let deltas: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = deltas.iter().sum::<f64>() / deltas.len() as f64;
    deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / deltas.len() as f64
}

fn min_max_scaled(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    values.iter().map(|v| (v - min) / (max - min)).collect()
}

fn variance(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

const FILTERED: [&str; 3] = ["Accel_X_filtered", "Accel_Y_filtered", "Accel_Z_filtered"];

// ============================================================================
// Output Shape Tests
// ============================================================================

#[test]
fn test_fixture_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed.csv");

    let result = Pipeline::builder()
        .build()
        .unwrap()
        .run(fixtures_path().join("walking_running.csv"), &output)
        .unwrap();

    assert_eq!(result.summary.cleaning.rows_before, 200);
    assert_eq!(result.summary.cleaning.rows_dropped, 2);
    assert_eq!(result.summary.rows_written, 198);
    assert_eq!(
        result.summary.cleaning.missing_per_column.get("Accel_Y"),
        Some(&2)
    );

    let df = read_output(&output);
    assert_eq!(df.height(), 198);
    assert_eq!(
        df.get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect::<Vec<_>>(),
        vec![
            "timestamp",
            "Accel_X",
            "Accel_Y",
            "Accel_Z",
            "activity",
            "Accel_X_filtered",
            "Accel_Y_filtered",
            "Accel_Z_filtered",
            "motion_intensity",
        ]
    );
}

#[test]
fn test_passthrough_columns_preserved() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed.csv");
    run_default(&fixtures_path().join("walking_running.csv"), &output).unwrap();

    let df = read_output(&output);
    let activity = df.column("activity").unwrap();
    let activity = activity.as_materialized_series().str().unwrap();
    assert_eq!(activity.get(0), Some("walking"));
    assert_eq!(activity.get(df.height() - 1), Some("running"));

    let raw_x = column_to_f64(&df, "Accel_X").unwrap();
    assert!((raw_x[1] - 0.410650).abs() < 1e-9);
}

#[test]
fn test_missing_value_row_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = sinusoid_csv(50, 0.0);
    // Blank out Accel_Y on the 11th data row
    let lines: Vec<String> = csv
        .lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 11 {
                let mut fields: Vec<&str> = line.split(',').collect();
                fields[1] = "";
                fields.join(",")
            } else {
                line.to_string()
            }
        })
        .collect();
    csv = lines.join("\n") + "\n";

    let input = write_input(dir.path(), "raw.csv", &csv);
    let output = dir.path().join("out.csv");
    let df = run_default(&input, &output).unwrap();

    assert_eq!(df.height(), 49);
    assert_eq!(read_output(&output).height(), 49);
}

// ============================================================================
// Value Invariant Tests
// ============================================================================

#[test]
fn test_filtered_columns_in_unit_range() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed.csv");
    run_default(&fixtures_path().join("walking_running.csv"), &output).unwrap();

    let df = read_output(&output);
    for name in FILTERED {
        let values = column_to_f64(&df, name).unwrap();
        assert!(
            values.iter().all(|v| (0.0..=1.0).contains(v)),
            "{name} has values outside [0, 1]"
        );
    }
}

#[test]
fn test_motion_intensity_derivation() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed.csv");
    let df = run_default(&fixtures_path().join("walking_running.csv"), &output).unwrap();

    let x = column_to_f64(&df, FILTERED[0]).unwrap();
    let y = column_to_f64(&df, FILTERED[1]).unwrap();
    let z = column_to_f64(&df, FILTERED[2]).unwrap();
    let intensity = column_to_f64(&df, "motion_intensity").unwrap();

    for i in 0..df.height() {
        let expected = (x[i].powi(2) + y[i].powi(2) + z[i].powi(2)).sqrt();
        assert!(intensity[i] >= 0.0);
        assert!(
            (intensity[i] - expected).abs() < 1e-9,
            "row {i}: {} != {expected}",
            intensity[i]
        );
    }
}

#[test]
fn test_sinusoid_is_smoothed() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed.csv");
    let df = run_default(&fixtures_path().join("walking_running.csv"), &output).unwrap();

    // Roughness relative to spread: high-frequency noise dominates the raw
    // deltas but is removed by the low-pass.
    for (raw, filtered) in ["Accel_X", "Accel_Y"].iter().zip(FILTERED) {
        let raw = column_to_f64(&df, raw).unwrap();
        let filtered = column_to_f64(&df, filtered).unwrap();
        let raw_roughness = diff_variance(&raw) / variance(&raw);
        let filtered_roughness = diff_variance(&filtered) / variance(&filtered);
        assert!(
            filtered_roughness < raw_roughness,
            "{filtered_roughness} >= {raw_roughness}"
        );
    }
}

#[test]
fn test_sinusoid_keeps_shape_and_loses_ripple() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "raw.csv", &sinusoid_csv(200, 0.05));
    let output = dir.path().join("out.csv");

    let config = ConditioningConfig::builder()
        .scaling(ScalingPolicy::PerAxis)
        .build()
        .unwrap();
    let df = Pipeline::builder()
        .config(config)
        .build()
        .unwrap()
        .run(&input, &output)
        .unwrap()
        .data;

    assert_eq!(df.height(), 200);
    assert_eq!(read_output(&output).height(), 200);

    // A 1 Hz sine is well inside the passband: after per-axis scaling it
    // should match the clean sine scaled the same way.
    let x = column_to_f64(&df, FILTERED[0]).unwrap();
    for (i, value) in x.iter().enumerate() {
        let t = i as f64 / 50.0;
        let expected = ((2.0 * PI * t).sin() + 1.0) / 2.0;
        assert!((value - expected).abs() < 0.02, "row {i}: {value} vs {expected}");
    }

    for name in FILTERED {
        let values = column_to_f64(&df, name).unwrap();
        assert!(values.iter().all(|v| (0.0..=1.0).contains(v)), "{name}");
    }

    // Frame-to-frame deltas of the rippled axes, compared on the same
    // [0, 1] scale.
    for (raw, filtered) in ["Accel_X", "Accel_Y"].iter().zip(FILTERED) {
        let raw_deltas = diff_variance(&min_max_scaled(&column_to_f64(&df, raw).unwrap()));
        let filtered_deltas = diff_variance(&column_to_f64(&df, filtered).unwrap());
        assert!(
            filtered_deltas < raw_deltas,
            "{raw}: {filtered_deltas} >= {raw_deltas}"
        );
    }
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixtures_path().join("walking_running.csv");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    run_default(&input, &first).unwrap();
    run_default(&input, &second).unwrap();

    assert_eq!(
        std::fs::read(&first).unwrap(),
        std::fs::read(&second).unwrap()
    );
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_all_zero_axes_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = String::from("Accel_X,Accel_Y,Accel_Z\n");
    for _ in 0..40 {
        csv.push_str("0.0,0.0,0.0\n");
    }
    let input = write_input(dir.path(), "zeros.csv", &csv);
    let output = dir.path().join("out.csv");

    let err = run_default(&input, &output).unwrap_err();
    assert!(matches!(err.root(), ProcessingError::Normalization(_)));
    assert!(!output.exists());
}

#[test]
fn test_too_few_rows_fail_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "short.csv", &sinusoid_csv(3, 0.0));
    let output = dir.path().join("out.csv");

    let err = run_default(&input, &output).unwrap_err();
    assert!(matches!(
        err.root(),
        ProcessingError::InsufficientData { rows: 3, .. }
    ));
    assert!(!output.exists());
}

#[test]
fn test_infinite_axis_value_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv: String = sinusoid_csv(40, 0.0)
        .lines()
        .enumerate()
        .map(|(i, line)| {
            // Data row 20 (header is line 0)
            if i == 21 {
                "inf,0.5,9.8,walking\n".to_string()
            } else {
                format!("{line}\n")
            }
        })
        .collect();
    let input = write_input(dir.path(), "inf.csv", &csv);
    let output = dir.path().join("out.csv");

    let err = run_default(&input, &output).unwrap_err();
    assert!(matches!(
        err.root(),
        ProcessingError::Parse { input, reason }
            if input.contains("Accel_X") && reason.contains("row 20")
    ));
    assert!(!output.exists());
}

#[test]
fn test_missing_axis_column() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "no_z.csv", "Accel_X,Accel_Y\n1.0,2.0\n");
    let output = dir.path().join("out.csv");

    let err = run_default(&input, &output).unwrap_err();
    assert!(matches!(err.root(), ProcessingError::MissingColumn(c) if c == "Accel_Z"));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_default(&dir.path().join("absent.csv"), &dir.path().join("out.csv"))
        .unwrap_err();

    assert_eq!(err.error_code(), "PARSE_ERROR");
    assert!(err.to_string().starts_with("Loading"));
}

#[test]
fn test_failure_reports_failed_stage() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), "short.csv", &sinusoid_csv(3, 0.0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let result = Pipeline::builder()
        .on_progress(move |update| sink.lock().unwrap().push(update.stage))
        .build()
        .unwrap()
        .run(&input, dir.path().join("out.csv"));

    assert!(result.is_err());
    let stages = seen.lock().unwrap();
    assert_eq!(stages.first(), Some(&PipelineStage::Loading));
    assert_eq!(stages.last(), Some(&PipelineStage::Failed));
    assert!(!stages.contains(&PipelineStage::Writing));
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summary_serializes_to_json() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("processed.csv");
    let result = Pipeline::builder()
        .build()
        .unwrap()
        .run(fixtures_path().join("walking_running.csv"), &output)
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(&result.summary).unwrap();
    assert_eq!(json["rows_written"], 198);
    assert_eq!(json["scaling_policy"], "joint");
    assert_eq!(json["filter"]["order"], 4);
    assert_eq!(json["filter"]["b"].as_array().unwrap().len(), 5);
    assert!(json["output_file"].as_str().unwrap().ends_with("processed.csv"));
}
