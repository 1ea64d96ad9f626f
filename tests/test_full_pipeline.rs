//! Integration test: SOH pipeline end-to-end

use cellhealth::pipeline::{self, PipelineConfig, PLOT_FILE, REPORT_FILE, SOH_FILE};
use cellhealth::report::Report;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// 10 cells with an exact linear law: SOH = 0.02 * U1 + 0.5, all other
/// probes held at a constant reading.
fn write_synthetic_dataset(dir: &Path) -> PathBuf {
    let mut header: Vec<String> = (1..=21).map(|i| format!("U{i}")).collect();
    header.push("SOH".to_string());

    let path = dir.join("pack.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "{}", header.join(",")).unwrap();
    for i in 0..10 {
        let u1 = (i + 1) as f64;
        let soh = 0.02 * u1 + 0.5;
        let mut row = vec![format!("{u1}")];
        row.extend((2..=21).map(|_| "3.30".to_string()));
        row.push(format!("{soh}"));
        writeln!(file, "{}", row.join(",")).unwrap();
    }
    path
}

#[test]
fn test_end_to_end_known_linear_relationship() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_synthetic_dataset(dir.path());
    let out = dir.path().join("artifacts");

    let config = PipelineConfig::new(&data)
        .with_eval_fraction(0.2)
        .with_seed(42)
        .with_threshold(0.6)
        .with_output_dir(&out);

    let report = pipeline::run(&config).unwrap();

    // Exact linear data: near-perfect fit on the held-out rows.
    assert!(
        (report.metrics.r2 - 1.0).abs() < 1e-6,
        "R² = {}",
        report.metrics.r2
    );
    assert!(report.metrics.mse < 1e-9);
    assert!(report.metrics.mae < 1e-6);

    // U1 carries all the signal; zero-weight probes keep their probe order.
    let ranked: Vec<&String> = report.feature_importance.keys().collect();
    assert_eq!(ranked[0], "U1");
    assert_eq!(ranked[1], "U2");
    assert!((report.feature_importance["U1"] - 0.02).abs() < 1e-4);

    // 2 of 10 rows held out, every one tallied.
    assert_eq!(report.cells.len(), 2);
    assert_eq!(
        report.metrics.pass_count + report.metrics.fail_count,
        report.cells.len()
    );
}

#[test]
fn test_artifacts_written_and_readable() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_synthetic_dataset(dir.path());
    let out = dir.path().join("artifacts");

    let config = PipelineConfig::new(&data).with_output_dir(&out);
    let report = pipeline::run(&config).unwrap();

    // Report artifact round-trips to the identical value.
    let loaded = Report::read(&out.join(REPORT_FILE)).unwrap();
    assert_eq!(loaded, report);

    // Plot artifact is a standalone SVG with one mark per evaluation cell.
    let svg = std::fs::read_to_string(out.join(PLOT_FILE)).unwrap();
    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<circle").count(), report.cells.len());

    // Scalar summary matches the report's average predicted SOH.
    let soh_text = std::fs::read_to_string(out.join(SOH_FILE)).unwrap();
    let soh: f64 = soh_text.trim().parse().unwrap();
    assert!((soh - report.metrics.avg_soh).abs() < 1e-6);
}

#[test]
fn test_repeated_runs_are_identical() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_synthetic_dataset(dir.path());

    let config = PipelineConfig::new(&data).with_seed(42);
    let first = pipeline::run(&config).unwrap();
    let second = pipeline::run(&config).unwrap();

    assert_eq!(first.metrics, second.metrics);
    assert_eq!(first.cells, second.cells);
    assert_eq!(first.feature_importance, second.feature_importance);
}

#[test]
fn test_failed_run_leaves_no_artifacts() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("broken.csv");
    let mut file = File::create(&path).unwrap();
    writeln!(file, "U1,U2,SOH").unwrap();
    writeln!(file, "3.1,3.2,0.9").unwrap();

    let out = dir.path().join("artifacts");
    let config = PipelineConfig::new(&path).with_output_dir(&out);

    assert!(pipeline::run(&config).is_err());
    assert!(!out.exists(), "no artifact directory after a failed run");
}

#[test]
fn test_threshold_splits_pass_and_fail() {
    let dir = tempfile::tempdir().unwrap();
    let data = write_synthetic_dataset(dir.path());

    // SOH spans 0.52..=0.70; a 0.6 threshold produces both labels across
    // the full dataset, and whatever lands in evaluation is tallied.
    let config = PipelineConfig::new(&data).with_threshold(0.6);
    let report = pipeline::run(&config).unwrap();

    for cell in &report.cells {
        let expect_fail = cell.predicted_soh < 0.6;
        let failed = cell.status == cellhealth::classification::CellStatus::Fail;
        assert_eq!(failed, expect_fail);
    }
    assert_eq!(report.metrics.threshold, 0.6);
}
