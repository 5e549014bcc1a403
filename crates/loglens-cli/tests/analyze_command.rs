use flate2::Compression;
use flate2::write::GzEncoder;
use loglens_core::Error;
use loglens_core::analysis::AnalysisReport;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to get path to test fixtures
fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn gzip_copy(source: &Path, target: &Path) {
    let content = fs::read(source).unwrap();
    let mut encoder = GzEncoder::new(File::create(target).unwrap(), Compression::default());
    encoder.write_all(&content).unwrap();
    encoder.finish().unwrap();
}

/// Test the banner scenario end to end on a plain log
#[test]
fn test_analyze_log_top_url() {
    // Arrange
    let fixture = fixture_path("nginx-access-ui.log-20181101");

    // Act
    let result = loglens_cli::commands::analyze::analyze_log(&fixture, 1, 60.0);

    // Assert
    assert!(result.is_ok(), "Should successfully analyze the log");

    let report: AnalysisReport = result.unwrap();
    assert_eq!(report.summary.total_lines, 6);
    assert_eq!(report.summary.parsed_lines, 6);
    assert_eq!(report.summary.error_perc, Some(0.0));
    assert_eq!(report.summary.distinct_urls, 3);

    assert_eq!(report.records.len(), 1);
    let top = &report.records[0];
    assert_eq!(top.url, "/api/v2/banner/25019354");
    assert_eq!(top.count, 3);
    assert!((top.time_sum - 1.17).abs() < 0.01);
    assert!((top.time_avg - 0.39).abs() < 0.01);
    assert!((top.time_max - 0.49).abs() < 0.01);
    assert!((top.time_med - 0.39).abs() < 0.01);
    assert!((top.count_perc - 50.0).abs() < 1.0);
    assert!((top.time_perc - 67.0).abs() < 1.0);
}

/// Test that a gzipped copy of the log gives the same report
#[test]
fn test_analyze_gzip_log_matches_plain() {
    // Arrange
    let fixture = fixture_path("nginx-access-ui.log-20181101");
    let temp_dir = TempDir::new().unwrap();
    let gz = temp_dir.path().join("nginx-access-ui.log-20181101.gz");
    gzip_copy(&fixture, &gz);

    // Act
    let plain = loglens_cli::commands::analyze::analyze_log(&fixture, 1000, 60.0).unwrap();
    let gzipped = loglens_cli::commands::analyze::analyze_log(&gz, 1000, 60.0).unwrap();

    // Assert
    assert_eq!(plain.summary, gzipped.summary);
    assert_eq!(plain.records, gzipped.records);
    assert_eq!(gzipped.records.len(), 3);
}

/// Test that counts add up when the report holds every url
#[test]
fn test_analyze_counts_cover_all_parsed_lines() {
    let fixture = fixture_path("nginx-access-ui.log-20181101");

    let report = loglens_cli::commands::analyze::analyze_log(&fixture, 1000, 60.0).unwrap();

    let counted: u64 = report.records.iter().map(|r| r.count).sum();
    assert_eq!(counted, report.summary.parsed_lines);
}

/// Test that a mostly broken log is rejected with the ratio attached
#[test]
fn test_analyze_rejects_mostly_broken_log() {
    // Arrange - 2 parsable lines out of 10
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.log");
    let good = fs::read_to_string(fixture_path("nginx-access-ui.log-20181101")).unwrap();
    let mut content: String = good.lines().take(2).map(|l| format!("{}\n", l)).collect();
    for i in 0..8 {
        content.push_str(&format!("log format changed {}\n", i));
    }
    fs::write(&path, content).unwrap();

    // Act
    let strict = loglens_cli::commands::analyze::analyze_log(&path, 1000, 60.0);
    let lenient = loglens_cli::commands::analyze::analyze_log(&path, 1000, 90.0);

    // Assert
    let err = strict.expect_err("80% unparsable lines should be fatal at 60%");
    match err.downcast_ref::<Error>() {
        Some(Error::FatalParseRatio {
            total_lines,
            parsed_lines,
            ..
        }) => {
            assert_eq!(*total_lines, 10);
            assert_eq!(*parsed_lines, 2);
        }
        other => panic!("expected FatalParseRatio, got {:?}", other),
    }

    let report = lenient.expect("80% unparsable lines are tolerated at 90%");
    assert_eq!(report.records.len(), 2);
}

/// Test that an empty log yields an empty report
#[test]
fn test_analyze_empty_log() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.log");
    fs::write(&path, "").unwrap();

    let report = loglens_cli::commands::analyze::analyze_log(&path, 1000, 60.0).unwrap();

    assert!(report.records.is_empty());
    assert_eq!(report.summary.total_lines, 0);
    assert_eq!(report.summary.error_perc, None);
}

/// Test that a missing file is reported as an error
#[test]
fn test_analyze_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let result =
        loglens_cli::commands::analyze::analyze_log(&temp_dir.path().join("nope.log"), 10, 60.0);
    assert!(result.is_err());
}

/// Test that an out-of-range ceiling is refused instead of disabling the check
#[test]
fn test_analyze_rejects_out_of_range_ceiling() {
    // Arrange - nothing in this log parses
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("garbage.log");
    fs::write(&path, "one\ntwo\nthree\n").unwrap();

    for ceiling in [0.0, 150.0] {
        // Act
        let result = loglens_cli::commands::analyze::analyze_log(&path, 10, ceiling);

        // Assert
        let err = result.expect_err("ceiling outside (0, 100] must be refused");
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::InvalidConfig(_))
        ));
    }
}
