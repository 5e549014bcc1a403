use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(deprecated)]
fn get_loglens_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("loglens")
}

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

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_analyze_json_output() {
    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("analyze")
        .arg(fixture_path("nginx-access-ui.log-20181101"))
        .arg("--top")
        .arg("1")
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            r#""url": "/api/v2/banner/25019354""#,
        ))
        .stdout(predicate::str::contains(r#""parsed_lines": 6"#))
        .stdout(predicate::str::contains("/api/v2/banner/16852664").not());
}

#[test]
fn test_analyze_table_output() {
    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("analyze")
        .arg(fixture_path("nginx-access-ui.log-20181101"))
        .arg("--format")
        .arg("table");

    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with(
            "url,count,count_perc,time_sum,time_perc,time_avg,time_max,time_med",
        ))
        .stdout(predicate::str::contains(
            "/api/v2/banner/25019354,3,50.000,1.170,",
        ));
}

#[test]
fn test_analyze_broken_log_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.log");
    fs::write(&path, "nothing\nto\nsee\n").unwrap();

    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("analyze").arg(&path);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("could not be parsed"));
}

#[test]
fn test_analyze_rejects_out_of_range_ceiling() {
    for ceiling in ["0", "150"] {
        let mut cmd = Command::new(get_loglens_bin());
        cmd.arg("analyze")
            .arg(fixture_path("nginx-access-ui.log-20181101"))
            .arg("--max-error-perc")
            .arg(ceiling);

        cmd.assert()
            .failure()
            .stderr(predicate::str::contains("error ceiling must be within (0, 100]"));
    }
}

#[test]
fn test_run_has_no_format_flag() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("run")
        .arg("--config")
        .arg(temp_dir.path().join("config.json"))
        .arg("--format")
        .arg("json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("--format"));
}

#[test]
fn test_run_with_config() {
    // Arrange
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("log");
    let report_dir = temp_dir.path().join("reports");
    fs::create_dir(&log_dir).unwrap();
    fs::copy(
        fixture_path("nginx-access-ui.log-20181101"),
        log_dir.join("nginx-access-ui.log-20181101"),
    )
    .unwrap();

    let config = temp_dir.path().join("config.json");
    let json = serde_json::json!({
        "LOG_DIR": log_dir,
        "REPORT_DIR": report_dir,
        "REPORT_SIZE": 2,
        "LOGGING_DIR": temp_dir.path(),
    });
    fs::write(&config, json.to_string()).unwrap();

    // Act
    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("run").arg("--config").arg(&config);

    // Assert
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("report-2018.11.01.html"));

    assert!(report_dir.join("report-2018.11.01.html").is_file());

    let own_log = fs::read_to_string(temp_dir.path().join("loglens.log")).unwrap();
    assert!(own_log.contains("Wrote report"));
}

#[test]
fn test_run_warns_when_log_file_cannot_be_opened() {
    // Arrange - loglens.log is a directory, so it cannot be opened for append
    let temp_dir = TempDir::new().unwrap();
    let logging_dir = temp_dir.path().join("logging");
    fs::create_dir_all(logging_dir.join("loglens.log")).unwrap();
    let log_dir = temp_dir.path().join("log");
    fs::create_dir(&log_dir).unwrap();

    let config = temp_dir.path().join("config.json");
    let json = serde_json::json!({
        "LOG_DIR": log_dir,
        "REPORT_DIR": temp_dir.path().join("reports"),
        "LOGGING_DIR": logging_dir,
    });
    fs::write(&config, json.to_string()).unwrap();

    // Act
    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("run").arg("--config").arg(&config);

    // Assert
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Cannot open log file"))
        .stderr(predicate::str::contains("No log file to analyze"));
}

#[test]
fn test_run_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::new(get_loglens_bin());
    cmd.arg("run")
        .arg("--config")
        .arg(temp_dir.path().join("missing.json"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}
