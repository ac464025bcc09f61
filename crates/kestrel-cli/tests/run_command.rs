use kestrel_cli::commands::run::{RunStatus, run};
use kestrel_cli::config::Config;
use std::fs;
use std::io::Write;
use tempfile::TempDir;

fn test_config(root: &TempDir) -> Config {
    Config {
        log_dir: root.path().join("log"),
        report_dir: root.path().join("reports"),
        done_dir: root.path().join("done"),
        ..Config::default()
    }
}

fn access_line(url: &str, time: &str) -> String {
    format!(
        "1.196.116.32 -  - [29/Jun/2017:03:50:22 +0300] \
         \"GET {url} HTTP/1.1\" 200 927 \"-\" \"Lynx/2.8.8dev.9\" \"-\" \
         \"1498697422-2190034393-4708-9752759\" \"dc7161be3\" {time}\n"
    )
}

fn write_log(config: &Config, name: &str, lines: &[String]) {
    fs::create_dir_all(&config.log_dir).unwrap();
    fs::write(config.log_dir.join(name), lines.concat()).unwrap();
}

#[test]
fn test_run_without_logs_is_a_clean_noop() {
    let root = TempDir::new().unwrap();
    let config = test_config(&root);

    let status = run(&config, None).unwrap();
    assert!(matches!(status, RunStatus::NoLogFound));

    // the working directories were still created
    assert!(config.log_dir.is_dir());
    assert!(config.report_dir.is_dir());
    assert!(config.done_dir.is_dir());
}

#[test]
fn test_run_over_plain_log_writes_report_and_relocates() {
    let root = TempDir::new().unwrap();
    let config = test_config(&root);
    write_log(
        &config,
        "nginx-access-ui.log-20170630",
        &[
            access_line("/api/v1/x", "0.1"),
            access_line("/api/v1/x", "0.3"),
            access_line("/api/v1/y", "0.2"),
        ],
    );

    let status = run(&config, None).unwrap();
    let RunStatus::Completed {
        report_path,
        lines_processed,
        lines_failed,
    } = status
    else {
        panic!("expected a completed run");
    };

    assert_eq!(lines_processed, 3);
    assert_eq!(lines_failed, 0);
    assert_eq!(
        report_path,
        config.report_dir.join("report-2017.06.30.html")
    );

    let html = fs::read_to_string(&report_path).unwrap();
    assert!(html.contains("/api/v1/x"));
    assert!(!html.contains("$table_json"));

    // the processed log moved out of the active directory
    assert!(!config.log_dir.join("nginx-access-ui.log-20170630").exists());
    assert!(config.done_dir.join("nginx-access-ui.log-20170630").exists());
}

#[test]
fn test_run_over_gzip_log() {
    let root = TempDir::new().unwrap();
    let config = test_config(&root);
    fs::create_dir_all(&config.log_dir).unwrap();

    let path = config.log_dir.join("nginx-access-ui.log-20170630.gz");
    let mut encoder = flate2::write::GzEncoder::new(
        fs::File::create(&path).unwrap(),
        flate2::Compression::default(),
    );
    encoder
        .write_all(access_line("/api/v1/banner", "0.39").as_bytes())
        .unwrap();
    encoder.finish().unwrap();

    let status = run(&config, None).unwrap();
    let RunStatus::Completed { report_path, .. } = status else {
        panic!("expected a completed run");
    };

    assert!(report_path.ends_with("report-2017.06.30.html"));
    assert!(
        config
            .done_dir
            .join("nginx-access-ui.log-20170630.gz")
            .exists()
    );
}

#[test]
fn test_threshold_failure_leaves_log_in_place() {
    let root = TempDir::new().unwrap();
    let mut config = test_config(&root);
    config.error_threshold = 0.5;
    write_log(
        &config,
        "nginx-access-ui.log-20170630",
        &[
            access_line("/api/v1/x", "0.1"),
            "garbage\n".to_string(),
            "garbage\n".to_string(),
        ],
    );

    let err = run(&config, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<kestrel_core::Error>(),
        Some(kestrel_core::Error::ErrorThreshold { .. })
    ));

    // no report written, log not relocated - safe to re-process
    assert!(config.log_dir.join("nginx-access-ui.log-20170630").exists());
    assert_eq!(fs::read_dir(&config.report_dir).unwrap().count(), 0);
    assert_eq!(fs::read_dir(&config.done_dir).unwrap().count(), 0);
}

#[test]
fn test_empty_log_is_a_distinct_failure() {
    let root = TempDir::new().unwrap();
    let config = test_config(&root);
    write_log(&config, "nginx-access-ui.log-20170630", &[]);

    let err = run(&config, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<kestrel_core::Error>(),
        Some(kestrel_core::Error::EmptyInput)
    ));
    assert!(config.log_dir.join("nginx-access-ui.log-20170630").exists());
}

#[test]
fn test_line_limit_caps_the_run() {
    let root = TempDir::new().unwrap();
    let config = test_config(&root);
    let lines: Vec<String> = (0..10)
        .map(|n| access_line("/api/v1/x", &format!("0.{n}")))
        .collect();
    write_log(&config, "nginx-access-ui.log-20170630", &lines);

    let status = run(&config, Some(2)).unwrap();
    let RunStatus::Completed {
        lines_processed, ..
    } = status
    else {
        panic!("expected a completed run");
    };
    assert_eq!(lines_processed, 3);
}

#[test]
fn test_latest_log_wins_over_older_ones() {
    let root = TempDir::new().unwrap();
    let config = test_config(&root);
    write_log(
        &config,
        "nginx-access-ui.log-20170629",
        &[access_line("/old", "0.1")],
    );
    write_log(
        &config,
        "nginx-access-ui.log-20170630",
        &[access_line("/new", "0.2")],
    );

    let status = run(&config, None).unwrap();
    let RunStatus::Completed { report_path, .. } = status else {
        panic!("expected a completed run");
    };

    let html = fs::read_to_string(report_path).unwrap();
    assert!(html.contains("/new"));
    assert!(!html.contains("/old"));

    // the older log is untouched and will be picked up next run
    assert!(config.log_dir.join("nginx-access-ui.log-20170629").exists());
}
