use pretty_assertions::assert_eq;
use reportgen::load_config::{load_config, API_KEY_ENV};
use reportgen_core::config::WordCountInput;
use serial_test::serial;
use std::env;
use std::fs::write;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let config_file = NamedTempFile::new().expect("temp file");
    write(config_file.path(), contents).expect("write config");
    config_file
}

const REPORT_ONLY: &str = r#"
report:
  studentName: Grace Hopper
  studentId: "GH-1906"
  course: Computer Science
  semester: Fall
  institution: Yale
  supervisor: Dr. Aiken
  projectTitle: Compiler Toolkit
  projectDescription: A toolkit for building compilers in Python
  reportType: Thesis
"#;

/// A report-only config loads with every generation default in place.
#[test]
#[serial]
fn load_config_applies_generation_defaults() {
    env::remove_var(API_KEY_ENV);
    let file = config_file(REPORT_ONLY);

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.report.student_name.as_deref(), Some("Grace Hopper"));
    assert_eq!(config.report.report_type.as_deref(), Some("Thesis"));
    assert_eq!(config.report.target_word_count, None);
    assert_eq!(config.generation.strategy, None);
    assert_eq!(config.generation.max_concurrent_chapters, 1);
    assert!(!config.generation.echo_title_in_header);
    assert_eq!(config.generation.model, "gemini-2.5-flash");
    assert_eq!(config.generation.request_timeout_secs, 120);
    assert_eq!(config.generation.api_key, None);
}

#[test]
#[serial]
fn load_config_reads_generation_section_and_text_word_count() {
    env::remove_var(API_KEY_ENV);
    let file = config_file(&format!(
        "{REPORT_ONLY}  targetWordCount: \"27000 words\"\ngeneration:\n  strategy: delegated\n  maxConcurrentChapters: 3\n  echoTitleInHeader: true\n  model: gemini-2.5-pro\n  requestTimeoutSecs: 30\n"
    ));

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(
        config.report.target_word_count,
        Some(WordCountInput::Text("27000 words".into()))
    );
    assert_eq!(config.generation.strategy.as_deref(), Some("delegated"));
    assert_eq!(config.generation.max_concurrent_chapters, 3);
    assert!(config.generation.echo_title_in_header);
    assert_eq!(config.generation.model, "gemini-2.5-pro");
    assert_eq!(config.generation.request_timeout_secs, 30);

    let validated = config.report.validate().expect("valid report");
    assert_eq!(validated.target_word_count, 27000);
}

#[test]
#[serial]
fn load_config_injects_api_key_from_environment() {
    let file = config_file(REPORT_ONLY);

    env::set_var(API_KEY_ENV, "test-key-not-real");
    let config = load_config(file.path()).expect("Config should load");
    assert_eq!(config.generation.api_key.as_deref(), Some("test-key-not-real"));

    env::set_var(API_KEY_ENV, "   ");
    let config = load_config(file.path()).expect("Config should load");
    assert_eq!(config.generation.api_key, None);

    env::remove_var(API_KEY_ENV);
}

/// A key written into the file is ignored; only the environment supplies it.
#[test]
#[serial]
fn load_config_never_reads_api_key_from_file() {
    env::remove_var(API_KEY_ENV);
    let file = config_file(&format!("{REPORT_ONLY}generation:\n  apiKey: from-file\n"));

    let config = load_config(file.path()).expect("Config should load");

    assert_eq!(config.generation.api_key, None);
}

#[test]
fn load_config_reports_missing_file() {
    let err = load_config("/definitely/not/here/report.yaml").unwrap_err();
    assert!(
        err.to_string().contains("Failed to read config file"),
        "unexpected error: {err}"
    );
}

#[test]
fn load_config_reports_invalid_yaml() {
    let file = config_file("generation:\n  maxConcurrentChapters: [1, 2\n");

    let err = load_config(file.path()).unwrap_err();

    assert!(
        err.to_string().contains("Failed to parse config YAML"),
        "unexpected error: {err}"
    );
}

#[test]
fn load_config_requires_report_section() {
    let file = config_file("generation:\n  strategy: template\n");

    let err = load_config(file.path()).unwrap_err();

    assert!(err.to_string().contains("report"), "unexpected error: {err}");
}
