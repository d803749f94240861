//! Format Consistency Tests
//!
//! Text and JSON output must report the same diagnostics at the same places.

use ezproxy_config_lint::{LintConfig, OutputFormat};

use crate::common::{assert_valid_json_lines, diagnostic_codes, json_codes, TestRepo};

const MESSY_CONFIG: &str = "\
Title Messy
URL google.com
Find foo
NeverProxy example.com

Option HideEZproxy
Title Unclosed
URL https://unclosed.example.com

T Messy
";

#[test]
fn test_json_lines_are_valid() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", MESSY_CONFIG);

    let output = repo.run_cli_findings(&["-f", "json", "config.txt"]);
    let reports = assert_valid_json_lines(&output, "json output");
    assert_eq!(reports.len(), 5);
    for report in &reports {
        assert!(report["location"].is_string());
        assert!(report["line"].is_string());
        assert!(report["stanza"].is_boolean());
        assert!(report["diagnostics"].is_array());
    }
}

#[test]
fn test_text_and_json_report_same_codes() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", MESSY_CONFIG);

    let (text_count, text) = repo.lint(LintConfig::default(), &["config.txt"]);
    let (json_count, json) =
        repo.lint_as(LintConfig::default(), OutputFormat::Json, &["config.txt"]);
    let reports = assert_valid_json_lines(&json, "library json");

    assert_eq!(text_count, json_count);
    assert_eq!(diagnostic_codes(&text), json_codes(&reports));
    assert_eq!(
        json_codes(&reports),
        vec!["L3006", "L4004", "L4002", "L2004", "L4003"]
    );
}

#[test]
fn test_json_marks_stanza_diagnostics() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", MESSY_CONFIG);

    let (_, json) = repo.lint_as(LintConfig::default(), OutputFormat::Json, &["config.txt"]);
    let reports = assert_valid_json_lines(&json, "stanza flags");
    let stanza: Vec<bool> = reports
        .iter()
        .map(|r| r["stanza"].as_bool().unwrap())
        .collect();
    assert_eq!(stanza, vec![false, false, true, false, true]);

    let unclosed = &reports[2];
    assert_eq!(unclosed["line"], "");
    assert!(unclosed["location"].as_str().unwrap().ends_with("config.txt:9"));
    assert_eq!(
        unclosed["diagnostics"][0]["message"],
        "Stanza \"Unclosed\" has \"Option HideEZproxy\" but doesn't have a corresponding \"Option NoHideEZproxy\" line at the end of the stanza"
    );
}

#[test]
fn test_json_ignores_annotate() {
    let repo = TestRepo::new();
    repo.with_clean_config();

    let output = repo.run_cli_success(&["-f", "json", "--annotate", "config.txt"]);
    assert!(output.is_empty(), "{output}");
}
