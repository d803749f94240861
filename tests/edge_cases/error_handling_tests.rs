//! Error Handling and Edge Case Tests

use ezproxy_config_lint::LintConfig;

use crate::common::{diagnostic_codes, TestRepo};

// ============================================================================
// EMPTY AND ODD FILES
// ============================================================================

#[test]
fn test_empty_file() {
    let repo = TestRepo::new();
    repo.add_empty_file("config.txt");

    repo.run_cli_success(&["config.txt"]);
}

#[test]
fn test_comments_only() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", "# EZproxy config\n#\n# nothing here yet\n");

    repo.run_cli_success(&["config.txt"]);
}

#[test]
fn test_crlf_line_endings() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "Title Windows\r\nURL https://windows.example.com\r\n\r\n",
    );

    let (count, output) = repo.lint(
        LintConfig {
            whitespace: true,
            ..Default::default()
        },
        &["config.txt"],
    );
    assert_eq!(count, 0, "{output}");
}

#[test]
fn test_invalid_utf8_is_linted() {
    let repo = TestRepo::new();
    repo.add_bytes("config.txt", b"Title Caf\xe9\nURL https://cafe.example.com\n");

    let (count, output) = repo.lint(LintConfig::default(), &["config.txt"]);
    assert_eq!(count, 0, "{output}");
}

#[test]
fn test_trailing_continuation_at_end_of_file() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "Title Cut Short\nURL https://short.example.com\nShibbolethMetadata \\\n",
    );

    // The dangling continuation never completes, the stanza still closes.
    let (count, _) = repo.lint(LintConfig::default(), &["config.txt"]);
    assert_eq!(count, 0);
}

#[test]
fn test_many_blank_lines_between_stanzas() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "Title One\nURL https://one.example.com\n\n\n\n\nTitle Two\nURL https://two.example.com\n",
    );

    repo.run_cli_success(&["config.txt"]);
}

// ============================================================================
// DIRECTIVE EDGE CASES
// ============================================================================

#[test]
fn test_separator_stanza() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "\
Title ------ Journals ------
Description Everything below is a journal

Title Real
Description Not a separator
URL https://real.example.com
",
    );

    repo.run_cli_success(&["config.txt"]);
}

#[test]
fn test_separator_flag_cleared_by_later_directive() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "Title Heading\nDescription Blurb\nDJ example.com\n",
    );

    let output = repo.run_cli_findings(&["config.txt"]);
    assert_eq!(diagnostic_codes(&output), vec!["L4003"]);
}

#[test]
fn test_unknown_directive_does_not_move_ordering() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "Title Typo\nURLL https://typo.example.com\nURL https://typo.example.com\n",
    );

    let output = repo.run_cli_findings(&["config.txt"]);
    assert_eq!(diagnostic_codes(&output), vec!["L9001"]);
}

#[test]
fn test_find_at_end_of_stanza() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "Title Find\nURL https://find.example.com\nFind foo\n\nTitle Next\nURL https://next.example.com\n",
    );

    // Find/Replace pairing is judged within a stanza; the blank line resets it.
    repo.run_cli_success(&["config.txt"]);
}
