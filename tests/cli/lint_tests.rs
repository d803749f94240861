//! Tests for linting single config files from the command line

use crate::common::{assert_contains, assert_not_contains, diagnostic_codes, TestRepo};

// ============================================================================
// EXIT CODES
// ============================================================================

#[test]
fn test_clean_config_exits_zero() {
    let repo = TestRepo::new();
    repo.with_clean_config();

    let output = repo.run_cli_success(&["config.txt"]);
    assert!(output.is_empty(), "clean config printed: {output}");
}

#[test]
fn test_findings_exit_two() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", "Title Missing URL\n");

    let output = repo.run_cli_findings(&["config.txt"]);
    assert_eq!(
        output,
        "config.txt:1: ↑ Stanza \"Missing URL\" has Title but no URL (L4003)\n"
    );
}

#[test]
fn test_missing_file_exits_one() {
    let repo = TestRepo::new();
    let (code, _, stderr) = repo.run_cli_failure(&["nope.txt"]);
    assert_eq!(code, 1);
    assert_contains(&stderr, "File not found: nope.txt", "missing file");
}

// ============================================================================
// OUTPUT SHAPE
// ============================================================================

#[test]
fn test_line_and_stanza_markers() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "\
Title Example
URL google.com

AnonymousURL +*
Title Open Fence
URL https://fence.example.com
",
    );

    let output = repo.run_cli_findings(&["config.txt"]);
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "config.txt:2: URL google.com ← URL does not start with http or https (L3006)",
            "config.txt:6: ↑ Stanza \"Open Fence\" has AnonymousURL but doesn't have a corresponding \"AnonymousURL -*\" line at the end of the stanza (L4001)",
        ]
    );
}

#[test]
fn test_multiple_diagnostics_on_one_line_are_joined() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", "URL http://[boo\n");

    let output = repo.run_cli_findings(&["config.txt"]);
    assert_eq!(
        diagnostic_codes(&output),
        vec!["L1002", "L1010", "L3005"]
    );
    assert_eq!(output.lines().count(), 1, "{output}");
    assert_contains(&output, "(L1002), \"URL\" directive is before", "joined with comma");
}

#[test]
fn test_annotate_prints_whole_file() {
    let repo = TestRepo::new();
    repo.with_clean_config();

    let output = repo.run_cli_success(&["--annotate", "config.txt"]);
    assert_eq!(output.lines().count(), 10, "{output}");
    assert!(output.starts_with("config.txt:1: Title Alpha Database\n"));
    assert_contains(&output, "config.txt:4: \n", "blank line kept");
}

#[test]
fn test_no_color_output_is_plain() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", "FooBar baz\n");

    let output = repo.run_cli_findings(&["--no-color", "config.txt"]);
    assert_not_contains(&output, "\u{1b}[", "ansi escapes");
    assert_eq!(
        output,
        "config.txt:1: FooBar baz ← Unknown directive \"FooBar\" (L9001)\n"
    );
}

// ============================================================================
// OPTIONAL CHECKS
// ============================================================================

#[test]
fn test_optional_checks_are_off_by_default() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "TITLE Plain HTTP \nURL http://plain.example.com\nPHE plain.example.com plain\n",
    );

    let output = repo.run_cli_findings(&["config.txt"]);
    // Only the PHE ordering problem is reported without flags.
    assert_eq!(diagnostic_codes(&output), vec!["L1008"]);
}

#[test]
fn test_optional_check_flags() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "TITLE Plain HTTP \nURL http://plain.example.com\nHJ plain.example.com\nH http://plain.example.com\n",
    );

    let output = repo.run_cli_findings(&[
        "--whitespace",
        "--case",
        "--https",
        "--origins",
        "config.txt",
    ]);
    assert_eq!(
        diagnostic_codes(&output),
        vec!["L5002", "L5001", "L3007", "L2005"]
    );
}

#[test]
fn test_phe_flag() {
    let repo = TestRepo::new();
    repo.add_file(
        "config.txt",
        "\
PHE example.com$ example-com
PHE www.example.com www-example-com
Title Example
URL https://www.example.com
",
    );

    assert!(diagnostic_codes(&repo.run_cli_success(&["config.txt"])).is_empty());

    let output = repo.run_cli_findings(&["--phe", "config.txt"]);
    assert_eq!(diagnostic_codes(&output), vec!["L3002", "L1009"]);
}

// ============================================================================
// MULTIPLE FILES
// ============================================================================

#[test]
fn test_duplicates_reported_across_command_line_files() {
    let repo = TestRepo::new();
    repo.add_file("a.txt", "Title Shared\nURL https://shared.example.com\n")
        .add_file("b.txt", "Title Shared\nURL https://shared.example.com/b\n");

    let output = repo.run_cli_findings(&["a.txt", "b.txt"]);
    assert_eq!(
        output.lines().collect::<Vec<_>>(),
        vec![
            "b.txt:1: Title Shared ← \"Title\" directive value already seen at \"a.txt:1\" (L2004)",
            "b.txt:2: URL https://shared.example.com/b ← Origin already seen at \"a.txt:2\" (L2002)",
        ]
    );
}
