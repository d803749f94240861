//! Tests for following IncludeFile directives

use ezproxy_config_lint::LintConfig;

use crate::common::{assert_contains, diagnostic_codes, TestRepo};

#[test]
fn test_include_tree_from_cli() {
    let repo = TestRepo::new();
    repo.with_include_tree();

    let output = repo.run_cli_findings(&["config.txt"]);
    assert_eq!(
        output,
        "conf.d/beta.txt:3: H https://www.alpha.example.com/path ← Origin already seen at \"conf.d/alpha.txt:2\" (L2002)\n"
    );
}

#[test]
fn test_include_tree_through_library() {
    let repo = TestRepo::new();
    repo.with_include_tree();

    let (count, output) = repo.lint(LintConfig::default(), &["config.txt"]);
    assert_eq!(count, 1);
    assert_eq!(diagnostic_codes(&output), vec!["L2002"]);
}

#[test]
fn test_no_follow_includefile() {
    let repo = TestRepo::new();
    repo.with_include_tree();

    repo.run_cli_success(&["--no-follow-includefile", "config.txt"]);
}

#[test]
fn test_includefile_directory_flag() {
    let repo = TestRepo::new();
    repo.add_file("etc/config.txt", "IncludeFile stanzas.txt\n")
        .add_file("share/stanzas.txt", "Title Lost\n");

    let (code, _, _) = repo.run_cli_failure(&["etc/config.txt"]);
    assert_eq!(code, 1);

    let output = repo.run_cli_findings(&["--includefile-directory", "share", "etc/config.txt"]);
    assert_contains(&output, "share/stanzas.txt:1: ↑", "resolved from flag");
}

#[test]
fn test_includefile_directory_env() {
    let repo = TestRepo::new();
    repo.add_file("etc/config.txt", "IncludeFile stanzas.txt\n")
        .add_file("share/stanzas.txt", "Title Lost\n");

    let output = std::process::Command::new(env!("CARGO_BIN_EXE_ezproxy-config-lint"))
        .current_dir(repo.path())
        .env("EZPROXY_LINT_INCLUDEFILE_DIRECTORY", "share")
        .arg("etc/config.txt")
        .output()
        .expect("Failed to run CLI");
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_absolute_include_path() {
    let repo = TestRepo::new();
    repo.add_file("elsewhere/db.txt", "Title Absolute\n");
    let absolute = repo.file("elsewhere/db.txt");
    repo.add_file(
        "config.txt",
        &format!("IncludeFile {}\n", absolute.display()),
    );

    let (count, output) = repo.lint(LintConfig::default(), &["config.txt"]);
    assert_eq!(count, 1);
    assert_contains(&output, "Stanza \"Absolute\" has Title but no URL", "absolute include");
}

#[test]
fn test_failed_include_names_the_line() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", "Title A\nURL https://a.example.com\n\nIncludeFile gone.txt\n");

    let (code, _, stderr) = repo.run_cli_failure(&["config.txt"]);
    assert_eq!(code, 1);
    assert_contains(
        &stderr,
        "Error encountered when processing line \"IncludeFile gone.txt\"",
        "include failure",
    );
}

#[test]
fn test_include_depth_guard_exit_code() {
    let repo = TestRepo::new();
    repo.add_file("config.txt", "IncludeFile config.txt\n");

    let (code, _, stderr) = repo.run_cli_failure(&["--max-include-depth", "5", "config.txt"]);
    assert_eq!(code, 4);
    assert_contains(&stderr, "IncludeFile nesting deeper than 5 levels", "depth guard");
}

#[test]
fn test_include_inside_stanza_keeps_stanza() {
    let repo = TestRepo::new();
    repo.add_file("shared-options.txt", "Title Inner\nURL https://inner.example.com\n")
        .add_file(
            "config.txt",
            "\
Title Outer
IncludeFile shared-options.txt
URL https://outer.example.com
",
        );

    let (_, output) = repo.lint(LintConfig::default(), &["config.txt"]);
    // The Title of the outer stanza survives the include.
    assert_eq!(diagnostic_codes(&output), vec!["L1002"]);
}
