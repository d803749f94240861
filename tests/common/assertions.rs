//! Custom assertions for integration tests

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\((L\d{4})\)").unwrap());

/// Assert that every line of output is a JSON object and return them
pub fn assert_valid_json_lines(output: &str, context: &str) -> Vec<Value> {
    output
        .lines()
        .map(|line| {
            let value: Value = serde_json::from_str(line).unwrap_or_else(|e| {
                panic!(
                    "Expected a JSON line ({}): {}\nLine: {}\nOutput:\n{}",
                    context, e, line, output
                )
            });
            assert!(value.is_object(), "Expected a JSON object ({}): {}", context, line);
            value
        })
        .collect()
}

/// Diagnostic codes mentioned in text output, in order of appearance
pub fn diagnostic_codes(output: &str) -> Vec<String> {
    CODE.captures_iter(output)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Diagnostic codes found in JSON-lines output, in order of appearance
pub fn json_codes(reports: &[Value]) -> Vec<String> {
    reports
        .iter()
        .flat_map(|r| r["diagnostics"].as_array().cloned().unwrap_or_default())
        .filter_map(|d| d["code"].as_str().map(String::from))
        .collect()
}

/// Assert that output contains a specific string
pub fn assert_contains(output: &str, needle: &str, context: &str) {
    assert!(
        output.contains(needle),
        "Expected output to contain '{}' ({})\nOutput:\n{}",
        needle,
        context,
        output
    );
}

/// Assert that output does NOT contain a specific string
pub fn assert_not_contains(output: &str, needle: &str, context: &str) {
    assert!(
        !output.contains(needle),
        "Expected output NOT to contain '{}' ({})\nOutput:\n{}",
        needle,
        context,
        output
    );
}
