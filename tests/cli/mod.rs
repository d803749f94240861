//! CLI integration tests
//!
//! Lint output, IncludeFile handling and configuration, checked through
//! the binary and the library.

pub mod include_tests;
pub mod lint_tests;
