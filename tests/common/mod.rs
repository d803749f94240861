//! Common test utilities and fixtures for ezproxy-config-lint integration tests
//!
//! This module provides:
//! - `TestRepo` builder for writing config trees into a temp directory
//! - Custom assertions for validating CLI output

#![allow(unused_imports)]
#![allow(dead_code)]

pub mod assertions;

pub use assertions::*;
pub use test_repo::TestRepo;
