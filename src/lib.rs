//! ezproxy-config-lint: a linter for EZproxy config files
//!
//! EZproxy configs are made of database stanzas: runs of directives
//! separated by blank lines, each describing one proxied resource. The
//! linter reads them one line at a time and reports directives that are out
//! of order, duplicated, malformed or left unclosed at the end of a stanza.
//!
//! # Example
//!
//! ```ignore
//! use ezproxy_config_lint::{LintConfig, Linter, OutputFormat};
//! use std::path::Path;
//!
//! let config = LintConfig { https: true, ..Default::default() };
//! let mut linter = Linter::new(config, OutputFormat::Text, std::io::stdout());
//! let count = linter.process_file(Path::new("config.txt"))?;
//! println!("{} diagnostics", count);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod linter;
pub mod runner;
pub mod source;

// Re-export commonly used types
pub use cli::{Cli, OutputFormat};
pub use config::LintConfig;
pub use error::{LintError, Result};
pub use linter::{Code, Diagnostic, Directive, StanzaProcessor, StanzaState};
pub use runner::Linter;
pub use source::{OclcClient, SourceError, TitleLookup};
