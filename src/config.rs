//! Lint configuration.
//!
//! Switches can come from a TOML file passed with `--config` and from
//! command-line flags. Flags are applied on top of the file:
//!
//! ```toml
//! whitespace = true
//! https = true
//! additional_phe_checks = true
//! includefile_directory = "/usr/local/ezproxy"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::LintError;

/// Which checks run and how files are walked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Report lines ending in a space or tab
    pub whitespace: bool,

    /// Report directives whose label has the wrong letter casing
    pub directive_case: bool,

    /// Report URL directives not using https
    pub https: bool,

    /// Also report Host/HostJavaScript origins repeated inside one stanza
    pub origins: bool,

    /// Check ProxyHostnameEdit find/replace shape and ordering
    pub additional_phe_checks: bool,

    /// Check `# Source -` comments against the OCLC website
    pub source: bool,

    /// Lint files referenced by IncludeFile directives
    pub follow_includefile: bool,

    /// Directory relative IncludeFile paths are resolved from.
    /// Defaults to the directory of the file holding the directive.
    pub includefile_directory: Option<PathBuf>,

    /// Abort when IncludeFile nesting goes deeper than this
    pub max_include_depth: Option<usize>,

    /// Print every line, not only lines with diagnostics
    pub annotate: bool,

    /// Print the stanza state before each line
    pub verbose: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            whitespace: false,
            directive_case: false,
            https: false,
            origins: false,
            additional_phe_checks: false,
            source: false,
            follow_includefile: true,
            includefile_directory: None,
            max_include_depth: None,
            annotate: false,
            verbose: false,
        }
    }
}

impl LintConfig {
    /// Load configuration from a TOML file
    pub fn load_from(path: &Path) -> Result<Self, LintError> {
        if !path.exists() {
            return Err(LintError::ConfigError {
                message: format!("Config file not found: {}", path.display()),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| LintError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| LintError::ConfigError {
            message: format!("Failed to parse config: {}", e),
        })
    }

    /// Build the effective configuration for a CLI invocation
    pub fn from_cli(cli: &Cli) -> Result<Self, LintError> {
        let base = match &cli.config {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        Ok(base.merge_cli(cli))
    }

    /// Apply command-line flags on top of this configuration
    pub fn merge_cli(mut self, cli: &Cli) -> Self {
        self.whitespace |= cli.whitespace;
        self.directive_case |= cli.case;
        self.https |= cli.https;
        self.origins |= cli.origins;
        self.additional_phe_checks |= cli.phe;
        self.source |= cli.source;
        self.annotate |= cli.annotate;
        self.verbose |= cli.verbose;
        if cli.no_follow_includefile {
            self.follow_includefile = false;
        }
        if let Some(dir) = &cli.includefile_directory {
            self.includefile_directory = Some(dir.clone());
        }
        if let Some(depth) = cli.max_include_depth {
            self.max_include_depth = Some(depth);
        }
        self
    }
}
