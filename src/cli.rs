//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Lint config files for EZproxy
#[derive(Parser, Debug)]
#[command(name = "ezproxy-config-lint")]
#[command(about = "Lint config files for EZproxy")]
#[command(version)]
pub struct Cli {
    /// Config files to lint
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Print all lines, not just lines that create warnings
    #[arg(long)]
    pub annotate: bool,

    /// Print internal state before each line is processed
    #[arg(short, long)]
    pub verbose: bool,

    /// Report on trailing space or tab characters
    #[arg(long)]
    pub whitespace: bool,

    /// Report on directives which do not have the right letter casing
    #[arg(long)]
    pub case: bool,

    /// Report on URL directives which do not use the HTTPS scheme
    #[arg(long)]
    pub https: bool,

    /// Report on origins repeated by Host/HostJavaScript lines within a stanza
    #[arg(long)]
    pub origins: bool,

    /// Run additional checks on ProxyHostnameEdit directives
    #[arg(long)]
    pub phe: bool,

    /// Compare Titles against the stanza named by "# Source -" comments (requires network)
    #[arg(long)]
    pub source: bool,

    /// Do not process files referenced by IncludeFile directives
    #[arg(long)]
    pub no_follow_includefile: bool,

    /// Directory from which relative IncludeFile paths are resolved.
    /// By default they are resolved from the directory of the file holding the directive.
    #[arg(long, value_name = "DIR", env = "EZPROXY_LINT_INCLUDEFILE_DIRECTORY")]
    pub includefile_directory: Option<PathBuf>,

    /// Fail when IncludeFile directives nest deeper than this
    #[arg(long, value_name = "N")]
    pub max_include_depth: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text", value_enum)]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Read lint switches from a TOML file; flags given here are applied on top
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Annotated lines with arrows pointing at the offending line or stanza
    #[default]
    Text,
    /// One JSON object per line that produced diagnostics
    Json,
}
