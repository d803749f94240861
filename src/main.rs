//! ezproxy-config-lint CLI entry point

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use ezproxy_config_lint::{Cli, LintConfig, Linter};

fn main() -> ExitCode {
    // Logs go to stderr so they never mix with lint output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("ezproxy_config_lint=warn")),
        )
        .with_writer(io::stderr)
        .init();

    match run() {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(2),
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

/// Lint every file named on the command line, returning the total number
/// of diagnostics.
fn run() -> ezproxy_config_lint::Result<usize> {
    let cli = Cli::parse();
    let config = LintConfig::from_cli(&cli)?;
    tracing::debug!("Effective config: {:?}", config);

    let color = !cli.no_color && console::colors_enabled();
    let mut linter = Linter::new(config, cli.format, io::stdout().lock()).with_color(color);

    let mut total = 0;
    for path in &cli.files {
        total += linter.process_file(path)?;
    }
    Ok(total)
}
