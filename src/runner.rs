//! File-level driver: reads config files line by line, follows IncludeFile
//! directives and prints what the [`StanzaProcessor`] reports.
//!
//! Text output marks the offending line with `←`, or the end of a stanza
//! with `↑` for problems that belong to the stanza as a whole:
//!
//! ```text
//! config.txt:12: URL google.com ← URL does not start with http or https (L3006)
//! config.txt:15: ↑ Stanza "Foo" has Title but no URL (L4003)
//! ```

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use console::style;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::LintConfig;
use crate::error::{LintError, Result};
use crate::linter::{Diagnostic, Directive, StanzaProcessor};
use crate::source::TitleLookup;

/// One line's worth of findings in `--format json` output.
#[derive(Debug, Serialize)]
struct LineReport<'a> {
    location: &'a str,
    line: &'a str,
    /// True when the findings are about the stanza that just closed.
    stanza: bool,
    diagnostics: &'a [Diagnostic],
}

/// Lints files and writes the findings to `W`.
pub struct Linter<W: Write> {
    processor: StanzaProcessor,
    format: OutputFormat,
    color: bool,
    out: W,
}

impl<W: Write> Linter<W> {
    pub fn new(config: LintConfig, format: OutputFormat, out: W) -> Self {
        Self {
            processor: StanzaProcessor::new(config),
            format,
            color: console::colors_enabled(),
            out,
        }
    }

    /// Turn ANSI colours on or off regardless of the terminal.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Answer Source comments with `lookup` instead of the OCLC website.
    pub fn with_title_lookup(mut self, lookup: Box<dyn TitleLookup>) -> Self {
        self.processor = self.processor.with_title_lookup(lookup);
        self
    }

    pub fn processor(&self) -> &StanzaProcessor {
        &self.processor
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Lint `path` and every file it includes.
    ///
    /// Returns how many diagnostics were emitted. Titles and origins are
    /// remembered across calls, so linting several files with one `Linter`
    /// reports duplicates between them.
    pub fn process_file(&mut self, path: &Path) -> Result<usize> {
        self.lint_file(path, 0)
    }

    fn lint_file(&mut self, path: &Path, depth: usize) -> Result<usize> {
        if let Some(max) = self.processor.config().max_include_depth {
            if depth > max {
                return Err(LintError::IncludeDepthExceeded {
                    path: path.to_path_buf(),
                    depth: max,
                });
            }
        }
        if !path.exists() {
            return Err(LintError::FileNotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Linting {} (include depth {})", path.display(), depth);
        let lines = read_lines(path)?;

        let suspended = self.processor.suspend_file();
        let file = path.display().to_string();
        let mut count = 0;
        let mut line_num = 0;
        let mut lines = lines.iter();

        loop {
            // A file that doesn't end on a blank line still needs its last
            // stanza closed, so one empty line is processed after the end.
            let (line, more) = match lines.next() {
                Some(line) => {
                    line_num += 1;
                    (line.as_str(), true)
                }
                None if self.processor.last_line_empty() => break,
                None => ("", false),
            };

            self.dump_state()?;

            let at = format!("{}:{}", file, line_num);
            let diagnostics = self.processor.process_line(line, &at);
            count += diagnostics.len();
            self.emit(&at, line, &diagnostics, more)?;

            if self.processor.config().follow_includefile
                && self.processor.current_directive() == Some(Directive::IncludeFile)
            {
                count += self.include(line, path, depth)?;
            }
        }

        self.processor.resume_file(suspended);
        Ok(count)
    }

    fn include(&mut self, line: &str, enclosing: &Path, depth: usize) -> Result<usize> {
        let target = line
            .trim()
            .split(' ')
            .nth(1)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LintError::MissingIncludePath {
                line: line.to_string(),
            })?;
        let resolved = self.resolve_include(target, enclosing);

        tracing::debug!(
            "IncludeFile {:?} in {} resolves to {}",
            target,
            enclosing.display(),
            resolved.display()
        );
        if self.processor.config().verbose && self.format == OutputFormat::Text {
            writeln!(self.out, "       Line: {}", line)?;
            writeln!(self.out, "    in file: {}", enclosing.display())?;
            writeln!(self.out, "resolves to: {}", resolved.display())?;
        }

        self.lint_file(&resolved, depth + 1)
            .map_err(|e| LintError::IncludeFailed {
                line: line.to_string(),
                path: resolved,
                source: Box::new(e),
            })
    }

    /// Absolute paths are used as given. Relative paths are resolved against
    /// the configured include directory, or else the enclosing file's directory.
    fn resolve_include(&self, target: &str, enclosing: &Path) -> PathBuf {
        let target = Path::new(target);
        if target.is_absolute() {
            return target.to_path_buf();
        }
        match &self.processor.config().includefile_directory {
            Some(dir) => dir.join(target),
            None => enclosing
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(target),
        }
    }

    fn dump_state(&mut self) -> Result<()> {
        if !self.processor.config().verbose || self.format != OutputFormat::Text {
            return Ok(());
        }
        let state = serde_json::to_string(self.processor.state())?;
        writeln!(self.out, "{}", style(state).cyan().force_styling(self.color))?;
        Ok(())
    }

    fn emit(&mut self, at: &str, line: &str, diagnostics: &[Diagnostic], more: bool) -> Result<()> {
        let stanza = self.processor.last_line_empty();
        let annotate = self.processor.config().annotate;

        match self.format {
            OutputFormat::Json => {
                if !diagnostics.is_empty() {
                    let report = LineReport {
                        location: at,
                        line,
                        stanza,
                        diagnostics,
                    };
                    serde_json::to_writer(&mut self.out, &report)?;
                    writeln!(self.out)?;
                }
            }
            OutputFormat::Text => {
                if diagnostics.is_empty() {
                    if annotate && more {
                        writeln!(self.out, "{}: {}", at, line)?;
                    }
                    return Ok(());
                }
                let joined = diagnostics
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                if stanza {
                    writeln!(
                        self.out,
                        "{}: {}",
                        at,
                        style(format!("↑ {}", joined)).yellow().force_styling(self.color)
                    )?;
                    // Keeps annotated output split into stanzas.
                    if annotate && more {
                        writeln!(self.out, "{}:", at)?;
                    }
                } else {
                    writeln!(
                        self.out,
                        "{}: {} {}",
                        at,
                        line,
                        style(format!("← {}", joined)).yellow().force_styling(self.color)
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Split a file into lines, dropping `\r\n` line endings. Invalid UTF-8 is
/// replaced rather than rejected.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path).map_err(|e| LintError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let body = bytes.strip_suffix(b"\n").unwrap_or(&bytes);
    Ok(body
        .split(|b| *b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect())
}
