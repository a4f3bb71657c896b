//! Handles all user-facing output for the CLI.
//!
//! Headings and diffs are coloured with `termcolor`; diagnostics are
//! rendered by `miette` against the request's source text. Everything the
//! user asked for goes to stdout, everything that went wrong to stderr.

use std::io::{self, Write};

use difference::{Changeset, Difference};
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

use crate::errors::{print_diagnostic, MacroDiagnostic};
use crate::macros::MacroRegistry;
use crate::syntax::SourceFile;

// ============================================================================
// CORE OUTPUT FUNCTIONS: User-facing CLI output utilities
// ============================================================================

/// Prints every registered macro's public declaration, in name order.
pub fn print_macro_list(stdout: &mut StandardStream, registry: &MacroRegistry) -> io::Result<()> {
    for (i, def) in registry.iter().enumerate() {
        if i > 0 {
            writeln!(stdout)?;
        }
        print_heading(stdout, def.name())?;
        writeln!(stdout, "{}", def.signature)?;
    }
    Ok(())
}

/// Prints rendered expansion text.
pub fn print_expansion(stdout: &mut StandardStream, rendered: &str) -> io::Result<()> {
    writeln!(stdout, "{}", rendered)
}

/// Renders each diagnostic with `miette` against `source`, on stderr.
pub fn print_diagnostics(diagnostics: &[&MacroDiagnostic], source: &SourceFile) {
    for diagnostic in diagnostics {
        print_diagnostic((*diagnostic).clone(), source.named_source());
    }
}

/// Compares `actual` with `expected` line by line.
///
/// Returns `true` when they match. Otherwise prints a coloured diff and
/// returns `false`.
pub fn print_expectation(
    stdout: &mut StandardStream,
    expected: &str,
    actual: &str,
) -> io::Result<bool> {
    let changeset = Changeset::new(expected.trim_end(), actual.trim_end(), "\n");
    if changeset.distance == 0 {
        return Ok(true);
    }
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true))?;
    writeln!(stdout, "--- expected / +++ actual")?;
    stdout.reset()?;
    print_diff(stdout, &changeset.diffs)?;
    Ok(false)
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn print_heading(stdout: &mut StandardStream, text: &str) -> io::Result<()> {
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    writeln!(stdout, "{}", text)?;
    stdout.reset()
}

fn print_diff(stdout: &mut StandardStream, diffs: &[Difference]) -> io::Result<()> {
    for diff in diffs {
        match diff {
            Difference::Same(ref x) => {
                stdout.reset()?;
                for line in x.lines() {
                    writeln!(stdout, " {}", line)?;
                }
            }
            Difference::Add(ref x) => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
                for line in x.lines() {
                    writeln!(stdout, "+{}", line)?;
                }
            }
            Difference::Rem(ref x) => {
                stdout.set_color(ColorSpec::new().set_fg(Some(Color::Red)))?;
                for line in x.lines() {
                    writeln!(stdout, "-{}", line)?;
                }
            }
        }
    }
    stdout.reset()
}
