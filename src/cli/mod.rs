//! The `custom-codable` Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions: it loads a JSON expansion request, runs it
//! through the [`Expander`] over the plugin registry, and prints the result.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use miette::Diagnostic;
use termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::cli::args::{ColorMode, Command, CustomCodableArgs};
use crate::cli::request::ExpansionRequestFile;
use crate::errors::ContractViolation;
use crate::macros::{plugin_registry, Expander, RegistryError};

pub mod args;
pub mod output;
pub mod request;

/// Everything that can stop a CLI command.
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("failed to read '{}'", path.display())]
    #[diagnostic(code(custom_codable::cli::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' is not a valid expansion request", path.display())]
    #[diagnostic(
        code(custom_codable::cli::request),
        help("a request has a `source` string and an `item` whose `kind` is `freestanding` or `declaration`")
    )]
    Request {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize the expansion")]
    #[diagnostic(code(custom_codable::cli::json))]
    Json(#[from] serde_json::Error),

    #[error("failed to write output")]
    #[diagnostic(code(custom_codable::cli::output))]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Contract(#[from] ContractViolation),

    #[error("expansion does not match '{}'", path.display())]
    #[diagnostic(code(custom_codable::cli::expectation_mismatch))]
    ExpectationMismatch { path: PathBuf },

    #[error("expansion produced {0} diagnostic(s)")]
    #[diagnostic(code(custom_codable::cli::diagnostics))]
    Diagnostics(usize),
}

/// The main entry point for the CLI.
pub fn run() {
    let args = CustomCodableArgs::parse();
    init_tracing();
    install_report_handler(args.color);
    let color = ColorChoice::from(args.color);

    // Dispatch to the appropriate subcommand handler.
    let result = match args.command {
        Command::ListMacros => handle_list_macros(color),
        Command::Expand { file, json, expect } => {
            handle_expand(&file, json, expect.as_deref(), color)
        }
    };

    if let Err(e) = result {
        eprintln!("{:?}", miette::Report::new(e));
        process::exit(1);
    }
}

/// Logs go to stderr, filtered by `RUST_LOG`; warnings only by default.
fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "custom_codable=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn install_report_handler(mode: ColorMode) {
    let colored = match mode {
        ColorMode::Always => Some(true),
        ColorMode::Never => Some(false),
        ColorMode::Auto => None,
    };
    miette::set_hook(Box::new(move |_| {
        let mut opts = miette::MietteHandlerOpts::new();
        if let Some(colored) = colored {
            opts = opts.color(colored);
        }
        Box::new(opts.build())
    }))
    .ok();
}

/// Handles the `list-macros` subcommand.
fn handle_list_macros(color: ColorChoice) -> Result<(), CliError> {
    let registry = plugin_registry()?;
    let mut stdout = StandardStream::stdout(color);
    output::print_macro_list(&mut stdout, registry)?;
    Ok(())
}

/// Handles the `expand` subcommand.
fn handle_expand(
    path: &Path,
    json: bool,
    expect: Option<&Path>,
    color: ColorChoice,
) -> Result<(), CliError> {
    let text = fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let request: ExpansionRequestFile =
        serde_json::from_str(&text).map_err(|source| CliError::Request {
            path: path.to_path_buf(),
            source,
        })?;
    let source = request.source_file(path);
    tracing::debug!(file = source.name(), "expanding request");

    let expander = Expander::new(plugin_registry()?);
    let outcome = request.expand(&expander, &source)?;
    let diagnostics = outcome.diagnostics();
    let mut stdout = StandardStream::stdout(color);

    if json {
        output::print_expansion(&mut stdout, &serde_json::to_string_pretty(&outcome)?)?;
    } else if let Some(rendered) = outcome.rendered() {
        output::print_expansion(&mut stdout, &rendered)?;
    }
    output::print_diagnostics(&diagnostics, &source);

    if let Some(expected_path) = expect {
        let expected = fs::read_to_string(expected_path).map_err(|source| CliError::Io {
            path: expected_path.to_path_buf(),
            source,
        })?;
        let actual = outcome.rendered().unwrap_or_default();
        if !output::print_expectation(&mut stdout, &expected, &actual)? {
            return Err(CliError::ExpectationMismatch {
                path: expected_path.to_path_buf(),
            });
        }
    }

    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(CliError::Diagnostics(diagnostics.len()))
    }
}
