//! Defines the command-line arguments and subcommands for the
//! `custom-codable` CLI.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use termcolor::ColorChoice;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "custom-codable",
    version,
    about = "Expands CustomCodable macros over host syntax trees."
)]
pub struct CustomCodableArgs {
    /// When to colour output.
    #[arg(long, value_enum, default_value_t = ColorMode::Auto, global = true)]
    pub color: ColorMode,

    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every registered macro with its public declaration.
    ListMacros,
    /// Expand the request described by a JSON file.
    Expand {
        /// The path to the JSON expansion request.
        #[arg(required = true)]
        file: PathBuf,
        /// Print the produced syntax as JSON instead of source text.
        #[arg(long)]
        json: bool,
        /// Compare the rendered expansion against this file and show a diff.
        #[arg(long, value_name = "FILE", conflicts_with = "json")]
        expect: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

impl From<ColorMode> for ColorChoice {
    fn from(mode: ColorMode) -> Self {
        match mode {
            ColorMode::Auto => ColorChoice::Auto,
            ColorMode::Always => ColorChoice::Always,
            ColorMode::Never => ColorChoice::Never,
        }
    }
}
