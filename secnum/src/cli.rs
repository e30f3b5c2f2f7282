use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command line interface for secnum
#[derive(Parser, Debug)]
#[command(author, version, about = "secnum: numbered headings for documentation sites")]
pub struct Cli {
  /// Subcommand to execute (see [`Commands`])
  #[command(subcommand)]
  pub command: Commands,

  /// Enable verbose debug logging
  #[arg(short, long)]
  pub verbose: bool,

  /// Path to configuration file(s) (TOML or JSON, can be specified multiple
  /// times) Multiple files are merged in order: list options such as
  /// `excludes` are appended, while every other option takes the later
  /// file's value, including its default when the later file omits it
  #[arg(short = 'c', long = "config-file", action = clap::ArgAction::Append)]
  pub config_files: Vec<PathBuf>,

  /// Override configuration values (KEY=VALUE format, can be used multiple
  /// times)
  #[arg(long = "config", action = clap::ArgAction::Append)]
  pub config_overrides: Vec<String>,
}

/// All supported subcommands for the secnum CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Initialize a new secnum configuration file
  Init {
    /// Path to create the configuration file at
    #[arg(short, long, default_value = "secnum.toml")]
    output: PathBuf,

    /// Format of the configuration file.
    #[arg(short = 'F', long, default_value = "toml", value_parser = ["toml", "json"])]
    format: String,

    /// Force overwrite if file already exists
    #[arg(short, long)]
    force: bool,
  },

  /// Number every page of a site and write the results.
  Build {
    /// Directory containing the pages.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,

    /// Output directory for the numbered pages.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
  },

  /// Print the starting chapter of every page as JSON.
  Chapters {
    /// Directory containing the pages.
    #[arg(short, long)]
    input_dir: Option<PathBuf>,
  },
}

impl Cli {
  /// Parse command line arguments into a [`Cli`] struct.
  #[must_use]
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
