use std::{
  fs,
  path::{Path, PathBuf},
};

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use secnum::{
  build,
  cli::{Cli, Commands},
  site::FsSite,
};
use secnum_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  // Parse command line arguments
  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  if let Commands::Init {
    output,
    format,
    force,
  } = &cli.command
  {
    return init_config(output, format, *force);
  }

  let config = Config::load(&cli.config_files, &cli.config_overrides)?;

  match cli.command {
    Commands::Build {
      input_dir,
      output_dir,
    } => {
      let input_dir = resolve_input_dir(input_dir, &config)?;
      let output_dir = output_dir.unwrap_or_else(|| config.output_dir.clone());
      build::build(&config, &input_dir, &output_dir)?;
      info!("Pages written to {}", output_dir.display());
    },

    Commands::Chapters { input_dir } => {
      let input_dir = resolve_input_dir(input_dir, &config)?;
      let site = FsSite::open(&input_dir, &config);
      let map = build::chapter_map(&config, &site)?;
      print_output(&serde_json::to_string_pretty(&map)?);
    },

    // Handled above, before any config is loaded
    Commands::Init { .. } => {},
  }

  Ok(())
}

/// Input directory from the command line, falling back to the config.
fn resolve_input_dir(
  input_dir: Option<PathBuf>,
  config: &Config,
) -> Result<PathBuf> {
  let Some(input_dir) = input_dir.or_else(|| config.input_dir.clone()) else {
    bail!("No input directory given. Use --input-dir or set 'input_dir'.");
  };

  if !input_dir.is_dir() {
    bail!("Input directory does not exist: {}", input_dir.display());
  }
  Ok(input_dir)
}

#[allow(clippy::print_stdout, reason = "Command output")]
fn print_output(output: &str) {
  println!("{output}");
}

fn init_config(output: &Path, format: &str, force: bool) -> Result<()> {
  // Check if file already exists and that we're not forcing overwrite
  if output.exists() && !force {
    bail!(
      "Configuration file already exists: {}. Use --force to overwrite.",
      output.display()
    );
  }

  if let Some(parent) = output.parent()
    && !parent.as_os_str().is_empty()
    && !parent.exists()
  {
    fs::create_dir_all(parent).wrap_err_with(|| {
      format!("Failed to create directory: {}", parent.display())
    })?;
    info!("Created directory: {}", parent.display());
  }

  Config::generate_default_config(format, output).wrap_err_with(|| {
    format!("Failed to generate configuration file: {}", output.display())
  })?;

  info!(
    "Configuration file created successfully. Edit it to customize numbering."
  );
  Ok(())
}
