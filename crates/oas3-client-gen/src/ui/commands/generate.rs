use std::path::{Path, PathBuf};

use anyhow::Context;
use oas3_client_gen::{Artifacts, GeneratorConfig, Orchestrator};

use super::{report::Report, source_config};
use crate::{ui::cli::GenerateArgs, utils::SpecFile};

#[derive(Debug, Clone)]
pub struct GenerateCommand {
  pub input: PathBuf,
  pub output: PathBuf,
  pub config: GeneratorConfig,
  pub quiet: bool,
  pub verbose: bool,
}

impl GenerateCommand {
  pub fn from_args(args: GenerateArgs, quiet: bool, verbose: bool) -> anyhow::Result<Self> {
    let GenerateArgs {
      source,
      output,
      package_name,
      visibility,
    } = args;

    if package_name.trim().is_empty() {
      anyhow::bail!("package name must not be empty");
    }
    let config = GeneratorConfig {
      package_name,
      visibility,
      ..source_config(&source)
    };

    Ok(Self {
      input: source.input,
      output,
      config,
      quiet,
      verbose,
    })
  }
}

pub async fn generate_code(command: GenerateCommand) -> anyhow::Result<()> {
  let report = Report::new(command.quiet, command.verbose);

  report.info(&format!("Loading OpenAPI document from: {}", command.input.display()));
  let spec = SpecFile::open(&command.input).await?;
  let (bytes, format) = (spec.to_bytes(), spec.format());

  report.info("Generating Rust client module...");
  let config = command.config.clone();
  let generation = tokio::task::spawn_blocking(move || Orchestrator::new(config).generate(&bytes, format))
    .await
    .context("generator thread panicked")??;
  report.statistics(&generation.stats);

  report.info(&format!("Writing to: {}", command.output.display()));
  write_artifacts(&command.output, &generation.artifacts).await?;

  report.info("Successfully generated Rust client module");
  Ok(())
}

/// Writes every artifact into a scratch directory inside `output`, then moves
/// them into place. A failed write leaves the previous files untouched.
pub async fn write_artifacts(output: &Path, artifacts: &Artifacts) -> anyhow::Result<()> {
  tokio::fs::create_dir_all(output)
    .await
    .with_context(|| format!("failed to create {}", output.display()))?;

  let staging = tempfile::Builder::new()
    .prefix(".oas3-client-gen-")
    .tempdir_in(output)
    .with_context(|| format!("failed to create a staging directory in {}", output.display()))?;

  for (name, contents) in artifacts.iter() {
    tokio::fs::write(staging.path().join(name), contents)
      .await
      .with_context(|| format!("failed to write {name}"))?;
  }
  for name in artifacts.names() {
    let target = output.join(name);
    tokio::fs::rename(staging.path().join(name), &target)
      .await
      .with_context(|| format!("failed to move {name} to {}", target.display()))?;
  }

  tracing::debug!(files = artifacts.len(), output = %output.display(), "artifacts written");
  Ok(())
}
