use std::path::PathBuf;

use anyhow::Context;
use oas3_client_gen::{GeneratorConfig, Orchestrator};

use super::{report::Report, source_config};
use crate::{ui::cli::ValidateArgs, utils::SpecFile};

#[derive(Debug, Clone)]
pub struct ValidateCommand {
  pub input: PathBuf,
  pub config: GeneratorConfig,
  pub quiet: bool,
  pub verbose: bool,
}

impl ValidateCommand {
  pub fn from_args(args: ValidateArgs, quiet: bool, verbose: bool) -> Self {
    Self {
      config: source_config(&args.source),
      input: args.source.input,
      quiet,
      verbose,
    }
  }
}

/// Runs the pipeline up to the type graph and reports whether the document
/// can be generated.
pub async fn validate_spec(command: ValidateCommand) -> anyhow::Result<()> {
  let report = Report::new(command.quiet, command.verbose);

  let spec = SpecFile::open(&command.input).await?;
  let (bytes, format) = (spec.to_bytes(), spec.format());

  let config = command.config.clone();
  let validation = tokio::task::spawn_blocking(move || Orchestrator::new(config).validate(&bytes, format))
    .await
    .context("validator thread panicked")?
    .with_context(|| format!("{} is not a valid OpenAPI document", command.input.display()))?;

  report.info(&format!(
    "{} is valid: {} (version {})",
    command.input.display(),
    validation.title,
    validation.version
  ));
  report.statistics(&validation.stats);
  Ok(())
}
