//! Drives a document through every stage of generation.
//!
//! An [`Orchestrator`] owns one run at a time and records how far it got:
//!
//! ```text
//! Start -> Loaded -> Resolved -> Composed -> Built -> Emitted
//! ```
//!
//! Any stage error stops the run and leaves the orchestrator in
//! [`PipelineState::Failed`]. Nothing is retried.
//!
//! ## Usage
//!
//! ```no_run
//! use oas3_client_gen::generator::{
//!   config::GeneratorConfig,
//!   loader::SpecFormat,
//!   pipeline::Orchestrator,
//! };
//!
//! # fn example() -> anyhow::Result<()> {
//! let bytes = std::fs::read("openapi.yaml")?;
//! let config = GeneratorConfig::builder().package_name("petstore").build();
//!
//! let mut orchestrator = Orchestrator::new(config);
//! let generation = orchestrator.generate(&bytes, SpecFormat::Yaml)?;
//!
//! for (name, contents) in generation.artifacts.iter() {
//!   std::fs::write(name, contents)?;
//! }
//! println!("{} types, {} warnings", generation.stats.types_generated, generation.stats.warnings.len());
//! # Ok(())
//! # }
//! ```

use strum::Display;

#[cfg(test)]
mod tests;

use super::{
  compose::compose,
  config::GeneratorConfig,
  emit::{Artifacts, Backend, ClientIr, RustBackend},
  loader::{SpecFormat, SpecLoader},
  metrics::GenerationStats,
  resolver::Resolver,
  types::{TypeGraph, TypeGraphBuilder},
};
use crate::error::{GenerationError, Result};

/// The unit of work that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
  Load,
  Resolve,
  Compose,
  Build,
  Emit,
}

impl Stage {
  const fn completed(self) -> PipelineState {
    match self {
      Self::Load => PipelineState::Loaded,
      Self::Resolve => PipelineState::Resolved,
      Self::Compose => PipelineState::Composed,
      Self::Build => PipelineState::Built,
      Self::Emit => PipelineState::Emitted,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PipelineState {
  #[default]
  Start,
  Loaded,
  Resolved,
  Composed,
  Built,
  Emitted,
  Failed { stage: Stage, error: GenerationError },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed: {error}")]
pub struct PipelineFailure {
  pub stage: Stage,
  #[source]
  pub error: GenerationError,
}

/// Output of a successful `generate` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generation {
  pub artifacts: Artifacts,
  pub stats: GenerationStats,
}

/// Output of a successful `validate` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
  pub title: String,
  pub version: String,
  pub stats: GenerationStats,
}

pub struct Orchestrator {
  config: GeneratorConfig,
  state: PipelineState,
}

impl Orchestrator {
  #[must_use]
  pub fn new(config: GeneratorConfig) -> Self {
    Self {
      config,
      state: PipelineState::Start,
    }
  }

  #[must_use]
  pub fn config(&self) -> &GeneratorConfig {
    &self.config
  }

  /// Where the last run stopped.
  #[must_use]
  pub fn state(&self) -> &PipelineState {
    &self.state
  }

  /// Runs every stage and renders the client with the Rust backend.
  pub fn generate(&mut self, bytes: &[u8], format: SpecFormat) -> Result<Generation, PipelineFailure> {
    let backend = RustBackend::new(self.config.visibility);
    self.generate_with(&backend, bytes, format)
  }

  #[tracing::instrument(skip_all, name = "generate", fields(backend = backend.name()))]
  pub fn generate_with(
    &mut self,
    backend: &dyn Backend,
    bytes: &[u8],
    format: SpecFormat,
  ) -> Result<Generation, PipelineFailure> {
    let (graph, mut stats) = self.build(bytes, format)?;
    let package_name = self.config.package_name.clone();

    let artifacts = self.step(Stage::Emit, || {
      let (ir, warnings) = ClientIr::lower(&graph, &package_name)?;
      stats.record_warnings(warnings);
      backend.render(&ir)
    })?;

    log_summary(&stats);
    Ok(Generation { artifacts, stats })
  }

  /// Runs every stage up to the type graph, without emitting anything.
  #[tracing::instrument(skip_all, name = "validate")]
  pub fn validate(&mut self, bytes: &[u8], format: SpecFormat) -> Result<Validation, PipelineFailure> {
    let (graph, stats) = self.build(bytes, format)?;
    log_summary(&stats);
    Ok(Validation {
      title: graph.info.title.clone(),
      version: graph.info.version.clone(),
      stats,
    })
  }

  fn build(&mut self, bytes: &[u8], format: SpecFormat) -> Result<(TypeGraph, GenerationStats), PipelineFailure> {
    self.state = PipelineState::Start;
    let mut stats = GenerationStats::default();
    let fetcher = self.config.fetcher();

    let spec = self.step(Stage::Load, || SpecLoader::new(&fetcher).load(bytes, format))?;
    let (graph, mut ctx) = self.step(Stage::Resolve, || Resolver::new(&spec).resolve())?;
    stats.record_cycles(graph.cycles.iter().map(|cycle| {
      let named: Vec<String> = cycle.iter().filter_map(|p| ctx.names.get(p).map(str::to_string)).collect();
      if named.is_empty() {
        cycle.iter().map(ToString::to_string).collect()
      } else {
        named
      }
    }));

    let definitions = self.step(Stage::Compose, || compose(&graph, &mut ctx))?;
    let types = self.step(Stage::Build, || TypeGraphBuilder::new(&graph).build(definitions, &mut ctx))?;

    stats.record_graph(&types);
    stats.record_warnings(ctx.warnings);
    Ok((types, stats))
  }

  fn step<T>(&mut self, stage: Stage, run: impl FnOnce() -> Result<T>) -> Result<T, PipelineFailure> {
    let span = tracing::debug_span!("stage", %stage);
    let _guard = span.enter();

    match run() {
      Ok(value) => {
        self.state = stage.completed();
        tracing::debug!(state = ?self.state, "stage completed");
        Ok(value)
      }
      Err(error) => {
        tracing::error!(kind = %error.kind(), path = error.path(), "{error}");
        self.state = PipelineState::Failed {
          stage,
          error: error.clone(),
        };
        Err(PipelineFailure { stage, error })
      }
    }
  }
}

fn log_summary(stats: &GenerationStats) {
  for warning in &stats.warnings {
    tracing::warn!("{warning}");
  }
  tracing::info!(
    types = stats.types_generated,
    operations = stats.operations_converted,
    cycles = stats.cycles_detected,
    warnings = stats.warnings.len(),
    "pipeline finished"
  );
}
