//! Generates typed Rust HTTP clients from OpenAPI 3.x documents.
//!
//! A document passes through the loader, the reference resolver, `allOf`
//! composition and the type graph builder before a [`Backend`] renders it.
//! [`Orchestrator`] runs those stages in order and reports where a run stopped.
//!
//! [`Backend`]: generator::emit::Backend
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod generator;
pub(crate) mod naming;

pub use error::{ErrorKind, GenerationError};
pub use generator::{
  config::GeneratorConfig,
  emit::{Artifacts, Backend, RustBackend, Visibility},
  loader::SpecFormat,
  metrics::{GenerationStats, GenerationWarning},
  pipeline::{Generation, Orchestrator, PipelineFailure, PipelineState, Stage, Validation},
};
