pub mod generate;
mod report;
pub mod validate;

pub use generate::{GenerateCommand, generate_code};
pub use validate::{ValidateCommand, validate_spec};

use std::{path::Path, time::Duration};

use oas3_client_gen::GeneratorConfig;

use crate::ui::cli::SourceArgs;

/// Config derived from the input flags. Relative `$ref`s resolve against the
/// directory of the input document.
fn source_config(source: &SourceArgs) -> GeneratorConfig {
  let base_dir = source
    .input
    .parent()
    .filter(|dir| !dir.as_os_str().is_empty())
    .unwrap_or(Path::new("."));
  GeneratorConfig::builder()
    .base_dir(base_dir)
    .allow_remote(source.allow_remote)
    .fetch_timeout(Duration::from_secs(source.fetch_timeout))
    .build()
}
