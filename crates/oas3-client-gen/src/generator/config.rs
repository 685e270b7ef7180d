use std::{path::PathBuf, time::Duration};

use super::{emit::Visibility, loader::fetch::DefaultFetcher};

pub const DEFAULT_PACKAGE_NAME: &str = "generated_client";
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, bon::Builder)]
pub struct GeneratorConfig {
  /// Name recorded in the generated module header.
  #[builder(default = DEFAULT_PACKAGE_NAME.to_string(), into)]
  pub package_name: String,
  #[builder(default)]
  pub visibility: Visibility,
  /// Whether `$ref`s may point at `http(s)` documents.
  #[builder(default)]
  pub allow_remote: bool,
  #[builder(default = DEFAULT_FETCH_TIMEOUT)]
  pub fetch_timeout: Duration,
  /// Directory relative file references are resolved against.
  #[builder(default = PathBuf::from("."), into)]
  pub base_dir: PathBuf,
}

impl Default for GeneratorConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl GeneratorConfig {
  pub(crate) fn fetcher(&self) -> DefaultFetcher {
    DefaultFetcher::new(&self.base_dir, self.allow_remote.then_some(self.fetch_timeout))
  }
}
