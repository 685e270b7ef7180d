use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use oas3_client_gen::{
  Visibility,
  generator::config::{DEFAULT_FETCH_TIMEOUT, DEFAULT_PACKAGE_NAME},
};

#[derive(Parser, Debug)]
#[command(name = "oas3-client-gen")]
#[command(author, version, about = "OpenAPI 3.x to typed Rust client generator")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Log every pipeline stage (overrides OAS3_CLIENT_GEN_LOG)
  #[arg(short, long, default_value_t = false, global = true)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, global = true, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Generate a Rust client module from an OpenAPI document
  Generate(GenerateArgs),
  /// Check that a document can be turned into a client, without writing anything
  Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
  /// Path to the OpenAPI JSON or YAML document
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Allow `$ref`s to documents served over http(s)
  #[arg(long, default_value_t = false)]
  pub allow_remote: bool,

  /// Seconds to wait for a remote document
  #[arg(long, value_name = "SECS", default_value_t = DEFAULT_FETCH_TIMEOUT.as_secs())]
  pub fetch_timeout: u64,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
  #[command(flatten)]
  pub source: SourceArgs,

  /// Directory the generated module is written to
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Package name recorded in the module header
  #[arg(short, long, value_name = "NAME", default_value = DEFAULT_PACKAGE_NAME)]
  pub package_name: String,

  /// Visibility of generated items (public or crate)
  #[arg(long, value_name = "VISIBILITY", default_value = "public")]
  pub visibility: Visibility,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
  #[command(flatten)]
  pub source: SourceArgs,
}
