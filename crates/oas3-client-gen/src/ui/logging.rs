use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "OAS3_CLIENT_GEN_LOG";

/// Installs the global subscriber. Logs go to stderr so stdout only carries
/// the command's own report.
pub fn init(verbose: bool, quiet: bool) {
  let filter = if verbose {
    EnvFilter::new("oas3_client_gen=debug")
  } else if quiet {
    EnvFilter::new("oas3_client_gen=error")
  } else {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("oas3_client_gen=info"))
  };

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .init();
}
