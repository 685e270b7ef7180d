#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Commands};

mod ui;
mod utils;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  ui::logging::init(cli.verbose, cli.quiet);

  match cli.command {
    Commands::Generate(args) => {
      let command = ui::commands::GenerateCommand::from_args(args, cli.quiet, cli.verbose)?;
      ui::commands::generate_code(command).await?;
    }
    Commands::Validate(args) => {
      let command = ui::commands::ValidateCommand::from_args(args, cli.quiet, cli.verbose);
      ui::commands::validate_spec(command).await?;
    }
  }

  Ok(())
}
