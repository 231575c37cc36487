//! CLI argument parsing

use crate::commands::{self, RunArgs, SchemaArgs};
use clap::{Parser, Subcommand};

/// custform - drive the customer form from the terminal
#[derive(Parser, Debug)]
#[command(name = "custform")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a JSON event script against the form
    Run(RunArgs),

    /// Print the default form value
    Schema(SchemaArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Run(args) => commands::run_script(args).await,
            Commands::Schema(args) => commands::print_schema(args),
        }
    }
}
