use clap::{Parser, Subcommand};

/// HTTP API for job postings
#[derive(Debug, Parser)]
#[command(name = "jobs-api", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Apply pending migrations, then serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
}

impl Cli {
    /// The subcommand to run, `serve` when none was given
    pub fn command(&self) -> &Command {
        self.command.as_ref().unwrap_or(&Command::Serve)
    }
}
