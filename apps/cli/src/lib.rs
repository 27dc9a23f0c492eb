//! Colloquy CLI

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
pub use {
    inspect::{InspectCmd, describe},
    run::{RunCmd, render},
};

mod inspect;
mod run;

/// Run turn-based multi-agent conversation experiments.
#[derive(Debug, Parser)]
#[command(name = "colloquy", version, about)]
pub struct App {
    /// Verbosity level (use -v, -vv, -vvv, etc.)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run an experiment file
    Run(RunCmd),

    /// Print the transcripts stored in a session snapshot
    Inspect(InspectCmd),
}

impl App {
    /// Initialize tracing subscriber based on verbosity
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let directive = match self.verbose {
                0 => "info",
                1 => "colloquy_runtime=debug,colloquy_core=debug",
                2 => "colloquy_runtime=trace,colloquy_core=trace",
                3 => "debug",
                _ => "trace",
            };
            EnvFilter::new(directive)
        });

        fmt()
            .without_time()
            .with_env_filter(filter)
            .with_target(self.verbose != 0)
            .with_writer(std::io::stderr)
            .init();
    }

    /// Run the selected command.
    pub fn run(&self) -> anyhow::Result<()> {
        match &self.command {
            Command::Run(cmd) => cmd.run(),
            Command::Inspect(cmd) => cmd.run(),
        }
    }
}
