//! CLI argument parsing.

use clap::{Parser, Subcommand};

/// flightwatch — polls a flight data provider and serves delay metrics.
#[derive(Parser, Debug)]
#[command(name = "flightwatch", version, about)]
pub struct Cli {
    /// Config profile; keys are looked up as `{PROFILE}_{KEY}` first.
    #[arg(long, env = "FLIGHTWATCH_PROFILE", default_value = "")]
    pub profile: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the poller in the background and serve the query API (default).
    Serve {
        /// Serve stored data without polling the provider.
        #[arg(long)]
        no_poll: bool,
    },
    /// Run the poller only, until interrupted.
    Poll,
    /// Run a single polling cycle and print its report as JSON.
    RunOnce,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Serve { no_poll: false })
    }
}
