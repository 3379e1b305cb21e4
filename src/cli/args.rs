//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};

/// statgate - SQL operation-translation gateway
#[derive(Parser, Debug)]
#[command(name = "statgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the gateway server
    Serve {
        /// Override the listen port (default: PORT env or 3000)
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
