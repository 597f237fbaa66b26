use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "surety-node")]
#[command(about = "Flight insurance registry with airline governance and oracle consensus")]
pub struct Cli {
    /// Registry configuration (JSON)
    #[arg(long, value_name = "FILE", default_value = "surety.json")]
    pub config: PathBuf,

    /// Also write audit records (funding, admissions, credits) to this file
    #[arg(long, value_name = "FILE")]
    pub audit_log: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Run the registry in-process with a simulated oracle feeder
    Simulate {
        /// Number of simulated oracles to register
        #[arg(long, default_value_t = 20)]
        oracles: usize,
        /// Status code every oracle reports (0, 10, 20, 30, 40, 50)
        #[arg(long, default_value_t = 20)]
        status_code: u8,
        /// Let each oracle pick a random status instead
        #[arg(long)]
        random_status: bool,
        /// Number of flights to query
        #[arg(long, default_value_t = 1)]
        flights: usize,
        /// Overrides the index seed from the configuration
        #[arg(long)]
        seed: Option<u64>,
        /// Give up waiting for resolutions after this many seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}
