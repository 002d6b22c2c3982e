//! `aescrypt` — command-line entry point.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from `AESCRYPT_*` environment variables.
//! 3. Initialise structured JSON logging.
//! 4. Run the command and print its output.

use anyhow::Result;
use clap::Parser;

use aescrypt::cli::Cli;
use aescrypt::config::Config;
use aescrypt::telemetry;

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Command line
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    // Telemetry is not yet up; a returned error is printed to stderr by anyhow.
    let cfg = Config::from_env()?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let output = cli.command.run(&cfg)?;
    println!("{output}");
    Ok(())
}
