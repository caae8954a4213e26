//! Moneybox CLI
//!
//! Loads accounts from CSV, applies a CSV of withdraw/transfer
//! instructions and writes the final account states to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- accounts.csv instructions.csv > final.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info` to see notifications, `debug` or `warn` to
//!   control logging verbosity

use log::info;
use moneybox::{
    Error, InMemoryAccountRepository, InstructionProcessor, LogNotificationService, Result,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(Error::MissingArgument);
    }

    let accounts_file = File::open(&args[1])?;
    let repository = InMemoryAccountRepository::load_csv(BufReader::new(accounts_file))?;
    info!("Loaded {} accounts from {}", repository.len(), args[1]);

    let notifications = LogNotificationService::new();
    let processor = InstructionProcessor::new(&repository, &notifications);

    let instructions_file = File::open(&args[2])?;
    let summary = processor.process_csv(BufReader::new(instructions_file))?;
    info!(
        "Applied {} instructions, rejected {}",
        summary.applied, summary.rejected
    );

    let stdout = io::stdout();
    let handle = stdout.lock();
    repository.write_csv(handle)?;

    Ok(())
}
