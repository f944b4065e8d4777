//! Seqpad CLI - edit and render sequence diagrams in the terminal

mod cli;
mod term;

use clap::Parser;
use seqpad::core::logging::init_logging;

fn main() {
    let cli_args = cli::Cli::parse();

    // Early init so startup paths can log; run() reapplies the CLI flags.
    if let Err(e) = init_logging(None, None) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let mut app = cli::SeqpadApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
