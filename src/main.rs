//! SmokeGuard - vehicle emission violation detection using AI
//!
//! A CLI tool that analyzes vehicle images for excessive exhaust smoke
//! and records penalty notices for qualifying detections.

use clap::Parser;
use smokeguard::cli::Cli;
use smokeguard::commands;

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
