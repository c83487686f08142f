// ABOUTME: Healy CLI - command-line tool for generating and parsing meal plans
// ABOUTME: Parses generated plan text, renders prompts, and runs end-to-end generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion
//!
//! Usage:
//! ```bash
//! # Parse a saved model reply into a per-day table
//! healy-cli parse --input plan.txt --cuisine Indian
//!
//! # Parse from stdin and export CSV
//! cat plan.txt | healy-cli parse --cuisine Italian --format csv --output plan.csv
//!
//! # Show the prompt that would be sent
//! healy-cli prompt --cuisine mexican --diet non-veg --calories 2200 --protein 120
//!
//! # Generate, parse and export in one step (reads HEALY_LLM_* variables)
//! healy-cli generate --cuisine indian --diet veg --format json
//! ```

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use healy::errors::AppResult;
use healy::logging::LoggingConfig;

use commands::{GenerateArgs, ParseArgs, RequestArgs};

#[derive(Parser)]
#[command(
    name = "healy-cli",
    version,
    about = "Healy meal plan CLI",
    long_about = "Generate diet plans with a chat-completion model and turn the generated text into structured meal records."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse generated meal plan text into records
    Parse(ParseArgs),

    /// Print the generation prompt for a diet plan request
    Prompt(RequestArgs),

    /// Generate a plan with the configured endpoint, then parse and export it
    Generate(GenerateArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    if let Err(e) = logging.init() {
        eprintln!("Warning: {e}");
    }

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::from(u8::try_from(error.exit_code()).unwrap_or(1))
        }
    }
}

async fn run(command: Command) -> AppResult<()> {
    match command {
        Command::Parse(args) => commands::parse::run(&args),
        Command::Prompt(args) => commands::prompt::run(&args),
        Command::Generate(args) => commands::generate::run(&args).await,
    }
}
