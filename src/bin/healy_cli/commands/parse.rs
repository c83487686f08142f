// ABOUTME: Parse command for healy-cli
// ABOUTME: Reads generated plan text from a file or stdin and exports the parsed records
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Args;
use healy::errors::{AppError, AppResult};
use healy::mealplan::parse_meal_plan;
use tracing::info;

use super::OutputArgs;

/// Flags of the `parse` command
#[derive(Debug, Clone, Args)]
pub struct ParseArgs {
    /// File holding the generated text; reads stdin when omitted
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Cuisine tag stamped on every record
    #[arg(long)]
    pub cuisine: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Parse generated text and write the resulting plan
pub fn run(args: &ParseArgs) -> AppResult<()> {
    let text = read_input(args.input.as_ref())?;
    info!(bytes = text.len(), cuisine = %args.cuisine, "Parsing meal plan text");

    let outcome = parse_meal_plan(&text, args.cuisine.trim());
    let session = args.output.session_for(outcome);
    args.output.write(&session)
}

fn read_input(path: Option<&PathBuf>) -> AppResult<String> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|e| {
            AppError::storage(format!("Cannot read {}: {e}", path.display()))
                .with_resource_id(path.display().to_string())
                .with_source(e)
        }),
        None => {
            let mut text = String::new();
            io::stdin().lock().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
