// ABOUTME: Prompt command for healy-cli
// ABOUTME: Prints the generation prompt rendered for a diet plan request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use healy::errors::AppResult;
use healy::prompts::build_meal_plan_prompt;

use super::RequestArgs;

/// Validate the request flags and print the prompt to stdout
pub fn run(args: &RequestArgs) -> AppResult<()> {
    let request = args.to_request()?;
    print!("{}", build_meal_plan_prompt(&request));
    Ok(())
}
