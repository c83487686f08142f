// ABOUTME: Generate command for healy-cli
// ABOUTME: Calls the configured endpoint, parses the plan with retries, and exports it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use std::fs;
use std::path::PathBuf;

use clap::Args;
use healy::config::HealyConfig;
use healy::errors::{AppError, AppResult};
use healy::llm::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
use healy::mealplan::{export::DAY_HEADING_FORMAT, MealPlanSession, NutritionGoals};
use healy::planner::{MealPlanner, PlannerSettings};
use tracing::{info, warn};

use super::{OutputArgs, RequestArgs};

/// Flags of the `generate` command
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Override the configured number of generation attempts
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Also save the raw generated text to this file
    #[arg(long)]
    pub raw_output: Option<PathBuf>,
}

/// Generate a plan, then export it and compare it with the goals
pub async fn run(args: &GenerateArgs) -> AppResult<()> {
    let request = args.request.to_request()?;

    let config = HealyConfig::from_env()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e:#}")))?;
    info!("{}", config.summary());

    let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig::from(&config.llm))?;
    let mut settings = PlannerSettings::from(&config);
    if let Some(max_attempts) = args.max_attempts {
        settings.max_attempts = max_attempts;
    }

    let plan = MealPlanner::new(&provider, settings).generate(&request).await?;
    if !plan.satisfied_policy {
        warn!(
            attempts = plan.attempts,
            records = plan.outcome.records.len(),
            "Keeping best plan despite poor parse yield"
        );
    }

    if let Some(path) = &args.raw_output {
        fs::write(path, &plan.raw_text).map_err(|e| {
            AppError::storage(format!("Cannot write {}: {e}", path.display()))
                .with_resource_id(path.display().to_string())
                .with_source(e)
        })?;
    }

    let session = args.output.session_for(plan.outcome);
    args.output.write(&session)?;
    report_goals(&session, &request.goals());
    Ok(())
}

fn report_goals(session: &MealPlanSession, goals: &NutritionGoals) {
    for day in session.goal_report(goals) {
        eprintln!(
            "Day {} ({}): {} kcal ({:+} vs goal), protein {:.1}g ({:+.1}g)",
            day.day_index,
            day.date.format(DAY_HEADING_FORMAT),
            day.totals.calories,
            day.calorie_delta,
            day.totals.protein_g,
            day.protein_delta_g
        );
    }
}
