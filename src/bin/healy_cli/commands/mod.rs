// ABOUTME: Command modules and shared arguments for healy-cli
// ABOUTME: Request flags, output flags, and helpers for writing sessions and warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

pub mod generate;
pub mod parse;
pub mod prompt;

pub use generate::GenerateArgs;
pub use parse::ParseArgs;

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use clap::{Args, ValueEnum};
use healy::constants::plan_limits;
use healy::errors::{AppError, AppResult};
use healy::mealplan::{export, ExportFormat, MealPlanSession, ParseOutcome};
use healy::prompts::{Cuisine, DietPlanRequest, DietType};

/// Output format flag values
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Per-day text table
    #[default]
    Table,
    /// CSV rows
    Csv,
    /// JSON document
    Json,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Table => Self::Table,
            OutputFormat::Csv => Self::Csv,
            OutputFormat::Json => Self::Json,
        }
    }
}

/// Flags describing a diet plan request
#[derive(Debug, Clone, Args)]
pub struct RequestArgs {
    /// Cuisine: indian, italian, chinese, mexican or mediterranean
    #[arg(long, value_parser = parse_cuisine)]
    pub cuisine: Cuisine,

    /// Diet: veg or non-veg
    #[arg(long, value_parser = parse_diet, default_value = "veg")]
    pub diet: DietType,

    /// Daily calorie goal
    #[arg(long, default_value_t = plan_limits::DEFAULT_DAILY_CALORIES)]
    pub calories: u32,

    /// Daily protein goal in grams
    #[arg(long, default_value_t = plan_limits::DEFAULT_DAILY_PROTEIN_G)]
    pub protein: u32,

    /// Number of plan days
    #[arg(long, default_value_t = plan_limits::DEFAULT_PLAN_DAYS)]
    pub days: u32,
}

impl RequestArgs {
    /// Validated request built from the flags
    pub fn to_request(&self) -> AppResult<DietPlanRequest> {
        let request = DietPlanRequest {
            cuisine: self.cuisine,
            diet: self.diet,
            daily_calories: self.calories,
            daily_protein_g: self.protein,
            days: self.days,
        };
        request.validate()?;
        Ok(request)
    }
}

/// Flags controlling where and how a plan is written
#[derive(Debug, Clone, Args)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Date of day 1 (YYYY-MM-DD); defaults to today
    #[arg(long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Do not print per-line parse warnings to stderr
    #[arg(long)]
    pub quiet_warnings: bool,
}

impl OutputArgs {
    /// Session holding `outcome`, starting on the requested date
    pub fn session_for(&self, outcome: ParseOutcome) -> MealPlanSession {
        let start = self.start_date.unwrap_or_else(|| Utc::now().date_naive());
        let mut session = MealPlanSession::new(start);
        session.accept(outcome);
        session
    }

    /// Report warnings, then export the session to the chosen destination
    pub fn write(&self, session: &MealPlanSession) -> AppResult<()> {
        report_warnings(session, self.quiet_warnings);

        let format = ExportFormat::from(self.format);
        match &self.output {
            Some(path) => {
                let file = File::create(path).map_err(|e| {
                    AppError::storage(format!("Cannot create {}: {e}", path.display()))
                        .with_resource_id(path.display().to_string())
                        .with_source(e)
                })?;
                export(session, format, BufWriter::new(file))?;
                eprintln!(
                    "Wrote {} meals to {}",
                    session.records().len(),
                    path.display()
                );
                Ok(())
            }
            None => export(session, format, io::stdout().lock()),
        }
    }
}

/// Print a parse summary and, unless quiet, every warning to stderr
fn report_warnings(session: &MealPlanSession, quiet: bool) {
    let outcome = session.outcome();
    if outcome.is_structurally_empty() {
        eprintln!("No day headers found; nothing was parsed.");
        return;
    }

    let days = session.days().len();
    eprintln!(
        "Parsed {} meals across {days} days ({} warnings).",
        outcome.records.len(),
        outcome.warnings.len()
    );
    if !quiet {
        for warning in &outcome.warnings {
            eprintln!("warning: {warning}");
        }
    }
}

fn parse_cuisine(value: &str) -> Result<Cuisine, String> {
    value.parse().map_err(|e: AppError| e.message)
}

fn parse_diet(value: &str) -> Result<DietType, String> {
    value.parse().map_err(|e: AppError| e.message)
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{value}': {e}"))
}
