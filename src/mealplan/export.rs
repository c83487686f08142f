// ABOUTME: Exporters for an accepted meal plan session
// ABOUTME: Writes CSV rows, a JSON document, or a per-day plain-text table
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use chrono::NaiveDate;
use csv::WriterBuilder;
use healy_core::errors::{AppError, AppResult};
use healy_core::models::{MealRecord, NutritionTotals};
use serde::Serialize;
use uuid::Uuid;

use super::parser::ParseWarning;
use super::session::{DayPlan, MealPlanSession};

/// Date format of day headings in the text table
pub const DAY_HEADING_FORMAT: &str = "%A, %B %d";

/// Output format for a meal plan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Human-readable per-day table
    #[default]
    Table,
    /// One CSV row per meal
    Csv,
    /// Pretty-printed JSON document
    Json,
}

impl ExportFormat {
    /// Lowercase format name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "table" | "text" => Ok(Self::Table),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(AppError::invalid_input(format!(
                "Unknown export format '{other}' (expected table, csv or json)"
            ))),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Day")]
    day: u32,
    #[serde(rename = "Meal")]
    meal: &'a str,
    #[serde(rename = "Food")]
    food: &'a str,
    #[serde(rename = "Calories")]
    calories: u32,
    #[serde(rename = "Protein")]
    protein: f64,
    #[serde(rename = "Carbs")]
    carbs: f64,
    #[serde(rename = "Fat")]
    fat: f64,
    #[serde(rename = "Cuisine")]
    cuisine: &'a str,
    created_at: String,
}

impl<'a> CsvRow<'a> {
    fn new(record: &'a MealRecord, date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            day: record.day_index(),
            meal: record.meal_slot().as_str(),
            food: record.dish_name(),
            calories: record.calories(),
            protein: record.protein_g(),
            carbs: record.carbs_g(),
            fat: record.fat_g(),
            cuisine: record.cuisine(),
            created_at: record.created_at().to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    plan_id: Option<Uuid>,
    start_date: NaiveDate,
    days: Vec<DayPlan>,
    plan_totals: NutritionTotals,
    warnings: &'a [ParseWarning],
}

/// Write one CSV row per meal, with a header row
///
/// # Errors
///
/// Returns `SerializationError` if a row cannot be written.
pub fn write_csv<W: Write>(session: &MealPlanSession, writer: W) -> AppResult<()> {
    let mut csv = WriterBuilder::new().from_writer(writer);
    if session.is_empty() {
        csv.write_record([
            "Date", "Day", "Meal", "Food", "Calories", "Protein", "Carbs", "Fat", "Cuisine",
            "created_at",
        ])
        .map_err(csv_error)?;
    }
    for record in session.records() {
        let date = session.date_for(record.day_index());
        csv.serialize(CsvRow::new(record, date)).map_err(csv_error)?;
    }
    csv.flush()?;
    Ok(())
}

fn csv_error(error: csv::Error) -> AppError {
    AppError::serialization(format!("Failed to write CSV row: {error}")).with_source(error)
}

/// Write the plan as a pretty-printed JSON document
///
/// # Errors
///
/// Returns `SerializationError` if serialization fails.
pub fn write_json<W: Write>(session: &MealPlanSession, writer: W) -> AppResult<()> {
    let document = JsonDocument {
        plan_id: session.plan_id(),
        start_date: session.start_date(),
        days: session.days(),
        plan_totals: NutritionTotals::from_records(session.records()),
        warnings: session.warnings(),
    };
    serde_json::to_writer_pretty(writer, &document)?;
    Ok(())
}

/// Render the plan as a plain-text table, one block per day
#[must_use]
pub fn render_table(session: &MealPlanSession) -> String {
    let mut out = String::new();
    let days = session.days();
    if days.is_empty() {
        out.push_str("No meals parsed.\n");
        return out;
    }

    let food_width = session
        .records()
        .iter()
        .map(|r| r.dish_name().chars().count())
        .max()
        .unwrap_or(0)
        .max("Food".len());
    let meal_width = session
        .records()
        .iter()
        .map(|r| r.meal_slot().as_str().chars().count())
        .max()
        .unwrap_or(0)
        .max("Meal".len());

    for day in &days {
        out.push_str(&format!(
            "{} (Day {})\n",
            day.date.format(DAY_HEADING_FORMAT),
            day.day_index
        ));
        out.push_str(&format!(
            "  {:<meal_width$}  {:<food_width$}  {:>8}  {:>8}  {:>8}  {:>8}\n",
            "Meal", "Food", "Calories", "Protein", "Carbs", "Fat"
        ));
        for meal in &day.meals {
            out.push_str(&format!(
                "  {:<meal_width$}  {:<food_width$}  {:>8}  {:>7.1}g  {:>7.1}g  {:>7.1}g\n",
                meal.meal_slot().as_str(),
                meal.dish_name(),
                meal.calories(),
                meal.protein_g(),
                meal.carbs_g(),
                meal.fat_g()
            ));
        }
        out.push_str(&format!(
            "  {:<meal_width$}  {:<food_width$}  {:>8}  {:>7.1}g  {:>7.1}g  {:>7.1}g\n",
            "Total",
            "",
            day.totals.calories,
            day.totals.protein_g,
            day.totals.carbs_g,
            day.totals.fat_g
        ));
        out.push_str("---\n");
    }
    out
}

/// Write the session in the requested format
///
/// # Errors
///
/// Returns an error if the writer fails or serialization fails.
pub fn export<W: Write>(
    session: &MealPlanSession,
    format: ExportFormat,
    mut writer: W,
) -> AppResult<()> {
    match format {
        ExportFormat::Table => {
            writer.write_all(render_table(session).as_bytes())?;
            writer.flush()?;
            Ok(())
        }
        ExportFormat::Csv => write_csv(session, writer),
        ExportFormat::Json => write_json(session, writer),
    }
}
