// ABOUTME: Meal plan module turning generated plan text into structured meal records
// ABOUTME: Grammar, parser, session state, and exporters for parsed plans
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! # Meal Plans
//!
//! Generated meal plans arrive as loosely structured text, one day header
//! followed by pipe-delimited meal lines:
//!
//! ```text
//! Day 1:
//! Breakfast: Poha | Calories: 300 | Protein: 8g | Carbs: 50g | Fat: 7g
//! ```
//!
//! [`parse_meal_plan`] never fails on such text. Lines it cannot read are
//! returned as [`ParseWarning`]s next to the records it could read, and text
//! without any day header yields a single `no-day-delimiter` warning.
//!
//! [`MealPlanSession`] holds an accepted plan for one caller and [`export`]
//! writes it as a table, CSV or JSON.

pub mod export;
pub mod grammar;
pub mod parser;
pub mod session;

pub use export::{export, render_table, write_csv, write_json, ExportFormat};
pub use parser::{
    parse_line, parse_meal_plan, parse_meal_plan_at, LineOutcome, ParseOutcome, ParseWarning,
    WarningKind, YieldPolicy,
};
pub use session::{DayGoalReport, DayPlan, MealPlanSession, NutritionGoals};
