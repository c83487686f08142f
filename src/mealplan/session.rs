// ABOUTME: Explicit meal plan session holding the accepted plan for one caller
// ABOUTME: Maps day indices to calendar dates and totals macros against daily goals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use std::collections::BTreeMap;

use chrono::{DateTime, Days, NaiveDate, Utc};
use healy_core::models::{MealRecord, NutritionTotals};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::parser::{ParseOutcome, ParseWarning};

/// Daily calorie and protein targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NutritionGoals {
    /// Target kilocalories per day
    pub daily_calories: u32,
    /// Target protein grams per day
    pub daily_protein_g: f64,
}

/// Meals of one plan day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    /// 1-based day index
    pub day_index: u32,
    /// Calendar date of the day
    pub date: NaiveDate,
    /// Meals in input order
    pub meals: Vec<MealRecord>,
    /// Macro sums over `meals`
    pub totals: NutritionTotals,
}

/// One day's totals compared with the goals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayGoalReport {
    /// 1-based day index
    pub day_index: u32,
    /// Calendar date of the day
    pub date: NaiveDate,
    /// Macro sums for the day
    pub totals: NutritionTotals,
    /// Planned calories minus the goal; negative means under target
    pub calorie_delta: i64,
    /// Planned protein minus the goal, in grams
    pub protein_delta_g: f64,
}

impl DayGoalReport {
    /// Whether planned calories are within `tolerance` (a fraction, e.g. 0.1) of the goal
    #[must_use]
    pub fn calories_within(&self, tolerance: f64, goals: &NutritionGoals) -> bool {
        let allowed = f64::from(goals.daily_calories) * tolerance;
        (self.calorie_delta as f64).abs() <= allowed
    }

    /// Whether planned protein reaches the goal
    #[must_use]
    pub fn meets_protein_goal(&self) -> bool {
        self.protein_delta_g >= 0.0
    }
}

/// The accepted meal plan of one caller
///
/// Accepting a new outcome replaces the previous plan entirely; the parser
/// never reads or writes a session.
#[derive(Debug, Clone)]
pub struct MealPlanSession {
    start_date: NaiveDate,
    plan_id: Option<Uuid>,
    accepted_at: Option<DateTime<Utc>>,
    outcome: ParseOutcome,
}

impl MealPlanSession {
    /// Empty session whose day 1 falls on `start_date`
    #[must_use]
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            plan_id: None,
            accepted_at: None,
            outcome: ParseOutcome::default(),
        }
    }

    /// Empty session starting today (UTC)
    #[must_use]
    pub fn starting_today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    /// Date of day 1
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Identifier of the current plan, if one has been accepted
    #[must_use]
    pub const fn plan_id(&self) -> Option<Uuid> {
        self.plan_id
    }

    /// When the current plan was accepted
    #[must_use]
    pub const fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Replace the current plan with a new parse outcome
    ///
    /// Returns the fresh plan identifier.
    pub fn accept(&mut self, outcome: ParseOutcome) -> Uuid {
        let plan_id = Uuid::new_v4();
        info!(
            %plan_id,
            records = outcome.records.len(),
            warnings = outcome.warnings.len(),
            replaced = self.plan_id.is_some(),
            "Accepted meal plan"
        );
        self.plan_id = Some(plan_id);
        self.accepted_at = Some(Utc::now());
        self.outcome = outcome;
        plan_id
    }

    /// Drop the current plan
    pub fn clear(&mut self) {
        if let Some(plan_id) = self.plan_id.take() {
            info!(%plan_id, "Cleared meal plan");
        }
        self.accepted_at = None;
        self.outcome = ParseOutcome::default();
    }

    /// Records of the current plan, in input order
    #[must_use]
    pub fn records(&self) -> &[MealRecord] {
        &self.outcome.records
    }

    /// Warnings produced while parsing the current plan
    #[must_use]
    pub fn warnings(&self) -> &[ParseWarning] {
        &self.outcome.warnings
    }

    /// The full parse outcome of the current plan
    #[must_use]
    pub const fn outcome(&self) -> &ParseOutcome {
        &self.outcome
    }

    /// True when no records are held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcome.records.is_empty()
    }

    /// Calendar date for a 1-based day index
    ///
    /// Day 0 is treated as day 1. Dates beyond the calendar range saturate.
    #[must_use]
    pub fn date_for(&self, day_index: u32) -> NaiveDate {
        let offset = u64::from(day_index.saturating_sub(1));
        self.start_date
            .checked_add_days(Days::new(offset))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Meals grouped by day, ordered by day index
    ///
    /// Days without any parsed meal are omitted.
    #[must_use]
    pub fn days(&self) -> Vec<DayPlan> {
        let mut grouped: BTreeMap<u32, Vec<MealRecord>> = BTreeMap::new();
        for record in &self.outcome.records {
            grouped
                .entry(record.day_index())
                .or_default()
                .push(record.clone());
        }

        grouped
            .into_iter()
            .map(|(day_index, meals)| DayPlan {
                day_index,
                date: self.date_for(day_index),
                totals: NutritionTotals::from_records(&meals),
                meals,
            })
            .collect()
    }

    /// Per-day totals compared against the goals
    #[must_use]
    pub fn goal_report(&self, goals: &NutritionGoals) -> Vec<DayGoalReport> {
        self.days()
            .into_iter()
            .map(|day| DayGoalReport {
                day_index: day.day_index,
                date: day.date,
                totals: day.totals,
                calorie_delta: i64::try_from(day.totals.calories)
                    .unwrap_or(i64::MAX)
                    .saturating_sub(i64::from(goals.daily_calories)),
                protein_delta_g: day.totals.protein_g - goals.daily_protein_g,
            })
            .collect()
    }
}
