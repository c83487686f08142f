// ABOUTME: Core data models for the Healy meal planner
// ABOUTME: Re-exports meal records, meal slots, and nutrition totals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! # Data Models
//!
//! Meal plan data shared by the parser, the session, and the exporters.
//!
//! - `MealRecord`: one validated, immutable meal entry
//! - `MealSlot`: categorical position of a meal within a day
//! - `Nutrient`: the four macro fields every meal line carries
//! - `NutritionTotals`: macro sums over a group of records

mod nutrition;

pub use nutrition::{MealRecord, MealRecordError, MealSlot, Nutrient, NutritionTotals};
