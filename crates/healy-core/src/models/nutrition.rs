// ABOUTME: Meal plan models produced by the meal-plan text parser
// ABOUTME: MealRecord, MealSlot, Nutrient, and NutritionTotals definitions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use thiserror::Error;

/// Categorical position of a meal within a day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MealSlot {
    /// Breakfast meal
    Breakfast,
    /// Lunch meal
    Lunch,
    /// Dinner meal
    Dinner,
    /// Snack between meals
    Snack,
    /// A labelled slot outside the standard four (e.g. "Pre-workout")
    Other(String),
    /// The line carried no slot label at all
    Unknown,
}

impl MealSlot {
    /// Classify a slot label, case-insensitively
    ///
    /// Empty labels map to `Unknown`; unrecognised labels are kept verbatim
    /// as `Other`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        match label.to_lowercase().as_str() {
            "" | "unknown" => Self::Unknown,
            "breakfast" => Self::Breakfast,
            "lunch" => Self::Lunch,
            "dinner" | "supper" => Self::Dinner,
            "snack" | "snacks" => Self::Snack,
            _ => Self::Other(label.to_owned()),
        }
    }

    /// Display label
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
            Self::Snack => "Snack",
            Self::Other(label) => label,
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MealSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The four macro fields of a meal line, in prompt order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    /// Energy in kilocalories
    Calories,
    /// Protein in grams
    Protein,
    /// Carbohydrates in grams
    Carbs,
    /// Fat in grams
    Fat,
}

impl Nutrient {
    /// Label used in generated text
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Calories => "Calories",
            Self::Protein => "Protein",
            Self::Carbs => "Carbs",
            Self::Fat => "Fat",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a `MealRecord` cannot be constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MealRecordError {
    /// Dish name is empty after trimming
    #[error("dish name is empty")]
    EmptyDish,
    /// A gram value is negative or not finite
    #[error("{nutrient} must be a finite, non-negative amount")]
    InvalidNutrient {
        /// The offending nutrient
        nutrient: Nutrient,
    },
}

/// One parsed meal entry
///
/// Fields are private so a record cannot change after construction.
/// Equality ignores `created_at`, which is informational only.
#[derive(Debug, Clone, Serialize)]
pub struct MealRecord {
    day_index: NonZeroU32,
    meal_slot: MealSlot,
    dish_name: String,
    calories: u32,
    protein_g: f64,
    carbs_g: f64,
    fat_g: f64,
    cuisine: String,
    created_at: DateTime<Utc>,
}

impl MealRecord {
    /// Build a validated record
    ///
    /// # Errors
    ///
    /// Returns `MealRecordError::EmptyDish` if the dish is blank, or
    /// `MealRecordError::InvalidNutrient` if a gram value is negative, NaN or
    /// infinite.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        day_index: NonZeroU32,
        meal_slot: MealSlot,
        dish_name: &str,
        calories: u32,
        protein_g: f64,
        carbs_g: f64,
        fat_g: f64,
        cuisine: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, MealRecordError> {
        let dish_name = dish_name.trim();
        if dish_name.is_empty() {
            return Err(MealRecordError::EmptyDish);
        }

        for (nutrient, grams) in [
            (Nutrient::Protein, protein_g),
            (Nutrient::Carbs, carbs_g),
            (Nutrient::Fat, fat_g),
        ] {
            if !grams.is_finite() || grams < 0.0 {
                return Err(MealRecordError::InvalidNutrient { nutrient });
            }
        }

        Ok(Self {
            day_index,
            meal_slot,
            dish_name: dish_name.to_owned(),
            calories,
            protein_g,
            carbs_g,
            fat_g,
            cuisine: cuisine.to_owned(),
            created_at,
        })
    }

    /// 1-based day offset within the plan
    #[must_use]
    pub const fn day_index(&self) -> u32 {
        self.day_index.get()
    }

    /// Meal slot
    #[must_use]
    pub const fn meal_slot(&self) -> &MealSlot {
        &self.meal_slot
    }

    /// Dish name, trimmed and non-empty
    #[must_use]
    pub fn dish_name(&self) -> &str {
        &self.dish_name
    }

    /// Energy in kilocalories
    #[must_use]
    pub const fn calories(&self) -> u32 {
        self.calories
    }

    /// Protein in grams
    #[must_use]
    pub const fn protein_g(&self) -> f64 {
        self.protein_g
    }

    /// Carbohydrates in grams
    #[must_use]
    pub const fn carbs_g(&self) -> f64 {
        self.carbs_g
    }

    /// Fat in grams
    #[must_use]
    pub const fn fat_g(&self) -> f64 {
        self.fat_g
    }

    /// Cuisine tag supplied by the caller of the parse
    #[must_use]
    pub fn cuisine(&self) -> &str {
        &self.cuisine
    }

    /// Parse timestamp
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl PartialEq for MealRecord {
    fn eq(&self, other: &Self) -> bool {
        self.day_index == other.day_index
            && self.meal_slot == other.meal_slot
            && self.dish_name == other.dish_name
            && self.calories == other.calories
            && self.protein_g.to_bits() == other.protein_g.to_bits()
            && self.carbs_g.to_bits() == other.carbs_g.to_bits()
            && self.fat_g.to_bits() == other.fat_g.to_bits()
            && self.cuisine == other.cuisine
    }
}

/// Macro sums over a group of records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NutritionTotals {
    /// Total energy in kilocalories
    pub calories: u64,
    /// Total protein in grams
    pub protein_g: f64,
    /// Total carbohydrates in grams
    pub carbs_g: f64,
    /// Total fat in grams
    pub fat_g: f64,
    /// Number of meals summed
    pub meal_count: usize,
}

impl NutritionTotals {
    /// Add one record to the totals
    pub fn add(&mut self, record: &MealRecord) {
        self.calories += u64::from(record.calories());
        self.protein_g += record.protein_g();
        self.carbs_g += record.carbs_g();
        self.fat_g += record.fat_g();
        self.meal_count += 1;
    }

    /// Sum a sequence of records
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a MealRecord>) -> Self {
        let mut totals = Self::default();
        for record in records {
            totals.add(record);
        }
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap_or(NonZeroU32::MIN)
    }

    #[test]
    fn test_meal_slot_from_label() {
        assert_eq!(MealSlot::from_label(" breakfast "), MealSlot::Breakfast);
        assert_eq!(MealSlot::from_label("DINNER"), MealSlot::Dinner);
        assert_eq!(MealSlot::from_label("Snacks"), MealSlot::Snack);
        assert_eq!(MealSlot::from_label(""), MealSlot::Unknown);
        assert_eq!(
            MealSlot::from_label("Pre-workout"),
            MealSlot::Other("Pre-workout".to_owned())
        );
    }

    #[test]
    fn test_record_rejects_blank_dish() {
        let result = MealRecord::new(
            day(1),
            MealSlot::Lunch,
            "   ",
            400,
            20.0,
            40.0,
            10.0,
            "Indian",
            Utc::now(),
        );
        assert_eq!(result.unwrap_err(), MealRecordError::EmptyDish);
    }

    #[test]
    fn test_record_rejects_infinite_grams() {
        let result = MealRecord::new(
            day(1),
            MealSlot::Lunch,
            "Dal",
            400,
            20.0,
            f64::INFINITY,
            10.0,
            "Indian",
            Utc::now(),
        );
        assert_eq!(
            result.unwrap_err(),
            MealRecordError::InvalidNutrient {
                nutrient: Nutrient::Carbs
            }
        );
    }

    #[test]
    fn test_equality_ignores_created_at() {
        let earlier = Utc::now() - chrono::Duration::hours(1);
        let a = MealRecord::new(
            day(2), MealSlot::Dinner, "Paneer Tikka", 520, 30.0, 18.5, 28.0, "Indian", earlier,
        )
        .unwrap();
        let b = MealRecord::new(
            day(2), MealSlot::Dinner, "Paneer Tikka", 520, 30.0, 18.5, 28.0, "Indian", Utc::now(),
        )
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_totals_sum_records() {
        let now = Utc::now();
        let records = [
            MealRecord::new(day(1), MealSlot::Breakfast, "Poha", 300, 8.0, 50.0, 7.5, "Indian", now)
                .unwrap(),
            MealRecord::new(day(1), MealSlot::Lunch, "Rajma", 550, 22.0, 80.0, 12.0, "Indian", now)
                .unwrap(),
        ];
        let totals = NutritionTotals::from_records(&records);
        assert_eq!(totals.calories, 850);
        assert!((totals.protein_g - 30.0).abs() < f64::EPSILON);
        assert_eq!(totals.meal_count, 2);
    }
}
