// ABOUTME: Diet plan request model and prompt builder for meal plan generation
// ABOUTME: Validates cuisine, diet, and goal bounds and renders the generation prompt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! # Prompts
//!
//! A [`DietPlanRequest`] is rendered by [`build_meal_plan_prompt`] into a
//! prompt asking for exactly the line format the meal plan parser reads.

use std::fmt::{self, Write as _};
use std::str::FromStr;

use healy_core::constants::plan_limits;
use healy_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::mealplan::NutritionGoals;

/// Cuisines offered for plan generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cuisine {
    /// Indian cuisine
    #[default]
    Indian,
    /// Italian cuisine
    Italian,
    /// Chinese cuisine
    Chinese,
    /// Mexican cuisine
    Mexican,
    /// Mediterranean cuisine
    Mediterranean,
}

impl Cuisine {
    /// Every supported cuisine
    pub const ALL: [Self; 5] = [
        Self::Indian,
        Self::Italian,
        Self::Chinese,
        Self::Mexican,
        Self::Mediterranean,
    ];

    /// Display name, also used as the record cuisine tag
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Indian => "Indian",
            Self::Italian => "Italian",
            Self::Chinese => "Chinese",
            Self::Mexican => "Mexican",
            Self::Mediterranean => "Mediterranean",
        }
    }
}

impl fmt::Display for Cuisine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cuisine {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|cuisine| cuisine.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                AppError::invalid_input(format!(
                    "Unsupported cuisine '{wanted}' (expected one of Indian, Italian, Chinese, Mexican, Mediterranean)"
                ))
            })
    }
}

/// Vegetarian or non-vegetarian plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DietType {
    /// Vegetarian
    #[default]
    Veg,
    /// Non-vegetarian
    NonVeg,
}

impl DietType {
    /// Label used in the prompt
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Veg => "Veg",
            Self::NonVeg => "Non-Veg",
        }
    }
}

impl fmt::Display for DietType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "veg" | "vegetarian" => Ok(Self::Veg),
            "non-veg" | "nonveg" | "non-vegetarian" => Ok(Self::NonVeg),
            other => Err(AppError::invalid_input(format!(
                "Unsupported diet '{other}' (expected veg or non-veg)"
            ))),
        }
    }
}

/// Parameters of one meal plan generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietPlanRequest {
    /// Cuisine of every dish
    pub cuisine: Cuisine,
    /// Diet restriction
    pub diet: DietType,
    /// Daily calorie goal
    pub daily_calories: u32,
    /// Daily protein goal in grams
    pub daily_protein_g: u32,
    /// Number of plan days
    pub days: u32,
}

impl Default for DietPlanRequest {
    fn default() -> Self {
        Self {
            cuisine: Cuisine::default(),
            diet: DietType::default(),
            daily_calories: plan_limits::DEFAULT_DAILY_CALORIES,
            daily_protein_g: plan_limits::DEFAULT_DAILY_PROTEIN_G,
            days: plan_limits::DEFAULT_PLAN_DAYS,
        }
    }
}

impl DietPlanRequest {
    /// Request with default goals for the given cuisine and diet
    #[must_use]
    pub fn new(cuisine: Cuisine, diet: DietType) -> Self {
        Self {
            cuisine,
            diet,
            ..Self::default()
        }
    }

    /// Check goal bounds
    ///
    /// # Errors
    ///
    /// Returns `ValueOutOfRange` naming the first field outside its bounds.
    pub fn validate(&self) -> AppResult<()> {
        check_range(
            "daily_calories",
            self.daily_calories,
            plan_limits::MIN_DAILY_CALORIES,
            plan_limits::MAX_DAILY_CALORIES,
        )?;
        check_range(
            "daily_protein_g",
            self.daily_protein_g,
            plan_limits::MIN_DAILY_PROTEIN_G,
            plan_limits::MAX_DAILY_PROTEIN_G,
        )?;
        check_range(
            "days",
            self.days,
            plan_limits::MIN_PLAN_DAYS,
            plan_limits::MAX_PLAN_DAYS,
        )
    }

    /// Goals to compare parsed days against
    #[must_use]
    pub fn goals(&self) -> NutritionGoals {
        NutritionGoals {
            daily_calories: self.daily_calories,
            daily_protein_g: f64::from(self.daily_protein_g),
        }
    }
}

fn check_range(field: &str, value: u32, min: u32, max: u32) -> AppResult<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AppError::value_out_of_range(
            field,
            value,
            &format!("{min}..={max}"),
        ))
    }
}

/// Render the generation prompt for a request
///
/// The example block shows the exact `Slot: Dish | Calories: X | ...` line
/// shape the parser reads.
#[must_use]
pub fn build_meal_plan_prompt(request: &DietPlanRequest) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "Generate a {}-day meal plan with 3 meals per day (Breakfast, Lunch, Dinner) for {} cuisine and {} diet.",
        request.days, request.cuisine, request.diet
    );
    let _ = writeln!(
        prompt,
        "The daily calorie goal is {} calories with {}g of protein.",
        request.daily_calories, request.daily_protein_g
    );
    prompt.push_str(
        "For each meal, provide:\n\
         1. Name of the dish\n\
         2. Estimated calories\n\
         3. Estimated protein (g)\n\
         4. Estimated carbs (g)\n\
         5. Estimated fat (g)\n\
         \n\
         Present the information in a structured format for easy parsing, like this:\n\
         \n\
         Day 1:\n\
         Breakfast: Dish Name | Calories: X | Protein: Xg | Carbs: Xg | Fat: Xg\n\
         Lunch: Dish Name | Calories: X | Protein: Xg | Carbs: Xg | Fat: Xg\n\
         Dinner: Dish Name | Calories: X | Protein: Xg | Carbs: Xg | Fat: Xg\n\
         \n",
    );
    if request.days > 1 {
        let _ = writeln!(prompt, "... (continue for all {} days)", request.days);
    }
    prompt
}
