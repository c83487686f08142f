// ABOUTME: Integration tests for diet plan requests and prompt rendering
// ABOUTME: Covers cuisine parsing, goal bound validation, and the rendered line format
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]

use healy::errors::ErrorCode;
use healy::mealplan::parse_meal_plan;
use healy::prompts::{build_meal_plan_prompt, Cuisine, DietPlanRequest, DietType};

#[test]
fn test_cuisine_parsing_is_case_insensitive() {
    assert_eq!("indian".parse::<Cuisine>().unwrap(), Cuisine::Indian);
    assert_eq!(" MEDITERRANEAN ".parse::<Cuisine>().unwrap(), Cuisine::Mediterranean);
    let error = "Thai".parse::<Cuisine>().unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_default_request_is_valid() {
    let request = DietPlanRequest::default();
    assert_eq!(request.daily_calories, 2000);
    assert_eq!(request.daily_protein_g, 60);
    assert_eq!(request.days, 7);
    assert!(request.validate().is_ok());
}

#[test]
fn test_validation_bounds() {
    let base = DietPlanRequest::new(Cuisine::Chinese, DietType::NonVeg);

    for calories in [1000, 5000] {
        let request = DietPlanRequest {
            daily_calories: calories,
            ..base
        };
        assert!(request.validate().is_ok(), "{calories} should be accepted");
    }

    let too_low = DietPlanRequest {
        daily_calories: 999,
        ..base
    };
    let error = too_low.validate().unwrap_err();
    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    assert_eq!(error.context.details["field"], "daily_calories");

    let too_much_protein = DietPlanRequest {
        daily_protein_g: 301,
        ..base
    };
    assert_eq!(
        too_much_protein.validate().unwrap_err().context.details["field"],
        "daily_protein_g"
    );

    let no_days = DietPlanRequest { days: 0, ..base };
    assert_eq!(
        no_days.validate().unwrap_err().context.details["field"],
        "days"
    );
}

#[test]
fn test_prompt_mentions_request_and_format() {
    let request = DietPlanRequest {
        cuisine: Cuisine::Mexican,
        diet: DietType::NonVeg,
        daily_calories: 2200,
        daily_protein_g: 120,
        days: 7,
    };
    let prompt = build_meal_plan_prompt(&request);

    assert!(prompt.starts_with(
        "Generate a 7-day meal plan with 3 meals per day (Breakfast, Lunch, Dinner) for Mexican cuisine and Non-Veg diet."
    ));
    assert!(prompt.contains("The daily calorie goal is 2200 calories with 120g of protein."));
    assert!(prompt.contains(
        "Breakfast: Dish Name | Calories: X | Protein: Xg | Carbs: Xg | Fat: Xg"
    ));
    assert!(prompt.contains("... (continue for all 7 days)"));
}

#[test]
fn test_prompt_example_block_matches_parser_grammar() {
    let prompt = build_meal_plan_prompt(&DietPlanRequest::default());
    let example = prompt.replace(" X ", " 300 ").replace("Xg", "10g").replace(": X\n", ": 300\n");
    let outcome = parse_meal_plan(&example, "Indian");

    assert_eq!(outcome.records.len(), 3);
}
