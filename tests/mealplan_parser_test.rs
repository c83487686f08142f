// ABOUTME: Integration tests for the meal plan text parser
// ABOUTME: Covers day segmentation, meal line tokenization, warnings, and calorie policy
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]
// Allow raw string hashes for readability in test fixtures
#![allow(clippy::needless_raw_string_hashes)]

use chrono::{TimeZone, Utc};
use healy::mealplan::{parse_meal_plan, parse_meal_plan_at, WarningKind};
use healy::models::{MealSlot, Nutrient};

const TWO_DAY_PLAN: &str = r#"Day 1:
Breakfast: Masala Dosa | Calories: 350 | Protein: 8g | Carbs: 50g | Fat: 12g
Lunch: Chole with Brown Rice | Calories: 550 | Protein: 20g | Carbs: 85g | Fat: 14g
Dinner: Palak Paneer with Roti | Calories: 500 | Protein: 25g | Carbs: 40g | Fat: 22g

Day 2:
Breakfast: Poha | Calories: 300 | Protein: 8g | Carbs: 50g | Fat: 7g
Lunch: Rajma Chawal | Calories: 560 | Protein: 21g | Carbs: 88g | Fat: 11g
Dinner: Dal Tadka with Jeera Rice | Calories: 480 | Protein: 18g | Carbs: 70g | Fat: 13g
"#;

const MARKDOWN_PLAN: &str = r#"Here is your 2-day Indian vegetarian meal plan!

**Day 1: Monday**
* **Breakfast:** Poha with Peanuts | Calories: 350 | Protein: 10g | Carbs: 55g | Fat: 10g
* **Lunch:** Rajma Chawal | Calories: 550 | Protein: 20g | Carbs: 85g | Fat: 12g
* **Dinner:** Palak Paneer with Roti | Calories: 500 | Protein: 25g | Carbs: 40g | Fat: 22g

---

**Day 2: Tuesday**
1. Breakfast: Idli Sambar | Calories: ~320 kcal | Protein: 12g | Carbs: 58g | Fat: 4g
2. Lunch: Veg Pulao | Calories: 480 | Protein: 12g | Carbs: 78g | Fat: 13g
3. Dinner: Moong Dal Khichdi | Calories: 420 | Protein: 16g | Carbs: 65g | Fat: 9g

Total: 1220 calories
"#;

#[test]
fn test_reparse_is_idempotent() {
    let first = parse_meal_plan(MARKDOWN_PLAN, "Indian");
    let second = parse_meal_plan(MARKDOWN_PLAN, "Indian");
    assert_eq!(first.records, second.records);
    assert_eq!(first.warnings, second.warnings);
}

#[test]
fn test_text_without_day_header_is_structurally_empty() {
    let text = "Breakfast: Oats | Calories: 300 | Protein: 10g | Carbs: 50g | Fat: 6g\n\
                Lunch: Salad | Calories: 250 | Protein: 9g | Carbs: 20g | Fat: 14g";
    let outcome = parse_meal_plan(text, "Italian");

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].kind, WarningKind::NoDayDelimiter);
    assert_eq!(outcome.warnings[0].kind.code(), "no-day-delimiter");
    assert!(outcome.is_structurally_empty());
    assert_eq!(outcome.line_warnings().count(), 0);
}

#[test]
fn test_empty_text_is_structurally_empty() {
    let outcome = parse_meal_plan("", "Indian");
    assert!(outcome.records.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.is_structurally_empty());
}

#[test]
fn test_good_line_and_four_field_line() {
    let text = "Day 1:\n\
                Breakfast: Oats | Calories: 300 | Protein: 10g | Carbs: 50g | Fat: 6g\n\
                Lunch: Soup | Calories: 200 | Protein: 5g | Carbs: 30g";
    let outcome = parse_meal_plan(text, "Mediterranean");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.warnings.len(), 1);
    let warning = &outcome.warnings[0];
    assert_eq!(warning.kind, WarningKind::InsufficientFields { found: 4 });
    assert_eq!(warning.kind.code(), "insufficient-fields");
    assert_eq!(warning.line_number, Some(3));
    assert_eq!(
        warning.raw_line,
        "Lunch: Soup | Calories: 200 | Protein: 5g | Carbs: 30g"
    );
}

#[test]
fn test_nutrient_units_are_stripped() {
    let text = "Day 1\nDinner: Paneer Tikka | Calories: 450 calories | Protein: 32.5g | Carbs: 12g | Fat: 28g";
    let outcome = parse_meal_plan(text, "Indian");

    assert!(outcome.warnings.is_empty());
    let record = &outcome.records[0];
    assert_eq!(record.calories(), 450);
    assert!((record.protein_g() - 32.5).abs() < f64::EPSILON);
    assert!((record.carbs_g() - 12.0).abs() < f64::EPSILON);
    assert!((record.fat_g() - 28.0).abs() < f64::EPSILON);
}

#[test]
fn test_day_index_is_ordinal_not_declared() {
    let text = "Day 1:\n\
                Breakfast: Oats | Calories: 300 | Protein: 10g | Carbs: 50g | Fat: 6g\n\
                Day 9:\n\
                Lunch: Pasta | Calories: 600 | Protein: 20g | Carbs: 80g | Fat: 20g";
    let outcome = parse_meal_plan(text, "Italian");

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].day_index(), 1);
    assert_eq!(outcome.records[1].day_index(), 2);
}

#[test]
fn test_two_days_of_three_meals() {
    let outcome = parse_meal_plan(TWO_DAY_PLAN, "Indian");

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.records.len(), 6);
    let days: Vec<u32> = outcome.records.iter().map(|r| r.day_index()).collect();
    assert_eq!(days, vec![1, 1, 1, 2, 2, 2]);

    let slots: Vec<&MealSlot> = outcome.records.iter().map(|r| r.meal_slot()).collect();
    assert_eq!(
        slots[..3],
        [&MealSlot::Breakfast, &MealSlot::Lunch, &MealSlot::Dinner]
    );
    assert_eq!(outcome.records[4].dish_name(), "Rajma Chawal");
}

#[test]
fn test_two_field_snack_line_warns() {
    let text = "Day 1:\nSnack: Mixed Nuts | 200 calories";
    let outcome = parse_meal_plan(text, "Indian");

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(
        outcome.warnings[0].kind,
        WarningKind::InsufficientFields { found: 2 }
    );
    assert!(!outcome.is_structurally_empty());
}

#[test]
fn test_records_carry_cuisine_and_timestamp() {
    let now = Utc.with_ymd_and_hms(2025, 3, 14, 9, 30, 0).unwrap();
    let outcome = parse_meal_plan_at(TWO_DAY_PLAN, "Chinese", now);

    assert!(outcome
        .records
        .iter()
        .all(|r| r.cuisine() == "Chinese" && r.created_at() == now));
}

#[test]
fn test_fractional_calories_round_half_away_from_zero() {
    let text = "Day 1\n\
                Breakfast: Toast | Calories: 250.5 | Protein: 8g | Carbs: 30g | Fat: 9g\n\
                Lunch: Soup | Calories: 199.4 | Protein: 6g | Carbs: 20g | Fat: 4g";
    let outcome = parse_meal_plan(text, "Italian");

    assert_eq!(outcome.records[0].calories(), 251);
    assert_eq!(outcome.records[1].calories(), 199);
}

#[test]
fn test_numeric_failures_name_first_bad_field() {
    let text = "Day 1\n\
                Lunch: Pasta | Calories: 300g | Protein: 20g | Carbs: 80g | Fat: 20g\n\
                Dinner: Tacos | Calories: 500 | Protein: lots | Carbs: many | Fat: 20g\n\
                Snack: Fruit | Calories: 90 | Protein: 1g | Carbs: 22g | Fat: 500mg";
    let outcome = parse_meal_plan(text, "Mexican");

    assert!(outcome.records.is_empty());
    let kinds: Vec<WarningKind> = outcome.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::NumericParseFailure {
                field: Nutrient::Calories
            },
            WarningKind::NumericParseFailure {
                field: Nutrient::Protein
            },
            WarningKind::NumericParseFailure {
                field: Nutrient::Fat
            },
        ]
    );
    assert!(outcome
        .warnings
        .iter()
        .all(|w| w.kind.code() == "numeric-parse-failure"));
}

#[test]
fn test_empty_dish_warns() {
    let text = "Day 1\nLunch: ** ** | Calories: 300 | Protein: 20g | Carbs: 30g | Fat: 10g";
    let outcome = parse_meal_plan(text, "Indian");

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.warnings[0].kind, WarningKind::EmptyDish);
    assert_eq!(outcome.warnings[0].kind.code(), "empty-dish");
}

#[test]
fn test_line_without_slot_separator_is_unknown_slot() {
    let text = "Day 1\nGreek Salad | Calories: 300 | Protein: 9g | Carbs: 14g | Fat: 22g";
    let outcome = parse_meal_plan(text, "Mediterranean");

    assert_eq!(outcome.records[0].meal_slot(), &MealSlot::Unknown);
    assert_eq!(outcome.records[0].dish_name(), "Greek Salad");
}

#[test]
fn test_markdown_decorated_plan() {
    let outcome = parse_meal_plan(MARKDOWN_PLAN, "Indian");

    assert_eq!(outcome.records.len(), 6);
    assert_eq!(outcome.records[0].meal_slot(), &MealSlot::Breakfast);
    assert_eq!(outcome.records[0].dish_name(), "Poha with Peanuts");
    assert_eq!(outcome.records[3].dish_name(), "Idli Sambar");
    assert_eq!(outcome.records[3].calories(), 320);
    assert_eq!(outcome.records[3].day_index(), 2);

    // The trailing total line is reported, preamble and rules are not
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(
        outcome.warnings[0].kind,
        WarningKind::InsufficientFields { found: 1 }
    );
    assert_eq!(outcome.warnings[0].raw_line, "Total: 1220 calories");
}

#[test]
fn test_markdown_table_rows_and_extra_fields() {
    let text = "### Day One\n\
                |---|---|---|---|---|\n\
                | Breakfast: Idli | 300 | 10g | 50g | 5g |\n\
                Lunch: Dal | 400 | 18g | 45g | 15g | high in fiber";
    let outcome = parse_meal_plan(text, "Indian");

    assert!(outcome.warnings.is_empty());
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].dish_name(), "Idli");
    assert_eq!(outcome.records[1].calories(), 400);
}

#[test]
fn test_meal_on_header_line() {
    let text = "Day 1: Breakfast: Upma | Calories: 280 | Protein: 7g | Carbs: 45g | Fat: 8g\n\
                Lunch: Sambar Rice | Calories: 450 | Protein: 14g | Carbs: 75g | Fat: 10g";
    let outcome = parse_meal_plan(text, "Indian");

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].dish_name(), "Upma");
    assert!(outcome.records.iter().all(|r| r.day_index() == 1));
}

#[test]
fn test_every_content_line_is_accounted_for() {
    let text = "Intro text is ignored\n\
                Day 1\n\
                Breakfast: Oats | Calories: 300 | Protein: 10g | Carbs: 50g | Fat: 6g\n\
                Enjoy your meals!\n\
                \n\
                **\n\
                Dinner: Soup | Calories: 250 | Protein: 9g | Carbs: 20g | Fat: 8g";
    let outcome = parse_meal_plan(text, "Italian");

    assert_eq!(outcome.records.len() + outcome.warnings.len(), 3);
    assert_eq!(outcome.warnings[0].line_number, Some(4));
}

#[test]
fn test_ambiguous_numbers_are_not_truncated() {
    let text = "Day 1\n\
                Breakfast: Oats | Calories: 300 | Protein: 12,5g | Carbs: 50g | Fat: 6g\n\
                Lunch: Pasta | Calories: 600 | Protein: 10-12g | Carbs: 80g | Fat: 20g\n\
                Dinner: Curry | Calories: 1.5e3 | Protein: 30g | Carbs: 60g | Fat: 25g\n\
                Snack: Nuts | Calories: 200 | Protein: 6g | Carbs: 8g | Fat: .5g\n\
                Supper: Soup | Calories: 400-450 | Protein: 9g | Carbs: 30g | Fat: 7g";
    let outcome = parse_meal_plan(text, "Italian");

    assert!(outcome.records.is_empty());
    let kinds: Vec<WarningKind> = outcome.warnings.iter().map(|w| w.kind).collect();
    assert_eq!(
        kinds,
        vec![
            WarningKind::NumericParseFailure {
                field: Nutrient::Protein
            },
            WarningKind::NumericParseFailure {
                field: Nutrient::Protein
            },
            WarningKind::NumericParseFailure {
                field: Nutrient::Calories
            },
            WarningKind::NumericParseFailure {
                field: Nutrient::Fat
            },
            WarningKind::NumericParseFailure {
                field: Nutrient::Calories
            },
        ]
    );
}

#[test]
fn test_headers_without_numerals_start_days() {
    let text = "Day: Monday\n\
                Breakfast: Oats | Calories: 300 | Protein: 10g | Carbs: 50g | Fat: 6g\n\
                **Day 2nd**\n\
                Lunch: Pasta | Calories: 600 | Protein: 20g | Carbs: 80g | Fat: 20g\n\
                Day 3rd: Dinner: Soup | Calories: 250 | Protein: 9g | Carbs: 20g | Fat: 8g";
    let outcome = parse_meal_plan(text, "Italian");

    assert!(outcome.warnings.is_empty());
    let days: Vec<u32> = outcome.records.iter().map(|r| r.day_index()).collect();
    assert_eq!(days, vec![1, 2, 3]);
    assert_eq!(outcome.records[2].dish_name(), "Soup");
}

#[test]
fn test_day_words_in_prose_do_not_start_days() {
    let text = "Day 1\n\
                Breakfast: Oats | Calories: 300 | Protein: 10g | Carbs: 50g | Fat: 6g\n\
                Day-by-day notes: drink water\n\
                Daily total: 300 calories";
    let outcome = parse_meal_plan(text, "Italian");

    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.warnings.len(), 2);
    assert!(outcome.records.iter().all(|r| r.day_index() == 1));
}
