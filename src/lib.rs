// ABOUTME: Main library entry point for the Healy meal planner
// ABOUTME: Turns model-generated diet plans into structured meal records with warnings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

#![deny(unsafe_code)]

//! # Healy
//!
//! Healy asks a chat-completion model for a multi-day meal plan and turns
//! the loosely structured reply into validated [`models::MealRecord`]s.
//!
//! ## Architecture
//!
//! - **`mealplan`**: tolerant parser, session state and exporters
//! - **`prompts`**: validated plan requests and the generation prompt
//! - **`llm`**: chat-completion provider contract and an `OpenAI`-compatible client
//! - **`planner`**: generation with regeneration on poor parse yield
//! - **`config`** / **`logging`**: environment configuration and tracing setup
//!
//! ## Example Usage
//!
//! ```rust
//! use healy::mealplan::parse_meal_plan;
//!
//! let text = "Day 1:\nBreakfast: Poha | Calories: 300 | Protein: 8g | Carbs: 50g | Fat: 7g";
//! let outcome = parse_meal_plan(text, "Indian");
//! assert_eq!(outcome.records.len(), 1);
//! assert!(outcome.warnings.is_empty());
//! ```

/// Environment configuration
pub mod config;

/// Chat-completion providers used for plan generation
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Meal plan parsing, session state and export
pub mod mealplan;

/// Plan generation with parse-yield retries
pub mod planner;

/// Diet plan requests and prompt rendering
pub mod prompts;

// Foundation types live in `healy-core`
pub use healy_core::{constants, errors, models};
