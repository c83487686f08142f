// ABOUTME: Core types and constants for the Healy meal planner
// ABOUTME: Foundation crate with error handling, meal models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

#![deny(unsafe_code)]

//! # Healy Core
//!
//! Foundation crate providing shared types and constants for the Healy meal
//! planner. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **models**: Meal records, meal slots, and nutrition totals
//! - **constants**: Environment variable names, defaults, and plan limits

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Core data models (`MealRecord`, `MealSlot`, `NutritionTotals`)
pub mod models;
