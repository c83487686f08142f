// ABOUTME: Configuration module for the generation endpoint and plan retry settings
// ABOUTME: Re-exports the environment-driven HealyConfig and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! Configuration is read from environment variables (optionally seeded from
//! a `.env` file). See [`environment::HealyConfig::from_env`].

/// Environment-driven configuration
pub mod environment;

pub use environment::{Environment, HealyConfig, LlmConfig, PlanConfig};
