// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Environment variable names, defaults, and meal plan limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! flat namespace.

/// Service identity used in logs
pub mod service_names {
    /// Name reported by the logging layer
    pub const HEALY: &str = "healy";
    /// Label used when reporting generation endpoint errors
    pub const GENERATION_SERVICE: &str = "Generation";
}

/// Environment variable names read by the configuration layer
pub mod env_vars {
    /// Full URL of the chat-completions (serving) endpoint
    pub const LLM_ENDPOINT: &str = "HEALY_LLM_ENDPOINT";
    /// Bearer token for the endpoint
    pub const LLM_TOKEN: &str = "HEALY_LLM_TOKEN";
    /// Model identifier sent with each request
    pub const LLM_MODEL: &str = "HEALY_LLM_MODEL";
    /// Maximum completion tokens per request
    pub const LLM_MAX_TOKENS: &str = "HEALY_LLM_MAX_TOKENS";
    /// Sampling temperature
    pub const LLM_TEMPERATURE: &str = "HEALY_LLM_TEMPERATURE";
    /// Whole-request timeout in seconds
    pub const LLM_TIMEOUT_SECS: &str = "HEALY_LLM_TIMEOUT_SECS";
    /// Generation attempts allowed per plan
    pub const PLAN_MAX_ATTEMPTS: &str = "HEALY_PLAN_MAX_ATTEMPTS";
    /// Warning ratio above which a plan is regenerated
    pub const PLAN_MAX_WARNING_RATIO: &str = "HEALY_PLAN_MAX_WARNING_RATIO";
    /// Fewest records an acceptable plan may contain
    pub const PLAN_MIN_RECORDS: &str = "HEALY_PLAN_MIN_RECORDS";
    /// Deployment environment (development, production, testing)
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Defaults applied when the environment does not override them
pub mod defaults {
    /// Default chat-completions endpoint (local OpenAI-compatible server)
    pub const LLM_ENDPOINT: &str = "http://localhost:11434/v1/chat/completions";
    /// Default model identifier
    pub const LLM_MODEL: &str = "llama3.1:8b-instruct";
    /// Completion budget; a 7-day plan needs roughly 1500 tokens
    pub const LLM_MAX_TOKENS: u32 = 2000;
    /// Sampling temperature
    pub const LLM_TEMPERATURE: f32 = 0.7;
    /// Connection timeout in seconds
    pub const LLM_CONNECT_TIMEOUT_SECS: u64 = 30;
    /// Whole-request timeout in seconds
    pub const LLM_TIMEOUT_SECS: u64 = 300;
    /// Generation attempts per plan
    pub const PLAN_MAX_ATTEMPTS: u32 = 2;
    /// Warning ratio that triggers regeneration
    pub const PLAN_MAX_WARNING_RATIO: f64 = 0.5;
    /// Fewest acceptable records
    pub const PLAN_MIN_RECORDS: usize = 1;
}

/// Bounds on a diet plan request
pub mod plan_limits {
    /// Lowest accepted daily calorie goal
    pub const MIN_DAILY_CALORIES: u32 = 1000;
    /// Highest accepted daily calorie goal
    pub const MAX_DAILY_CALORIES: u32 = 5000;
    /// Default daily calorie goal
    pub const DEFAULT_DAILY_CALORIES: u32 = 2000;
    /// Lowest accepted daily protein goal in grams
    pub const MIN_DAILY_PROTEIN_G: u32 = 20;
    /// Highest accepted daily protein goal in grams
    pub const MAX_DAILY_PROTEIN_G: u32 = 300;
    /// Default daily protein goal in grams
    pub const DEFAULT_DAILY_PROTEIN_G: u32 = 60;
    /// Shortest plan
    pub const MIN_PLAN_DAYS: u32 = 1;
    /// Longest plan
    pub const MAX_PLAN_DAYS: u32 = 14;
    /// Default plan length
    pub const DEFAULT_PLAN_DAYS: u32 = 7;
    /// Upper bound for attempts configured via the environment
    pub const MAX_GENERATION_ATTEMPTS: u32 = 5;
}
