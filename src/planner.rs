// ABOUTME: Meal plan planner driving prompt rendering, generation, and parsing
// ABOUTME: Regenerates plans whose parse yield is too poor and keeps the best attempt
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! # Planner
//!
//! [`MealPlanner::generate`] validates a [`DietPlanRequest`], renders its
//! prompt, asks the provider for a plan and parses the reply. When the
//! [`YieldPolicy`] judges the parse too poor the plan is regenerated, up to
//! `max_attempts` times; the attempt with the most records wins. Provider
//! errors are returned immediately.

use chrono::Utc;
use healy_core::constants::defaults;
use healy_core::errors::{AppError, AppResult};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::HealyConfig;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider, TokenUsage};
use crate::mealplan::{parse_meal_plan_at, ParseOutcome, YieldPolicy};
use crate::prompts::{build_meal_plan_prompt, DietPlanRequest};

/// Generation settings for the planner
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerSettings {
    /// Generation attempts, including the first
    pub max_attempts: u32,
    /// When to regenerate
    pub yield_policy: YieldPolicy,
    /// Model override; the provider default is used when `None`
    pub model: Option<String>,
    /// Completion token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            max_attempts: defaults::PLAN_MAX_ATTEMPTS,
            yield_policy: YieldPolicy::default(),
            model: None,
            max_tokens: defaults::LLM_MAX_TOKENS,
            temperature: defaults::LLM_TEMPERATURE,
        }
    }
}

impl From<&HealyConfig> for PlannerSettings {
    fn from(config: &HealyConfig) -> Self {
        Self {
            max_attempts: config.plan.max_attempts,
            yield_policy: YieldPolicy {
                max_warning_ratio: config.plan.max_warning_ratio,
                min_records: config.plan.min_records,
            },
            model: Some(config.llm.model.clone()),
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
        }
    }
}

/// The plan chosen after all attempts
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedPlan {
    /// Parse outcome of the chosen attempt
    pub outcome: ParseOutcome,
    /// Raw generated text of the chosen attempt
    pub raw_text: String,
    /// Number of generation calls made
    pub attempts: u32,
    /// Model reported by the provider for the chosen attempt
    pub model: String,
    /// Token usage of the chosen attempt, when reported
    pub usage: Option<TokenUsage>,
    /// Whether the chosen attempt satisfied the yield policy
    pub satisfied_policy: bool,
}

/// Drives generation and parsing against one provider
pub struct MealPlanner<'a> {
    provider: &'a dyn LlmProvider,
    settings: PlannerSettings,
}

impl<'a> MealPlanner<'a> {
    /// Create a planner over a provider
    #[must_use]
    pub fn new(provider: &'a dyn LlmProvider, settings: PlannerSettings) -> Self {
        Self { provider, settings }
    }

    /// Settings in effect
    #[must_use]
    pub const fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Build the chat request sent for a diet plan request
    #[must_use]
    pub fn chat_request(&self, request: &DietPlanRequest) -> ChatRequest {
        let chat = ChatRequest::new(vec![ChatMessage::user(build_meal_plan_prompt(request))])
            .with_max_tokens(self.settings.max_tokens)
            .with_temperature(self.settings.temperature);
        match &self.settings.model {
            Some(model) => chat.with_model(model.clone()),
            None => chat,
        }
    }

    /// Generate, parse and, if needed, regenerate a meal plan
    ///
    /// # Errors
    ///
    /// Returns a validation error for an out-of-range request or invalid
    /// settings, and the provider's error if any generation call fails.
    #[instrument(skip(self, request), fields(provider = self.provider.name(), cuisine = %request.cuisine, days = request.days))]
    pub async fn generate(&self, request: &DietPlanRequest) -> AppResult<GeneratedPlan> {
        request.validate()?;
        if self.settings.max_attempts == 0 {
            return Err(AppError::invalid_input(
                "Planner max_attempts must be at least 1",
            ));
        }

        let chat = self.chat_request(request);
        let cuisine = request.cuisine.as_str();
        let policy = self.settings.yield_policy;
        let mut best: Option<GeneratedPlan> = None;

        for attempt in 1..=self.settings.max_attempts {
            let response = self.provider.complete(&chat).await?;
            let outcome = parse_meal_plan_at(&response.content, cuisine, Utc::now());
            let satisfied_policy = !policy.should_retry(&outcome);

            info!(
                attempt,
                records = outcome.records.len(),
                warnings = outcome.warnings.len(),
                warning_ratio = outcome.warning_ratio(),
                satisfied_policy,
                "Parsed generated meal plan"
            );

            let candidate = GeneratedPlan {
                outcome,
                raw_text: response.content,
                attempts: attempt,
                model: response.model,
                usage: response.usage,
                satisfied_policy,
            };

            if satisfied_policy {
                return Ok(candidate);
            }

            warn!(
                attempt,
                max_attempts = self.settings.max_attempts,
                structurally_empty = candidate.outcome.is_structurally_empty(),
                "Generated plan has poor parse yield"
            );

            best = match best {
                Some(previous)
                    if previous.outcome.records.len() >= candidate.outcome.records.len() =>
                {
                    Some(previous)
                }
                _ => Some(candidate),
            };
        }

        best.map(|mut plan| {
            plan.attempts = self.settings.max_attempts;
            plan
        })
        .ok_or_else(|| AppError::internal("Planner finished without any attempt"))
    }
}
