// ABOUTME: Integration tests for the meal planner retry loop
// ABOUTME: Drives the planner with a scripted provider to check regeneration and attempt selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

// Test modules don't need documentation
#![allow(missing_docs)]
// Allow unwrap in tests - tests should panic on failure
#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use healy::errors::{AppError, ErrorCode};
use healy::llm::{ChatRequest, ChatResponse, LlmProvider, MessageRole, TokenUsage};
use healy::mealplan::YieldPolicy;
use healy::planner::{MealPlanner, PlannerSettings};
use healy::prompts::{Cuisine, DietPlanRequest, DietType};

const GOOD_PLAN: &str = "Day 1:\n\
    Breakfast: Upma | Calories: 350 | Protein: 9g | Carbs: 55g | Fat: 10g\n\
    Lunch: Chole | Calories: 600 | Protein: 20g | Carbs: 85g | Fat: 18g\n\
    Dinner: Palak Paneer | Calories: 550 | Protein: 25g | Carbs: 30g | Fat: 30g";

const MOSTLY_BROKEN_PLAN: &str = "Day 1:\n\
    Breakfast: Upma | Calories: 350 | Protein: 9g | Carbs: 55g | Fat: 10g\n\
    Lunch: Chole, about 600 calories\n\
    Dinner: Palak Paneer, 550 calories";

const PROSE: &str = "Here are some healthy ideas for your week.";

/// Provider replaying a fixed script of replies and recording requests
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, AppError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<&str, AppError>>) -> Self {
        Self {
            replies: Mutex::new(
                replies
                    .into_iter()
                    .map(|reply| reply.map(str::to_owned))
                    .collect(),
            ),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::internal("script exhausted")))?;
        Ok(ChatResponse {
            content: reply,
            model: self.default_model().to_owned(),
            usage: Some(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 300,
                total_tokens: 420,
            }),
            finish_reason: Some("stop".to_owned()),
        })
    }
}

fn settings(max_attempts: u32) -> PlannerSettings {
    PlannerSettings {
        max_attempts,
        ..PlannerSettings::default()
    }
}

fn request() -> DietPlanRequest {
    DietPlanRequest {
        days: 1,
        ..DietPlanRequest::new(Cuisine::Indian, DietType::Veg)
    }
}

#[tokio::test]
async fn test_first_good_attempt_is_returned() {
    let provider = ScriptedProvider::new(vec![Ok(GOOD_PLAN)]);
    let planner = MealPlanner::new(&provider, settings(3));

    let plan = planner.generate(&request()).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert_eq!(plan.attempts, 1);
    assert!(plan.satisfied_policy);
    assert_eq!(plan.outcome.records.len(), 3);
    assert_eq!(plan.outcome.records[0].cuisine(), "Indian");
    assert_eq!(plan.model, "scripted-model");
    assert_eq!(plan.usage.unwrap().total_tokens, 420);
}

#[tokio::test]
async fn test_structural_failure_is_regenerated() {
    let provider = ScriptedProvider::new(vec![Ok(PROSE), Ok(GOOD_PLAN)]);
    let planner = MealPlanner::new(&provider, settings(2));

    let plan = planner.generate(&request()).await.unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(plan.attempts, 2);
    assert!(plan.satisfied_policy);
    assert_eq!(plan.raw_text, GOOD_PLAN);
}

#[tokio::test]
async fn test_best_attempt_kept_when_all_attempts_are_poor() {
    let provider = ScriptedProvider::new(vec![Ok(PROSE), Ok(MOSTLY_BROKEN_PLAN), Ok(PROSE)]);
    let planner = MealPlanner::new(&provider, settings(3));

    let plan = planner.generate(&request()).await.unwrap();

    assert_eq!(provider.calls(), 3);
    assert_eq!(plan.attempts, 3);
    assert!(!plan.satisfied_policy);
    assert_eq!(plan.raw_text, MOSTLY_BROKEN_PLAN);
    assert_eq!(plan.outcome.records.len(), 1);
    assert_eq!(plan.outcome.warnings.len(), 2);
}

#[tokio::test]
async fn test_single_attempt_returns_poor_plan_without_retry() {
    let provider = ScriptedProvider::new(vec![Ok(PROSE), Ok(GOOD_PLAN)]);
    let planner = MealPlanner::new(&provider, settings(1));

    let plan = planner.generate(&request()).await.unwrap();

    assert_eq!(provider.calls(), 1);
    assert!(plan.outcome.is_structurally_empty());
    assert!(!plan.satisfied_policy);
}

#[tokio::test]
async fn test_lenient_policy_accepts_partial_plan() {
    let provider = ScriptedProvider::new(vec![Ok(MOSTLY_BROKEN_PLAN)]);
    let planner = MealPlanner::new(
        &provider,
        PlannerSettings {
            yield_policy: YieldPolicy {
                max_warning_ratio: 1.0,
                min_records: 1,
            },
            ..settings(3)
        },
    );

    let plan = planner.generate(&request()).await.unwrap();
    assert_eq!(provider.calls(), 1);
    assert!(plan.satisfied_policy);
}

#[tokio::test]
async fn test_provider_error_aborts_without_retry() {
    let provider = ScriptedProvider::new(vec![
        Err(AppError::new(
            ErrorCode::ExternalRateLimited,
            "Generation rate limit exceeded",
        )),
        Ok(GOOD_PLAN),
    ]);
    let planner = MealPlanner::new(&provider, settings(3));

    let error = planner.generate(&request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::ExternalRateLimited);
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_invalid_request_never_reaches_provider() {
    let provider = ScriptedProvider::new(vec![Ok(GOOD_PLAN)]);
    let planner = MealPlanner::new(&provider, settings(2));
    let request = DietPlanRequest {
        daily_calories: 200,
        ..request()
    };

    let error = planner.generate(&request).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::ValueOutOfRange);
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_zero_attempts_is_rejected() {
    let provider = ScriptedProvider::new(vec![Ok(GOOD_PLAN)]);
    let planner = MealPlanner::new(&provider, settings(0));

    let error = planner.generate(&request()).await.unwrap_err();

    assert_eq!(error.code, ErrorCode::InvalidInput);
    assert_eq!(provider.calls(), 0);
}

#[test]
fn test_chat_request_carries_prompt_and_settings() {
    let provider = ScriptedProvider::new(Vec::new());
    let planner = MealPlanner::new(
        &provider,
        PlannerSettings {
            model: Some("qwen2.5:7b".to_owned()),
            max_tokens: 1500,
            temperature: 0.3,
            ..PlannerSettings::default()
        },
    );

    let chat = planner.chat_request(&DietPlanRequest::new(Cuisine::Italian, DietType::NonVeg));

    assert_eq!(chat.messages.len(), 1);
    assert_eq!(chat.messages[0].role, MessageRole::User);
    assert!(chat.messages[0].content.contains("Italian cuisine and Non-Veg diet"));
    assert_eq!(chat.model.as_deref(), Some("qwen2.5:7b"));
    assert_eq!(chat.max_tokens, Some(1500));
    assert_eq!(chat.temperature, Some(0.3));
}
