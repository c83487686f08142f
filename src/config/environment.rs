// ABOUTME: Environment configuration for the generation endpoint and plan retry policy
// ABOUTME: Loads .env files, parses typed settings from environment variables, and validates them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! Environment-based configuration

use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use healy_core::constants::{defaults, env_vars, plan_limits};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Generation endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Full chat-completions URL
    pub endpoint: String,
    /// Bearer token; never logged
    #[serde(skip_serializing)]
    pub token: Option<String>,
    /// Model identifier
    pub model: String,
    /// Completion token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Whole-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::LLM_ENDPOINT.to_owned(),
            token: None,
            model: defaults::LLM_MODEL.to_owned(),
            max_tokens: defaults::LLM_MAX_TOKENS,
            temperature: defaults::LLM_TEMPERATURE,
            timeout_secs: defaults::LLM_TIMEOUT_SECS,
        }
    }
}

/// Retry policy applied to generated plans
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Generation attempts per plan, including the first
    pub max_attempts: u32,
    /// Warning ratio above which a plan is regenerated
    pub max_warning_ratio: f64,
    /// Fewest records an acceptable plan may contain
    pub min_records: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::PLAN_MAX_ATTEMPTS,
            max_warning_ratio: defaults::PLAN_MAX_WARNING_RATIO,
            min_records: defaults::PLAN_MIN_RECORDS,
        }
    }
}

/// Complete Healy configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealyConfig {
    /// Deployment environment
    pub environment: Environment,
    /// Generation endpoint settings
    pub llm: LlmConfig,
    /// Plan retry policy
    pub plan: PlanConfig,
}

impl HealyConfig {
    /// Load configuration from environment variables, reading `.env` first
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a value fails
    /// validation.
    pub fn from_env() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Failed to load .env file: {e}");
            }
        }
        Self::from_process_env()
    }

    /// Load configuration from the current process environment only
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed or a value fails
    /// validation.
    pub fn from_process_env() -> Result<Self> {
        let config = Self {
            environment: Environment::from_str_or_default(&env_var_or(
                env_vars::ENVIRONMENT,
                "development",
            )),
            llm: LlmConfig {
                endpoint: env_var_or(env_vars::LLM_ENDPOINT, defaults::LLM_ENDPOINT),
                token: env::var(env_vars::LLM_TOKEN)
                    .ok()
                    .filter(|token| !token.trim().is_empty()),
                model: env_var_or(env_vars::LLM_MODEL, defaults::LLM_MODEL),
                max_tokens: parse_env(env_vars::LLM_MAX_TOKENS, defaults::LLM_MAX_TOKENS)?,
                temperature: parse_env(env_vars::LLM_TEMPERATURE, defaults::LLM_TEMPERATURE)?,
                timeout_secs: parse_env(env_vars::LLM_TIMEOUT_SECS, defaults::LLM_TIMEOUT_SECS)?,
            },
            plan: PlanConfig {
                max_attempts: parse_env(env_vars::PLAN_MAX_ATTEMPTS, defaults::PLAN_MAX_ATTEMPTS)?,
                max_warning_ratio: parse_env(
                    env_vars::PLAN_MAX_WARNING_RATIO,
                    defaults::PLAN_MAX_WARNING_RATIO,
                )?,
                min_records: parse_env(env_vars::PLAN_MIN_RECORDS, defaults::PLAN_MIN_RECORDS)?,
            },
        };

        config.validate()?;
        info!("Configuration loaded successfully");
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.llm.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            bail!(
                "{} must be an http(s) URL, got '{endpoint}'",
                env_vars::LLM_ENDPOINT
            );
        }
        if self.llm.max_tokens == 0 {
            bail!("{} must be greater than zero", env_vars::LLM_MAX_TOKENS);
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            bail!(
                "{} must be within 0.0..=2.0, got {}",
                env_vars::LLM_TEMPERATURE,
                self.llm.temperature
            );
        }
        if self.llm.timeout_secs == 0 {
            bail!("{} must be greater than zero", env_vars::LLM_TIMEOUT_SECS);
        }
        if !(1..=plan_limits::MAX_GENERATION_ATTEMPTS).contains(&self.plan.max_attempts) {
            bail!(
                "{} must be within 1..={}, got {}",
                env_vars::PLAN_MAX_ATTEMPTS,
                plan_limits::MAX_GENERATION_ATTEMPTS,
                self.plan.max_attempts
            );
        }
        if !(0.0..=1.0).contains(&self.plan.max_warning_ratio) {
            bail!(
                "{} must be within 0.0..=1.0, got {}",
                env_vars::PLAN_MAX_WARNING_RATIO,
                self.plan.max_warning_ratio
            );
        }
        if self.environment.is_production() && self.llm.token.is_none() {
            bail!("{} is required in production", env_vars::LLM_TOKEN);
        }
        if self.llm.token.is_none() {
            warn!(
                "{} is not set; requests are sent without authorization",
                env_vars::LLM_TOKEN
            );
        }
        Ok(())
    }

    /// Get a summary of the configuration for logging (without secrets)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Healy Configuration:\n\
             - Environment: {}\n\
             - Endpoint: {}\n\
             - Token: {}\n\
             - Model: {}\n\
             - Max Tokens: {}\n\
             - Temperature: {}\n\
             - Timeout: {}s\n\
             - Plan Attempts: {}\n\
             - Max Warning Ratio: {}\n\
             - Min Records: {}",
            self.environment,
            self.llm.endpoint,
            if self.llm.token.is_some() {
                "configured"
            } else {
                "not set"
            },
            self.llm.model,
            self.llm.max_tokens,
            self.llm.temperature,
            self.llm.timeout_secs,
            self.plan.max_attempts,
            self.plan.max_warning_ratio,
            self.plan.min_records,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Parse an environment variable, falling back to `default` when unset or blank
fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("Invalid {key} value: '{value}'")),
        _ => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_from_str() {
        assert_eq!(Environment::from_str_or_default("PROD"), Environment::Production);
        assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
        assert_eq!(Environment::from_str_or_default("staging"), Environment::Development);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(HealyConfig::default().validate().is_ok());
    }

    #[test]
    fn test_summary_hides_token() {
        let mut config = HealyConfig::default();
        config.llm.token = Some("dapi-secret".to_owned());
        let summary = config.summary();
        assert!(summary.contains("Token: configured"));
        assert!(!summary.contains("dapi-secret"));
    }
}
