// ABOUTME: Meal-plan text parser turning generated text into validated meal records
// ABOUTME: Collects line-level warnings instead of failing on malformed model output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

use std::fmt;
use std::num::NonZeroU32;

use chrono::{DateTime, Utc};
use healy_core::constants::defaults;
use healy_core::models::{MealRecord, MealRecordError, Nutrient};
use serde::Serialize;
use tracing::debug;

use super::grammar::{self, LineError, SourceLine};

/// Why a line, or the whole text, produced no record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub enum WarningKind {
    /// The text contains no day header; nothing was parsed
    NoDayDelimiter,
    /// Fewer than five pipe-delimited fields
    InsufficientFields {
        /// Number of fields present
        found: usize,
    },
    /// The dish name is empty
    EmptyDish,
    /// A nutrient value could not be read
    NumericParseFailure {
        /// First nutrient that failed, in line order
        field: Nutrient,
    },
}

impl WarningKind {
    /// Stable reason code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoDayDelimiter => "no-day-delimiter",
            Self::InsufficientFields { .. } => "insufficient-fields",
            Self::EmptyDish => "empty-dish",
            Self::NumericParseFailure { .. } => "numeric-parse-failure",
        }
    }

    /// Whether this warning concerns the whole text rather than one line
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::NoDayDelimiter)
    }
}

impl From<LineError> for WarningKind {
    fn from(error: LineError) -> Self {
        match error {
            LineError::InsufficientFields { found } => Self::InsufficientFields { found },
            LineError::EmptyDish => Self::EmptyDish,
            LineError::Nutrient(field) => Self::NumericParseFailure { field },
        }
    }
}

impl From<MealRecordError> for WarningKind {
    fn from(error: MealRecordError) -> Self {
        match error {
            MealRecordError::EmptyDish => Self::EmptyDish,
            MealRecordError::InvalidNutrient { nutrient } => {
                Self::NumericParseFailure { field: nutrient }
            }
        }
    }
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientFields { found } => {
                write!(f, "{} (found {found} of 5)", self.code())
            }
            Self::NumericParseFailure { field } => write!(f, "{} ({field})", self.code()),
            Self::NoDayDelimiter | Self::EmptyDish => f.write_str(self.code()),
        }
    }
}

/// A non-fatal diagnostic for input the parser could not interpret
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    /// What went wrong
    pub kind: WarningKind,
    /// The offending line, trimmed; empty for structural warnings
    pub raw_line: String,
    /// 1-based line number in the input, when the warning concerns a line
    pub line_number: Option<usize>,
}

impl ParseWarning {
    /// Warning for a single line
    #[must_use]
    pub fn for_line(kind: WarningKind, line: SourceLine<'_>) -> Self {
        Self {
            kind,
            raw_line: line.text.trim().to_owned(),
            line_number: Some(line.number),
        }
    }

    /// The single warning returned when no day header exists
    #[must_use]
    pub fn no_day_delimiter() -> Self {
        Self {
            kind: WarningKind::NoDayDelimiter,
            raw_line: String::new(),
            line_number: None,
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line_number {
            Some(number) => write!(f, "line {number}: {}: {}", self.kind, self.raw_line),
            None => write!(f, "{}: no line starting with \"Day\" was found", self.kind),
        }
    }
}

/// Result of interpreting one line
#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    /// The line became a record
    Parsed(MealRecord),
    /// The line was skipped with a warning
    Warned(ParseWarning),
}

/// Records and warnings from one parse call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseOutcome {
    /// Successfully parsed meals, in input order
    pub records: Vec<MealRecord>,
    /// Every line (or structural problem) that produced no record
    pub warnings: Vec<ParseWarning>,
}

impl ParseOutcome {
    /// Outcome for text without any day header
    #[must_use]
    pub fn structurally_empty() -> Self {
        Self {
            records: Vec::new(),
            warnings: vec![ParseWarning::no_day_delimiter()],
        }
    }

    /// Fold one line result into the outcome
    pub fn push(&mut self, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Parsed(record) => self.records.push(record),
            LineOutcome::Warned(warning) => self.warnings.push(warning),
        }
    }

    /// True when the text had no day header at all
    #[must_use]
    pub fn is_structurally_empty(&self) -> bool {
        self.warnings.iter().any(|w| w.kind.is_structural())
    }

    /// Warnings that concern individual lines
    pub fn line_warnings(&self) -> impl Iterator<Item = &ParseWarning> {
        self.warnings.iter().filter(|w| !w.kind.is_structural())
    }

    /// Share of interpreted lines that produced a warning, in `0.0..=1.0`
    ///
    /// Structurally empty text counts as a ratio of 1.0; text with no meal
    /// lines at all counts as 0.0.
    #[must_use]
    pub fn warning_ratio(&self) -> f64 {
        if self.is_structurally_empty() {
            return 1.0;
        }
        let warned = self.line_warnings().count();
        let total = warned + self.records.len();
        if total == 0 {
            0.0
        } else {
            warned as f64 / total as f64
        }
    }
}

impl Extend<LineOutcome> for ParseOutcome {
    fn extend<I: IntoIterator<Item = LineOutcome>>(&mut self, iter: I) {
        for outcome in iter {
            self.push(outcome);
        }
    }
}

/// Caller policy for deciding whether a parse is good enough to keep
///
/// The parser never retries on its own; callers that can regenerate the
/// text (see `planner`) consult this.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldPolicy {
    /// Highest acceptable `warning_ratio`
    pub max_warning_ratio: f64,
    /// Fewest records an acceptable parse may contain
    pub min_records: usize,
}

impl Default for YieldPolicy {
    fn default() -> Self {
        Self {
            max_warning_ratio: defaults::PLAN_MAX_WARNING_RATIO,
            min_records: defaults::PLAN_MIN_RECORDS,
        }
    }
}

impl YieldPolicy {
    /// Whether the outcome is poor enough to regenerate the text
    #[must_use]
    pub fn should_retry(&self, outcome: &ParseOutcome) -> bool {
        outcome.records.len() < self.min_records
            || outcome.warning_ratio() > self.max_warning_ratio
    }
}

/// Parse generated meal plan text, stamping records with the current time
///
/// Never fails: malformed lines become warnings, and text without any day
/// header yields no records and a single `no-day-delimiter` warning.
#[must_use]
pub fn parse_meal_plan(text: &str, cuisine: &str) -> ParseOutcome {
    parse_meal_plan_at(text, cuisine, Utc::now())
}

/// Parse generated meal plan text with an explicit `created_at` timestamp
#[must_use]
pub fn parse_meal_plan_at(text: &str, cuisine: &str, created_at: DateTime<Utc>) -> ParseOutcome {
    let Some(segments) = grammar::split_day_segments(text) else {
        debug!(
            input_len = text.len(),
            "Meal plan text has no day header; returning structural warning"
        );
        return ParseOutcome::structurally_empty();
    };

    let mut outcome = ParseOutcome::default();
    for segment in &segments {
        outcome.extend(
            segment
                .lines
                .iter()
                .map(|line| parse_line(*line, segment.day_index, cuisine, created_at)),
        );
    }

    debug!(
        days = segments.len(),
        records = outcome.records.len(),
        warnings = outcome.warnings.len(),
        cuisine,
        "Parsed meal plan text"
    );
    outcome
}

/// Interpret one content line of a day segment
#[must_use]
pub fn parse_line(
    line: SourceLine<'_>,
    day_index: NonZeroU32,
    cuisine: &str,
    created_at: DateTime<Utc>,
) -> LineOutcome {
    let tokens = match grammar::tokenize_meal_line(line.text) {
        Ok(tokens) => tokens,
        Err(error) => return LineOutcome::Warned(ParseWarning::for_line(error.into(), line)),
    };

    match MealRecord::new(
        day_index,
        tokens.slot,
        tokens.dish,
        tokens.calories,
        tokens.protein_g,
        tokens.carbs_g,
        tokens.fat_g,
        cuisine,
        created_at,
    ) {
        Ok(record) => LineOutcome::Parsed(record),
        Err(error) => LineOutcome::Warned(ParseWarning::for_line(error.into(), line)),
    }
}
