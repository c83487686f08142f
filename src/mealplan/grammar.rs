// ABOUTME: Tokenizer for model-generated meal plan text
// ABOUTME: Splits day segments and breaks meal lines into slot, dish, and nutrient tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Healy Health Companion

//! # Meal Plan Grammar
//!
//! ```text
//! plan       := preamble day-segment*
//! day-segment:= day-header line*
//! day-header := decoration* "day" (non-letter | end-of-line) ...
//! line       := blank | decorative | meal-line | other
//! meal-line  := ["|"] slot-dish "|" nutrient "|" nutrient "|" nutrient "|" nutrient ("|" extra)* ["|"]
//! slot-dish  := [slot ":"] dish
//! nutrient   := [label ":"] [approx] number [unit] [trailer]
//! ```
//!
//! Every way a line can fail is a [`LineError`] variant, so the parser can
//! report it without guessing.

use std::num::NonZeroU32;
use std::sync::OnceLock;

use healy_core::models::{MealSlot, Nutrient};
use regex::Regex;

/// Characters that carry formatting only (markdown emphasis, rules, bullets)
const DECORATION: &[char] = &['*', '#', '_', '-', '=', '~', '>', '•', '`', '|'];

/// Emphasis characters trimmed from both ends of labels and dishes
const EMPHASIS: &[char] = &['*', '_', '`'];

/// Minimum pipe-delimited fields on a meal line
pub const MEAL_LINE_FIELDS: usize = 5;

/// Characters that join a second number directly onto the first
const NUMBER_JOINERS: &[char] = &[',', '.', '-', '\u{2013}', '/'];

/// Range separators, also recognised with surrounding spaces
const RANGE_JOINERS: &[char] = &['-', '\u{2013}', '/'];

const CALORIE_UNITS: &[&str] = &["cal", "cals", "calorie", "calories", "kcal", "kcals"];
const GRAM_UNITS: &[&str] = &["g", "gm", "gms", "gr", "gram", "grams"];

fn day_header_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?i)^day(?:[^\p{L}]|$)").ok())
        .as_ref()
}

fn day_label_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?i)^day\s*[#:\-–]?\s*(?:\d+(?:st|nd|rd|th)?\b|(?:one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen)\b)?(?:\s*[,:\-–(]?\s*(?:mon|tues|wednes|thurs|fri|satur|sun)day\b\)?)?",
            )
            .ok()
        })
        .as_ref()
}

/// Whether the line opens with a hyphenated compound such as `"Day-by-day"`
fn is_day_compound(undecorated: &str) -> bool {
    let mut after = undecorated.chars().skip(3);
    after.next() == Some('-') && after.next().is_some_and(char::is_alphabetic)
}

fn nutrient_value_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r"(?i)^(?:~|≈|approx(?:imately|\.)?|about)?\s*((?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?)\s*([a-z]+)?",
            )
            .ok()
        })
        .as_ref()
}

fn list_number_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^\d{1,2}[.)]\s+").ok())
        .as_ref()
}

/// One line of the input with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLine<'a> {
    /// 1-based line number in the full input
    pub number: usize,
    /// Raw line text, untrimmed
    pub text: &'a str,
}

/// The lines belonging to one day of the plan, header excluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySegment<'a> {
    /// 1-based ordinal position of the segment
    pub day_index: NonZeroU32,
    /// Content lines (blank and decorative lines already removed)
    pub lines: Vec<SourceLine<'a>>,
}

/// Classification of a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only
    Blank,
    /// Formatting markers only (`**`, `---`, `|---|---|`)
    Decorative,
    /// Starts a new day segment; carries any meal text sharing the header line
    DayHeader {
        /// Text after the header that looks like a meal line
        trailing: Option<&'a str>,
    },
    /// Anything else
    Content(&'a str),
}

/// Why a content line could not be read as a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    /// Fewer than [`MEAL_LINE_FIELDS`] pipe-delimited fields
    InsufficientFields {
        /// Number of fields actually present
        found: usize,
    },
    /// Nothing left of the dish after trimming
    EmptyDish,
    /// The named nutrient has no readable non-negative number or a wrong unit
    Nutrient(Nutrient),
}

/// A meal line split into its tokens
#[derive(Debug, Clone, PartialEq)]
pub struct MealTokens<'a> {
    /// Slot classification
    pub slot: MealSlot,
    /// Dish text, trimmed
    pub dish: &'a str,
    /// Calories, rounded to the nearest integer
    pub calories: u32,
    /// Protein grams
    pub protein_g: f64,
    /// Carbohydrate grams
    pub carbs_g: f64,
    /// Fat grams
    pub fat_g: f64,
}

/// Classify one line of generated text
#[must_use]
pub fn classify_line(line: &str) -> LineKind<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.chars().all(|c| c.is_whitespace() || DECORATION.contains(&c)) {
        return LineKind::Decorative;
    }

    let undecorated =
        trimmed.trim_start_matches(|c: char| c.is_whitespace() || DECORATION.contains(&c));
    let is_header = day_header_pattern().is_some_and(|re| re.is_match(undecorated));
    if is_header && !is_day_compound(undecorated) {
        let label_end = day_label_pattern()
            .and_then(|re| re.find(undecorated))
            .map_or(3, |found| found.end());
        let trailing = undecorated[label_end..]
            .trim_start_matches(|c: char| {
                c.is_whitespace() || c == ':' || c == '-' || EMPHASIS.contains(&c)
            })
            .trim_end();
        let trailing = (trailing.contains('|')).then_some(trailing);
        return LineKind::DayHeader { trailing };
    }

    LineKind::Content(trimmed)
}

/// Split text into day segments
///
/// Lines before the first day header are preamble and are dropped. Day
/// indices are ordinal positions; numerals inside headers are never read.
/// Returns `None` when the text contains no day header at all.
#[must_use]
pub fn split_day_segments(text: &str) -> Option<Vec<DaySegment<'_>>> {
    let mut segments: Vec<DaySegment<'_>> = Vec::new();

    for (offset, line) in text.lines().enumerate() {
        let number = offset + 1;
        match classify_line(line) {
            LineKind::DayHeader { trailing } => {
                let ordinal = u32::try_from(segments.len() + 1).unwrap_or(u32::MAX);
                let day_index = NonZeroU32::new(ordinal).unwrap_or(NonZeroU32::MAX);
                let mut lines = Vec::new();
                if let Some(text) = trailing {
                    lines.push(SourceLine { number, text });
                }
                segments.push(DaySegment { day_index, lines });
            }
            LineKind::Content(text) => {
                if let Some(current) = segments.last_mut() {
                    current.lines.push(SourceLine { number, text });
                }
            }
            LineKind::Blank | LineKind::Decorative => {}
        }
    }

    (!segments.is_empty()).then_some(segments)
}

/// Break a content line into meal tokens
///
/// # Errors
///
/// Returns the first [`LineError`] encountered, checking field count, then
/// nutrients in line order, then the dish.
pub fn tokenize_meal_line(line: &str) -> Result<MealTokens<'_>, LineError> {
    let line = line.trim();
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);

    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() < MEAL_LINE_FIELDS {
        return Err(LineError::InsufficientFields {
            found: fields.len(),
        });
    }

    let calories = parse_calories(fields[1]).ok_or(LineError::Nutrient(Nutrient::Calories))?;
    let protein_g = parse_grams(fields[2]).ok_or(LineError::Nutrient(Nutrient::Protein))?;
    let carbs_g = parse_grams(fields[3]).ok_or(LineError::Nutrient(Nutrient::Carbs))?;
    let fat_g = parse_grams(fields[4]).ok_or(LineError::Nutrient(Nutrient::Fat))?;

    let (slot, dish) = split_slot_and_dish(fields[0]);
    if dish.is_empty() {
        return Err(LineError::EmptyDish);
    }

    Ok(MealTokens {
        slot,
        dish,
        calories,
        protein_g,
        carbs_g,
        fat_g,
    })
}

/// Split the first field on its first `:` into slot and dish
fn split_slot_and_dish(field: &str) -> (MealSlot, &str) {
    let field = field.trim_start_matches(|c: char| c.is_whitespace() || DECORATION.contains(&c));
    let field = list_number_pattern()
        .and_then(|re| re.find(field))
        .map_or(field, |m| &field[m.end()..]);

    match field.split_once(':') {
        Some((label, dish)) => (MealSlot::from_label(trim_emphasis(label)), trim_emphasis(dish)),
        None => (MealSlot::Unknown, trim_emphasis(field)),
    }
}

fn trim_emphasis(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || EMPHASIS.contains(&c))
}

/// Extract the numeric value and optional unit from a nutrient field
///
/// Takes the text after the field's last `:`; without a `:` a leading label
/// word (`"Calories 450"`) is skipped. Returns the number and the lowercased
/// alphabetic suffix, or `None` when no number leads the value or unexpected
/// text is glued to it.
fn nutrient_value(field: &str) -> Option<(f64, Option<String>)> {
    let value = field.rsplit_once(':').map_or_else(
        || field.trim_start_matches(|c: char| c.is_alphabetic() || c.is_whitespace()),
        |(_, value)| value,
    );
    let value = trim_emphasis(value);

    let captures = nutrient_value_pattern()?.captures(value)?;
    let number = captures.get(1)?;
    let unit = captures.get(2).map(|m| m.as_str().to_lowercase());

    let consumed = captures.get(0)?.end();
    let rest = &value[consumed..];
    if rest.starts_with(|c: char| c.is_ascii_alphanumeric()) || continues_number(rest) {
        return None;
    }

    let amount: f64 = number.as_str().replace(',', "").parse().ok()?;
    amount.is_finite().then_some((amount, unit))
}

/// Whether the text after a number turns it into a range, list or decimal
/// comma (`"-450"`, `",5g"`, `" / 12g"`)
fn continues_number(rest: &str) -> bool {
    let leads_with_digit = |text: &str| text.starts_with(|c: char| c.is_ascii_digit());
    if rest.strip_prefix(NUMBER_JOINERS).is_some_and(leads_with_digit) {
        return true;
    }
    rest.trim_start()
        .strip_prefix(RANGE_JOINERS)
        .is_some_and(|after| leads_with_digit(after.trim_start()))
}

/// Parse a calorie field such as `"Calories: 450 calories"` or `"~1,200 kcal"`
///
/// Fractional values are rounded to the nearest integer, halves away from
/// zero (`"250.5"` becomes 251). Returns `None` for missing numbers, a
/// non-calorie unit, or values beyond `u32`.
#[must_use]
pub fn parse_calories(field: &str) -> Option<u32> {
    let (amount, unit) = nutrient_value(field)?;
    if unit.is_some_and(|u| !CALORIE_UNITS.contains(&u.as_str())) {
        return None;
    }
    let rounded = amount.round();
    (rounded <= f64::from(u32::MAX)).then_some(rounded as u32)
}

/// Parse a gram field such as `"Protein: 32.5g"`
///
/// Returns `None` for missing numbers or a unit other than grams.
#[must_use]
pub fn parse_grams(field: &str) -> Option<f64> {
    let (amount, unit) = nutrient_value(field)?;
    if unit.is_some_and(|u| !GRAM_UNITS.contains(&u.as_str())) {
        return None;
    }
    Some(amount)
}
