//! Session configuration
//!
//! Configuration arrives either as a Python dict from the UI layer or as
//! JSON. Every key is optional; missing keys fall back to the standard
//! 64-trial, six-category administration.

mod schedule;

pub use schedule::*;

use crate::card::{default_reference_cards, Card, Count, Rule};
use crate::error::{CardSortError, Result};
use pyo3::types::{PyAnyMethods, PyDict, PyDictMethods, PyList, PyListMethods};
use pyo3::Bound;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

pub const DEFAULT_MAX_TRIALS: u32 = 64;
pub const DEFAULT_REQUIRED_CORRECT: u32 = 6;
pub const DEFAULT_MAX_CATEGORIES: u32 = 6;

/// Inline capacity covers the four standard reference cards
pub type ReferenceCards = SmallVec<[Card; 4]>;

/// Configuration for a single assessment session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionConfig {
    pub max_trials: u32,
    pub required_correct: u32,
    pub max_categories: u32,
    pub rule_schedule: RuleSchedule,
    pub reference_cards: ReferenceCards,
    /// Fixed seed for reproducible target sequences
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_trials: DEFAULT_MAX_TRIALS,
            required_correct: DEFAULT_REQUIRED_CORRECT,
            max_categories: DEFAULT_MAX_CATEGORIES,
            rule_schedule: RuleSchedule::default(),
            reference_cards: default_reference_cards().into_iter().collect(),
            seed: None,
        }
    }
}

impl SessionConfig {
    /// Check the configuration before any trial can run
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("max_trials", self.max_trials),
            ("required_correct", self.required_correct),
            ("max_categories", self.max_categories),
        ];
        for (name, value) in limits {
            if value == 0 {
                return Err(CardSortError::InvalidConfiguration(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        if self.rule_schedule.is_empty() {
            return Err(CardSortError::InvalidConfiguration(
                "rule_schedule must not be empty".to_string(),
            ));
        }
        if self.reference_cards.len() < 2 {
            return Err(CardSortError::InvalidConfiguration(format!(
                "at least 2 reference cards required, got {}",
                self.reference_cards.len()
            )));
        }
        // Each value of each attribute may appear on at most one reference card
        for (i, a) in self.reference_cards.iter().enumerate() {
            for (j, b) in self.reference_cards.iter().enumerate().skip(i + 1) {
                if let Some(rule) = Rule::PRIORITY.into_iter().find(|r| a.agrees_on(b, *r)) {
                    return Err(CardSortError::InvalidConfiguration(format!(
                        "reference cards {} and {} share {}",
                        i, j, rule
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSessionConfig = serde_json::from_str(json)?;
        SessionConfig::try_from(raw)
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }
}

// ============================================================================
// Raw (unvalidated) configuration
// ============================================================================

/// Card as written in a configuration, before its values are checked
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawCard {
    pub color: String,
    pub shape: String,
    #[serde(alias = "number")]
    pub count: i64,
}

impl TryFrom<&RawCard> for Card {
    type Error = CardSortError;

    fn try_from(raw: &RawCard) -> Result<Self> {
        let count = u8::try_from(raw.count).map_err(|_| {
            CardSortError::DeserializationError(format!("Count out of range: {}", raw.count))
        })?;
        Ok(Card::new(raw.color.parse()?, raw.shape.parse()?, Count::new(count)?))
    }
}

/// Configuration as received from JSON or a Python dict
///
/// Limits are signed so that zero, negative and oversized values all reach
/// the same `InvalidConfiguration` check instead of failing as a type error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawSessionConfig {
    pub max_trials: Option<i64>,
    pub required_correct: Option<i64>,
    pub max_categories: Option<i64>,
    pub rule_schedule: Option<Vec<String>>,
    pub reference_cards: Option<Vec<RawCard>>,
    pub seed: Option<u64>,
}

/// Read a positive limit, keeping the default when the key is absent
fn positive_limit(name: &str, value: Option<i64>, default: u32) -> Result<u32> {
    let Some(value) = value else {
        return Ok(default);
    };
    match u32::try_from(value) {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(CardSortError::InvalidConfiguration(format!(
            "{} must be a positive integer, got {}",
            name, value
        ))),
    }
}

impl TryFrom<RawSessionConfig> for SessionConfig {
    type Error = CardSortError;

    fn try_from(raw: RawSessionConfig) -> Result<Self> {
        let defaults = SessionConfig::default();

        let rule_schedule = match raw.rule_schedule {
            Some(names) => RuleSchedule::new(
                names
                    .iter()
                    .map(|name| name.parse::<Rule>())
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => defaults.rule_schedule,
        };

        let reference_cards = match raw.reference_cards {
            Some(cards) => cards
                .iter()
                .map(Card::try_from)
                .collect::<Result<ReferenceCards>>()?,
            None => defaults.reference_cards,
        };

        let config = SessionConfig {
            max_trials: positive_limit("max_trials", raw.max_trials, defaults.max_trials)?,
            required_correct: positive_limit(
                "required_correct",
                raw.required_correct,
                defaults.required_correct,
            )?,
            max_categories: positive_limit(
                "max_categories",
                raw.max_categories,
                defaults.max_categories,
            )?,
            rule_schedule,
            reference_cards,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Python Deserialization
// ============================================================================

/// Helper to get attribute from either dict or object
fn get_attr_opt<'py>(obj: &Bound<'py, pyo3::PyAny>, name: &str) -> Option<Bound<'py, pyo3::PyAny>> {
    let value = if let Ok(dict) = obj.downcast::<PyDict>() {
        dict.get_item(name).ok().flatten()
    } else {
        obj.getattr(name).ok()
    };
    value.filter(|v| !v.is_none())
}

/// Deserialize a session configuration from a Python dict
///
/// Expected format (all keys optional):
/// `{"max_trials": 64, "required_correct": 6, "max_categories": 6,
///   "rule_schedule": ["color", "shape", ...],
///   "reference_cards": [{"color": "red", "shape": "triangle", "count": 1}, ...],
///   "seed": 42}`
///
/// Only moves values into a [`RawSessionConfig`]; all checks happen in its
/// conversion, shared with the JSON path.
pub fn deserialize_config(config: &Bound<'_, PyDict>) -> pyo3::PyResult<SessionConfig> {
    let obj = config.as_any();

    let reference_cards = match get_attr_opt(obj, "reference_cards") {
        Some(list) => {
            let list: Bound<'_, PyList> = list.extract()?;
            let mut cards = Vec::with_capacity(list.len());
            for item in list.iter() {
                cards.push(extract_card(&item)?);
            }
            Some(cards)
        }
        None => None,
    };

    let raw = RawSessionConfig {
        max_trials: get_attr_opt(obj, "max_trials").map(|v| v.extract::<i64>()).transpose()?,
        required_correct: get_attr_opt(obj, "required_correct").map(|v| v.extract::<i64>()).transpose()?,
        max_categories: get_attr_opt(obj, "max_categories").map(|v| v.extract::<i64>()).transpose()?,
        rule_schedule: get_attr_opt(obj, "rule_schedule").map(|v| v.extract::<Vec<String>>()).transpose()?,
        reference_cards,
        seed: get_attr_opt(obj, "seed").map(|v| v.extract::<u64>()).transpose()?,
    };
    Ok(SessionConfig::try_from(raw)?)
}

fn extract_card(obj: &Bound<'_, pyo3::PyAny>) -> pyo3::PyResult<RawCard> {
    let missing =
        |name: &str| CardSortError::DeserializationError(format!("card is missing '{}'", name));

    let color: String = get_attr_opt(obj, "color")
        .ok_or_else(|| missing("color"))?
        .extract()?;
    let shape: String = get_attr_opt(obj, "shape")
        .ok_or_else(|| missing("shape"))?
        .extract()?;
    // Support both "count" and "number" field names
    let count: i64 = get_attr_opt(obj, "count")
        .or_else(|| get_attr_opt(obj, "number"))
        .ok_or_else(|| missing("count"))?
        .extract()?;

    Ok(RawCard { color, shape, count })
}
