//! Trial evaluation and error classification

mod classifier;
mod evaluator;

#[cfg(test)]
mod property_tests;

pub use classifier::*;
pub use evaluator::*;

use crate::card::{Card, Rule};
use serde::Serialize;

/// Immutable record of one evaluated trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialRecord {
    /// 1-based trial number
    pub trial: u32,
    pub target: Card,
    pub choice_index: usize,
    pub chosen: Card,
    pub rule: Rule,
    pub matched_dimension: Option<Rule>,
    pub is_correct: bool,
    /// `None` for correct trials
    pub error_category: Option<ErrorCategory>,
    /// Categories achieved before this trial was scored
    pub categories_achieved: u32,
}
