//! Result summary computed from a session log

use crate::trial::{ErrorCategory, TrialRecord};
use serde::Serialize;

/// Trials per block in the accuracy curve
pub const BLOCK_SIZE: u32 = 10;

/// Error totals per clinical category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ErrorCounts {
    pub milner: u32,
    pub nelson: u32,
    pub failure_to_maintain: u32,
    pub other: u32,
}

impl ErrorCounts {
    #[inline]
    pub fn record(&mut self, category: ErrorCategory) {
        match category {
            ErrorCategory::Milner => self.milner += 1,
            ErrorCategory::Nelson => self.nelson += 1,
            ErrorCategory::FailureToMaintain => self.failure_to_maintain += 1,
            ErrorCategory::Other => self.other += 1,
        }
    }

    #[inline]
    pub fn get(&self, category: ErrorCategory) -> u32 {
        match category {
            ErrorCategory::Milner => self.milner,
            ErrorCategory::Nelson => self.nelson,
            ErrorCategory::FailureToMaintain => self.failure_to_maintain,
            ErrorCategory::Other => self.other,
        }
    }

    pub fn perseverative(&self) -> u32 {
        self.milner + self.nelson
    }

    pub fn total(&self) -> u32 {
        self.milner + self.nelson + self.failure_to_maintain + self.other
    }
}

/// Accuracy over one block of consecutive trials
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlockAccuracy {
    /// Block start plus half a block, e.g. 5 for trials 1-10
    pub midpoint: u32,
    pub trials: u32,
    pub correct: u32,
    pub accuracy: f64,
}

/// Aggregate scores for a completed (or in-progress) session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub total_trials: u32,
    pub total_correct: u32,
    pub total_errors: u32,
    pub categories_achieved: u32,
    pub errors: ErrorCounts,
    pub perseverative_errors: u32,
    pub blocks: Vec<BlockAccuracy>,
}

impl SessionSummary {
    pub fn from_log(log: &[TrialRecord], categories_achieved: u32) -> Self {
        let mut errors = ErrorCounts::default();
        let mut total_correct = 0;
        let mut blocks: Vec<BlockAccuracy> = Vec::new();

        for record in log {
            if record.is_correct {
                total_correct += 1;
            } else if let Some(category) = record.error_category {
                errors.record(category);
            }

            let midpoint = (record.trial.saturating_sub(1) / BLOCK_SIZE) * BLOCK_SIZE + BLOCK_SIZE / 2;
            match blocks.last_mut() {
                Some(block) if block.midpoint == midpoint => {
                    block.trials += 1;
                    block.correct += record.is_correct as u32;
                }
                _ => blocks.push(BlockAccuracy {
                    midpoint,
                    trials: 1,
                    correct: record.is_correct as u32,
                    accuracy: 0.0,
                }),
            }
        }

        for block in &mut blocks {
            block.accuracy = block.correct as f64 / block.trials as f64;
        }

        let total_trials = log.len() as u32;
        Self {
            total_trials,
            total_correct,
            total_errors: total_trials - total_correct,
            categories_achieved,
            perseverative_errors: errors.perseverative(),
            errors,
            blocks,
        }
    }
}
