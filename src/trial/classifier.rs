//! Error taxonomy for incorrect sorts

use super::Evaluation;
use crate::card::Rule;
use serde::Serialize;

/// Streak length from which a lapse counts as a failure to maintain set
pub const SET_MAINTENANCE_STREAK: u32 = 3;

/// Clinical category of an incorrect response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Still sorting by the rule that was just mastered
    Milner,
    /// Repeating the dimension of the previous wrong sort
    Nelson,
    /// Lapse during an established correct streak
    FailureToMaintain,
    /// Non-perseverative error
    Other,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 4] = [
        ErrorCategory::Milner,
        ErrorCategory::Nelson,
        ErrorCategory::FailureToMaintain,
        ErrorCategory::Other,
    ];

    /// Stable machine code
    pub fn code(self) -> &'static str {
        match self {
            ErrorCategory::Milner => "milner",
            ErrorCategory::Nelson => "nelson",
            ErrorCategory::FailureToMaintain => "failure_to_maintain",
            ErrorCategory::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Milner => "Milner-type perseveration",
            ErrorCategory::Nelson => "Nelson-type perseveration",
            ErrorCategory::FailureToMaintain => "Failure to maintain set",
            ErrorCategory::Other => "Non-perseverative error",
        }
    }

    #[inline]
    pub fn is_perseverative(self) -> bool {
        matches!(self, ErrorCategory::Milner | ErrorCategory::Nelson)
    }
}

/// Cross-trial memory the classifier reads
///
/// Owned by the session; the classifier only ever sees a snapshot taken
/// before the current trial updates it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrialMemory {
    pub consecutive_correct: u32,
    /// Matched dimension of the previous trial, if that trial was wrong
    pub last_wrong_dimension: Option<Rule>,
    /// Rule in force just before the most recent switch
    pub last_mastered_rule: Option<Rule>,
    /// Set by a mastery, cleared by the next evaluated trial
    pub rule_just_switched: bool,
}

/// Classify an incorrect sort; the first matching category wins
pub fn classify(eval: &Evaluation, rule: Rule, memory: &TrialMemory) -> ErrorCategory {
    let matched = eval.matched_dimension;

    if memory.rule_just_switched
        && memory.last_mastered_rule.is_some()
        && matched == memory.last_mastered_rule
    {
        return ErrorCategory::Milner;
    }

    if memory.last_wrong_dimension.is_some()
        && matched == memory.last_wrong_dimension
        && matched != Some(rule)
    {
        return ErrorCategory::Nelson;
    }

    if memory.consecutive_correct >= SET_MAINTENANCE_STREAK {
        return ErrorCategory::FailureToMaintain;
    }

    ErrorCategory::Other
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrong(matched: Option<Rule>) -> Evaluation {
        Evaluation {
            is_correct: false,
            matched_dimension: matched,
        }
    }

    #[test]
    fn test_milner_after_switch() {
        let memory = TrialMemory {
            last_mastered_rule: Some(Rule::Color),
            rule_just_switched: true,
            ..Default::default()
        };
        assert_eq!(
            classify(&wrong(Some(Rule::Color)), Rule::Shape, &memory),
            ErrorCategory::Milner
        );
    }

    #[test]
    fn test_milner_requires_fresh_switch() {
        let memory = TrialMemory {
            last_mastered_rule: Some(Rule::Color),
            rule_just_switched: false,
            ..Default::default()
        };
        assert_eq!(
            classify(&wrong(Some(Rule::Color)), Rule::Shape, &memory),
            ErrorCategory::Other
        );
    }

    #[test]
    fn test_milner_beats_nelson() {
        let memory = TrialMemory {
            last_wrong_dimension: Some(Rule::Color),
            last_mastered_rule: Some(Rule::Color),
            rule_just_switched: true,
            consecutive_correct: 0,
        };
        assert_eq!(
            classify(&wrong(Some(Rule::Color)), Rule::Shape, &memory),
            ErrorCategory::Milner
        );
    }

    #[test]
    fn test_nelson_repeats_prior_wrong_dimension() {
        let memory = TrialMemory {
            last_wrong_dimension: Some(Rule::Color),
            ..Default::default()
        };
        assert_eq!(
            classify(&wrong(Some(Rule::Color)), Rule::Shape, &memory),
            ErrorCategory::Nelson
        );
        assert_eq!(
            classify(&wrong(Some(Rule::Count)), Rule::Shape, &memory),
            ErrorCategory::Other
        );
    }

    #[test]
    fn test_unmatched_sort_is_never_perseverative() {
        let memory = TrialMemory {
            last_wrong_dimension: None,
            last_mastered_rule: None,
            rule_just_switched: true,
            consecutive_correct: 0,
        };
        assert_eq!(classify(&wrong(None), Rule::Color, &memory), ErrorCategory::Other);
    }

    #[test]
    fn test_failure_to_maintain_threshold() {
        let mut memory = TrialMemory {
            consecutive_correct: 3,
            ..Default::default()
        };
        assert_eq!(
            classify(&wrong(Some(Rule::Count)), Rule::Color, &memory),
            ErrorCategory::FailureToMaintain
        );
        memory.consecutive_correct = 2;
        assert_eq!(
            classify(&wrong(Some(Rule::Count)), Rule::Color, &memory),
            ErrorCategory::Other
        );
    }

    #[test]
    fn test_category_codes() {
        let codes: Vec<_> = ErrorCategory::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes, ["milner", "nelson", "failure_to_maintain", "other"]);
        assert!(ErrorCategory::Nelson.is_perseverative());
        assert!(!ErrorCategory::FailureToMaintain.is_perseverative());
    }
}
