//! Rule schedule

use crate::card::Rule;
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

/// Inline capacity covers the standard six-category schedule
pub type RuleList = SmallVec<[Rule; 6]>;

/// Fixed, ordered list of classification rules, advanced on each mastery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSchedule {
    rules: RuleList,
}

impl RuleSchedule {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    /// Rule active at `index`
    ///
    /// Past the end of the schedule the first entry stays in force.
    #[inline]
    pub fn rule_at(&self, index: usize) -> Rule {
        match self.rules.get(index) {
            Some(rule) => *rule,
            None => self.rules.first().copied().unwrap_or(Rule::Color),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}

impl Default for RuleSchedule {
    fn default() -> Self {
        Self {
            rules: smallvec![
                Rule::Color,
                Rule::Shape,
                Rule::Count,
                Rule::Color,
                Rule::Shape,
                Rule::Count,
            ],
        }
    }
}
