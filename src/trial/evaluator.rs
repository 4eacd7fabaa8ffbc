//! Trial evaluation

use crate::card::{Card, Rule};

/// Outcome of comparing the target with the chosen reference card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub is_correct: bool,
    /// First attribute, in color-shape-count order, on which the cards agree
    pub matched_dimension: Option<Rule>,
}

/// First dimension the two cards share, independent of the active rule
#[inline]
pub fn matched_dimension(target: &Card, chosen: &Card) -> Option<Rule> {
    Rule::PRIORITY
        .into_iter()
        .find(|rule| target.agrees_on(chosen, *rule))
}

/// Judge a single sort under `rule`
#[inline]
pub fn evaluate(target: &Card, chosen: &Card, rule: Rule) -> Evaluation {
    Evaluation {
        is_correct: target.agrees_on(chosen, rule),
        matched_dimension: matched_dimension(target, chosen),
    }
}
