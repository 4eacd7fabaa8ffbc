//! Property tests for trial evaluation and classification

use proptest::prelude::*;

use crate::card::{Card, Color, Count, Rule, Shape};
use crate::trial::{classify, evaluate, matched_dimension, ErrorCategory, TrialMemory};

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

fn card_strategy() -> impl Strategy<Value = Card> {
    (0..4usize, 0..4usize, 1..=4u8).prop_map(|(c, s, n)| {
        Card::new(Color::ALL[c], Shape::ALL[s], Count::new(n).unwrap())
    })
}

fn rule_strategy() -> impl Strategy<Value = Rule> {
    prop_oneof![Just(Rule::Color), Just(Rule::Shape), Just(Rule::Count)]
}

fn memory_strategy() -> impl Strategy<Value = TrialMemory> {
    (
        0..6u32,
        prop::option::of(rule_strategy()),
        prop::option::of(rule_strategy()),
        any::<bool>(),
    )
        .prop_map(
            |(consecutive_correct, last_wrong_dimension, last_mastered_rule, rule_just_switched)| {
                TrialMemory {
                    consecutive_correct,
                    last_wrong_dimension,
                    last_mastered_rule,
                    rule_just_switched,
                }
            },
        )
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Correctness is exactly agreement on the active rule
    #[test]
    fn prop_correct_iff_rule_attribute_agrees(
        target in card_strategy(),
        chosen in card_strategy(),
        rule in rule_strategy()
    ) {
        let eval = evaluate(&target, &chosen, rule);
        prop_assert_eq!(eval.is_correct, target.agrees_on(&chosen, rule));
    }

    /// The matched dimension is a real agreement and nothing earlier in priority agrees
    #[test]
    fn prop_matched_dimension_is_first_agreement(
        target in card_strategy(),
        chosen in card_strategy()
    ) {
        match matched_dimension(&target, &chosen) {
            Some(dim) => {
                prop_assert!(target.agrees_on(&chosen, dim));
                for earlier in Rule::PRIORITY.iter().take_while(|r| **r != dim) {
                    prop_assert!(!target.agrees_on(&chosen, *earlier));
                }
            }
            None => {
                for rule in Rule::PRIORITY {
                    prop_assert!(!target.agrees_on(&chosen, rule));
                }
            }
        }
    }

    /// Evaluation is a pure function of its inputs
    #[test]
    fn prop_evaluate_deterministic(
        target in card_strategy(),
        chosen in card_strategy(),
        rule in rule_strategy()
    ) {
        prop_assert_eq!(evaluate(&target, &chosen, rule), evaluate(&target, &chosen, rule));
    }

    /// An incorrect sort never matches on the active rule, so Nelson never names it
    #[test]
    fn prop_incorrect_never_matches_rule(
        target in card_strategy(),
        chosen in card_strategy(),
        rule in rule_strategy()
    ) {
        let eval = evaluate(&target, &chosen, rule);
        if !eval.is_correct {
            prop_assert_ne!(eval.matched_dimension, Some(rule));
        }
    }

    /// Milner classification wins whenever its condition holds
    #[test]
    fn prop_milner_takes_precedence(
        target in card_strategy(),
        chosen in card_strategy(),
        rule in rule_strategy(),
        memory in memory_strategy()
    ) {
        let eval = evaluate(&target, &chosen, rule);
        prop_assume!(!eval.is_correct);
        let category = classify(&eval, rule, &memory);
        let milner = memory.rule_just_switched
            && eval.matched_dimension.is_some()
            && eval.matched_dimension == memory.last_mastered_rule;
        prop_assert_eq!(category == ErrorCategory::Milner, milner);
    }

    /// Low streaks without perseveration fall through to Other
    #[test]
    fn prop_short_streak_without_perseveration_is_other(
        target in card_strategy(),
        chosen in card_strategy(),
        rule in rule_strategy(),
        streak in 0..3u32
    ) {
        let eval = evaluate(&target, &chosen, rule);
        prop_assume!(!eval.is_correct);
        let memory = TrialMemory { consecutive_correct: streak, ..Default::default() };
        prop_assert_eq!(classify(&eval, rule, &memory), ErrorCategory::Other);
    }
}
