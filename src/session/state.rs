//! Session state machine
//!
//! All cross-trial memory for one subject lives in [`SessionState`]. The
//! only mutating entry points are [`SessionState::start`],
//! [`SessionState::submit_choice`] and the reset methods; each validates
//! its preconditions before touching any field.

use crate::card::{Card, Rule, StimulusGenerator};
use crate::config::SessionConfig;
use crate::error::{CardSortError, Result};
use crate::trial::{classify, evaluate, TrialMemory, TrialRecord};
use serde::Serialize;

use super::SessionSummary;

/// Lifecycle of an assessment session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    Running,
    Finished,
}

impl SessionPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionPhase::NotStarted => "not_started",
            SessionPhase::Running => "running",
            SessionPhase::Finished => "finished",
        }
    }
}

/// Mutable state of one assessment session
#[derive(Debug, Clone)]
pub struct SessionState {
    config: SessionConfig,
    generator: StimulusGenerator,
    phase: SessionPhase,
    target: Card,
    trial_count: u32,
    rule_index: usize,
    categories_achieved: u32,
    memory: TrialMemory,
    last_feedback: Option<bool>,
    log: Vec<TrialRecord>,
}

impl SessionState {
    /// Validate `config` and build a session waiting for [`start`](Self::start)
    pub fn new(config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let mut generator = StimulusGenerator::new(config.seed);
        let target = generator.next_target();
        let capacity = config.max_trials.min(1024) as usize;

        Ok(Self {
            config,
            generator,
            phase: SessionPhase::NotStarted,
            target,
            trial_count: 0,
            rule_index: 0,
            categories_achieved: 0,
            memory: TrialMemory::default(),
            last_feedback: None,
            log: Vec::with_capacity(capacity),
        })
    }

    /// Move from `NotStarted` to `Running`; no-op in any other phase
    pub fn start(&mut self) -> SessionPhase {
        if self.phase == SessionPhase::NotStarted {
            self.phase = SessionPhase::Running;
            tracing::info!(
                max_trials = self.config.max_trials,
                required_correct = self.config.required_correct,
                max_categories = self.config.max_categories,
                "card sorting session started"
            );
        }
        self.phase
    }

    /// Score the subject's choice against the current target
    ///
    /// Fails without mutating anything when the session is not running or
    /// `choice_index` does not name a reference card.
    pub fn submit_choice(&mut self, choice_index: usize) -> Result<TrialRecord> {
        match self.phase {
            SessionPhase::NotStarted => {
                tracing::warn!(choice_index, "choice submitted before session start");
                return Err(CardSortError::SessionNotStarted);
            }
            SessionPhase::Finished => {
                tracing::warn!(choice_index, "choice submitted after session finished");
                return Err(CardSortError::SessionAlreadyFinished);
            }
            SessionPhase::Running => {}
        }

        let available = self.config.reference_cards.len();
        let Some(chosen) = self.config.reference_cards.get(choice_index).copied() else {
            tracing::warn!(choice_index, available, "choice outside reference cards");
            return Err(CardSortError::InvalidChoice {
                index: choice_index,
                available,
            });
        };

        let target = self.target;
        let rule = self.current_rule();
        let eval = evaluate(&target, &chosen, rule);
        let error_category = if eval.is_correct {
            None
        } else {
            Some(classify(&eval, rule, &self.memory))
        };

        let record = TrialRecord {
            trial: self.trial_count + 1,
            target,
            choice_index,
            chosen,
            rule,
            matched_dimension: eval.matched_dimension,
            is_correct: eval.is_correct,
            error_category,
            categories_achieved: self.categories_achieved,
        };
        self.log.push(record.clone());

        tracing::debug!(
            trial = record.trial,
            %rule,
            correct = eval.is_correct,
            matched = ?eval.matched_dimension,
            error = ?error_category,
            "trial scored"
        );

        if eval.is_correct {
            self.memory.consecutive_correct += 1;
            self.memory.last_wrong_dimension = None;
            self.memory.rule_just_switched = false;

            if self.memory.consecutive_correct >= self.config.required_correct {
                self.categories_achieved += 1;
                self.memory.last_mastered_rule = Some(rule);
                self.rule_index += 1;
                self.memory.consecutive_correct = 0;
                self.memory.rule_just_switched = true;
                tracing::info!(
                    categories_achieved = self.categories_achieved,
                    mastered = %rule,
                    next_rule = %self.current_rule(),
                    "category achieved"
                );
            }
        } else {
            self.memory.consecutive_correct = 0;
            self.memory.last_wrong_dimension = eval.matched_dimension;
            self.memory.rule_just_switched = false;
        }

        self.last_feedback = Some(eval.is_correct);
        self.trial_count += 1;
        self.target = self.generator.next_target();

        if self.trial_count >= self.config.max_trials
            || self.categories_achieved >= self.config.max_categories
        {
            self.phase = SessionPhase::Finished;
            tracing::info!(
                trials = self.trial_count,
                categories_achieved = self.categories_achieved,
                "card sorting session finished"
            );
        }

        Ok(record)
    }

    /// Discard all progress and the log, keeping the configuration
    ///
    /// The random source carries on, so the next run sees new targets.
    pub fn reset(&mut self) {
        tracing::info!(
            discarded_trials = self.log.len(),
            "card sorting session reset"
        );
        self.phase = SessionPhase::NotStarted;
        self.trial_count = 0;
        self.rule_index = 0;
        self.categories_achieved = 0;
        self.memory = TrialMemory::default();
        self.last_feedback = None;
        self.log.clear();
        self.target = self.generator.next_target();
    }

    /// Replace the configuration and reset; an invalid config leaves the session untouched
    pub fn reset_with(&mut self, config: SessionConfig) -> Result<()> {
        let fresh = SessionState::new(config)?;
        tracing::info!(
            discarded_trials = self.log.len(),
            "card sorting session reset with new configuration"
        );
        *self = fresh;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------------

    #[inline]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Card waiting to be sorted
    #[inline]
    pub fn target(&self) -> &Card {
        &self.target
    }

    #[inline]
    pub fn trial_count(&self) -> u32 {
        self.trial_count
    }

    #[inline]
    pub fn categories_achieved(&self) -> u32 {
        self.categories_achieved
    }

    #[inline]
    pub fn consecutive_correct(&self) -> u32 {
        self.memory.consecutive_correct
    }

    #[inline]
    pub fn rule_index(&self) -> usize {
        self.rule_index
    }

    #[inline]
    pub fn current_rule(&self) -> Rule {
        self.config.rule_schedule.rule_at(self.rule_index)
    }

    #[inline]
    pub fn rule_just_switched(&self) -> bool {
        self.memory.rule_just_switched
    }

    #[inline]
    pub fn last_wrong_dimension(&self) -> Option<Rule> {
        self.memory.last_wrong_dimension
    }

    #[inline]
    pub fn last_mastered_rule(&self) -> Option<Rule> {
        self.memory.last_mastered_rule
    }

    /// Whether the previous trial was correct; `None` before the first trial
    #[inline]
    pub fn last_feedback(&self) -> Option<bool> {
        self.last_feedback
    }

    pub fn log(&self) -> &[TrialRecord] {
        &self.log
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn reference_cards(&self) -> &[Card] {
        &self.config.reference_cards
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_log(&self.log, self.categories_achieved)
    }

    /// Serialize the trial log for export
    pub fn log_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.log)?)
    }

    #[cfg(test)]
    pub(crate) fn set_target(&mut self, target: Card) {
        self.target = target;
    }
}
