//! SortingSession - Stateful session handle for the Python UI
//!
//! The UI keeps one `SortingSession` per subject and drives it with
//! `start`, `submit_choice` and `reset`. Trial records and summaries
//! cross the boundary as plain dicts so the UI can hand them straight to
//! its tables and charts.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::card::Card;
use crate::config::SessionConfig;
use crate::trial::TrialRecord;

use super::{SessionState, SessionSummary};

// ============================================================================
// SortingSession PyClass
// ============================================================================

/// One subject's assessment session
///
/// Not meant for concurrent use: the UI must serialize calls per session.
#[pyclass]
pub struct SortingSession {
    state: SessionState,
}

impl SortingSession {
    pub fn new(config: SessionConfig) -> crate::error::Result<Self> {
        Ok(Self {
            state: SessionState::new(config)?,
        })
    }
}

// ============================================================================
// PyMethods Implementation
// ============================================================================

#[pymethods]
impl SortingSession {
    // ------------------------------------------------------------------------
    // Transitions
    // ------------------------------------------------------------------------

    /// Begin the assessment; returns the phase name
    fn start(&mut self) -> &'static str {
        self.state.start().as_str()
    }

    /// Score a choice (0-based reference card index) and return the trial dict
    ///
    /// # Raises
    /// IndexError for an unknown card, RuntimeError if the session is not running
    fn submit_choice(&mut self, py: Python<'_>, choice_index: usize) -> PyResult<Py<PyAny>> {
        let record = self.state.submit_choice(choice_index)?;
        Ok(trial_to_dict(py, &record)?.into())
    }

    /// Discard the log and all progress; the session returns to not started
    fn reset(&mut self) {
        self.state.reset();
    }

    // ------------------------------------------------------------------------
    // Getter Properties
    // ------------------------------------------------------------------------

    #[getter]
    fn phase(&self) -> &'static str {
        self.state.phase().as_str()
    }

    #[getter]
    fn trial_count(&self) -> u32 {
        self.state.trial_count()
    }

    #[getter]
    fn categories_achieved(&self) -> u32 {
        self.state.categories_achieved()
    }

    #[getter]
    fn consecutive_correct(&self) -> u32 {
        self.state.consecutive_correct()
    }

    #[getter]
    fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    #[getter]
    fn current_rule(&self) -> &'static str {
        self.state.current_rule().as_str()
    }

    /// "correct", "incorrect" or None before the first trial
    #[getter]
    fn last_feedback(&self) -> Option<&'static str> {
        self.state
            .last_feedback()
            .map(|ok| if ok { "correct" } else { "incorrect" })
    }

    #[getter]
    fn max_trials(&self) -> u32 {
        self.state.config().max_trials
    }

    #[getter]
    fn required_correct(&self) -> u32 {
        self.state.config().required_correct
    }

    #[getter]
    fn max_categories(&self) -> u32 {
        self.state.config().max_categories
    }

    // ------------------------------------------------------------------------
    // Data Access Methods
    // ------------------------------------------------------------------------

    /// Card the subject must sort next
    fn current_target(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(card_to_dict(py, self.state.target())?.into())
    }

    fn reference_cards(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for card in self.state.reference_cards() {
            list.append(card_to_dict(py, card)?)?;
        }
        Ok(list.into())
    }

    /// Trial dict by 0-based log index, or None if out of bounds
    fn get_trial(&self, py: Python<'_>, index: usize) -> PyResult<Py<PyAny>> {
        match self.state.log().get(index) {
            Some(record) => Ok(trial_to_dict(py, record)?.into()),
            None => Ok(py.None()),
        }
    }

    /// Every trial so far, oldest first
    fn get_log(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        let list = PyList::empty(py);
        for record in self.state.log() {
            list.append(trial_to_dict(py, record)?)?;
        }
        Ok(list.into())
    }

    fn get_summary(&self, py: Python<'_>) -> PyResult<Py<PyAny>> {
        Ok(summary_to_dict(py, &self.state.summary())?.into())
    }

    /// Trial log as a JSON array, for export
    fn log_json(&self) -> PyResult<String> {
        Ok(self.state.log_json()?)
    }

    fn __len__(&self) -> usize {
        self.state.log().len()
    }

    fn __repr__(&self) -> String {
        format!(
            "SortingSession(phase={}, trials={}/{}, categories={}/{})",
            self.state.phase().as_str(),
            self.state.trial_count(),
            self.state.config().max_trials,
            self.state.categories_achieved(),
            self.state.config().max_categories,
        )
    }
}

// ============================================================================
// Conversion Helpers
// ============================================================================

fn card_to_dict<'py>(py: Python<'py>, card: &Card) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("color", card.color.as_str())?;
    dict.set_item("shape", card.shape.as_str())?;
    dict.set_item("count", card.count.get())?;
    Ok(dict)
}

fn trial_to_dict<'py>(py: Python<'py>, record: &TrialRecord) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("trial", record.trial)?;
    dict.set_item("target", card_to_dict(py, &record.target)?)?;
    dict.set_item("choice_index", record.choice_index)?;
    dict.set_item("chosen", card_to_dict(py, &record.chosen)?)?;
    dict.set_item("rule", record.rule.as_str())?;
    dict.set_item("matched_dimension", record.matched_dimension.map(|r| r.as_str()))?;
    dict.set_item("is_correct", record.is_correct)?;
    dict.set_item("error_category", record.error_category.map(|c| c.code()))?;
    dict.set_item("error_label", record.error_category.map(|c| c.label()))?;
    dict.set_item("categories_achieved", record.categories_achieved)?;
    Ok(dict)
}

fn summary_to_dict<'py>(py: Python<'py>, summary: &SessionSummary) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("total_trials", summary.total_trials)?;
    dict.set_item("total_correct", summary.total_correct)?;
    dict.set_item("total_errors", summary.total_errors)?;
    dict.set_item("categories_achieved", summary.categories_achieved)?;
    dict.set_item("perseverative_errors", summary.perseverative_errors)?;

    let errors = PyDict::new(py);
    for category in crate::trial::ErrorCategory::ALL {
        errors.set_item(category.code(), summary.errors.get(category))?;
    }
    dict.set_item("errors", errors)?;

    let blocks = PyList::empty(py);
    for block in &summary.blocks {
        let block_dict = PyDict::new(py);
        block_dict.set_item("midpoint", block.midpoint)?;
        block_dict.set_item("trials", block.trials)?;
        block_dict.set_item("correct", block.correct)?;
        block_dict.set_item("accuracy", block.accuracy)?;
        blocks.append(block_dict)?;
    }
    dict.set_item("blocks", blocks)?;

    Ok(dict)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_lifecycle_without_python() {
        let config = SessionConfig {
            seed: Some(5),
            ..Default::default()
        };
        let mut session = SortingSession::new(config).unwrap();
        assert_eq!(session.phase(), "not_started");
        assert_eq!(session.start(), "running");
        assert_eq!(session.current_rule(), "color");
        assert_eq!(session.last_feedback(), None);
        assert_eq!(session.max_trials(), 64);
        assert_eq!(
            session.__repr__(),
            "SortingSession(phase=running, trials=0/64, categories=0/6)"
        );

        session.reset();
        assert_eq!(session.phase(), "not_started");
        assert_eq!(session.__len__(), 0);
        assert!(!session.is_finished());
    }

    #[test]
    fn test_handle_rejects_invalid_config() {
        let config = SessionConfig {
            required_correct: 0,
            ..Default::default()
        };
        assert!(SortingSession::new(config).is_err());
    }
}
