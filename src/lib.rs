//! Card Sort Core - Scoring engine for a card sorting (WCST-style) assessment
//!
//! This crate decides whether each sort is correct, classifies the type of
//! error (Milner, Nelson, failure to maintain set, other), switches rules on
//! category mastery and ends the session, with Python bindings via PyO3 so
//! the UI layer only has to collect choices and display trial records.

use pyo3::prelude::*;

pub mod card;
pub mod config;
pub mod error;
pub mod session;
pub mod trial;

use crate::config::SessionConfig;
use crate::session::SortingSession;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use pyo3::types::PyDict;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ============================================================================
// Cached Configuration
// ============================================================================

/// Global cached session configuration
static CACHED_CONFIG: OnceCell<Arc<RwLock<SessionConfig>>> = OnceCell::new();

/// Configuration new sessions are built from: the cached one, else the defaults
fn current_config() -> SessionConfig {
    CACHED_CONFIG
        .get()
        .map(|cached| cached.read().clone())
        .unwrap_or_default()
}

// ============================================================================
// Python Functions
// ============================================================================

/// Validate and cache the session configuration (call once at startup)
///
/// # Arguments
/// * `config` - Dict with optional keys `max_trials`, `required_correct`,
///   `max_categories`, `rule_schedule`, `reference_cards`, `seed`
///
/// # Raises
/// ValueError if the configuration is invalid; the previous cache is kept
#[pyfunction]
fn init_config(config: &Bound<'_, PyDict>) -> PyResult<()> {
    let parsed = config::deserialize_config(config)?;

    // If already initialized, update the config
    if let Some(existing) = CACHED_CONFIG.get() {
        let mut guard = existing.write();
        *guard = parsed;
    } else {
        let _ = CACHED_CONFIG.set(Arc::new(RwLock::new(parsed)));
    }

    Ok(())
}

/// Check if config is initialized
#[pyfunction]
fn is_config_initialized() -> bool {
    CACHED_CONFIG.get().is_some()
}

/// Create a new session for one subject
///
/// # Arguments
/// * `seed` - Optional seed overriding the configured one, for reproducible targets
#[pyfunction]
#[pyo3(signature = (seed=None))]
fn new_session(seed: Option<u64>) -> PyResult<SortingSession> {
    let config = current_config().with_seed(seed);
    Ok(SortingSession::new(config)?)
}

/// Route engine logs to stderr
///
/// # Arguments
/// * `filter` - `EnvFilter` directive, e.g. "card_sort_core=debug"; falls back
///   to `RUST_LOG`, then "info"
///
/// Returns False if a global subscriber was already installed.
#[pyfunction]
#[pyo3(signature = (filter=None))]
fn init_logging(filter: Option<&str>) -> PyResult<bool> {
    let env_filter = match filter {
        Some(directive) => EnvFilter::try_new(directive)
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    Ok(tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok())
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn card_sort_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_config, m)?)?;
    m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(new_session, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;
    m.add_class::<SortingSession>()?;
    Ok(())
}

