// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation.
//!
//! Everything here is checked before any scheduler is built, so that
//! misconfigurations fail the application while it is still stopped.

use std::collections::HashSet;

use crate::{ConfigError, ConfigResult, CycloConfig, StrategyConfig};

#[derive(Debug, Clone)]
pub enum ConfigValidationError {
    NoStates,
    DuplicateState { name: String },
    EmptyState { name: String },
    DuplicateThread { state: String, name: String },
    UnknownFirstState { name: String },
    BareNeedsSingleThread { state: String, threads: usize },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoStates => write!(f, "at least one state must be declared"),
            Self::DuplicateState { name } => {
                write!(f, "state '{}' is declared more than once", name)
            }
            Self::EmptyState { name } => {
                write!(f, "state '{}' declares no threads", name)
            }
            Self::DuplicateThread { state, name } => {
                write!(f, "state '{}' declares thread '{}' more than once", state, name)
            }
            Self::UnknownFirstState { name } => {
                write!(f, "first_state '{}' matches no declared state", name)
            }
            Self::BareNeedsSingleThread { state, threads } => {
                write!(
                    f,
                    "bare strategy runs one thread, state '{}' declares {}",
                    state, threads
                )
            }
        }
    }
}

/// Validate the complete configuration, collecting every violation.
pub fn validate_config(config: &CycloConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if config.states.is_empty() {
        errors.push(ConfigValidationError::NoStates);
    }

    let mut state_names = HashSet::new();
    for state in &config.states {
        if !state_names.insert(state.name.as_str()) {
            errors.push(ConfigValidationError::DuplicateState {
                name: state.name.clone(),
            });
        }
        if state.threads.is_empty() {
            errors.push(ConfigValidationError::EmptyState {
                name: state.name.clone(),
            });
        }
        let mut thread_names = HashSet::new();
        for thread in &state.threads {
            if !thread_names.insert(thread.name.as_str()) {
                errors.push(ConfigValidationError::DuplicateThread {
                    state: state.name.clone(),
                    name: thread.name.clone(),
                });
            }
        }
        if config.scheduler.strategy == StrategyConfig::Bare && state.threads.len() > 1 {
            errors.push(ConfigValidationError::BareNeedsSingleThread {
                state: state.name.clone(),
                threads: state.threads.len(),
            });
        }
    }

    let first = &config.application.first_state;
    if !first.is_empty() && !config.states.iter().any(|s| &s.name == first) {
        errors.push(ConfigValidationError::UnknownFirstState {
            name: first.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        let details = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        Err(ConfigError::ValidationError(details))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{StateConfig, ThreadConfig};

    fn valid_config() -> CycloConfig {
        let mut config = CycloConfig::default();
        config.states.push(StateConfig {
            name: "Run".to_owned(),
            threads: vec![ThreadConfig {
                name: "Main".to_owned(),
                cpu_mask: 1,
                functions: vec!["Control".to_owned()],
            }],
        });
        config.application.first_state = "Run".to_owned();
        config
    }

    #[test]
    fn accepts_a_minimal_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn rejects_empty_and_duplicate_states() {
        let mut config = valid_config();
        config.states.push(StateConfig {
            name: "Run".to_owned(),
            threads: Vec::new(),
        });
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("more than once"));
        assert!(err.contains("no threads"));
    }

    #[test]
    fn rejects_unknown_first_state() {
        let mut config = valid_config();
        config.application.first_state = "Ghost".to_owned();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn bare_strategy_limits_states_to_one_thread() {
        let mut config = valid_config();
        config.scheduler.strategy = StrategyConfig::Bare;
        config.states[0].threads.push(ThreadConfig {
            name: "Second".to_owned(),
            cpu_mask: 2,
            functions: Vec::new(),
        });
        assert!(validate_config(&config).is_err());
    }
}
