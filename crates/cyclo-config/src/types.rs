// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions, mapping to sections of `cyclo.toml`.

use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CycloConfig {
    pub application: ApplicationConfig,
    pub scheduler: SchedulerConfig,
    pub states: Vec<StateConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApplicationConfig {
    pub name: String,
    /// `tracing` filter directive, overridable via `CYCLO_LOG_FILTER`.
    pub log_filter: String,
    /// Name of the state activated first.
    pub first_state: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            name: "cyclo".to_owned(),
            log_filter: "info".to_owned(),
            first_state: String::new(),
        }
    }
}

/// Which execution strategy drives the cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyConfig {
    Bare,
    Threaded,
    #[default]
    Pooled,
}

/// Per-cycle synchronization of the pooled strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncModeConfig {
    Free,
    StartStopGated,
    #[default]
    CycleBarrier,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub strategy: StrategyConfig,
    pub sync_mode: SyncModeConfig,
    /// Cycle bound for the bare strategy; unlimited when absent.
    pub max_cycles: Option<u64>,
    /// Synchronised-broker wait bound in milliseconds; infinite when
    /// absent.
    pub sync_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StateConfig {
    pub name: String,
    pub threads: Vec<ThreadConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ThreadConfig {
    pub name: String,
    pub cpu_mask: u64,
    /// Function names, in execution order.
    pub functions: Vec<String>,
}
