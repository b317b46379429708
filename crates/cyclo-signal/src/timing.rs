// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Timing signals.
//!
//! The scheduler publishes cycle and per-executable durations (in
//! microseconds) into named probes, the way a timing data source exposes
//! `<State>.<Thread>_CycleTime` and `<Function>_ExecTime` signals.
//! Probes are plain shared atomics so the real-time path never locks.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

/// A single microsecond cell, shared between the writer (scheduler) and
/// any consumer.
#[derive(Debug, Clone, Default)]
pub struct TimingProbe(Arc<AtomicU32>);

impl TimingProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_micros(&self, micros: u32) {
        self.0.store(micros, Ordering::Relaxed);
    }

    pub fn micros(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Named probe registry, built lazily: the first request for a name
/// creates its probe, later requests share it.
#[derive(Debug, Default)]
pub struct TimingSource {
    probes: Mutex<HashMap<String, TimingProbe>>,
}

impl TimingSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn probe(&self, name: &str) -> TimingProbe {
        self.probes
            .lock()
            .entry(name.to_owned())
            .or_default()
            .clone()
    }

    /// The per-thread cycle-time probe for a (state, thread) pair.
    pub fn thread_cycle_probe(&self, state: &str, thread: &str) -> TimingProbe {
        self.probe(&format!("{state}.{thread}_CycleTime"))
    }

    /// The per-executable execution-time probe.
    pub fn exec_time_probe(&self, executable: &str) -> TimingProbe {
        self.probe(&format!("{executable}_ExecTime"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_shares_one_cell() {
        let src = TimingSource::new();
        let a = src.thread_cycle_probe("Run", "Fast");
        let b = src.probe("Run.Fast_CycleTime");
        a.record_micros(123);
        assert_eq!(b.micros(), 123);
    }

    #[test]
    fn distinct_names_are_independent() {
        let src = TimingSource::new();
        let a = src.exec_time_probe("Control");
        let b = src.exec_time_probe("Filter");
        a.record_micros(7);
        assert_eq!(b.micros(), 0);
    }
}
