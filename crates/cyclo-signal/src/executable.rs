// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Execution contracts.
//!
//! Everything the scheduler drives — functions (GAMs) and brokers alike —
//! implements [`Executable`]. Side effects flow entirely through shared
//! signal memory; the scheduler only sees the success flag.

use std::time::Duration;

use crate::types::BufferIndex;

/// One schedulable unit, invoked once per cycle per scheduled position.
///
/// A `false` return is a reportable runtime failure: the scheduler logs it
/// (and fires the configured notifier, if any) but keeps cycling — in a
/// hard-real-time loop, halting is worse than one cycle's stale data.
pub trait Executable: Send + Sync {
    fn name(&self) -> &str;

    /// Disabled executables are skipped, not removed; the declared order
    /// of the remaining ones is unaffected.
    fn is_enabled(&self) -> bool {
        true
    }

    fn execute(&self, buffer: BufferIndex) -> bool;
}

/// External data-ready condition a synchronised broker can block on.
///
/// `None` means wait forever. On timeout the caller reports failure for
/// that cycle rather than retrying.
pub trait SyncSource: Send + Sync {
    fn wait_for_data(&self, timeout: Option<Duration>) -> bool;
}
