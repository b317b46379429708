// Copyright 2026 Cyclo Project Developers.
// SPDX-License-Identifier: Apache-2.0

//! Synchronised input broker.
//!
//! Same copy table as the plain input broker, but the copy is preceded by
//! a wait on an external data-ready condition. The synchronizing signal
//! is by convention the first declared one, so its range is entry 0 of
//! the table.

use std::ptr::NonNull;
use std::sync::Arc;
use std::time::Duration;

use cyclo_signal::{BufferIndex, Executable, SignalDirection, SyncSource};

use crate::error::Result;
use crate::resolve::{BrokerDataSource, BrokerKind};
use crate::stateful::StatefulBrokerCore;

pub struct SynchronisedInputBroker {
    core: StatefulBrokerCore,
    sync: Arc<dyn SyncSource>,
    /// `None` waits forever.
    timeout: Option<Duration>,
}

impl SynchronisedInputBroker {
    pub fn init(
        name: impl Into<String>,
        ds: &dyn BrokerDataSource,
        function: &str,
        gam_base: NonNull<u8>,
        sync: Arc<dyn SyncSource>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let core = StatefulBrokerCore::init(
            name,
            SignalDirection::Input,
            BrokerKind::SynchronisedByte,
            ds,
            function,
            gam_base,
        )?;
        Ok(SynchronisedInputBroker {
            core,
            sync,
            timeout,
        })
    }

    pub fn entry_count(&self) -> usize {
        self.core.entry_count()
    }
}

impl Executable for SynchronisedInputBroker {
    fn name(&self) -> &str {
        self.core.name()
    }

    /// A timed-out wait fails the cycle without retrying; the data that
    /// never arrived is simply not copied.
    fn execute(&self, buffer: BufferIndex) -> bool {
        if !self.sync.wait_for_data(self.timeout) {
            tracing::warn!(broker = self.core.name(), "synchronisation wait timed out");
            return false;
        }
        self.core.table().copy_to_function(buffer)
    }
}
