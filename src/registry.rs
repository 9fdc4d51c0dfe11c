//! Manual indentation overrides
//!
//! Buffers listed here keep the setting a user picked; the driver skips
//! inference for them until the user goes back to "Automatic" or the buffer
//! is destroyed.

use crate::models::{BufferId, IndentLength};
use dashmap::DashMap;
use tracing::debug;

/// Thread-safe set of buffers under manual override
#[derive(Debug, Default)]
pub struct ManualOverrideRegistry {
    overrides: DashMap<BufferId, IndentLength>,
}

impl ManualOverrideRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `buffer` as manually set to `length`
    pub fn set_manual(&self, buffer: BufferId, length: IndentLength) {
        debug!("Manual override for {}: {:?}", buffer, length);
        self.overrides.insert(buffer, length);
    }

    /// Return `buffer` to automatic detection
    pub fn clear_manual(&self, buffer: BufferId) -> bool {
        self.overrides.remove(&buffer).is_some()
    }

    pub fn is_manual(&self, buffer: BufferId) -> bool {
        self.overrides.contains_key(&buffer)
    }

    /// The setting the user chose, if any
    pub fn manual_setting(&self, buffer: BufferId) -> Option<IndentLength> {
        self.overrides.get(&buffer).map(|entry| *entry.value())
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    /// Drop every override
    pub fn clear(&self) {
        self.overrides.clear();
    }
}
