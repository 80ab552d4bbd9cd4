//! Handler configuration.

use serde::{Deserialize, Serialize};

/// Tunables for a [`TargetHandler`](crate::TargetHandler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct HandlerConfig {
    /// Pending notifications kept per event subscription (at least 1).
    pub event_buffer: usize,
    /// Log every raw frame at `trace` level.
    pub trace_frames: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            event_buffer: remote_devtools_core::event_bus::DEFAULT_EVENT_BUFFER,
            trace_frames: false,
        }
    }
}

impl HandlerConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-subscription event buffer.
    #[must_use]
    pub const fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    /// Enable or disable raw frame logging.
    #[must_use]
    pub const fn with_trace_frames(mut self, trace_frames: bool) -> Self {
        self.trace_frames = trace_frames;
        self
    }
}
