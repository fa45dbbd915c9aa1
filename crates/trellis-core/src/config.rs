//! Display configuration.

use std::fmt;
use std::sync::Arc;

use crate::child_set::DEFAULT_GROWTH;
use crate::peer::{InMemoryBackend, PeerBackend};

/// Configuration for a [`Display`](crate::Display).
///
/// # Example
///
/// ```
/// use trellis_core::{Display, DisplayConfig};
///
/// let display = Display::with_config(
///     DisplayConfig::default()
///         .with_name("editor")
///         .with_max_events_per_pump(64),
/// );
/// assert_eq!(display.name(), "editor");
/// ```
#[derive(Clone)]
pub struct DisplayConfig {
    /// Label used in log output.
    pub name: String,
    /// Growth increment of the child sets the kernel creates.
    pub child_growth: usize,
    /// Cap on queued events delivered per pump. `None` drains everything
    /// that was queued when the pump started.
    pub max_events_per_pump: Option<usize>,
    /// Allocates and frees backing peers.
    pub backend: Arc<dyn PeerBackend>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            name: "display".to_string(),
            child_growth: DEFAULT_GROWTH,
            max_events_per_pump: None,
            backend: Arc::new(InMemoryBackend::new()),
        }
    }
}

impl DisplayConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_child_growth(mut self, growth: usize) -> Self {
        self.child_growth = growth.max(1);
        self
    }

    pub fn with_max_events_per_pump(mut self, max: usize) -> Self {
        self.max_events_per_pump = Some(max.max(1));
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn PeerBackend>) -> Self {
        self.backend = backend;
        self
    }
}

impl fmt::Debug for DisplayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayConfig")
            .field("name", &self.name)
            .field("child_growth", &self.child_growth)
            .field("max_events_per_pump", &self.max_events_per_pump)
            .finish_non_exhaustive()
    }
}
