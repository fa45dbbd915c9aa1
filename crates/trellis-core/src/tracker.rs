//! Creation and disposal observers.
//!
//! A tracker is injected per display with
//! [`Display::set_tracker`](crate::Display::set_tracker) and lives exactly as
//! long as the display keeps it. Tracker callbacks cannot fail and run with
//! no kernel locks held.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::widget::{Widget, WidgetId};

/// Observes widget creation and disposal.
pub trait WidgetTracker: Send + Sync {
    /// Called once a widget has finished construction.
    fn widget_created(&self, widget: &Widget);

    /// Called once per widget, after its release has completed.
    fn widget_disposed(&self, widget: &Widget);
}

/// A tracker that keeps the set of live widget ids.
#[derive(Debug, Default)]
pub struct WidgetCensus {
    inner: Mutex<CensusState>,
}

#[derive(Debug, Default)]
struct CensusState {
    live: HashSet<WidgetId>,
    created: usize,
    disposed: usize,
}

impl WidgetCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.inner.lock().live.len()
    }

    pub fn is_live(&self, id: WidgetId) -> bool {
        self.inner.lock().live.contains(&id)
    }

    pub fn created(&self) -> usize {
        self.inner.lock().created
    }

    pub fn disposed(&self) -> usize {
        self.inner.lock().disposed
    }
}

impl WidgetTracker for WidgetCensus {
    fn widget_created(&self, widget: &Widget) {
        let mut state = self.inner.lock();
        state.created += 1;
        state.live.insert(widget.id());
    }

    fn widget_disposed(&self, widget: &Widget) {
        let mut state = self.inner.lock();
        state.disposed += 1;
        state.live.remove(&widget.id());
    }
}
