//! Synchronous and queued event delivery.
//!
//! A synchronous dispatch runs the display's filters and then every listener
//! hooked for the kind when the dispatch started, in registration order. A
//! failing listener does not stop the fan-out: the first failure is returned
//! once every listener has run.
//!
//! A queued dispatch appends the prepared event to the display's queue. The
//! pump delivers it later, and drops it if the widget was disposed in the
//! meantime.

use crate::dispose::ErrorStash;
use crate::error::{KernelError, Result};
use crate::event::{Event, EventKind};
use crate::listener::ListenerEntry;
use crate::logging::targets;
use crate::state::StateFlags;
use crate::widget::Widget;

impl Widget {
    /// Deliver `event` as `kind` to this widget's listeners, synchronously.
    ///
    /// Returns the event as the listeners left it, so callers can inspect
    /// fields such as [`Event::doit`].
    pub fn notify_listeners(&self, kind: EventKind, event: Event) -> Result<Event> {
        self.check_widget()?;
        self.send_event(kind, event)
    }

    /// Queue `event` as `kind` for delivery on the display's next pump.
    pub fn post_event(&self, kind: EventKind, mut event: Event) -> Result<()> {
        self.check_widget()?;
        if self.prepare(kind, &mut event) {
            tracing::trace!(target: targets::DISPATCH, id = ?self.id(), ?kind, "event queued");
            self.inner.display.enqueue(event);
        }
        Ok(())
    }

    /// Queue a `Skin` event whether or not anyone listens yet. The receiver
    /// check happens at delivery, which also clears `SKIN_NEEDED`.
    pub(crate) fn queue_reskin(&self) {
        let mut event = Event::new(EventKind::Skin);
        self.fill(EventKind::Skin, &mut event);
        tracing::trace!(target: targets::DISPATCH, id = ?self.id(), "reskin queued");
        self.inner.display.enqueue(event);
    }

    pub(crate) fn send_event(&self, kind: EventKind, mut event: Event) -> Result<Event> {
        if self.prepare(kind, &mut event) {
            self.deliver(&mut event)?;
        }
        Ok(event)
    }

    /// Fill in event metadata. Returns `false` when nobody could receive it.
    fn prepare(&self, kind: EventKind, event: &mut Event) -> bool {
        let display = &self.inner.display;
        let listening = self
            .inner
            .core
            .lock()
            .events
            .as_ref()
            .is_some_and(|table| table.hooks(kind));
        if !listening && !display.has_filters(kind) {
            return false;
        }
        self.fill(kind, event);
        true
    }

    fn fill(&self, kind: EventKind, event: &mut Event) {
        let display = &self.inner.display;
        event.kind = kind;
        event.widget = Some(self.clone());
        event.display = Some(display.clone());
        if event.time == 0 {
            event.time = display.time();
        }
    }

    pub(crate) fn deliver(&self, event: &mut Event) -> Result<()> {
        let kind = event.kind;
        let listeners = {
            let core = self.inner.core.lock();
            core.events
                .as_ref()
                .map(|table| table.snapshot(kind))
                .unwrap_or_default()
        };

        let mut stash = ErrorStash::new();
        fan_out(&self.inner.display.filters_for(kind), kind, event, &mut stash);
        if event.kind == EventKind::None {
            tracing::trace!(target: targets::DISPATCH, id = ?self.id(), ?kind, "event vetoed by filter");
            return stash.finish();
        }

        tracing::trace!(
            target: targets::DISPATCH,
            id = ?self.id(),
            ?kind,
            listeners = listeners.len(),
            "dispatching"
        );
        fan_out(&listeners, kind, event, &mut stash);
        stash.finish()
    }
}

/// Invoke every entry, stashing failures.
pub(crate) fn fan_out(
    entries: &[ListenerEntry],
    kind: EventKind,
    event: &mut Event,
    stash: &mut ErrorStash,
) {
    for entry in entries {
        if let Err(source) = entry.handle_event(kind, event) {
            stash.stash("listener", KernelError::Listener { kind, source });
        }
    }
}

/// Deliver an event taken off the display queue.
pub(crate) fn deliver_queued(mut event: Event) -> Result<()> {
    let Some(widget) = event.widget.clone() else {
        return Ok(());
    };
    if widget.is_disposed() {
        tracing::debug!(
            target: targets::DISPATCH,
            id = ?widget.id(),
            kind = ?event.kind,
            "dropping queued event for disposed widget"
        );
        return Ok(());
    }
    if event.kind == EventKind::Skin {
        widget.inner.core.lock().state.remove(StateFlags::SKIN_NEEDED);
    }
    widget.deliver(&mut event)
}
