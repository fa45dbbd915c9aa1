//! Multi-phase widget teardown.
//!
//! `release` runs four phases, each guarded so that a failure in one never
//! prevents the next from running:
//!
//! 1. send the dispose event, exactly once;
//! 2. release every child, item and secondary (children before self);
//! 3. mark released, detach from the owner when destroying, drop in-process
//!    buffers, free the peer and mark disposed;
//! 4. notify the display's tracker.
//!
//! Failures are collected in an [`ErrorStash`] and the first one is returned
//! after the last phase.

use crate::error::{KernelError, Result};
use crate::event::{Event, EventKind};
use crate::logging::targets;
use crate::peer::PeerContext;
use crate::state::StateFlags;
use crate::widget::{Relation, Widget};

/// Collects failures so that work can continue past them.
///
/// The first failure is kept; later ones are logged and counted.
#[derive(Debug, Default)]
pub struct ErrorStash {
    first: Option<KernelError>,
    suppressed: usize,
}

impl ErrorStash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f`, stashing its error.
    pub fn run(&mut self, phase: &'static str, f: impl FnOnce() -> Result<()>) {
        if let Err(err) = f() {
            self.stash(phase, err);
        }
    }

    pub fn stash(&mut self, phase: &'static str, err: KernelError) {
        tracing::warn!(target: targets::CORE, phase, error = %err, "failure stashed");
        if self.first.is_none() {
            self.first = Some(err);
        } else {
            self.suppressed += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    /// Failures after the first.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// The first stashed failure, if any.
    pub fn finish(self) -> Result<()> {
        match self.first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Widget {
    /// Dispose the widget and everything it owns.
    ///
    /// Disposing an already disposed widget, or one whose disposal is in
    /// progress, does nothing. Otherwise the caller must be on the owning
    /// thread. Every phase runs even if an earlier one fails; the first
    /// failure is returned and the widget is disposed regardless.
    pub fn dispose(&self) -> Result<()> {
        if self
            .state()
            .intersects(StateFlags::DISPOSED | StateFlags::DISPOSE_SENT)
        {
            return Ok(());
        }
        self.inner.display.affinity().check()?;
        self.release(true)
    }

    #[tracing::instrument(
        target = "trellis_core::dispose",
        level = "trace",
        skip(self),
        fields(id = ?self.id(), kind = %self.kind())
    )]
    pub(crate) fn release(&self, destroy: bool) -> Result<()> {
        let mut stash = ErrorStash::new();

        let send_dispose = {
            let mut core = self.inner.core.lock();
            let first = !core.state.contains(StateFlags::DISPOSE_SENT);
            core.state.insert(StateFlags::DISPOSE_SENT);
            core.state.remove(StateFlags::ACTIVE);
            first
        };
        if send_dispose {
            stash.run("dispose event", || {
                self.send_event(EventKind::Dispose, Event::new(EventKind::Dispose))
                    .map(drop)
            });
        }

        if !self.is_disposed() {
            self.release_children(&mut stash);
        }

        let performed = {
            let mut core = self.inner.core.lock();
            let first = !core.state.contains(StateFlags::RELEASED);
            core.state.insert(StateFlags::RELEASED);
            first
        };
        if performed {
            if destroy {
                self.detach_from_owner();
            }
            self.release_buffers();
            stash.run("destroy peer", || self.release_peer());
            self.inner.core.lock().state.insert(StateFlags::DISPOSED);

            self.inner.display.notify_disposed(self);
            tracing::debug!(
                target: targets::DISPOSE,
                id = ?self.id(),
                kind = %self.kind(),
                failures = usize::from(!stash.is_empty()) + stash.suppressed(),
                "widget disposed"
            );
        }

        stash.finish()
    }

    fn release_children(&self, stash: &mut ErrorStash) {
        let owned = self.inner.behavior.lock().release_owned();
        let children = self.inner.core.lock().children.take_all();
        for child in owned.into_iter().chain(children) {
            stash.run("release child", || child.release(false));
            child.inner.core.lock().parent = None;
        }
    }

    fn detach_from_owner(&self) {
        let (relation, parent) = {
            let mut core = self.inner.core.lock();
            let parent = core.parent.take().and_then(|weak| weak.upgrade());
            (core.relation, parent)
        };
        match (relation, parent) {
            (Relation::Root, _) => self.inner.display.remove_root(self),
            (Relation::Child, Some(parent)) => {
                parent.core.lock().children.remove(self);
                parent.behavior.lock().detach(self);
            }
            (Relation::Item | Relation::Owned, Some(parent)) => {
                parent.behavior.lock().detach(self);
            }
            (_, None) => {}
        }
    }

    fn release_buffers(&self) {
        {
            let mut core = self.inner.core.lock();
            core.events = None;
            core.data = None;
            core.state.remove(StateFlags::KEYED_DATA);
        }
        self.inner.behavior.lock().release_buffers();
        self.inner.display.deregister(self.id());
    }

    fn release_peer(&self) -> Result<()> {
        let Some(handle) = self.inner.core.lock().peer.take() else {
            return Ok(());
        };
        let backend = self.inner.display.backend();
        let cx = PeerContext::new(self.id(), self.kind(), self.inner.style, &*backend);
        self.inner.behavior.lock().destroy_peer(&cx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Display;
    use crate::listener::Listener;
    use crate::style::Style;
    use crate::testing::{Container, Leaf};
    use parking_lot::Mutex;
    use std::sync::Arc;

    #[test]
    fn test_stash_keeps_first() {
        let mut stash = ErrorStash::new();
        stash.run("a", || Ok(()));
        stash.run("b", || Err(KernelError::WidgetDisposed));
        stash.run("c", || Err(KernelError::DisplayDisposed));
        assert_eq!(stash.suppressed(), 1);
        assert!(matches!(stash.finish(), Err(KernelError::WidgetDisposed)));
    }

    #[test]
    fn test_dispose_is_idempotent() {
        let display = Display::new();
        let widget = Widget::new_root(&display, Leaf, Style::NONE).unwrap();
        widget.dispose().unwrap();
        assert!(widget.is_disposed());
        widget.dispose().unwrap();
        assert!(widget.is_disposed());
    }

    #[test]
    fn test_disposed_widget_rejects_operations() {
        let display = Display::new();
        let widget = Widget::new_root(&display, Leaf, Style::NONE).unwrap();
        widget.dispose().unwrap();

        assert!(matches!(widget.data(), Err(KernelError::WidgetDisposed)));
        assert!(matches!(
            widget.add_listener(EventKind::Selection, Listener::new(|_| Ok(()))),
            Err(KernelError::WidgetDisposed)
        ));
        assert!(matches!(widget.effective_style(), Err(KernelError::WidgetDisposed)));
        assert!(display.widget(widget.id()).is_none());
    }

    #[test]
    fn test_dispose_event_fires_once_under_reentrancy() {
        let display = Display::new();
        let widget = Widget::new_root(&display, Leaf, Style::NONE).unwrap();
        let fired = Arc::new(Mutex::new(0));
        let fired_clone = fired.clone();
        widget
            .add_listener(
                EventKind::Dispose,
                Listener::new(move |event| {
                    *fired_clone.lock() += 1;
                    if let Some(w) = &event.widget {
                        w.dispose()?;
                    }
                    Ok(())
                }),
            )
            .unwrap();

        widget.dispose().unwrap();
        widget.dispose().unwrap();
        assert_eq!(*fired.lock(), 1);
    }

    #[test]
    fn test_release_clears_parent_references() {
        let display = Display::new();
        let parent = Widget::new_root(&display, Container::default(), Style::NONE).unwrap();
        let child = Widget::new(&parent, Leaf, Style::NONE).unwrap();
        let secondary = Widget::new_owned(&parent, Leaf, Style::NONE).unwrap();

        parent.dispose().unwrap();
        assert!(child.is_disposed());
        assert!(secondary.is_disposed());
        assert!(child.parent_unchecked().is_none());
        assert!(parent.descendants_unchecked().is_empty());
    }

    #[test]
    fn test_destroying_child_detaches_it() {
        let display = Display::new();
        let parent = Widget::new_root(&display, Container::default(), Style::NONE).unwrap();
        let a = Widget::new(&parent, Leaf, Style::NONE).unwrap();
        let b = Widget::new(&parent, Leaf, Style::NONE).unwrap();
        let owned = Widget::new_owned(&parent, Leaf, Style::NONE).unwrap();

        a.dispose().unwrap();
        owned.dispose().unwrap();
        assert_eq!(parent.children().unwrap(), vec![b]);
        assert!(parent.owned().unwrap().is_empty());
        assert!(!parent.is_disposed());
    }

    #[test]
    fn test_listener_failure_does_not_stop_release() {
        let display = Display::new();
        let parent = Widget::new_root(&display, Container::default(), Style::NONE).unwrap();
        let child = Widget::new(&parent, Leaf, Style::NONE).unwrap();
        parent
            .add_listener(EventKind::Dispose, Listener::new(|_| Err("refused".into())))
            .unwrap();

        let err = parent.dispose().unwrap_err();
        assert!(matches!(err, KernelError::Listener { kind: EventKind::Dispose, .. }));
        assert!(parent.is_disposed());
        assert!(child.is_disposed());
        assert!(parent.peer().is_none());
    }
}
