//! Listener handles.
//!
//! A [`Listener`] is a raw closure hooked to one event kind. A
//! [`TypedListener`] adapts a capability trait such as [`SelectionListener`]
//! so that one object can be hooked to several kinds at once and removed
//! from all of them in one call.
//!
//! Listener identity is the identity of the shared closure or capability
//! object: clones of a handle compare equal, two separately created handles
//! never do.

use std::fmt;
use std::sync::Arc;

use crate::error::ListenerResult;
use crate::event::{Event, EventKind};

type ListenerFn = dyn Fn(&mut Event) -> ListenerResult + Send + Sync;

/// A raw event listener.
#[derive(Clone)]
pub struct Listener(Arc<ListenerFn>);

impl Listener {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&mut Event) -> ListenerResult + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn handle_event(&self, event: &mut Event) -> ListenerResult {
        (self.0)(event)
    }
}

impl PartialEq for Listener {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Listener {}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Listener({:p})", Arc::as_ptr(&self.0).cast::<()>())
    }
}

/// Receives selection and default-selection events.
pub trait SelectionListener: Send + Sync {
    fn widget_selected(&self, event: &mut Event) -> ListenerResult;

    fn widget_default_selected(&self, _event: &mut Event) -> ListenerResult {
        Ok(())
    }
}

/// Receives the terminal dispose event.
pub trait DisposeListener: Send + Sync {
    fn widget_disposed(&self, event: &mut Event) -> ListenerResult;
}

/// Receives focus changes.
pub trait FocusListener: Send + Sync {
    fn focus_gained(&self, _event: &mut Event) -> ListenerResult {
        Ok(())
    }

    fn focus_lost(&self, _event: &mut Event) -> ListenerResult {
        Ok(())
    }
}

/// Receives text modifications.
pub trait ModifyListener: Send + Sync {
    fn modify_text(&self, event: &mut Event) -> ListenerResult;
}

/// A capability listener adapted into raw event-kind registrations.
#[derive(Clone)]
pub enum TypedListener {
    Selection(Arc<dyn SelectionListener>),
    Dispose(Arc<dyn DisposeListener>),
    Focus(Arc<dyn FocusListener>),
    Modify(Arc<dyn ModifyListener>),
}

impl TypedListener {
    pub fn selection(listener: impl SelectionListener + 'static) -> Self {
        Self::Selection(Arc::new(listener))
    }

    pub fn dispose(listener: impl DisposeListener + 'static) -> Self {
        Self::Dispose(Arc::new(listener))
    }

    pub fn focus(listener: impl FocusListener + 'static) -> Self {
        Self::Focus(Arc::new(listener))
    }

    pub fn modify(listener: impl ModifyListener + 'static) -> Self {
        Self::Modify(Arc::new(listener))
    }

    /// The kinds this capability is hooked to when no kinds are given.
    pub fn default_kinds(&self) -> &'static [EventKind] {
        match self {
            Self::Selection(_) => &[EventKind::Selection, EventKind::DefaultSelection],
            Self::Dispose(_) => &[EventKind::Dispose],
            Self::Focus(_) => &[EventKind::FocusIn, EventKind::FocusOut],
            Self::Modify(_) => &[EventKind::Modify],
        }
    }

    /// Whether this capability can handle `kind`.
    pub fn accepts(&self, kind: EventKind) -> bool {
        self.default_kinds().contains(&kind)
    }

    /// Route an event of `kind` to the matching capability method.
    pub fn handle_event(&self, kind: EventKind, event: &mut Event) -> ListenerResult {
        match (self, kind) {
            (Self::Selection(l), EventKind::Selection) => l.widget_selected(event),
            (Self::Selection(l), EventKind::DefaultSelection) => l.widget_default_selected(event),
            (Self::Dispose(l), EventKind::Dispose) => l.widget_disposed(event),
            (Self::Focus(l), EventKind::FocusIn) => l.focus_gained(event),
            (Self::Focus(l), EventKind::FocusOut) => l.focus_lost(event),
            (Self::Modify(l), EventKind::Modify) => l.modify_text(event),
            _ => Ok(()),
        }
    }

    fn identity(&self) -> *const () {
        match self {
            Self::Selection(l) => Arc::as_ptr(l).cast(),
            Self::Dispose(l) => Arc::as_ptr(l).cast(),
            Self::Focus(l) => Arc::as_ptr(l).cast(),
            Self::Modify(l) => Arc::as_ptr(l).cast(),
        }
    }
}

impl PartialEq for TypedListener {
    fn eq(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
            && self.identity() == other.identity()
    }
}

impl Eq for TypedListener {}

impl fmt::Debug for TypedListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Selection(_) => "Selection",
            Self::Dispose(_) => "Dispose",
            Self::Focus(_) => "Focus",
            Self::Modify(_) => "Modify",
        };
        write!(f, "TypedListener::{name}({:p})", self.identity())
    }
}

/// One registration in an event table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerEntry {
    Raw(Listener),
    Typed(TypedListener),
}

impl ListenerEntry {
    pub fn handle_event(&self, kind: EventKind, event: &mut Event) -> ListenerResult {
        match self {
            Self::Raw(listener) => listener.handle_event(event),
            Self::Typed(listener) => listener.handle_event(kind, event),
        }
    }
}

impl From<Listener> for ListenerEntry {
    fn from(listener: Listener) -> Self {
        Self::Raw(listener)
    }
}

impl From<TypedListener> for ListenerEntry {
    fn from(listener: TypedListener) -> Self {
        Self::Typed(listener)
    }
}
