//! The widget handle and its lifecycle state.
//!
//! A [`Widget`] is a cheap, cloneable handle. Clones refer to the same
//! widget and compare equal. Every widget belongs to one [`Display`] for its
//! whole life and may only be used on that display's thread: each public
//! operation starts with [`Widget::check_widget`], which rejects disposed
//! widgets and foreign threads before touching anything.
//!
//! # Construction
//!
//! Widgets are created in one of four placements:
//!
//! - [`Widget::new_root`]: a top-level widget owned by the display.
//! - [`Widget::new`]: a structural child of a container.
//! - [`Widget::new_item`]: an indexed item of its parent, such as a tool item.
//! - [`Widget::new_owned`]: a secondary owned through a named slot, such as a
//!   scroll bar.
//!
//! All arguments are validated first. Only then is the style canonicalized,
//! the peer built, the widget registered and attached, and the display's
//! tracker notified.
//!
//! # Locking
//!
//! The interior mutexes exist so that handles are `Send + Sync`; thread
//! affinity is what makes access correct. No lock is held while listeners,
//! trackers or child releases run, so all of them may call back into the
//! kernel.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use slotmap::new_key_type;

use crate::behavior::WidgetBehavior;
use crate::child_set::IndexedChildSet;
use crate::data::{keys, data_value, DataSlot, DataValue};
use crate::display::Display;
use crate::error::{KernelError, Result};
use crate::event::EventKind;
use crate::event_table::EventTable;
use crate::kind::WidgetKind;
use crate::listener::{
    DisposeListener, Listener, ListenerEntry, SelectionListener, TypedListener,
};
use crate::logging::targets;
use crate::peer::{PeerContext, PeerHandle};
use crate::state::StateFlags;
use crate::style::{canonicalize, inherit_direction, Style};

new_key_type! {
    /// Identifies a widget within its display.
    pub struct WidgetId;
}

/// How a widget hangs off its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Relation {
    Root,
    Child,
    Item,
    Owned,
}

#[derive(Debug, Clone, Copy)]
enum Placement {
    Root,
    Child,
    Item(usize),
    Owned,
}

impl Placement {
    fn relation(self) -> Relation {
        match self {
            Self::Root => Relation::Root,
            Self::Child => Relation::Child,
            Self::Item(_) => Relation::Item,
            Self::Owned => Relation::Owned,
        }
    }
}

pub(crate) struct CoreState {
    pub(crate) state: StateFlags,
    pub(crate) relation: Relation,
    pub(crate) parent: Option<Weak<WidgetInner>>,
    pub(crate) children: IndexedChildSet<Widget>,
    pub(crate) data: Option<DataSlot>,
    pub(crate) events: Option<EventTable>,
    pub(crate) peer: Option<PeerHandle>,
}

pub(crate) struct WidgetInner {
    pub(crate) id: WidgetId,
    pub(crate) kind: WidgetKind,
    pub(crate) style: Style,
    pub(crate) display: Display,
    pub(crate) core: Mutex<CoreState>,
    pub(crate) behavior: Mutex<Box<dyn WidgetBehavior>>,
}

/// A handle to a kernel-managed widget.
#[derive(Clone)]
pub struct Widget {
    pub(crate) inner: Arc<WidgetInner>,
}

impl Widget {
    /// Create a top-level widget owned by `display`.
    pub fn new_root(display: &Display, behavior: impl WidgetBehavior, style: Style) -> Result<Widget> {
        display.check_display()?;
        Self::construct(display, None, Placement::Root, Box::new(behavior), style)
    }

    /// Create a structural child of `parent`.
    pub fn new(parent: &Widget, behavior: impl WidgetBehavior, style: Style) -> Result<Widget> {
        Self::construct(
            &parent.inner.display,
            Some(parent),
            Placement::Child,
            Box::new(behavior),
            style,
        )
    }

    /// Create an item of `parent` at `index`, where `0 <= index <= item_count`.
    pub fn new_item(
        parent: &Widget,
        behavior: impl WidgetBehavior,
        style: Style,
        index: usize,
    ) -> Result<Widget> {
        Self::construct(
            &parent.inner.display,
            Some(parent),
            Placement::Item(index),
            Box::new(behavior),
            style,
        )
    }

    /// Create a secondary widget owned by `owner`.
    pub fn new_owned(owner: &Widget, behavior: impl WidgetBehavior, style: Style) -> Result<Widget> {
        Self::construct(
            &owner.inner.display,
            Some(owner),
            Placement::Owned,
            Box::new(behavior),
            style,
        )
    }

    fn construct(
        display: &Display,
        parent: Option<&Widget>,
        placement: Placement,
        behavior: Box<dyn WidgetBehavior>,
        requested: Style,
    ) -> Result<Widget> {
        let kind = behavior.kind();

        if let Some(parent) = parent {
            parent.check_parent()?;
        }
        display.check_kind(kind)?;

        let mut style = inherit_direction(requested, parent.map(|p| p.inner.style));
        for group in behavior.style_groups() {
            style = canonicalize(style, group);
        }
        let style = behavior.force_style(style);

        if let Some(parent) = parent {
            let owner = parent.inner.behavior.lock();
            match placement {
                Placement::Child if !owner.accepts_children() => {
                    return Err(KernelError::InvalidArgument("parent does not accept children"));
                }
                Placement::Item(index) => owner.check_insert(kind, index)?,
                Placement::Owned => owner.check_adopt(kind, style)?,
                Placement::Child | Placement::Root => {}
            }
        }

        let growth = display.config().child_growth;
        let inner = Arc::new_cyclic(|weak| WidgetInner {
            id: display.register(weak.clone()),
            kind,
            style,
            display: display.clone(),
            core: Mutex::new(CoreState {
                state: StateFlags::NONE,
                relation: placement.relation(),
                parent: parent.map(|p| Arc::downgrade(&p.inner)),
                children: IndexedChildSet::with_growth(growth),
                data: None,
                events: None,
                peer: None,
            }),
            behavior: Mutex::new(behavior),
        });
        let widget = Widget { inner };

        let backend = display.backend();
        let built = {
            let cx = PeerContext::new(widget.id(), kind, style, &*backend);
            widget.inner.behavior.lock().build_peer(&cx)
        };
        let peer = match built {
            Ok(peer) => peer,
            Err(err) => {
                display.deregister(widget.id());
                return Err(err);
            }
        };
        {
            let mut core = widget.inner.core.lock();
            core.peer = peer;
            core.state.insert(StateFlags::BUILT);
        }

        match (parent, placement) {
            (Some(parent), Placement::Child) => {
                parent.inner.core.lock().children.push(widget.clone());
            }
            (Some(parent), Placement::Item(index)) => {
                parent.inner.behavior.lock().insert_item(index, widget.clone());
            }
            (Some(parent), Placement::Owned) => {
                parent.inner.behavior.lock().adopt(widget.clone());
            }
            _ => display.add_root(widget.clone()),
        }

        widget.inner.core.lock().state.insert(StateFlags::ACTIVE);
        tracing::trace!(
            target: targets::WIDGET,
            id = ?widget.id(),
            %kind,
            style = style.bits(),
            "widget created"
        );
        display.notify_created(&widget);
        Ok(widget)
    }

    fn check_parent(&self) -> Result<()> {
        match self.check_widget() {
            Err(KernelError::WidgetDisposed) => {
                Err(KernelError::InvalidArgument("parent is disposed"))
            }
            other => other,
        }
    }

    /// Fail unless the widget is live and the caller is on its thread.
    ///
    /// Disposal is checked first, then thread affinity.
    pub fn check_widget(&self) -> Result<()> {
        if self.inner.core.lock().state.contains(StateFlags::DISPOSED) {
            return Err(KernelError::WidgetDisposed);
        }
        self.inner.display.affinity().check()
    }

    pub fn id(&self) -> WidgetId {
        self.inner.id
    }

    pub fn kind(&self) -> WidgetKind {
        self.inner.kind
    }

    pub fn display(&self) -> &Display {
        &self.inner.display
    }

    /// The canonicalized style, which may differ from the requested one.
    pub fn effective_style(&self) -> Result<Style> {
        self.check_widget()?;
        Ok(self.inner.style)
    }

    /// The raw state flags. Available from any thread, even after disposal.
    pub fn state(&self) -> StateFlags {
        self.inner.core.lock().state
    }

    pub fn is_disposed(&self) -> bool {
        self.state().contains(StateFlags::DISPOSED)
    }

    /// Whether construction finished and dispose has not been requested.
    pub fn is_active(&self) -> bool {
        self.state().contains(StateFlags::ACTIVE)
    }

    pub fn peer(&self) -> Option<PeerHandle> {
        self.inner.core.lock().peer
    }

    pub fn parent(&self) -> Result<Option<Widget>> {
        self.check_widget()?;
        Ok(self.parent_unchecked())
    }

    pub(crate) fn parent_unchecked(&self) -> Option<Widget> {
        let core = self.inner.core.lock();
        core.parent.as_ref().and_then(Weak::upgrade).map(Widget::from_inner)
    }

    /// Structural children, in creation order.
    pub fn children(&self) -> Result<Vec<Widget>> {
        self.check_widget()?;
        Ok(self.inner.core.lock().children.snapshot())
    }

    /// Items and secondaries owned through the widget's behavior.
    pub fn owned(&self) -> Result<Vec<Widget>> {
        self.check_widget()?;
        Ok(self.inner.behavior.lock().owned())
    }

    /// Children followed by owned widgets, with no checks.
    pub(crate) fn descendants_unchecked(&self) -> Vec<Widget> {
        let mut all = self.inner.core.lock().children.snapshot();
        all.extend(self.inner.behavior.lock().owned());
        all
    }

    /// Run `f` against the widget's behavior, downcast to `B`.
    ///
    /// `f` runs with the behavior lock held and must not use this widget.
    pub fn with_behavior<B, R>(&self, f: impl FnOnce(&mut B) -> R) -> Result<R>
    where
        B: WidgetBehavior,
    {
        self.check_widget()?;
        let mut behavior = self.inner.behavior.lock();
        let behavior = (**behavior)
            .as_any_mut()
            .downcast_mut::<B>()
            .ok_or(KernelError::InvalidArgument("behavior type mismatch"))?;
        Ok(f(behavior))
    }

    /// Flag that a property changed and the peer needs a sync.
    pub fn mark_dirty(&self) -> Result<()> {
        self.check_widget()?;
        self.inner.core.lock().state.insert(StateFlags::DIRTY);
        Ok(())
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&self) -> Result<bool> {
        self.check_widget()?;
        let mut core = self.inner.core.lock();
        let dirty = core.state.contains(StateFlags::DIRTY);
        core.state.remove(StateFlags::DIRTY);
        Ok(dirty)
    }

    pub(crate) fn from_inner(inner: Arc<WidgetInner>) -> Self {
        Self { inner }
    }

    // -------------------------------------------------------------------------
    // Listeners
    // -------------------------------------------------------------------------

    pub fn add_listener(&self, kind: EventKind, listener: Listener) -> Result<()> {
        self.check_widget()?;
        self.inner
            .core
            .lock()
            .events
            .get_or_insert_with(EventTable::new)
            .hook(kind, ListenerEntry::Raw(listener));
        Ok(())
    }

    /// Hook `listener` to each of `kinds`, or to its default kinds when
    /// `kinds` is empty.
    pub fn add_typed_listener(&self, listener: TypedListener, kinds: &[EventKind]) -> Result<()> {
        self.check_widget()?;
        let kinds = if kinds.is_empty() {
            listener.default_kinds()
        } else {
            kinds
        };
        if kinds.iter().any(|kind| !listener.accepts(*kind)) {
            return Err(KernelError::InvalidArgument(
                "listener does not handle the requested kind",
            ));
        }
        let mut core = self.inner.core.lock();
        let table = core.events.get_or_insert_with(EventTable::new);
        for kind in kinds {
            table.hook(*kind, ListenerEntry::Typed(listener.clone()));
        }
        Ok(())
    }

    pub fn add_selection_listener(
        &self,
        listener: impl SelectionListener + 'static,
    ) -> Result<TypedListener> {
        let typed = TypedListener::selection(listener);
        self.add_typed_listener(typed.clone(), &[])?;
        Ok(typed)
    }

    pub fn add_dispose_listener(
        &self,
        listener: impl DisposeListener + 'static,
    ) -> Result<TypedListener> {
        let typed = TypedListener::dispose(listener);
        self.add_typed_listener(typed.clone(), &[])?;
        Ok(typed)
    }

    /// Remove the first registration of `listener` for `kind`. Removing a
    /// listener that is not registered does nothing.
    pub fn remove_listener(&self, kind: EventKind, listener: &Listener) -> Result<()> {
        self.check_widget()?;
        if let Some(table) = self.inner.core.lock().events.as_mut() {
            table.unhook(kind, &ListenerEntry::Raw(listener.clone()));
        }
        Ok(())
    }

    /// Remove `listener` from every kind it was hooked to.
    pub fn remove_typed_listener(&self, listener: &TypedListener) -> Result<()> {
        self.check_widget()?;
        if let Some(table) = self.inner.core.lock().events.as_mut() {
            table.unhook_all(&ListenerEntry::Typed(listener.clone()));
        }
        Ok(())
    }

    /// The registrations for `kind`, in fan-out order.
    pub fn listeners(&self, kind: EventKind) -> Result<Vec<ListenerEntry>> {
        self.check_widget()?;
        let core = self.inner.core.lock();
        Ok(core.events.as_ref().map(|t| t.snapshot(kind)).unwrap_or_default())
    }

    pub fn is_listening(&self, kind: EventKind) -> Result<bool> {
        self.check_widget()?;
        let core = self.inner.core.lock();
        Ok(core.events.as_ref().is_some_and(|t| t.hooks(kind)))
    }

    // -------------------------------------------------------------------------
    // Data
    // -------------------------------------------------------------------------

    /// The unnamed application value.
    pub fn data(&self) -> Result<Option<DataValue>> {
        self.check_widget()?;
        let core = self.inner.core.lock();
        Ok(core.data.as_ref().and_then(DataSlot::get))
    }

    pub fn set_data(&self, value: Option<DataValue>) -> Result<()> {
        self.check_widget()?;
        let mut core = self.inner.core.lock();
        let slot = core.data.get_or_insert_with(DataSlot::new);
        slot.set(value);
        if slot.is_empty() {
            core.data = None;
        }
        Ok(())
    }

    /// The value of a named property.
    ///
    /// [`keys::IS_ACTIVE`] and [`keys::CHECK_SUBWINDOW`] read as `bool`s
    /// derived from the widget's state.
    pub fn data_for(&self, key: &str) -> Result<Option<DataValue>> {
        self.check_widget()?;
        if key.is_empty() {
            return Err(KernelError::InvalidArgument("data key is empty"));
        }
        let core = self.inner.core.lock();
        Ok(match key {
            keys::IS_ACTIVE => Some(data_value(core.state.contains(StateFlags::ACTIVE))),
            keys::CHECK_SUBWINDOW => Some(data_value(
                core.state.contains(StateFlags::CHECK_SUBWINDOW),
            )),
            _ => core.data.as_ref().and_then(|slot| slot.get_keyed(key)),
        })
    }

    /// Set or, with `None`, remove a named property.
    ///
    /// Reserved keys are intercepted: [`keys::CHECK_SUBWINDOW`] toggles a
    /// feature flag from a `bool` value, [`keys::IS_ACTIVE`] is read-only,
    /// and [`keys::SKIN_CLASS`] / [`keys::SKIN_ID`] are stored and also
    /// queue a [`EventKind::Skin`] event.
    pub fn set_data_for(&self, key: &str, value: Option<DataValue>) -> Result<()> {
        self.check_widget()?;
        if key.is_empty() {
            return Err(KernelError::InvalidArgument("data key is empty"));
        }

        match key {
            keys::IS_ACTIVE => return Ok(()),
            keys::CHECK_SUBWINDOW => {
                let flag = value.as_ref().and_then(|v| v.downcast_ref::<bool>()).copied();
                if let Some(flag) = flag {
                    let mut core = self.inner.core.lock();
                    core.state.set(StateFlags::CHECK_SUBWINDOW, flag);
                    core.state.insert(StateFlags::DIRTY);
                }
                return Ok(());
            }
            _ => {}
        }

        let reskin = key == keys::SKIN_CLASS || key == keys::SKIN_ID;
        {
            let mut core = self.inner.core.lock();
            let slot = core.data.get_or_insert_with(DataSlot::new);
            slot.set_keyed(key, value);
            let keyed = slot.is_keyed();
            if slot.is_empty() {
                core.data = None;
            }
            core.state.set(StateFlags::KEYED_DATA, keyed);
            if reskin {
                core.state.insert(StateFlags::SKIN_NEEDED | StateFlags::DIRTY);
            }
        }
        if reskin {
            self.queue_reskin();
        }
        Ok(())
    }
}

impl PartialEq for Widget {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Widget {}

impl Hash for Widget {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Widget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Widget")
            .field("id", &self.inner.id)
            .field("kind", &self.inner.kind)
            .finish()
    }
}
