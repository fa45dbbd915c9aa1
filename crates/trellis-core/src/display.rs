//! The owning execution context.
//!
//! A [`Display`] is bound to the thread that created it. It owns the
//! top-level widgets, the registry of live widgets, the queue of posted
//! events, the display-level filters and the injected collaborators (peer
//! backend and widget tracker). There is no global display: create as many
//! as needed, one per UI thread.
//!
//! Other threads talk to a display only through [`Display::async_exec`],
//! [`Display::sync_exec`] and the [`InboundSender`] returned by
//! [`Display::inbound`]. Everything they hand over runs on the owning
//! thread during [`Display::read_and_dispatch`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use trellis_core::Display;
//!
//! let display = Display::new();
//! let ran = Arc::new(AtomicBool::new(false));
//!
//! let flag = ran.clone();
//! let remote = display.clone();
//! std::thread::spawn(move || {
//!     remote.async_exec(move || flag.store(true, Ordering::SeqCst)).unwrap();
//! })
//! .join()
//! .unwrap();
//!
//! display.run_pending().unwrap();
//! assert!(ran.load(Ordering::SeqCst));
//! ```

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::thread::ThreadId;
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use slotmap::SlotMap;

use crate::bridge::{InboundEvent, InboundSender};
use crate::config::DisplayConfig;
use crate::dispatch::{deliver_queued, fan_out};
use crate::dispose::ErrorStash;
use crate::error::{KernelError, Result};
use crate::event::{Event, EventKind};
use crate::event_table::EventTable;
use crate::invocation::{completion_pair, Runnable};
use crate::kind::WidgetKind;
use crate::listener::{Listener, ListenerEntry};
use crate::logging::targets;
use crate::peer::PeerBackend;
use crate::thread_check::ThreadAffinity;
use crate::tracker::WidgetTracker;
use crate::widget::{Widget, WidgetId, WidgetInner};

struct DisplayInner {
    affinity: ThreadAffinity,
    config: DisplayConfig,
    epoch: Instant,
    disposed: AtomicBool,
    registry: RwLock<SlotMap<WidgetId, Weak<WidgetInner>>>,
    roots: Mutex<Vec<Widget>>,
    queue: Mutex<VecDeque<Event>>,
    tasks_tx: Sender<Runnable>,
    tasks_rx: Receiver<Runnable>,
    inbound_tx: Sender<InboundEvent>,
    inbound_rx: Receiver<InboundEvent>,
    inbound_closed: Arc<AtomicBool>,
    filters: Mutex<EventTable>,
    tracker: RwLock<Option<Arc<dyn WidgetTracker>>>,
    extensions: RwLock<HashSet<&'static str>>,
}

/// A thread-bound owning context for widgets.
#[derive(Clone)]
pub struct Display {
    inner: Arc<DisplayInner>,
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

impl Display {
    /// Create a display bound to the current thread.
    pub fn new() -> Self {
        Self::with_config(DisplayConfig::default())
    }

    /// Create a display with custom configuration, bound to the current thread.
    pub fn with_config(config: DisplayConfig) -> Self {
        let (tasks_tx, tasks_rx) = crossbeam_channel::unbounded();
        let (inbound_tx, inbound_rx) = crossbeam_channel::unbounded();
        tracing::debug!(target: targets::DISPLAY, name = %config.name, "display created");
        Self {
            inner: Arc::new(DisplayInner {
                affinity: ThreadAffinity::current(),
                config,
                epoch: Instant::now(),
                disposed: AtomicBool::new(false),
                registry: RwLock::new(SlotMap::with_key()),
                roots: Mutex::new(Vec::new()),
                queue: Mutex::new(VecDeque::new()),
                tasks_tx,
                tasks_rx,
                inbound_tx,
                inbound_rx,
                inbound_closed: Arc::new(AtomicBool::new(false)),
                filters: Mutex::new(EventTable::new()),
                tracker: RwLock::new(None),
                extensions: RwLock::new(HashSet::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.inner.config
    }

    /// The thread this display is bound to.
    pub fn thread_id(&self) -> ThreadId {
        self.inner.affinity.thread_id()
    }

    pub(crate) fn affinity(&self) -> &ThreadAffinity {
        &self.inner.affinity
    }

    pub(crate) fn backend(&self) -> Arc<dyn PeerBackend> {
        self.inner.config.backend.clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Fail unless the display is live and the caller is on its thread.
    pub fn check_display(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(KernelError::DisplayDisposed);
        }
        self.inner.affinity.check()
    }

    /// Milliseconds since the display was created, never zero.
    pub fn time(&self) -> u64 {
        let millis = self.inner.epoch.elapsed().as_millis();
        u64::try_from(millis).unwrap_or(u64::MAX).max(1)
    }

    // -------------------------------------------------------------------------
    // Filters, tracker, extensions
    // -------------------------------------------------------------------------

    /// Run `listener` before widget listeners for every event of `kind`.
    ///
    /// A filter may set `event.kind` to [`EventKind::None`] to stop delivery
    /// to the widget's listeners.
    pub fn add_filter(&self, kind: EventKind, listener: Listener) -> Result<()> {
        self.check_display()?;
        self.inner
            .filters
            .lock()
            .hook(kind, ListenerEntry::Raw(listener));
        Ok(())
    }

    pub fn remove_filter(&self, kind: EventKind, listener: &Listener) -> Result<()> {
        self.check_display()?;
        self.inner
            .filters
            .lock()
            .unhook(kind, &ListenerEntry::Raw(listener.clone()));
        Ok(())
    }

    pub(crate) fn has_filters(&self, kind: EventKind) -> bool {
        self.inner.filters.lock().hooks(kind)
    }

    pub(crate) fn filters_for(&self, kind: EventKind) -> Vec<ListenerEntry> {
        self.inner.filters.lock().snapshot(kind)
    }

    /// Install or remove the creation/disposal tracker.
    pub fn set_tracker(&self, tracker: Option<Arc<dyn WidgetTracker>>) -> Result<()> {
        self.check_display()?;
        *self.inner.tracker.write() = tracker;
        Ok(())
    }

    pub fn tracker(&self) -> Option<Arc<dyn WidgetTracker>> {
        self.inner.tracker.read().clone()
    }

    pub(crate) fn notify_created(&self, widget: &Widget) {
        if let Some(tracker) = self.tracker() {
            tracker.widget_created(widget);
        }
    }

    pub(crate) fn notify_disposed(&self, widget: &Widget) {
        if let Some(tracker) = self.tracker() {
            tracker.widget_disposed(widget);
        }
    }

    /// Permit construction of [`WidgetKind::Custom`] widgets named `name`.
    pub fn allow_extension(&self, name: &'static str) -> Result<()> {
        self.check_display()?;
        self.inner.extensions.write().insert(name);
        Ok(())
    }

    pub fn is_extension_allowed(&self, name: &str) -> bool {
        self.inner.extensions.read().contains(name)
    }

    pub(crate) fn check_kind(&self, kind: WidgetKind) -> Result<()> {
        match kind {
            WidgetKind::Custom(name) if !self.is_extension_allowed(name) => {
                Err(KernelError::InvalidSubclass(name))
            }
            _ => Ok(()),
        }
    }

    // -------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------

    pub(crate) fn register(&self, widget: Weak<WidgetInner>) -> WidgetId {
        self.inner.registry.write().insert(widget)
    }

    pub(crate) fn deregister(&self, id: WidgetId) {
        self.inner.registry.write().remove(id);
    }

    /// Look up a live widget by id.
    pub fn widget(&self, id: WidgetId) -> Option<Widget> {
        self.inner
            .registry
            .read()
            .get(id)
            .and_then(Weak::upgrade)
            .map(Widget::from_inner)
    }

    /// Number of registered widgets.
    pub fn widget_count(&self) -> usize {
        self.inner.registry.read().len()
    }

    /// Top-level widgets, in creation order.
    pub fn roots(&self) -> Vec<Widget> {
        self.inner.roots.lock().clone()
    }

    pub(crate) fn add_root(&self, widget: Widget) {
        self.inner.roots.lock().push(widget);
    }

    pub(crate) fn remove_root(&self, widget: &Widget) {
        self.inner.roots.lock().retain(|w| w != widget);
    }

    // -------------------------------------------------------------------------
    // Queue and handoff
    // -------------------------------------------------------------------------

    pub(crate) fn enqueue(&self, event: Event) {
        self.inner.queue.lock().push_back(event);
    }

    /// Number of queued events not yet delivered.
    pub fn pending_events(&self) -> usize {
        self.inner.queue.lock().len()
    }

    /// A sender for the external bridge.
    pub fn inbound(&self) -> InboundSender {
        InboundSender::new(
            self.inner.inbound_tx.clone(),
            self.inner.inbound_closed.clone(),
        )
    }

    /// Run `f` on the owning thread during its next pump. Callable from any
    /// thread.
    pub fn async_exec<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_disposed() {
            return Err(KernelError::DisplayDisposed);
        }
        self.inner
            .tasks_tx
            .send(Runnable::new(f))
            .map_err(|_| KernelError::DisplayDisposed)
    }

    /// Run `f` on the owning thread and wait for it to finish.
    ///
    /// On the owning thread `f` runs immediately. From any other thread the
    /// call blocks until the owner pumps, and fails with
    /// [`KernelError::DisplayDisposed`] if the display is disposed first.
    pub fn sync_exec<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_disposed() {
            return Err(KernelError::DisplayDisposed);
        }
        if self.inner.affinity.is_same_thread() {
            f();
            return Ok(());
        }

        let (completion, waiter) = completion_pair();
        self.inner
            .tasks_tx
            .send(Runnable::with_completion(f, completion))
            .map_err(|_| KernelError::DisplayDisposed)?;
        if self.is_disposed() {
            // Disposal may have drained the queue before our send landed.
            self.drop_pending_tasks();
        }
        if waiter.wait() {
            Ok(())
        } else {
            Err(KernelError::DisplayDisposed)
        }
    }

    fn drop_pending_tasks(&self) -> usize {
        self.inner.tasks_rx.try_iter().count()
    }

    /// Deliver pending work once.
    ///
    /// Inbound bridge events are routed first, then the events that were
    /// queued when the pump started are delivered in FIFO order, then pending
    /// [`async_exec`](Self::async_exec) closures run. Returns whether any
    /// work was done. Every item is processed even if one fails; the first
    /// failure is returned.
    #[tracing::instrument(
        target = "trellis_core::display",
        level = "trace",
        skip(self),
        fields(display = %self.inner.config.name)
    )]
    pub fn read_and_dispatch(&self) -> Result<bool> {
        self.check_display()?;
        let mut stash = ErrorStash::new();
        let mut worked = false;

        for raw in self.inner.inbound_rx.try_iter() {
            worked = true;
            self.route_inbound(raw);
        }

        let pending = self.pending_events();
        let budget = self
            .inner
            .config
            .max_events_per_pump
            .map_or(pending, |max| pending.min(max));
        for _ in 0..budget {
            let Some(event) = self.inner.queue.lock().pop_front() else {
                break;
            };
            worked = true;
            stash.run("deliver queued event", || deliver_queued(event));
        }

        let tasks: Vec<Runnable> = self.inner.tasks_rx.try_iter().collect();
        for task in tasks {
            worked = true;
            task.run();
        }

        stash.finish().map(|()| worked)
    }

    /// Pump until no work is left.
    pub fn run_pending(&self) -> Result<()> {
        while self.read_and_dispatch()? {}
        Ok(())
    }

    fn route_inbound(&self, raw: InboundEvent) {
        let target = raw.target;
        let kind = raw.kind;
        match self.widget(target) {
            Some(widget) if !widget.is_disposed() => {
                if let Err(err) = widget.post_event(kind, raw.into_event()) {
                    tracing::warn!(
                        target: targets::BRIDGE,
                        ?target,
                        ?kind,
                        error = %err,
                        "inbound event rejected"
                    );
                }
            }
            _ => {
                tracing::warn!(
                    target: targets::BRIDGE,
                    ?target,
                    ?kind,
                    "dropping inbound event for unknown widget"
                );
            }
        }
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    /// Dispose every top-level widget and tear the display down.
    ///
    /// Display filters receive a [`EventKind::Dispose`] event first. Queued
    /// events and pending closures are dropped, the tracker and filters are
    /// cleared, and every later guarded call fails with
    /// [`KernelError::DisplayDisposed`]. Disposing twice does nothing.
    pub fn dispose(&self) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }
        self.inner.affinity.check()?;
        let mut stash = ErrorStash::new();

        let mut event = Event::new(EventKind::Dispose);
        event.display = Some(self.clone());
        event.time = self.time();
        fan_out(
            &self.filters_for(EventKind::Dispose),
            EventKind::Dispose,
            &mut event,
            &mut stash,
        );

        let roots = std::mem::take(&mut *self.inner.roots.lock());
        for root in roots {
            stash.run("dispose root", || root.dispose());
        }

        self.inner.disposed.store(true, Ordering::SeqCst);
        self.inner.inbound_closed.store(true, Ordering::Release);
        let dropped_events = {
            let mut queue = self.inner.queue.lock();
            let n = queue.len();
            queue.clear();
            n
        };
        let dropped_tasks = self.drop_pending_tasks();
        *self.inner.filters.lock() = EventTable::new();
        *self.inner.tracker.write() = None;

        tracing::debug!(
            target: targets::DISPLAY,
            name = %self.inner.config.name,
            dropped_events,
            dropped_tasks,
            "display disposed"
        );
        stash.finish()
    }
}

impl PartialEq for Display {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Display {}

impl fmt::Debug for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Display")
            .field("name", &self.inner.config.name)
            .field("thread", &self.inner.affinity.thread_id())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
