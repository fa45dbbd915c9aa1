//! Core systems for Trellis.
//!
//! This crate is the lifecycle kernel every Trellis widget is built on:
//!
//! - **Display**: the thread-bound owning context, its event queue and pump
//! - **Widget**: identity, style, state flags, listeners and data
//! - **Containment**: structural children, indexed items and owned secondaries
//! - **Dispatch**: synchronous and queued delivery with display filters
//! - **Disposal**: phased teardown that keeps going past failures
//!
//! Concrete widgets live in the `trellis` crate; they supply a
//! [`WidgetBehavior`] and delegate everything else to [`Widget`].
//!
//! # Example
//!
//! ```
//! use trellis_core::{
//!     ContainmentOwner, Display, Event, EventKind, Listener, Style, Widget, WidgetBehavior,
//!     WidgetKind,
//! };
//!
//! struct Plain;
//! impl ContainmentOwner for Plain {}
//! impl WidgetBehavior for Plain {
//!     fn kind(&self) -> WidgetKind {
//!         WidgetKind::Label
//!     }
//! }
//!
//! let display = Display::new();
//! let label = Widget::new_root(&display, Plain, Style::NONE)?;
//! label.add_listener(
//!     EventKind::Selection,
//!     Listener::new(|event| {
//!         println!("selected at {}", event.time);
//!         Ok(())
//!     }),
//! )?;
//! label.notify_listeners(EventKind::Selection, Event::default())?;
//! label.dispose()?;
//! assert!(label.is_disposed());
//! # Ok::<(), trellis_core::KernelError>(())
//! ```

mod behavior;
pub mod bridge;
pub mod child_set;
mod config;
pub mod data;
mod dispatch;
mod dispose;
mod display;
mod error;
mod event;
mod event_table;
pub mod invocation;
mod kind;
mod listener;
pub mod logging;
pub mod peer;
pub mod state;
pub mod style;
pub mod thread_check;
pub mod tracker;
mod widget;

#[cfg(test)]
mod testing;

pub use behavior::{AsAny, ContainmentOwner, WidgetBehavior};
pub use bridge::{InboundEvent, InboundSender};
pub use child_set::IndexedChildSet;
pub use config::DisplayConfig;
pub use data::{data_value, DataSlot, DataValue};
pub use dispose::ErrorStash;
pub use display::Display;
pub use error::{BoxError, KernelError, ListenerResult, Result};
pub use event::{Event, EventKind};
pub use event_table::EventTable;
pub use kind::WidgetKind;
pub use listener::{
    DisposeListener, FocusListener, Listener, ListenerEntry, ModifyListener, SelectionListener,
    TypedListener,
};
pub use logging::{TreeFormatOptions, TreeStyle, WidgetTreeDebug};
pub use peer::{InMemoryBackend, PeerBackend, PeerContext, PeerHandle};
pub use state::StateFlags;
pub use style::Style;
pub use thread_check::ThreadAffinity;
pub use tracker::{WidgetCensus, WidgetTracker};
pub use widget::{Widget, WidgetId};

static_assertions::assert_impl_all!(Widget: Send, Sync, Clone);
static_assertions::assert_impl_all!(Display: Send, Sync, Clone);
static_assertions::assert_impl_all!(Event: Send, Sync);
static_assertions::assert_impl_all!(KernelError: Send, Sync);
static_assertions::assert_impl_all!(InboundSender: Send, Sync, Clone);
