//! Per-kind widget behavior.
//!
//! Every [`Widget`] owns exactly one boxed [`WidgetBehavior`], chosen at
//! construction. The kernel drives lifecycle through it: style groups and
//! forced bits during construction, the peer hooks while building and
//! releasing, and the [`ContainmentOwner`] methods for widgets that own
//! items or secondaries.
//!
//! Behavior methods run with the widget's behavior lock held. They must not
//! call back into the same widget.

use std::any::Any;

use crate::error::{KernelError, Result};
use crate::kind::WidgetKind;
use crate::peer::{PeerContext, PeerHandle};
use crate::style::Style;
use crate::widget::Widget;

/// Ownership of items and secondary widgets.
///
/// Items (tool items, tab items) live in an indexed collection of the owner.
/// Secondaries (scroll bars, caret, input method) occupy named slots. Both
/// are released with the owner, before the owner's own peer is freed.
///
/// The `check_*` methods run during construction, before any side effect,
/// so the matching `insert_item` / `adopt` calls cannot fail.
pub trait ContainmentOwner {
    /// Number of indexed items.
    fn item_count(&self) -> usize {
        0
    }

    /// Validate inserting an item of `kind` at `index`.
    fn check_insert(&self, kind: WidgetKind, index: usize) -> Result<()> {
        let _ = (kind, index);
        Err(KernelError::InvalidArgument("widget does not accept items"))
    }

    /// Insert a validated item.
    fn insert_item(&mut self, index: usize, item: Widget) {
        let _ = (index, item);
    }

    /// Validate adopting a secondary of `kind` with `style`.
    fn check_adopt(&self, kind: WidgetKind, style: Style) -> Result<()> {
        let _ = (kind, style);
        Err(KernelError::InvalidArgument("widget does not own secondaries"))
    }

    /// Store a validated secondary.
    fn adopt(&mut self, secondary: Widget) {
        let _ = secondary;
    }

    /// Items and secondaries currently owned.
    fn owned(&self) -> Vec<Widget> {
        Vec::new()
    }

    /// Clear every reference to `widget`. Returns whether one was found.
    fn detach(&mut self, widget: &Widget) -> bool {
        let _ = widget;
        false
    }

    /// Take every item and secondary, clearing all references to them.
    fn release_owned(&mut self) -> Vec<Widget> {
        Vec::new()
    }
}

/// Upcasting support for behavior downcasts.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Kind-specific widget behavior.
pub trait WidgetBehavior: ContainmentOwner + AsAny + Send {
    fn kind(&self) -> WidgetKind;

    /// Exclusivity groups applied to the requested style, in order.
    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[]
    }

    /// Adjust the canonicalized style with bits this kind forces.
    fn force_style(&self, style: Style) -> Style {
        style
    }

    /// Whether structural children may be created under this widget.
    fn accepts_children(&self) -> bool {
        false
    }

    /// Allocate the backing peer. Peer-less kinds return `Ok(None)`.
    fn build_peer(&mut self, cx: &PeerContext<'_>) -> Result<Option<PeerHandle>> {
        cx.allocate().map(Some)
    }

    /// Free the backing peer.
    fn destroy_peer(&mut self, cx: &PeerContext<'_>, handle: PeerHandle) -> Result<()> {
        cx.free(handle)
    }

    /// Drop in-process state. Called once, while the widget is released.
    fn release_buffers(&mut self) {}
}
