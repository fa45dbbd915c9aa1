//! Commonly used types:
//!
//! ```
//! use trellis::prelude::*;
//! ```

// ============================================================================
// Kernel
// ============================================================================

pub use crate::{Display, DisplayConfig, KernelError, Result, Style, Widget, WidgetKind};

// ============================================================================
// Events and Listeners
// ============================================================================

pub use crate::{
    DisposeListener, Event, EventKind, FocusListener, Listener, ModifyListener,
    SelectionListener, TypedListener,
};

// ============================================================================
// Widgets
// ============================================================================

pub use crate::widgets::{
    Button, Canvas, Caret, Composite, Ime, Label, Link, ScrollBar, Shell, TabFolder, TabItem,
    ToolBar, ToolItem,
};
