//! Trellis - a widget toolkit kernel with deterministic lifecycle and event
//! dispatch.
//!
//! This is the umbrella crate. It re-exports the kernel from `trellis-core`
//! and adds the concrete widgets.
//!
//! # Example
//!
//! ```
//! use trellis::prelude::*;
//!
//! let display = Display::new();
//! let shell = Shell::new(&display, Style::NONE)?;
//! let bar = ToolBar::new(&shell, Style::HORIZONTAL)?;
//! let open = ToolItem::new(&bar, Style::PUSH)?;
//! open.set_text("Open")?;
//!
//! shell.dispose()?;
//! assert!(open.is_disposed());
//! # Ok::<(), trellis::KernelError>(())
//! ```

pub use trellis_core::*;

pub mod prelude;
pub mod widgets;

static_assertions::assert_impl_all!(widgets::ToolBar: Send, Sync, Clone);
static_assertions::assert_impl_all!(widgets::Canvas: Send, Sync, Clone);
static_assertions::assert_impl_all!(widgets::TabItem: Send, Sync, Clone);
