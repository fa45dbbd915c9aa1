//! Concrete widgets.
//!
//! Each widget is a behavior type implementing
//! [`WidgetBehavior`](trellis_core::WidgetBehavior) plus a thin handle that
//! dereferences to [`Widget`](trellis_core::Widget). Lifecycle, listeners and
//! data all come from the kernel; the handles only add kind-specific
//! accessors.

/// Declare a typed widget handle that delegates to [`trellis_core::Widget`].
macro_rules! widget_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            widget: trellis_core::Widget,
        }

        impl $name {
            /// The underlying kernel widget.
            pub fn widget(&self) -> &trellis_core::Widget {
                &self.widget
            }

            #[allow(dead_code)]
            pub(crate) fn from_widget(widget: trellis_core::Widget) -> Self {
                Self { widget }
            }
        }

        impl std::ops::Deref for $name {
            type Target = trellis_core::Widget;

            fn deref(&self) -> &Self::Target {
                &self.widget
            }
        }

        impl AsRef<trellis_core::Widget> for $name {
            fn as_ref(&self) -> &trellis_core::Widget {
                &self.widget
            }
        }

        impl From<$name> for trellis_core::Widget {
            fn from(handle: $name) -> Self {
                handle.widget
            }
        }
    };
}

mod button;
mod canvas;
mod caret;
mod composite;
mod ime;
mod label;
mod link;
mod scroll_bar;
mod shell;
mod tab_folder;
mod tool_bar;

pub use button::Button;
pub use canvas::Canvas;
pub use caret::Caret;
pub use composite::Composite;
pub use ime::Ime;
pub use label::Label;
pub use link::Link;
pub use scroll_bar::ScrollBar;
pub use shell::Shell;
pub use tab_folder::{TabFolder, TabItem};
pub use tool_bar::{ToolBar, ToolItem};
