//! Logging and debugging facilities for Trellis.
//!
//! Trellis uses the `tracing` crate for instrumentation and never installs a
//! subscriber itself. To see logs, install one in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("trellis_core::dispose=debug")
//!     .init();
//! ```
//!
//! Use [`WidgetTreeDebug`] to render a widget hierarchy:
//!
//! ```
//! use trellis_core::logging::{TreeFormatOptions, WidgetTreeDebug};
//! use trellis_core::Display;
//!
//! let display = Display::new();
//! let text = WidgetTreeDebug::with_options(TreeFormatOptions::minimal()).format_display(&display);
//! assert!(text.contains("0 widgets"));
//! ```

use std::fmt::Write as _;

use crate::display::Display;
use crate::widget::Widget;

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "trellis_core";
    /// Widget construction and thread checks.
    pub const WIDGET: &str = "trellis_core::widget";
    /// Event dispatch and the queue.
    pub const DISPATCH: &str = "trellis_core::dispatch";
    /// Widget teardown.
    pub const DISPOSE: &str = "trellis_core::dispose";
    /// Display lifecycle and pumping.
    pub const DISPLAY: &str = "trellis_core::display";
    /// Inbound bridge events.
    pub const BRIDGE: &str = "trellis_core::bridge";
}

/// Style options for tree visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Compact single-line representation.
    Compact,
}

/// Configuration for widget tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    pub show_ids: bool,
    pub show_styles: bool,
    /// Show lifecycle and feature flags.
    pub show_state: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_styles: false,
            show_state: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    pub fn detailed() -> Self {
        Self {
            show_styles: true,
            show_state: true,
            ..Default::default()
        }
    }

    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            ..Default::default()
        }
    }
}

/// Renders widget hierarchies as text.
///
/// Structural children are listed first, then items and secondaries. The
/// renderer only reads state, so it works from any thread and on disposed
/// widgets.
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every top-level widget of `display`.
    pub fn format_display(&self, display: &Display) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "Widget tree of '{}' ({} widgets):",
            display.name(),
            display.widget_count()
        );
        let roots = display.roots();
        if roots.is_empty() {
            output.push_str("  (empty)\n");
        }
        let count = roots.len();
        for (i, root) in roots.iter().enumerate() {
            self.format_into(root, 0, i + 1 == count, &mut output);
        }
        output
    }

    /// Format `root` and everything below it.
    pub fn format_subtree(&self, root: &Widget) -> String {
        let mut output = String::new();
        self.format_into(root, 0, true, &mut output);
        output
    }

    fn format_into(&self, widget: &Widget, depth: usize, is_last: bool, output: &mut String) {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return;
        }

        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(widget.kind().name());
        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", widget.id());
        }
        if self.options.show_styles {
            let _ = write!(output, " style={:#x}", widget.inner.style.bits());
        }
        if self.options.show_state {
            let _ = write!(output, " {:?}", widget.state());
        }
        output.push('\n');

        let below = widget.descendants_unchecked();
        let count = below.len();
        for (i, child) in below.iter().enumerate() {
            self.format_into(child, depth + 1, i + 1 == count, output);
        }
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..(depth - 1) {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}
