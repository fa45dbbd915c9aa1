//! The closed set of widget kinds.

use std::fmt;

/// What a widget is.
///
/// Built-in kinds are always constructible. A [`WidgetKind::Custom`] kind is
/// only accepted after its name has been registered with
/// [`Display::allow_extension`](crate::Display::allow_extension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Shell,
    Composite,
    Canvas,
    Button,
    Label,
    Link,
    ToolBar,
    ToolItem,
    TabFolder,
    TabItem,
    ScrollBar,
    Caret,
    Ime,
    Custom(&'static str),
}

impl WidgetKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Shell => "Shell",
            Self::Composite => "Composite",
            Self::Canvas => "Canvas",
            Self::Button => "Button",
            Self::Label => "Label",
            Self::Link => "Link",
            Self::ToolBar => "ToolBar",
            Self::ToolItem => "ToolItem",
            Self::TabFolder => "TabFolder",
            Self::TabItem => "TabItem",
            Self::ScrollBar => "ScrollBar",
            Self::Caret => "Caret",
            Self::Ime => "IME",
            Self::Custom(name) => name,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
