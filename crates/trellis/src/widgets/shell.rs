//! Top-level window.

use trellis_core::{ContainmentOwner, Display, Result, Style, Widget, WidgetBehavior, WidgetKind};

#[derive(Debug, Default)]
struct ShellBehavior {
    text: String,
}

impl ContainmentOwner for ShellBehavior {}

impl WidgetBehavior for ShellBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Shell
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::TEXT_DIRECTION]
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn release_buffers(&mut self) {
        self.text.clear();
    }
}

widget_handle!(
    /// A top-level window owned by its display.
    Shell
);

impl Shell {
    pub fn new(display: &Display, style: Style) -> Result<Self> {
        Widget::new_root(display, ShellBehavior::default(), style).map(Self::from_widget)
    }

    pub fn text(&self) -> Result<String> {
        self.widget.with_behavior(|b: &mut ShellBehavior| b.text.clone())
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut ShellBehavior| b.text = text.to_owned())?;
        self.widget.mark_dirty()
    }
}
