//! Hyperlink text.

use trellis_core::{
    ContainmentOwner, Event, EventKind, Result, Style, Widget, WidgetBehavior, WidgetKind,
};

#[derive(Debug, Default)]
struct LinkBehavior {
    text: String,
}

impl ContainmentOwner for LinkBehavior {}

impl WidgetBehavior for LinkBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Link
    }

    fn release_buffers(&mut self) {
        self.text.clear();
    }
}

widget_handle!(
    /// A hyperlink label. The text is stored verbatim; anchors are not
    /// parsed.
    Link
);

impl Link {
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        Widget::new(parent, LinkBehavior::default(), style).map(Self::from_widget)
    }

    pub fn text(&self) -> Result<String> {
        self.widget.with_behavior(|b: &mut LinkBehavior| b.text.clone())
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut LinkBehavior| b.text = text.to_owned())?;
        self.widget.mark_dirty()
    }

    /// Simulate activation. `Selection` listeners receive the link text.
    pub fn activate(&self) -> Result<()> {
        let text = self.text()?;
        self.widget.notify_listeners(
            EventKind::Selection,
            Event::new(EventKind::Selection).with_text(text),
        )?;
        Ok(())
    }
}
