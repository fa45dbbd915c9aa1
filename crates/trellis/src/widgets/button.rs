//! Push, check, radio, toggle and arrow buttons.

use trellis_core::style::canonicalize;
use trellis_core::{
    ContainmentOwner, Event, EventKind, Result, Style, Widget, WidgetBehavior, WidgetKind,
};

#[derive(Debug, Default)]
struct ButtonBehavior {
    text: String,
    selected: bool,
}

impl ContainmentOwner for ButtonBehavior {}

impl WidgetBehavior for ButtonBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Button
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::BUTTON_KIND]
    }

    fn force_style(&self, style: Style) -> Style {
        if style.intersects(Style::PUSH | Style::TOGGLE) {
            return canonicalize(style, &[Style::CENTER, Style::LEFT, Style::RIGHT]);
        }
        if style.intersects(Style::CHECK | Style::RADIO) {
            return canonicalize(style, &[Style::LEFT, Style::RIGHT, Style::CENTER]);
        }
        // Arrow buttons never take focus.
        canonicalize(style | Style::NO_FOCUS, Style::ARROW_DIRECTION)
    }

    fn release_buffers(&mut self) {
        self.text.clear();
    }
}

widget_handle!(
    /// A button. The kind is chosen by one of `PUSH`, `ARROW`, `CHECK`,
    /// `RADIO` or `TOGGLE`; push is the default.
    Button
);

impl Button {
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        Widget::new(parent, ButtonBehavior::default(), style).map(Self::from_widget)
    }

    fn is_stateful(&self) -> Result<bool> {
        Ok(self
            .widget
            .effective_style()?
            .intersects(Style::CHECK | Style::RADIO | Style::TOGGLE))
    }

    pub fn text(&self) -> Result<String> {
        self.widget.with_behavior(|b: &mut ButtonBehavior| b.text.clone())
    }

    /// Set the label. Arrow buttons have no label and ignore this.
    pub fn set_text(&self, text: &str) -> Result<()> {
        if self.widget.effective_style()?.contains(Style::ARROW) {
            return Ok(());
        }
        self.widget
            .with_behavior(|b: &mut ButtonBehavior| b.text = text.to_owned())?;
        self.widget.mark_dirty()
    }

    /// Selection state. Always `false` for push and arrow buttons.
    pub fn selection(&self) -> Result<bool> {
        self.widget.with_behavior(|b: &mut ButtonBehavior| b.selected)
    }

    pub fn set_selection(&self, selected: bool) -> Result<()> {
        if !self.is_stateful()? {
            return Ok(());
        }
        self.widget
            .with_behavior(|b: &mut ButtonBehavior| b.selected = selected)?;
        self.widget.mark_dirty()
    }

    /// Simulate a user click: stateful buttons flip their selection, then
    /// `Selection` listeners run synchronously.
    ///
    /// A radio button that is already selected stays selected.
    pub fn click(&self) -> Result<()> {
        let style = self.widget.effective_style()?;
        if self.is_stateful()? {
            let radio = style.contains(Style::RADIO);
            self.widget.with_behavior(|b: &mut ButtonBehavior| {
                b.selected = radio || !b.selected;
            })?;
            self.widget.mark_dirty()?;
        }
        self.widget
            .notify_listeners(EventKind::Selection, Event::new(EventKind::Selection))?;
        Ok(())
    }
}
