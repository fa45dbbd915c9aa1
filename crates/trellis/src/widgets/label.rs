//! Text labels and separators.

use trellis_core::style::canonicalize;
use trellis_core::{ContainmentOwner, Result, Style, Widget, WidgetBehavior, WidgetKind};

#[derive(Debug, Default)]
struct LabelBehavior {
    text: String,
}

impl ContainmentOwner for LabelBehavior {}

impl WidgetBehavior for LabelBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::ALIGNMENT]
    }

    fn force_style(&self, style: Style) -> Style {
        if style.contains(Style::SEPARATOR) {
            canonicalize(style, Style::ORIENTATION)
        } else {
            style
        }
    }

    fn release_buffers(&mut self) {
        self.text.clear();
    }
}

widget_handle!(
    /// Non-interactive text, or a separator line when built with
    /// `SEPARATOR`.
    Label
);

impl Label {
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        Widget::new(parent, LabelBehavior::default(), style).map(Self::from_widget)
    }

    pub fn text(&self) -> Result<String> {
        self.widget.with_behavior(|b: &mut LabelBehavior| b.text.clone())
    }

    /// Set the text. Separators have none and ignore this.
    pub fn set_text(&self, text: &str) -> Result<()> {
        if self.widget.effective_style()?.contains(Style::SEPARATOR) {
            return Ok(());
        }
        self.widget
            .with_behavior(|b: &mut LabelBehavior| b.text = text.to_owned())?;
        self.widget.mark_dirty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Shell;
    use trellis_core::Display;

    #[test]
    fn test_separator_has_orientation() {
        let display = Display::new();
        let shell = Shell::new(&display, Style::NONE).unwrap();
        let separator = Label::new(&shell, Style::SEPARATOR).unwrap();
        let style = separator.effective_style().unwrap();
        assert!(style.contains(Style::HORIZONTAL | Style::LEFT));

        separator.set_text("ignored").unwrap();
        assert!(separator.text().unwrap().is_empty());
    }

    #[test]
    fn test_text_after_dispose_fails() {
        let display = Display::new();
        let shell = Shell::new(&display, Style::NONE).unwrap();
        let label = Label::new(&shell, Style::RIGHT).unwrap();
        label.set_text("name").unwrap();
        assert_eq!(label.text().unwrap(), "name");

        label.dispose().unwrap();
        assert!(matches!(
            label.text(),
            Err(trellis_core::KernelError::WidgetDisposed)
        ));
    }
}
