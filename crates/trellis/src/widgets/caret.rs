//! Text insertion caret owned by a canvas.

use trellis_core::{
    ContainmentOwner, PeerContext, PeerHandle, Result, Style, Widget, WidgetBehavior, WidgetKind,
};

use super::canvas::Canvas;

#[derive(Debug, Default)]
pub(crate) struct CaretBehavior {
    visible: bool,
    location: (i32, i32),
    size: (i32, i32),
}

impl ContainmentOwner for CaretBehavior {}

impl WidgetBehavior for CaretBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Caret
    }

    // Drawn by the owning canvas.
    fn build_peer(&mut self, _cx: &PeerContext<'_>) -> Result<Option<PeerHandle>> {
        Ok(None)
    }
}

widget_handle!(
    /// The blinking insertion point of a [`Canvas`].
    Caret
);

impl Caret {
    /// Create the caret of `canvas`. A canvas holds at most one caret.
    pub fn new(canvas: &Canvas, style: Style) -> Result<Self> {
        Widget::new_owned(canvas.widget(), Self::behavior(), style).map(Self::from_widget)
    }

    pub(crate) fn behavior() -> CaretBehavior {
        CaretBehavior {
            size: (1, 16),
            ..Default::default()
        }
    }

    pub fn is_visible(&self) -> Result<bool> {
        self.widget.with_behavior(|b: &mut CaretBehavior| b.visible)
    }

    pub fn set_visible(&self, visible: bool) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut CaretBehavior| b.visible = visible)?;
        self.widget.mark_dirty()
    }

    pub fn location(&self) -> Result<(i32, i32)> {
        self.widget.with_behavior(|b: &mut CaretBehavior| b.location)
    }

    pub fn set_location(&self, x: i32, y: i32) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut CaretBehavior| b.location = (x, y))?;
        self.widget.mark_dirty()
    }

    pub fn size(&self) -> Result<(i32, i32)> {
        self.widget.with_behavior(|b: &mut CaretBehavior| b.size)
    }

    pub fn set_size(&self, width: i32, height: i32) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut CaretBehavior| b.size = (width.max(0), height.max(0)))?;
        self.widget.mark_dirty()
    }
}
