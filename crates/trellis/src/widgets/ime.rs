//! Input method composition owned by a canvas.

use trellis_core::{
    ContainmentOwner, Event, EventKind, PeerContext, PeerHandle, Result, Style, Widget,
    WidgetBehavior, WidgetKind,
};

use super::canvas::Canvas;

#[derive(Debug, Default)]
struct ImeBehavior {
    composition: String,
    caret_offset: usize,
}

impl ContainmentOwner for ImeBehavior {}

impl WidgetBehavior for ImeBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Ime
    }

    fn build_peer(&mut self, _cx: &PeerContext<'_>) -> Result<Option<PeerHandle>> {
        Ok(None)
    }

    fn release_buffers(&mut self) {
        self.composition.clear();
    }
}

widget_handle!(
    /// Input-method composition state of a [`Canvas`].
    Ime
);

impl Ime {
    /// Create the input method of `canvas`. A canvas holds at most one.
    pub fn new(canvas: &Canvas, style: Style) -> Result<Self> {
        Widget::new_owned(canvas.widget(), ImeBehavior::default(), style).map(Self::from_widget)
    }

    pub fn composition(&self) -> Result<String> {
        self.widget
            .with_behavior(|b: &mut ImeBehavior| b.composition.clone())
    }

    pub fn caret_offset(&self) -> Result<usize> {
        self.widget.with_behavior(|b: &mut ImeBehavior| b.caret_offset)
    }

    /// Replace the uncommitted composition text.
    ///
    /// `caret_offset` is clamped to the length of `text` in characters.
    pub fn set_composition(&self, text: &str, caret_offset: usize) -> Result<()> {
        self.widget.with_behavior(|b: &mut ImeBehavior| {
            b.composition = text.to_owned();
            b.caret_offset = caret_offset.min(text.chars().count());
        })?;
        self.widget.mark_dirty()
    }

    /// Commit the composition. Listeners receive a `Modify` event carrying
    /// the committed text. Returns the committed text.
    pub fn commit(&self) -> Result<String> {
        let committed = self.widget.with_behavior(|b: &mut ImeBehavior| {
            b.caret_offset = 0;
            std::mem::take(&mut b.composition)
        })?;
        self.widget.mark_dirty()?;
        self.widget.notify_listeners(
            EventKind::Modify,
            Event::new(EventKind::Modify).with_text(committed.clone()),
        )?;
        Ok(committed)
    }
}
