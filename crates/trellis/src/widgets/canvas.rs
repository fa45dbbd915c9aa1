//! Drawing surface with caret and input-method secondaries.

use trellis_core::{
    ContainmentOwner, KernelError, Result, Style, Widget, WidgetBehavior, WidgetKind,
};

use super::caret::Caret;
use super::ime::Ime;
use super::scroll_bar::{create_scroll_bars, ScrollBar, ScrollSlots};

#[derive(Debug, Default)]
struct CanvasBehavior {
    scroll: ScrollSlots,
    caret: Option<Widget>,
    ime: Option<Widget>,
}

impl CanvasBehavior {
    fn slot(&mut self, kind: WidgetKind) -> Option<&mut Option<Widget>> {
        match kind {
            WidgetKind::Caret => Some(&mut self.caret),
            WidgetKind::Ime => Some(&mut self.ime),
            _ => None,
        }
    }
}

impl ContainmentOwner for CanvasBehavior {
    fn check_adopt(&self, kind: WidgetKind, style: Style) -> Result<()> {
        let occupied = match kind {
            WidgetKind::Caret => self.caret.is_some(),
            WidgetKind::Ime => self.ime.is_some(),
            _ => return self.scroll.check_adopt(kind, style),
        };
        if occupied {
            return Err(KernelError::InvalidArgument("canvas slot is occupied"));
        }
        Ok(())
    }

    fn adopt(&mut self, secondary: Widget) {
        match self.slot(secondary.kind()) {
            Some(slot) => *slot = Some(secondary),
            None => self.scroll.adopt(secondary),
        }
    }

    fn owned(&self) -> Vec<Widget> {
        let mut owned = self.scroll.owned();
        owned.extend(self.caret.iter().chain(&self.ime).cloned());
        owned
    }

    fn detach(&mut self, widget: &Widget) -> bool {
        if let Some(slot) = self.slot(widget.kind()) {
            if slot.as_ref() == Some(widget) {
                *slot = None;
                return true;
            }
            return false;
        }
        self.scroll.detach(widget)
    }

    fn release_owned(&mut self) -> Vec<Widget> {
        let mut owned: Vec<Widget> = self.caret.take().into_iter().chain(self.ime.take()).collect();
        owned.extend(self.scroll.release());
        owned
    }
}

impl WidgetBehavior for CanvasBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Canvas
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

widget_handle!(
    /// A custom-drawn surface. A canvas may own one caret, one input method
    /// and its scroll bars.
    Canvas
);

impl Canvas {
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        let widget = Widget::new(parent, CanvasBehavior::default(), style)?;
        if let Err(err) = create_scroll_bars(&widget, style) {
            if let Err(cleanup) = widget.dispose() {
                tracing::warn!(%cleanup, "canvas cleanup failed after scroll bar error");
            }
            return Err(err);
        }
        Ok(Self { widget })
    }

    pub fn caret(&self) -> Result<Option<Caret>> {
        self.widget
            .with_behavior(|b: &mut CanvasBehavior| b.caret.clone().map(Caret::from_widget))
    }

    pub fn ime(&self) -> Result<Option<Ime>> {
        self.widget
            .with_behavior(|b: &mut CanvasBehavior| b.ime.clone().map(Ime::from_widget))
    }

    pub fn horizontal_bar(&self) -> Result<Option<ScrollBar>> {
        self.widget
            .with_behavior(|b: &mut CanvasBehavior| b.scroll.horizontal())
    }

    pub fn vertical_bar(&self) -> Result<Option<ScrollBar>> {
        self.widget
            .with_behavior(|b: &mut CanvasBehavior| b.scroll.vertical())
    }
}
