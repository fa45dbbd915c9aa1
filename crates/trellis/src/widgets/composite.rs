//! Plain and scrollable containers.

use trellis_core::{ContainmentOwner, Result, Style, Widget, WidgetBehavior, WidgetKind};

use super::scroll_bar::{create_scroll_bars, ScrollBar, ScrollSlots};

#[derive(Debug, Default)]
struct CompositeBehavior {
    scroll: ScrollSlots,
}

impl ContainmentOwner for CompositeBehavior {
    fn check_adopt(&self, kind: WidgetKind, style: Style) -> Result<()> {
        self.scroll.check_adopt(kind, style)
    }

    fn adopt(&mut self, secondary: Widget) {
        self.scroll.adopt(secondary);
    }

    fn owned(&self) -> Vec<Widget> {
        self.scroll.owned()
    }

    fn detach(&mut self, widget: &Widget) -> bool {
        self.scroll.detach(widget)
    }

    fn release_owned(&mut self) -> Vec<Widget> {
        self.scroll.release()
    }
}

impl WidgetBehavior for CompositeBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Composite
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

widget_handle!(
    /// A container for other widgets, optionally scrollable.
    Composite
);

impl Composite {
    /// Create a composite under `parent`. `H_SCROLL` and `V_SCROLL` create
    /// the matching scroll bars.
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        let widget = Widget::new(parent, CompositeBehavior::default(), style)?;
        if let Err(err) = create_scroll_bars(&widget, style) {
            if let Err(cleanup) = widget.dispose() {
                tracing::warn!(%cleanup, "composite cleanup failed after scroll bar error");
            }
            return Err(err);
        }
        Ok(Self { widget })
    }

    pub fn horizontal_bar(&self) -> Result<Option<ScrollBar>> {
        self.widget
            .with_behavior(|b: &mut CompositeBehavior| b.scroll.horizontal())
    }

    pub fn vertical_bar(&self) -> Result<Option<ScrollBar>> {
        self.widget
            .with_behavior(|b: &mut CompositeBehavior| b.scroll.vertical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Shell;
    use std::sync::Arc;
    use trellis_core::{
        BoxError, Display, DisplayConfig, InMemoryBackend, KernelError, PeerBackend, PeerHandle,
        WidgetId,
    };

    /// Refuses to build scroll bar peers.
    #[derive(Default)]
    struct NoScrollBars(InMemoryBackend);

    impl PeerBackend for NoScrollBars {
        fn create_peer(
            &self,
            id: WidgetId,
            kind: WidgetKind,
            style: Style,
        ) -> std::result::Result<PeerHandle, BoxError> {
            if kind == WidgetKind::ScrollBar {
                return Err("no scroll bars here".into());
            }
            self.0.create_peer(id, kind, style)
        }

        fn destroy_peer(
            &self,
            id: WidgetId,
            handle: PeerHandle,
        ) -> std::result::Result<(), BoxError> {
            self.0.destroy_peer(id, handle)
        }
    }

    #[test]
    fn test_scroll_bars_from_style() {
        let display = Display::new();
        let shell = Shell::new(&display, Style::NONE).unwrap();
        let plain = Composite::new(&shell, Style::NONE).unwrap();
        assert!(plain.horizontal_bar().unwrap().is_none());
        assert!(plain.owned().unwrap().is_empty());

        let scrolled = Composite::new(&shell, Style::H_SCROLL | Style::V_SCROLL).unwrap();
        let h = scrolled.horizontal_bar().unwrap().unwrap();
        let v = scrolled.vertical_bar().unwrap().unwrap();
        assert!(h.is_horizontal().unwrap());
        assert!(!v.is_horizontal().unwrap());
        assert_eq!(scrolled.owned().unwrap().len(), 2);
    }

    #[test]
    fn test_disposing_bar_clears_slot() {
        let display = Display::new();
        let shell = Shell::new(&display, Style::NONE).unwrap();
        let scrolled = Composite::new(&shell, Style::V_SCROLL).unwrap();
        let bar = scrolled.vertical_bar().unwrap().unwrap();

        bar.dispose().unwrap();
        assert!(scrolled.vertical_bar().unwrap().is_none());
        assert!(scrolled.owned().unwrap().is_empty());
    }

    #[test]
    fn test_failed_scroll_bar_disposes_composite() {
        let backend = Arc::new(NoScrollBars::default());
        let display = Display::with_config(DisplayConfig::default().with_backend(backend.clone()));
        let shell = Shell::new(&display, Style::NONE).unwrap();

        let err = Composite::new(&shell, Style::H_SCROLL).unwrap_err();
        assert!(matches!(err, KernelError::Peer(_)));
        assert!(shell.children().unwrap().is_empty());
        assert_eq!(display.widget_count(), 1);
        assert_eq!(backend.0.live_count(), 1);
    }
}
