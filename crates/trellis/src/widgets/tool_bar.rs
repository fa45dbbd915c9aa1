//! Tool bars and their items.

use trellis_core::{
    ContainmentOwner, Event, EventKind, IndexedChildSet, KernelError, Result, Style, Widget,
    WidgetBehavior, WidgetKind,
};

#[derive(Debug)]
struct ToolBarBehavior {
    items: IndexedChildSet<Widget>,
}

impl ContainmentOwner for ToolBarBehavior {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn check_insert(&self, kind: WidgetKind, index: usize) -> Result<()> {
        if kind != WidgetKind::ToolItem {
            return Err(KernelError::InvalidArgument("tool bars only hold tool items"));
        }
        if index > self.items.len() {
            return Err(KernelError::InvalidRange {
                index,
                count: self.items.len(),
            });
        }
        Ok(())
    }

    fn insert_item(&mut self, index: usize, item: Widget) {
        if let Err(err) = self.items.insert(index, item) {
            tracing::warn!(%err, "tool item insert failed after validation");
        }
    }

    fn owned(&self) -> Vec<Widget> {
        self.items.snapshot()
    }

    fn detach(&mut self, widget: &Widget) -> bool {
        self.items.remove(widget).is_some()
    }

    fn release_owned(&mut self) -> Vec<Widget> {
        self.items.take_all()
    }
}

impl WidgetBehavior for ToolBarBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ToolBar
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::ORIENTATION]
    }
}

widget_handle!(
    /// A row of [`ToolItem`]s.
    ToolBar
);

impl ToolBar {
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        let behavior = ToolBarBehavior {
            items: IndexedChildSet::with_growth(parent.display().config().child_growth),
        };
        Widget::new(parent, behavior, style).map(Self::from_widget)
    }

    pub fn item_count(&self) -> Result<usize> {
        self.widget
            .with_behavior(|b: &mut ToolBarBehavior| b.items.len())
    }

    /// The item at `index`.
    pub fn item(&self, index: usize) -> Result<ToolItem> {
        self.widget.with_behavior(|b: &mut ToolBarBehavior| {
            b.items
                .get(index)
                .cloned()
                .map(ToolItem::from_widget)
                .ok_or(KernelError::InvalidRange {
                    index,
                    count: b.items.len(),
                })
        })?
    }

    pub fn items(&self) -> Result<Vec<ToolItem>> {
        self.widget.with_behavior(|b: &mut ToolBarBehavior| {
            b.items.iter().cloned().map(ToolItem::from_widget).collect()
        })
    }

    /// The position of `item`, or `None` if it is not on this tool bar.
    pub fn index_of(&self, item: &ToolItem) -> Result<Option<usize>> {
        self.widget
            .with_behavior(|b: &mut ToolBarBehavior| b.items.index_of(item.widget()))
    }
}

#[derive(Debug, Default)]
struct ToolItemBehavior {
    text: String,
    selected: bool,
    enabled: bool,
}

impl ContainmentOwner for ToolItemBehavior {}

impl WidgetBehavior for ToolItemBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::ToolItem
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::ITEM_KIND]
    }

    fn release_buffers(&mut self) {
        self.text.clear();
    }
}

widget_handle!(
    /// A button, toggle or separator on a [`ToolBar`].
    ToolItem
);

impl ToolItem {
    /// Append a new item to `parent`.
    pub fn new(parent: &ToolBar, style: Style) -> Result<Self> {
        let index = parent.item_count().map_err(parent_error)?;
        Self::with_index(parent, style, index)
    }

    /// Insert a new item at `index`, where `0 <= index <= item_count`.
    pub fn with_index(parent: &ToolBar, style: Style, index: usize) -> Result<Self> {
        let behavior = ToolItemBehavior {
            enabled: true,
            ..Default::default()
        };
        Widget::new_item(parent.widget(), behavior, style, index).map(Self::from_widget)
    }

    pub fn parent(&self) -> Result<ToolBar> {
        self.widget
            .parent()?
            .map(ToolBar::from_widget)
            .ok_or(KernelError::WidgetDisposed)
    }

    pub fn text(&self) -> Result<String> {
        self.widget.with_behavior(|b: &mut ToolItemBehavior| b.text.clone())
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        if self.widget.effective_style()?.contains(Style::SEPARATOR) {
            return Ok(());
        }
        self.widget
            .with_behavior(|b: &mut ToolItemBehavior| b.text = text.to_owned())?;
        self.widget.mark_dirty()
    }

    pub fn is_enabled(&self) -> Result<bool> {
        self.widget.with_behavior(|b: &mut ToolItemBehavior| b.enabled)
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut ToolItemBehavior| b.enabled = enabled)?;
        self.widget.mark_dirty()
    }

    pub fn selection(&self) -> Result<bool> {
        self.widget.with_behavior(|b: &mut ToolItemBehavior| b.selected)
    }

    /// Set the selection of a check or radio item. Other kinds ignore this.
    pub fn set_selection(&self, selected: bool) -> Result<()> {
        if !self
            .widget
            .effective_style()?
            .intersects(Style::CHECK | Style::RADIO)
        {
            return Ok(());
        }
        self.widget
            .with_behavior(|b: &mut ToolItemBehavior| b.selected = selected)?;
        self.widget.mark_dirty()
    }

    /// Simulate a click. Disabled items and separators do nothing.
    pub fn click(&self) -> Result<()> {
        let style = self.widget.effective_style()?;
        let enabled = self.is_enabled()?;
        if !enabled || style.contains(Style::SEPARATOR) {
            return Ok(());
        }
        if style.intersects(Style::CHECK | Style::RADIO) {
            let radio = style.contains(Style::RADIO);
            self.widget.with_behavior(|b: &mut ToolItemBehavior| {
                b.selected = radio || !b.selected;
            })?;
            self.widget.mark_dirty()?;
        }
        self.widget
            .notify_listeners(EventKind::Selection, Event::new(EventKind::Selection))?;
        Ok(())
    }
}

/// Report a disposed parent the way construction does.
pub(crate) fn parent_error(err: KernelError) -> KernelError {
    match err {
        KernelError::WidgetDisposed => KernelError::InvalidArgument("parent is disposed"),
        other => other,
    }
}
