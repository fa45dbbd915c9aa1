//! Tab folders and their items.

use trellis_core::{
    ContainmentOwner, Event, EventKind, IndexedChildSet, KernelError, Result, Style, Widget,
    WidgetBehavior, WidgetKind,
};

use super::tool_bar::parent_error;

#[derive(Debug)]
struct TabFolderBehavior {
    items: IndexedChildSet<Widget>,
    selection: Option<usize>,
}

impl ContainmentOwner for TabFolderBehavior {
    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn check_insert(&self, kind: WidgetKind, index: usize) -> Result<()> {
        if kind != WidgetKind::TabItem {
            return Err(KernelError::InvalidArgument("tab folders only hold tab items"));
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
            tracing::warn!(%err, "tab item insert failed after validation");
            return;
        }
        self.selection = match self.selection {
            None => Some(0),
            Some(selected) if index <= selected => Some(selected + 1),
            keep => keep,
        };
    }

    fn owned(&self) -> Vec<Widget> {
        self.items.snapshot()
    }

    fn detach(&mut self, widget: &Widget) -> bool {
        let Some(removed) = self.items.remove(widget) else {
            return false;
        };
        let count = self.items.len();
        self.selection = match self.selection {
            _ if count == 0 => None,
            Some(selected) if selected > removed => Some(selected - 1),
            Some(selected) if selected == removed => Some(selected.min(count - 1)),
            keep => keep,
        };
        true
    }

    fn release_owned(&mut self) -> Vec<Widget> {
        self.selection = None;
        self.items.take_all()
    }
}

impl WidgetBehavior for TabFolderBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TabFolder
    }

    fn style_groups(&self) -> &'static [&'static [Style]] {
        &[Style::TAB_POSITION]
    }

    fn accepts_children(&self) -> bool {
        true
    }
}

widget_handle!(
    /// A notebook of [`TabItem`] pages.
    TabFolder
);

impl TabFolder {
    pub fn new(parent: &Widget, style: Style) -> Result<Self> {
        let behavior = TabFolderBehavior {
            items: IndexedChildSet::with_growth(parent.display().config().child_growth),
            selection: None,
        };
        Widget::new(parent, behavior, style).map(Self::from_widget)
    }

    pub fn item_count(&self) -> Result<usize> {
        self.widget
            .with_behavior(|b: &mut TabFolderBehavior| b.items.len())
    }

    pub fn item(&self, index: usize) -> Result<TabItem> {
        self.widget.with_behavior(|b: &mut TabFolderBehavior| {
            b.items
                .get(index)
                .cloned()
                .map(TabItem::from_widget)
                .ok_or(KernelError::InvalidRange {
                    index,
                    count: b.items.len(),
                })
        })?
    }

    pub fn items(&self) -> Result<Vec<TabItem>> {
        self.widget.with_behavior(|b: &mut TabFolderBehavior| {
            b.items.iter().cloned().map(TabItem::from_widget).collect()
        })
    }

    pub fn index_of(&self, item: &TabItem) -> Result<Option<usize>> {
        self.widget
            .with_behavior(|b: &mut TabFolderBehavior| b.items.index_of(item.widget()))
    }

    /// Index of the selected tab. `None` only while the folder is empty.
    pub fn selection_index(&self) -> Result<Option<usize>> {
        self.widget
            .with_behavior(|b: &mut TabFolderBehavior| b.selection)
    }

    pub fn selection(&self) -> Result<Option<TabItem>> {
        self.widget.with_behavior(|b: &mut TabFolderBehavior| {
            b.selection
                .and_then(|index| b.items.get(index).cloned())
                .map(TabItem::from_widget)
        })
    }

    /// Select the tab at `index` without notifying listeners.
    pub fn set_selection(&self, index: usize) -> Result<()> {
        self.widget.with_behavior(|b: &mut TabFolderBehavior| {
            if index >= b.items.len() {
                return Err(KernelError::InvalidRange {
                    index,
                    count: b.items.len(),
                });
            }
            b.selection = Some(index);
            Ok(())
        })??;
        self.widget.mark_dirty()
    }
}

#[derive(Debug, Default)]
struct TabItemBehavior {
    text: String,
    tool_tip: Option<String>,
}

impl ContainmentOwner for TabItemBehavior {}

impl WidgetBehavior for TabItemBehavior {
    fn kind(&self) -> WidgetKind {
        WidgetKind::TabItem
    }

    fn release_buffers(&mut self) {
        self.text.clear();
        self.tool_tip = None;
    }
}

widget_handle!(
    /// A page of a [`TabFolder`].
    TabItem
);

impl TabItem {
    /// Append a new tab to `parent`.
    pub fn new(parent: &TabFolder, style: Style) -> Result<Self> {
        let index = parent.item_count().map_err(parent_error)?;
        Self::with_index(parent, style, index)
    }

    /// Insert a new tab at `index`, where `0 <= index <= item_count`.
    ///
    /// The first tab of a folder becomes its selection, and a `Selection`
    /// event naming it is queued on the folder.
    pub fn with_index(parent: &TabFolder, style: Style, index: usize) -> Result<Self> {
        let widget = Widget::new_item(parent.widget(), TabItemBehavior::default(), style, index)?;
        if parent.item_count()? == 1 {
            parent.post_event(
                EventKind::Selection,
                Event::new(EventKind::Selection)
                    .with_item(widget.clone())
                    .with_index(0),
            )?;
        }
        Ok(Self { widget })
    }

    pub fn parent(&self) -> Result<TabFolder> {
        self.widget
            .parent()?
            .map(TabFolder::from_widget)
            .ok_or(KernelError::WidgetDisposed)
    }

    pub fn text(&self) -> Result<String> {
        self.widget.with_behavior(|b: &mut TabItemBehavior| b.text.clone())
    }

    pub fn set_text(&self, text: &str) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut TabItemBehavior| b.text = text.to_owned())?;
        self.widget.mark_dirty()
    }

    pub fn tool_tip(&self) -> Result<Option<String>> {
        self.widget
            .with_behavior(|b: &mut TabItemBehavior| b.tool_tip.clone())
    }

    pub fn set_tool_tip(&self, tip: Option<&str>) -> Result<()> {
        self.widget
            .with_behavior(|b: &mut TabItemBehavior| b.tool_tip = tip.map(str::to_owned))?;
        self.widget.mark_dirty()
    }
}
