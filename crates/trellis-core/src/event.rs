//! Event kinds and the event record passed to listeners.

use crate::data::DataValue;
use crate::display::Display;
use crate::widget::Widget;

/// The kind of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// No event. A display filter sets this to stop further delivery.
    #[default]
    None,
    /// The terminal event, sent exactly once when a widget is disposed.
    Dispose,
    Selection,
    DefaultSelection,
    Modify,
    FocusIn,
    FocusOut,
    KeyDown,
    KeyUp,
    MouseDown,
    MouseUp,
    Show,
    Hide,
    /// A reskin was requested through the skin data keys.
    Skin,
    /// Application-defined kinds.
    Custom(u32),
}

/// An event delivered to listeners.
///
/// Dispatch fills in `kind`, `widget`, `display` and `time` (when it is
/// zero). The remaining fields carry kind-specific detail.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Milliseconds since the display was created. Zero means unset.
    pub time: u64,
    pub widget: Option<Widget>,
    pub display: Option<Display>,
    /// The item the event refers to, e.g. the selected tab.
    pub item: Option<Widget>,
    pub detail: i32,
    pub index: usize,
    pub text: Option<String>,
    /// Listeners clear this to veto the operation that raised the event.
    pub doit: bool,
    pub data: Option<DataValue>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            kind: EventKind::None,
            time: 0,
            widget: None,
            display: None,
            item: None,
            detail: 0,
            index: 0,
            text: None,
            doit: true,
            data: None,
        }
    }
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn with_item(mut self, item: Widget) -> Self {
        self.item = Some(item);
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_detail(mut self, detail: i32) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_time(mut self, time: u64) -> Self {
        self.time = time;
        self
    }

    pub fn with_data(mut self, data: DataValue) -> Self {
        self.data = Some(data);
        self
    }
}
