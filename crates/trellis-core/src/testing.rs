//! Minimal behaviors for unit tests.

use crate::behavior::{ContainmentOwner, WidgetBehavior};
use crate::error::Result;
use crate::kind::WidgetKind;
use crate::style::Style;
use crate::widget::Widget;

/// Route kernel logs to the test harness. Safe to call from every test.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// A leaf widget with a peer.
pub(crate) struct Leaf;

impl ContainmentOwner for Leaf {}

impl WidgetBehavior for Leaf {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Label
    }
}

/// A container that accepts children and any number of secondaries.
#[derive(Default)]
pub(crate) struct Container {
    owned: Vec<Widget>,
}

impl ContainmentOwner for Container {
    fn check_adopt(&self, _kind: WidgetKind, _style: Style) -> Result<()> {
        Ok(())
    }

    fn adopt(&mut self, secondary: Widget) {
        self.owned.push(secondary);
    }

    fn owned(&self) -> Vec<Widget> {
        self.owned.clone()
    }

    fn detach(&mut self, widget: &Widget) -> bool {
        let before = self.owned.len();
        self.owned.retain(|w| w != widget);
        before != self.owned.len()
    }

    fn release_owned(&mut self) -> Vec<Widget> {
        std::mem::take(&mut self.owned)
    }
}

impl WidgetBehavior for Container {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Composite
    }

    fn accepts_children(&self) -> bool {
        true
    }
}
