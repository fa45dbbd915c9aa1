//! Inbound events from an external renderer or platform bridge.
//!
//! A bridge holds an [`InboundSender`] obtained from
//! [`Display::inbound`](crate::Display::inbound) and delivers raw events
//! addressed to a widget id. The display converts each one into a queued
//! kernel event during its next pump. Events for ids that are unknown or
//! already disposed are dropped there.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::Sender;

use crate::error::{KernelError, Result};
use crate::event::{Event, EventKind};
use crate::widget::WidgetId;

/// A raw event addressed to a widget by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub target: WidgetId,
    pub kind: EventKind,
    pub detail: i32,
    pub index: usize,
    pub text: Option<String>,
}

impl InboundEvent {
    pub fn new(target: WidgetId, kind: EventKind) -> Self {
        Self {
            target,
            kind,
            detail: 0,
            index: 0,
            text: None,
        }
    }

    pub fn with_detail(mut self, detail: i32) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub(crate) fn into_event(self) -> Event {
        let mut event = Event::new(self.kind)
            .with_detail(self.detail)
            .with_index(self.index);
        event.text = self.text;
        event
    }
}

/// The sending side of a display's inbound channel. Cheap to clone and
/// usable from any thread.
#[derive(Debug, Clone)]
pub struct InboundSender {
    tx: Sender<InboundEvent>,
    closed: Arc<AtomicBool>,
}

impl InboundSender {
    pub(crate) fn new(tx: Sender<InboundEvent>, closed: Arc<AtomicBool>) -> Self {
        Self { tx, closed }
    }

    /// Queue `event` for the display.
    ///
    /// Fails with [`KernelError::DisplayDisposed`] once the display is gone.
    pub fn deliver(&self, event: InboundEvent) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(KernelError::DisplayDisposed);
        }
        self.tx.send(event).map_err(|_| KernelError::DisplayDisposed)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
