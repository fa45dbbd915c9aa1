//! Backing peers.
//!
//! A peer is the platform or bridge resource behind a widget. The kernel
//! never looks inside one: it asks the display's [`PeerBackend`] for a
//! handle during construction and hands the handle back during release.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::error::{BoxError, KernelError, Result};
use crate::kind::WidgetKind;
use crate::style::Style;
use crate::widget::WidgetId;

/// An opaque handle to a backing peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PeerHandle(u64);

impl PeerHandle {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Allocates and frees backing peers.
pub trait PeerBackend: Send + Sync {
    fn create_peer(
        &self,
        id: WidgetId,
        kind: WidgetKind,
        style: Style,
    ) -> std::result::Result<PeerHandle, BoxError>;

    fn destroy_peer(&self, id: WidgetId, handle: PeerHandle) -> std::result::Result<(), BoxError>;
}

/// What a peer hook gets to work with.
pub struct PeerContext<'a> {
    pub id: WidgetId,
    pub kind: WidgetKind,
    pub style: Style,
    backend: &'a dyn PeerBackend,
}

impl<'a> PeerContext<'a> {
    pub(crate) fn new(
        id: WidgetId,
        kind: WidgetKind,
        style: Style,
        backend: &'a dyn PeerBackend,
    ) -> Self {
        Self {
            id,
            kind,
            style,
            backend,
        }
    }

    /// Allocate a peer from the display's backend.
    pub fn allocate(&self) -> Result<PeerHandle> {
        self.backend
            .create_peer(self.id, self.kind, self.style)
            .map_err(KernelError::Peer)
    }

    /// Free a peer through the display's backend.
    pub fn free(&self, handle: PeerHandle) -> Result<()> {
        self.backend
            .destroy_peer(self.id, handle)
            .map_err(KernelError::Peer)
    }
}

/// A backend that hands out numbered handles and tracks which are live.
#[derive(Debug)]
pub struct InMemoryBackend {
    next: AtomicU64,
    live: Mutex<HashSet<PeerHandle>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self {
            next: AtomicU64::new(1),
            live: Mutex::new(HashSet::new()),
        }
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().len()
    }

    pub fn is_live(&self, handle: PeerHandle) -> bool {
        self.live.lock().contains(&handle)
    }
}

impl PeerBackend for InMemoryBackend {
    fn create_peer(
        &self,
        _id: WidgetId,
        _kind: WidgetKind,
        _style: Style,
    ) -> std::result::Result<PeerHandle, BoxError> {
        let handle = PeerHandle(self.next.fetch_add(1, Ordering::Relaxed));
        self.live.lock().insert(handle);
        Ok(handle)
    }

    fn destroy_peer(&self, _id: WidgetId, handle: PeerHandle) -> std::result::Result<(), BoxError> {
        if self.live.lock().remove(&handle) {
            Ok(())
        } else {
            Err(format!("unknown peer handle {}", handle.0).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::KeyData;

    fn id() -> WidgetId {
        WidgetId::from(KeyData::from_ffi(1))
    }

    #[test]
    fn test_in_memory_tracks_live_handles() {
        let backend = InMemoryBackend::new();
        let a = backend.create_peer(id(), WidgetKind::Button, Style::PUSH).unwrap();
        let b = backend.create_peer(id(), WidgetKind::Label, Style::NONE).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.live_count(), 2);

        backend.destroy_peer(id(), a).unwrap();
        assert!(!backend.is_live(a));
        assert!(backend.destroy_peer(id(), a).is_err());
        assert_eq!(backend.live_count(), 1);
    }
}
