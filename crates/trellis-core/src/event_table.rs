//! Per-widget map from event kind to ordered listener registrations.

use std::collections::HashMap;

use crate::event::EventKind;
use crate::listener::ListenerEntry;

/// Ordered listener registrations keyed by event kind.
///
/// Registration order within a kind is the fan-out order. The same listener
/// may be hooked more than once; each registration fires.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    entries: HashMap<EventKind, Vec<ListenerEntry>>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration for `kind`.
    pub fn hook(&mut self, kind: EventKind, entry: ListenerEntry) {
        self.entries.entry(kind).or_default().push(entry);
    }

    /// Remove the first registration for `kind` equal to `entry`.
    ///
    /// Returns whether a registration was removed.
    pub fn unhook(&mut self, kind: EventKind, entry: &ListenerEntry) -> bool {
        let Some(list) = self.entries.get_mut(&kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|e| e == entry) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            self.entries.remove(&kind);
        }
        true
    }

    /// Remove every registration equal to `entry`, across all kinds.
    ///
    /// Returns the number of registrations removed.
    pub fn unhook_all(&mut self, entry: &ListenerEntry) -> usize {
        let mut removed = 0;
        self.entries.retain(|_, list| {
            let before = list.len();
            list.retain(|e| e != entry);
            removed += before - list.len();
            !list.is_empty()
        });
        removed
    }

    /// Whether any registration exists for `kind`.
    pub fn hooks(&self, kind: EventKind) -> bool {
        self.entries.get(&kind).is_some_and(|list| !list.is_empty())
    }

    /// A copy of the registrations for `kind`, in fan-out order.
    pub fn snapshot(&self, kind: EventKind) -> Vec<ListenerEntry> {
        self.entries.get(&kind).cloned().unwrap_or_default()
    }

    /// Total number of registrations.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ListenerResult;
    use crate::event::Event;
    use crate::listener::{Listener, SelectionListener, TypedListener};

    struct Noop;

    impl SelectionListener for Noop {
        fn widget_selected(&self, _event: &mut Event) -> ListenerResult {
            Ok(())
        }
    }

    fn raw() -> ListenerEntry {
        ListenerEntry::Raw(Listener::new(|_| Ok(())))
    }

    #[test]
    fn test_hook_preserves_order() {
        let mut table = EventTable::new();
        let (a, b, c) = (raw(), raw(), raw());
        table.hook(EventKind::Selection, a.clone());
        table.hook(EventKind::Selection, b.clone());
        table.hook(EventKind::Selection, c.clone());

        assert_eq!(table.snapshot(EventKind::Selection), vec![a, b, c]);
        assert!(table.hooks(EventKind::Selection));
        assert!(!table.hooks(EventKind::Modify));
    }

    #[test]
    fn test_unhook_removes_first_match_only() {
        let mut table = EventTable::new();
        let a = raw();
        let b = raw();
        table.hook(EventKind::Selection, a.clone());
        table.hook(EventKind::Selection, b.clone());
        table.hook(EventKind::Selection, a.clone());

        assert!(table.unhook(EventKind::Selection, &a));
        assert_eq!(table.snapshot(EventKind::Selection), vec![b, a]);
    }

    #[test]
    fn test_unhook_unregistered_is_noop() {
        let mut table = EventTable::new();
        table.hook(EventKind::Selection, raw());
        assert!(!table.unhook(EventKind::Selection, &raw()));
        assert!(!table.unhook(EventKind::Modify, &raw()));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_unhook_all_removes_typed_from_every_kind() {
        let mut table = EventTable::new();
        let typed = ListenerEntry::Typed(TypedListener::selection(Noop));
        table.hook(EventKind::Selection, typed.clone());
        table.hook(EventKind::DefaultSelection, typed.clone());
        table.hook(EventKind::Selection, raw());

        assert_eq!(table.unhook_all(&typed), 2);
        assert!(!table.hooks(EventKind::DefaultSelection));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut table = EventTable::new();
        table.hook(EventKind::Show, raw());
        let snapshot = table.snapshot(EventKind::Show);
        table.hook(EventKind::Show, raw());
        assert_eq!(snapshot.len(), 1);
        assert_eq!(table.snapshot(EventKind::Show).len(), 2);
    }
}
