//! Per-widget application data.
//!
//! Most widgets carry at most one unnamed value, so the slot starts in a
//! bare representation and only grows a keyed list once a named property
//! is set. Clearing the last named property returns it to the bare form.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque application value.
pub type DataValue = Arc<dyn Any + Send + Sync>;

/// Wrap a value as a [`DataValue`].
pub fn data_value<T: Any + Send + Sync>(value: T) -> DataValue {
    Arc::new(value)
}

/// Reserved keys that `set_data_for` intercepts instead of storing.
pub mod keys {
    /// A `bool` toggling the check-subwindow feature flag.
    pub const CHECK_SUBWINDOW: &str = "trellis.check_subwindow";
    /// Read-only. Reads as a `bool`: whether the widget is active.
    pub const IS_ACTIVE: &str = "trellis.is_active";
    /// Skin class. Stored normally; setting it requests a reskin.
    pub const SKIN_CLASS: &str = "trellis.skin_class";
    /// Skin id. Stored normally; setting it requests a reskin.
    pub const SKIN_ID: &str = "trellis.skin_id";
}

/// Bare or keyed data storage.
#[derive(Clone)]
pub enum DataSlot {
    /// A single unnamed value.
    Bare(Option<DataValue>),
    /// The unnamed value plus named properties in insertion order.
    Keyed {
        value: Option<DataValue>,
        entries: Vec<(String, DataValue)>,
    },
}

impl Default for DataSlot {
    fn default() -> Self {
        Self::Bare(None)
    }
}

impl DataSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// The unnamed value, whatever the representation.
    pub fn get(&self) -> Option<DataValue> {
        match self {
            Self::Bare(value) | Self::Keyed { value, .. } => value.clone(),
        }
    }

    pub fn set(&mut self, new: Option<DataValue>) {
        match self {
            Self::Bare(value) | Self::Keyed { value, .. } => *value = new,
        }
    }

    pub fn get_keyed(&self, key: &str) -> Option<DataValue> {
        match self {
            Self::Bare(_) => None,
            Self::Keyed { entries, .. } => entries
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone()),
        }
    }

    /// Set or, with `None`, remove a named property.
    pub fn set_keyed(&mut self, key: &str, new: Option<DataValue>) {
        match (std::mem::take(self), new) {
            (Self::Bare(value), Some(v)) => {
                *self = Self::Keyed {
                    value,
                    entries: vec![(key.to_owned(), v)],
                };
            }
            (bare @ Self::Bare(_), None) => *self = bare,
            (Self::Keyed { value, mut entries }, new) => {
                let pos = entries.iter().position(|(k, _)| k == key);
                match (pos, new) {
                    (Some(i), Some(v)) => entries[i].1 = v,
                    (None, Some(v)) => entries.push((key.to_owned(), v)),
                    (Some(i), None) => {
                        entries.remove(i);
                    }
                    (None, None) => {}
                }
                *self = if entries.is_empty() {
                    Self::Bare(value)
                } else {
                    Self::Keyed { value, entries }
                };
            }
        }
    }

    pub fn is_keyed(&self) -> bool {
        matches!(self, Self::Keyed { .. })
    }

    /// Whether the slot holds nothing at all.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Bare(None))
    }

    /// Named property keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let entries: &[(String, DataValue)] = match self {
            Self::Bare(_) => &[],
            Self::Keyed { entries, .. } => entries,
        };
        entries.iter().map(|(k, _)| k.as_str())
    }
}

impl fmt::Debug for DataSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bare(value) => f.debug_tuple("Bare").field(&value.is_some()).finish(),
            Self::Keyed { value, .. } => f
                .debug_struct("Keyed")
                .field("value", &value.is_some())
                .field("keys", &self.keys().collect::<Vec<_>>())
                .finish(),
        }
    }
}
