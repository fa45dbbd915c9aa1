//! Error types for Trellis.

use std::thread::ThreadId;

use crate::event::EventKind;

/// A boxed error raised by a listener, a peer backend or another collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The value a listener returns. `Err` is how a listener reports failure.
pub type ListenerResult = std::result::Result<(), BoxError>;

/// The main error type for kernel operations.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// A required argument was missing, or a disposed object was passed where
    /// a live one is required.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// An index was outside the valid range of a collection.
    #[error("index {index} out of range (count is {count})")]
    InvalidRange { index: usize, count: usize },

    /// The widget has been disposed.
    #[error("widget is disposed")]
    WidgetDisposed,

    /// The operation was invoked from a thread other than the owning one.
    #[error("invalid thread access: owned by {owner:?}, called from {current:?}")]
    ThreadAffinityViolation { owner: ThreadId, current: ThreadId },

    /// A widget kind was constructed outside its sanctioned extension points.
    #[error("subclassing is not allowed for `{0}`")]
    InvalidSubclass(&'static str),

    /// The owning display has been disposed.
    #[error("display is disposed")]
    DisplayDisposed,

    /// A listener failed during dispatch.
    #[error("listener for {kind:?} failed")]
    Listener {
        kind: EventKind,
        #[source]
        source: BoxError,
    },

    /// The peer backend failed to allocate or free a peer.
    #[error("peer backend failure")]
    Peer(#[source] BoxError),
}

impl KernelError {
    /// Whether this error belongs to the invalid-argument family.
    ///
    /// Out-of-range indices are reported as [`KernelError::InvalidRange`] but
    /// are invalid arguments all the same.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_) | Self::InvalidRange { .. })
    }

    pub(crate) fn wrong_thread(owner: ThreadId) -> Self {
        Self::ThreadAffinityViolation {
            owner,
            current: std::thread::current().id(),
        }
    }
}

/// A specialized Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
