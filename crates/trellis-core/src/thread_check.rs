//! Thread affinity checks.
//!
//! Every [`Display`](crate::Display) is bound to the thread that created it,
//! and every widget shares its display's binding. Public operations compare
//! the calling thread against that binding before touching any state; a
//! mismatch is reported as [`KernelError::ThreadAffinityViolation`] rather
//! than a panic so that callers can route the work through
//! [`Display::async_exec`](crate::Display::async_exec) instead.
//!
//! ```
//! use trellis_core::thread_check::ThreadAffinity;
//!
//! let affinity = ThreadAffinity::current();
//! assert!(affinity.check().is_ok());
//!
//! std::thread::spawn(move || {
//!     assert!(affinity.check().is_err());
//! })
//! .join()
//! .unwrap();
//! ```

use std::thread::ThreadId;

use crate::error::{KernelError, Result};
use crate::logging::targets;

/// Records the thread an object was created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadAffinity {
    thread_id: ThreadId,
}

impl Default for ThreadAffinity {
    fn default() -> Self {
        Self::current()
    }
}

impl ThreadAffinity {
    /// Bind to the current thread.
    #[inline]
    pub fn current() -> Self {
        Self {
            thread_id: std::thread::current().id(),
        }
    }

    /// The bound thread.
    #[inline]
    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// Whether the current thread is the bound thread.
    #[inline]
    pub fn is_same_thread(&self) -> bool {
        std::thread::current().id() == self.thread_id
    }

    /// Fail with [`KernelError::ThreadAffinityViolation`] off the bound thread.
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_same_thread() {
            Ok(())
        } else {
            Err(self.violation())
        }
    }

    #[cold]
    #[inline(never)]
    fn violation(&self) -> KernelError {
        let current = std::thread::current();
        tracing::error!(
            target: targets::WIDGET,
            owner = ?self.thread_id,
            current = ?current.id(),
            current_name = current.name().unwrap_or("<unnamed>"),
            "widget accessed from wrong thread"
        );
        KernelError::wrong_thread(self.thread_id)
    }
}
