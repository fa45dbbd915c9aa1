//! Work handed to a display's thread from elsewhere.
//!
//! [`Display::async_exec`](crate::Display::async_exec) wraps a closure in a
//! [`Runnable`] and sends it to the owning thread, which runs it during its
//! next pump. [`Display::sync_exec`](crate::Display::sync_exec) attaches a
//! [`Completion`] so the sending thread can block until the closure ran.
//!
//! A runnable that is dropped without running (because the display was
//! disposed first) abandons its completion, which wakes the waiter instead of
//! leaving it blocked forever.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A closure queued for the owning thread.
pub struct Runnable {
    run: Box<dyn FnOnce() + Send>,
    completion: Option<Completion>,
}

impl Runnable {
    pub fn new<F>(run: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            run: Box::new(run),
            completion: None,
        }
    }

    pub fn with_completion<F>(run: F, completion: Completion) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            run: Box::new(run),
            completion: Some(completion),
        }
    }

    pub fn run(self) {
        (self.run)();
        if let Some(completion) = self.completion {
            completion.finish(Outcome::Ran);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pending,
    Ran,
    Abandoned,
}

struct CompletionState {
    outcome: Mutex<Outcome>,
    condvar: Condvar,
}

/// The signalling half of a completion pair.
pub struct Completion {
    state: Arc<CompletionState>,
}

impl Completion {
    fn finish(&self, outcome: Outcome) {
        let mut current = self.state.outcome.lock();
        if *current == Outcome::Pending {
            *current = outcome;
            self.state.condvar.notify_all();
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        self.finish(Outcome::Abandoned);
    }
}

/// The blocking half of a completion pair.
pub struct CompletionWaiter {
    state: Arc<CompletionState>,
}

impl CompletionWaiter {
    /// Block until the runnable ran or was dropped.
    ///
    /// Returns `true` if it ran. Calling this on the thread that is expected
    /// to run the runnable deadlocks.
    pub fn wait(self) -> bool {
        let mut outcome = self.state.outcome.lock();
        while *outcome == Outcome::Pending {
            self.state.condvar.wait(&mut outcome);
        }
        *outcome == Outcome::Ran
    }

    /// Like [`wait`](Self::wait), giving up after `timeout`.
    ///
    /// Returns `Some(ran)` once settled, `None` on timeout.
    pub fn wait_timeout(self, timeout: Duration) -> Option<bool> {
        let mut outcome = self.state.outcome.lock();
        if *outcome == Outcome::Pending {
            self.state.condvar.wait_for(&mut outcome, timeout);
        }
        match *outcome {
            Outcome::Pending => None,
            settled => Some(settled == Outcome::Ran),
        }
    }
}

/// Create a completion and its waiter.
pub fn completion_pair() -> (Completion, CompletionWaiter) {
    let state = Arc::new(CompletionState {
        outcome: Mutex::new(Outcome::Pending),
        condvar: Condvar::new(),
    });
    (
        Completion {
            state: state.clone(),
        },
        CompletionWaiter { state },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_run_signals_waiter() {
        let (completion, waiter) = completion_pair();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();
        let runnable = Runnable::with_completion(move || ran_clone.store(true, Ordering::SeqCst), completion);

        let handle = std::thread::spawn(move || runnable.run());
        assert!(waiter.wait());
        handle.join().unwrap();
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_dropped_runnable_wakes_waiter() {
        let (completion, waiter) = completion_pair();
        let runnable = Runnable::with_completion(|| {}, completion);
        drop(runnable);
        assert!(!waiter.wait());
    }

    #[test]
    fn test_wait_timeout_pending() {
        let (_completion, waiter) = completion_pair();
        assert_eq!(waiter.wait_timeout(Duration::from_millis(10)), None);
    }
}
