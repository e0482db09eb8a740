use alloc::sync::Arc;

#[cfg(feature = "std")]
use alloc::vec::Vec;
#[cfg(feature = "std")]
use std::sync::{Mutex, MutexGuard, PoisonError};
#[cfg(feature = "std")]
use std::thread::{self, ThreadId};

#[cfg(not(feature = "std"))]
use core::sync::atomic::{AtomicUsize, Ordering};

/// Tracks which threads are currently running collection-changed handlers of one list.
///
/// Shared between the list and the notifications it dispatches, so delivery that happens later
/// still blocks mutation from inside the handlers. Only the delivering thread is blocked: a
/// writer on another thread keeps mutating while a dispatcher delivers elsewhere.
///
/// Without `std` there is no thread identity, and any delivery in progress blocks every mutation.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReentrancyMonitor {
    #[cfg(feature = "std")]
    delivering: Arc<Mutex<Vec<ThreadId>>>,
    #[cfg(not(feature = "std"))]
    busy: Arc<AtomicUsize>,
}

impl ReentrancyMonitor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Marks delivery in progress on the current thread until the returned guard is dropped.
    pub(crate) fn enter(&self) -> MonitorGuard {
        #[cfg(feature = "std")]
        lock(&self.delivering).push(thread::current().id());
        #[cfg(not(feature = "std"))]
        self.busy.fetch_add(1, Ordering::AcqRel);

        MonitorGuard {
            monitor: self.clone(),
        }
    }

    #[cfg(feature = "std")]
    pub(crate) fn is_busy(&self) -> bool {
        let current = thread::current().id();
        lock(&self.delivering).contains(&current)
    }

    #[cfg(not(feature = "std"))]
    pub(crate) fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire) > 0
    }

    #[cfg(feature = "std")]
    fn leave(&self) {
        let current = thread::current().id();
        let mut delivering = lock(&self.delivering);
        let pos = delivering.iter().rposition(|id| *id == current);
        debug_assert!(pos.is_some(), "reentrancy monitor underflow");
        if let Some(pos) = pos {
            delivering.swap_remove(pos);
        }
    }

    #[cfg(not(feature = "std"))]
    fn leave(&self) {
        let prev = self.busy.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(prev > 0, "reentrancy monitor underflow");
    }
}

pub(crate) struct MonitorGuard {
    monitor: ReentrancyMonitor,
}

impl Drop for MonitorGuard {
    fn drop(&mut self) {
        self.monitor.leave();
    }
}

// Handlers may panic while the guard is held; the thread list stays consistent regardless.
#[cfg(feature = "std")]
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
