use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use observable_list::Notification;

/// A FIFO of notifications waiting to be run by whoever owns the queue.
///
/// Clones share the same queue. Typical use is a UI loop that installs
/// [`DispatchQueue::dispatcher`] on a list and calls [`DispatchQueue::run_pending`] once per
/// frame, so handlers always run on the loop's thread and never in the middle of a mutation.
#[derive(Clone, Default)]
pub struct DispatchQueue {
    pending: Arc<Mutex<VecDeque<Notification>>>,
}

impl DispatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A dispatcher that appends to this queue.
    pub fn dispatcher(&self) -> impl Fn(Notification) + Send + Sync + 'static {
        let pending = Arc::clone(&self.pending);
        move |notification: Notification| {
            let mut pending = lock(&pending);
            pending.push_back(notification);
            atrace!(pending = pending.len(), "DispatchQueue: enqueued");
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.pending).is_empty()
    }

    /// Runs the oldest pending notification, if any.
    pub fn run_one(&self) -> bool {
        // Released before running: handlers may dispatch again.
        let next = lock(&self.pending).pop_front();
        match next {
            Some(notification) => {
                notification();
                true
            }
            None => false,
        }
    }

    /// Runs every notification queued at the time of the call and returns how many ran.
    ///
    /// Notifications dispatched while these run are kept for the next call.
    pub fn run_pending(&self) -> usize {
        let batch = core::mem::take(&mut *lock(&self.pending));
        let n = batch.len();
        for notification in batch {
            notification();
        }
        atrace!(n, "DispatchQueue: ran pending");
        n
    }

    /// Drops every pending notification without running it.
    pub fn clear(&self) -> usize {
        let mut pending = lock(&self.pending);
        let n = pending.len();
        pending.clear();
        n
    }
}

impl core::fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("pending", &self.len())
            .finish()
    }
}

// A panicking handler poisons nothing we care about: the queue only holds closures.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
