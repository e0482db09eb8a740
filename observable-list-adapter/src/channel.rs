use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use observable_list::Notification;

/// Creates a dispatcher that sends notifications to a [`NotificationReceiver`].
///
/// The receiver usually lives on another thread (e.g. a UI thread) that runs what it receives.
/// Notifications sent after the receiver is dropped are discarded.
pub fn channel_dispatcher() -> (
    impl Fn(Notification) + Send + Sync + 'static,
    NotificationReceiver,
) {
    let (tx, rx) = mpsc::channel::<Notification>();
    let dispatcher = move |notification: Notification| {
        if tx.send(notification).is_err() {
            awarn!("channel_dispatcher: receiver dropped, notification discarded");
        }
    };
    (dispatcher, NotificationReceiver { rx })
}

/// Runs notifications sent by a [`channel_dispatcher`].
#[derive(Debug)]
pub struct NotificationReceiver {
    rx: Receiver<Notification>,
}

impl NotificationReceiver {
    /// Runs every notification already received, without blocking.
    pub fn run_pending(&self) -> usize {
        let mut n = 0usize;
        while let Ok(notification) = self.rx.try_recv() {
            notification();
            n += 1;
        }
        n
    }

    /// Waits up to `timeout` for one notification and runs it.
    ///
    /// Returns `false` on timeout or once every dispatcher has been dropped.
    pub fn run_one_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(notification) => {
                notification();
                true
            }
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Runs notifications until every dispatcher has been dropped. Returns how many ran.
    pub fn run_blocking(&self) -> usize {
        let mut n = 0usize;
        for notification in self.rx.iter() {
            notification();
            n += 1;
        }
        atrace!(n, "NotificationReceiver: all dispatchers dropped");
        n
    }
}
