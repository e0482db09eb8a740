use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use alloc::vec::Vec;

/// Identifies one subscription to an [`crate::ObservableList`] notification stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Subscribers of one notification stream, kept in subscription order.
pub(crate) struct Handlers<F: ?Sized> {
    next_id: u64,
    entries: BTreeMap<SubscriptionId, Arc<F>>,
}

impl<F: ?Sized> Handlers<F> {
    pub(crate) fn new() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, handler: Arc<F>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.insert(id, handler);
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handlers subscribed right now. Later (un)subscriptions do not affect the snapshot.
    pub(crate) fn snapshot(&self) -> Vec<Arc<F>> {
        self.entries.values().cloned().collect()
    }
}
