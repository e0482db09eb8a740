use alloc::boxed::Box;
use alloc::sync::Arc;

use crate::CollectionChange;

/// A one-shot closure that delivers a notification to a snapshot of subscribers.
pub type Notification = Box<dyn FnOnce() + Send + 'static>;

/// Decides when and where a [`Notification`] runs.
///
/// The list hands each notification to its dispatcher and never waits for it. The default
/// ([`immediate_dispatcher`]) runs it synchronously on the calling thread; a dispatcher that
/// queues or sends it elsewhere makes delivery asynchronous relative to the mutation.
pub type Dispatcher = Arc<dyn Fn(Notification) + Send + Sync>;

/// A callback receiving the name of a property that may have changed.
pub type PropertyChangedHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// A callback receiving a structural change of the list.
pub type CollectionChangedHandler<T> = Arc<dyn Fn(&CollectionChange<T>) + Send + Sync>;

/// Returns a dispatcher that runs every notification immediately.
pub fn immediate_dispatcher() -> Dispatcher {
    Arc::new(|notification: Notification| notification())
}

/// Configuration for [`crate::ObservableList`].
///
/// Cheap to clone: dispatchers are stored in `Arc`s.
#[derive(Clone)]
pub struct ObservableListOptions {
    pub property_changed_dispatcher: Dispatcher,
    pub collection_changed_dispatcher: Dispatcher,
    /// Initial capacity reserved for the backing storage.
    pub capacity: usize,
}

impl ObservableListOptions {
    pub fn new() -> Self {
        Self {
            property_changed_dispatcher: immediate_dispatcher(),
            collection_changed_dispatcher: immediate_dispatcher(),
            capacity: 0,
        }
    }

    pub fn with_property_changed_dispatcher(
        mut self,
        dispatcher: impl Fn(Notification) + Send + Sync + 'static,
    ) -> Self {
        self.property_changed_dispatcher = Arc::new(dispatcher);
        self
    }

    pub fn with_collection_changed_dispatcher(
        mut self,
        dispatcher: impl Fn(Notification) + Send + Sync + 'static,
    ) -> Self {
        self.collection_changed_dispatcher = Arc::new(dispatcher);
        self
    }

    /// Uses the same dispatcher for both notification streams.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.property_changed_dispatcher = Arc::clone(&dispatcher);
        self.collection_changed_dispatcher = dispatcher;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}

impl Default for ObservableListOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ObservableListOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObservableListOptions")
            .field("property_changed_dispatcher", &"Fn(..)")
            .field("collection_changed_dispatcher", &"Fn(..)")
            .field("capacity", &self.capacity)
            .finish()
    }
}
