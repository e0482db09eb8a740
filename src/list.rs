use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::ops::{Deref, DerefMut, Index};

use crate::handlers::Handlers;
use crate::monitor::ReentrancyMonitor;
use crate::{
    COUNT_PROPERTY, CollectionChange, Dispatcher, Error, INDEXER_PROPERTY, Notification,
    ObservableListOptions, Result, SubscriptionId,
};

/// An ordered, index-addressable list that notifies subscribers of its changes.
///
/// Two independent notification streams are exposed:
/// - collection-changed: one [`CollectionChange`] per structural change
/// - property-changed: the names `Count` and `Item[]` whenever those may have changed
///
/// Every notification is handed to the stream's [`Dispatcher`]. By default it runs immediately;
/// see [`ObservableListOptions`] to marshal delivery elsewhere.
///
/// Mutation requires `&mut self`; the list does no locking of its own.
pub struct ObservableList<T> {
    items: Vec<T>,
    is_notifying: bool,

    property_changed_dispatcher: Dispatcher,
    collection_changed_dispatcher: Dispatcher,

    property_handlers: Handlers<dyn Fn(&str) + Send + Sync>,
    collection_handlers: Handlers<dyn Fn(&CollectionChange<T>) + Send + Sync>,

    monitor: ReentrancyMonitor,
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        Self::with_options(ObservableListOptions::default())
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_options(ObservableListOptions::default().with_capacity(capacity))
    }

    pub fn with_options(options: ObservableListOptions) -> Self {
        Self::from_parts(Vec::with_capacity(options.capacity), options)
    }

    /// Creates a list that takes ownership of `items`. No notification is raised.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self::from_parts(items, ObservableListOptions::default())
    }

    fn from_parts(items: Vec<T>, options: ObservableListOptions) -> Self {
        odebug!(len = items.len(), "ObservableList::new");
        Self {
            items,
            is_notifying: true,
            property_changed_dispatcher: options.property_changed_dispatcher,
            collection_changed_dispatcher: options.collection_changed_dispatcher,
            property_handlers: Handlers::new(),
            collection_handlers: Handlers::new(),
            monitor: ReentrancyMonitor::new(),
        }
    }

    /// Returns the current dispatchers. `capacity` reports the current capacity.
    pub fn options(&self) -> ObservableListOptions {
        ObservableListOptions {
            property_changed_dispatcher: Arc::clone(&self.property_changed_dispatcher),
            collection_changed_dispatcher: Arc::clone(&self.collection_changed_dispatcher),
            capacity: self.items.capacity(),
        }
    }

    /// Replaces both dispatchers and reserves `options.capacity`.
    pub fn set_options(&mut self, options: ObservableListOptions) {
        self.items
            .reserve(options.capacity.saturating_sub(self.items.len()));
        self.property_changed_dispatcher = options.property_changed_dispatcher;
        self.collection_changed_dispatcher = options.collection_changed_dispatcher;
        odebug!("ObservableList::set_options");
    }

    /// Takes effect from the next raised property-changed notification.
    pub fn set_property_changed_dispatcher(
        &mut self,
        dispatcher: impl Fn(Notification) + Send + Sync + 'static,
    ) {
        self.property_changed_dispatcher = Arc::new(dispatcher);
        odebug!("set_property_changed_dispatcher");
    }

    /// Takes effect from the next raised collection-changed notification.
    pub fn set_collection_changed_dispatcher(
        &mut self,
        dispatcher: impl Fn(Notification) + Send + Sync + 'static,
    ) {
        self.collection_changed_dispatcher = Arc::new(dispatcher);
        odebug!("set_collection_changed_dispatcher");
    }

    pub fn subscribe_property_changed(
        &mut self,
        handler: impl Fn(&str) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.property_handlers.insert(Arc::new(handler));
        otrace!(
            id = id.as_u64(),
            subscribers = self.property_handlers.len(),
            "subscribe_property_changed"
        );
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe_property_changed(&mut self, id: SubscriptionId) -> bool {
        let removed = self.property_handlers.remove(id);
        otrace!(id = id.as_u64(), removed, "unsubscribe_property_changed");
        removed
    }

    pub fn subscribe_collection_changed(
        &mut self,
        handler: impl Fn(&CollectionChange<T>) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.collection_handlers.insert(Arc::new(handler));
        otrace!(
            id = id.as_u64(),
            subscribers = self.collection_handlers.len(),
            "subscribe_collection_changed"
        );
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe_collection_changed(&mut self, id: SubscriptionId) -> bool {
        let removed = self.collection_handlers.remove(id);
        otrace!(id = id.as_u64(), removed, "unsubscribe_collection_changed");
        removed
    }

    pub fn property_changed_subscriber_count(&self) -> usize {
        self.property_handlers.len()
    }

    pub fn collection_changed_subscriber_count(&self) -> usize {
        self.collection_handlers.len()
    }

    /// `false` only while a bulk operation is running.
    pub fn is_notifying(&self) -> bool {
        self.is_notifying
    }

    /// The `Count` property.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn index_of(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|x| x == item)
    }

    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.items.contains(item)
    }

    fn check_reentrancy(&self) -> Result<()> {
        if self.monitor.is_busy() {
            otrace!("rejecting reentrant mutation");
            return Err(Error::ReentrantMutation);
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.items.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    /// Turns notifications off until the returned guard is dropped, then restores the previous
    /// state. Restoring happens on every exit path, including unwinding.
    fn suppress_notifications(&mut self) -> Suppressed<'_, T> {
        let prior = core::mem::replace(&mut self.is_notifying, false);
        Suppressed { list: self, prior }
    }

    fn on_property_changed(&self, property_name: &'static str) {
        if !self.is_notifying || self.property_handlers.is_empty() {
            otrace!(property_name, "property-changed notification dropped");
            return;
        }

        let handlers = self.property_handlers.snapshot();
        (self.property_changed_dispatcher)(Box::new(move || {
            for handler in &handlers {
                handler(property_name);
            }
        }));
    }

    /// Raises `Count`, `Item[]` and a `Reset`.
    fn raise_reset(&self)
    where
        T: Send + 'static,
    {
        self.on_property_changed(COUNT_PROPERTY);
        self.on_property_changed(INDEXER_PROPERTY);
        self.on_collection_changed(|| CollectionChange::Reset);
    }

    /// `change` is only built once the notification is known to reach someone, so suppressed or
    /// unobserved mutations never clone items.
    fn on_collection_changed(&self, change: impl FnOnce() -> CollectionChange<T>)
    where
        T: Send + 'static,
    {
        if !self.is_notifying || self.collection_handlers.is_empty() {
            otrace!("collection-changed notification dropped");
            return;
        }

        let change = change();
        let handlers = self.collection_handlers.snapshot();
        let monitor = self.monitor.clone();
        (self.collection_changed_dispatcher)(Box::new(move || {
            let _delivering = monitor.enter();
            for handler in &handlers {
                handler(&change);
            }
        }));
    }
}

impl<T: Clone + Send + 'static> ObservableList<T> {
    /// Inserts `item` at `index`, shifting later items back.
    ///
    /// Raises `Add`, then `Count` and `Item[]`.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        self.check_reentrancy()?;
        let len = self.items.len();
        if index > len {
            return Err(Error::IndexOutOfRange { index, len });
        }

        self.items.insert(index, item);
        self.on_collection_changed(|| CollectionChange::Add {
            index,
            item: self.items[index].clone(),
        });
        self.on_property_changed(COUNT_PROPERTY);
        self.on_property_changed(INDEXER_PROPERTY);
        Ok(())
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        self.insert(self.items.len(), item)
    }

    /// Removes and returns the item at `index`.
    ///
    /// Raises `Remove`, then `Count` and `Item[]`.
    pub fn remove_at(&mut self, index: usize) -> Result<T> {
        self.check_reentrancy()?;
        self.check_index(index)?;

        let item = self.items.remove(index);
        self.on_collection_changed(|| CollectionChange::Remove {
            index,
            item: item.clone(),
        });
        self.on_property_changed(COUNT_PROPERTY);
        self.on_property_changed(INDEXER_PROPERTY);
        Ok(item)
    }

    /// Removes the first item equal to `item`. Returns `Ok(false)` without notifying if there is
    /// none.
    pub fn remove(&mut self, item: &T) -> Result<bool>
    where
        T: PartialEq,
    {
        self.check_reentrancy()?;
        match self.index_of(item) {
            Some(index) => self.remove_at(index).map(|_| true),
            None => Ok(false),
        }
    }

    /// Replaces the item at `index` and returns the previous one.
    ///
    /// Raises `Replace`, then `Item[]`.
    pub fn set(&mut self, index: usize, item: T) -> Result<T> {
        self.check_reentrancy()?;
        self.check_index(index)?;

        let old_item = core::mem::replace(&mut self.items[index], item);
        self.on_collection_changed(|| CollectionChange::Replace {
            index,
            old_item: old_item.clone(),
            new_item: self.items[index].clone(),
        });
        self.on_property_changed(INDEXER_PROPERTY);
        Ok(old_item)
    }

    /// Moves the item at `old_index` so that it ends up at `new_index`.
    ///
    /// Raises `Move`, then `Item[]`.
    pub fn move_item(&mut self, old_index: usize, new_index: usize) -> Result<()> {
        self.check_reentrancy()?;
        self.check_index(old_index)?;
        self.check_index(new_index)?;

        let item = self.items.remove(old_index);
        self.items.insert(new_index, item);
        self.on_collection_changed(|| CollectionChange::Move {
            old_index,
            new_index,
            item: self.items[new_index].clone(),
        });
        self.on_property_changed(INDEXER_PROPERTY);
        Ok(())
    }

    /// Removes every item.
    ///
    /// Raises `Reset`, then `Count` and `Item[]`, even if the list was already empty.
    pub fn clear(&mut self) -> Result<()> {
        self.check_reentrancy()?;

        self.items.clear();
        self.on_collection_changed(|| CollectionChange::Reset);
        self.on_property_changed(COUNT_PROPERTY);
        self.on_property_changed(INDEXER_PROPERTY);
        Ok(())
    }

    /// Runs `f` with all notifications suppressed, then raises `Count`, `Item[]` and a single
    /// `Reset`.
    ///
    /// Notifications raised inside `f` are dropped, not deferred. If `f` fails, the error is
    /// returned and nothing is raised; the previous notification state is restored either way.
    /// Nested batches collapse into the outermost one.
    pub fn batch_update<R>(&mut self, f: impl FnOnce(&mut Self) -> Result<R>) -> Result<R> {
        self.check_reentrancy()?;

        let out = {
            let mut list = self.suppress_notifications();
            f(&mut *list)?
        };

        self.raise_reset();
        Ok(out)
    }

    /// Appends every item, raising one `Reset` instead of one `Add` per item.
    ///
    /// The trailing notifications are raised even when `items` is empty.
    pub fn add_range<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<()> {
        self.batch_update(|list| {
            for item in items {
                list.push(item)?;
            }
            Ok(())
        })?;
        odebug!(len = self.items.len(), "add_range");
        Ok(())
    }

    /// Removes the first occurrence of every item, raising one `Reset` instead of one `Remove`
    /// per item. Items not in the list are skipped.
    ///
    /// The trailing notifications are raised even when nothing was removed.
    pub fn remove_range<I>(&mut self, items: I) -> Result<()>
    where
        T: PartialEq,
        I: IntoIterator,
        I::Item: Borrow<T>,
    {
        self.batch_update(|list| {
            for item in items {
                if let Some(index) = list.index_of(Borrow::<T>::borrow(&item)) {
                    list.remove_at(index)?;
                }
            }
            Ok(())
        })?;
        odebug!(len = self.items.len(), "remove_range");
        Ok(())
    }

    /// Tells every subscriber to re-read the whole list: raises `Count`, `Item[]` and `Reset`
    /// without changing anything.
    pub fn refresh(&self) {
        self.raise_reset();
    }
}

/// Restores the notification state of a list when dropped.
struct Suppressed<'a, T> {
    list: &'a mut ObservableList<T>,
    prior: bool,
}

impl<T> Deref for Suppressed<'_, T> {
    type Target = ObservableList<T>;

    fn deref(&self) -> &Self::Target {
        self.list
    }
}

impl<T> DerefMut for Suppressed<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.list
    }
}

impl<T> Drop for Suppressed<'_, T> {
    fn drop(&mut self) {
        self.list.is_notifying = self.prior;
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        Self::from_vec(items)
    }
}

impl<T> FromIterator<T> for ObservableList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for ObservableList<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<'a, T> IntoIterator for &'a ObservableList<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &self.items)
            .field("is_notifying", &self.is_notifying)
            .field("property_changed_subscribers", &self.property_handlers.len())
            .field("collection_changed_subscribers", &self.collection_handlers.len())
            .finish()
    }
}
