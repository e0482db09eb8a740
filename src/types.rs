use core::slice;

/// Name raised for changes of the list length.
pub const COUNT_PROPERTY: &str = "Count";

/// Name raised for changes of the indexed contents.
pub const INDEXER_PROPERTY: &str = "Item[]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeKind {
    Add,
    Remove,
    Replace,
    Move,
    Reset,
}

/// A single structural change of an [`crate::ObservableList`].
///
/// Indexes are the positions at the time the change was made.
///
/// With `feature = "serde"`, this type implements `Serialize`/`Deserialize`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CollectionChange<T> {
    Add {
        index: usize,
        item: T,
    },
    Remove {
        index: usize,
        item: T,
    },
    Replace {
        index: usize,
        old_item: T,
        new_item: T,
    },
    Move {
        old_index: usize,
        new_index: usize,
        item: T,
    },
    /// The whole list should be treated as replaced; re-read everything.
    Reset,
}

impl<T> CollectionChange<T> {
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Add { .. } => ChangeKind::Add,
            Self::Remove { .. } => ChangeKind::Remove,
            Self::Replace { .. } => ChangeKind::Replace,
            Self::Move { .. } => ChangeKind::Move,
            Self::Reset => ChangeKind::Reset,
        }
    }

    /// Position the new items occupy after the change.
    pub fn new_index(&self) -> Option<usize> {
        match self {
            Self::Add { index, .. } | Self::Replace { index, .. } => Some(*index),
            Self::Move { new_index, .. } => Some(*new_index),
            Self::Remove { .. } | Self::Reset => None,
        }
    }

    /// Position the old items occupied before the change.
    pub fn old_index(&self) -> Option<usize> {
        match self {
            Self::Remove { index, .. } | Self::Replace { index, .. } => Some(*index),
            Self::Move { old_index, .. } => Some(*old_index),
            Self::Add { .. } | Self::Reset => None,
        }
    }

    pub fn new_items(&self) -> &[T] {
        match self {
            Self::Add { item, .. } | Self::Move { item, .. } => slice::from_ref(item),
            Self::Replace { new_item, .. } => slice::from_ref(new_item),
            Self::Remove { .. } | Self::Reset => &[],
        }
    }

    pub fn old_items(&self) -> &[T] {
        match self {
            Self::Remove { item, .. } | Self::Move { item, .. } => slice::from_ref(item),
            Self::Replace { old_item, .. } => slice::from_ref(old_item),
            Self::Add { .. } | Self::Reset => &[],
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> CollectionChange<U> {
        match self {
            Self::Add { index, item } => CollectionChange::Add {
                index,
                item: f(item),
            },
            Self::Remove { index, item } => CollectionChange::Remove {
                index,
                item: f(item),
            },
            Self::Replace {
                index,
                old_item,
                new_item,
            } => CollectionChange::Replace {
                index,
                old_item: f(old_item),
                new_item: f(new_item),
            },
            Self::Move {
                old_index,
                new_index,
                item,
            } => CollectionChange::Move {
                old_index,
                new_index,
                item: f(item),
            },
            Self::Reset => CollectionChange::Reset,
        }
    }
}
