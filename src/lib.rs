//! An ordered list that reports its own changes.
//!
//! [`ObservableList`] behaves like a `Vec` with index-based mutation, but every structural change
//! is reported to subscribers as a [`CollectionChange`], and every change to the derived `Count`
//! and `Item[]` properties is reported as a property-changed notification.
//!
//! It is UI-agnostic. A binding layer is expected to provide:
//! - subscribers that react to collection/property notifications
//! - optionally, a [`Dispatcher`] that marshals notifications onto its own execution context
//!
//! Bulk edits (`add_range`, `remove_range`, `batch_update`) suppress per-item notifications and
//! raise a single `Reset` instead.
//!
//! For framework-neutral dispatchers (queues, cross-thread channels), see the
//! `observable-list-adapter` crate.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod error;
mod handlers;
mod list;
mod monitor;
mod options;
mod types;


pub use error::{Error, Result};
pub use handlers::SubscriptionId;
pub use list::ObservableList;
pub use options::{
    CollectionChangedHandler, Dispatcher, Notification, ObservableListOptions,
    PropertyChangedHandler, immediate_dispatcher,
};
pub use types::{COUNT_PROPERTY, ChangeKind, CollectionChange, INDEXER_PROPERTY};
