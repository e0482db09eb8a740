//! Dispatchers for the `observable-list` crate.
//!
//! `observable-list` runs notifications immediately unless told otherwise. This crate provides
//! small, framework-neutral dispatchers that move delivery somewhere else:
//!
//! - [`DispatchQueue`]: notifications wait in a FIFO until the owner pumps it (e.g. once per
//!   frame on a UI loop)
//! - [`channel_dispatcher`]: notifications are sent to another thread that runs them
//!
//! This crate is intentionally framework-agnostic (no bindings to any UI toolkit).
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod channel;
mod queue;

#[cfg(test)]
mod tests;

pub use channel::{NotificationReceiver, channel_dispatcher};
pub use queue::DispatchQueue;
