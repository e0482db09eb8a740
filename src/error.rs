use thiserror::Error;

/// Errors returned by the mutating operations of [`crate::ObservableList`].
///
/// A failed operation leaves the list unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("index {index} is out of range for a list of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A collection-changed handler tried to mutate the list it is being notified about.
    #[error("cannot change the list while a collection-changed notification is being delivered")]
    ReentrantMutation,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
