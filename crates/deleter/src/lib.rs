//! Cascading deletion engine for media items and their derivative caches.
//!
//! The [`Deleter`] walks an item tree through paginated remote listings and
//! removes each item's caches (blob plus metadata record, in that order)
//! and finally the item records themselves, children before parents.

pub mod deleter;
pub mod error;

pub use deleter::Deleter;
pub use error::{DeleteError, DeleteResult};
