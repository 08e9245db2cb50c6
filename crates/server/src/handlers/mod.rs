//! HTTP request handlers.

pub mod delete;
pub mod health;

pub use delete::*;
pub use health::*;
