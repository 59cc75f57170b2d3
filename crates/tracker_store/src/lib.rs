//! Storage for SoftDesk.
//!
//! This crate provides the storage abstraction for user accounts, projects,
//! contributor memberships, issues and comments, together with an in-memory
//! implementation that applies the cascade rules of the data model.

mod error;
mod memory;
mod traits;

pub use error::*;
pub use memory::*;
pub use traits::*;
