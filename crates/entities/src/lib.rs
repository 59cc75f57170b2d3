//! Core entity definitions for SoftDesk.
//!
//! This crate defines the records tracked by the SoftDesk API: user
//! accounts, projects with their contributor sets, issues and comments.

mod comment;
mod ids;
mod issue;
mod project;
mod user;

pub use comment::*;
pub use ids::*;
pub use issue::*;
pub use project::*;
pub use user::*;
