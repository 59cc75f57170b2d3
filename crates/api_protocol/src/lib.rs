//! HTTP protocol definitions for the SoftDesk API.
//!
//! This crate defines the JSON bodies exchanged between the SoftDesk server
//! and its clients: request payloads, resource views and the error envelope.

mod error;
pub mod requests;
pub mod responses;
mod types;

pub use error::*;
pub use types::*;
