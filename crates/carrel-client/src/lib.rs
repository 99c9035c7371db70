//! Async client for the carrel backend.
//!
//! Wraps the JSON REST API behind typed methods, keeps the admin bearer
//! token in an [`session::AdminSession`] shared across tasks, and provides
//! the two background loops the console runs: the dashboard poller and the
//! drowsiness alert feed.

pub mod client;
pub mod error;
pub mod events;
pub mod poll;
pub mod sample;
pub mod session;

pub use client::{ApiClient, ApiConfig};
pub use error::{ApiError, ApiResult};
pub use session::AdminSession;

#[cfg(test)]
mod tests;
