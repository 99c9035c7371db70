//! Core types and pure computation for the carrel admin console.
//!
//! This crate is deliberately free of HTTP and terminal dependencies.
//! All other crates depend on it; it performs no I/O. Everything the
//! dashboard shows is *derived*: recomputed from raw backend records on
//! every poll cycle and never persisted.

pub mod alerts;
pub mod consultation;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod format;
pub mod franchise;
pub mod model;
pub mod payment;

pub use error::{Error, Result};
