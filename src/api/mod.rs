//! Project backend integration module.
//!
//! Provides the HTTP client plus the wire models and errors it speaks.

pub mod client;
pub mod error;
pub mod models;

pub use client::ApiClient;
pub use error::ApiError;
pub use models::{Payload, PayloadPart, RecordSummary};
