#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Typed Rust HTTP client for the figurine generation proxy
//!
//! Mirrors what the browser front end does: one POST per figure, no retries,
//! errors flattened into a single user-facing message.

mod client;
pub mod error;

pub use client::FigurineClient;
pub use error::{FigurineClientError, Result};
pub use figurine_core::{GenerateRequest, GenerateResponse, Locale};
