#![allow(clippy::must_use_candidate)]

//! Shared vocabulary for the figurine proxy and its clients

mod data_url;
mod error;
mod locale;
mod wire;

pub use data_url::{DataUrl, DataUrlError};
pub use error::HttpError;
pub use locale::Locale;
pub use wire::{ErrorBody, GenerateRequest, GenerateResponse};

/// Path the generation endpoint is mounted on
pub const GENERATE_PATH: &str = "/api/generate";
