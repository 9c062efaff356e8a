#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! Generation proxy between browser clients and the Gemini image model

mod catalog;
mod classify;
mod error;
mod protocol;
mod provider;
mod retry;
mod server;
#[cfg(test)]
mod testing;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::BytesRejection},
    http::Method,
    routing::any,
};
use bytes::Bytes;
use figurine_core::{GENERATE_PATH, GenerateRequest, GenerateResponse};

pub use classify::Reply;
pub use error::{GenerateError, Result};
pub use provider::{ImageModel, ModelError};
pub use retry::RetryPolicy;
pub use server::{Generator, GeneratorBuilder};

/// Build the generator from configuration
///
/// # Errors
///
/// Returns an error if the model client fails to initialize
pub fn build_server(config: &figurine_config::Config) -> anyhow::Result<Arc<Generator>> {
    let generator = GeneratorBuilder::new(&config.generation)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to initialize generation proxy: {e}"))?;
    Ok(Arc::new(generator))
}

/// Create the endpoint router for figure generation
///
/// Routed for every method so that non-POST requests get the JSON 405
/// envelope rather than an empty framework response.
pub fn endpoint_router() -> Router<Arc<Generator>> {
    Router::new().route(GENERATE_PATH, any(generate))
}

/// Handle figure generation requests
///
/// Body rejections are taken as a value so that an oversized body still
/// gets the JSON envelope and is counted as a rejected request.
async fn generate(
    State(generator): State<Arc<Generator>>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateResponse>> {
    let request = decode(&method, body).map_err(|e| generator.reject(e))?;

    let response = generator.generate(request).await?;

    Ok(Json(response))
}

fn decode(method: &Method, body: std::result::Result<Bytes, BytesRejection>) -> Result<GenerateRequest> {
    if *method != Method::POST {
        return Err(GenerateError::MethodNotAllowed);
    }

    let body = body.map_err(|rejection| GenerateError::BodyRejected {
        status: rejection.status(),
        message: rejection.body_text(),
    })?;

    serde_json::from_slice(&body).map_err(|e| GenerateError::MalformedBody(e.to_string()))
}
