//! Scripted image model for unit tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use figurine_core::DataUrl;
use secrecy::{ExposeSecret, SecretString};

use crate::classify::Reply;
use crate::provider::{ImageModel, ModelError};

/// One observed call to the model
#[derive(Debug, Clone)]
pub(crate) struct Call {
    pub image: DataUrl,
    pub prompt: String,
    pub credential: String,
}

/// Shared view of the calls a `ScriptedModel` received
#[derive(Debug, Clone, Default)]
pub(crate) struct Calls(Arc<Mutex<Vec<Call>>>);

impl Calls {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

/// Model that replays a fixed sequence of results
///
/// Panics if called more often than scripted.
pub(crate) struct ScriptedModel {
    script: Mutex<VecDeque<Result<Reply, ModelError>>>,
    calls: Calls,
}

impl ScriptedModel {
    pub fn new(script: Vec<Result<Reply, ModelError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: Calls::default(),
        }
    }

    pub fn calls(&self) -> Calls {
        self.calls.clone()
    }
}

#[async_trait]
impl ImageModel for ScriptedModel {
    async fn generate(
        &self,
        image: &DataUrl,
        prompt: &str,
        credential: &SecretString,
    ) -> Result<Reply, ModelError> {
        self.calls.0.lock().unwrap().push(Call {
            image: image.clone(),
            prompt: prompt.to_owned(),
            credential: credential.expose_secret().to_owned(),
        });

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("model called more times than scripted")
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Transient failure shaped like a Gemini `INTERNAL` error
pub(crate) fn internal_error() -> ModelError {
    ModelError::Api {
        status: 500,
        code: "INTERNAL".to_owned(),
        message: "An internal error has occurred.".to_owned(),
    }
}

/// Permanent failure shaped like a rejected API key
pub(crate) fn invalid_key_error() -> ModelError {
    ModelError::Api {
        status: 400,
        code: "INVALID_ARGUMENT".to_owned(),
        message: "API key not valid. Please pass a valid API key.".to_owned(),
    }
}
