//! Google Generative Language API wire format for `generateContent`

use figurine_core::DataUrl;
use serde::{Deserialize, Serialize};

// -- Request types --

/// `generateContent` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// Conversation contents
    pub contents: Vec<GeminiContent>,
    /// Generation configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GeminiGenerationConfig>,
}

impl GeminiRequest {
    /// Single-turn request asking the model to transform `image` per `prompt`
    ///
    /// The image part precedes the instruction, and both image and text
    /// output modalities are requested.
    pub fn image_edit(image: &DataUrl, prompt: &str) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: Some("user".to_owned()),
                parts: vec![GeminiPart::inline(image), GeminiPart::text(prompt)],
            }],
            generation_config: Some(GeminiGenerationConfig {
                response_modalities: vec![ResponseModality::Image, ResponseModality::Text],
            }),
        }
    }
}

/// Content object holding a role and its parts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiContent {
    /// "user" or "model"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content parts
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// One part of a content object
///
/// Modelled as a struct of optionals rather than an enum: replies may
/// carry extra fields (e.g. thought signatures) next to the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Inline binary data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<GeminiInlineData>,
}

impl GeminiPart {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_owned()),
            inline_data: None,
        }
    }

    pub fn inline(image: &DataUrl) -> Self {
        Self {
            text: None,
            inline_data: Some(GeminiInlineData {
                mime_type: image.mime_type().to_owned(),
                data: image.data().to_owned(),
            }),
        }
    }
}

/// Inline binary data (images)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiInlineData {
    /// MIME type (e.g. "image/png")
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiGenerationConfig {
    /// Output modalities the model may produce
    pub response_modalities: Vec<ResponseModality>,
}

/// Output modality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseModality {
    Image,
    Text,
}

// -- Response types --

/// `generateContent` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Generated candidates
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Feedback on the prompt itself (set when the prompt was blocked)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

impl GeminiResponse {
    /// First candidate, the only one ever requested
    pub fn first_candidate(&self) -> Option<&GeminiCandidate> {
        self.candidates.first()
    }

    /// Concatenated text parts of the first candidate
    pub fn text(&self) -> String {
        self.first_candidate()
            .and_then(|c| c.content.as_ref())
            .map(|content| content.parts.iter().filter_map(|p| p.text.as_deref()).collect::<String>())
            .unwrap_or_default()
    }
}

/// Generated candidate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content; absent when generation was blocked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<GeminiContent>,
    /// Why generation stopped (e.g. "STOP", "SAFETY")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Prompt-level feedback
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    /// Reason the prompt was blocked, if it was
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

// -- Error response --

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiErrorResponse {
    pub error: GeminiErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiErrorDetail {
    /// HTTP-style status code
    #[serde(default)]
    pub code: u16,
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Canonical status (e.g. "INTERNAL", "INVALID_ARGUMENT")
    #[serde(default)]
    pub status: String,
}
