use figurine_core::DataUrl;

use crate::protocol::GeminiResponse;

/// Finish or block reasons that mean the content policy refused the request
const SAFETY_REASONS: [&str; 2] = ["SAFETY", "PROHIBITED_CONTENT"];

/// Normalized outcome of a successful remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Model produced an image
    Image(DataUrl),
    /// Model refused on content-policy grounds
    SafetyBlocked { reason: String },
    /// Model produced no image; carries whatever text it returned
    TextOnly(String),
}

impl From<&GeminiResponse> for Reply {
    /// Classify a reply in priority order: safety block, image, text
    fn from(response: &GeminiResponse) -> Self {
        let candidate = response.first_candidate();

        if let Some(reason) = candidate.and_then(|c| c.finish_reason.as_deref())
            && SAFETY_REASONS.contains(&reason)
        {
            return Self::SafetyBlocked {
                reason: reason.to_owned(),
            };
        }

        if candidate.is_none()
            && let Some(reason) = response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
            && SAFETY_REASONS.contains(&reason)
        {
            return Self::SafetyBlocked {
                reason: reason.to_owned(),
            };
        }

        let image = candidate
            .and_then(|c| c.content.as_ref())
            .and_then(|content| content.parts.iter().find_map(|p| p.inline_data.as_ref()));

        match image {
            Some(inline) => Self::Image(DataUrl::new(inline.mime_type.clone(), inline.data.clone())),
            None => Self::TextOnly(response.text()),
        }
    }
}
