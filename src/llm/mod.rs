mod gemini;

pub use gemini::GeminiClient;

use serde::Serialize;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model unavailable: no credential or client")]
    Unavailable,
    #[error("http error: {0}")]
    Http(String),
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("model returned no text (finish reason: {0})")]
    EmptyResponse(String),
}

/// One element of a multi-part request: the instruction text or an inline image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InlineData {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64 of the encoded image bytes.
    pub data: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image(mime_type: impl Into<String>, data: String) -> Self {
        ContentPart::Image {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data,
            },
        }
    }
}

/// A hosted text/vision model reachable with one blocking round trip per call.
pub trait GenerativeModel {
    /// False when no credential is configured or the client failed to start.
    fn available(&self) -> bool;

    fn generate(
        &self,
        parts: &[ContentPart],
    ) -> impl Future<Output = Result<String, ModelError>> + Send;
}
