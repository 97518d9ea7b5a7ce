//! Request and response types for the generative-language API

use serde::{Deserialize, Serialize};

/// A `generateContent` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Conversation contents; a single user turn for every assist operation
    pub contents: Vec<Content>,
}

impl GenerateRequest {
    /// Build a request from a single text prompt
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part::Text { text: text.into() }],
            }],
        }
    }

    /// Build a request from a text prompt plus an inline image
    #[must_use]
    pub fn from_text_and_image(
        text: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: text.into() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.into(),
                            data: data.into(),
                        },
                    },
                ],
            }],
        }
    }
}

/// One content turn: an ordered list of parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    /// The parts making up this turn
    #[serde(default)]
    pub parts: Vec<Part>,
}

/// A single content part - either text or inline binary data
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// Plain text
    Text {
        /// The text content
        text: String,
    },
    /// Inline base64-encoded data (screenshots)
    InlineData {
        /// The inline data payload
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

/// Inline binary payload, base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InlineData {
    /// MIME type of the payload, e.g. `image/png`
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded bytes
    pub data: String,
}

/// A `generateContent` response body
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    /// Generated candidates; the first one is used
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

/// One generated candidate
#[derive(Debug, Clone, Deserialize)]
pub struct Candidate {
    /// The candidate's content
    pub content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate, if any
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let mut out = String::new();
        for part in &candidate.content.parts {
            if let Part::Text { text } = part {
                out.push_str(text);
            }
        }
        if out.is_empty() { None } else { Some(out) }
    }
}
