//! The generative model seam.
//!
//! Everything that talks to the content service goes through
//! [`GenerativeModel`], so the pipeline can run against a scripted fake.

use deckgen_core::Result;
use serde::{Deserialize, Serialize};

/// Kind of output requested from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Modality {
    Text,
    Image,
}

/// A single prompt sent to a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    /// Model identifier, e.g. "gemini-2.0-flash".
    pub model: String,
    pub prompt: String,
    pub modalities: Vec<Modality>,
}

impl GenerateRequest {
    /// A text-only request.
    pub fn text(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            modalities: vec![Modality::Text],
        }
    }

    /// A request that allows mixed text and image output.
    pub fn text_and_image(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            modalities: vec![Modality::Text, Modality::Image],
        }
    }

    pub fn wants_image(&self) -> bool {
        self.modalities.contains(&Modality::Image)
    }
}

/// One part of a model response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),
    /// Raw inline payload, already base64-decoded.
    InlineData { mime_type: String, data: Vec<u8> },
}

/// Parts of the first candidate of a response, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub parts: Vec<ContentPart>,
}

impl GenerateResponse {
    pub fn new(parts: Vec<ContentPart>) -> Self {
        Self { parts }
    }

    /// Convenience for a single text part.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::new(vec![ContentPart::Text(text.into())])
    }

    /// The first text part, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// The payload of the first inline data part, if any.
    pub fn first_inline_data(&self) -> Option<&[u8]> {
        self.parts.iter().find_map(|part| match part {
            ContentPart::InlineData { data, .. } => Some(data.as_slice()),
            _ => None,
        })
    }
}

/// A generative text/image model.
pub trait GenerativeModel {
    /// Send one request and return the parts of the first candidate.
    fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modality_wire_names() {
        assert_eq!(serde_json::to_string(&Modality::Text).unwrap(), "\"TEXT\"");
        assert_eq!(serde_json::to_string(&Modality::Image).unwrap(), "\"IMAGE\"");
    }

    #[test]
    fn test_request_constructors() {
        let text = GenerateRequest::text("m", "p");
        assert!(!text.wants_image());

        let mixed = GenerateRequest::text_and_image("m", "p");
        assert!(mixed.wants_image());
        assert_eq!(mixed.modalities, vec![Modality::Text, Modality::Image]);
    }

    #[test]
    fn test_first_parts() {
        let response = GenerateResponse::new(vec![
            ContentPart::Text("caption".into()),
            ContentPart::InlineData {
                mime_type: "image/png".into(),
                data: vec![1, 2, 3],
            },
            ContentPart::InlineData {
                mime_type: "image/png".into(),
                data: vec![4],
            },
        ]);

        assert_eq!(response.first_text(), Some("caption"));
        assert_eq!(response.first_inline_data(), Some(&[1u8, 2, 3][..]));
        assert_eq!(GenerateResponse::default().first_text(), None);
        assert_eq!(GenerateResponse::from_text("x").first_inline_data(), None);
    }
}
