//! Generative content backend: subtopic lists, descriptions and
//! illustrations for a presentation topic.
//!
//! [`GeminiClient`] talks to the Gemini REST API; [`MockModel`] answers
//! from a closure. Both implement [`GenerativeModel`], which is what
//! [`ContentClient`] and [`ImageFetcher`] are built on.

pub mod content;
pub mod gemini;
pub mod illustration;
pub mod mock;
pub mod model;

pub use content::ContentClient;
pub use gemini::{GeminiClient, GeminiConfig};
pub use illustration::ImageFetcher;
pub use mock::MockModel;
pub use model::{ContentPart, GenerateRequest, GenerateResponse, GenerativeModel, Modality};
