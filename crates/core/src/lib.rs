//! Core domain types, text handling, retry policy and slide geometry
//! for turning a topic into a generated slide deck.

pub mod error;
pub mod layout;
pub mod retry;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use layout::{image_frame, EmuFrame, Frame};
pub use retry::{Attempt, RetryPolicy};
pub use text::{wrap_description, wrap_text, ListParsing, SubtopicParser};
pub use types::{RasterImage, SlideContent, Subtopic, Topic, FALLBACK_TOPIC};
