//! Domain types for representing generated presentation content.

use crate::error::{Error, Result};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use unicode_normalization::UnicodeNormalization;

/// Topic used when the user supplies nothing.
pub const FALLBACK_TOPIC: &str = "Sustainable Energy";

/// File extension of the generated deck.
pub const DECK_EXTENSION: &str = "pptx";

/// Number of subtopics requested for every topic.
pub const SUBTOPIC_COUNT: usize = 6;

/// The subject of a presentation. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic(String);

impl Topic {
    /// Build a topic from raw user input.
    ///
    /// Surrounding whitespace is trimmed and the text is NFC-normalized.
    /// Blank input falls back to [`FALLBACK_TOPIC`].
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            Self(FALLBACK_TOPIC.to_string())
        } else {
            Self(trimmed.nfc().collect())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File name of the deck generated for this topic (`<topic>.pptx`).
    ///
    /// Path separators are replaced so the deck always lands in the
    /// output directory itself.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .0
            .chars()
            .map(|c| match c {
                '/' | '\\' | '\0' => '_',
                other => other,
            })
            .collect();
        format!("{}.{}", stem, DECK_EXTENSION)
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A short facet of the topic; each one becomes a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtopic(String);

impl Subtopic {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subtopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A decoded illustration held in memory.
#[derive(Debug, Clone)]
pub struct RasterImage {
    image: DynamicImage,
}

impl RasterImage {
    /// Wrap an already decoded image.
    pub fn new(image: DynamicImage) -> Self {
        Self { image }
    }

    /// Decode an encoded payload (PNG, JPEG).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| Error::ImageError(format!("Failed to decode image: {}", e)))?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width divided by height. Zero-height images report 1.0.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height() == 0 {
            return 1.0;
        }
        self.width() as f64 / self.height() as f64
    }

    /// Encode the pixels as PNG for embedding.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, image::ImageFormat::Png)
            .map_err(|e| Error::ImageError(format!("Failed to encode image: {}", e)))?;
        Ok(buffer.into_inner())
    }
}

/// Everything generated for one slide.
#[derive(Debug, Clone)]
pub struct SlideContent {
    pub subtopic: Subtopic,
    pub description: String,
    /// `None` when image generation gave up; the slide is still built.
    pub image: Option<RasterImage>,
}

impl SlideContent {
    pub fn new(subtopic: Subtopic, description: impl Into<String>, image: Option<RasterImage>) -> Self {
        Self {
            subtopic,
            description: description.into(),
            image,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }
}
