//! Laid-out deck ready for serialization.

use deckgen_core::{EmuFrame, RasterImage, Topic};
use serde::{Deserialize, Serialize};

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    Center,
    Justify,
}

impl Alignment {
    /// Value of the DrawingML `algn` attribute.
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Justify => "just",
        }
    }
}

/// A positioned text box. Newlines in `text` become line breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub frame: EmuFrame,
    pub text: String,
    pub font_size_pt: f64,
    pub bold: bool,
    pub alignment: Alignment,
}

/// A positioned illustration.
#[derive(Debug, Clone)]
pub struct Picture {
    pub frame: EmuFrame,
    pub image: RasterImage,
    /// Alternative text.
    pub description: String,
}

/// One slide of the fixed template.
#[derive(Debug, Clone)]
pub struct RenderedSlide {
    /// Solid background color, hex RGB.
    pub background: String,
    pub title: TextBox,
    pub description: TextBox,
    pub picture: Option<Picture>,
}

/// An ordered set of slides plus the name it will be saved under.
#[derive(Debug, Clone)]
pub struct Deck {
    topic: Topic,
    slides: Vec<RenderedSlide>,
}

impl Deck {
    pub fn new(topic: Topic) -> Self {
        Self {
            topic,
            slides: Vec::new(),
        }
    }

    pub fn add_slide(&mut self, slide: RenderedSlide) {
        self.slides.push(slide);
    }

    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    pub fn slides(&self) -> &[RenderedSlide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// File name the deck is saved under (`<topic>.pptx`).
    pub fn file_name(&self) -> String {
        self.topic.file_name()
    }

    /// Slide titles in order.
    pub fn titles(&self) -> Vec<&str> {
        self.slides.iter().map(|s| s.title.text.as_str()).collect()
    }

    /// Number of slides carrying a picture.
    pub fn picture_count(&self) -> usize {
        self.slides.iter().filter(|s| s.picture.is_some()).count()
    }
}
