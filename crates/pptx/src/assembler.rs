//! Lays generated content out on the fixed slide template.

use crate::deck::{Alignment, Deck, Picture, RenderedSlide, TextBox};
use deckgen_core::layout::{
    self, BACKGROUND_RGB, DESCRIPTION_FONT_PT, DESCRIPTION_FRAME, TITLE_FONT_PT, TITLE_FRAME,
};
use deckgen_core::text::DESCRIPTION_WRAP_WIDTH;
use deckgen_core::{wrap_text, SlideContent, Topic};

/// Builds a [`Deck`] from generated slide content.
#[derive(Debug, Clone)]
pub struct SlideAssembler {
    wrap_width: usize,
}

impl Default for SlideAssembler {
    fn default() -> Self {
        Self {
            wrap_width: DESCRIPTION_WRAP_WIDTH,
        }
    }
}

impl SlideAssembler {
    /// Create an assembler wrapping descriptions at 95 columns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the description wrap width (at least 1 column).
    pub fn with_wrap_width(mut self, width: usize) -> Self {
        self.wrap_width = width.max(1);
        self
    }

    /// Lay out one slide per content entry, keeping their order.
    ///
    /// Each slide gets the background fill, a centered bold title, a
    /// justified description and, when there is one, the illustration
    /// centered below the text.
    pub fn build(&self, slides: Vec<SlideContent>, topic: &Topic) -> Deck {
        let mut deck = Deck::new(topic.clone());
        let background = layout::rgb_hex(BACKGROUND_RGB);

        for (idx, content) in slides.into_iter().enumerate() {
            let picture = content.image.map(|image| {
                let frame = layout::image_frame(image.aspect_ratio());
                log::debug!(
                    "Slide {}: {}x{} image placed at ({:.2}, {:.2}) in, {:.2}x{:.2} in",
                    idx + 1,
                    image.width(),
                    image.height(),
                    frame.left,
                    frame.top,
                    frame.width,
                    frame.height
                );
                Picture {
                    frame: frame.to_emu(),
                    image,
                    description: content.subtopic.to_string(),
                }
            });

            if picture.is_none() {
                log::debug!("Slide {}: no image", idx + 1);
            }

            deck.add_slide(RenderedSlide {
                background: background.clone(),
                title: TextBox {
                    frame: TITLE_FRAME.to_emu(),
                    text: content.subtopic.to_string(),
                    font_size_pt: TITLE_FONT_PT,
                    bold: true,
                    alignment: Alignment::Center,
                },
                description: TextBox {
                    frame: DESCRIPTION_FRAME.to_emu(),
                    text: wrap_text(&content.description, self.wrap_width),
                    font_size_pt: DESCRIPTION_FONT_PT,
                    bold: false,
                    alignment: Alignment::Justify,
                },
                picture,
            });
        }

        log::info!(
            "Assembled {} slides ({} with images)",
            deck.slide_count(),
            deck.picture_count()
        );
        deck
    }
}
