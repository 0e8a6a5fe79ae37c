//! The topic-to-deck pipeline.

use deckgen_core::{Result, SlideContent, Topic};
use deckgen_genai::{ContentClient, GenerativeModel, ImageFetcher};
use deckgen_pptx::{DeckReader, SlideAssembler};
use std::path::{Path, PathBuf};

/// Drives one run: subtopics, then description and image for each, then
/// assembly and save.
///
/// Any subtopic or description failure aborts the run before a file is
/// written. Missing images only leave their slide without a picture.
pub struct Orchestrator<'a, M: GenerativeModel + ?Sized> {
    content: ContentClient<'a, M>,
    images: ImageFetcher<'a, M>,
    assembler: SlideAssembler,
    output_dir: PathBuf,
}

impl<'a, M: GenerativeModel + ?Sized> Orchestrator<'a, M> {
    pub fn new(
        content: ContentClient<'a, M>,
        images: ImageFetcher<'a, M>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            content,
            images,
            assembler: SlideAssembler::new(),
            output_dir: output_dir.into(),
        }
    }

    /// Generate the content of every slide, in subtopic order.
    pub fn collect(&self, topic: &Topic) -> Result<Vec<SlideContent>> {
        let subtopics = self.content.subtopics(topic)?;
        let total = subtopics.len();
        let mut slides = Vec::with_capacity(total);

        for (idx, subtopic) in subtopics.into_iter().enumerate() {
            log::info!("Generating content for subtopic {}/{}: {}", idx + 1, total, subtopic);
            let description = self.content.description(&subtopic, topic)?;
            let image = self.images.image(&subtopic, topic);
            slides.push(SlideContent::new(subtopic, description, image));
        }

        Ok(slides)
    }

    /// Run the whole pipeline and return the path of the saved deck.
    pub fn run(&self, topic: &Topic) -> Result<PathBuf> {
        log::info!("Building presentation for '{}'", topic);

        let slides = self.collect(topic)?;
        let expected = slides.len();

        let deck = self.assembler.build(slides, topic);
        let path = deck.save(&self.output_dir)?;
        verify_saved(&path, expected);

        Ok(path)
    }
}

/// Read a saved deck back and check its slide count. Problems are logged
/// only; the file is already in place.
fn verify_saved(path: &Path, expected: usize) -> bool {
    match DeckReader::new().read_file(path) {
        Ok(written) if written.len() == expected => {
            log::debug!("Verified {} slides in {}", written.len(), path.display());
            true
        }
        Ok(written) => {
            log::warn!(
                "{} contains {} slides, expected {}",
                path.display(),
                written.len(),
                expected
            );
            false
        }
        Err(e) => {
            log::warn!("Could not read back {}: {}", path.display(), e);
            false
        }
    }
}
