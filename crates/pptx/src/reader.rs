//! Reads a saved deck back for verification.
//!
//! Only understands what the writer produces plus the usual PPTX layout:
//! slide order from `presentation.xml`, text boxes and pictures on each slide.

use deckgen_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Text found in one shape, with its offset for reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideText {
    pub text: String,
    pub x: i64,
    pub y: i64,
}

/// What a slide contains once read back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedSlide {
    /// 1-based slide number.
    pub number: usize,

    /// Text boxes, top-to-bottom then left-to-right.
    pub texts: Vec<SlideText>,

    /// Number of `p:pic` elements.
    pub picture_count: usize,

    /// Solid background color, if the slide sets one.
    pub background: Option<String>,
}

impl ExtractedSlide {
    fn new(number: usize) -> Self {
        Self {
            number,
            texts: Vec::new(),
            picture_count: 0,
            background: None,
        }
    }

    /// The topmost text, which is the title in generated decks.
    pub fn title(&self) -> Option<&str> {
        self.texts.first().map(|t| t.text.as_str())
    }

    /// All text after the title, joined by newlines.
    pub fn body(&self) -> String {
        self.texts
            .iter()
            .skip(1)
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn sort_by_position(&mut self) {
        self.texts.sort_by(|a, b| a.y.cmp(&b.y).then(a.x.cmp(&b.x)));
    }
}

/// Reader for PPTX decks.
pub struct DeckReader;

impl DeckReader {
    /// Create a new deck reader.
    pub fn new() -> Self {
        Self
    }

    /// Read a deck from a file on disk.
    pub fn read_file(&self, path: &Path) -> Result<Vec<ExtractedSlide>> {
        let file = File::open(path)?;
        self.read(BufReader::new(file))
    }

    /// Read the slides of a deck, in presentation order.
    pub fn read<R: Read + Seek>(&self, reader: R) -> Result<Vec<ExtractedSlide>> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_paths = self.slide_order(&mut archive)?;

        let mut slides = Vec::with_capacity(slide_paths.len());
        for (idx, path) in slide_paths.iter().enumerate() {
            let content = read_file_from_archive(&mut archive, path)?;
            slides.push(parse_slide(&content, idx + 1)?);
        }

        Ok(slides)
    }

    /// Slide part paths in the order `p:sldIdLst` lists them.
    fn slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels = read_file_from_archive(archive, "ppt/_rels/presentation.xml.rels")?;
        let targets = parse_relationship_targets(&rels)?;

        let presentation = read_file_from_archive(archive, "ppt/presentation.xml")?;
        let mut reader = Reader::from_str(&presentation);
        reader.trim_text(true);

        let mut paths = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"sldId" =>
                {
                    let rel_id = attribute(e, b"r:id").ok_or_else(|| {
                        Error::XmlError("Slide entry without relationship id".to_string())
                    })?;
                    let target = targets.get(&rel_id).ok_or_else(|| {
                        Error::XmlError(format!("Unknown slide relationship '{}'", rel_id))
                    })?;
                    paths.push(resolve_target(target));
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing presentation: {}",
                        e
                    )));
                }
                _ => {}
            }
        }

        Ok(paths)
    }
}

impl Default for DeckReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Map relationship ids to their targets.
fn parse_relationship_targets(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                if let (Some(id), Some(target)) = (attribute(e, b"Id"), attribute(e, b"Target")) {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Parse the shapes of one slide.
fn parse_slide(xml: &str, number: usize) -> Result<ExtractedSlide> {
    let mut slide = ExtractedSlide::new(number);
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut current: Option<SlideText> = None;
    let mut in_background = false;
    let mut in_paragraph = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => match local_name(e.name().as_ref()) {
                b"bg" => in_background = true,
                b"sp" => {
                    current = Some(SlideText {
                        text: String::new(),
                        x: 0,
                        y: 0,
                    });
                }
                b"pic" => slide.picture_count += 1,
                b"p" if current.is_some() => {
                    in_paragraph = true;
                    if let Some(ref mut shape) = current {
                        if !shape.text.is_empty() {
                            shape.text.push('\n');
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match local_name(e.name().as_ref()) {
                b"off" => {
                    if let Some(ref mut shape) = current {
                        shape.x = attribute(e, b"x").and_then(|v| v.parse().ok()).unwrap_or(0);
                        shape.y = attribute(e, b"y").and_then(|v| v.parse().ok()).unwrap_or(0);
                    }
                }
                b"srgbClr" if in_background => {
                    slide.background = attribute(e, b"val");
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_paragraph {
                    if let Some(ref mut shape) = current {
                        let text = e.unescape().unwrap_or_default();
                        shape.text.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match local_name(e.name().as_ref()) {
                b"bg" => in_background = false,
                b"br" if in_paragraph => {
                    if let Some(ref mut shape) = current {
                        shape.text.push('\n');
                    }
                }
                b"p" => in_paragraph = false,
                b"sp" => {
                    if let Some(shape) = current.take() {
                        if !shape.text.trim().is_empty() {
                            slide.texts.push(shape);
                        }
                    }
                    in_paragraph = false;
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing slide {}: {}",
                    number, e
                )));
            }
            _ => {}
        }
    }

    slide.sort_by_position();
    Ok(slide)
}

/// Read a file from the ZIP archive.
fn read_file_from_archive<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

    Ok(content)
}

/// Value of the attribute named exactly `key`.
fn attribute(element: &BytesStart, key: &[u8]) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Turn a target relative to `ppt/` into an archive path.
fn resolve_target(target: &str) -> String {
    match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("ppt/{}", target),
    }
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SlideAssembler;
    use crate::writer::PackageWriter;
    use deckgen_core::{RasterImage, SlideContent, Subtopic, Topic};
    use image::DynamicImage;
    use std::io::Cursor;

    fn written(slides: Vec<SlideContent>) -> Vec<u8> {
        let deck = SlideAssembler::new().build(slides, &Topic::from_input("Energy"));
        let mut buffer = Cursor::new(Vec::new());
        PackageWriter::new().write(&deck, &mut buffer).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
    }

    #[test]
    fn test_reads_back_titles_in_order() {
        let labels: Vec<String> = (1..=12).map(|n| format!("Subtopic {}", n)).collect();
        let slides = labels
            .iter()
            .map(|l| SlideContent::new(Subtopic::new(l.as_str()), "Body text", None))
            .collect();

        let read = DeckReader::new().read(Cursor::new(written(slides))).unwrap();
        let titles: Vec<&str> = read.iter().map(|s| s.title().unwrap()).collect();
        assert_eq!(titles, labels.iter().map(|s| s.as_str()).collect::<Vec<_>>());
        assert_eq!(read[11].number, 12);
    }

    #[test]
    fn test_reads_back_layout() {
        let long = "energy ".repeat(40);
        let slides = vec![
            SlideContent::new(
                Subtopic::new("R&D <labs>"),
                long.clone(),
                Some(RasterImage::new(DynamicImage::new_rgb8(20, 10))),
            ),
            SlideContent::new(Subtopic::new("Policy"), "Short", None),
        ];

        let read = DeckReader::new().read(Cursor::new(written(slides))).unwrap();
        assert_eq!(read.len(), 2);

        assert_eq!(read[0].title(), Some("R&D <labs>"));
        assert_eq!(read[0].body(), deckgen_core::wrap_description(&long));
        assert_eq!(read[0].picture_count, 1);
        assert_eq!(read[0].background.as_deref(), Some("F0F8FF"));

        assert_eq!(read[1].body(), "Short");
        assert_eq!(read[1].picture_count, 0);
    }

    #[test]
    fn test_not_a_zip() {
        assert!(matches!(
            DeckReader::new().read(Cursor::new(b"plain text".to_vec())),
            Err(Error::ZipError(_))
        ));
    }
}
