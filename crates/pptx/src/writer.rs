//! PPTX package writer.

use crate::deck::{Deck, Picture, RenderedSlide, TextBox};
use crate::template::{self, XML_DECLARATION};
use deckgen_core::layout::{inches_to_emu, SLIDE_HEIGHT_IN, SLIDE_WIDTH_IN};
use deckgen_core::{Error, Result};
use quick_xml::escape::escape;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{Cursor, Seek, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// First `p:sldId` value; PowerPoint requires ids of 256 and up.
const FIRST_SLIDE_ID: usize = 256;

/// Relationship ids in `presentation.xml.rels` taken before the slides.
const RESERVED_PRESENTATION_RELS: usize = 3;

/// Writes a [`Deck`] as an Office Open XML presentation.
pub struct PackageWriter;

impl PackageWriter {
    /// Create a new package writer.
    pub fn new() -> Self {
        Self
    }

    /// Write the whole package to `writer`.
    pub fn write<W: Write + Seek>(&self, deck: &Deck, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let xml_options = FileOptions::default().compression_method(CompressionMethod::Deflated);
        let media_options = FileOptions::default().compression_method(CompressionMethod::Stored);

        let mut parts: Vec<(String, Vec<u8>, FileOptions)> = vec![
            (
                "[Content_Types].xml".to_string(),
                content_types_xml(deck).into_bytes(),
                xml_options,
            ),
            ("_rels/.rels".to_string(), root_rels_xml().into_bytes(), xml_options),
            (
                "docProps/core.xml".to_string(),
                template::core_props_xml(&escape(deck.topic().as_str())).into_bytes(),
                xml_options,
            ),
            (
                "docProps/app.xml".to_string(),
                template::app_props_xml(deck.slide_count()).into_bytes(),
                xml_options,
            ),
            (
                "ppt/presentation.xml".to_string(),
                presentation_xml(deck)?.into_bytes(),
                xml_options,
            ),
            (
                "ppt/_rels/presentation.xml.rels".to_string(),
                presentation_rels_xml(deck).into_bytes(),
                xml_options,
            ),
            (
                "ppt/presProps.xml".to_string(),
                template::pres_props_xml().into_bytes(),
                xml_options,
            ),
            (
                "ppt/slideMasters/slideMaster1.xml".to_string(),
                template::slide_master_xml().into_bytes(),
                xml_options,
            ),
            (
                "ppt/slideMasters/_rels/slideMaster1.xml.rels".to_string(),
                relationships_xml(&[
                    ("rId1", template::REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                    ("rId2", template::REL_THEME, "../theme/theme1.xml"),
                ])
                .into_bytes(),
                xml_options,
            ),
            (
                "ppt/slideLayouts/slideLayout1.xml".to_string(),
                template::blank_layout_xml().into_bytes(),
                xml_options,
            ),
            (
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels".to_string(),
                relationships_xml(&[(
                    "rId1",
                    template::REL_SLIDE_MASTER,
                    "../slideMasters/slideMaster1.xml",
                )])
                .into_bytes(),
                xml_options,
            ),
            (
                "ppt/theme/theme1.xml".to_string(),
                template::theme_xml().into_bytes(),
                xml_options,
            ),
        ];

        for (idx, slide) in deck.slides().iter().enumerate() {
            let number = idx + 1;
            let image_target = slide
                .picture
                .as_ref()
                .map(|_| format!("../media/image{}.png", number));

            let mut rels = vec![(
                "rId1",
                template::REL_SLIDE_LAYOUT,
                "../slideLayouts/slideLayout1.xml",
            )];
            if let Some(ref target) = image_target {
                rels.push(("rId2", template::REL_IMAGE, target.as_str()));
            }

            parts.push((
                format!("ppt/slides/slide{}.xml", number),
                slide_xml(slide)?.into_bytes(),
                xml_options,
            ));
            parts.push((
                format!("ppt/slides/_rels/slide{}.xml.rels", number),
                relationships_xml(&rels).into_bytes(),
                xml_options,
            ));

            if let Some(ref picture) = slide.picture {
                parts.push((
                    format!("ppt/media/image{}.png", number),
                    picture.image.to_png()?,
                    media_options,
                ));
            }
        }

        for (name, data, options) in parts {
            zip.start_file(name.as_str(), options)
                .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
            zip.write_all(&data)?;
        }

        let mut inner = zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish archive: {}", e)))?;
        inner.flush()?;
        Ok(())
    }

    /// Write the deck to `<dir>/<topic>.pptx`, replacing any existing file.
    ///
    /// The package is built in memory first; an existing file is only
    /// touched once every part has been written.
    pub fn save(&self, deck: &Deck, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(deck.file_name());
        let mut buffer = Cursor::new(Vec::new());
        self.write(deck, &mut buffer)?;
        fs::write(&path, buffer.into_inner())?;
        log::debug!("Wrote {} slides to {}", deck.slide_count(), path.display());
        Ok(path)
    }
}

impl Default for PackageWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// Save with the default [`PackageWriter`]; see [`PackageWriter::save`].
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        PackageWriter::new().save(self, dir)
    }
}

fn xml_err(e: std::fmt::Error) -> Error {
    Error::XmlError(e.to_string())
}

fn content_types_xml(deck: &Deck) -> String {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(r#"<Types xmlns="{}">"#, template::NS_CONTENT_TYPES));
    xml.push_str(&format!(
        r#"<Default Extension="rels" ContentType="{}"/>"#,
        template::CT_RELATIONSHIPS
    ));
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);

    let overrides = [
        ("/ppt/presentation.xml", template::CT_PRESENTATION),
        ("/ppt/presProps.xml", template::CT_PRES_PROPS),
        ("/ppt/slideMasters/slideMaster1.xml", template::CT_SLIDE_MASTER),
        ("/ppt/slideLayouts/slideLayout1.xml", template::CT_SLIDE_LAYOUT),
        ("/ppt/theme/theme1.xml", template::CT_THEME),
        ("/docProps/core.xml", template::CT_CORE_PROPERTIES),
        ("/docProps/app.xml", template::CT_EXTENDED_PROPERTIES),
    ];
    for (part, content_type) in overrides {
        xml.push_str(&format!(
            r#"<Override PartName="{}" ContentType="{}"/>"#,
            part, content_type
        ));
    }
    for number in 1..=deck.slide_count() {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
            number,
            template::CT_SLIDE
        ));
    }

    xml.push_str("</Types>");
    xml
}

fn root_rels_xml() -> String {
    relationships_xml(&[
        ("rId1", template::REL_OFFICE_DOCUMENT, "ppt/presentation.xml"),
        ("rId2", template::REL_CORE_PROPERTIES, "docProps/core.xml"),
        ("rId3", template::REL_EXTENDED_PROPERTIES, "docProps/app.xml"),
    ])
}

/// Relationship id of slide `idx` (0-based) in `presentation.xml.rels`.
fn slide_rel_id(idx: usize) -> String {
    format!("rId{}", idx + 1 + RESERVED_PRESENTATION_RELS)
}

fn presentation_rels_xml(deck: &Deck) -> String {
    let slide_targets: Vec<(String, String)> = (0..deck.slide_count())
        .map(|idx| (slide_rel_id(idx), format!("slides/slide{}.xml", idx + 1)))
        .collect();

    let mut rels = vec![
        ("rId1", template::REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        ("rId2", template::REL_THEME, "theme/theme1.xml"),
        ("rId3", template::REL_PRES_PROPS, "presProps.xml"),
    ];
    for (id, target) in &slide_targets {
        rels.push((id.as_str(), template::REL_SLIDE, target.as_str()));
    }
    relationships_xml(&rels)
}

fn relationships_xml(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    xml.push_str(&format!(
        r#"<Relationships xmlns="{}">"#,
        template::NS_PACKAGE_RELS
    ));
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            id, rel_type, target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn presentation_xml(deck: &Deck) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
        template::NS_A,
        template::NS_R,
        template::NS_P
    )
    .map_err(xml_err)?;

    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

    if deck.slide_count() > 0 {
        xml.push_str("<p:sldIdLst>");
        for idx in 0..deck.slide_count() {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="{}"/>"#,
                FIRST_SLIDE_ID + idx,
                slide_rel_id(idx)
            )
            .map_err(xml_err)?;
        }
        xml.push_str("</p:sldIdLst>");
    }

    write!(
        xml,
        r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/>"#,
        inches_to_emu(SLIDE_WIDTH_IN),
        inches_to_emu(SLIDE_HEIGHT_IN)
    )
    .map_err(xml_err)?;
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("</p:presentation>");

    Ok(xml)
}

/// Generate the XML of one slide.
pub(crate) fn slide_xml(slide: &RenderedSlide) -> Result<String> {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
        template::NS_A,
        template::NS_R,
        template::NS_P
    )
    .map_err(xml_err)?;

    xml.push_str("<p:cSld>");
    write!(
        xml,
        r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
        slide.background
    )
    .map_err(xml_err)?;

    xml.push_str("<p:spTree>");
    xml.push_str(template::SHAPE_TREE_HEADER);
    write_text_box(&mut xml, 2, "Title", &slide.title)?;
    write_text_box(&mut xml, 3, "Description", &slide.description)?;
    if let Some(ref picture) = slide.picture {
        write_picture(&mut xml, 4, "rId2", picture)?;
    }
    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");

    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");

    Ok(xml)
}

fn write_text_box(xml: &mut String, shape_id: u32, name: &str, text_box: &TextBox) -> Result<()> {
    let frame = &text_box.frame;

    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name="{} {}"/>"#, shape_id, name, shape_id).map_err(xml_err)?;
    xml.push_str(r#"<p:cNvSpPr txBox="1"/>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvSpPr>");

    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.x, frame.y).map_err(xml_err)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.cx, frame.cy).map_err(xml_err)?;
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("<a:noFill/>");
    xml.push_str("</p:spPr>");

    let mut run_props = format!(
        r#"<a:rPr lang="en-US" sz="{}""#,
        (text_box.font_size_pt * 100.0).round() as u32
    );
    if text_box.bold {
        run_props.push_str(r#" b="1""#);
    }
    run_props.push_str(r#" dirty="0"/>"#);

    xml.push_str("<p:txBody>");
    xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"/>"#);
    xml.push_str("<a:lstStyle/>");
    xml.push_str("<a:p>");
    write!(xml, r#"<a:pPr algn="{}"/>"#, text_box.alignment.as_ooxml()).map_err(xml_err)?;

    for (idx, line) in text_box.text.split('\n').enumerate() {
        if idx > 0 {
            write!(xml, "<a:br>{}</a:br>", run_props).map_err(xml_err)?;
        }
        if line.is_empty() {
            continue;
        }
        write!(xml, "<a:r>{}<a:t>{}</a:t></a:r>", run_props, escape(line)).map_err(xml_err)?;
    }

    write!(xml, "{}", run_props.replace("<a:rPr", "<a:endParaRPr")).map_err(xml_err)?;
    xml.push_str("</a:p>");
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    Ok(())
}

fn write_picture(xml: &mut String, shape_id: u32, rel_id: &str, picture: &Picture) -> Result<()> {
    let frame = &picture.frame;

    xml.push_str("<p:pic>");
    xml.push_str("<p:nvPicPr>");
    write!(
        xml,
        r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
        shape_id,
        shape_id,
        escape(picture.description.as_str())
    )
    .map_err(xml_err)?;
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvPicPr>");

    xml.push_str("<p:blipFill>");
    write!(xml, r#"<a:blip r:embed="{}"/>"#, rel_id).map_err(xml_err)?;
    xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
    xml.push_str("</p:blipFill>");

    xml.push_str("<p:spPr>");
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, frame.x, frame.y).map_err(xml_err)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, frame.cx, frame.cy).map_err(xml_err)?;
    xml.push_str("</a:xfrm>");
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");
    xml.push_str("</p:pic>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::SlideAssembler;
    use deckgen_core::{RasterImage, SlideContent, Subtopic, Topic};
    use image::DynamicImage;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn sample_deck() -> Deck {
        let slides = vec![
            SlideContent::new(
                Subtopic::new("Sun & Sky"),
                "Light <bright> energy",
                Some(RasterImage::new(DynamicImage::new_rgb8(30, 20))),
            ),
            SlideContent::new(Subtopic::new("Wind"), "Moving air", None),
        ];
        SlideAssembler::new().build(slides, &Topic::from_input("Energy"))
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn write_to_bytes(deck: &Deck) -> Vec<u8> {
        let mut buffer = Cursor::new(Vec::new());
        PackageWriter::new().write(deck, &mut buffer).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_package_parts_present() {
        let bytes = write_to_bytes(&sample_deck());
        let archive = ZipArchive::new(Cursor::new(bytes.as_slice())).unwrap();
        let names: Vec<&str> = archive.file_names().collect();

        for expected in [
            "[Content_Types].xml",
            "_rels/.rels",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/theme/theme1.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/media/image1.png",
            "docProps/core.xml",
        ] {
            assert!(names.contains(&expected), "missing {}", expected);
        }
        assert!(!names.contains(&"ppt/media/image2.png"));
    }

    #[test]
    fn test_slide_xml_contents() {
        let deck = sample_deck();
        let xml = slide_xml(&deck.slides()[0]).unwrap();

        assert!(xml.contains(r#"<a:srgbClr val="F0F8FF"/>"#));
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
        assert!(xml.contains(r#"<a:pPr algn="just"/>"#));
        assert!(xml.contains(r#"sz="2800" b="1""#));
        assert!(xml.contains(r#"sz="1600""#));
        assert!(xml.contains("Sun &amp; Sky"));
        assert!(xml.contains("Light &lt;bright&gt; energy"));
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));

        let no_picture = slide_xml(&deck.slides()[1]).unwrap();
        assert!(!no_picture.contains("<p:pic>"));
    }

    #[test]
    fn test_wrapped_lines_become_breaks() {
        let mut deck = sample_deck();
        let mut slide = deck.slides()[1].clone();
        slide.description.text = "first line\nsecond line".to_string();
        deck.add_slide(slide);

        let xml = slide_xml(&deck.slides()[2]).unwrap();
        assert!(xml.contains("<a:t>first line</a:t></a:r><a:br>"));
        assert!(xml.contains("<a:t>second line</a:t>"));
    }

    #[test]
    fn test_slide_relationships() {
        let bytes = write_to_bytes(&sample_deck());

        let rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains(r#"Target="../media/image1.png""#));

        let rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(!rels.contains("media"));

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId4"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="257" r:id="rId5"/>"#));
        assert!(presentation.contains(r#"cx="9144000" cy="6858000""#));

        let content_types = read_part(&bytes, "[Content_Types].xml");
        assert!(content_types.contains("/ppt/slides/slide2.xml"));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Energy.pptx");
        std::fs::write(&path, b"stale").unwrap();

        let saved = sample_deck().save(dir.path()).unwrap();
        assert_eq!(saved, path);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK\x03\x04"));
    }

    #[test]
    fn test_failed_save_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Energy.pptx");
        std::fs::write(&path, b"previous deck").unwrap();

        // PNG has no 32-bit float color type, so encoding the picture fails.
        let slides = vec![SlideContent::new(
            Subtopic::new("Sun"),
            "Light",
            Some(RasterImage::new(DynamicImage::new_rgba32f(4, 4))),
        )];
        let deck = SlideAssembler::new().build(slides, &Topic::from_input("Energy"));

        assert!(matches!(deck.save(dir.path()), Err(Error::ImageError(_))));
        assert_eq!(std::fs::read(&path).unwrap(), b"previous deck");
    }

    #[test]
    fn test_failed_save_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let slides = vec![SlideContent::new(
            Subtopic::new("Sun"),
            "Light",
            Some(RasterImage::new(DynamicImage::new_rgba32f(4, 4))),
        )];
        let deck = SlideAssembler::new().build(slides, &Topic::from_input("Energy"));

        assert!(deck.save(dir.path()).is_err());
        assert!(!dir.path().join("Energy.pptx").exists());
    }
}
