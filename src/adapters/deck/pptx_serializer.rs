//! PPTX Serializer - DeckSerializer producing an Office Open XML presentation.
//!
//! Every part is written as a string with `write!` and then stored in a zip
//! archive built in memory. Text runs carry the deck locale so spell checking
//! and font fallback pick the right language.

use chrono::{DateTime, Utc};
use std::fmt::Write as _;
use std::io::{Cursor, Write as _};
use zip::write::{SimpleFileOptions, ZipWriter};

use super::pptx_templates::*;
use crate::domain::deck::{Block, DeckDocument, DeckSlide, Frame, TextAlign, TextStyle};
use crate::ports::{DeckSerializer, SerializeError};

const NOTES_WIDTH_EMU: i64 = 6_858_000;
const NOTES_HEIGHT_EMU: i64 = 9_144_000;
const FIRST_SLIDE_ID: usize = 256;
/// presentation.xml.rels ids before the first slide.
const FIXED_PRESENTATION_RELS: usize = 6;
const BULLET_INDENT_EMU: i64 = 342_900;
const TEXT_INSET_EMU: i64 = 91_440;

/// Escape XML special characters and drop characters XML 1.0 cannot carry.
fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            c if (c as u32) < 0x20 || c == '\u{FFFE}' || c == '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

/// Font for complex scripts, keyed by locale.
fn complex_script_font(locale: &str) -> Option<&'static str> {
    if locale.to_ascii_lowercase().starts_with("hi") {
        Some("Nirmala UI")
    } else {
        None
    }
}

fn archive_error(err: zip::result::ZipError) -> SerializeError {
    SerializeError::Archive(err.to_string())
}

struct Relationship {
    id: String,
    kind: &'static str,
    target: String,
}

impl Relationship {
    fn new(index: usize, kind: &'static str, target: impl Into<String>) -> Self {
        Self {
            id: format!("rId{}", index),
            kind,
            target: target.into(),
        }
    }
}

fn relationships_xml(rels: &[Relationship]) -> Result<String, SerializeError> {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECLARATION);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            rel.kind,
            escape_xml(&rel.target)
        )?;
    }
    xml.push_str("</Relationships>");
    Ok(xml)
}

/// An image part referenced from a slide.
struct MediaPart<'a> {
    file_name: String,
    data: &'a [u8],
}

/// Rendered XML for one slide and its optional notes page.
struct SlideParts {
    slide: String,
    slide_rels: String,
    notes: Option<String>,
}

/// Serializer for `.pptx` files.
#[derive(Debug, Clone, Default)]
pub struct PptxSerializer {
    created: Option<DateTime<Utc>>,
}

impl PptxSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the creation timestamp written to `docProps/core.xml`.
    pub fn with_timestamp(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    fn content_types_xml(deck: &DeckDocument) -> Result<String, SerializeError> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECLARATION);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        write!(xml, r#"<Default Extension="rels" ContentType="{}"/>"#, CT_RELS)?;
        xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
        xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
        xml.push_str(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#);

        let fixed = [
            ("/ppt/presentation.xml", CT_PRESENTATION),
            ("/ppt/slideMasters/slideMaster1.xml", CT_SLIDE_MASTER),
            ("/ppt/slideLayouts/slideLayout1.xml", CT_SLIDE_LAYOUT),
            ("/ppt/notesMasters/notesMaster1.xml", CT_NOTES_MASTER),
            ("/ppt/theme/theme1.xml", CT_THEME),
            ("/ppt/theme/theme2.xml", CT_THEME),
            ("/ppt/presProps.xml", CT_PRES_PROPS),
            ("/ppt/viewProps.xml", CT_VIEW_PROPS),
            ("/ppt/tableStyles.xml", CT_TABLE_STYLES),
            ("/docProps/core.xml", CT_CORE),
            ("/docProps/app.xml", CT_APP),
        ];
        for (part, content_type) in fixed {
            write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, content_type
            )?;
        }

        for (i, slide) in deck.slides.iter().enumerate() {
            let n = i + 1;
            write!(
                xml,
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}"/>"#,
                n, CT_SLIDE
            )?;
            if slide.notes.is_some() {
                write!(
                    xml,
                    r#"<Override PartName="/ppt/notesSlides/notesSlide{}.xml" ContentType="{}"/>"#,
                    n, CT_NOTES_SLIDE
                )?;
            }
        }
        xml.push_str("</Types>");
        Ok(xml)
    }

    fn presentation_xml(deck: &DeckDocument) -> Result<String, SerializeError> {
        let mut xml = String::with_capacity(1024 + deck.slides.len() * 64);
        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            NS_A, NS_R, NS_P
        )?;
        xml.push_str(
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#,
        );
        xml.push_str(r#"<p:notesMasterIdLst><p:notesMasterId r:id="rId2"/></p:notesMasterIdLst>"#);
        xml.push_str("<p:sldIdLst>");
        for i in 0..deck.slides.len() {
            write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                FIRST_SLIDE_ID + i,
                FIXED_PRESENTATION_RELS + 1 + i
            )?;
        }
        xml.push_str("</p:sldIdLst>");
        write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, deck.width, deck.height)?;
        write!(
            xml,
            r#"<p:notesSz cx="{}" cy="{}"/>"#,
            NOTES_WIDTH_EMU, NOTES_HEIGHT_EMU
        )?;
        xml.push_str("</p:presentation>");
        Ok(xml)
    }

    fn presentation_rels_xml(deck: &DeckDocument) -> Result<String, SerializeError> {
        let mut rels = vec![
            Relationship::new(1, REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
            Relationship::new(2, REL_NOTES_MASTER, "notesMasters/notesMaster1.xml"),
            Relationship::new(3, REL_THEME, "theme/theme1.xml"),
            Relationship::new(4, REL_PRES_PROPS, "presProps.xml"),
            Relationship::new(5, REL_VIEW_PROPS, "viewProps.xml"),
            Relationship::new(6, REL_TABLE_STYLES, "tableStyles.xml"),
        ];
        for i in 0..deck.slides.len() {
            rels.push(Relationship::new(
                FIXED_PRESENTATION_RELS + 1 + i,
                REL_SLIDE,
                format!("slides/slide{}.xml", i + 1),
            ));
        }
        relationships_xml(&rels)
    }

    fn core_xml(&self, deck: &DeckDocument) -> Result<String, SerializeError> {
        let created = self
            .created
            .unwrap_or_else(Utc::now)
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        xml.push_str(concat!(
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#
        ));
        write!(xml, "<dc:title>{}</dc:title>", escape_xml(&deck.title))?;
        if let Some(subtitle) = &deck.subtitle {
            write!(xml, "<dc:subject>{}</dc:subject>", escape_xml(subtitle))?;
        }
        xml.push_str("<dc:creator>lesson-deck</dc:creator>");
        write!(xml, "<dc:language>{}</dc:language>", escape_xml(&deck.locale))?;
        write!(
            xml,
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{0}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{0}</dcterms:modified>"#,
            created
        )?;
        xml.push_str("</cp:coreProperties>");
        Ok(xml)
    }

    fn app_xml(deck: &DeckDocument) -> Result<String, SerializeError> {
        let notes = deck.slides.iter().filter(|s| s.notes.is_some()).count();
        let mut xml = String::with_capacity(512);
        xml.push_str(XML_DECLARATION);
        xml.push_str(concat!(
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#
        ));
        xml.push_str("<Application>lesson-deck</Application>");
        xml.push_str("<PresentationFormat>Widescreen</PresentationFormat>");
        write!(xml, "<Slides>{}</Slides>", deck.slides.len())?;
        write!(xml, "<Notes>{}</Notes>", notes)?;
        xml.push_str("</Properties>");
        Ok(xml)
    }

    fn write_xfrm(xml: &mut String, frame: &Frame) -> Result<(), SerializeError> {
        write!(
            xml,
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            frame.x, frame.y, frame.width, frame.height
        )?;
        Ok(())
    }

    fn write_run_properties(
        xml: &mut String,
        style: &TextStyle,
        locale: &str,
    ) -> Result<(), SerializeError> {
        write!(
            xml,
            r#"<a:rPr lang="{}" sz="{}""#,
            escape_xml(locale),
            style.size_pt * 100
        )?;
        if style.bold {
            xml.push_str(r#" b="1""#);
        }
        xml.push_str(r#" dirty="0">"#);
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            style.color
        )?;
        xml.push_str(r#"<a:latin typeface="Calibri"/>"#);
        if let Some(font) = complex_script_font(locale) {
            write!(xml, r#"<a:cs typeface="{}"/>"#, font)?;
        }
        xml.push_str("</a:rPr>");
        Ok(())
    }

    fn write_paragraph(
        xml: &mut String,
        text: &str,
        style: &TextStyle,
        locale: &str,
    ) -> Result<(), SerializeError> {
        let align = match style.align {
            TextAlign::Left => "l",
            TextAlign::Center => "ctr",
        };
        xml.push_str("<a:p>");
        if style.bulleted {
            write!(
                xml,
                r#"<a:pPr marL="{0}" indent="-{0}" algn="{1}"><a:spcBef><a:spcPts val="600"/></a:spcBef><a:buFont typeface="Arial"/><a:buChar char="•"/></a:pPr>"#,
                BULLET_INDENT_EMU, align
            )?;
        } else {
            write!(xml, r#"<a:pPr algn="{}"><a:buNone/></a:pPr>"#, align)?;
        }
        if !text.is_empty() {
            xml.push_str("<a:r>");
            Self::write_run_properties(xml, style, locale)?;
            write!(xml, "<a:t>{}</a:t>", escape_xml(text))?;
            xml.push_str("</a:r>");
        }
        write!(
            xml,
            r#"<a:endParaRPr lang="{}" sz="{}" dirty="0"/>"#,
            escape_xml(locale),
            style.size_pt * 100
        )?;
        xml.push_str("</a:p>");
        Ok(())
    }

    fn write_rect(xml: &mut String, id: usize, frame: &Frame, fill: &str) -> Result<(), SerializeError> {
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="Rectangle {0}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#,
            id
        )?;
        Self::write_xfrm(xml, frame)?;
        write!(
            xml,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:ln><a:noFill/></a:ln>"#,
            fill
        )?;
        xml.push_str("</p:spPr></p:sp>");
        Ok(())
    }

    fn write_text(
        xml: &mut String,
        id: usize,
        frame: &Frame,
        paragraphs: &[String],
        style: &TextStyle,
        locale: &str,
    ) -> Result<(), SerializeError> {
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="TextBox {0}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>"#,
            id
        )?;
        Self::write_xfrm(xml, frame)?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>"#);
        write!(
            xml,
            r#"<p:txBody><a:bodyPr wrap="square" lIns="{0}" tIns="{0}" rIns="{0}" bIns="{0}" anchor="t"><a:normAutofit/></a:bodyPr><a:lstStyle/>"#,
            TEXT_INSET_EMU
        )?;
        if paragraphs.is_empty() {
            Self::write_paragraph(xml, "", style, locale)?;
        }
        for paragraph in paragraphs {
            Self::write_paragraph(xml, paragraph, style, locale)?;
        }
        xml.push_str("</p:txBody></p:sp>");
        Ok(())
    }

    fn write_picture(
        xml: &mut String,
        id: usize,
        frame: &Frame,
        rel_id: &str,
        description: &str,
    ) -> Result<(), SerializeError> {
        write!(
            xml,
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{0}" name="Picture {0}" descr="{1}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#,
            id,
            escape_xml(description)
        )?;
        write!(
            xml,
            r#"<p:blipFill><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>"#,
            rel_id
        )?;
        Self::write_xfrm(xml, frame)?;
        xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);
        Ok(())
    }

    fn write_placeholder(
        xml: &mut String,
        id: usize,
        frame: &Frame,
        fill: &str,
        glyph: &str,
        color: &str,
        locale: &str,
    ) -> Result<(), SerializeError> {
        write!(
            xml,
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{0}" name="Image Placeholder {0}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>"#,
            id
        )?;
        Self::write_xfrm(xml, frame)?;
        write!(
            xml,
            r#"<a:prstGeom prst="roundRect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:ln><a:noFill/></a:ln></p:spPr>"#,
            fill
        )?;
        xml.push_str(r#"<p:txBody><a:bodyPr anchor="ctr"/><a:lstStyle/>"#);
        let style = TextStyle::new(72, color).centered();
        Self::write_paragraph(xml, glyph, &style, locale)?;
        xml.push_str("</p:txBody></p:sp>");
        Ok(())
    }

    /// Renders a slide, registering its images in `media`.
    fn slide_parts<'a>(
        slide: &'a DeckSlide,
        slide_no: usize,
        locale: &str,
        media: &mut Vec<MediaPart<'a>>,
    ) -> Result<SlideParts, SerializeError> {
        let mut rels = vec![Relationship::new(
            1,
            REL_SLIDE_LAYOUT,
            "../slideLayouts/slideLayout1.xml",
        )];

        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>"#,
            NS_A, NS_R, NS_P
        )?;
        xml.push_str(SP_TREE_HEADER);

        for (i, block) in slide.blocks.iter().enumerate() {
            let shape_id = i + 2;
            match block {
                Block::Rect { frame, fill } => Self::write_rect(&mut xml, shape_id, frame, fill)?,
                Block::Text {
                    frame,
                    paragraphs,
                    style,
                } => Self::write_text(&mut xml, shape_id, frame, paragraphs, style, locale)?,
                Block::Image {
                    frame,
                    data,
                    format,
                    description,
                } => {
                    let file_name = format!("image{}.{}", media.len() + 1, format.extension());
                    let rel = Relationship::new(
                        rels.len() + 1,
                        REL_IMAGE,
                        format!("../media/{}", file_name),
                    );
                    Self::write_picture(&mut xml, shape_id, frame, &rel.id, description)?;
                    rels.push(rel);
                    media.push(MediaPart {
                        file_name,
                        data: data.as_slice(),
                    });
                }
                Block::Placeholder {
                    frame,
                    fill,
                    glyph,
                    color,
                } => Self::write_placeholder(&mut xml, shape_id, frame, fill, glyph, color, locale)?,
            }
        }

        xml.push_str("</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>");

        let notes = match &slide.notes {
            Some(text) => {
                rels.push(Relationship::new(
                    rels.len() + 1,
                    REL_NOTES_SLIDE,
                    format!("../notesSlides/notesSlide{}.xml", slide_no),
                ));
                Some(Self::notes_xml(text, locale)?)
            }
            None => None,
        };

        Ok(SlideParts {
            slide: xml,
            slide_rels: relationships_xml(&rels)?,
            notes,
        })
    }

    fn notes_xml(text: &str, locale: &str) -> Result<String, SerializeError> {
        let mut xml = String::with_capacity(2048);
        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<p:notes xmlns:a="{}" xmlns:r="{}" xmlns:p="{}"><p:cSld><p:spTree>"#,
            NS_A, NS_R, NS_P
        )?;
        xml.push_str(SP_TREE_HEADER);
        xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Slide Image Placeholder 1"/><p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr>"#);
        Self::write_xfrm(&mut xml, &Frame::new(1_143_000, 685_800, 4_572_000, 2_571_750))?;
        xml.push_str("</p:spPr></p:sp>");
        xml.push_str(r#"<p:sp><p:nvSpPr><p:cNvPr id="3" name="Notes Placeholder 2"/><p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr>"#);
        Self::write_xfrm(&mut xml, &Frame::new(685_800, 3_429_000, 5_486_400, 4_114_800))?;
        xml.push_str("</p:spPr><p:txBody><a:bodyPr/><a:lstStyle/>");
        let style = TextStyle::new(12, "000000");
        for line in text.lines().filter(|l| !l.trim().is_empty()) {
            Self::write_paragraph(&mut xml, line.trim(), &style, locale)?;
        }
        if text.trim().is_empty() {
            Self::write_paragraph(&mut xml, "", &style, locale)?;
        }
        xml.push_str("</p:txBody></p:sp></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:notes>");
        Ok(xml)
    }

    fn notes_rels_xml(slide_no: usize) -> Result<String, SerializeError> {
        relationships_xml(&[
            Relationship::new(1, REL_NOTES_MASTER, "../notesMasters/notesMaster1.xml"),
            Relationship::new(2, REL_SLIDE, format!("../slides/slide{}.xml", slide_no)),
        ])
    }
}

/// In-memory zip package.
struct Package {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    xml_options: SimpleFileOptions,
    media_options: SimpleFileOptions,
}

impl Package {
    fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            xml_options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated),
            media_options: SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Stored),
        }
    }

    fn add_xml(&mut self, path: &str, content: &str) -> Result<(), SerializeError> {
        self.zip
            .start_file(path, self.xml_options)
            .map_err(archive_error)?;
        self.zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn add_media(&mut self, path: &str, data: &[u8]) -> Result<(), SerializeError> {
        self.zip
            .start_file(path, self.media_options)
            .map_err(archive_error)?;
        self.zip.write_all(data)?;
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, SerializeError> {
        Ok(self.zip.finish().map_err(archive_error)?.into_inner())
    }
}

impl DeckSerializer for PptxSerializer {
    fn serialize(&self, deck: &DeckDocument) -> Result<Vec<u8>, SerializeError> {
        let mut package = Package::new();

        package.add_xml("[Content_Types].xml", &Self::content_types_xml(deck)?)?;
        package.add_xml("_rels/.rels", &root_rels_xml())?;
        package.add_xml("docProps/core.xml", &self.core_xml(deck)?)?;
        package.add_xml("docProps/app.xml", &Self::app_xml(deck)?)?;
        package.add_xml("ppt/presentation.xml", &Self::presentation_xml(deck)?)?;
        package.add_xml(
            "ppt/_rels/presentation.xml.rels",
            &Self::presentation_rels_xml(deck)?,
        )?;
        package.add_xml("ppt/presProps.xml", &pres_props_xml())?;
        package.add_xml("ppt/viewProps.xml", &view_props_xml())?;
        package.add_xml("ppt/tableStyles.xml", &table_styles_xml())?;

        package.add_xml("ppt/slideMasters/slideMaster1.xml", &slide_master_xml())?;
        package.add_xml(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &relationships_xml(&[
                Relationship::new(1, REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                Relationship::new(2, REL_THEME, "../theme/theme1.xml"),
            ])?,
        )?;
        package.add_xml("ppt/slideLayouts/slideLayout1.xml", &slide_layout_xml())?;
        package.add_xml(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &relationships_xml(&[Relationship::new(
                1,
                REL_SLIDE_MASTER,
                "../slideMasters/slideMaster1.xml",
            )])?,
        )?;
        package.add_xml("ppt/notesMasters/notesMaster1.xml", &notes_master_xml())?;
        package.add_xml(
            "ppt/notesMasters/_rels/notesMaster1.xml.rels",
            &relationships_xml(&[Relationship::new(1, REL_THEME, "../theme/theme2.xml")])?,
        )?;
        package.add_xml("ppt/theme/theme1.xml", &theme_xml("Lesson Theme"))?;
        package.add_xml("ppt/theme/theme2.xml", &theme_xml("Lesson Notes Theme"))?;

        let mut media = Vec::new();
        for (i, slide) in deck.slides.iter().enumerate() {
            let slide_no = i + 1;
            let parts = Self::slide_parts(slide, slide_no, &deck.locale, &mut media)?;
            package.add_xml(&format!("ppt/slides/slide{}.xml", slide_no), &parts.slide)?;
            package.add_xml(
                &format!("ppt/slides/_rels/slide{}.xml.rels", slide_no),
                &parts.slide_rels,
            )?;
            if let Some(notes) = parts.notes {
                package.add_xml(
                    &format!("ppt/notesSlides/notesSlide{}.xml", slide_no),
                    &notes,
                )?;
                package.add_xml(
                    &format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", slide_no),
                    &Self::notes_rels_xml(slide_no)?,
                )?;
            }
        }

        for part in &media {
            package.add_media(&format!("ppt/media/{}", part.file_name), part.data)?;
        }

        let bytes = package.finish()?;
        tracing::debug!(
            slides = deck.slides.len(),
            media = media.len(),
            bytes = bytes.len(),
            "pptx package written"
        );
        Ok(bytes)
    }

    fn mime_type(&self) -> &'static str {
        PPTX_MIME_TYPE
    }

    fn extension(&self) -> &'static str {
        "pptx"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::deck::{ImageFormat, SlideKind};
    use chrono::TimeZone;
    use std::io::Read;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];

    fn image(format: ImageFormat, data: &[u8]) -> Block {
        Block::Image {
            frame: Frame::new(6_096_000, 1_300_000, 5_500_000, 3_093_750),
            data: data.to_vec(),
            format,
            description: "A leaf in \"sunlight\"".to_string(),
        }
    }

    fn sample_deck() -> DeckDocument {
        let mut deck = DeckDocument::new(
            "Plants & Light",
            Some("How <leaves> work".to_string()),
            "en-US",
        );

        let mut title = DeckSlide::new(SlideKind::Title, "Plants & Light");
        title.push(Block::Rect {
            frame: Frame::new(0, 0, 6_096_000, 6_858_000),
            fill: "1F4E79".to_string(),
        });
        title.push(Block::Text {
            frame: Frame::new(500_000, 2_000_000, 5_000_000, 1_200_000),
            paragraphs: vec!["Plants & Light".to_string()],
            style: TextStyle::new(40, "FFFFFF").bold(),
        });
        title.push(image(ImageFormat::Png, PNG));
        deck.slides.push(title);

        let mut first = DeckSlide::new(SlideKind::Content, "Leaves");
        first.push(Block::Text {
            frame: Frame::new(500_000, 1_300_000, 5_400_000, 5_000_000),
            paragraphs: vec!["Leaves catch light".to_string(), "Roots drink water".to_string()],
            style: TextStyle::new(18, "1F2937").bulleted(),
        });
        first.push(image(ImageFormat::Jpeg, JPEG));
        first.notes = Some("Ask students what leaves need.".to_string());
        deck.slides.push(first);

        let mut second = DeckSlide::new(SlideKind::Content, "Review");
        second.push(Block::Placeholder {
            frame: Frame::new(6_096_000, 1_300_000, 5_500_000, 3_093_750),
            fill: "DCE6F2".to_string(),
            glyph: "📚".to_string(),
            color: "1F4E79".to_string(),
        });
        deck.slides.push(second);
        deck
    }

    fn open(bytes: Vec<u8>) -> zip::ZipArchive<Cursor<Vec<u8>>> {
        zip::ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    fn read_part(archive: &mut zip::ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn names(archive: &zip::ZipArchive<Cursor<Vec<u8>>>) -> Vec<String> {
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn escape_xml_handles_markup_and_control_chars() {
        assert_eq!(escape_xml("a & b < c > \"d\" 'e'"), "a &amp; b &lt; c &gt; &quot;d&quot; &apos;e&apos;");
        assert_eq!(escape_xml("bell\u{7}tab\t"), "belltab\t");
        assert_eq!(escape_xml("प्रकाश"), "प्रकाश");
    }

    #[test]
    fn package_contains_required_parts() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let archive = open(bytes);
        let names = names(&archive);
        for required in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/core.xml",
            "docProps/app.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/notesMasters/notesMaster1.xml",
            "ppt/theme/theme1.xml",
            "ppt/theme/theme2.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/slide3.xml",
            "ppt/notesSlides/notesSlide2.xml",
            "ppt/media/image1.png",
            "ppt/media/image2.jpeg",
        ] {
            assert!(names.iter().any(|n| n == required), "missing {}", required);
        }
        assert!(!names.iter().any(|n| n == "ppt/notesSlides/notesSlide1.xml"));
    }

    #[test]
    fn presentation_lists_every_slide() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let mut archive = open(bytes);
        let presentation = read_part(&mut archive, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);
        assert!(presentation.contains(r#"<p:sldId id="256" r:id="rId7"/>"#));
        assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));

        let rels = read_part(&mut archive, "ppt/_rels/presentation.xml.rels");
        assert!(rels.contains(r#"Id="rId9""#));
        assert!(rels.contains(r#"Target="slides/slide3.xml""#));
    }

    #[test]
    fn slide_xml_escapes_text_and_embeds_images() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let mut archive = open(bytes);

        let title = read_part(&mut archive, "ppt/slides/slide1.xml");
        assert!(title.contains("<a:t>Plants &amp; Light</a:t>"));
        assert!(title.contains(r#"sz="4000" b="1""#));
        assert!(title.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(title.contains(r#"descr="A leaf in &quot;sunlight&quot;""#));

        let rels = read_part(&mut archive, "ppt/slides/_rels/slide1.xml.rels");
        assert!(rels.contains(r#"Target="../media/image1.png""#));
        assert!(rels.contains(r#"Target="../slideLayouts/slideLayout1.xml""#));
    }

    #[test]
    fn bullets_carry_locale_and_bullet_char() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let mut archive = open(bytes);
        let slide = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert_eq!(slide.matches(r#"<a:buChar char="•"/>"#).count(), 2);
        assert!(slide.contains(r#"lang="en-US""#));

        let rels = read_part(&mut archive, "ppt/slides/_rels/slide2.xml.rels");
        assert!(rels.contains("../media/image2.jpeg"));
        assert!(rels.contains("../notesSlides/notesSlide2.xml"));

        let notes = read_part(&mut archive, "ppt/notesSlides/notesSlide2.xml");
        assert!(notes.contains("Ask students what leaves need."));
    }

    #[test]
    fn placeholder_is_a_shape_not_a_picture() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let mut archive = open(bytes);
        let slide = read_part(&mut archive, "ppt/slides/slide3.xml");
        assert!(!slide.contains("<p:pic>"));
        assert!(slide.contains("📚"));
        assert!(slide.contains(r#"prst="roundRect""#));
    }

    #[test]
    fn content_types_cover_slides_and_notes() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let mut archive = open(bytes);
        let types = read_part(&mut archive, "[Content_Types].xml");
        assert_eq!(types.matches("/ppt/slides/slide").count(), 3);
        assert_eq!(types.matches("/ppt/notesSlides/notesSlide").count(), 1);
        assert!(types.contains(r#"Extension="png""#));
    }

    #[test]
    fn core_properties_use_pinned_timestamp() {
        let created = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let bytes = PptxSerializer::new()
            .with_timestamp(created)
            .serialize(&sample_deck())
            .unwrap();
        let mut archive = open(bytes);
        let core = read_part(&mut archive, "docProps/core.xml");
        assert!(core.contains("2024-03-01T09:30:00Z"));
        assert!(core.contains("<dc:title>Plants &amp; Light</dc:title>"));
        assert!(core.contains("<dc:subject>How &lt;leaves&gt; work</dc:subject>"));

        let app = read_part(&mut archive, "docProps/app.xml");
        assert!(app.contains("<Slides>3</Slides>"));
        assert!(app.contains("<Notes>1</Notes>"));
    }

    #[test]
    fn hindi_runs_get_complex_script_font() {
        let mut deck = sample_deck();
        deck.locale = "hi-IN".to_string();
        let bytes = PptxSerializer::new().serialize(&deck).unwrap();
        let mut archive = open(bytes);
        let slide = read_part(&mut archive, "ppt/slides/slide2.xml");
        assert!(slide.contains(r#"lang="hi-IN""#));
        assert!(slide.contains(r#"<a:cs typeface="Nirmala UI"/>"#));
    }

    #[test]
    fn media_bytes_are_stored_verbatim() {
        let bytes = PptxSerializer::new().serialize(&sample_deck()).unwrap();
        let mut archive = open(bytes);
        let mut file = archive.by_name("ppt/media/image1.png").unwrap();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        assert_eq!(data, PNG);
    }

    #[test]
    fn empty_deck_still_serializes() {
        let deck = DeckDocument::new("Empty", None, "en-US");
        let bytes = PptxSerializer::new().serialize(&deck).unwrap();
        let mut archive = open(bytes);
        let presentation = read_part(&mut archive, "ppt/presentation.xml");
        assert!(presentation.contains("<p:sldIdLst></p:sldIdLst>"));
    }

    #[test]
    fn reports_pptx_mime_type() {
        let serializer = PptxSerializer::new();
        assert_eq!(serializer.extension(), "pptx");
        assert!(serializer.mime_type().ends_with("presentationml.presentation"));
    }
}
