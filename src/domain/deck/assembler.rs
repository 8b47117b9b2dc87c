//! Deck assembler - lays out normalized lesson content as deck slides.
//!
//! Layout is fixed and deterministic. The deck always holds one title slide
//! plus one content slide per lesson slide, whatever images are available.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use super::document::{
    Block, DeckDocument, DeckSlide, Frame, ImageFormat, SlideKind, TextStyle, SLIDE_HEIGHT_EMU,
    SLIDE_WIDTH_EMU,
};
use crate::domain::lesson::{LessonContent, Slide};

const MARGIN: i64 = 457_200;
const HEADER_HEIGHT: i64 = 1_143_000;
const BODY_TOP: i64 = HEADER_HEIGHT + 304_800;
const BODY_HEIGHT: i64 = SLIDE_HEIGHT_EMU - BODY_TOP - MARGIN;
const HALF_WIDTH: i64 = SLIDE_WIDTH_EMU / 2;

/// Colors used by the layout, as RGB hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckTheme {
    pub accent: String,
    pub on_accent: String,
    pub body_text: String,
    pub placeholder_fill: String,
    pub placeholder_glyph: String,
}

impl Default for DeckTheme {
    fn default() -> Self {
        Self {
            accent: "1F4E79".to_string(),
            on_accent: "FFFFFF".to_string(),
            body_text: "1F2937".to_string(),
            placeholder_fill: "DCE6F2".to_string(),
            placeholder_glyph: "\u{1F4DA}".to_string(),
        }
    }
}

/// Builds [`DeckDocument`]s from lesson content and resolved images.
#[derive(Debug, Clone, Default)]
pub struct DeckAssembler {
    theme: DeckTheme,
    locale: String,
}

impl DeckAssembler {
    /// Sets the language tag written on text runs.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Lays out the deck.
    ///
    /// `cover` and `slide_images` are base64 payloads. `slide_images[i]`
    /// belongs to `content.slides[i]`; missing entries, undecodable payloads
    /// and formats other than PNG or JPEG are treated as absent.
    pub fn build(
        &self,
        content: &LessonContent,
        cover: Option<&str>,
        slide_images: &[Option<String>],
    ) -> DeckDocument {
        let locale = if self.locale.is_empty() {
            "en-US"
        } else {
            self.locale.as_str()
        };
        let mut deck = DeckDocument::new(&content.title, content.subtitle.clone(), locale);

        deck.slides.push(self.title_slide(content, cover.and_then(decode_image)));
        for (index, slide) in content.slides.iter().enumerate() {
            let image = slide_images
                .get(index)
                .and_then(|payload| payload.as_deref())
                .and_then(decode_image);
            deck.slides.push(self.content_slide(slide, image));
        }

        deck
    }

    fn title_slide(&self, content: &LessonContent, cover: Option<DecodedImage>) -> DeckSlide {
        let theme = &self.theme;
        let mut slide = DeckSlide::new(SlideKind::Title, &content.title);

        slide.push(Block::Rect {
            frame: Frame::new(0, 0, HALF_WIDTH, SLIDE_HEIGHT_EMU),
            fill: theme.accent.clone(),
        });
        slide.push(Block::Text {
            frame: Frame::new(MARGIN, 1_828_800, HALF_WIDTH - 2 * MARGIN, 1_828_800),
            paragraphs: vec![content.title.clone()],
            style: TextStyle::new(40, &theme.on_accent).bold(),
        });
        if let Some(subtitle) = &content.subtitle {
            slide.push(Block::Text {
                frame: Frame::new(MARGIN, 3_810_000, HALF_WIDTH - 2 * MARGIN, 1_143_000),
                paragraphs: vec![subtitle.clone()],
                style: TextStyle::new(20, &theme.on_accent),
            });
        }

        let panel = Frame::new(
            HALF_WIDTH + MARGIN,
            MARGIN,
            HALF_WIDTH - 2 * MARGIN,
            SLIDE_HEIGHT_EMU - 2 * MARGIN,
        )
        .fit_aspect(16, 9);
        match cover {
            Some(image) => {
                slide.push(Block::Image {
                    frame: panel,
                    data: image.data,
                    format: image.format,
                    description: content.title.clone(),
                });
            }
            None => {
                slide.push(Block::Placeholder {
                    frame: panel,
                    fill: theme.placeholder_fill.clone(),
                    glyph: theme.placeholder_glyph.clone(),
                    color: theme.accent.clone(),
                });
            }
        }

        slide
    }

    fn content_slide(&self, lesson_slide: &Slide, image: Option<DecodedImage>) -> DeckSlide {
        let theme = &self.theme;
        let mut slide = DeckSlide::new(SlideKind::Content, &lesson_slide.title);

        slide.push(Block::Rect {
            frame: Frame::new(0, 0, SLIDE_WIDTH_EMU, HEADER_HEIGHT),
            fill: theme.accent.clone(),
        });
        slide.push(Block::Text {
            frame: Frame::new(MARGIN, 228_600, SLIDE_WIDTH_EMU - 2 * MARGIN, 685_800),
            paragraphs: vec![lesson_slide.title.clone()],
            style: TextStyle::new(30, &theme.on_accent).bold(),
        });

        let (bullet_frame, bullet_size) = match image {
            Some(_) => (Frame::new(MARGIN, BODY_TOP, HALF_WIDTH - MARGIN, BODY_HEIGHT), 18),
            None => (
                Frame::new(MARGIN, BODY_TOP, SLIDE_WIDTH_EMU - 2 * MARGIN, BODY_HEIGHT),
                22,
            ),
        };
        slide.push(Block::Text {
            frame: bullet_frame,
            paragraphs: lesson_slide.content.clone(),
            style: TextStyle::new(bullet_size, &theme.body_text).bulleted(),
        });

        if let Some(image) = image {
            let frame = Frame::new(
                HALF_WIDTH + MARGIN / 2,
                BODY_TOP,
                HALF_WIDTH - MARGIN - MARGIN / 2,
                BODY_HEIGHT,
            )
            .fit_aspect(16, 9);
            slide.push(Block::Image {
                frame,
                data: image.data,
                format: image.format,
                description: lesson_slide.image_prompt.clone(),
            });
        }

        if lesson_slide.has_notes() {
            slide.notes = Some(lesson_slide.speaker_notes.trim().to_string());
        }

        slide
    }
}

struct DecodedImage {
    data: Vec<u8>,
    format: ImageFormat,
}

/// Decodes a base64 payload, accepting an optional data-URL prefix.
fn decode_image(payload: &str) -> Option<DecodedImage> {
    let payload = payload.trim();
    let encoded = match payload.find("base64,") {
        Some(index) if payload.starts_with("data:") => &payload[index + "base64,".len()..],
        _ => payload,
    };
    let data = STANDARD.decode(encoded).ok()?;
    let format = ImageFormat::detect(&data)?;
    Some(DecodedImage { data, format })
}
