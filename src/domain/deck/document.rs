//! In-memory deck model.
//!
//! Coordinates and sizes are English Metric Units (914400 EMU = 1 inch).
//! The model knows nothing about any file format; serializers walk it.

/// 16:9 slide width (13.333 inches).
pub const SLIDE_WIDTH_EMU: i64 = 12_192_000;
/// 16:9 slide height (7.5 inches).
pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

/// Position and size of a block on a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Frame {
    pub const fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i64 {
        self.y + self.height
    }

    /// Largest frame of the given aspect ratio centered inside this one.
    pub fn fit_aspect(&self, ratio_w: i64, ratio_h: i64) -> Frame {
        if ratio_w <= 0 || ratio_h <= 0 {
            return *self;
        }
        let height_for_width = self.width * ratio_h / ratio_w;
        if height_for_width <= self.height {
            let y = self.y + (self.height - height_for_width) / 2;
            Frame::new(self.x, y, self.width, height_for_width)
        } else {
            let width_for_height = self.height * ratio_w / ratio_h;
            let x = self.x + (self.width - width_for_height) / 2;
            Frame::new(x, self.y, width_for_height, self.height)
        }
    }
}

/// Raster formats a deck can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Detects the format from magic bytes.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG") {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageFormat::Jpeg)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
}

/// Character and paragraph styling for a text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    /// Font size in points.
    pub size_pt: u32,
    pub bold: bool,
    /// RGB hex without '#'.
    pub color: String,
    pub align: TextAlign,
    pub bulleted: bool,
}

impl TextStyle {
    pub fn new(size_pt: u32, color: impl Into<String>) -> Self {
        Self {
            size_pt,
            bold: false,
            color: color.into(),
            align: TextAlign::Left,
            bulleted: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub fn bulleted(mut self) -> Self {
        self.bulleted = true;
        self
    }
}

/// A positioned element on a slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Filled rectangle.
    Rect { frame: Frame, fill: String },
    /// Text box; each entry is one paragraph.
    Text {
        frame: Frame,
        paragraphs: Vec<String>,
        style: TextStyle,
    },
    /// Embedded raster image.
    Image {
        frame: Frame,
        data: Vec<u8>,
        format: ImageFormat,
        description: String,
    },
    /// Box with a centered glyph, standing in for a missing image.
    Placeholder {
        frame: Frame,
        fill: String,
        glyph: String,
        color: String,
    },
}

impl Block {
    pub fn frame(&self) -> Frame {
        match self {
            Block::Rect { frame, .. }
            | Block::Text { frame, .. }
            | Block::Image { frame, .. }
            | Block::Placeholder { frame, .. } => *frame,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Block::Image { .. })
    }
}

/// What a slide is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideKind {
    Title,
    Content,
}

/// One deck slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckSlide {
    pub kind: SlideKind,
    pub title: String,
    pub blocks: Vec<Block>,
    pub notes: Option<String>,
}

impl DeckSlide {
    pub fn new(kind: SlideKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            blocks: Vec::new(),
            notes: None,
        }
    }

    pub fn push(&mut self, block: Block) -> &mut Self {
        self.blocks.push(block);
        self
    }

    pub fn images(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_image())
    }

    pub fn has_image(&self) -> bool {
        self.blocks.iter().any(Block::is_image)
    }
}

/// A complete deck: one title slide followed by content slides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDocument {
    pub title: String,
    pub subtitle: Option<String>,
    /// BCP-47 tag applied to every text run.
    pub locale: String,
    pub width: i64,
    pub height: i64,
    pub slides: Vec<DeckSlide>,
}

impl DeckDocument {
    pub fn new(title: impl Into<String>, subtitle: Option<String>, locale: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle,
            locale: locale.into(),
            width: SLIDE_WIDTH_EMU,
            height: SLIDE_HEIGHT_EMU,
            slides: Vec::new(),
        }
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn content_slide_count(&self) -> usize {
        self.slides
            .iter()
            .filter(|s| s.kind == SlideKind::Content)
            .count()
    }

    /// Number of embedded images across all slides.
    pub fn image_count(&self) -> usize {
        self.slides.iter().map(|s| s.images().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_png_and_jpeg() {
        assert_eq!(
            ImageFormat::detect(b"\x89PNG\r\n\x1a\n...."),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect(b"GIF89a"), None);
        assert_eq!(ImageFormat::detect(b""), None);
    }

    #[test]
    fn fit_aspect_letterboxes_wide_frames() {
        let frame = Frame::new(0, 0, 1600, 1600);
        let fitted = frame.fit_aspect(16, 9);
        assert_eq!(fitted, Frame::new(0, 350, 1600, 900));
    }

    #[test]
    fn fit_aspect_pillarboxes_tall_frames() {
        let frame = Frame::new(100, 0, 3200, 900);
        let fitted = frame.fit_aspect(16, 9);
        assert_eq!(fitted, Frame::new(900, 0, 1600, 900));
        assert_eq!(fitted.right(), 2500);
        assert_eq!(fitted.bottom(), 900);
    }

    #[test]
    fn counts_slides_and_images() {
        let mut deck = DeckDocument::new("Soil", None, "en-US");
        deck.slides.push(DeckSlide::new(SlideKind::Title, "Soil"));
        let mut content = DeckSlide::new(SlideKind::Content, "Layers");
        content.push(Block::Image {
            frame: Frame::new(0, 0, 10, 10),
            data: b"\x89PNG".to_vec(),
            format: ImageFormat::Png,
            description: "layers".to_string(),
        });
        deck.slides.push(content);

        assert_eq!(deck.slide_count(), 2);
        assert_eq!(deck.content_slide_count(), 1);
        assert_eq!(deck.image_count(), 1);
        assert_eq!(deck.width, SLIDE_WIDTH_EMU);
    }
}
