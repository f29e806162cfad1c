//! Positioned, styled text as delivered by the extraction layer.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Axis-aligned bounding box in page coordinates (origin top-left, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Vertical center of the box.
    pub fn center_y(&self) -> f32 {
        (self.y0 + self.y1) / 2.0
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Check whether two boxes overlap.
    pub fn intersects(&self, other: &BBox) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }
}

impl From<[f32; 4]> for BBox {
    fn from(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}

/// Packed sRGB color (`0xRRGGBB`), serialized as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Rgb(u32);

impl Rgb {
    /// Black, the usual body text color.
    pub const BLACK: Rgb = Rgb(0);

    /// Create a color from red, green and blue components.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Red, green and blue components.
    pub fn components(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }

    /// The packed value.
    pub fn packed(&self) -> u32 {
        self.0
    }
}

impl From<u32> for Rgb {
    fn from(v: u32) -> Self {
        Rgb(v & 0x00FF_FFFF)
    }
}

impl From<Rgb> for u32 {
    fn from(c: Rgb) -> Self {
        c.0
    }
}

bitflags! {
    /// Style bits reported by the extraction layer for a span.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u32 {
        /// Bit 0: superscript (detected by the extractor, not a font property)
        const SUPERSCRIPT = 1 << 0;
        /// Bit 1: italic
        const ITALIC = 1 << 1;
        /// Bit 2: serifed
        const SERIF = 1 << 2;
        /// Bit 3: monospaced
        const MONOSPACE = 1 << 3;
        /// Bit 4: bold
        const BOLD = 1 << 4;
    }
}

impl Serialize for StyleFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for StyleFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(StyleFlags::from_bits_truncate(bits))
    }
}

/// The smallest unit of styled text from the extraction layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyledFragment {
    /// The text content
    pub text: String,
    /// Bounding box on the page
    pub bbox: BBox,
    /// Font name (e.g., "Calibri-Bold")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color
    pub color: Rgb,
    /// Raw style flags
    pub flags: StyleFlags,
}

impl StyledFragment {
    /// Create a fragment with default color, flags and an empty box.
    pub fn new(text: impl Into<String>, font_name: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            bbox: BBox::default(),
            font_name: font_name.into(),
            font_size,
            color: Rgb::BLACK,
            flags: StyleFlags::empty(),
        }
    }

    /// Set the bounding box.
    pub fn with_bbox(mut self, bbox: BBox) -> Self {
        self.bbox = bbox;
        self
    }

    /// Set the color.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Set the style flags.
    pub fn with_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Whether the fragment carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn is_bold(&self) -> bool {
        self.flags.contains(StyleFlags::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.flags.contains(StyleFlags::ITALIC)
    }
}

/// Fragments sharing a visual line, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    pub fragments: Vec<StyledFragment>,
}

impl TextLine {
    /// Create a line from fragments.
    pub fn new(fragments: Vec<StyledFragment>) -> Self {
        Self { fragments }
    }

    /// Concatenated fragment text.
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }

    /// First fragment with visible text.
    pub fn first_visible(&self) -> Option<&StyledFragment> {
        self.fragments.iter().find(|f| !f.is_blank())
    }

    /// Union of all fragment boxes.
    pub fn bbox(&self) -> Option<BBox> {
        let mut iter = self.fragments.iter();
        let first = iter.next()?.bbox;
        Some(iter.fold(first, |acc, f| acc.union(&f.bbox)))
    }

    /// Check if the line has no visible text.
    pub fn is_blank(&self) -> bool {
        self.fragments.iter().all(StyledFragment::is_blank)
    }
}

/// Lines sharing a visual region (paragraph, contact block, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub lines: Vec<TextLine>,
}

impl TextBlock {
    /// Create a block from lines.
    pub fn new(lines: Vec<TextLine>) -> Self {
        Self { lines }
    }

    /// Line texts joined with newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterate all fragments of the block in reading order.
    pub fn fragments(&self) -> impl Iterator<Item = &StyledFragment> {
        self.lines.iter().flat_map(|l| l.fragments.iter())
    }

    /// Check if the block is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(TextLine::is_blank)
    }
}

/// A hyperlink annotation on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub uri: String,
    pub bbox: BBox,
}

impl Hyperlink {
    pub fn new(uri: impl Into<String>, bbox: BBox) -> Self {
        Self {
            uri: uri.into(),
            bbox,
        }
    }
}

/// Everything the inference pass needs about one page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,
    /// Text blocks in reading order
    pub blocks: Vec<TextBlock>,
    /// Hyperlink annotations
    pub links: Vec<Hyperlink>,
}

impl PageContent {
    /// Create a page from blocks.
    pub fn new(number: u32, blocks: Vec<TextBlock>) -> Self {
        Self {
            number,
            blocks,
            links: Vec::new(),
        }
    }

    /// Attach hyperlink annotations.
    pub fn with_links(mut self, links: Vec<Hyperlink>) -> Self {
        self.links = links;
        self
    }

    /// Iterate all fragments of the page in reading order.
    pub fn fragments(&self) -> impl Iterator<Item = &StyledFragment> {
        self.blocks.iter().flat_map(|b| b.fragments())
    }

    /// Number of fragments on the page.
    pub fn fragment_count(&self) -> usize {
        self.fragments().count()
    }

    /// Flat mean of every fragment's font size (0.0 when the page has no fragments).
    pub fn average_font_size(&self) -> f32 {
        let (total, count) = self
            .fragments()
            .fold((0.0f32, 0usize), |(t, c), f| (t + f.font_size, c + 1));
        if count == 0 {
            0.0
        } else {
            total / count as f32
        }
    }

    /// Check if the page carries no fragments at all.
    pub fn is_empty(&self) -> bool {
        self.fragments().next().is_none()
    }
}
