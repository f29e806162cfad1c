//! Document-level types produced by the inference pass.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Rgb, SectionTag, StyleFlags};

/// Ordered mapping from section tag to its entries, in first-appearance order.
pub type SectionMap = IndexMap<SectionTag, Vec<SectionEntry>>;

/// Inferred structure of a page or of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Name, contact details and links from the first block
    #[serde(rename = "top_section")]
    pub header: HeaderBlock,

    /// Sections in order of first appearance
    pub sections: SectionMap,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty document carrying a header.
    pub fn with_header(header: HeaderBlock) -> Self {
        Self {
            header,
            sections: SectionMap::new(),
        }
    }

    /// Entries of a section, if it was seen.
    pub fn section(&self, tag: SectionTag) -> Option<&[SectionEntry]> {
        self.sections.get(&tag).map(Vec::as_slice)
    }

    /// Section tags in first-appearance order.
    pub fn section_tags(&self) -> impl Iterator<Item = SectionTag> + '_ {
        self.sections.keys().copied()
    }

    /// Number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Total number of content lines, including those inside subsections.
    pub fn line_count(&self) -> usize {
        self.sections
            .values()
            .flatten()
            .map(|entry| match entry {
                SectionEntry::Subsection(sub) => sub.content.len(),
                SectionEntry::Line(_) => 1,
            })
            .sum()
    }

    /// Total number of subsections.
    pub fn subsection_count(&self) -> usize {
        self.sections
            .values()
            .flatten()
            .filter(|entry| matches!(entry, SectionEntry::Subsection(_)))
            .count()
    }

    /// Check if the document has neither header fields nor sections.
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.sections.is_empty()
    }

    /// Combine per-page documents in page order.
    ///
    /// The header is taken from the first document that has one. Sections are
    /// appended in order; a tag seen on an earlier page re-enters its bucket.
    pub fn merge<I: IntoIterator<Item = Document>>(pages: I) -> Document {
        let mut merged = Document::new();
        for page in pages {
            if merged.header.is_empty() && !page.header.is_empty() {
                merged.header = page.header;
            }
            for (tag, entries) in page.sections {
                merged.sections.entry(tag).or_default().extend(entries);
            }
        }
        merged
    }

    /// Get plain text of every content line, one per line, in document order.
    pub fn plain_text(&self) -> String {
        let mut lines = Vec::new();
        for entry in self.sections.values().flatten() {
            match entry {
                SectionEntry::Subsection(sub) => {
                    lines.extend(sub.content.iter().map(|l| l.text.as_str()));
                }
                SectionEntry::Line(line) => lines.push(line.text.as_str()),
            }
        }
        lines.join("\n")
    }
}

/// Name, contact details and links from the top of the first page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderBlock {
    pub name: String,
    pub contact: Contact,
    pub links: Vec<Link>,
}

impl HeaderBlock {
    /// Check if no header field was found.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.contact.is_empty() && self.links.is_empty()
    }
}

/// Contact fields found in the header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub phone: Option<String>,
}

impl Contact {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// A header line that also appears inside a hyperlink target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    pub uri: String,
}

/// A dated span such as "Jan 2020 - Present".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// The matched text, verbatim
    #[serde(rename = "date")]
    pub text: String,
    /// Start token (e.g., "Jan 2020")
    pub start: String,
    /// End token, or "present" for ongoing ranges
    pub end: String,
}

impl DateRange {
    /// End marker used for ongoing ranges.
    pub const PRESENT: &'static str = "present";

    /// Whether the range is still ongoing.
    pub fn is_ongoing(&self) -> bool {
        self.end == Self::PRESENT
    }
}

/// A dated entry (one job, one degree, one project) inside a section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subsection {
    #[serde(flatten)]
    pub date: Option<DateRange>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub title: Option<String>,
    pub content: Vec<ContentLine>,
}

impl Subsection {
    /// Create an empty subsection opened by a date range.
    pub fn dated(date: DateRange, title: Option<String>) -> Self {
        Self {
            date: Some(date),
            title,
            content: Vec::new(),
        }
    }
}

/// One piece of body text with the styling it was found with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentLine {
    pub text: String,
    pub font_size: f32,
    pub color: Rgb,
    pub flags: StyleFlags,
    /// Font name, only when it differs from the page's dominant font
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub font: Option<String>,
    /// Larger than the page average without being a recognized heading
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub emphasized: bool,
}

impl ContentLine {
    /// Create a plain content line.
    pub fn new(text: impl Into<String>, font_size: f32) -> Self {
        Self {
            text: text.into(),
            font_size,
            color: Rgb::BLACK,
            flags: StyleFlags::empty(),
            font: None,
            emphasized: false,
        }
    }
}

/// An element of a section: either a dated subsection or a direct line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionEntry {
    Subsection(Subsection),
    Line(ContentLine),
}

impl SectionEntry {
    pub fn as_subsection(&self) -> Option<&Subsection> {
        match self {
            SectionEntry::Subsection(sub) => Some(sub),
            SectionEntry::Line(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&ContentLine> {
        match self {
            SectionEntry::Line(line) => Some(line),
            SectionEntry::Subsection(_) => None,
        }
    }
}
