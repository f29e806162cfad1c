//! Fragment source abstraction layer.
//!
//! Provides a trait-based interface to the text-extraction layer, isolating
//! the concrete extractor (and its block/line/span representation) from the
//! inference logic.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::model::{
    BBox, Hyperlink, PageContent, Rgb, StyleFlags, StyledFragment, TextBlock, TextLine,
};

use super::options::SegmentOptions;
use super::segment::Segmenter;

/// Abstract interface to an extraction layer.
///
/// Pages are 1-indexed. Implementations must be shareable across the page
/// workers used for parallel inference.
pub trait FragmentSource: Sync {
    /// Number of pages available.
    fn page_count(&self) -> u32;

    /// Text blocks of a page, in reading order.
    fn fragments(&self, page: u32) -> Result<Vec<TextBlock>>;

    /// Hyperlink annotations of a page.
    fn hyperlinks(&self, page: u32) -> Result<Vec<Hyperlink>>;

    /// Blocks and hyperlinks of a page together.
    fn load_page(&self, page: u32) -> Result<PageContent> {
        let blocks = self.fragments(page)?;
        let links = self.hyperlinks(page)?;
        Ok(PageContent::new(page, blocks).with_links(links))
    }
}

/// In-memory pages.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pages: Vec<PageContent>,
}

impl MemorySource {
    /// Create a source from pages (renumbered 1..=n in the given order).
    pub fn new(pages: Vec<PageContent>) -> Self {
        let pages = pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.number = i as u32 + 1;
                page
            })
            .collect();
        Self { pages }
    }

    /// Build a single-page source from a flat fragment stream.
    pub fn from_fragments(
        fragments: Vec<StyledFragment>,
        links: Vec<Hyperlink>,
        options: SegmentOptions,
    ) -> Self {
        let blocks = Segmenter::new(options).segment(fragments);
        Self::new(vec![PageContent::new(1, blocks).with_links(links)])
    }

    /// Append a page.
    pub fn push_page(&mut self, mut page: PageContent) {
        page.number = self.pages.len() as u32 + 1;
        self.pages.push(page);
    }

    /// The pages held by this source.
    pub fn pages(&self) -> &[PageContent] {
        &self.pages
    }

    fn get(&self, page: u32) -> Result<&PageContent> {
        if page == 0 {
            return Err(Error::PageOutOfRange(page, self.page_count()));
        }
        self.pages
            .get((page - 1) as usize)
            .ok_or(Error::PageOutOfRange(page, self.page_count()))
    }
}

impl FragmentSource for MemorySource {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn fragments(&self, page: u32) -> Result<Vec<TextBlock>> {
        Ok(self.get(page)?.blocks.clone())
    }

    fn hyperlinks(&self, page: u32) -> Result<Vec<Hyperlink>> {
        Ok(self.get(page)?.links.clone())
    }

    fn load_page(&self, page: u32) -> Result<PageContent> {
        self.get(page).cloned()
    }
}

/// Source backed by a JSON dump in the block/line/span "dict" shape.
///
/// ```json
/// {"pages": [{"blocks": [{"type": 0, "lines": [{"spans": [
///     {"text": "Jane Doe", "font": "Calibri-Bold", "size": 18.0,
///      "flags": 16, "color": 0, "bbox": [50, 40, 160, 62]}]}]}],
///   "links": [{"uri": "https://github.com/jane", "from": [50, 70, 160, 80]}]}]}
/// ```
///
/// A bare list of pages or a single page object is accepted as well. A page
/// may instead carry a flat `"spans"` list with no line structure; those
/// spans are grouped into lines and blocks by position.
/// Non-text blocks (`type` other than 0) are skipped and span text is
/// NFKC-normalized so typographic ligatures match the section patterns.
#[derive(Debug, Clone, Default)]
pub struct DictSource {
    inner: MemorySource,
}

impl DictSource {
    /// Load from a file path.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_file_with(path, SegmentOptions::default())
    }

    /// Load from a file path, segmenting flat span lists with `segment`.
    pub fn load_file_with<P: AsRef<Path>>(path: P, segment: SegmentOptions) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::load_str_with(&data, segment)
    }

    /// Load from a JSON string.
    pub fn load_str(data: &str) -> Result<Self> {
        Self::load_str_with(data, SegmentOptions::default())
    }

    /// Load from a JSON string, segmenting flat span lists with `segment`.
    pub fn load_str_with(data: &str, segment: SegmentOptions) -> Result<Self> {
        let raw: RawInput = serde_json::from_str(data)?;
        Ok(Self::from_raw(raw, segment))
    }

    /// Load from a reader.
    pub fn load_reader<R: Read>(reader: R) -> Result<Self> {
        Self::load_reader_with(reader, SegmentOptions::default())
    }

    /// Load from a reader, segmenting flat span lists with `segment`.
    pub fn load_reader_with<R: Read>(mut reader: R, segment: SegmentOptions) -> Result<Self> {
        let mut data = String::new();
        reader.read_to_string(&mut data)?;
        Self::load_str_with(&data, segment)
    }

    /// The decoded pages.
    pub fn pages(&self) -> &[PageContent] {
        self.inner.pages()
    }

    fn from_raw(raw: RawInput, segment: SegmentOptions) -> Self {
        let pages = match raw {
            RawInput::Document { pages } => pages,
            RawInput::Pages(pages) => pages,
            RawInput::Page(page) => vec![page],
        };

        let segmenter = Segmenter::new(segment);
        let mut inner = MemorySource::default();
        for raw_page in pages {
            let mut blocks: Vec<TextBlock> = raw_page
                .blocks
                .into_iter()
                .filter(|b| b.kind == 0)
                .map(RawBlock::into_block)
                .collect();
            if !raw_page.spans.is_empty() {
                let fragments = raw_page.spans.into_iter().map(RawSpan::into_fragment).collect();
                blocks.extend(segmenter.segment(fragments));
            }
            let links: Vec<Hyperlink> = raw_page
                .links
                .into_iter()
                .filter_map(RawLink::into_hyperlink)
                .collect();
            log::debug!(
                "Loaded page {}: {} text blocks, {} links",
                inner.page_count() + 1,
                blocks.len(),
                links.len()
            );
            inner.push_page(PageContent::new(0, blocks).with_links(links));
        }

        Self { inner }
    }
}

impl FragmentSource for DictSource {
    fn page_count(&self) -> u32 {
        self.inner.page_count()
    }

    fn fragments(&self, page: u32) -> Result<Vec<TextBlock>> {
        self.inner.fragments(page)
    }

    fn hyperlinks(&self, page: u32) -> Result<Vec<Hyperlink>> {
        self.inner.hyperlinks(page)
    }

    fn load_page(&self, page: u32) -> Result<PageContent> {
        self.inner.load_page(page)
    }
}

/// Normalize extracted text (ligatures, compatibility forms, no-break spaces).
pub fn normalize_text(text: &str) -> String {
    text.nfkc().collect()
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawInput {
    Document { pages: Vec<RawPage> },
    Pages(Vec<RawPage>),
    Page(RawPage),
}

#[derive(Debug, Deserialize)]
struct RawPage {
    #[serde(default)]
    blocks: Vec<RawBlock>,
    /// Flat span list from extractors that report no lines
    #[serde(default)]
    spans: Vec<RawSpan>,
    #[serde(default)]
    links: Vec<RawLink>,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    #[serde(rename = "type", default)]
    kind: u32,
    #[serde(default)]
    lines: Vec<RawLine>,
}

impl RawBlock {
    fn into_block(self) -> TextBlock {
        TextBlock::new(
            self.lines
                .into_iter()
                .map(|line| {
                    TextLine::new(line.spans.into_iter().map(RawSpan::into_fragment).collect())
                })
                .collect(),
        )
    }
}

#[derive(Debug, Deserialize)]
struct RawLine {
    #[serde(default)]
    spans: Vec<RawSpan>,
}

#[derive(Debug, Deserialize)]
struct RawSpan {
    text: String,
    #[serde(default)]
    font: String,
    size: f32,
    #[serde(default)]
    flags: u32,
    #[serde(default)]
    color: u32,
    #[serde(default)]
    bbox: [f32; 4],
}

impl RawSpan {
    fn into_fragment(self) -> StyledFragment {
        StyledFragment {
            text: normalize_text(&self.text),
            bbox: BBox::from(self.bbox),
            font_name: self.font,
            font_size: self.size,
            color: Rgb::from(self.color),
            flags: StyleFlags::from_bits_truncate(self.flags),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawLink {
    #[serde(default)]
    uri: Option<String>,
    #[serde(rename = "from", default)]
    bbox: [f32; 4],
}

impl RawLink {
    /// Internal (page-to-page) links carry no URI and are dropped.
    fn into_hyperlink(self) -> Option<Hyperlink> {
        let uri = self.uri.filter(|u| !u.is_empty())?;
        Some(Hyperlink::new(uri, BBox::from(self.bbox)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUMP: &str = r#"{
        "pages": [{
            "blocks": [
                {"type": 0, "bbox": [0, 0, 100, 30], "lines": [
                    {"bbox": [0, 0, 100, 12], "spans": [
                        {"text": "Jane Doe", "font": "Calibri-Bold", "size": 18.0,
                         "flags": 16, "color": 0, "bbox": [0, 0, 100, 12]}
                    ]},
                    {"spans": [
                        {"text": "jane@x.com", "font": "Calibri", "size": 10.0,
                         "flags": 0, "color": 255, "bbox": [0, 14, 100, 26]}
                    ]}
                ]},
                {"type": 1, "bbox": [0, 40, 50, 90]},
                {"type": 0, "lines": [{"spans": [
                    {"text": "Certiﬁcations", "font": "Calibri", "size": 14.0}
                ]}]}
            ],
            "links": [
                {"kind": 2, "uri": "https://github.com/jane", "from": [0, 30, 100, 40]},
                {"kind": 1, "page": 2, "from": [0, 0, 1, 1]}
            ]
        }]
    }"#;

    #[test]
    fn test_load_dict_dump() {
        let source = DictSource::load_str(DUMP).unwrap();
        assert_eq!(source.page_count(), 1);

        let page = source.load_page(1).unwrap();
        assert_eq!(page.number, 1);
        assert_eq!(page.blocks.len(), 2);
        assert_eq!(page.blocks[0].text(), "Jane Doe\njane@x.com");

        let first = &page.blocks[0].lines[0].fragments[0];
        assert!(first.is_bold());
        assert_eq!(first.font_name, "Calibri-Bold");
        assert_eq!(first.bbox, BBox::new(0.0, 0.0, 100.0, 12.0));
        assert_eq!(page.blocks[0].lines[1].fragments[0].color.packed(), 255);

        assert_eq!(page.links.len(), 1);
        assert_eq!(page.links[0].uri, "https://github.com/jane");
    }

    #[test]
    fn test_ligatures_are_normalized() {
        let source = DictSource::load_str(DUMP).unwrap();
        let blocks = source.fragments(1).unwrap();
        assert_eq!(blocks[1].text(), "Certifications");
    }

    #[test]
    fn test_bare_page_list_and_single_page() {
        let list = DictSource::load_str(r#"[{"blocks": []}, {"blocks": []}]"#).unwrap();
        assert_eq!(list.page_count(), 2);

        let single = DictSource::load_str(
            r#"{"blocks": [{"lines": [{"spans": [{"text": "x", "size": 9}]}]}]}"#,
        )
        .unwrap();
        assert_eq!(single.page_count(), 1);
        assert_eq!(single.pages()[0].blocks[0].text(), "x");
    }

    #[test]
    fn test_page_out_of_range() {
        let source = DictSource::load_str(DUMP).unwrap();
        assert!(matches!(
            source.load_page(2),
            Err(Error::PageOutOfRange(2, 1))
        ));
        assert!(matches!(
            source.fragments(0),
            Err(Error::PageOutOfRange(0, 1))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            DictSource::load_str("{not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_flat_spans_are_segmented() {
        let dump = r#"{"spans": [
            {"text": "Jane Doe", "size": 16, "bbox": [0, 0, 80, 16]},
            {"text": "Skills", "size": 14, "bbox": [0, 60, 50, 74]},
            {"text": "Rust", "size": 10, "bbox": [60, 61, 90, 73]},
            {"text": "Go", "size": 10, "bbox": [0, 78, 20, 90]}
        ]}"#;

        let source = DictSource::load_str(dump).unwrap();
        let blocks = source.fragments(1).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].lines.len(), 2);
        assert_eq!(blocks[1].lines[0].fragments.len(), 2);

        let wide = SegmentOptions::default().with_block_gap(100.0);
        let source = DictSource::load_str_with(dump, wide).unwrap();
        assert_eq!(source.fragments(1).unwrap().len(), 1);
    }

    #[test]
    fn test_memory_source_from_fragments() {
        let fragments = vec![
            StyledFragment::new("Jane Doe", "Helvetica", 16.0)
                .with_bbox(BBox::new(0.0, 0.0, 80.0, 16.0)),
            StyledFragment::new("Education", "Helvetica", 14.0)
                .with_bbox(BBox::new(0.0, 60.0, 80.0, 74.0)),
        ];
        let source = MemorySource::from_fragments(fragments, vec![], SegmentOptions::default());
        assert_eq!(source.page_count(), 1);
        assert_eq!(source.fragments(1).unwrap().len(), 2);
    }
}
