//! Document-level coordinator over a fragment source.

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Document, HeaderBlock, PageContent};

use super::header::{header_block_index, HeaderExtractor};
use super::inference::InferenceEngine;
use super::options::{ErrorMode, InferOptions};
use super::patterns::Patterns;
use super::source::FragmentSource;

/// Infers the structure of every selected page of a source and merges the results.
pub struct StructureParser<S: FragmentSource> {
    source: S,
    options: InferOptions,
    patterns: Patterns,
}

impl<S: FragmentSource> StructureParser<S> {
    /// Create a parser with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, InferOptions::default())
    }

    /// Create a parser with custom options.
    pub fn with_options(source: S, options: InferOptions) -> Self {
        Self {
            source,
            options,
            patterns: Patterns::new(),
        }
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The options in use.
    pub fn options(&self) -> &InferOptions {
        &self.options
    }

    /// Parse every selected page and merge them into one document.
    pub fn parse(&self) -> Result<Document> {
        let pages = self.parse_pages()?;
        Ok(Document::merge(pages))
    }

    /// Parse every selected page into its own document, in page order.
    ///
    /// Only page 1 carries a header.
    pub fn parse_pages(&self) -> Result<Vec<Document>> {
        let total = self.source.page_count();
        if total == 0 {
            return Err(Error::MalformedDocument(
                "document has no pages".to_string(),
            ));
        }

        let numbers: Vec<u32> = (1..=total)
            .filter(|n| self.options.pages.includes(*n))
            .collect();
        log::debug!("Parsing {} of {} pages", numbers.len(), total);

        let results: Vec<Result<Option<Document>>> = if self.options.parallel {
            numbers.par_iter().map(|n| self.parse_page_lenient(*n)).collect()
        } else {
            numbers.iter().map(|n| self.parse_page_lenient(*n)).collect()
        };

        let mut documents = Vec::with_capacity(results.len());
        for result in results {
            if let Some(doc) = result? {
                documents.push(doc);
            }
        }
        Ok(documents)
    }

    /// Parse a single page. Page 1 also yields the header.
    pub fn parse_page(&self, number: u32) -> Result<Document> {
        let page = self.source.load_page(number)?;
        self.infer(&page)
    }

    /// Parse a page, absorbing load failures in lenient mode.
    fn parse_page_lenient(&self, number: u32) -> Result<Option<Document>> {
        match self.parse_page(number) {
            Ok(doc) => Ok(Some(doc)),
            Err(e @ Error::MalformedDocument(_)) => Err(e),
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("Skipping page {}: {}", number, e);
                Ok(None)
            }
        }
    }

    /// Run header extraction (page 1 only) and inference on a loaded page.
    pub fn infer(&self, page: &PageContent) -> Result<Document> {
        if page.number != 1 {
            return Ok(InferenceEngine::new(&self.patterns, &self.options).infer(page, None));
        }

        let header = match HeaderExtractor::new(&self.patterns).extract(page) {
            Ok(header) => header,
            Err(e) => {
                if self.options.error_mode == ErrorMode::Strict {
                    return Err(e);
                }
                log::warn!("No header on page 1: {}", e);
                HeaderBlock::default()
            }
        };

        let mut doc = InferenceEngine::new(&self.patterns, &self.options)
            .infer(page, header_block_index(page));
        doc.header = header;
        Ok(doc)
    }
}

/// Infer one page that is not backed by a source.
///
/// With `with_header`, the first text block is parsed as the header and
/// excluded from the section walk. A page without fragments yields an empty
/// document rather than an error.
pub fn infer_page(page: &PageContent, with_header: bool, options: &InferOptions) -> Document {
    let patterns = Patterns::new();
    let engine = InferenceEngine::new(&patterns, options);

    let header_index = if with_header {
        header_block_index(page)
    } else {
        None
    };

    let mut doc = engine.infer(page, header_index);
    if let Some(index) = header_index {
        let text = page.blocks[index].text();
        doc.header = HeaderExtractor::new(&patterns).extract_text(&text, &page.links);
    }
    doc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SectionTag, StyledFragment, TextBlock, TextLine};
    use crate::parser::source::MemorySource;

    fn block(lines: &[(&str, f32)]) -> TextBlock {
        TextBlock::new(
            lines
                .iter()
                .map(|(t, s)| TextLine::new(vec![StyledFragment::new(*t, "Helvetica", *s)]))
                .collect(),
        )
    }

    fn two_pages() -> MemorySource {
        MemorySource::new(vec![
            PageContent::new(
                1,
                vec![
                    block(&[("Jane Doe", 18.0), ("jane@x.com", 10.0)]),
                    block(&[("Experience", 14.0), ("Jan 2020 - Present", 10.0), ("Built X", 10.0)]),
                ],
            ),
            PageContent::new(
                2,
                vec![block(&[("Skills", 14.0), ("Rust", 10.0), ("Experience", 14.0), ("Mentoring", 10.0)])],
            ),
        ])
    }

    #[test]
    fn test_parse_merges_pages() {
        let parser = StructureParser::new(two_pages());
        let doc = parser.parse().unwrap();
        assert_eq!(doc.header.name, "Jane Doe");
        assert_eq!(
            doc.section_tags().collect::<Vec<_>>(),
            vec![SectionTag::Experience, SectionTag::Skills]
        );
        let experience = doc.section(SectionTag::Experience).unwrap();
        assert_eq!(experience.len(), 2);
        assert!(experience[0].as_subsection().is_some());
        assert_eq!(experience[1].as_line().unwrap().text, "Mentoring");
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let parallel = StructureParser::new(two_pages()).parse().unwrap();
        let sequential =
            StructureParser::with_options(two_pages(), InferOptions::new().sequential())
                .parse()
                .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_page_selection_skips_header_page() {
        let options = InferOptions::new().with_pages(super::super::options::PageSelection::Pages(vec![2]));
        let doc = StructureParser::with_options(two_pages(), options).parse().unwrap();
        assert!(doc.header.is_empty());
        assert_eq!(doc.section_count(), 2);
    }

    #[test]
    fn test_no_pages_is_malformed() {
        let parser = StructureParser::new(MemorySource::default());
        assert!(matches!(parser.parse(), Err(Error::MalformedDocument(_))));
    }

    #[test]
    fn test_empty_first_page_strict_and_lenient() {
        let source = || MemorySource::new(vec![PageContent::new(1, vec![])]);
        let strict = StructureParser::new(source()).parse();
        assert!(matches!(strict, Err(Error::MalformedDocument(_))));

        let lenient = StructureParser::with_options(source(), InferOptions::new().lenient())
            .parse()
            .unwrap();
        assert!(lenient.is_empty());
    }

    #[test]
    fn test_infer_page_without_source() {
        let page = PageContent::new(
            1,
            vec![block(&[("Jane Doe", 18.0)]), block(&[("Education", 14.0), ("BSc", 10.0)])],
        );
        let doc = infer_page(&page, true, &InferOptions::default());
        assert_eq!(doc.header.name, "Jane Doe");
        assert_eq!(doc.section(SectionTag::Education).unwrap().len(), 1);

        let empty = infer_page(&PageContent::new(1, vec![]), true, &InferOptions::default());
        assert!(empty.is_empty());
    }
}
