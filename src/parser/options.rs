//! Inference options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for inferring document structure.
#[derive(Debug, Clone)]
pub struct InferOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// What to do with content that precedes the first recognized heading
    pub unlabeled: UnlabeledPolicy,

    /// Emit the text of heading lines as content of the section they open
    pub emit_heading_lines: bool,

    /// Whether to infer pages in parallel
    pub parallel: bool,

    /// Page selection (which pages to infer)
    pub pages: PageSelection,

    /// Line and block grouping for flat fragment streams
    pub segment: SegmentOptions,
}

impl InferOptions {
    /// Create new inference options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (tolerate an empty first page and unreadable pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set the policy for content seen before any heading.
    pub fn with_unlabeled(mut self, policy: UnlabeledPolicy) -> Self {
        self.unlabeled = policy;
        self
    }

    /// Emit heading text as section content.
    pub fn with_heading_lines(mut self, emit: bool) -> Self {
        self.emit_heading_lines = emit;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Set segmentation options.
    pub fn with_segment(mut self, segment: SegmentOptions) -> Self {
        self.segment = segment;
        self
    }
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            unlabeled: UnlabeledPolicy::Collect,
            emit_heading_lines: false,
            parallel: true,
            pages: PageSelection::All,
            segment: SegmentOptions::default(),
        }
    }
}

/// Error handling mode during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip unreadable pages and missing headers, and continue
    Lenient,
}

/// Handling of content that appears before the first recognized heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnlabeledPolicy {
    /// Collect it under the `default` section
    #[default]
    Collect,
    /// Drop it
    Drop,
}

/// Thresholds for grouping a flat fragment stream into lines and blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentOptions {
    /// Maximum difference between vertical centers for fragments on one line
    pub line_tolerance: f32,
    /// Vertical gap between lines that starts a new block
    pub block_gap: f32,
}

impl SegmentOptions {
    /// Set the line tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }

    /// Set the block gap.
    pub fn with_block_gap(mut self, gap: f32) -> Self {
        self.block_gap = gap;
        self
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            line_tolerance: 2.0,
            block_gap: 20.0,
        }
    }
}

/// Page selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PageSelection {
    /// All pages
    #[default]
    All,
    /// A range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Specific pages (1-indexed)
    Pages(Vec<u32>),
    /// Sorted, non-overlapping ranges (inclusive, 1-indexed)
    Ranges(Vec<RangeInclusive<u32>>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
            PageSelection::Ranges(ranges) => ranges.iter().any(|r| r.contains(&page)),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let start = parse_page_number(start)?;
                let end = parse_page_number(end)?;
                if start > end {
                    return Err(Error::InvalidPageRange(s.to_string()));
                }
                return Ok(PageSelection::Range(start..=end));
            }
        }

        // Comma-separated list with possible ranges, kept as ranges
        let mut ranges = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            let (start, end) = match part.split_once('-') {
                Some((start, end)) => (parse_page_number(start)?, parse_page_number(end)?),
                None => {
                    let p = parse_page_number(part)?;
                    (p, p)
                }
            };
            if start > end {
                return Err(Error::InvalidPageRange(part.to_string()));
            }
            ranges.push(start..=end);
        }

        ranges.sort_by_key(|r| *r.start());
        let mut merged: Vec<RangeInclusive<u32>> = Vec::with_capacity(ranges.len());
        for range in ranges {
            match merged.last_mut() {
                Some(last) if *range.start() <= last.end().saturating_add(1) => {
                    let end = (*last.end()).max(*range.end());
                    *last = *last.start()..=end;
                }
                _ => merged.push(range),
            }
        }

        if let [only] = merged.as_slice() {
            return Ok(PageSelection::Range(only.clone()));
        }
        Ok(PageSelection::Ranges(merged))
    }
}

fn parse_page_number(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) | Err(_) => Err(Error::InvalidPageRange(format!(
            "'{}' is not a page number",
            s.trim()
        ))),
        Ok(n) => Ok(n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_options_builder() {
        let options = InferOptions::new()
            .lenient()
            .with_unlabeled(UnlabeledPolicy::Drop)
            .with_heading_lines(true)
            .sequential();

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert_eq!(options.unlabeled, UnlabeledPolicy::Drop);
        assert!(options.emit_heading_lines);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = InferOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert_eq!(options.unlabeled, UnlabeledPolicy::Collect);
        assert!(!options.emit_heading_lines);
        assert!(options.parallel);
        assert_eq!(options.segment.block_gap, 20.0);
    }

    #[test]
    fn test_page_selection_includes() {
        let range = PageSelection::Range(2..=3);
        assert!(!range.includes(1));
        assert!(range.includes(2));
        assert!(range.includes(3));
        assert!(!range.includes(4));

        let pages = PageSelection::Pages(vec![1, 3]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));

        let ranges = PageSelection::Ranges(vec![1..=2, 5..=6]);
        assert!(ranges.includes(2));
        assert!(!ranges.includes(4));
        assert!(PageSelection::All.includes(42));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(
            PageSelection::parse("1-3").unwrap(),
            PageSelection::Range(1..=3)
        );
        assert_eq!(
            PageSelection::parse("1,3,5-7,3").unwrap(),
            PageSelection::Ranges(vec![1..=1, 3..=3, 5..=7])
        );
        assert_eq!(
            PageSelection::parse("4,1-2,3").unwrap(),
            PageSelection::Range(1..=4)
        );
    }

    #[test]
    fn test_page_selection_large_list_range_is_not_expanded() {
        let selection = PageSelection::parse("1,2-4000000000").unwrap();
        assert_eq!(selection, PageSelection::Range(1..=4_000_000_000));
        assert!(selection.includes(3_999_999_999));

        let sparse = PageSelection::parse("1,10-4000000000").unwrap();
        assert!(sparse.includes(1));
        assert!(!sparse.includes(5));
        assert!(sparse.includes(4_000_000_000));
    }

    #[test]
    fn test_page_selection_parse_errors() {
        assert!(matches!(
            PageSelection::parse("x"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(PageSelection::parse("0").is_err());
        assert!(PageSelection::parse("5-2").is_err());
        assert!(matches!(
            PageSelection::parse("1,5-2"),
            Err(Error::InvalidPageRange(_))
        ));
    }
}
