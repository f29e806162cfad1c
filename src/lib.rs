//! # sectionize
//!
//! Layout-to-structure inference for resume-style documents.
//!
//! This library takes the styled text fragments an extraction layer reports
//! for each page (text, font, size, color, style flags, position) and infers
//! a semantic structure from them: a header with the candidate's name,
//! contact details and links, followed by labeled sections that hold dated
//! subsections and content lines.
//!
//! ## Quick Start
//!
//! ```no_run
//! use sectionize::{parse_file, render};
//!
//! fn main() -> sectionize::Result<()> {
//!     // Parse a fragment dump in the block/line/span "dict" shape
//!     let doc = parse_file("resume.json")?;
//!
//!     println!("{}", doc.header.name);
//!     let json = render::to_json(&doc, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Section taxonomy**: 19 section tags matched case-insensitively
//! - **Date-range subsections**: `Jan 2020 - Present`, `Sep 2018 to May 2020`, ...
//! - **Header extraction**: name, first email, first phone, hyperlinks
//! - **Parallel processing**: Uses Rayon for multi-page documents
//! - **Pluggable input**: any [`FragmentSource`] implementation

pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    BBox, Contact, ContentLine, DateRange, Document, HeaderBlock, Hyperlink, Link, PageContent,
    Rgb, SectionEntry, SectionMap, SectionTag, StyleFlags, StyledFragment, Subsection, TextBlock,
    TextLine,
};
pub use parser::{
    infer_page, DictSource, ErrorMode, FragmentSource, InferOptions, MemorySource,
    PageSelection, SegmentOptions, StructureParser, UnlabeledPolicy,
};
pub use render::JsonFormat;

use std::io::Read;
use std::path::Path;

/// Parse a fragment dump file and return the inferred document.
///
/// # Arguments
///
/// * `path` - Path to a JSON dump in the block/line/span "dict" shape
///
/// # Returns
///
/// A `Result` containing the inferred `Document` or an error.
///
/// # Example
///
/// ```no_run
/// use sectionize::parse_file;
///
/// let doc = parse_file("resume.json").unwrap();
/// println!("Sections: {}", doc.section_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    parse_file_with_options(path, InferOptions::default())
}

/// Parse a fragment dump file with custom options.
///
/// # Example
///
/// ```no_run
/// use sectionize::{parse_file_with_options, InferOptions};
///
/// let options = InferOptions::new()
///     .lenient()
///     .sequential();
/// let doc = parse_file_with_options("resume.json", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: InferOptions) -> Result<Document> {
    let source = DictSource::load_file_with(path, options.segment)?;
    StructureParser::with_options(source, options).parse()
}

/// Parse a fragment dump held in a string.
pub fn parse_str(data: &str, options: InferOptions) -> Result<Document> {
    let source = DictSource::load_str_with(data, options.segment)?;
    StructureParser::with_options(source, options).parse()
}

/// Parse a fragment dump from a reader.
///
/// # Example
///
/// ```no_run
/// use sectionize::{parse_reader, InferOptions};
/// use std::fs::File;
///
/// let file = File::open("resume.json").unwrap();
/// let doc = parse_reader(file, InferOptions::default()).unwrap();
/// ```
pub fn parse_reader<R: Read>(reader: R, options: InferOptions) -> Result<Document> {
    let source = DictSource::load_reader_with(reader, options.segment)?;
    StructureParser::with_options(source, options).parse()
}

/// Parse pages already decoded by the caller.
///
/// Pages are renumbered 1..=n in the given order; page 1 carries the header.
pub fn parse_pages(pages: Vec<PageContent>, options: InferOptions) -> Result<Document> {
    StructureParser::with_options(MemorySource::new(pages), options).parse()
}

/// Parse a fragment dump file on the blocking pool.
///
/// The read is asynchronous; the inference pass runs in a single
/// `spawn_blocking` task.
#[cfg(feature = "async")]
pub async fn parse_file_async<P: AsRef<Path>>(path: P, options: InferOptions) -> Result<Document> {
    let data = tokio::fs::read_to_string(path).await?;
    tokio::task::spawn_blocking(move || parse_str(&data, options))
        .await
        .map_err(|e| Error::Other(format!("inference task failed: {}", e)))?
}

/// Builder for parsing fragment dumps.
///
/// # Example
///
/// ```no_run
/// use sectionize::{Sectionize, JsonFormat};
///
/// let json = Sectionize::new()
///     .lenient()
///     .with_heading_lines(true)
///     .parse("resume.json")?
///     .to_json(JsonFormat::Compact)?;
/// # Ok::<(), sectionize::Error>(())
/// ```
pub struct Sectionize {
    options: InferOptions,
}

impl Sectionize {
    /// Create a new Sectionize builder.
    pub fn new() -> Self {
        Self {
            options: InferOptions::default(),
        }
    }

    /// Enable lenient parsing mode.
    pub fn lenient(mut self) -> Self {
        self.options = self.options.lenient();
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Set what happens to content seen before the first heading.
    pub fn with_unlabeled(mut self, policy: UnlabeledPolicy) -> Self {
        self.options = self.options.with_unlabeled(policy);
        self
    }

    /// Also emit heading lines as content of the section they open.
    pub fn with_heading_lines(mut self, emit: bool) -> Self {
        self.options = self.options.with_heading_lines(emit);
        self
    }

    /// Parse a fragment dump file and return a result wrapper.
    pub fn parse<P: AsRef<Path>>(self, path: P) -> Result<SectionizeResult> {
        let document = parse_file_with_options(path, self.options)?;
        Ok(SectionizeResult { document })
    }

    /// Parse a fragment dump held in a string.
    pub fn parse_str(self, data: &str) -> Result<SectionizeResult> {
        let document = parse_str(data, self.options)?;
        Ok(SectionizeResult { document })
    }
}

impl Default for Sectionize {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of parsing a fragment dump.
pub struct SectionizeResult {
    /// The inferred document
    pub document: Document,
}

impl SectionizeResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text of all content lines.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}
