//! Document model types.
//!
//! Two halves: the input side (`StyledFragment` grouped into lines, blocks and
//! pages, exactly as the extraction layer hands them over) and the output side
//! (`Document` with its header block and ordered section map).

mod document;
mod fragment;
mod section;

pub use document::{
    Contact, ContentLine, DateRange, Document, HeaderBlock, Link, SectionEntry, SectionMap,
    Subsection,
};
pub use fragment::{
    BBox, Hyperlink, PageContent, Rgb, StyleFlags, StyledFragment, TextBlock, TextLine,
};
pub use section::SectionTag;
