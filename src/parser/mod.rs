//! Structure inference over styled text fragments.

mod header;
mod inference;
mod options;
mod patterns;
mod segment;
mod source;
mod structure_parser;

pub use header::{header_block_index, HeaderExtractor};
pub use inference::{InferenceContext, InferenceEngine};
pub use options::{ErrorMode, InferOptions, PageSelection, SegmentOptions, UnlabeledPolicy};
pub use patterns::{DateMatch, Patterns};
pub use segment::Segmenter;
pub use source::{normalize_text, DictSource, FragmentSource, MemorySource};
pub use structure_parser::{infer_page, StructureParser};
