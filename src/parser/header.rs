//! Header extraction: name, contact details and links from the first block.

use crate::error::{Error, Result};
use crate::model::{HeaderBlock, Hyperlink, Link, PageContent};

use super::patterns::Patterns;

/// Index of the block treated as the header: the first block with visible text.
pub fn header_block_index(page: &PageContent) -> Option<usize> {
    page.blocks.iter().position(|b| !b.is_empty())
}

/// Parses the top block of the first page.
pub struct HeaderExtractor<'p> {
    patterns: &'p Patterns,
}

impl<'p> HeaderExtractor<'p> {
    /// Create a new header extractor.
    pub fn new(patterns: &'p Patterns) -> Self {
        Self { patterns }
    }

    /// Extract the header from the first text block of a page.
    ///
    /// Fails with [`Error::MalformedDocument`] when the page has no text block.
    pub fn extract(&self, page: &PageContent) -> Result<HeaderBlock> {
        let index = header_block_index(page).ok_or_else(|| {
            Error::MalformedDocument(format!("page {} has no text blocks", page.number))
        })?;
        let text = page.blocks[index].text();
        Ok(self.extract_text(&text, &page.links))
    }

    /// Parse header text (newline-delimited) against the page's hyperlinks.
    pub fn extract_text(&self, text: &str, links: &[Hyperlink]) -> HeaderBlock {
        let mut header = HeaderBlock::default();
        let mut lines = text.lines();

        // Line 0 is the name, only trimmed
        if let Some(first) = lines.next() {
            header.name = first.trim().to_string();
        }

        for line in lines {
            if header.contact.email.is_none() {
                if let Some(email) = self.patterns.find_email(line) {
                    header.contact.email = Some(email.to_string());
                }
            }
            if header.contact.phone.is_none() {
                header.contact.phone = self.patterns.find_phone(line);
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            for link in links {
                if !link.uri.is_empty() && link.uri.contains(trimmed) {
                    header.links.push(Link {
                        text: trimmed.to_string(),
                        uri: link.uri.clone(),
                    });
                }
            }
        }

        log::debug!(
            "Header: name={:?}, email={}, phone={}, {} links",
            header.name,
            header.contact.email.is_some(),
            header.contact.phone.is_some(),
            header.links.len()
        );

        header
    }
}
