//! Structure inference: a single forward pass over a page's lines.
//!
//! Each line is first tested for a heading fragment (a section keyword with
//! at most a few capitalized words around it). A heading switches the current
//! section; a first fragment larger than the page average only marks the line
//! as emphasized content. All other fragments, including the ones sharing a
//! line with a heading, are tested for a date range, which opens a new
//! subsection, and are otherwise routed as content into the open subsection
//! or section.

use crate::model::{
    ContentLine, Document, PageContent, SectionEntry, SectionMap, SectionTag, StyledFragment,
    Subsection, TextLine,
};

use super::options::{InferOptions, UnlabeledPolicy};
use super::patterns::Patterns;

/// Mutable state of one page's pass.
///
/// Created per page and dropped when the pass completes, so pages never share
/// state and may be inferred concurrently.
#[derive(Debug, Clone)]
pub struct InferenceContext {
    avg_font_size: f32,
    dominant_font: Option<String>,
    current_section: Option<SectionTag>,
    /// Index of the open subsection within the current section's entries
    current_subsection: Option<usize>,
    sections: SectionMap,
}

impl InferenceContext {
    /// Create a context for a page whose mean font size is `avg_font_size`.
    pub fn new(avg_font_size: f32) -> Self {
        Self {
            avg_font_size,
            dominant_font: None,
            current_section: None,
            current_subsection: None,
            sections: SectionMap::new(),
        }
    }

    /// Mean font size of the page; fixed for the whole pass.
    pub fn avg_font_size(&self) -> f32 {
        self.avg_font_size
    }

    /// Font of the first visible fragment walked, if any.
    pub fn dominant_font(&self) -> Option<&str> {
        self.dominant_font.as_deref()
    }

    pub fn current_section(&self) -> Option<SectionTag> {
        self.current_section
    }

    /// Whether a subsection is currently receiving content.
    pub fn has_open_subsection(&self) -> bool {
        self.current_subsection.is_some()
    }

    fn observe_font(&mut self, fragment: &StyledFragment) {
        if self.dominant_font.is_none() {
            self.dominant_font = Some(fragment.font_name.clone());
        }
    }

    /// Switch to `tag`, re-entering its bucket if it was seen before.
    pub fn enter_section(&mut self, tag: SectionTag) {
        if self.current_section == Some(tag) {
            return;
        }
        if self.sections.contains_key(&tag) {
            log::debug!("Re-entering section '{}'", tag);
        } else {
            log::debug!("Opening section '{}'", tag);
        }
        self.current_subsection = None;
        self.current_section = Some(tag);
        self.sections.entry(tag).or_default();
    }

    /// Make sure some section is current, falling back to `default` per policy.
    fn ensure_section(&mut self, policy: UnlabeledPolicy) -> Option<SectionTag> {
        if self.current_section.is_none() && policy == UnlabeledPolicy::Collect {
            self.enter_section(SectionTag::Unlabeled);
        }
        self.current_section
    }

    /// Close any open subsection and register `subsection` in the current section.
    pub fn open_subsection(&mut self, subsection: Subsection, policy: UnlabeledPolicy) -> bool {
        let Some(tag) = self.ensure_section(policy) else {
            return false;
        };
        let entries = self.sections.entry(tag).or_default();
        entries.push(SectionEntry::Subsection(subsection));
        self.current_subsection = Some(entries.len() - 1);
        log::debug!("Opened subsection #{} in '{}'", entries.len() - 1, tag);
        true
    }

    /// Route a content line to the open subsection, else to the current section.
    ///
    /// Returns `false` when the line was dropped as pre-section content.
    pub fn push_content(&mut self, line: ContentLine, policy: UnlabeledPolicy) -> bool {
        let Some(tag) = self.ensure_section(policy) else {
            log::debug!("Dropping pre-section content: {:?}", line.text);
            return false;
        };
        let entries = self.sections.entry(tag).or_default();
        match self.current_subsection.and_then(|i| entries.get_mut(i)) {
            Some(SectionEntry::Subsection(sub)) => sub.content.push(line),
            _ => entries.push(SectionEntry::Line(line)),
        }
        true
    }

    /// Finish the pass and hand over the sections.
    pub fn finish(self) -> SectionMap {
        self.sections
    }
}

/// Infers sections and subsections from a page's styled lines.
pub struct InferenceEngine<'a> {
    patterns: &'a Patterns,
    options: &'a InferOptions,
}

impl<'a> InferenceEngine<'a> {
    /// Create a new inference engine.
    pub fn new(patterns: &'a Patterns, options: &'a InferOptions) -> Self {
        Self { patterns, options }
    }

    /// Infer the section structure of a page.
    ///
    /// `header_block` names a block already consumed by header extraction;
    /// it still counts toward the page's average font size but is not walked.
    /// The returned document carries an empty header.
    pub fn infer(&self, page: &PageContent, header_block: Option<usize>) -> Document {
        let mut ctx = InferenceContext::new(page.average_font_size());
        log::debug!(
            "Page {}: {} fragments, average font size {:.2}",
            page.number,
            page.fragment_count(),
            ctx.avg_font_size()
        );

        for (index, block) in page.blocks.iter().enumerate() {
            if header_block == Some(index) {
                continue;
            }
            for line in &block.lines {
                self.process_line(&mut ctx, line);
            }
        }

        let sections = ctx.finish();
        log::debug!("Page {}: {} sections", page.number, sections.len());

        Document {
            header: Default::default(),
            sections,
        }
    }

    /// Run one line through the heading, date-range and routing steps.
    pub fn process_line(&self, ctx: &mut InferenceContext, line: &TextLine) {
        let visible: Vec<&StyledFragment> = line.fragments.iter().filter(|f| !f.is_blank()).collect();
        let Some(first) = visible.first() else {
            return;
        };
        ctx.observe_font(first);

        let policy = self.options.unlabeled;
        let heading = self
            .patterns
            .match_heading_any(visible.iter().map(|f| f.trimmed()));

        if let Some(tag) = heading {
            ctx.enter_section(tag);
        }

        for fragment in visible.iter().copied() {
            // Heading fragments are represented by the bucket key
            if heading.is_some() && self.patterns.match_heading(fragment.trimmed()).is_some() {
                if self.options.emit_heading_lines {
                    let emphasized = fragment.font_size > ctx.avg_font_size();
                    let content = self.content_line(ctx, fragment, emphasized);
                    ctx.push_content(content, policy);
                }
                continue;
            }

            if let Some(date) = self.patterns.find_date_range(&fragment.text) {
                let title = date.remainder(&fragment.text);
                if ctx.open_subsection(Subsection::dated(date.range, title), policy) {
                    continue;
                }
            }

            // On a heading line the heading's size says nothing about its neighbours
            let emphasized = match heading {
                Some(_) => fragment.font_size > ctx.avg_font_size(),
                None => first.font_size > ctx.avg_font_size(),
            };
            let content = self.content_line(ctx, fragment, emphasized);
            ctx.push_content(content, policy);
        }
    }

    fn content_line(
        &self,
        ctx: &InferenceContext,
        fragment: &StyledFragment,
        emphasized: bool,
    ) -> ContentLine {
        let font = match ctx.dominant_font() {
            Some(dominant) if dominant == fragment.font_name => None,
            _ => Some(fragment.font_name.clone()),
        };
        ContentLine {
            text: fragment.trimmed().to_string(),
            font_size: fragment.font_size,
            color: fragment.color,
            flags: fragment.flags,
            font,
            emphasized,
        }
    }
}
