//! Grouping of a flat fragment stream into lines and blocks.
//!
//! Extraction layers that already report lines and blocks do not need this.
//! For those that only hand over positioned fragments, lines are formed from
//! fragments sharing a vertical center and blocks are split wherever the
//! vertical gap between consecutive lines exceeds a threshold.

use std::cmp::Ordering;

use crate::model::{StyledFragment, TextBlock, TextLine};

use super::options::SegmentOptions;

/// Groups fragments into lines and blocks by position.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    options: SegmentOptions,
}

impl Segmenter {
    /// Create a new segmenter.
    pub fn new(options: SegmentOptions) -> Self {
        Self { options }
    }

    /// Group fragments (in reading order) into blocks.
    pub fn segment(&self, fragments: Vec<StyledFragment>) -> Vec<TextBlock> {
        let lines = self.group_into_lines(fragments);
        self.group_into_blocks(lines)
    }

    /// Consecutive fragments whose vertical centers agree form a line.
    pub fn group_into_lines(&self, fragments: Vec<StyledFragment>) -> Vec<TextLine> {
        let mut lines: Vec<TextLine> = Vec::new();
        let mut current: Vec<StyledFragment> = Vec::new();
        let mut current_center = 0.0f32;

        for fragment in fragments {
            let center = fragment.bbox.center_y();
            if !current.is_empty() && (center - current_center).abs() > self.options.line_tolerance
            {
                lines.push(finish_line(std::mem::take(&mut current)));
            }
            if current.is_empty() {
                current_center = center;
            }
            current.push(fragment);
        }

        if !current.is_empty() {
            lines.push(finish_line(current));
        }

        lines
    }

    /// Consecutive lines separated by less than the block gap form a block.
    pub fn group_into_blocks(&self, lines: Vec<TextLine>) -> Vec<TextBlock> {
        let mut blocks: Vec<TextBlock> = Vec::new();
        let mut current: Vec<TextLine> = Vec::new();
        let mut prev_bottom: Option<f32> = None;

        for line in lines {
            let bbox = line.bbox().unwrap_or_default();
            if let Some(bottom) = prev_bottom {
                let gap = bbox.y0 - bottom;
                if gap > self.options.block_gap && !current.is_empty() {
                    log::debug!("Block break: gap {:.1} > {:.1}", gap, self.options.block_gap);
                    blocks.push(TextBlock::new(std::mem::take(&mut current)));
                }
            }
            prev_bottom = Some(bbox.y1);
            current.push(line);
        }

        if !current.is_empty() {
            blocks.push(TextBlock::new(current));
        }

        blocks
    }
}

/// Order a line's fragments left to right.
fn finish_line(mut fragments: Vec<StyledFragment>) -> TextLine {
    fragments.sort_by(|a, b| a.bbox.x0.partial_cmp(&b.bbox.x0).unwrap_or(Ordering::Equal));
    TextLine::new(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BBox;

    fn at(text: &str, x0: f32, y0: f32) -> StyledFragment {
        StyledFragment::new(text, "Helvetica", 10.0).with_bbox(BBox::new(
            x0,
            y0,
            x0 + 40.0,
            y0 + 10.0,
        ))
    }

    #[test]
    fn test_fragments_on_same_baseline_form_one_line() {
        let segmenter = Segmenter::default();
        let lines = segmenter.group_into_lines(vec![
            at("Doe", 60.0, 100.0),
            at("Jane ", 10.0, 100.5),
            at("Next", 10.0, 115.0),
        ]);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Jane Doe");
        assert_eq!(lines[1].text(), "Next");
    }

    #[test]
    fn test_vertical_gap_splits_blocks() {
        let segmenter = Segmenter::default();
        let blocks = segmenter.segment(vec![
            at("Jane Doe", 10.0, 10.0),
            at("jane@x.com", 10.0, 22.0),
            at("Education", 10.0, 80.0),
            at("BSc", 10.0, 92.0),
        ]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "Jane Doe\njane@x.com");
        assert_eq!(blocks[1].text(), "Education\nBSc");
    }

    #[test]
    fn test_custom_gap() {
        let segmenter = Segmenter::new(SegmentOptions::default().with_block_gap(1.0));
        let blocks = segmenter.segment(vec![at("a", 0.0, 0.0), at("b", 0.0, 12.0)]);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_empty_input() {
        assert!(Segmenter::default().segment(vec![]).is_empty());
    }
}
