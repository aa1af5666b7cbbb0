//! Paragraph geometry: line spacing, before/after spacing and indentation.

use crate::model::{Alignment, Indentation, LineRule, Merge, NodeId, Spacing};
use crate::units::{hundredth_chars_to_pts, twips_to_pts};

use super::chunk::{Chunk, ChunkContent};

/// Word's single-line leading relative to font size.
pub const WORD_LINE_FACTOR: f32 = 1.15;
/// Font size assumed for line spacing when a paragraph has no text.
pub const EMPTY_PARAGRAPH_SIZE: f32 = 16.0;
/// Font size for character-unit left/right indents when none is defined.
pub const INDENT_CHAR_SIZE: f32 = 12.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ParagraphLayout {
    pub node: NodeId,
    pub alignment: Alignment,
    /// Line pitch in points.
    pub line_spacing: f32,
    pub space_before: f32,
    pub space_after: f32,
    pub indent_left: f32,
    pub indent_right: f32,
    /// Added to `indent_left` on the first line; negative for a hanging indent.
    pub first_line_indent: f32,
    pub keep_together: bool,
    pub keep_next: bool,
    pub fill: Option<[u8; 3]>,
    pub chunks: Vec<Chunk>,
}

impl ParagraphLayout {
    /// Concatenated text of the paragraph's chunks, tabs as `\t`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for chunk in &self.chunks {
            match &chunk.content {
                ChunkContent::Text(text) => out.push_str(text),
                ChunkContent::Tab => out.push('\t'),
                ChunkContent::LineBreak | ChunkContent::PageBreak => out.push('\n'),
                ChunkContent::Spacer(_) => {}
            }
        }
        out
    }

    /// Label of a numbered paragraph.
    pub fn numbering_label(&self) -> Option<&str> {
        self.chunks
            .iter()
            .find(|c| c.numbering && c.text().is_some())
            .and_then(|c| c.text())
    }
}

/// Size the paragraph's spacing is measured against: its largest text chunk.
pub fn paragraph_font_size(chunks: &[Chunk]) -> f32 {
    chunks
        .iter()
        .filter(|c| c.text().is_some())
        .map(|c| c.size)
        .reduce(f32::max)
        .unwrap_or(EMPTY_PARAGRAPH_SIZE)
}

/// Line pitch. `Auto` counts 240ths of a single line, `Exact` is a fixed
/// twip value and `AtLeast` never goes below single spacing.
pub fn line_spacing(spacing: Option<&Spacing>, font_size: f32) -> f32 {
    let single = WORD_LINE_FACTOR * font_size;
    let Some(line) = spacing.and_then(|s| s.line) else {
        return single;
    };
    match spacing.and_then(|s| s.line_rule).unwrap_or(LineRule::Auto) {
        LineRule::Auto => line / 240.0 * single,
        LineRule::Exact => twips_to_pts(line),
        LineRule::AtLeast => twips_to_pts(line).max(single),
    }
}

/// Declared space before and after. Line units are hundredths of a line at
/// `font_size`.
pub fn declared_spacing(spacing: Option<&Spacing>, font_size: f32) -> (Option<f32>, Option<f32>) {
    let Some(s) = spacing else {
        return (None, None);
    };
    let before = s.before.or(s.before_lines.map(|l| l / 100.0 * font_size));
    let after = s.after.or(s.after_lines.map(|l| l / 100.0 * font_size));
    (before, after)
}

/// Only the larger of the previous paragraph's space after and the next
/// paragraph's space before is kept; the other becomes zero.
pub fn merge_adjacent(prev: &mut ParagraphLayout, next: &mut ParagraphLayout) {
    if prev.space_after > next.space_before {
        next.space_before = 0.0;
    } else {
        prev.space_after = 0.0;
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ResolvedIndent {
    pub left: f32,
    pub right: f32,
    pub first_line: f32,
}

/// Combine indentation layers, most specific first. Fields merge
/// individually except the hanging/first-line group, which comes whole from
/// the first layer that sets any of it.
pub fn merge_indent_layers(layers: &[Option<&Indentation>]) -> Indentation {
    let mut merged = Indentation::default();
    let mut first_line_set = false;
    for layer in layers.iter().flatten() {
        let mut layer = **layer;
        let sets_first_line = layer.hanging.is_some()
            || layer.first_line.is_some()
            || layer.hanging_chars.is_some()
            || layer.first_line_chars.is_some();
        if first_line_set {
            layer.hanging = None;
            layer.first_line = None;
            layer.hanging_chars = None;
            layer.first_line_chars = None;
        }
        merged = merged.merge(layer);
        first_line_set |= sets_first_line;
    }
    merged
}

/// Indentation in points. Hanging and first-line character units scale
/// with the first character's size; left/right character units with the
/// paragraph's size.
pub fn resolve_indent(ind: &Indentation, first_char_size: f32, paragraph_size: f32) -> ResolvedIndent {
    let hanging = ind
        .hanging
        .or(ind.hanging_chars.map(|h| hundredth_chars_to_pts(h, first_char_size)));
    let first_line = match hanging {
        Some(hanging) => -hanging,
        None => ind
            .first_line
            .or(ind.first_line_chars.map(|f| hundredth_chars_to_pts(f, first_char_size)))
            .unwrap_or(0.0),
    };
    let left = ind
        .left
        .or(ind.start)
        .or(ind.left_chars.map(|c| hundredth_chars_to_pts(c, paragraph_size)))
        .or(ind.start_chars.map(|c| hundredth_chars_to_pts(c, paragraph_size)))
        .unwrap_or(0.0);
    let right = ind
        .right
        .or(ind.end)
        .or(ind.right_chars.map(|c| hundredth_chars_to_pts(c, paragraph_size)))
        .or(ind.end_chars.map(|c| hundredth_chars_to_pts(c, paragraph_size)))
        .unwrap_or(0.0);
    ResolvedIndent {
        left,
        right,
        first_line,
    }
}

/// Width of the blank that follows a list label so the text starts at the
/// left indent. `None` when the label already reaches it.
pub fn numbering_padding(first_line: f32, label_width: f32) -> Option<f32> {
    let pad = -(first_line + label_width);
    (pad > 0.0).then_some(pad)
}
