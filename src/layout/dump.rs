use std::fmt::Write;

use super::{ChunkContent, LayoutBlock, LayoutSink, ParagraphLayout, Region, TableBlock};
use crate::model::{Border, BorderSet};

/// Human-readable listing of every resolved block.
#[derive(Debug, Default)]
pub struct TextDump {
    out: String,
}

impl TextDump {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn block(&mut self, block: &LayoutBlock, depth: usize) {
        match block {
            LayoutBlock::Paragraph(p) => self.paragraph(p, depth),
            LayoutBlock::Table(t) => self.table(t, depth),
        }
    }

    fn paragraph(&mut self, p: &ParagraphLayout, depth: usize) {
        let pad = "  ".repeat(depth);
        let _ = writeln!(
            self.out,
            "{pad}paragraph align={:?} line={:.2} before={:.2} after={:.2} indent={:.2}/{:.2}/{:.2}{}{}{}",
            p.alignment,
            p.line_spacing,
            p.space_before,
            p.space_after,
            p.indent_left,
            p.indent_right,
            p.first_line_indent,
            if p.keep_together { " keep-together" } else { "" },
            if p.keep_next { " keep-next" } else { "" },
            p.fill.map(hex).map(|c| format!(" fill={c}")).unwrap_or_default(),
        );
        for chunk in &p.chunks {
            let content = match &chunk.content {
                ChunkContent::Text(text) => format!("{text:?}"),
                ChunkContent::Tab => "<tab>".to_string(),
                ChunkContent::LineBreak => "<br>".to_string(),
                ChunkContent::PageBreak => "<page>".to_string(),
                ChunkContent::Spacer(width) => format!("<space {width:.2}>"),
            };
            let mut flags = String::new();
            for (on, name) in [
                (chunk.numbering, "label"),
                (chunk.bold, "b"),
                (chunk.italic, "i"),
                (chunk.synthetic_bold, "fake-b"),
                (chunk.synthetic_italic, "fake-i"),
                (chunk.underline, "u"),
                (chunk.strike, "s"),
                (chunk.caps, "caps"),
            ] {
                if on {
                    flags.push(' ');
                    flags.push_str(name);
                }
            }
            if let Some(color) = chunk.color {
                let _ = write!(flags, " color={}", hex(color));
            }
            if chunk.rise != 0.0 {
                let _ = write!(flags, " rise={:.2}", chunk.rise);
            }
            let _ = writeln!(
                self.out,
                "{pad}  {content} font={:?} size={:.2}{flags}",
                chunk.font.family, chunk.size
            );
        }
    }

    fn table(&mut self, t: &TableBlock, depth: usize) {
        let pad = "  ".repeat(depth);
        let layout = &t.layout;
        let widths: Vec<String> = layout.column_widths.iter().map(|w| format!("{w:.2}")).collect();
        let _ = writeln!(
            self.out,
            "{pad}table columns=[{}] align={:?} indent={:.2}",
            widths.join(", "),
            layout.alignment,
            layout.indent
        );
        for (i, row) in layout.rows.iter().enumerate() {
            let height = row
                .height
                .map(|h| format!(" height={:.2} {:?}", h.value, h.rule))
                .unwrap_or_default();
            let _ = writeln!(
                self.out,
                "{pad}  row {i}{height} padding={:.2}/{:.2}",
                row.padding_top, row.padding_bottom
            );
        }
        for cell in &layout.cells {
            let _ = writeln!(
                self.out,
                "{pad}  cell {} at {},{} span={}x{} width={:.2} valign={:?}{} borders={}",
                cell.cell_id,
                cell.row,
                cell.col,
                cell.row_span,
                cell.col_span,
                cell.width,
                cell.v_align,
                cell.fill.map(hex).map(|c| format!(" fill={c}")).unwrap_or_default(),
                borders(&cell.borders),
            );
            for block in t.cells.get(&cell.cell_id).into_iter().flatten() {
                self.block(block, depth + 2);
            }
        }
    }
}

impl LayoutSink for TextDump {
    fn emit(&mut self, region: Region, block: LayoutBlock) {
        let _ = writeln!(self.out, "[{region:?}]");
        self.block(&block, 1);
    }
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("{r:02X}{g:02X}{b:02X}")
}

fn borders(set: &BorderSet) -> String {
    let edge = |name: &str, border: &Option<Border>| {
        border.map(|b| format!("{name}:{:?}/{:.2}", b.style, b.width.unwrap_or(0.0)))
    };
    let parts: Vec<String> = [
        edge("top", &set.top),
        edge("left", &set.left),
        edge("bottom", &set.bottom),
        edge("right", &set.right),
        edge("tl2br", &set.tl2br),
        edge("tr2bl", &set.tr2bl),
    ]
    .into_iter()
    .flatten()
    .collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(" ")
    }
}
