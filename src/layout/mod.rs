//! Document walk: paragraphs and tables in reading order, resolved into
//! layout blocks for a [`LayoutSink`].

mod chunk;
mod dump;
mod paragraph;

pub use chunk::{Chunk, ChunkContent, insert_auto_space, split_by_script};
pub use dump::TextDump;
pub use paragraph::{
    ParagraphLayout, ResolvedIndent, declared_spacing, line_spacing, merge_adjacent,
    merge_indent_layers, numbering_padding, paragraph_font_size, resolve_indent,
};

use std::collections::BTreeMap;
use std::time::Instant;

use crate::cascade::{
    AutoSpaceDE, AutoSpaceDN, ContextualSpacing, FontSize, FontSizeCs, KeepLines, KeepNext,
    Language, ParaAlignment, ParaIndent, ParaShading, ParaSpacing, StyleResolver, Vanish,
};
use crate::config::LayoutOptions;
use crate::fonts::{FontCatalog, FontSelector, categorize};
use crate::model::{Alignment, Document, NodeId, NodeKind, Props};
use crate::numbering::{ListLevel, NumberingCounter, paragraph_level, render_label};
use crate::script::ScriptCategory;
use crate::table::{TableLayout, resolve_table};

use chunk::ChunkBuilder;
use paragraph::INDENT_CHAR_SIZE;

/// Size of a list label when no source in its chain sets one.
pub const LABEL_DEFAULT_SIZE: f32 = 12.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    Body,
    Header,
    Footer,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TableBlock {
    pub layout: TableLayout,
    /// Content of each logical cell, keyed by cell id.
    pub cells: BTreeMap<usize, Vec<LayoutBlock>>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum LayoutBlock {
    Paragraph(ParagraphLayout),
    Table(TableBlock),
}

/// Receiver of resolved blocks, in document order per region.
pub trait LayoutSink {
    fn emit(&mut self, region: Region, block: LayoutBlock);
}

impl LayoutSink for Vec<LayoutBlock> {
    fn emit(&mut self, _region: Region, block: LayoutBlock) {
        self.push(block);
    }
}

impl LayoutSink for Vec<(Region, LayoutBlock)> {
    fn emit(&mut self, region: Region, block: LayoutBlock) {
        self.push((region, block));
    }
}

/// One conversion run over one document. Owns the numbering counters, so
/// blocks must be produced in document order.
pub struct LayoutEngine<'a> {
    resolver: StyleResolver<'a>,
    selector: FontSelector<'a>,
    options: &'a LayoutOptions,
    counter: NumberingCounter,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(doc: &'a Document, catalog: &'a dyn FontCatalog, options: &'a LayoutOptions) -> Self {
        let resolver = StyleResolver::new(doc).with_max_depth(options.max_style_depth);
        Self {
            resolver,
            selector: FontSelector::new(resolver, catalog),
            options,
            counter: NumberingCounter::from_definitions(&doc.numbering),
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.resolver
            .document()
            .section
            .printable_width()
            .unwrap_or(self.options.default_printable_width)
    }

    /// Body, then the default header and footer.
    pub fn run(&mut self, sink: &mut impl LayoutSink) {
        let t0 = Instant::now();
        let doc = self.resolver.document();
        let width = self.printable_width();
        let mut count = 0usize;

        let regions = [
            (Region::Body, Some(doc.body())),
            (Region::Header, doc.header),
            (Region::Footer, doc.footer),
        ];
        for (region, root) in regions {
            let Some(root) = root else {
                continue;
            };
            for block in self.layout_container(root, width) {
                count += 1;
                sink.emit(region, block);
            }
        }

        log::info!(
            "Layout: {:.1}ms, {} blocks from {} nodes",
            t0.elapsed().as_secs_f64() * 1000.0,
            count,
            doc.node_count(),
        );
    }

    /// Blocks for the paragraphs and tables directly inside `container`.
    pub fn layout_container(&mut self, container: NodeId, width: f32) -> Vec<LayoutBlock> {
        let doc = self.resolver.document();
        let children = doc.children(container);
        let is_paragraph = |n: &NodeId| matches!(doc.kind(*n), NodeKind::Paragraph);

        let mut blocks = Vec::new();
        let mut pending: Option<ParagraphLayout> = None;
        for (i, &child) in children.iter().enumerate() {
            match doc.kind(child) {
                NodeKind::Paragraph => {
                    let prev = i.checked_sub(1).map(|j| children[j]).filter(is_paragraph);
                    let next = children.get(i + 1).copied().filter(is_paragraph);
                    let Some((mut layout, merges_before)) = self.layout_paragraph(child, prev, next)
                    else {
                        continue;
                    };
                    if merges_before && let Some(prev_layout) = pending.as_mut() {
                        merge_adjacent(prev_layout, &mut layout);
                    }
                    if let Some(done) = pending.replace(layout) {
                        blocks.push(LayoutBlock::Paragraph(done));
                    }
                }
                NodeKind::Table { .. } => {
                    if let Some(done) = pending.take() {
                        blocks.push(LayoutBlock::Paragraph(done));
                    }
                    blocks.push(LayoutBlock::Table(self.layout_table(child, width)));
                }
                _ => {}
            }
        }
        if let Some(done) = pending {
            blocks.push(LayoutBlock::Paragraph(done));
        }
        blocks
    }

    pub fn layout_table(&mut self, table: NodeId, width: f32) -> TableBlock {
        let layout = resolve_table(&self.resolver, table, width);
        let mut cells = BTreeMap::new();
        for cell in &layout.cells {
            let inner =
                cell.width - cell.margins.left.unwrap_or(0.0) - cell.margins.right.unwrap_or(0.0);
            cells.insert(cell.cell_id, self.layout_container(cell.node, inner.max(1.0)));
        }
        TableBlock { layout, cells }
    }

    /// Layout of one paragraph, or `None` for an empty hidden paragraph.
    /// `prev`/`next` are the neighbouring sibling paragraphs. The flag is set
    /// when the paragraph's space before takes part in merging with the
    /// previous paragraph's space after.
    pub fn layout_paragraph(
        &mut self,
        paragraph: NodeId,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    ) -> Option<(ParagraphLayout, bool)> {
        let resolver = self.resolver;
        let doc = resolver.document();
        let builder = ChunkBuilder {
            selector: &self.selector,
            fallback_font: &self.options.fallback_font,
            default_size: self.options.default_font_size,
        };

        let mut chunks: Vec<Chunk> = doc
            .runs(paragraph)
            .into_iter()
            .flat_map(|run| builder.run_chunks(run))
            .collect();

        if chunks.is_empty() {
            if resolver.resolve::<Vanish>(paragraph).is_some_and(|v| v.0) {
                return None;
            }
            let size = resolver
                .resolve::<FontSize>(paragraph)
                .map_or(self.options.default_font_size, |s| s.0);
            let font = self
                .selector
                .select(paragraph, " ", false, false)
                .unwrap_or_else(|| builder.fallback(ScriptCategory::Ascii, false, false));
            chunks.push(Chunk::plain(ChunkContent::Text(" ".into()), font, size));
        }

        let auto_space_letters = resolver.resolve::<AutoSpaceDE>(paragraph).is_none_or(|p| p.0);
        let auto_space_digits = resolver.resolve::<AutoSpaceDN>(paragraph).is_none_or(|p| p.0);
        insert_auto_space(&mut chunks, auto_space_letters, auto_space_digits, |chunk, size| {
            self.selector.measure(&chunk.font, " ", size)
        });

        // Spacing
        let font_size = paragraph_font_size(&chunks);
        let spacing = resolver.resolve::<ParaSpacing>(paragraph).map(|s| s.0);
        let (before, after) = declared_spacing(spacing.as_ref(), font_size);
        let contextual = resolver.resolve::<ContextualSpacing>(paragraph).is_some_and(|c| c.0);
        let same_style = |other: Option<NodeId>| {
            other.is_some_and(|o| {
                resolver.paragraph_style_id(o) == resolver.paragraph_style_id(paragraph)
            })
        };
        let space_after = if contextual && same_style(next) {
            0.0
        } else {
            after.unwrap_or(0.0)
        };
        let (space_before, merges_before) = match before {
            Some(_) if contextual && same_style(prev) => (0.0, false),
            Some(before) => (before, true),
            None => (0.0, false),
        };

        // Numbering and indentation
        let list = paragraph_level(&resolver, &doc.numbering, paragraph);
        let label = list.and_then(|list| {
            let values = self.counter.advance(list.abstract_num.id, list.level.ilvl);
            let label = render_label(list.abstract_num, list.level, &values);
            (!label.is_empty()).then_some((list, label))
        });

        let direct = doc.props(paragraph).para.indentation.as_ref();
        let style_indent = match direct {
            Some(_) => None,
            None => {
                let sources = resolver.sources(paragraph);
                resolver.resolve_in::<ParaIndent>(&sources[1..]).map(|i| i.0)
            }
        };
        let numbering_indent = list.and_then(|l| l.level.para.indentation.as_ref());
        let merged = merge_indent_layers(&[direct, numbering_indent, style_indent.as_ref()]);
        let first_char_size = chunks.first().map_or(0.0, |c| c.size);
        let paragraph_size = resolver
            .resolve::<FontSize>(paragraph)
            .map_or(INDENT_CHAR_SIZE, |s| s.0);
        let indent = resolve_indent(&merged, first_char_size, paragraph_size);

        if let Some((list, text)) = label {
            let label_chunk = self.label_chunk(paragraph, list, text, &builder);
            let label_width = self.selector.measure(
                &label_chunk.font,
                label_chunk.text().unwrap_or(""),
                label_chunk.size,
            );
            let mut prefix = Vec::with_capacity(2);
            if let Some(pad) = numbering_padding(indent.first_line, label_width) {
                let mut spacer = Chunk::plain(
                    ChunkContent::Spacer(pad),
                    label_chunk.font.clone(),
                    label_chunk.size,
                );
                spacer.numbering = true;
                prefix.push(label_chunk);
                prefix.push(spacer);
            } else {
                prefix.push(label_chunk);
            }
            chunks.splice(0..0, prefix);
        }

        let layout = ParagraphLayout {
            node: paragraph,
            alignment: resolver
                .resolve::<ParaAlignment>(paragraph)
                .map_or(Alignment::Left, |a| a.0),
            line_spacing: line_spacing(spacing.as_ref(), font_size),
            space_before,
            space_after,
            indent_left: indent.left,
            indent_right: indent.right,
            first_line_indent: indent.first_line,
            keep_together: resolver.resolve::<KeepLines>(paragraph).is_some_and(|k| k.0),
            keep_next: resolver.resolve::<KeepNext>(paragraph).is_some_and(|k| k.0),
            fill: resolver
                .resolve::<ParaShading>(paragraph)
                .and_then(|s| s.0.fill)
                .and_then(|c| c.rgb()),
            chunks,
        };
        Some((layout, merges_before))
    }

    /// The list label in its own face: the level's run properties, then the
    /// paragraph mark, the paragraph style chain and the document defaults.
    fn label_chunk(
        &self,
        paragraph: NodeId,
        list: ListLevel<'_>,
        text: String,
        builder: &ChunkBuilder<'_, '_>,
    ) -> Chunk {
        let resolver = self.resolver;
        let doc = resolver.document();
        let level_props = Props {
            run: list.level.run.clone(),
            ..Default::default()
        };
        let mut sources: Vec<&Props> = vec![&level_props, doc.props(paragraph)];
        sources.extend(resolver.style_chain(resolver.paragraph_style_id(paragraph)));
        sources.push(&doc.styles.doc_defaults);

        let category = categorize(&text, None, false);
        let lang = resolver.resolve_in::<Language>(&sources).map(|l| l.0);
        let font = self
            .selector
            .select_in(&sources, list.level.run.fonts.as_ref(), lang.as_ref(), category, false, false)
            .unwrap_or_else(|| builder.fallback(category, false, false));
        let size = match category {
            ScriptCategory::ComplexScript => resolver.resolve_in::<FontSizeCs>(&sources).map(|s| s.0),
            _ => None,
        }
        .or_else(|| resolver.resolve_in::<FontSize>(&sources).map(|s| s.0))
        .unwrap_or(LABEL_DEFAULT_SIZE);

        let mut chunk = Chunk::plain(ChunkContent::Text(text), font, size);
        chunk.numbering = true;
        chunk
    }
}
