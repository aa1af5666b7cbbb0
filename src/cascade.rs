//! Style cascade: effective property values for a node.
//!
//! Each node kind has its own precedence chain of property sources (direct
//! formatting, referenced style chains, defaults). Scalar properties take the
//! first source that defines them; composite properties are merged field by
//! field across every source, the most specific source winning per field.

use std::collections::HashSet;

use crate::model::{
    Alignment, BorderSet, CellMargins, CellVAlign, Color, Document, Indentation, Languages,
    Merge, NodeId, NodeKind, NumberingRef, Props, RowHeight, RunFonts, Shading, Spacing,
    StyleKind, VMerge, VertAlign, WidthSpec,
};

pub const DEFAULT_MAX_STYLE_DEPTH: usize = 32;

/// A typed property that can be looked up in a `Props` bundle.
pub trait Property: Sized + Clone {
    /// Composite properties keep merging after the first hit.
    const MERGED: bool = false;

    fn pick(props: &Props) -> Option<Self>;

    fn merge(self, _fallback: Self) -> Self {
        self
    }
}

macro_rules! property {
    ($(#[$meta:meta])* $name:ident($ty:ty) => $group:ident . $field:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(pub $ty);

        impl Property for $name {
            fn pick(props: &Props) -> Option<Self> {
                props.$group.$field.clone().map($name)
            }
        }
    };
    ($(#[$meta:meta])* merged $name:ident($ty:ty) => $group:ident . $field:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(pub $ty);

        impl Property for $name {
            const MERGED: bool = true;

            fn pick(props: &Props) -> Option<Self> {
                props.$group.$field.clone().map($name)
            }

            fn merge(self, fallback: Self) -> Self {
                $name(Merge::merge(self.0, fallback.0))
            }
        }
    };
}

// Run
property!(merged Fonts(RunFonts) => run.fonts);
property!(Bold(bool) => run.bold);
property!(Italic(bool) => run.italic);
property!(Strike(bool) => run.strike);
property!(Caps(bool) => run.caps);
property!(Vanish(bool) => run.vanish);
property!(Underline(bool) => run.underline);
property!(RightToLeft(bool) => run.rtl);
property!(
    /// `w:cs`: treat the run as complex script regardless of its characters.
    ComplexScriptRun(bool) => run.complex_script
);
property!(VerticalAlign(VertAlign) => run.vert_align);
property!(FontSize(f32) => run.size);
property!(FontSizeCs(f32) => run.size_cs);
property!(TextColor(Color) => run.color);
property!(merged Language(Languages) => run.lang);
property!(merged RunShading(Shading) => run.shading);

// Paragraph
property!(merged Numbering(NumberingRef) => para.numbering);
property!(merged ParaSpacing(Spacing) => para.spacing);
property!(merged ParaIndent(Indentation) => para.indentation);
property!(ParaAlignment(Alignment) => para.alignment);
property!(KeepLines(bool) => para.keep_lines);
property!(KeepNext(bool) => para.keep_next);
property!(ContextualSpacing(bool) => para.contextual_spacing);
property!(AutoSpaceDE(bool) => para.auto_space_de);
property!(AutoSpaceDN(bool) => para.auto_space_dn);
property!(merged ParaShading(Shading) => para.shading);

// Table
property!(TableWidth(WidthSpec) => table.width);
property!(merged TableBorders(BorderSet) => table.borders);
property!(TableAlignment(Alignment) => table.alignment);
property!(TableIndent(WidthSpec) => table.indent);
property!(merged TableCellMargins(CellMargins) => table.cell_margins);
property!(merged TableShading(Shading) => table.shading);

// Row
property!(GridBefore(u32) => row.grid_before);
property!(GridAfter(u32) => row.grid_after);
property!(WidthBefore(WidthSpec) => row.width_before);
property!(WidthAfter(WidthSpec) => row.width_after);
property!(RowHeightRule(RowHeight) => row.height);

// Cell
property!(CellWidth(WidthSpec) => cell.width);
property!(GridSpan(u32) => cell.grid_span);
property!(VerticalMerge(VMerge) => cell.v_merge);
property!(merged CellBorders(BorderSet) => cell.borders);
property!(merged CellMargin(CellMargins) => cell.margins);
property!(merged CellShading(Shading) => cell.shading);
property!(CellAlignment(CellVAlign) => cell.v_align);

/// Read-only resolver over one document.
#[derive(Clone, Copy)]
pub struct StyleResolver<'a> {
    doc: &'a Document,
    max_depth: usize,
}

impl<'a> StyleResolver<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            max_depth: DEFAULT_MAX_STYLE_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    /// Effective value of `P` for `node`, or `None` when no source defines it.
    pub fn resolve<P: Property>(&self, node: NodeId) -> Option<P> {
        fold_sources(self.sources(node))
    }

    /// Effective value of `P` over an explicit list of sources.
    pub fn resolve_in<P: Property>(&self, sources: &[&Props]) -> Option<P> {
        fold_sources(sources.iter().copied())
    }

    /// Property sources for `node`, most specific first.
    pub fn sources(&self, node: NodeId) -> Vec<&'a Props> {
        let doc = self.doc;
        let mut out = Vec::new();
        match doc.kind(node) {
            NodeKind::Run(_) => {
                let direct = doc.props(node);
                out.push(direct);
                out.extend(self.style_chain(direct.run.style.as_deref()));
                if let Some(para) = doc.enclosing_paragraph(node) {
                    out.extend(self.style_chain(doc.props(para).para.style.as_deref()));
                }
                out.extend(self.default_chain(StyleKind::Character));
                out.extend(self.default_chain(StyleKind::Paragraph));
                out.push(&doc.styles.doc_defaults);
            }
            NodeKind::Paragraph => {
                let direct = doc.props(node);
                out.push(direct);
                out.extend(self.style_chain(direct.para.style.as_deref()));
                let in_cell = doc
                    .parent(node)
                    .is_some_and(|p| matches!(doc.kind(p), NodeKind::TableCell));
                if in_cell && let Some(table) = doc.enclosing_table(node) {
                    out.extend(self.table_sources(table));
                }
                out.extend(self.default_chain(StyleKind::Paragraph));
                out.push(&doc.styles.doc_defaults);
            }
            NodeKind::Table { .. } => out.extend(self.table_sources(node)),
            NodeKind::TableRow | NodeKind::TableCell => {
                out.push(doc.props(node));
                if let Some(table) = doc.enclosing_table(node) {
                    out.extend(self.table_sources(table));
                }
            }
            NodeKind::Body | NodeKind::Header | NodeKind::Footer | NodeKind::Hyperlink => {}
        }
        out
    }

    fn table_sources(&self, table: NodeId) -> Vec<&'a Props> {
        let direct = self.doc.props(table);
        let mut out = vec![direct];
        out.extend(self.style_chain(direct.table.style.as_deref()));
        out.extend(self.default_chain(StyleKind::Table));
        out
    }

    fn default_chain(&self, kind: StyleKind) -> Vec<&'a Props> {
        let id = self.doc.styles.default_style(kind).map(|s| s.id.as_str());
        self.style_chain(id)
    }

    /// Props of `id` and its `basedOn` ancestors, nearest first. Stops on a
    /// missing id, a repeated id, or after `max_depth` styles.
    pub fn style_chain(&self, id: Option<&str>) -> Vec<&'a Props> {
        let mut out = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = id;
        while let Some(style_id) = current {
            if visited.len() >= self.max_depth {
                log::debug!("Style chain from {id:?} exceeds {} levels, truncated", self.max_depth);
                break;
            }
            let Some(style) = self.doc.styles.get(style_id) else {
                log::debug!("Style {style_id:?} referenced but not defined");
                break;
            };
            if !visited.insert(style.id.as_str()) {
                log::debug!("Style chain from {id:?} cycles at {style_id:?}");
                break;
            }
            out.push(&style.props);
            current = style.based_on.as_deref();
        }
        out
    }

    /// Paragraph style id in effect: the explicit `pStyle`, else the default
    /// paragraph style.
    pub fn paragraph_style_id(&self, paragraph: NodeId) -> Option<&'a str> {
        self.doc
            .props(paragraph)
            .para
            .style
            .as_deref()
            .filter(|id| self.doc.styles.get(id).is_some())
            .or_else(|| {
                self.doc
                    .styles
                    .default_style(StyleKind::Paragraph)
                    .map(|s| s.id.as_str())
            })
    }
}

fn fold_sources<'p, P: Property>(sources: impl IntoIterator<Item = &'p Props>) -> Option<P> {
    let mut acc: Option<P> = None;
    for props in sources {
        let Some(found) = P::pick(props) else {
            continue;
        };
        if !P::MERGED {
            return Some(found);
        }
        acc = Some(match acc {
            Some(prev) => prev.merge(found),
            None => found,
        });
    }
    acc
}
