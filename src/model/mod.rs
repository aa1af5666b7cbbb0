//! Arena-backed document tree.

pub mod props;
pub mod styles;

pub use props::*;
pub use styles::{
    AbstractNumbering, NumberFormat, NumberingDefinitions, NumberingLevel, Style, StyleKind,
    StyleSheet, Theme, ThemeFontScheme,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum RunItem {
    Text(String),
    Tab,
    LineBreak,
    PageBreak,
    /// `w:sym`, already mapped out of the private-use area.
    Symbol { font: Option<String>, ch: char },
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Body,
    Header,
    Footer,
    Paragraph,
    /// Hyperlinks and simple fields: transparent run containers.
    Hyperlink,
    Run(Vec<RunItem>),
    /// `grid` is `w:tblGrid` in points, `None` when the table declares none.
    Table { grid: Option<Vec<f32>> },
    TableRow,
    TableCell,
}

#[derive(Clone, Debug)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub props: Props,
}

/// Page geometry of the body's section.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Section {
    pub page_width: Option<f32>,
    pub margin_left: Option<f32>,
    pub margin_right: Option<f32>,
}

impl Section {
    pub fn printable_width(&self) -> Option<f32> {
        let width = self.page_width? - self.margin_left.unwrap_or(72.0) - self.margin_right.unwrap_or(72.0);
        (width > 0.0).then_some(width)
    }
}

#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<Node>,
    body: NodeId,
    pub header: Option<NodeId>,
    pub footer: Option<NodeId>,
    pub styles: StyleSheet,
    pub numbering: NumberingDefinitions,
    pub theme: Theme,
    pub section: Section,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Body,
                parent: None,
                children: Vec::new(),
                props: Props::default(),
            }],
            body: NodeId(0),
            header: None,
            footer: None,
            styles: StyleSheet::default(),
            numbering: NumberingDefinitions::default(),
            theme: Theme::default(),
            section: Section::default(),
        }
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Create a detached root (header or footer part).
    pub fn add_root(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: Vec::new(),
            props: Props::default(),
        });
        id
    }

    /// Append a child to `parent` and return its id.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, props: Props) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
            props,
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn props(&self, id: NodeId) -> &Props {
        &self.nodes[id.0].props
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&n| self.parent(n))
    }

    /// Nearest ancestor (excluding `id` itself) whose kind matches.
    pub fn ancestor_where(&self, id: NodeId, pred: impl Fn(&NodeKind) -> bool) -> Option<NodeId> {
        self.ancestors(id).find(|&n| pred(self.kind(n)))
    }

    pub fn enclosing_paragraph(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_where(id, |k| matches!(k, NodeKind::Paragraph))
    }

    pub fn enclosing_table(&self, id: NodeId) -> Option<NodeId> {
        self.ancestor_where(id, |k| matches!(k, NodeKind::Table { .. }))
    }

    /// Runs of a paragraph in reading order, looking through hyperlinks.
    pub fn runs(&self, paragraph: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_runs(paragraph, &mut out);
        out
    }

    fn collect_runs(&self, id: NodeId, out: &mut Vec<NodeId>) {
        for &child in self.children(id) {
            match self.kind(child) {
                NodeKind::Run(_) => out.push(child),
                NodeKind::Hyperlink => self.collect_runs(child, out),
                _ => {}
            }
        }
    }

    pub fn run_items(&self, run: NodeId) -> &[RunItem] {
        match self.kind(run) {
            NodeKind::Run(items) => items,
            _ => &[],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
