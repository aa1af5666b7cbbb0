use std::collections::HashMap;

use super::props::{ParaProps, Props, RunProps};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleKind {
    Paragraph,
    Character,
    Table,
    Numbering,
}

#[derive(Clone, Debug)]
pub struct Style {
    pub id: String,
    pub name: Option<String>,
    pub kind: StyleKind,
    pub based_on: Option<String>,
    pub link: Option<String>,
    pub is_default: bool,
    pub props: Props,
}

impl Style {
    pub fn new(id: &str, kind: StyleKind) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            kind,
            based_on: None,
            link: None,
            is_default: false,
            props: Props::default(),
        }
    }

    pub fn based_on(mut self, parent: &str) -> Self {
        self.based_on = Some(parent.to_string());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
    styles: HashMap<String, Style>,
    defaults: HashMap<StyleKind, String>,
    /// `w:docDefaults`: rPrDefault in `run`, pPrDefault in `para`.
    pub doc_defaults: Props,
}

impl StyleSheet {
    /// Insert in document order; the first `w:default="1"` style of each
    /// kind becomes that kind's default.
    pub fn insert(&mut self, style: Style) {
        if style.is_default {
            self.defaults
                .entry(style.kind)
                .or_insert_with(|| style.id.clone());
        }
        self.styles.insert(style.id.clone(), style);
    }

    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    pub fn default_style(&self, kind: StyleKind) -> Option<&Style> {
        self.defaults.get(&kind).and_then(|id| self.styles.get(id))
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Fold `w:link` pairs. A paragraph style takes its linked character
    /// style's run properties; a character style is replaced by its linked
    /// paragraph style carrying the character style's run properties.
    pub fn resolve_links(&mut self) {
        let mut updates: Vec<(String, Style)> = Vec::new();
        for style in self.styles.values() {
            let Some(linked) = style.link.as_deref().and_then(|id| self.styles.get(id)) else {
                continue;
            };
            match style.kind {
                StyleKind::Paragraph => {
                    if linked.props.run.is_empty() {
                        continue;
                    }
                    let mut merged = style.clone();
                    merged.props.run = linked.props.run.clone();
                    updates.push((style.id.clone(), merged));
                }
                StyleKind::Character => {
                    if linked.props.run.is_empty() {
                        continue;
                    }
                    let mut merged = linked.clone();
                    if !style.props.run.is_empty() {
                        merged.props.run = style.props.run.clone();
                    }
                    merged.id = style.id.clone();
                    merged.is_default = style.is_default;
                    updates.push((style.id.clone(), merged));
                }
                StyleKind::Table | StyleKind::Numbering => {}
            }
        }
        for (id, style) in updates {
            log::debug!("Style {id}: folded linked style {:?}", style.link);
            self.styles.insert(id, style);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ThemeFontScheme {
    pub latin: Option<String>,
    pub east_asian: Option<String>,
    pub complex_script: Option<String>,
    /// `a:font script="..." typeface="..."` entries, in document order.
    pub supplemental: Vec<(String, String)>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Theme {
    pub major: ThemeFontScheme,
    pub minor: ThemeFontScheme,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NumberFormat {
    Decimal,
    DecimalZero,
    LowerRoman,
    UpperRoman,
    LowerLetter,
    UpperLetter,
    TaiwaneseCountingThousand,
    Bullet,
    None,
    Other(String),
}

impl NumberFormat {
    pub fn parse(val: &str) -> NumberFormat {
        match val {
            "decimal" => NumberFormat::Decimal,
            "decimalZero" => NumberFormat::DecimalZero,
            "lowerRoman" => NumberFormat::LowerRoman,
            "upperRoman" => NumberFormat::UpperRoman,
            "lowerLetter" => NumberFormat::LowerLetter,
            "upperLetter" => NumberFormat::UpperLetter,
            "taiwaneseCountingThousand" => NumberFormat::TaiwaneseCountingThousand,
            "bullet" => NumberFormat::Bullet,
            "none" => NumberFormat::None,
            other => NumberFormat::Other(other.to_string()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct NumberingLevel {
    pub ilvl: u8,
    pub start: Option<i32>,
    pub format: NumberFormat,
    /// `w:lvlText`, with `%1`..`%9` placeholders.
    pub text: String,
    pub paragraph_style: Option<String>,
    pub para: ParaProps,
    pub run: RunProps,
}

impl NumberingLevel {
    pub fn new(ilvl: u8, format: NumberFormat, text: &str) -> Self {
        Self {
            ilvl,
            start: None,
            format,
            text: text.to_string(),
            paragraph_style: None,
            para: ParaProps::default(),
            run: RunProps::default(),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct AbstractNumbering {
    pub id: i32,
    pub levels: Vec<NumberingLevel>,
}

impl AbstractNumbering {
    pub fn level(&self, ilvl: u8) -> Option<&NumberingLevel> {
        self.levels.iter().find(|l| l.ilvl == ilvl)
    }
}

#[derive(Clone, Debug, Default)]
pub struct NumberingDefinitions {
    pub abstract_nums: HashMap<i32, AbstractNumbering>,
    /// `w:num` id → abstract numbering id.
    pub instances: HashMap<i32, i32>,
}

impl NumberingDefinitions {
    pub fn abstract_for(&self, num_id: i32) -> Option<&AbstractNumbering> {
        self.instances
            .get(&num_id)
            .and_then(|abs| self.abstract_nums.get(abs))
    }
}
