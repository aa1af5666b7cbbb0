//! Run content to styled chunks.

use crate::cascade::{
    Bold, Caps, FontSize, FontSizeCs, Italic, Strike, TextColor, Underline, Vanish, VerticalAlign,
};
use crate::fonts::{FontDescriptor, FontSelector};
use crate::model::{NodeId, RunItem, VertAlign};
use crate::script::{ScriptCategory, classify_char};

const SCRIPT_SCALE: f32 = 0.58;
const SUPERSCRIPT_RISE: f32 = 0.35;
const SUBSCRIPT_RISE: f32 = -0.14;

#[derive(Clone, Debug, PartialEq)]
pub enum ChunkContent {
    Text(String),
    Tab,
    LineBreak,
    PageBreak,
    /// Blank advance of a fixed width in points.
    Spacer(f32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chunk {
    pub content: ChunkContent,
    pub font: FontDescriptor,
    /// Points, after super/subscript scaling.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub synthetic_bold: bool,
    pub synthetic_italic: bool,
    pub strike: bool,
    pub underline: bool,
    pub caps: bool,
    pub color: Option<[u8; 3]>,
    /// Baseline shift in points, positive up.
    pub rise: f32,
    /// The list label of a numbered paragraph (and its padding).
    pub numbering: bool,
}

impl Chunk {
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            ChunkContent::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self.content, ChunkContent::LineBreak | ChunkContent::PageBreak)
    }

    /// Plain chunk in `font`, used for labels, spacers and fallbacks.
    pub fn plain(content: ChunkContent, font: FontDescriptor, size: f32) -> Self {
        Self {
            content,
            synthetic_bold: false,
            synthetic_italic: false,
            font,
            size,
            bold: false,
            italic: false,
            strike: false,
            underline: false,
            caps: false,
            color: None,
            rise: 0.0,
            numbering: false,
        }
    }
}

/// Resolved run formatting shared by the run's chunks.
#[derive(Clone, Copy, Debug)]
struct RunStyle {
    size: f32,
    size_cs: f32,
    bold: bool,
    italic: bool,
    strike: bool,
    underline: bool,
    caps: bool,
    color: Option<[u8; 3]>,
    vert_align: VertAlign,
}

pub(crate) struct ChunkBuilder<'a, 'b> {
    pub selector: &'b FontSelector<'a>,
    pub fallback_font: &'b str,
    pub default_size: f32,
}

impl ChunkBuilder<'_, '_> {
    /// Chunks for one run. Hidden runs produce nothing; text is split where
    /// the script category changes so each piece gets its own face.
    pub fn run_chunks(&self, run: NodeId) -> Vec<Chunk> {
        let resolver = self.selector.resolver();
        if resolver.resolve::<Vanish>(run).is_some_and(|v| v.0) {
            return Vec::new();
        }
        let size = resolver.resolve::<FontSize>(run).map_or(self.default_size, |s| s.0);
        let style = RunStyle {
            size,
            size_cs: resolver.resolve::<FontSizeCs>(run).map_or(size, |s| s.0),
            bold: resolver.resolve::<Bold>(run).is_some_and(|p| p.0),
            italic: resolver.resolve::<Italic>(run).is_some_and(|p| p.0),
            strike: resolver.resolve::<Strike>(run).is_some_and(|p| p.0),
            underline: resolver.resolve::<Underline>(run).is_some_and(|p| p.0),
            caps: resolver.resolve::<Caps>(run).is_some_and(|p| p.0),
            color: resolver.resolve::<TextColor>(run).and_then(|c| c.0.rgb()),
            vert_align: resolver
                .resolve::<VerticalAlign>(run)
                .map_or(VertAlign::Baseline, |v| v.0),
        };

        let mut chunks = Vec::new();
        for item in resolver.document().run_items(run) {
            match item {
                RunItem::Text(text) => {
                    for piece in split_by_script(text) {
                        let font = self.font_for(run, piece, style.bold, style.italic);
                        chunks.push(self.styled(ChunkContent::Text(piece.to_string()), font, &style));
                    }
                }
                RunItem::Symbol { font, ch } => {
                    let text = ch.to_string();
                    let face = font
                        .as_deref()
                        .and_then(|family| self.selector.catalog_face(family, style.bold, style.italic, &text))
                        .unwrap_or_else(|| self.font_for(run, &text, style.bold, style.italic));
                    chunks.push(self.styled(ChunkContent::Text(text), face, &style));
                }
                RunItem::Tab => {
                    let font = self.font_for(run, "", style.bold, style.italic);
                    chunks.push(self.styled(ChunkContent::Tab, font, &style));
                }
                RunItem::LineBreak => {
                    let font = self.font_for(run, "", style.bold, style.italic);
                    chunks.push(self.styled(ChunkContent::LineBreak, font, &style));
                }
                RunItem::PageBreak => {
                    let font = self.font_for(run, "", style.bold, style.italic);
                    chunks.push(self.styled(ChunkContent::PageBreak, font, &style));
                }
            }
        }
        chunks
    }

    fn font_for(&self, run: NodeId, text: &str, bold: bool, italic: bool) -> FontDescriptor {
        self.selector
            .select(run, text, bold, italic)
            .unwrap_or_else(|| {
                let category = self.selector.category(run, text);
                self.fallback(category, bold, italic)
            })
    }

    /// The configured fallback family, reported as a soft warning.
    pub fn fallback(&self, category: ScriptCategory, bold: bool, italic: bool) -> FontDescriptor {
        log::warn!(
            "No font face resolved for {category:?} text, using {:?}",
            self.fallback_font
        );
        let face = self.selector.catalog().find(self.fallback_font, bold, italic);
        FontDescriptor {
            family: face
                .as_ref()
                .map_or_else(|| self.fallback_font.to_string(), |f| f.family.clone()),
            path: face.as_ref().and_then(|f| f.path.clone()),
            face_index: face.as_ref().map_or(0, |f| f.face_index),
            category,
            exact_match: face.is_some_and(|f| f.exact),
        }
    }

    fn styled(&self, content: ChunkContent, font: FontDescriptor, style: &RunStyle) -> Chunk {
        let base = if font.category == ScriptCategory::ComplexScript {
            style.size_cs
        } else {
            style.size
        };
        let (size, rise) = match style.vert_align {
            VertAlign::Baseline => (base, 0.0),
            VertAlign::Superscript => (base * SCRIPT_SCALE, base * SUPERSCRIPT_RISE),
            VertAlign::Subscript => (base * SCRIPT_SCALE, base * SUBSCRIPT_RISE),
        };
        let content = match content {
            ChunkContent::Text(text) if style.caps => ChunkContent::Text(text.to_uppercase()),
            other => other,
        };
        Chunk {
            content,
            synthetic_bold: font.synthetic_bold(style.bold),
            synthetic_italic: font.synthetic_italic(style.italic),
            font,
            size,
            bold: style.bold,
            italic: style.italic,
            strike: style.strike,
            underline: style.underline,
            caps: style.caps,
            color: style.color,
            rise,
            numbering: false,
        }
    }
}

fn is_east_asian(ch: char) -> bool {
    classify_char(ch).category == ScriptCategory::EastAsian
}

/// Split `text` where the script category changes. Whitespace stays with the
/// piece before it; leading whitespace belongs to the first piece, whose
/// face follows its first visible character.
pub fn split_by_script(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<ScriptCategory> = None;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            continue;
        }
        let category = classify_char(ch).category;
        if let Some(prev) = current
            && prev != category
            && idx > start
        {
            pieces.push(&text[start..idx]);
            start = idx;
        }
        current = Some(category);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces
}

/// Insert spacers between neighbouring chunks where East Asian text meets
/// other text. `letters` enables the letter case (`autoSpaceDE`), `digits`
/// the number case (`autoSpaceDN`). Spacers are sized from the preceding
/// chunk at 7/8 of its font size.
pub fn insert_auto_space(
    chunks: &mut Vec<Chunk>,
    letters: bool,
    digits: bool,
    space_width: impl Fn(&Chunk, f32) -> f32,
) {
    if (!letters && !digits) || chunks.len() < 2 {
        return;
    }
    for i in (0..chunks.len() - 1).rev() {
        let (front, rear) = (&chunks[i], &chunks[i + 1]);
        if front.is_break() || rear.is_break() {
            continue;
        }
        let (Some(front_text), Some(rear_text)) = (front.text(), rear.text()) else {
            continue;
        };
        let (Some(a), Some(b)) = (front_text.chars().last(), rear_text.chars().next()) else {
            continue;
        };
        if matches!(a, ' ' | '\u{a0}' | '\n') || matches!(b, ' ' | '\u{a0}' | '\n') {
            continue;
        }
        if !crosses_east_asian_boundary(a, b) {
            continue;
        }
        let by_digit = digits && (a.is_numeric() || b.is_numeric());
        let by_letter = letters && (a.is_alphabetic() || b.is_alphabetic());
        if !by_digit && !by_letter {
            continue;
        }
        let size = front.size * 0.875;
        let spacer = Chunk::plain(
            ChunkContent::Spacer(space_width(front, size)),
            front.font.clone(),
            size,
        );
        chunks.insert(i + 1, spacer);
    }
}

fn crosses_east_asian_boundary(a: char, b: char) -> bool {
    let other = |ch: char| {
        !matches!(
            classify_char(ch).category,
            ScriptCategory::EastAsian | ScriptCategory::ComplexScript
        )
    };
    (is_east_asian(a) && other(b)) || (is_east_asian(b) && other(a))
}
