//! Typed formatting properties.
//!
//! Every field is optional: `None` means "not defined at this level" and lets
//! the cascade fall through to the next source. Explicit "off" values such as
//! `w:b w:val="0"` or a `nil` border are `Some` and stop the fall-through.

use crate::script::ScriptCategory;

/// Field-by-field merge of a composite property: fields already set on `self`
/// win, unset ones are filled from `fallback`.
pub trait Merge {
    fn merge(self, fallback: Self) -> Self;
}

macro_rules! merge_fields {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl Merge for $ty {
            fn merge(self, fallback: Self) -> Self {
                $ty {
                    $($field: self.$field.or(fallback.$field),)+
                }
            }
        }
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Auto,
    Rgb([u8; 3]),
}

impl Color {
    pub fn rgb(self) -> Option<[u8; 3]> {
        match self {
            Color::Auto => None,
            Color::Rgb(rgb) => Some(rgb),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontHint {
    Default,
    EastAsia,
    ComplexScript,
}

/// `w:rFonts`: one face per script slot; the `*Theme` attribute takes
/// precedence over the plain name of the same slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunFonts {
    pub ascii: Option<String>,
    pub h_ansi: Option<String>,
    pub east_asia: Option<String>,
    pub cs: Option<String>,
    pub ascii_theme: Option<String>,
    pub h_ansi_theme: Option<String>,
    pub east_asia_theme: Option<String>,
    pub cs_theme: Option<String>,
    pub hint: Option<FontHint>,
}

merge_fields!(RunFonts {
    ascii,
    h_ansi,
    east_asia,
    cs,
    ascii_theme,
    h_ansi_theme,
    east_asia_theme,
    cs_theme,
    hint,
});

impl RunFonts {
    pub fn slot(&self, category: ScriptCategory) -> Option<&str> {
        let (theme, name) = match category {
            ScriptCategory::Ascii => (&self.ascii_theme, &self.ascii),
            ScriptCategory::HighAnsi => (&self.h_ansi_theme, &self.h_ansi),
            ScriptCategory::EastAsian => (&self.east_asia_theme, &self.east_asia),
            ScriptCategory::ComplexScript => (&self.cs_theme, &self.cs),
            ScriptCategory::Unknown => return None,
        };
        theme
            .as_deref()
            .or(name.as_deref())
            .filter(|s| !s.is_empty())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Languages {
    pub val: Option<String>,
    pub east_asia: Option<String>,
    pub bidi: Option<String>,
}

merge_fields!(Languages { val, east_asia, bidi });

impl Languages {
    pub fn for_category(&self, category: ScriptCategory) -> Option<&str> {
        match category {
            ScriptCategory::EastAsian => self.east_asia.as_deref(),
            ScriptCategory::ComplexScript => self.bidi.as_deref(),
            _ => self.val.as_deref(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VertAlign {
    Baseline,
    Superscript,
    Subscript,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Shading {
    pub fill: Option<Color>,
}

merge_fields!(Shading { fill });

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunProps {
    pub style: Option<String>,
    pub fonts: Option<RunFonts>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub strike: Option<bool>,
    pub caps: Option<bool>,
    pub vanish: Option<bool>,
    pub rtl: Option<bool>,
    pub complex_script: Option<bool>,
    pub underline: Option<bool>,
    pub vert_align: Option<VertAlign>,
    pub size: Option<f32>,
    pub size_cs: Option<f32>,
    pub color: Option<Color>,
    pub lang: Option<Languages>,
    pub shading: Option<Shading>,
}

impl RunProps {
    pub fn is_empty(&self) -> bool {
        *self == RunProps::default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LineRule {
    Auto,
    Exact,
    AtLeast,
}

/// `w:spacing`. Lengths in points, `*_lines` in hundredths of a line,
/// `line` raw (240ths of a line for `Auto`, twips otherwise).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spacing {
    pub before: Option<f32>,
    pub after: Option<f32>,
    pub before_lines: Option<f32>,
    pub after_lines: Option<f32>,
    pub line: Option<f32>,
    pub line_rule: Option<LineRule>,
}

merge_fields!(Spacing {
    before,
    after,
    before_lines,
    after_lines,
    line,
    line_rule,
});

/// `w:ind`. Lengths in points, `*_chars` in hundredths of a character.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Indentation {
    pub left: Option<f32>,
    pub start: Option<f32>,
    pub right: Option<f32>,
    pub end: Option<f32>,
    pub hanging: Option<f32>,
    pub first_line: Option<f32>,
    pub left_chars: Option<f32>,
    pub start_chars: Option<f32>,
    pub right_chars: Option<f32>,
    pub end_chars: Option<f32>,
    pub hanging_chars: Option<f32>,
    pub first_line_chars: Option<f32>,
}

merge_fields!(Indentation {
    left,
    start,
    right,
    end,
    hanging,
    first_line,
    left_chars,
    start_chars,
    right_chars,
    end_chars,
    hanging_chars,
    first_line_chars,
});

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NumberingRef {
    pub num_id: Option<i32>,
    pub ilvl: Option<u8>,
}

merge_fields!(NumberingRef { num_id, ilvl });

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParaProps {
    pub style: Option<String>,
    pub numbering: Option<NumberingRef>,
    pub spacing: Option<Spacing>,
    pub indentation: Option<Indentation>,
    pub alignment: Option<Alignment>,
    pub keep_lines: Option<bool>,
    pub keep_next: Option<bool>,
    pub contextual_spacing: Option<bool>,
    pub auto_space_de: Option<bool>,
    pub auto_space_dn: Option<bool>,
    pub shading: Option<Shading>,
}

/// `ST_TblWidth`-style measurement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WidthSpec {
    Auto,
    Nil,
    /// Points.
    Dxa(f32),
    /// Fraction of the reference width (0.5 = 50%).
    Pct(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BorderStyle {
    Nil,
    None,
    Single,
    Thick,
    Double,
    Dotted,
    Dashed,
    DotDash,
    DotDotDash,
    Triple,
    ThinThickSmallGap,
    ThickThinSmallGap,
    ThinThickThinSmallGap,
    ThinThickMediumGap,
    ThickThinMediumGap,
    ThinThickThinMediumGap,
    ThinThickLargeGap,
    ThickThinLargeGap,
    ThinThickThinLargeGap,
    Wave,
    DoubleWave,
    DashSmallGap,
    DashDotStroked,
    ThreeDEmboss,
    ThreeDEngrave,
    Outset,
    Inset,
    /// Art borders and anything else Word accepts; ranks as `Single`.
    Other,
}

impl BorderStyle {
    pub fn parse(val: &str) -> BorderStyle {
        match val {
            "nil" => BorderStyle::Nil,
            "none" => BorderStyle::None,
            "single" => BorderStyle::Single,
            "thick" => BorderStyle::Thick,
            "double" => BorderStyle::Double,
            "dotted" => BorderStyle::Dotted,
            "dashed" => BorderStyle::Dashed,
            "dotDash" => BorderStyle::DotDash,
            "dotDotDash" => BorderStyle::DotDotDash,
            "triple" => BorderStyle::Triple,
            "thinThickSmallGap" => BorderStyle::ThinThickSmallGap,
            "thickThinSmallGap" => BorderStyle::ThickThinSmallGap,
            "thinThickThinSmallGap" => BorderStyle::ThinThickThinSmallGap,
            "thinThickMediumGap" => BorderStyle::ThinThickMediumGap,
            "thickThinMediumGap" => BorderStyle::ThickThinMediumGap,
            "thinThickThinMediumGap" => BorderStyle::ThinThickThinMediumGap,
            "thinThickLargeGap" => BorderStyle::ThinThickLargeGap,
            "thickThinLargeGap" => BorderStyle::ThickThinLargeGap,
            "thinThickThinLargeGap" => BorderStyle::ThinThickThinLargeGap,
            "wave" => BorderStyle::Wave,
            "doubleWave" => BorderStyle::DoubleWave,
            "dashSmallGap" => BorderStyle::DashSmallGap,
            "dashDotStroked" => BorderStyle::DashDotStroked,
            "threeDEmboss" => BorderStyle::ThreeDEmboss,
            "threeDEngrave" => BorderStyle::ThreeDEngrave,
            "outset" => BorderStyle::Outset,
            "inset" => BorderStyle::Inset,
            _ => BorderStyle::Other,
        }
    }

    /// Conflict ranking: the heavier style wins a shared edge.
    pub fn weight(self) -> u8 {
        match self {
            BorderStyle::Nil | BorderStyle::None => 0,
            BorderStyle::Single | BorderStyle::Other => 1,
            BorderStyle::Thick => 2,
            BorderStyle::Double => 3,
            BorderStyle::Dotted => 4,
            BorderStyle::Dashed => 5,
            BorderStyle::DotDash => 6,
            BorderStyle::DotDotDash => 7,
            BorderStyle::Triple => 8,
            BorderStyle::ThinThickSmallGap => 9,
            BorderStyle::ThickThinSmallGap => 10,
            BorderStyle::ThinThickThinSmallGap => 11,
            BorderStyle::ThinThickMediumGap => 12,
            BorderStyle::ThickThinMediumGap => 13,
            BorderStyle::ThinThickThinMediumGap => 14,
            BorderStyle::ThinThickLargeGap => 15,
            BorderStyle::ThickThinLargeGap => 16,
            BorderStyle::ThinThickThinLargeGap => 17,
            BorderStyle::Wave => 18,
            BorderStyle::DoubleWave => 19,
            BorderStyle::DashSmallGap => 20,
            BorderStyle::DashDotStroked => 21,
            BorderStyle::ThreeDEmboss => 22,
            BorderStyle::ThreeDEngrave => 23,
            BorderStyle::Outset => 24,
            BorderStyle::Inset => 25,
        }
    }

    pub fn is_visible(self) -> bool {
        !matches!(self, BorderStyle::Nil | BorderStyle::None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Border {
    pub style: BorderStyle,
    /// Points.
    pub width: Option<f32>,
    pub color: Option<Color>,
}

impl Border {
    pub fn new(style: BorderStyle, width: f32, color: Option<[u8; 3]>) -> Self {
        Self {
            style,
            width: Some(width),
            color: color.map(Color::Rgb),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.style.is_visible()
    }

    /// Drawn width; hidden borders occupy no space.
    pub fn drawn_width(&self) -> f32 {
        if self.is_visible() {
            self.width.unwrap_or(0.0)
        } else {
            0.0
        }
    }
}

/// Four edges, the two inside edges used by table-level definitions, and the
/// two cell diagonals.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BorderSet {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
    pub inside_h: Option<Border>,
    pub inside_v: Option<Border>,
    pub tl2br: Option<Border>,
    pub tr2bl: Option<Border>,
}

merge_fields!(BorderSet {
    top,
    bottom,
    left,
    right,
    inside_h,
    inside_v,
    tl2br,
    tr2bl,
});

/// Cell margins in points.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellMargins {
    pub top: Option<f32>,
    pub left: Option<f32>,
    pub bottom: Option<f32>,
    pub right: Option<f32>,
}

merge_fields!(CellMargins {
    top,
    left,
    bottom,
    right,
});

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableProps {
    pub style: Option<String>,
    pub width: Option<WidthSpec>,
    pub borders: Option<BorderSet>,
    pub alignment: Option<Alignment>,
    pub indent: Option<WidthSpec>,
    pub cell_margins: Option<CellMargins>,
    pub shading: Option<Shading>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HeightRule {
    Auto,
    AtLeast,
    Exact,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RowHeight {
    /// Points.
    pub value: f32,
    pub rule: HeightRule,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RowProps {
    pub grid_before: Option<u32>,
    pub grid_after: Option<u32>,
    pub width_before: Option<WidthSpec>,
    pub width_after: Option<WidthSpec>,
    pub height: Option<RowHeight>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VMerge {
    Restart,
    Continue,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellVAlign {
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellProps {
    pub width: Option<WidthSpec>,
    pub grid_span: Option<u32>,
    pub v_merge: Option<VMerge>,
    pub borders: Option<BorderSet>,
    pub margins: Option<CellMargins>,
    pub shading: Option<Shading>,
    pub v_align: Option<CellVAlign>,
}

/// Everything a node or a style can carry, grouped by property family.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Props {
    pub run: RunProps,
    pub para: ParaProps,
    pub table: TableProps,
    pub row: RowProps,
    pub cell: CellProps,
}
