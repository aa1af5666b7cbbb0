//! Font selection: which face renders a piece of text.
//!
//! The first character of the text picks a `w:rFonts` slot. The slot is
//! looked up through the run's property sources; the name found may be a
//! real family or a placeholder (`minorHAnsi`, `eastAsia`, ...) that is
//! re-resolved against the document defaults, then the theme. When no face
//! is found, the run language is mapped to a script tag and looked up in the
//! theme's supplemental fonts.

mod catalog;
pub mod metrics;

pub use catalog::{FaceMatch, FontCatalog, MemoryCatalog, SystemFonts};

use std::path::PathBuf;

use crate::cascade::{ComplexScriptRun, Fonts, Language, RightToLeft, StyleResolver};
use crate::model::{FontHint, Languages, NodeId, Props, RunFonts, Theme};
use crate::script::{ScriptCategory, classify_char};

/// Slot names Word writes where a family name is expected.
const PLACEHOLDER_NAMES: &[&str] = &[
    "eastAsia",
    "cs",
    "hAnsi",
    "ascii",
    "majorBidi",
    "minorBidi",
    "majorHAnsi",
    "minorHAnsi",
    "majorAscii",
    "minorAscii",
    "majorEastAsia",
    "minorEastAsia",
];

#[derive(Clone, Debug, PartialEq)]
pub struct FontDescriptor {
    pub family: String,
    pub path: Option<PathBuf>,
    pub face_index: u32,
    pub category: ScriptCategory,
    /// The face has the requested style; no synthetic bold/italic needed.
    pub exact_match: bool,
}

impl FontDescriptor {
    pub fn synthetic_bold(&self, bold: bool) -> bool {
        bold && !self.exact_match
    }

    pub fn synthetic_italic(&self, italic: bool) -> bool {
        italic && !self.exact_match
    }

    pub fn face(&self) -> FaceMatch {
        FaceMatch {
            family: self.family.clone(),
            path: self.path.clone(),
            face_index: self.face_index,
            exact: self.exact_match,
        }
    }
}

pub struct FontSelector<'a> {
    resolver: StyleResolver<'a>,
    catalog: &'a dyn FontCatalog,
}

impl<'a> FontSelector<'a> {
    pub fn new(resolver: StyleResolver<'a>, catalog: &'a dyn FontCatalog) -> Self {
        Self { resolver, catalog }
    }

    pub fn catalog(&self) -> &'a dyn FontCatalog {
        self.catalog
    }

    pub fn resolver(&self) -> &StyleResolver<'a> {
        &self.resolver
    }

    /// Face for an explicitly named family, as `w:sym` carries.
    pub fn catalog_face(&self, family: &str, bold: bool, italic: bool, text: &str) -> Option<FontDescriptor> {
        let face = self.lookup(family, bold, italic)?;
        Some(FontDescriptor {
            family: face.family,
            path: face.path,
            face_index: face.face_index,
            category: categorize(text, None, false),
            exact_match: face.exact,
        })
    }

    /// Advance width of `text` in `font`.
    pub fn measure(&self, font: &FontDescriptor, text: &str, size: f32) -> f32 {
        self.catalog.measure(&font.face(), text, size)
    }

    /// Script category of `text` as rendered by `run`.
    pub fn category(&self, run: NodeId, text: &str) -> ScriptCategory {
        let direct_hint = self
            .resolver
            .document()
            .props(run)
            .run
            .fonts
            .as_ref()
            .and_then(|f| f.hint);
        let forced_cs = self.resolver.resolve::<RightToLeft>(run).is_some_and(|p| p.0)
            || self.resolver.resolve::<ComplexScriptRun>(run).is_some_and(|p| p.0);
        categorize(text, direct_hint, forced_cs)
    }

    /// Face for `text` in `run`, or `None` when nothing in the chain names
    /// an available face.
    pub fn select(&self, run: NodeId, text: &str, bold: bool, italic: bool) -> Option<FontDescriptor> {
        let category = self.category(run, text);
        let sources = self.resolver.sources(run);
        let direct = self.resolver.document().props(run).run.fonts.as_ref();
        let lang = self.resolver.resolve::<Language>(run).map(|l| l.0);
        self.select_in(&sources, direct, lang.as_ref(), category, bold, italic)
    }

    /// Face for `category` from an explicit source list, most specific first.
    /// `direct` supplies the `w:hint` used when no source names the slot.
    pub fn select_in(
        &self,
        sources: &[&Props],
        direct: Option<&RunFonts>,
        lang: Option<&Languages>,
        category: ScriptCategory,
        bold: bool,
        italic: bool,
    ) -> Option<FontDescriptor> {
        let slot_name = sources
            .iter()
            .find_map(|props| props.run.fonts.as_ref().and_then(|f| f.slot(category)))
            .or_else(|| {
                direct.and_then(|f| f.hint).map(|hint| match hint {
                    FontHint::Default => "default",
                    FontHint::EastAsia => "eastAsia",
                    FontHint::ComplexScript => "cs",
                })
            })
            .unwrap_or("");

        let found = self
            .resolve_name(slot_name, bold, italic)
            .or_else(|| self.resolve_language(lang, category, bold, italic));
        let Some(face) = found else {
            log::debug!("No face for {category:?} slot {slot_name:?}");
            return None;
        };
        Some(FontDescriptor {
            family: face.family,
            path: face.path,
            face_index: face.face_index,
            category,
            exact_match: face.exact,
        })
    }

    /// Look up `name` directly, then as a placeholder against the document
    /// defaults and the theme.
    fn resolve_name(&self, name: &str, bold: bool, italic: bool) -> Option<FaceMatch> {
        if let Some(face) = self.lookup(name, bold, italic) {
            return Some(face);
        }
        if name.is_empty() {
            return None;
        }
        let doc = self.resolver.document();
        if let Some(defaults) = doc.styles.doc_defaults.run.fonts.as_ref() {
            let default_name = if contains_ignore_case(name, "eastAsia") {
                defaults.east_asia.as_deref()
            } else if contains_ignore_case(name, "cs") {
                defaults.cs.as_deref()
            } else if contains_ignore_case(name, "hAnsi") {
                defaults.h_ansi.as_deref()
            } else if contains_ignore_case(name, "ascii") {
                defaults.ascii.as_deref()
            } else {
                None
            };
            if let Some(face) = default_name.and_then(|n| self.lookup(n, bold, italic)) {
                return Some(face);
            }
        }
        theme_font(&doc.theme, name).and_then(|n| self.lookup(n, bold, italic))
    }

    fn resolve_language(
        &self,
        lang: Option<&Languages>,
        category: ScriptCategory,
        bold: bool,
        italic: bool,
    ) -> Option<FaceMatch> {
        let locale = lang?.for_category(category)?;
        let tag = script_tag_for_locale(locale)?;
        let theme = &self.resolver.document().theme;
        let family = theme
            .minor
            .supplemental
            .iter()
            .find(|(script, _)| contains_ignore_case(script, tag))
            .map(|(_, typeface)| typeface.as_str())?;
        self.lookup(family, bold, italic)
    }

    fn lookup(&self, name: &str, bold: bool, italic: bool) -> Option<FaceMatch> {
        if name.is_empty() || PLACEHOLDER_NAMES.contains(&name) {
            return None;
        }
        if name == "Symbol" {
            let found = self.catalog.find(name, bold, italic);
            return Some(FaceMatch {
                family: name.to_string(),
                path: found.as_ref().and_then(|f| f.path.clone()),
                face_index: found.map(|f| f.face_index).unwrap_or(0),
                exact: true,
            });
        }
        self.catalog.find(name, bold, italic)
    }
}

/// Category of the first character, with the `w:hint` and complex-script
/// overrides applied. Empty text counts as Ascii.
pub fn categorize(text: &str, hint: Option<FontHint>, forced_cs: bool) -> ScriptCategory {
    if forced_cs {
        return ScriptCategory::ComplexScript;
    }
    // Leading whitespace takes the script of the text that follows it.
    let Some(first) = text.chars().find(|c| !c.is_whitespace()).or_else(|| text.chars().next()) else {
        return ScriptCategory::Ascii;
    };
    let class = classify_char(first);
    if class.east_asian_hint && hint == Some(FontHint::EastAsia) {
        return ScriptCategory::EastAsian;
    }
    class.category
}

/// Theme typeface for a theme slot name such as `minorHAnsi`.
pub fn theme_font<'t>(theme: &'t Theme, name: &str) -> Option<&'t str> {
    let scheme = if contains_ignore_case(name, "major") {
        &theme.major
    } else if contains_ignore_case(name, "minor") {
        &theme.minor
    } else {
        return None;
    };
    let face = if contains_ignore_case(name, "Bidi") {
        &scheme.complex_script
    } else if contains_ignore_case(name, "HAnsi") || contains_ignore_case(name, "Ascii") {
        &scheme.latin
    } else if contains_ignore_case(name, "EastAsia") {
        &scheme.east_asian
    } else {
        return None;
    };
    face.as_deref().filter(|s| !s.is_empty())
}

/// ISO 15924 script tag for a BCP 47 locale, as used by theme
/// supplemental fonts.
pub fn script_tag_for_locale(locale: &str) -> Option<&'static str> {
    let lower = locale.to_ascii_lowercase();
    let mut parts = lower.split(['-', '_']);
    let language = parts.next()?;
    let region = parts.next().unwrap_or("");
    let tag = match (language, region) {
        ("zh", "tw" | "hk" | "mo" | "hant") => "Hant",
        ("zh", _) => "Hans",
        ("ja", _) => "Jpan",
        ("ko", _) => "Hang",
        ("ar" | "fa" | "ur", _) => "Arab",
        ("he" | "yi", _) => "Hebr",
        ("th", _) => "Thai",
        ("ru" | "uk" | "bg" | "be" | "sr" | "mk", _) => "Cyrl",
        ("el", _) => "Grek",
        ("hi" | "mr" | "ne", _) => "Deva",
        ("bn", _) => "Beng",
        ("ta", _) => "Taml",
        ("te", _) => "Telu",
        ("gu", _) => "Gujr",
        ("km", _) => "Khmr",
        ("lo", _) => "Laoo",
        ("my", _) => "Mymr",
        ("ka", _) => "Geor",
        ("hy", _) => "Armn",
        ("am", _) => "Ethi",
        ("vi", _) => "Viet",
        _ => return None,
    };
    Some(tag)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ThemeFontScheme;

    #[test]
    fn locale_to_script_tag() {
        assert_eq!(script_tag_for_locale("zh-TW"), Some("Hant"));
        assert_eq!(script_tag_for_locale("zh-CN"), Some("Hans"));
        assert_eq!(script_tag_for_locale("ja-JP"), Some("Jpan"));
        assert_eq!(script_tag_for_locale("ar-SA"), Some("Arab"));
        assert_eq!(script_tag_for_locale("en-US"), None);
    }

    #[test]
    fn theme_slot_names() {
        let theme = Theme {
            major: ThemeFontScheme {
                latin: Some("Calibri Light".into()),
                ..Default::default()
            },
            minor: ThemeFontScheme {
                latin: Some("Calibri".into()),
                east_asian: Some("MS Mincho".into()),
                ..Default::default()
            },
        };
        assert_eq!(theme_font(&theme, "minorHAnsi"), Some("Calibri"));
        assert_eq!(theme_font(&theme, "majorHAnsi"), Some("Calibri Light"));
        assert_eq!(theme_font(&theme, "minorEastAsia"), Some("MS Mincho"));
        assert_eq!(theme_font(&theme, "minorBidi"), None);
        assert_eq!(theme_font(&theme, "Arial"), None);
    }

    #[test]
    fn hint_moves_shared_blocks_to_east_asian() {
        // General Punctuation follows the hint, Basic Latin does not.
        assert_eq!(
            categorize("\u{201C}", Some(FontHint::EastAsia), false),
            ScriptCategory::EastAsian
        );
        assert_eq!(categorize("A", Some(FontHint::EastAsia), false), ScriptCategory::Ascii);
        assert_eq!(categorize("A", None, true), ScriptCategory::ComplexScript);
    }

    #[test]
    fn leading_whitespace_is_skipped() {
        assert_eq!(categorize(" \u{4E2D}", None, false), ScriptCategory::EastAsian);
        assert_eq!(categorize("  ", None, false), ScriptCategory::Ascii);
    }
}
