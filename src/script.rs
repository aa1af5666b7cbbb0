//! Code point → font slot classification.
//!
//! Word picks one of four `w:rFonts` slots for every character. The choice is
//! driven by the Unicode block the character belongs to; some blocks switch to
//! the East Asian slot when the run carries `w:hint="eastAsia"`.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScriptCategory {
    Ascii,
    HighAnsi,
    EastAsian,
    ComplexScript,
    Unknown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScriptClass {
    pub category: ScriptCategory,
    pub block: &'static str,
    /// The block follows the East Asian slot when the run hint says so.
    pub east_asian_hint: bool,
}

struct BlockRange {
    name: &'static str,
    first: u32,
    last: u32,
    category: ScriptCategory,
    east_asian_hint: bool,
}

const fn block(
    name: &'static str,
    first: u32,
    last: u32,
    category: ScriptCategory,
    east_asian_hint: bool,
) -> BlockRange {
    BlockRange {
        name,
        first,
        last,
        category,
        east_asian_hint,
    }
}

use ScriptCategory::{Ascii, EastAsian, HighAnsi};

// Sorted and disjoint.
static BLOCKS: &[BlockRange] = &[
    block("Basic Latin", 0x0000, 0x007F, Ascii, false),
    block("Latin-1 Supplement", 0x00A0, 0x00FF, HighAnsi, false),
    block("Latin Extended-A", 0x0100, 0x017F, HighAnsi, false),
    block("Latin Extended-B", 0x0180, 0x024F, HighAnsi, false),
    block("IPA Extensions", 0x0250, 0x02AF, HighAnsi, false),
    block("Spacing Modifier Letters", 0x02B0, 0x02FF, HighAnsi, true),
    block("Combining Diacritical Marks", 0x0300, 0x036F, HighAnsi, true),
    block("Greek", 0x0370, 0x03CF, HighAnsi, true),
    block("Cyrillic", 0x0400, 0x04FF, HighAnsi, true),
    block("Hebrew", 0x0590, 0x05FF, Ascii, false),
    block("Arabic", 0x0600, 0x06FF, Ascii, false),
    block("Syriac", 0x0700, 0x074F, Ascii, false),
    block("Arabic Supplement", 0x0750, 0x077F, Ascii, false),
    block("Thaana", 0x0780, 0x07BF, Ascii, false),
    block("Hangul Jamo", 0x1100, 0x11FF, EastAsian, false),
    block("Latin Extended Additional", 0x1E00, 0x1EFF, HighAnsi, false),
    block("Greek Extended", 0x1F00, 0x1FFF, HighAnsi, false),
    block("General Punctuation", 0x2000, 0x206F, HighAnsi, true),
    block("Superscripts and Subscripts", 0x2070, 0x209F, HighAnsi, true),
    block("Currency Symbols", 0x20A0, 0x20CF, HighAnsi, true),
    block("Combining Diacritical Marks for Symbols", 0x20D0, 0x20FF, HighAnsi, true),
    block("Letter-like Symbols", 0x2100, 0x214F, HighAnsi, true),
    block("Number Forms", 0x2150, 0x218F, HighAnsi, true),
    block("Arrows", 0x2190, 0x21FF, HighAnsi, true),
    block("Mathematical Operators", 0x2200, 0x22FF, HighAnsi, true),
    block("Miscellaneous Technical", 0x2300, 0x23FF, HighAnsi, true),
    block("Control Pictures", 0x2400, 0x243F, HighAnsi, true),
    block("Optical Character Recognition", 0x2440, 0x245F, HighAnsi, true),
    block("Enclosed Alphanumerics", 0x2460, 0x24FF, HighAnsi, true),
    block("Box Drawing", 0x2500, 0x257F, HighAnsi, true),
    block("Block Elements", 0x2580, 0x259F, HighAnsi, true),
    block("Geometric Shapes", 0x25A0, 0x25FF, HighAnsi, true),
    block("Miscellaneous Symbols", 0x2600, 0x26FF, HighAnsi, true),
    block("Dingbats", 0x2700, 0x27BF, HighAnsi, true),
    block("CJK Radicals Supplement", 0x2E80, 0x2EFF, EastAsian, false),
    block("Kangxi Radicals", 0x2F00, 0x2FDF, EastAsian, false),
    block("Ideographic Description Characters", 0x2FF0, 0x2FFF, EastAsian, false),
    block("CJK Symbols and Punctuation", 0x3000, 0x303F, EastAsian, false),
    block("Hiragana", 0x3040, 0x309F, EastAsian, false),
    block("Katakana", 0x30A0, 0x30FF, EastAsian, false),
    block("Bopomofo", 0x3100, 0x312F, EastAsian, false),
    block("Hangul Compatibility Jamo", 0x3130, 0x318F, EastAsian, false),
    block("Kanbun", 0x3190, 0x319F, EastAsian, false),
    block("Enclosed CJK Letters and Months", 0x3200, 0x32FF, EastAsian, false),
    block("CJK Compatibility", 0x3300, 0x33FF, EastAsian, false),
    block("CJK Unified Ideographs Extension A", 0x3400, 0x4DBF, EastAsian, false),
    block("CJK Unified Ideographs", 0x4E00, 0x9FAF, EastAsian, false),
    block("Yi Syllables", 0xA000, 0xA48F, EastAsian, false),
    block("Yi Radicals", 0xA490, 0xA4CF, EastAsian, false),
    block("Hangul Syllables", 0xAC00, 0xD7AF, EastAsian, false),
    block("High Surrogates", 0xD800, 0xDB7F, EastAsian, false),
    block("High Private Use Surrogates", 0xDB80, 0xDBFF, EastAsian, false),
    block("Low Surrogates", 0xDC00, 0xDFFF, EastAsian, false),
    block("Private Use Area", 0xE000, 0xF8FF, HighAnsi, true),
    block("CJK Compatibility Ideographs", 0xF900, 0xFAFF, EastAsian, false),
    block("Alphabetic Presentation Forms", 0xFB00, 0xFB1C, HighAnsi, true),
    block("Alphabetic Presentation Forms (Hebrew)", 0xFB1D, 0xFB4F, Ascii, false),
    block("Arabic Presentation Forms-A", 0xFB50, 0xFDFF, Ascii, false),
    block("CJK Compatibility Forms", 0xFE30, 0xFE4F, EastAsian, false),
    block("Small Form Variants", 0xFE50, 0xFE6F, EastAsian, false),
    block("Arabic Presentation Forms-B", 0xFE70, 0xFEFE, Ascii, false),
    block("Halfwidth and Fullwidth Forms", 0xFF00, 0xFFEF, EastAsian, false),
];

const UNKNOWN: ScriptClass = ScriptClass {
    category: ScriptCategory::Unknown,
    block: "Unknown",
    east_asian_hint: false,
};

pub fn classify(cp: u32) -> ScriptClass {
    let idx = BLOCKS.partition_point(|b| b.last < cp);
    match BLOCKS.get(idx) {
        Some(b) if b.first <= cp => ScriptClass {
            category: b.category,
            block: b.name,
            east_asian_hint: b.east_asian_hint,
        },
        _ => UNKNOWN,
    }
}

pub fn classify_char(ch: char) -> ScriptClass {
    classify(ch as u32)
}
