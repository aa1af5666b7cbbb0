//! List numbering: per-level counters and numeral rendering.

use std::collections::HashMap;

use crate::cascade::{Numbering, StyleResolver};
use crate::model::{AbstractNumbering, NodeId, NumberFormat, NumberingDefinitions, NumberingLevel};

/// Counter state for one conversion run, keyed by (abstract numbering id,
/// level). Must be advanced in document order.
#[derive(Clone, Debug, Default)]
pub struct NumberingCounter {
    starts: HashMap<(i32, u8), i64>,
    current: HashMap<(i32, u8), i64>,
}

impl NumberingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// One counter per defined level; levels without an explicit start
    /// begin at 1.
    pub fn from_definitions(defs: &NumberingDefinitions) -> Self {
        let mut counter = Self::new();
        for abs in defs.abstract_nums.values() {
            for level in &abs.levels {
                counter.set_start(abs.id, level.ilvl, 1);
                if let Some(start) = level.start {
                    counter.set_start(abs.id, level.ilvl, start.into());
                }
            }
        }
        counter
    }

    /// Configure the first value `advance` yields. Negative values are
    /// ignored.
    pub fn set_start(&mut self, abstract_id: i32, ilvl: u8, start: i64) {
        if start < 0 {
            log::debug!("Ignoring negative start {start} for abstractNum {abstract_id} level {ilvl}");
            return;
        }
        self.starts.insert((abstract_id, ilvl), start);
        self.current.insert((abstract_id, ilvl), start - 1);
    }

    pub fn current(&self, abstract_id: i32, ilvl: u8) -> Option<i64> {
        self.current.get(&(abstract_id, ilvl)).copied()
    }

    /// Increment `ilvl` and return the values of every defined level from 0
    /// through `ilvl`. Lower levels are read without changing them; defined
    /// levels directly below `ilvl` are restarted. Empty when `ilvl` itself
    /// has no counter.
    pub fn advance(&mut self, abstract_id: i32, ilvl: u8) -> Vec<i64> {
        let mut values: Vec<i64> = (0..ilvl)
            .filter_map(|lvl| self.current(abstract_id, lvl))
            .collect();

        let Some(counter) = self.current.get_mut(&(abstract_id, ilvl)) else {
            return values;
        };
        *counter += 1;
        values.push(*counter);

        self.restart_from(abstract_id, ilvl.saturating_add(1));
        values
    }

    /// Reset `ilvl` and each consecutive deeper level to its start.
    fn restart_from(&mut self, abstract_id: i32, mut ilvl: u8) {
        while let Some(&start) = self.starts.get(&(abstract_id, ilvl)) {
            self.current.insert((abstract_id, ilvl), start - 1);
            let Some(next) = ilvl.checked_add(1) else {
                break;
            };
            ilvl = next;
        }
    }
}

/// The numbering level a paragraph belongs to.
#[derive(Clone, Copy, Debug)]
pub struct ListLevel<'a> {
    pub abstract_num: &'a AbstractNumbering,
    pub level: &'a NumberingLevel,
}

/// Resolve the effective `numPr` of a paragraph to its level definition.
/// `numId <= 0` disables numbering. Without `ilvl` the level whose `pStyle`
/// names the paragraph's style is used, else level 0.
pub fn paragraph_level<'a>(
    resolver: &StyleResolver<'a>,
    defs: &'a NumberingDefinitions,
    paragraph: NodeId,
) -> Option<ListLevel<'a>> {
    let numbering = resolver.resolve::<Numbering>(paragraph)?.0;
    let num_id = numbering.num_id.filter(|&id| id > 0)?;
    let Some(abstract_num) = defs.abstract_for(num_id) else {
        log::debug!("numId {num_id} has no abstract numbering definition");
        return None;
    };
    let level = match numbering.ilvl {
        Some(ilvl) => abstract_num.level(ilvl)?,
        None => {
            let style = resolver.document().props(paragraph).para.style.as_deref();
            style
                .and_then(|style| {
                    abstract_num
                        .levels
                        .iter()
                        .find(|l| l.paragraph_style.as_deref() == Some(style))
                })
                .or_else(|| abstract_num.level(0))?
        }
    };
    Some(ListLevel {
        abstract_num,
        level,
    })
}

/// Render the label for `level` given the values returned by
/// [`NumberingCounter::advance`].
pub fn render_label(abstract_num: &AbstractNumbering, level: &NumberingLevel, values: &[i64]) -> String {
    match level.format {
        NumberFormat::Bullet => return normalize_bullet_text(&level.text),
        NumberFormat::None if !level.text.contains('%') => return level.text.clone(),
        _ => {}
    }

    // `values` has one entry per defined level up to `level.ilvl`.
    let defined = (0..=level.ilvl).filter_map(|i| abstract_num.level(i));
    let mut label = level.text.clone();
    for (lvl, &value) in defined.zip(values) {
        let placeholder = format!("%{}", lvl.ilvl + 1);
        if label.contains(&placeholder) {
            label = label.replace(&placeholder, &format_number(value, &lvl.format));
        }
    }
    label
}

pub fn format_number(value: i64, format: &NumberFormat) -> String {
    match format {
        NumberFormat::Decimal => value.to_string(),
        NumberFormat::DecimalZero => format!("{value:02}"),
        NumberFormat::LowerLetter => letters(value, b'a'),
        NumberFormat::UpperLetter => letters(value, b'A'),
        NumberFormat::LowerRoman => to_roman(value),
        NumberFormat::UpperRoman => to_roman(value).to_uppercase(),
        NumberFormat::TaiwaneseCountingThousand => taiwanese_counting(value),
        NumberFormat::None => String::new(),
        NumberFormat::Bullet => String::new(),
        NumberFormat::Other(fmt) => {
            log::debug!("Numbering format {fmt:?} rendered as decimal");
            value.to_string()
        }
    }
}

fn letters(value: i64, base: u8) -> String {
    if value <= 0 {
        return String::new();
    }
    let mut n = value - 1;
    let mut result = String::new();
    loop {
        result.insert(0, (base + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

fn to_roman(value: i64) -> String {
    const TABLE: &[(i64, &str)] = &[
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];
    let mut n = value;
    let mut result = String::new();
    for &(step, numeral) in TABLE {
        while n >= step {
            result.push_str(numeral);
            n -= step;
        }
    }
    result
}

/// Counting numerals up to 9999: 一..九 with 十/百/千 place markers, 零 for
/// skipped inner places, trailing zero places dropped.
fn taiwanese_counting(value: i64) -> String {
    const DIGITS: [&str; 10] = ["零", "一", "二", "三", "四", "五", "六", "七", "八", "九"];
    const PLACES: [&str; 4] = ["", "十", "百", "千"];

    if !(1..10_000).contains(&value) {
        return value.to_string();
    }
    let digits: Vec<usize> = value
        .to_string()
        .bytes()
        .map(|b| (b - b'0') as usize)
        .collect();
    let last_nonzero = digits.iter().rposition(|&d| d != 0).unwrap_or(0);
    let mut result = String::new();
    let mut pending_zero = false;
    for (i, &d) in digits.iter().enumerate().take(last_nonzero + 1) {
        let place = digits.len() - 1 - i;
        if d == 0 {
            pending_zero = true;
            continue;
        }
        if pending_zero {
            result.push_str(DIGITS[0]);
            pending_zero = false;
        }
        result.push_str(DIGITS[d]);
        result.push_str(PLACES[place]);
    }
    result
}

fn normalize_bullet_text(text: &str) -> String {
    let text: String = text
        .chars()
        .map(|c| {
            let cp = c as u32;
            if (0xF000..=0xF0FF).contains(&cp) {
                symbol_pua_to_unicode(cp).unwrap_or(c)
            } else {
                c
            }
        })
        .collect();
    if text.is_empty() { "\u{2022}".to_string() } else { text }
}

/// Symbol/Wingdings private-use code points to the Unicode glyph they show.
pub(crate) fn symbol_pua_to_unicode(cp: u32) -> Option<char> {
    let sym = cp.checked_sub(0xF000)?;
    let mapped = match sym {
        0xB7 => '\u{2022}',
        0xA7 => '\u{25A0}',
        0xA8 => '\u{25CB}',
        0xD8 => '\u{2666}',
        0x76 => '\u{221A}',
        _ => return char::from_u32(sym),
    };
    Some(mapped)
}
