//! Approximate advance widths for when no face file is available.

use crate::script::{ScriptCategory, classify_char};

/// Helvetica-like advance of `ch` in 1000ths of an em.
fn approximate_advance(ch: char) -> f32 {
    match ch {
        ' ' | '\u{a0}' => 278.0,
        '0'..='9' => 556.0,
        'I' | 'J' => 278.0,
        'M' | 'W' => 833.0,
        'A'..='Z' => 667.0,
        'f' | 'i' | 'j' | 'l' | 't' => 278.0,
        'm' | 'w' => 833.0,
        'a'..='z' => 556.0,
        '!'..='/' | ':'..='@' | '['..='`' | '{'..='~' => 333.0,
        '\u{2022}' => 350.0,
        _ if classify_char(ch).category == ScriptCategory::EastAsian => 1000.0,
        _ => 556.0,
    }
}

pub fn approximate_width_char(ch: char, size: f32) -> f32 {
    approximate_advance(ch) * size / 1000.0
}

pub fn approximate_width(text: &str, size: f32) -> f32 {
    text.chars().map(|ch| approximate_width_char(ch, size)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_scale_with_size() {
        assert!((approximate_width("1.", 10.0) - 8.89).abs() < 1e-4);
        assert_eq!(approximate_width_char('中', 12.0), 12.0);
    }
}
