//! Unit conversions used by WordprocessingML measurements. Every converted
//! value is in points (1/72 inch).

pub fn twips_to_pts(twips: f32) -> f32 {
    twips / 20.0
}

pub fn half_points_to_pts(half_points: f32) -> f32 {
    half_points / 2.0
}

/// Border widths (`w:sz`) are stored in eighths of a point.
pub fn eighth_points_to_pts(eighths: f32) -> f32 {
    eighths / 8.0
}

/// `*Chars` indentation attributes are hundredths of a character, where a
/// character is as wide as the font size.
pub fn hundredth_chars_to_pts(hundredths: f32, font_size: f32) -> f32 {
    hundredths / 100.0 * font_size
}

/// Parse a percentage value. `"50%"` is a plain percentage, a bare number is
/// in fiftieths of a percent (`2500` = 50%). Returns a fraction (0.5).
pub fn percentage(val: &str) -> f32 {
    let s = val.trim();
    if let Some(pct) = s.strip_suffix('%') {
        return pct.trim().parse::<f32>().map(|v| v / 100.0).unwrap_or(0.0);
    }
    s.parse::<f32>().map(|v| v / 5000.0).unwrap_or(0.0)
}

/// ST_OnOff: absent `val` means on.
pub fn on_off(val: Option<&str>) -> bool {
    val.is_none_or(|v| !matches!(v, "0" | "false" | "off"))
}

/// Perceived brightness of an sRGB colour (ITU-R 601 weights).
pub fn brightness(rgb: [u8; 3]) -> f32 {
    0.299 * rgb[0] as f32 + 0.587 * rgb[1] as f32 + 0.114 * rgb[2] as f32
}

pub fn parse_hex_color(val: &str) -> Option<[u8; 3]> {
    if val == "auto" || val.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&val[0..2], 16).ok()?;
    let g = u8::from_str_radix(&val[2..4], 16).ok()?;
    let b = u8::from_str_radix(&val[4..6], 16).ok()?;
    Some([r, g, b])
}
