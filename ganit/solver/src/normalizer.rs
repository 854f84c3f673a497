//! Maps OCR artifacts and typographic math glyphs to ASCII tokens.

/// Glyph replacements applied in order.
const GLYPHS: &[(char, &str)] = &[
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('∫', "integral"),
    ('∂', "partial"),
    ('∑', "sum"),
    ('∞', "infinity"),
    ('√', "sqrt"),
    ('×', "*"),
    ('·', "*"),
    ('÷', "/"),
    ('−', "-"),
    ('≤', "<="),
    ('≥', ">="),
    ('≠', "!="),
    ('²', "**2"),
    ('³', "**3"),
    ('π', "pi"),
];

/// Replaces every mapped glyph and trims surrounding whitespace.
///
/// Unmapped characters pass through untouched.
#[must_use]
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.trim().chars() {
        match GLYPHS.iter().find(|(glyph, _)| *glyph == ch) {
            Some((_, ascii)) => out.push_str(ascii),
            None => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_operators_and_symbols() {
        assert_eq!(normalize("3 × 4 ÷ 2"), "3 * 4 / 2");
        assert_eq!(normalize("√x ≤ 2"), "sqrtx <= 2");
        assert_eq!(normalize("∫ x² dx"), "integral x**2 dx");
    }

    #[test]
    fn fixes_ligatures_and_trims() {
        assert_eq!(normalize("  \u{FB01}nd the de\u{FB02}ection \n"), "find the deflection");
    }

    #[test]
    fn leaves_unmapped_text_alone() {
        let text = "ভেক্টর [1, 2, 3]";
        assert_eq!(normalize(text), text);
    }
}
