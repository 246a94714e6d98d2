//! Text measurement for terminal cells.
//!
//! ASCII is one cell, control characters zero, and the wide CJK / emoji
//! blocks two. Good enough for labels and slot lines.

/// Cells a character occupies.
pub fn char_width(c: char) -> u16 {
    if c.is_ascii() {
        return if c.is_ascii_control() { 0 } else { 1 };
    }

    let code = c as u32;
    if (0x1100..=0x115F).contains(&code)     // Hangul Jamo
        || (0x2E80..=0x9FFF).contains(&code)   // CJK
        || (0xAC00..=0xD7A3).contains(&code)   // Hangul Syllables
        || (0xF900..=0xFAFF).contains(&code)   // CJK Compatibility
        || (0xFF00..=0xFF60).contains(&code)   // Fullwidth Forms
        || (0x1F300..=0x1F9FF).contains(&code) // Emoji
        || (0x20000..=0x2FFFF).contains(&code)
    {
        2
    } else {
        1
    }
}

/// Display width of a string in cells.
pub fn string_width(s: &str) -> u16 {
    s.chars().fold(0u16, |w, c| w.saturating_add(char_width(c)))
}

/// Cut `text` to at most `width` cells, ending in `…` when cut.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    if string_width(text) <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0u16;
    for c in text.chars() {
        let w = char_width(c);
        // Leave one cell for the ellipsis
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width() {
        assert_eq!(string_width("Title"), 5);
        assert_eq!(string_width("-12"), 3);
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width(""), 0);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Guests", 10), "Guests");
        assert_eq!(truncate_text("Guests", 4), "Gue…");
        assert_eq!(truncate_text("Guests", 1), "…");
        assert_eq!(truncate_text("Guests", 0), "");
    }
}
