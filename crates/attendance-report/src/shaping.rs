//! Arabic shaping and visual reordering for PDF text.
//!
//! PDF content streams place glyphs left to right, so right-to-left text has
//! to be reshaped into contextual forms and reordered before glyph lookup.

use unicode_bidi::BidiInfo;

/// Returns true for characters from the Arabic blocks.
pub fn is_arabic(ch: char) -> bool {
    matches!(
        ch,
        '\u{0600}'..='\u{06FF}'
            | '\u{0750}'..='\u{077F}'
            | '\u{08A0}'..='\u{08FF}'
            | '\u{FB50}'..='\u{FDFF}'
            | '\u{FE70}'..='\u{FEFF}'
    )
}

/// Prepares text for left-to-right glyph placement.
///
/// Text without Arabic characters is returned as is.
pub fn shape_for_display(text: &str) -> String {
    if !text.chars().any(is_arabic) {
        return text.to_string();
    }
    let reshaped = ar_reshaper::reshape_line(text);
    visual_order(&reshaped)
}

/// Reorders logical text into display order, paragraph by paragraph.
pub fn visual_order(text: &str) -> String {
    let info = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());
    for paragraph in &info.paragraphs {
        let line = paragraph.range.clone();
        out.push_str(&info.reorder_line(paragraph, line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_text_is_untouched() {
        assert_eq!(shape_for_display("Ahmed Ali"), "Ahmed Ali");
        assert_eq!(shape_for_display(""), "");
    }

    #[test]
    fn arabic_text_is_reversed_for_display() {
        let shaped = shape_for_display("لا يحضر");
        assert_ne!(shaped, "لا يحضر");
        // Reshaping maps letters onto presentation forms.
        assert!(shaped.chars().any(|ch| ('\u{FE70}'..='\u{FEFF}').contains(&ch)));
    }

    #[test]
    fn visual_order_reverses_right_to_left_runs() {
        assert_eq!(visual_order("\u{05D0}\u{05D1}\u{05D2}"), "\u{05D2}\u{05D1}\u{05D0}");
        assert_eq!(visual_order("abc"), "abc");
    }

    #[test]
    fn detects_arabic() {
        assert!(is_arabic('ا'));
        assert!(!is_arabic('a'));
    }
}
