//! Substring primitives used by the preprocessor
//!
//! Everything here operates on plain `&str` spans. There is no tokenizer:
//! "words" are recognized purely by looking at the characters adjacent to a
//! match. All functions are total; empty inputs produce "no match",
//! unchanged text or an empty string rather than an error.
//!
//! Offsets are byte offsets into the UTF-8 text and always fall on char
//! boundaries.

mod between;
mod cut;
mod replace;

pub use between::{get_between, trim_head_before_first_match, trim_tail_after_first_match};
pub use cut::{cut_middle, cut_middle_whole_match, find_whole_word, CutResult};
pub use replace::{replace_two_word_pattern, replace_whole_match};

use unicode_general_category::{get_general_category, GeneralCategory};

/// Check whether `c` separates words under the whole-word matching rule.
///
/// Whitespace and punctuation separate words. Underscore is punctuation in
/// Unicode terms but is treated as part of a word so `foo_bar` stays whole.
pub fn is_word_separator(c: char) -> bool {
    if c == '_' {
        return false;
    }

    c.is_whitespace() || is_punctuation(c)
}

/// Unicode punctuation (categories Pc, Pd, Ps, Pe, Pi, Pf, Po).
///
/// Math, currency and modifier symbols (`+ < = > | ~ ^ $ \``) are *not*
/// punctuation, so they do not end a word.
pub fn is_punctuation(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::ConnectorPunctuation
            | GeneralCategory::DashPunctuation
            | GeneralCategory::OpenPunctuation
            | GeneralCategory::ClosePunctuation
            | GeneralCategory::InitialPunctuation
            | GeneralCategory::FinalPunctuation
            | GeneralCategory::OtherPunctuation
    )
}

/// True if `text` holds at least one non-whitespace character.
pub fn contains_non_whitespace(text: &str) -> bool {
    text.chars().any(|c| !c.is_whitespace())
}

/// Literal search for `needle` starting at byte `offset`.
///
/// An `offset` inside a multi-byte char is moved forward to the next char
/// boundary. Returns `None` when `offset` is past the end.
pub(crate) fn find_from(haystack: &str, needle: &str, offset: usize) -> Option<usize> {
    let start = (offset..=haystack.len()).find(|&i| haystack.is_char_boundary(i))?;
    haystack[start..].find(needle).map(|index| index + start)
}

/// Check that the characters around `haystack[start..end]` are separators
/// (or the span touches the start/end of the text).
pub(crate) fn is_whole_word_at(haystack: &str, start: usize, end: usize) -> bool {
    let before_ok = haystack[..start]
        .chars()
        .next_back()
        .map_or(true, is_word_separator);
    let after_ok = haystack[end..].chars().next().map_or(true, is_word_separator);

    before_ok && after_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underscore_is_word_character() {
        assert!(!is_word_separator('_'));
        assert!(!is_word_separator('a'));
        assert!(!is_word_separator('7'));
    }

    #[test]
    fn test_whitespace_and_punctuation_separate() {
        for c in [' ', '\t', '\n', '\r', '(', ')', '.', ',', ':', '"', '\'', '-', '[', '{'] {
            assert!(is_word_separator(c), "{:?} should separate words", c);
        }
    }

    #[test]
    fn test_symbols_do_not_separate() {
        for c in ['=', '+', '<', '>', '|', '~', '^', '$', '`'] {
            assert!(!is_word_separator(c), "{:?} is a symbol, not punctuation", c);
        }
    }

    #[test]
    fn test_non_ascii_punctuation() {
        assert!(is_word_separator('，'));
        assert!(is_word_separator('。'));
        assert!(is_word_separator('\u{2014}'));
        assert!(!is_word_separator('中'));
    }

    #[test]
    fn test_punctuation_outside_latin_and_cjk() {
        for c in ['\u{060C}', '\u{0964}', '\u{055D}', '\u{FE50}', '\u{1361}', '\u{2E1A}'] {
            assert!(is_word_separator(c), "{:?} should separate words", c);
        }
        assert!(!is_word_separator('\u{0627}'));
        assert!(!is_word_separator('\u{20AC}'));
    }

    #[test]
    fn test_contains_non_whitespace() {
        assert!(!contains_non_whitespace(""));
        assert!(!contains_non_whitespace(" \t\r\n"));
        assert!(contains_non_whitespace("  x "));
    }

    #[test]
    fn test_find_from_offsets() {
        assert_eq!(find_from("abcabc", "abc", 0), Some(0));
        assert_eq!(find_from("abcabc", "abc", 1), Some(3));
        assert_eq!(find_from("abcabc", "abc", 4), None);
        assert_eq!(find_from("abc", "abc", 10), None);
    }

    #[test]
    fn test_find_from_mid_char_offset() {
        // 'é' spans bytes 1..3, so offset 2 starts the search at 3
        assert_eq!(find_from("xéab", "ab", 2), Some(3));
        assert_eq!(find_from("xé", "x", 2), None);
    }
}
