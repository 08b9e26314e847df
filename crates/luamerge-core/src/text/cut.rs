use super::{find_from, is_whole_word_at};

/// Outcome of cutting the middle out of a string.
///
/// `left` and `right` borrow from the text that was cut. On failure both
/// are empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CutResult<'a> {
    pub success: bool,
    pub left: &'a str,
    pub right: &'a str,
}

impl<'a> CutResult<'a> {
    fn failed() -> Self {
        Self {
            success: false,
            left: "",
            right: "",
        }
    }

    fn around(text: &'a str, index: usize, len: usize) -> Self {
        Self {
            success: true,
            left: &text[..index],
            right: &text[index + len..],
        }
    }
}

/// Find the first whole-word occurrence of `needle` at or after `start_offset`.
///
/// A rejected candidate moves the search past the whole candidate, so the
/// scan always makes progress. A `start_offset` inside a multi-byte char
/// is moved forward to the next char boundary.
pub fn find_whole_word(haystack: &str, needle: &str, start_offset: usize) -> Option<usize> {
    if haystack.is_empty() || needle.is_empty() {
        return None;
    }

    let mut offset = start_offset;
    loop {
        if offset >= haystack.len() {
            return None;
        }

        let index = find_from(haystack, needle, offset)?;
        let end = index + needle.len();
        if is_whole_word_at(haystack, index, end) {
            return Some(index);
        }

        offset = end;
    }
}

/// Cut `text` around the first literal occurrence of `needle`.
///
/// An empty `needle` cannot be cut out and yields a failed result.
pub fn cut_middle<'a>(text: &'a str, needle: &str) -> CutResult<'a> {
    if text.is_empty() || needle.is_empty() {
        return CutResult::failed();
    }

    match text.find(needle) {
        Some(index) => CutResult::around(text, index, needle.len()),
        None => CutResult::failed(),
    }
}

/// Cut `text` around the first whole-word occurrence of `needle`.
pub fn cut_middle_whole_match<'a>(text: &'a str, needle: &str) -> CutResult<'a> {
    match find_whole_word(text, needle, 0) {
        Some(index) => CutResult::around(text, index, needle.len()),
        None => CutResult::failed(),
    }
}
