use super::{contains_non_whitespace, cut_middle_whole_match, find_from, find_whole_word, is_whole_word_at};

/// Replace every non-overlapping whole-word occurrence of `pattern`.
///
/// Returns `text` unchanged when `pattern` equals `replacement` or when
/// `text` or `pattern` is empty.
pub fn replace_whole_match(text: &str, pattern: &str, replacement: &str) -> String {
    if text.is_empty() || pattern.is_empty() || pattern == replacement {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut remain = text;
    loop {
        if remain.is_empty() {
            return out;
        }

        let cut = cut_middle_whole_match(remain, pattern);
        if !cut.success {
            out.push_str(remain);
            return out;
        }

        out.push_str(cut.left);
        out.push_str(replacement);
        remain = cut.right;
    }
}

/// Replace `left_word <whitespace> right_word` spans with `replacement`.
///
/// Both words must be whole words and only whitespace may separate them;
/// the whole span, both words included, is replaced. A `left_word` that does
/// not qualify is skipped and the scan resumes right after it.
///
/// ```
/// use luamerge_core::text::replace_two_word_pattern;
///
/// let code = replace_two_word_pattern(
///     "function   Foo.Bar(x) end",
///     "function",
///     "Foo.Bar",
///     "Foo.Bar = function",
/// );
/// assert_eq!(code, "Foo.Bar = function(x) end");
/// ```
pub fn replace_two_word_pattern(
    text: &str,
    left_word: &str,
    right_word: &str,
    replacement: &str,
) -> String {
    if text.is_empty() || left_word.is_empty() || right_word.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    // `copied` marks the end of the text already flushed to `out`
    let mut copied = 0;
    let mut search = 0;
    while let Some(left_index) = find_whole_word(text, left_word, search) {
        let left_end = left_index + left_word.len();

        let right_index = find_from(text, right_word, left_end).filter(|&right_index| {
            is_whole_word_at(text, right_index, right_index + right_word.len())
                && !contains_non_whitespace(&text[left_end..right_index])
        });

        match right_index {
            Some(right_index) => {
                out.push_str(&text[copied..left_index]);
                out.push_str(replacement);
                copied = right_index + right_word.len();
                search = copied;
            }
            None => search = left_end,
        }
    }

    out.push_str(&text[copied..]);
    out
}
