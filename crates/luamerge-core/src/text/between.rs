/// Drop everything before the first occurrence of `pattern`.
///
/// With `trim_match` the pattern itself is dropped too. An empty or missing
/// pattern leaves `text` untouched.
pub fn trim_head_before_first_match<'a>(text: &'a str, pattern: &str, trim_match: bool) -> &'a str {
    if text.is_empty() || pattern.is_empty() {
        return text;
    }

    match text.find(pattern) {
        Some(index) if trim_match => &text[index + pattern.len()..],
        Some(index) => &text[index..],
        None => text,
    }
}

/// Drop everything after the first occurrence of `pattern`.
///
/// With `trim_match` the pattern itself is dropped too. An empty or missing
/// pattern leaves `text` untouched.
pub fn trim_tail_after_first_match<'a>(text: &'a str, pattern: &str, trim_match: bool) -> &'a str {
    if text.is_empty() || pattern.is_empty() {
        return text;
    }

    match text.find(pattern) {
        Some(index) if trim_match => &text[..index],
        Some(index) => &text[..index + pattern.len()],
        None => text,
    }
}

/// Text strictly between the first `start` and the first `end` after it.
///
/// Returns `""` when either marker is missing or empty.
pub fn get_between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    if text.is_empty() || start.is_empty() || end.is_empty() {
        return "";
    }

    // A trim that found its pattern always shortens the text.
    let head = trim_head_before_first_match(text, start, true);
    if head.len() == text.len() {
        return "";
    }

    let body = trim_tail_after_first_match(head, end, true);
    if body.len() == head.len() {
        return "";
    }

    body
}
