//! Small text helpers shared by the handlers.

/// Safely truncates a string to a maximum character length (not bytes).
///
/// UTF-8 safe: will not panic on multi-byte characters. Used to keep
/// surfaced error causes within Telegram's message limits.
///
/// # Examples
///
/// ```
/// use instagrab::utils::truncate_str;
/// let s = "Привет, мир!";
/// assert_eq!(truncate_str(s, 6), "Привет");
/// ```
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_unicode() {
        let s = "Привет, мир!";
        assert_eq!(truncate_str(s, 6), "Привет");
        assert_eq!(truncate_str(s, 50), "Привет, мир!");
    }

    #[test]
    fn test_truncate_str_ascii() {
        assert_eq!(truncate_str("abcdef", 3), "abc");
        assert_eq!(truncate_str("abc", 3), "abc");
        assert_eq!(truncate_str("", 3), "");
    }
}
