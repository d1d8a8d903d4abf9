//! Instagram link extraction.
//!
//! Patterns are compile-time validated via the `lazy_regex!` macro.

#![allow(clippy::non_std_lazy_statics)]

use lazy_regex::lazy_regex;

/// Matches an Instagram post URL on either known host form, up to the next
/// whitespace. Case-insensitive.
static RE_INSTAGRAM_URL: lazy_regex::Lazy<regex::Regex> =
    lazy_regex!(r"(?i)https?://(?:www\.)?instagram\.com/[^\s]+|https?://instagr\.am/[^\s]+");

/// Returns the first Instagram link found in `text`, if any.
///
/// When a message contains several links only the first one is returned;
/// the rest are ignored on purpose.
#[must_use]
pub fn find_instagram_link(text: &str) -> Option<&str> {
    RE_INSTAGRAM_URL.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finds_link_in_surrounding_text() {
        let text = "check this https://instagram.com/p/ABC123 out";
        assert_eq!(
            find_instagram_link(text),
            Some("https://instagram.com/p/ABC123")
        );
    }

    #[test]
    fn test_link_terminated_by_whitespace() {
        let text = "https://www.instagram.com/reel/XyZ_9?igsh=1 trailing words";
        assert_eq!(
            find_instagram_link(text),
            Some("https://www.instagram.com/reel/XyZ_9?igsh=1")
        );
    }

    #[test]
    fn test_short_host_form() {
        let text = "see http://instagr.am/p/abc";
        assert_eq!(find_instagram_link(text), Some("http://instagr.am/p/abc"));
    }

    #[test]
    fn test_case_insensitive_host() {
        let text = "HTTPS://WWW.INSTAGRAM.COM/p/ABC";
        assert_eq!(find_instagram_link(text), Some("HTTPS://WWW.INSTAGRAM.COM/p/ABC"));
    }

    #[test]
    fn test_first_of_multiple_links_wins() {
        let text = "https://instagram.com/p/first and https://instagram.com/p/second";
        assert_eq!(
            find_instagram_link(text),
            Some("https://instagram.com/p/first")
        );
    }

    #[test]
    fn test_no_link() {
        assert_eq!(find_instagram_link("hello there"), None);
        // A bare host without a scheme does not count
        assert_eq!(find_instagram_link("instagram.com/p/ABC"), None);
        // Other platforms are not our business
        assert_eq!(find_instagram_link("https://youtube.com/watch?v=x"), None);
    }
}
