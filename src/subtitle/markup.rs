use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// Shortest `<...>` run on a single line. No nesting, no escapes.
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<.*?>").expect("Invalid regex"));

/// Remove inline tags such as `<v Speaker>`, `<i>` and `</b>` from caption text.
///
/// A `<` with no closing `>` on the same line is left as-is.
pub fn strip_markup(text: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(text, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_voice_tag() {
        assert_eq!(strip_markup("<v Speaker>Hi there</v>"), "Hi there");
    }

    #[test]
    fn test_strip_styling_tags() {
        assert_eq!(
            strip_markup("<i>soft</i> and <b.loud>bold</b>"),
            "soft and bold"
        );
        assert_eq!(strip_markup("<00:00:01.000>karaoke"), "karaoke");
    }

    #[test]
    fn test_unmatched_open_bracket_untouched() {
        assert_eq!(strip_markup("a < b"), "a < b");
        assert_eq!(strip_markup("<i>x</i> 3 < 4"), "x 3 < 4");
    }

    #[test]
    fn test_non_greedy() {
        assert_eq!(strip_markup("<a>keep<b>"), "keep");
        assert_eq!(strip_markup("x <a <b> y"), "x  y");
    }

    #[test]
    fn test_does_not_span_lines() {
        assert_eq!(strip_markup("a <b\nc> d"), "a <b\nc> d");
    }

    #[test]
    fn test_plain_text_borrowed() {
        assert!(matches!(strip_markup("plain"), Cow::Borrowed("plain")));
    }
}
