//! String cleanup helpers used by the normalizing validator.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Which quote characters [`escape_html`] encodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteMode {
    /// Double quotes only.
    Compat,
    /// Double and single quotes.
    #[default]
    Quotes,
    /// Neither.
    NoQuotes,
}

#[allow(clippy::expect_used)]
static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);").expect("valid entity regex")
});

#[allow(clippy::expect_used)]
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z!?][^<>]*>").expect("valid tag regex")
});

/// Escapes `& < > "` (and `'` depending on `quotes`).
///
/// Existing entities such as `&amp;` or `&#039;` are left alone, so escaping
/// an escaped string is a no-op.
#[must_use]
pub fn escape_html(input: &str, quotes: QuoteMode) -> String {
    let mut out = String::with_capacity(input.len());
    for (index, ch) in input.char_indices() {
        match ch {
            '&' if ENTITY.is_match(&input[index..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if quotes != QuoteMode::NoQuotes => out.push_str("&quot;"),
            '\'' if quotes == QuoteMode::Quotes => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

/// Removes HTML tags and comments, keeping the text between them.
#[must_use]
pub fn strip_tags(input: &str) -> String {
    TAG.replace_all(input, "").into_owned()
}

/// Trims the string and collapses every whitespace run to one space.
#[must_use]
pub fn collapse_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Like [`collapse_whitespace`] but keeps line structure.
///
/// Line endings become `\n`, each line is collapsed and trimmed, and runs of
/// blank lines shrink to a single blank line.
#[must_use]
pub fn collapse_keeping_lines(input: &str) -> String {
    let unified = input.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines: Vec<String> = Vec::new();
    for line in unified.split('\n') {
        let collapsed = collapse_whitespace(line);
        let previous_blank = lines.last().map_or(true, String::is_empty);
        if collapsed.is_empty() && previous_blank {
            continue;
        }
        lines.push(collapsed);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#, QuoteMode::Quotes),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#039;Jerry&#039;&lt;/b&gt;"
        );
        assert_eq!(escape_html("it's", QuoteMode::Compat), "it's");
        assert_eq!(escape_html(r#"say "hi""#, QuoteMode::NoQuotes), r#"say "hi""#);
    }

    #[test]
    fn test_escape_html_does_not_double_encode() {
        let once = escape_html("a & b < c &amp; &#39; &#x27;", QuoteMode::Quotes);
        assert_eq!(once, "a &amp; b &lt; c &amp; &#39; &#x27;");
        assert_eq!(escape_html(&once, QuoteMode::Quotes), once);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("a <!-- note --> b"), "a  b");
        assert_eq!(strip_tags("1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_collapse_keeping_lines() {
        assert_eq!(
            collapse_keeping_lines("  first   line \r\n\r\n\r\n second\tline  \n\n"),
            "first line\n\nsecond line"
        );
        let once = collapse_keeping_lines("a\n\n\nb");
        assert_eq!(collapse_keeping_lines(&once), once);
    }
}
