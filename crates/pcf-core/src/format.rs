//! Display formatting for restored inner text.
//!
//! [`format_code`] is a pure, total transform. Its steps run in a fixed order
//! and later steps depend on earlier ones (nbsp substitution sees expanded
//! tabs, line breaks see normalized newlines).

use std::sync::LazyLock;

use regex::Regex;

/// Any line ending that is not a bare `\n`.
static LINE_ENDING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n|\r").unwrap());

/// Two or more consecutive newlines.
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());

/// Options read by [`format_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// Replace each run of two spaces with two `&nbsp;` entities.
    pub use_nbsp_for_spaces: bool,
    /// Emit `<br />` before every newline.
    pub nl2br: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            use_nbsp_for_spaces: true,
            nl2br: false,
        }
    }
}

/// Format inner text for display.
///
/// 1. Normalize `\r\n` and `\r` to `\n`
/// 2. Collapse runs of blank lines to a single blank line
/// 3. HTML-escape
/// 4. Expand each tab to two spaces
/// 5. With `use_nbsp_for_spaces`, turn each `"  "` into `&nbsp;&nbsp;`
/// 6. With `nl2br`, turn each `\n` into `<br />\n`
///
/// # Example
///
/// ```
/// use pcf_core::{FormatOptions, format_code};
///
/// let out = format_code("if (a < b)\r\n\tgo();", FormatOptions::default());
/// assert_eq!(out, "if (a &lt; b)\n&nbsp;&nbsp;go();");
/// ```
#[must_use]
pub fn format_code(text: &str, options: FormatOptions) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = LINE_ENDING_RE.replace_all(text, "\n");
    let text = BLANK_LINES_RE.replace_all(&text, "\n\n");
    let mut text = escape_html(&text).replace('\t', "  ");

    if options.use_nbsp_for_spaces {
        text = text.replace("  ", "&nbsp;&nbsp;");
    }
    if options.nl2br {
        text = text.replace('\n', "<br />\n");
    }

    text
}

/// Escape `&`, `<`, `>`, `"`, and `'` for HTML text.
///
/// Existing entities are escaped again, so `&lt;` renders as the literal
/// text `&lt;`.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}
