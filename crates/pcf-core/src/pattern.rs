//! Regex construction from configured tag names.
//!
//! Tag names come from site configuration and are never trusted as pattern
//! syntax: every name passes through [`escape_tag_name`] before it is spliced
//! into a regex, so `code[^>]*` only ever matches the literal text
//! `code[^>]*`. The `regex` crate guarantees linear-time matching, so names
//! like `code+++` cannot cause backtracking blowups either.

use regex::Regex;

use crate::consts::{PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN};

/// Characters allowed in an encoded payload (base64 plus the soft break).
const PAYLOAD_CLASS: &str = "[A-Za-z0-9+/=~]*";

/// Optional attribute text of a start tag that does not end in `/`.
const ATTRS: &str = r"(\s(?:[^>]*[^/>])?)?";

/// Escape a tag name so it matches only itself inside a regex.
///
/// # Examples
///
/// ```
/// use pcf_core::escape_tag_name;
///
/// assert_eq!(escape_tag_name("code"), "code");
/// assert_eq!(escape_tag_name("code[^>]*"), r"code\[\^>\]\*");
/// ```
#[must_use]
pub fn escape_tag_name(tag: &str) -> String {
    regex::escape(tag)
}

/// Regex matching the opening tag of any of `tags`.
///
/// Group 1 is the tag name, group 2 the verbatim attribute text (including
/// its leading whitespace) when present. Self-closing tags (`<code />`) do
/// not match.
pub(crate) fn opening_tags(tags: &[&str]) -> Result<Regex, regex::Error> {
    Regex::new(&format!("<({}){ATTRS}>", alternation(tags)))
}

/// Regex matching opening (group 1) and closing (group 2) tags of one name.
pub(crate) fn tag_boundaries(tag: &str) -> Result<Regex, regex::Error> {
    let name = escape_tag_name(tag);
    Regex::new(&format!(r"(<{name}{ATTRS}>)|(</{name}\s*>)"))
}

/// Regex matching a placeholder of any of `tags`.
///
/// Each tag gets its own alternative with three groups: tag name, attributes,
/// payload. Alternative `i` therefore owns groups `3i + 1` to `3i + 3`.
pub(crate) fn placeholders(tags: &[&str]) -> Result<Regex, regex::Error> {
    let open = regex::escape(PLACEHOLDER_OPEN);
    let close = regex::escape(PLACEHOLDER_CLOSE);
    let alternatives = tags
        .iter()
        .map(|tag| {
            let name = escape_tag_name(tag);
            format!(r"({name})(\s[^>]*?)?{close}({PAYLOAD_CLASS}){open}/{name}{close}")
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("{open}(?:{alternatives})"))
}

/// The closing marker of a placeholder, used as a cheap presence probe.
pub(crate) fn closing_marker(tag: &str) -> String {
    format!("{PLACEHOLDER_OPEN}/{tag}{PLACEHOLDER_CLOSE}")
}

fn alternation(tags: &[&str]) -> String {
    tags.iter()
        .map(|tag| escape_tag_name(tag))
        .collect::<Vec<_>>()
        .join("|")
}
