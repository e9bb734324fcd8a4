//! Pipeline settings.

use crate::consts::{DEFAULT_BLOCK_CONTAINER, DEFAULT_PRESERVE_TAGS, MAX_CONTENT_SIZE};
use crate::format::FormatOptions;

/// Settings read by [`Preserver`](crate::Preserver).
///
/// With the `serde` feature the struct deserializes from a `[preserve]`
/// table where every key is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PreserveSettings {
    /// Tag names whose content is preserved, in processing order.
    #[cfg_attr(feature = "serde", serde(rename = "tags"))]
    pub preserve_tags: Vec<String>,
    /// Preserve tags in posts and excerpts.
    #[cfg_attr(feature = "serde", serde(rename = "in_posts"))]
    pub preserve_in_posts: bool,
    /// Preserve tags in comments.
    #[cfg_attr(feature = "serde", serde(rename = "in_comments"))]
    pub preserve_in_comments: bool,
    /// Wrap multiline content in [`block_container`](Self::block_container).
    #[cfg_attr(feature = "serde", serde(rename = "wrap_multiline"))]
    pub wrap_multiline_code_in_pre: bool,
    /// Replace runs of two spaces with `&nbsp;&nbsp;`.
    #[cfg_attr(feature = "serde", serde(rename = "nbsp_for_spaces"))]
    pub use_nbsp_for_spaces: bool,
    /// Emit `<br />` before every newline.
    pub nl2br: bool,
    /// Element used to wrap multiline content.
    pub block_container: String,
    /// Largest inner text, in bytes, that gets encoded.
    pub max_content_size: usize,
}

impl Default for PreserveSettings {
    fn default() -> Self {
        Self {
            preserve_tags: DEFAULT_PRESERVE_TAGS.map(str::to_owned).to_vec(),
            preserve_in_posts: true,
            preserve_in_comments: true,
            wrap_multiline_code_in_pre: true,
            use_nbsp_for_spaces: true,
            nl2br: false,
            block_container: DEFAULT_BLOCK_CONTAINER.to_owned(),
            max_content_size: MAX_CONTENT_SIZE,
        }
    }
}

impl PreserveSettings {
    /// Formatter options derived from these settings.
    #[must_use]
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            use_nbsp_for_spaces: self.use_nbsp_for_spaces,
            nl2br: self.nl2br,
        }
    }

    /// Configured tag names as string slices.
    pub fn tags(&self) -> Vec<&str> {
        self.preserve_tags.iter().map(String::as_str).collect()
    }
}
