//! Restoration phase: placeholders become finished markup again.
//!
//! Runs after the beautifier. Each placeholder is decoded, optionally
//! formatted, and rebuilt as `<tag attrs class="... marker">text</tag>`.
//! A placeholder that fails any check stays in the output untouched.

use regex::Captures;

use crate::class_attr::StartTag;
use crate::consts::{DEFAULT_BLOCK_CONTAINER, MARKER_CLASS, MAX_CONTENT_SIZE, PLACEHOLDER_OPEN};
use crate::extract::unique_tags;
use crate::format::{FormatOptions, format_code};
use crate::pattern;
use crate::payload::{self, Angles};

/// Replace placeholders for `tags` with restored markup.
///
/// With `preserve_formatting` the inner text is run through
/// [`format_code`] and multiline content is wrapped in `<pre>`. Without it
/// the original text comes back verbatim (the save path).
///
/// # Example
///
/// ```
/// use pcf_core::{extract, restore};
///
/// let placeholder = extract("<code>a  b</code>", &["code"]);
/// assert_eq!(
///     restore(&placeholder, &["code"], true),
///     r#"<code class="preserve-code-formatting">a&nbsp;&nbsp;b</code>"#
/// );
/// ```
#[must_use]
pub fn restore(content: &str, tags: &[&str], preserve_formatting: bool) -> String {
    Restorer::new(tags)
        .preserve_formatting(preserve_formatting)
        .restore(content)
}

/// Configurable restoration pass.
pub struct Restorer<'a> {
    tags: Vec<&'a str>,
    preserve_formatting: bool,
    format: FormatOptions,
    wrap_multiline: bool,
    block_container: &'a str,
    max_content_size: usize,
}

impl<'a> Restorer<'a> {
    /// Create a restorer for `tags` with display defaults.
    #[must_use]
    pub fn new(tags: &[&'a str]) -> Self {
        Self {
            tags: unique_tags(tags),
            preserve_formatting: true,
            format: FormatOptions::default(),
            wrap_multiline: true,
            block_container: DEFAULT_BLOCK_CONTAINER,
            max_content_size: MAX_CONTENT_SIZE,
        }
    }

    /// Format inner text for display (`true`) or return it verbatim.
    #[must_use]
    pub fn preserve_formatting(mut self, enabled: bool) -> Self {
        self.preserve_formatting = enabled;
        self
    }

    /// Set the formatter options.
    #[must_use]
    pub fn format_options(mut self, options: FormatOptions) -> Self {
        self.format = options;
        self
    }

    /// Wrap multiline content in the block container.
    #[must_use]
    pub fn wrap_multiline(mut self, enabled: bool) -> Self {
        self.wrap_multiline = enabled;
        self
    }

    /// Set the element used to wrap multiline content.
    #[must_use]
    pub fn block_container(mut self, tag: &'a str) -> Self {
        self.block_container = tag;
        self
    }

    /// Set the size bound used when decoding payloads.
    #[must_use]
    pub fn max_content_size(mut self, limit: usize) -> Self {
        self.max_content_size = limit;
        self
    }

    /// Run the restoration pass over `content`.
    #[must_use]
    pub fn restore(&self, content: &str) -> String {
        let present: Vec<&str> = self
            .tags
            .iter()
            .copied()
            .filter(|tag| content.contains(&pattern::closing_marker(tag)))
            .collect();
        if present.is_empty() {
            return content.to_owned();
        }

        let re = match pattern::placeholders(&present) {
            Ok(re) => re,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build placeholder pattern");
                return content.to_owned();
            }
        };

        let mut restored = 0_usize;
        let mut kept = 0_usize;
        let out = re.replace_all(content, |caps: &Captures<'_>| {
            let element = (0..present.len())
                .find(|&i| caps.get(3 * i + 1).is_some())
                .and_then(|i| {
                    let attrs = caps.get(3 * i + 2).map_or("", |m| m.as_str());
                    let payload = caps.get(3 * i + 3).map_or("", |m| m.as_str());
                    self.element(present[i], attrs, payload)
                });
            if let Some(element) = element {
                restored += 1;
                element
            } else {
                kept += 1;
                caps[0].to_owned()
            }
        });

        tracing::debug!(restored, kept, "Restored preserve tags");
        out.into_owned()
    }

    /// Finished markup for one placeholder, or `None` to keep it.
    fn element(&self, tag: &str, attrs: &str, payload: &str) -> Option<String> {
        if attrs.contains(PLACEHOLDER_OPEN) {
            tracing::warn!(tag, "Nested placeholder marker in attributes, left as is");
            return None;
        }

        let text = match payload::decode(payload, self.max_content_size) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(tag, error = %e, "Failed to decode placeholder, left as is");
                return None;
            }
        };

        let inner = if self.preserve_formatting {
            payload::unshield_angles(&format_code(&text, self.format), Angles::Escaped)
        } else {
            payload::unshield_angles(&text, Angles::Literal)
        };

        let mut start = StartTag::new(tag, attrs);
        start.add_class(MARKER_CLASS);
        let element = format!("{start}{inner}</{tag}>");

        if self.preserve_formatting
            && self.wrap_multiline
            && tag != self.block_container
            && inner.contains('\n')
        {
            let container = self.block_container;
            Some(format!("<{container}>{element}</{container}>"))
        } else {
            Some(element)
        }
    }
}
