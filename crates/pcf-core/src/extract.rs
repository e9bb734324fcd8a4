//! Extraction phase: preserve-tag spans become opaque placeholders.
//!
//! Runs before the beautifier. Everything outside the preserved spans is left
//! byte-for-byte untouched so the beautifier can do its usual work there.

use crate::block::BlockContentDetector;
use crate::consts::{
    GT_SENTINEL, LT_SENTINEL, MAX_CONTENT_SIZE, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN,
};
use crate::payload::{self, PayloadError};
use crate::scan::{TagScanner, TagSpan};

/// Tokens that would let user content impersonate pipeline output.
const RESERVED_TOKENS: [&str; 4] = [PLACEHOLDER_OPEN, PLACEHOLDER_CLOSE, LT_SENTINEL, GT_SENTINEL];

/// Remove placeholder markers and angle sentinels from raw content.
///
/// Deletion repeats until no token is left, since removing one token can
/// join its neighbors into a new one (`{!}!}{` becomes `{!{` after one
/// pass).
///
/// # Example
///
/// ```
/// use pcf_core::clean_placeholder_strings;
///
/// assert_eq!(
///     clean_placeholder_strings("Some content {!{code}!}encoded{!{/code}!} more"),
///     "Some content codeencoded/code more"
/// );
/// ```
#[must_use]
pub fn clean_placeholder_strings(content: &str) -> String {
    let mut cleaned = content.to_owned();
    while RESERVED_TOKENS.iter().any(|token| cleaned.contains(token)) {
        for token in RESERVED_TOKENS {
            cleaned = cleaned.replace(token, "");
        }
    }
    cleaned
}

/// Replace preserve-tag spans with placeholders.
///
/// # Example
///
/// ```
/// use pcf_core::extract;
///
/// let out = extract("Use <code>'quotes'</code> here", &["code"]);
/// assert!(out.starts_with("Use {!{code}!}"));
/// assert!(out.ends_with("{!{/code}!} here"));
/// ```
#[must_use]
pub fn extract(content: &str, tags: &[&str]) -> String {
    Extractor::new(tags).extract(content)
}

/// Configurable extraction pass.
pub struct Extractor<'a> {
    tags: Vec<&'a str>,
    max_content_size: usize,
    block_detector: Option<&'a dyn BlockContentDetector>,
}

impl<'a> Extractor<'a> {
    /// Create an extractor for `tags`.
    ///
    /// Empty names are dropped and duplicates keep their first position.
    #[must_use]
    pub fn new(tags: &[&'a str]) -> Self {
        Self {
            tags: unique_tags(tags),
            max_content_size: MAX_CONTENT_SIZE,
            block_detector: None,
        }
    }

    /// Set the largest inner text, in bytes, that gets encoded.
    #[must_use]
    pub fn max_content_size(mut self, limit: usize) -> Self {
        self.max_content_size = limit;
        self
    }

    /// Skip content the detector reports as block-structured.
    #[must_use]
    pub fn with_block_detector(mut self, detector: &'a dyn BlockContentDetector) -> Self {
        self.block_detector = Some(detector);
        self
    }

    /// Run the extraction pass over `content`.
    #[must_use]
    pub fn extract(&self, content: &str) -> String {
        if self.tags.is_empty() {
            return content.to_owned();
        }

        let cleaned = clean_placeholder_strings(content);

        if self
            .block_detector
            .is_some_and(|detector| detector.has_blocks(&cleaned))
        {
            tracing::debug!("Block content detected, skipping extraction");
            return cleaned;
        }

        let scanner = match TagScanner::new(&self.tags) {
            Ok(scanner) => scanner,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build tag patterns");
                return cleaned;
            }
        };

        let spans = scanner.spans(&cleaned);
        if spans.is_empty() {
            return cleaned;
        }

        let mut out = String::with_capacity(cleaned.len());
        let mut last = 0;
        let mut encoded = 0;
        for span in &spans {
            out.push_str(&cleaned[last..span.range.start]);
            match self.placeholder(span) {
                Some(placeholder) => {
                    out.push_str(&placeholder);
                    encoded += 1;
                }
                None => out.push_str(&cleaned[span.range.clone()]),
            }
            last = span.range.end;
        }
        out.push_str(&cleaned[last..]);

        tracing::debug!(spans = spans.len(), encoded, "Extracted preserve tags");
        out
    }

    /// Placeholder for one span, or `None` to keep the span as it is.
    fn placeholder(&self, span: &TagSpan<'_>) -> Option<String> {
        if is_blank(span.inner) {
            return None;
        }

        match payload::encode(span.inner, self.max_content_size) {
            Ok(encoded) => Some(format!(
                "{PLACEHOLDER_OPEN}{tag}{attrs}{PLACEHOLDER_CLOSE}{encoded}{PLACEHOLDER_OPEN}/{tag}{PLACEHOLDER_CLOSE}",
                tag = span.tag,
                attrs = span.attrs,
            )),
            Err(PayloadError::TooLarge { size, limit }) => {
                tracing::warn!(tag = span.tag, size, limit, "Preserve tag content too large, left as is");
                None
            }
            Err(e) => {
                tracing::warn!(tag = span.tag, error = %e, "Failed to encode preserve tag content");
                None
            }
        }
    }
}

/// Whether `text` holds only spaces, tabs, line breaks, vertical tabs, or NUL.
///
/// Other whitespace such as `\u{a0}` counts as content.
fn is_blank(text: &str) -> bool {
    text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
        .is_empty()
}

/// Non-empty tag names in first-seen order.
pub(crate) fn unique_tags<'a>(tags: &[&'a str]) -> Vec<&'a str> {
    let mut unique: Vec<&str> = Vec::with_capacity(tags.len());
    for &tag in tags {
        if !tag.is_empty() && !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}
