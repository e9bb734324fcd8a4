//! Opaque payload codec for captured inner text.
//!
//! Encoding runs in four steps:
//! 1. `<` and `>` become [`LT_SENTINEL`] / [`GT_SENTINEL`]
//! 2. the text is serialized as a JSON string literal
//! 3. the JSON is base64-encoded (standard alphabet)
//! 4. a soft-break token is inserted every [`SOFT_BREAK_INTERVAL`] characters
//!
//! The result uses only `[A-Za-z0-9+/=~]`, so a beautifier that curls quotes,
//! converts dashes, or adds paragraph breaks finds nothing to change.
//! Decoding reverses steps 4 to 2 and leaves the sentinels in place; the
//! restorer swaps them back once formatting is done.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::consts::{GT_SENTINEL, LT_SENTINEL, SOFT_BREAK, SOFT_BREAK_INTERVAL};

/// Failure to encode or decode a payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    /// Input exceeds the configured size bound.
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    TooLarge {
        /// Size of the rejected input in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// Payload is not valid base64.
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Decoded bytes are not UTF-8.
    #[error("payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    /// Decoded text is not a single JSON string.
    #[error("payload is not a JSON string: {0}")]
    Json(#[from] serde_json::Error),
}

/// How sentinels are turned back into angle brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Angles {
    /// `&lt;` / `&gt;`, for text that has already been HTML-escaped.
    Escaped,
    /// Literal `<` / `>`.
    Literal,
}

/// Check whether inner text is small enough to be encoded.
///
/// # Examples
///
/// ```
/// use pcf_core::{MAX_CONTENT_SIZE, is_content_safe};
///
/// assert!(is_content_safe("function test() { return 'hello'; }", MAX_CONTENT_SIZE));
/// assert!(!is_content_safe(&"a".repeat(200_000), MAX_CONTENT_SIZE));
/// ```
#[must_use]
pub fn is_content_safe(text: &str, limit: usize) -> bool {
    text.len() <= limit
}

/// Encode inner text into an opaque payload.
pub fn encode(text: &str, limit: usize) -> Result<String, PayloadError> {
    if !is_content_safe(text, limit) {
        return Err(PayloadError::TooLarge {
            size: text.len(),
            limit,
        });
    }
    let json = serde_json::to_string(&shield_angles(text))?;
    Ok(insert_soft_breaks(&STANDARD.encode(json)))
}

/// Decode a payload produced by [`encode`].
///
/// Text longer than `limit` bytes is rejected, just as [`encode`] rejects it.
/// The returned text still carries the angle sentinels.
pub fn decode(payload: &str, limit: usize) -> Result<String, PayloadError> {
    let bound = max_encoded_len(limit);
    if payload.len() > bound {
        return Err(PayloadError::TooLarge {
            size: payload.len(),
            limit: bound,
        });
    }
    let compact: String = payload.chars().filter(|&c| c != SOFT_BREAK).collect();
    let json = String::from_utf8(STANDARD.decode(compact)?)?;
    let text = serde_json::from_str::<String>(&json)?;

    let size = unshielded_len(&text);
    if size > limit {
        return Err(PayloadError::TooLarge { size, limit });
    }
    Ok(text)
}

/// Length in bytes of `text` once the sentinels are turned back into `<` / `>`.
fn unshielded_len(text: &str) -> usize {
    let lt = text.matches(LT_SENTINEL).count() * (LT_SENTINEL.len() - 1);
    let gt = text.matches(GT_SENTINEL).count() * (GT_SENTINEL.len() - 1);
    text.len() - lt - gt
}

/// Largest payload [`encode`] can produce for text of `limit` bytes.
///
/// Each input byte grows to at most one sentinel or one `\u00XX` JSON
/// escape, the JSON adds two quotes, base64 adds a third, and soft breaks
/// add one character per interval.
fn max_encoded_len(limit: usize) -> usize {
    let per_byte = LT_SENTINEL.len().max(GT_SENTINEL.len()).max(6);
    let json = limit.saturating_mul(per_byte).saturating_add(2);
    let base64 = json.div_ceil(3).saturating_mul(4);
    base64.saturating_add(base64 / SOFT_BREAK_INTERVAL)
}

pub(crate) fn shield_angles(text: &str) -> String {
    text.replace('<', LT_SENTINEL).replace('>', GT_SENTINEL)
}

pub(crate) fn unshield_angles(text: &str, angles: Angles) -> String {
    let (lt, gt) = match angles {
        Angles::Escaped => ("&lt;", "&gt;"),
        Angles::Literal => ("<", ">"),
    };
    text.replace(LT_SENTINEL, lt).replace(GT_SENTINEL, gt)
}

fn insert_soft_breaks(encoded: &str) -> String {
    let mut out = String::with_capacity(encoded.len() + encoded.len() / SOFT_BREAK_INTERVAL);
    for (i, c) in encoded.chars().enumerate() {
        if i > 0 && i % SOFT_BREAK_INTERVAL == 0 {
            out.push(SOFT_BREAK);
        }
        out.push(c);
    }
    out
}
