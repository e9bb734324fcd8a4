//! Wire constants shared by the extractor and the restorer.

/// Opening half of a placeholder marker.
pub const PLACEHOLDER_OPEN: &str = "{!{";

/// Closing half of a placeholder marker.
pub const PLACEHOLDER_CLOSE: &str = "}!}";

/// Stand-in for `<` inside captured inner text.
pub const LT_SENTINEL: &str = "___HTML_LT_PLACEHOLDER___";

/// Stand-in for `>` inside captured inner text.
pub const GT_SENTINEL: &str = "___HTML_GT_PLACEHOLDER___";

/// Class added to every restored tag.
pub const MARKER_CLASS: &str = "preserve-code-formatting";

/// Tags preserved when nothing else is configured.
pub const DEFAULT_PRESERVE_TAGS: [&str; 2] = ["code", "pre"];

/// Element used to wrap multiline content.
pub const DEFAULT_BLOCK_CONTAINER: &str = "pre";

/// Largest inner text (in bytes) that gets encoded (100 KiB).
pub const MAX_CONTENT_SIZE: usize = 100 * 1024;

/// Soft-break token inserted into encoded payloads.
pub(crate) const SOFT_BREAK: char = '~';

/// Base64 characters between two soft breaks.
pub(crate) const SOFT_BREAK_INTERVAL: usize = 76;
