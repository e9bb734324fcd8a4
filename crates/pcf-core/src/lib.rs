//! Shields the contents of preserve tags (`<code>`, `<pre>`) from text
//! beautifiers.
//!
//! The pipeline has two phases around an external beautifier:
//!
//! - [`extract`] replaces every preserve-tag span with an opaque placeholder
//!   whose payload uses only `[A-Za-z0-9+/=~]`, so quote curling, dash
//!   conversion, and paragraph wrapping find nothing to change inside it.
//! - [`restore`] decodes each placeholder, formats the text with
//!   [`format_code`], adds the `preserve-code-formatting` class, and wraps
//!   multiline content in `<pre>`.
//!
//! [`Preserver`] bundles both phases with [`PreserveSettings`] and per-kind
//! call sites.
//!
//! # Example
//!
//! ```
//! use pcf_core::{extract, restore};
//!
//! let tags = ["code", "pre"];
//! let placeholder = extract("Say <code>'hi'  there</code>", &tags);
//! // ... the beautifier runs on `placeholder` here ...
//! assert_eq!(
//!     restore(&placeholder, &tags, true),
//!     r#"Say <code class="preserve-code-formatting">&#039;hi&#039;&nbsp;&nbsp;there</code>"#
//! );
//! ```
//!
//! Malformed or oversized input never produces an error: the affected span
//! is left exactly as it was.

mod block;
mod class_attr;
mod consts;
mod extract;
mod format;
mod pattern;
mod payload;
mod preserver;
mod restore;
mod scan;
mod settings;

pub use block::{BlockContentDetector, CommentDelimitedBlocks, NoBlockDetection};
pub use class_attr::{StartTag, add_class_to_tag};
pub use consts::{
    DEFAULT_BLOCK_CONTAINER, DEFAULT_PRESERVE_TAGS, GT_SENTINEL, LT_SENTINEL, MARKER_CLASS,
    MAX_CONTENT_SIZE, PLACEHOLDER_CLOSE, PLACEHOLDER_OPEN,
};
pub use extract::{Extractor, clean_placeholder_strings, extract};
pub use format::{FormatOptions, escape_html, format_code};
pub use pattern::escape_tag_name;
pub use payload::{PayloadError, decode, encode, is_content_safe};
pub use preserver::{Beautifier, ContentKind, Identity, Preserver, RestoreMode};
pub use restore::{Restorer, restore};
pub use scan::{TagSpan, find_spans};
pub use settings::PreserveSettings;
