//! Service object tying the two phases to content call sites.
//!
//! A host calls [`Preserver::before_transform`] before its beautifier and
//! [`Preserver::after_transform`] after it, or lets [`Preserver::render`]
//! run the whole sequence.

use crate::block::{BlockContentDetector, CommentDelimitedBlocks};
use crate::extract::Extractor;
use crate::restore::Restorer;
use crate::settings::PreserveSettings;

/// Kind of content passing through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Primary post body.
    Post,
    /// Post excerpt.
    Excerpt,
    /// Reader comment.
    Comment,
}

/// How restored text is emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RestoreMode {
    /// Formatted, escaped markup for display.
    #[default]
    Display,
    /// Original text with placeholders removed, for persistence.
    Save,
}

impl RestoreMode {
    /// Whether the formatter runs in this mode.
    #[must_use]
    pub fn preserve_formatting(self) -> bool {
        matches!(self, Self::Display)
    }
}

/// External text transform the pipeline shields preserved tags from.
pub trait Beautifier {
    /// Transform `text`.
    fn beautify(&self, text: &str) -> String;
}

/// Beautifier that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Beautifier for Identity {
    fn beautify(&self, text: &str) -> String {
        text.to_owned()
    }
}

impl<F> Beautifier for F
where
    F: Fn(&str) -> String,
{
    fn beautify(&self, text: &str) -> String {
        self(text)
    }
}

/// Preserves tag contents across a beautifier pass.
///
/// # Example
///
/// ```
/// use pcf_core::{ContentKind, PreserveSettings, Preserver};
///
/// fn curl(text: &str) -> String {
///     text.replace('\'', "\u{2019}")
/// }
///
/// let preserver = Preserver::new(PreserveSettings::default());
/// let html = preserver.render(ContentKind::Post, "It's <code>it's</code>", &curl);
/// assert_eq!(
///     html,
///     "It\u{2019}s <code class=\"preserve-code-formatting\">it&#039;s</code>"
/// );
/// ```
pub struct Preserver {
    settings: PreserveSettings,
    block_detector: Box<dyn BlockContentDetector>,
}

impl Default for Preserver {
    fn default() -> Self {
        Self::new(PreserveSettings::default())
    }
}

impl Preserver {
    /// Create a preserver that skips comment-delimited block content.
    #[must_use]
    pub fn new(settings: PreserveSettings) -> Self {
        Self {
            settings,
            block_detector: Box::new(CommentDelimitedBlocks),
        }
    }

    /// Replace the block-content detector.
    #[must_use]
    pub fn with_block_detector(mut self, detector: Box<dyn BlockContentDetector>) -> Self {
        self.block_detector = detector;
        self
    }

    /// Settings this preserver was built with.
    pub fn settings(&self) -> &PreserveSettings {
        &self.settings
    }

    /// Replace configured tags in `content` with placeholders.
    #[must_use]
    pub fn extract(&self, content: &str) -> String {
        let tags = self.settings.tags();
        Extractor::new(&tags)
            .max_content_size(self.settings.max_content_size)
            .with_block_detector(self.block_detector.as_ref())
            .extract(content)
    }

    /// Replace placeholders in `content` with restored markup.
    #[must_use]
    pub fn restore(&self, content: &str, mode: RestoreMode) -> String {
        let tags = self.settings.tags();
        Restorer::new(&tags)
            .preserve_formatting(mode.preserve_formatting())
            .format_options(self.settings.format_options())
            .wrap_multiline(self.settings.wrap_multiline_code_in_pre)
            .block_container(&self.settings.block_container)
            .max_content_size(self.settings.max_content_size)
            .restore(content)
    }

    /// Whether `kind` is processed under the current settings.
    #[must_use]
    pub fn is_enabled_for(&self, kind: ContentKind) -> bool {
        match kind {
            ContentKind::Post | ContentKind::Excerpt => self.settings.preserve_in_posts,
            ContentKind::Comment => self.settings.preserve_in_comments,
        }
    }

    /// Call site before the beautifier runs.
    #[must_use]
    pub fn before_transform(&self, kind: ContentKind, content: &str) -> String {
        if self.is_enabled_for(kind) {
            self.extract(content)
        } else {
            content.to_owned()
        }
    }

    /// Call site after the beautifier has run.
    #[must_use]
    pub fn after_transform(&self, kind: ContentKind, content: &str, mode: RestoreMode) -> String {
        if self.is_enabled_for(kind) {
            self.restore(content, mode)
        } else {
            content.to_owned()
        }
    }

    /// Run extract, `beautifier`, and display restore in sequence.
    #[must_use]
    pub fn render<B>(&self, kind: ContentKind, content: &str, beautifier: &B) -> String
    where
        B: Beautifier + ?Sized,
    {
        let extracted = self.before_transform(kind, content);
        let beautified = beautifier.beautify(&extracted);
        self.after_transform(kind, &beautified, RestoreMode::Display)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::NoBlockDetection;
    use pretty_assertions::assert_eq;

    // Shared across request handlers
    static_assertions::assert_impl_all!(Preserver: Send, Sync);

    /// Quote curling and dash conversion in the style of a blog texturizer.
    fn texturize(text: &str) -> String {
        text.replace(" -- ", " \u{2013} ")
            .replace('\'', "\u{2019}")
            .replace("...", "\u{2026}")
    }

    fn preserve(content: &str) -> String {
        Preserver::default().render(ContentKind::Post, content, &Identity)
    }

    fn preserve_with(settings: PreserveSettings, content: &str) -> String {
        Preserver::new(settings).render(ContentKind::Post, content, &Identity)
    }

    fn marked(tag: &str, inner: &str) -> String {
        format!(r#"<{tag} class="preserve-code-formatting">{inner}</{tag}>"#)
    }

    #[test]
    fn test_round_trip_without_spans() {
        for content in [
            "",
            "Plain text",
            "Text with 'quotes' and <strong>markup</strong>\n\nand -- dashes...",
            "<codex>not a preserve tag</codex>",
        ] {
            assert_eq!(preserve(content), content);
        }
    }

    #[test]
    fn test_empty_tags_pass_through() {
        for content in ["<code></code>", "<pre></pre>", "<code> \n </code>"] {
            assert_eq!(preserve(content), content);
        }
        assert_eq!(
            preserve(r#"<code class="test" id="main"></code>"#),
            r#"<code class="test" id="main"></code>"#
        );
    }

    #[test]
    fn test_mixed_empty_and_non_empty_tags() {
        assert_eq!(
            preserve("<code></code><pre>has content</pre><code>also has content</code>"),
            format!(
                "<code></code>{}{}",
                marked("pre", "has content"),
                marked("code", "also has content")
            )
        );
    }

    #[test]
    fn test_lazy_boundary_matching() {
        assert_eq!(
            preserve("<code>a</code>text<code>b</code>"),
            format!("{}text{}", marked("code", "a"), marked("code", "b"))
        );
    }

    #[test]
    fn test_html_neutralization() {
        for tag in ["code", "pre"] {
            assert_eq!(
                preserve(&format!("Example <{tag}><strong>bold</strong></{tag}>")),
                format!("Example {}", marked(tag, "&lt;strong&gt;bold&lt;/strong&gt;"))
            );
        }
    }

    #[test]
    fn test_whitespace_preservation() {
        for tag in ["code", "pre"] {
            let content = format!("Example <{tag}>preserve  multiple  spaces</{tag}>");
            assert_eq!(
                preserve(&content),
                format!(
                    "Example {}",
                    marked(tag, "preserve&nbsp;&nbsp;multiple&nbsp;&nbsp;spaces")
                )
            );

            let settings = PreserveSettings {
                use_nbsp_for_spaces: false,
                ..PreserveSettings::default()
            };
            assert_eq!(
                preserve_with(settings, &content),
                format!("Example {}", marked(tag, "preserve  multiple  spaces"))
            );
        }
    }

    #[test]
    fn test_tabs_are_expanded() {
        assert_eq!(
            preserve("Example <code>\tfirst\n\t\tsecond</code>"),
            format!(
                "Example <pre>{}</pre>",
                marked("code", "&nbsp;&nbsp;first\n&nbsp;&nbsp;&nbsp;&nbsp;second")
            )
        );
    }

    #[test]
    fn test_multiline_wrapping() {
        let text = "some code\nanother line\n yet another";
        assert_eq!(
            preserve(&format!("Example <code>{text}</code>")),
            format!("Example <pre>{}</pre>", marked("code", text))
        );
        assert_eq!(
            preserve(&format!("Example <pre>{text}</pre>")),
            format!("Example {}", marked("pre", text))
        );

        let settings = PreserveSettings {
            wrap_multiline_code_in_pre: false,
            ..PreserveSettings::default()
        };
        assert_eq!(
            preserve_with(settings, &format!("Example <code>{text}</code>")),
            format!("Example {}", marked("code", text))
        );
    }

    #[test]
    fn test_nl2br_alone() {
        let settings = PreserveSettings {
            nl2br: true,
            ..PreserveSettings::default()
        };
        assert_eq!(
            preserve_with(settings, "Example <code>some code\nanother line\n yet another</code>"),
            format!(
                "Example <pre>{}</pre>",
                marked("code", "some code<br />\nanother line<br />\n yet another")
            )
        );
    }

    #[test]
    fn test_tag_name_injection_is_literal() {
        for tag in [
            "code[^>]*", "pre.*", "code|pre", "code+", "code?", "code{2}", "code$", "^code",
            "code\\", "code[", "code]", "code(", "code)", "code+++",
        ] {
            let settings = PreserveSettings {
                preserve_tags: vec![tag.to_owned()],
                ..PreserveSettings::default()
            };
            let content = format!("<code>plain</code><{tag}>test content</{tag}>");
            assert_eq!(
                preserve_with(settings, &content),
                format!("<code>plain</code>{}", marked(tag, "test content")),
                "failed to match {tag} literally"
            );
        }
    }

    #[test]
    fn test_unicode_and_edge_tag_names() {
        for tag in ["código", "代码", "код", "code.", ".code", "code-", "_code", "#code"] {
            let settings = PreserveSettings {
                preserve_tags: vec![tag.to_owned()],
                ..PreserveSettings::default()
            };
            assert_eq!(
                preserve_with(settings, &format!("<{tag}>test</{tag}>")),
                marked(tag, "test")
            );
        }
    }

    #[test]
    fn test_injected_tag_with_legitimate_tags() {
        let settings = PreserveSettings {
            preserve_tags: vec!["code[^>]*".to_owned(), "pre".to_owned()],
            ..PreserveSettings::default()
        };
        assert_eq!(
            preserve_with(
                settings,
                "<pre>legitimate content</pre><code[^>]*>malicious content</code[^>]*><code>normal content</code>"
            ),
            format!(
                "{}{}<code>normal content</code>",
                marked("pre", "legitimate content"),
                marked("code[^>]*", "malicious content")
            )
        );
    }

    #[test]
    fn test_class_merge_is_idempotent() {
        let once = preserve(r#"<code id="main" class="test">This is a test</code>"#);
        assert_eq!(
            once,
            r#"<code id="main" class="test preserve-code-formatting">This is a test</code>"#
        );
        assert_eq!(preserve(&once), once);
    }

    #[test]
    fn test_oversized_content_fails_open() {
        let content = format!("<code>{}</code>", "a".repeat(200_000));
        assert_eq!(preserve(&content), content);
    }

    #[test]
    fn test_custom_size_limit() {
        let settings = PreserveSettings {
            max_content_size: 4,
            ..PreserveSettings::default()
        };
        assert_eq!(
            preserve_with(settings, "<code>abcde</code><code>abcd</code>"),
            format!("<code>abcde</code>{}", marked("code", "abcd"))
        );
    }

    #[test]
    fn test_beautifier_cannot_reach_preserved_text() {
        let preserver = Preserver::default();
        assert_eq!(
            preserver.render(
                ContentKind::Post,
                "Don't -- stop... <code>don't -- stop...</code> -- ok",
                &texturize
            ),
            format!(
                "Don\u{2019}t \u{2013} stop\u{2026} {} \u{2013} ok",
                marked("code", "don&#039;t -- stop...")
            )
        );
    }

    #[test]
    fn test_beautifier_reaches_attribute_text() {
        // Only the inner text is encoded; the attributes ride along in clear.
        let curl = |text: &str| text.replace('"', "\u{201d}");
        assert_eq!(
            Preserver::default().render(
                ContentKind::Post,
                r#"<code class="test">x</code>"#,
                &curl
            ),
            "<code class=\"\u{201d}test\u{201d} preserve-code-formatting\">x</code>"
        );
    }

    #[test]
    fn test_custom_tags_setting() {
        let settings = PreserveSettings {
            preserve_tags: vec!["pre".to_owned(), "strong".to_owned()],
            ..PreserveSettings::default()
        };
        let preserver = Preserver::new(settings);
        let code = "<code>preserve  multiple  spaces</code>";
        assert_eq!(preserver.render(ContentKind::Post, code, &Identity), code);
        assert_eq!(
            preserver.render(
                ContentKind::Post,
                "<strong>preserve  multiple  spaces</strong>",
                &Identity
            ),
            marked("strong", "preserve&nbsp;&nbsp;multiple&nbsp;&nbsp;spaces")
        );
    }

    #[test]
    fn test_unhandled_tags_are_untouched() {
        assert_eq!(
            preserve("<code>processed</code><strong>not  processed</strong><pre>also processed</pre>"),
            format!(
                "{}<strong>not  processed</strong>{}",
                marked("code", "processed"),
                marked("pre", "also processed")
            )
        );
    }

    #[test]
    fn test_spoofed_placeholders_never_survive() {
        assert_eq!(
            preserve("Text {!{pre}!}malicious pre{!{/pre}!} more {!{code}!}malicious code{!{/code}!}"),
            "Text premalicious pre/pre more codemalicious code/code"
        );
    }

    #[test]
    fn test_complex_code_content() {
        let content = "<code>\nfunction complexFunction() {\n    $data = array(\n        'key' => 'value',\n    );\n    return json_encode($data);\n}\n</code>";
        let result = preserve(content);
        assert!(result.starts_with(r#"<pre><code class="preserve-code-formatting">"#));
        assert!(result.contains("function complexFunction()"));
        assert!(result.contains("$data = array("));
        assert!(result.contains("&#039;key&#039; =&gt; &#039;value&#039;"));
        assert!(result.contains("json_encode($data)"));
    }

    #[test]
    fn test_block_content_is_not_processed() {
        let content = "<!-- wp:paragraph -->\n<p>This is a regular paragraph with <code>inline code</code>.</p>\n<!-- /wp:paragraph -->";
        assert_eq!(preserve(content), content);

        let preserver = Preserver::default().with_block_detector(Box::new(NoBlockDetection));
        assert_eq!(
            preserver.render(ContentKind::Post, content, &Identity),
            content.replace("<code>", r#"<code class="preserve-code-formatting">"#)
        );
    }

    #[test]
    fn test_content_kinds_follow_settings() {
        let settings = PreserveSettings {
            preserve_in_comments: false,
            ..PreserveSettings::default()
        };
        let preserver = Preserver::new(settings);
        let content = "<code>x  y</code>";

        assert!(preserver.is_enabled_for(ContentKind::Post));
        assert!(preserver.is_enabled_for(ContentKind::Excerpt));
        assert!(!preserver.is_enabled_for(ContentKind::Comment));
        assert_eq!(preserver.before_transform(ContentKind::Comment, content), content);
        assert_eq!(
            preserver.render(ContentKind::Excerpt, content, &Identity),
            marked("code", "x&nbsp;&nbsp;y")
        );

        let settings = PreserveSettings {
            preserve_in_posts: false,
            ..PreserveSettings::default()
        };
        let preserver = Preserver::new(settings);
        assert_eq!(preserver.render(ContentKind::Post, content, &Identity), content);
        assert_eq!(preserver.render(ContentKind::Excerpt, content, &Identity), content);
        assert_eq!(
            preserver.render(ContentKind::Comment, content, &Identity),
            marked("code", "x&nbsp;&nbsp;y")
        );
    }

    #[test]
    fn test_save_mode_keeps_original_text() {
        let preserver = Preserver::default();
        let content = "Example <code>if (a < b) {\n\treturn 'x';\n}</code>";
        let extracted = preserver.before_transform(ContentKind::Post, content);
        assert_eq!(
            preserver.after_transform(ContentKind::Post, &extracted, RestoreMode::Save),
            "Example <code class=\"preserve-code-formatting\">if (a < b) {\n\treturn 'x';\n}</code>"
        );
    }

    #[test]
    fn test_restore_mode() {
        assert!(RestoreMode::Display.preserve_formatting());
        assert!(!RestoreMode::Save.preserve_formatting());
        assert_eq!(RestoreMode::default(), RestoreMode::Display);
    }
}
