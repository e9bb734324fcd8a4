//! Class attribute editing for a single HTML start tag.

use std::fmt;
use std::ops::Range;

/// One start tag, split into its name and verbatim attribute text.
///
/// # Example
///
/// ```
/// use pcf_core::StartTag;
///
/// let mut tag = StartTag::new("code", r#" id="main" class="test""#);
/// tag.add_class("highlight");
/// assert_eq!(tag.to_string(), r#"<code id="main" class="test highlight">"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    name: String,
    attrs: String,
}

impl StartTag {
    /// Create a start tag from a name and its attribute text.
    ///
    /// `attrs` is kept byte-for-byte, including its leading whitespace.
    #[must_use]
    pub fn new(name: impl Into<String>, attrs: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: attrs.into(),
        }
    }

    /// Parse `<name attrs>` markup.
    ///
    /// The name runs up to the first whitespace, `/`, or `>`. Returns `None`
    /// when the markup is not wrapped in angle brackets or has no name.
    #[must_use]
    pub fn parse(markup: &str) -> Option<Self> {
        let inner = markup.strip_prefix('<')?.strip_suffix('>')?;
        let name_end = inner
            .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
            .unwrap_or(inner.len());
        if name_end == 0 {
            return None;
        }
        Some(Self::new(&inner[..name_end], &inner[name_end..]))
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attribute text, including leading whitespace.
    #[must_use]
    pub fn attrs(&self) -> &str {
        &self.attrs
    }

    /// Whether the class attribute contains `class` as a whole token.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        attributes(&self.attrs)
            .iter()
            .find(|attr| attr.is_class())
            .and_then(|attr| attr.value)
            .is_some_and(|value| value.split_whitespace().any(|token| token == class))
    }

    /// Add `class` to the class attribute.
    ///
    /// - Token already present: nothing changes.
    /// - Class attribute present: the token is appended and the attribute is
    ///   rewritten with double quotes.
    /// - No class attribute: ` class="..."` is inserted right after the name.
    ///
    /// All other attributes keep their bytes and their order.
    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }

        let existing = attributes(&self.attrs)
            .into_iter()
            .find(Attribute::is_class)
            .map(|attr| (attr.span, attr.value.unwrap_or("")));

        match existing {
            Some((span, value)) => {
                let value = value.trim_end();
                let merged = if value.trim().is_empty() {
                    class.to_owned()
                } else {
                    format!("{value} {class}")
                };
                let rewritten = format!(r#"class="{}""#, merged.replace('"', "&quot;"));
                self.attrs.replace_range(span, &rewritten);
            }
            None => self.attrs.insert_str(0, &format!(r#" class="{class}""#)),
        }
    }
}

impl fmt::Display for StartTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}{}>", self.name, self.attrs)
    }
}

/// Add `class` to the start tag in `markup`.
///
/// Markup that is not a start tag is returned unchanged.
///
/// # Examples
///
/// ```
/// use pcf_core::add_class_to_tag;
///
/// assert_eq!(add_class_to_tag("<code>", "x"), r#"<code class="x">"#);
/// assert_eq!(add_class_to_tag("<code class='a'>", "x"), r#"<code class="a x">"#);
/// assert_eq!(add_class_to_tag(r#"<code class="x">"#, "x"), r#"<code class="x">"#);
/// ```
#[must_use]
pub fn add_class_to_tag(markup: &str, class: &str) -> String {
    match StartTag::parse(markup) {
        Some(mut tag) => {
            tag.add_class(class);
            tag.to_string()
        }
        None => markup.to_owned(),
    }
}

/// One attribute located inside attribute text.
#[derive(Debug, PartialEq, Eq)]
struct Attribute<'a> {
    name: &'a str,
    /// Unquoted value; `None` for valueless attributes.
    value: Option<&'a str>,
    /// Byte range from the name through the end of the value.
    span: Range<usize>,
}

impl Attribute<'_> {
    fn is_class(&self) -> bool {
        self.name.eq_ignore_ascii_case("class")
    }
}

/// Split attribute text into attributes.
///
/// Handles `name="value"`, `name='value'`, `name=value`, and bare `name`.
/// An unterminated quote runs to the end of the text. Stray `=` and `/`
/// characters are skipped.
fn attributes(text: &str) -> Vec<Attribute<'_>> {
    let bytes = text.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0;

    let skip_whitespace = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    loop {
        i = skip_whitespace(i);
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len()
            && !matches!(bytes[i], b'=' | b'/' | b'>')
            && !bytes[i].is_ascii_whitespace()
        {
            i += 1;
        }
        if i == name_start {
            // Stray '=', '/' or '>'
            i += 1;
            continue;
        }
        let name = &text[name_start..i];

        let after_name = skip_whitespace(i);
        if after_name >= bytes.len() || bytes[after_name] != b'=' {
            attrs.push(Attribute {
                name,
                value: None,
                span: name_start..i,
            });
            continue;
        }

        i = skip_whitespace(after_name + 1);
        let value = match bytes.get(i) {
            Some(&quote @ (b'"' | b'\'')) => {
                let start = i + 1;
                let end = text[start..]
                    .find(char::from(quote))
                    .map_or(text.len(), |n| start + n);
                i = (end + 1).min(text.len());
                &text[start..end]
            }
            Some(_) => {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &text[start..i]
            }
            None => "",
        };
        attrs.push(Attribute {
            name,
            value: Some(value),
            span: name_start..i,
        });
    }

    attrs
}
