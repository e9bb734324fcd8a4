//! Preserve-tag span discovery.
//!
//! Spans are found in one left-to-right pass: the leftmost opening tag of any
//! configured name starts a span, which ends at the closing tag that balances
//! it. Same-named tags nested inside are part of the inner text. When the
//! document never balances, the span ends at the first closing tag after the
//! opening one. Scanning resumes after the span, so nothing inside it is
//! matched again.

use std::collections::HashMap;
use std::ops::Range;

use regex::Regex;

use crate::extract::unique_tags;
use crate::pattern;

/// One matched preserve-tag occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpan<'a> {
    /// Tag name as configured.
    pub tag: &'a str,
    /// Verbatim attribute text, including leading whitespace.
    pub attrs: &'a str,
    /// Raw text between the opening and closing tags.
    pub inner: &'a str,
    /// Byte range of the whole element in the source.
    pub range: Range<usize>,
}

/// Find the preserve-tag spans of `tags` in `content`.
///
/// Spans come back in document order and never overlap. Whitespace-only
/// spans are included; the extractor is what skips them.
///
/// # Example
///
/// ```
/// use pcf_core::find_spans;
///
/// let spans = find_spans("<code>a</code> and <pre id=\"x\">b</pre>", &["code", "pre"]);
/// assert_eq!(spans.len(), 2);
/// assert_eq!(spans[1].attrs, " id=\"x\"");
/// assert_eq!(spans[1].inner, "b");
/// ```
#[must_use]
pub fn find_spans<'c>(content: &'c str, tags: &[&str]) -> Vec<TagSpan<'c>> {
    let tags = unique_tags(tags);
    if tags.is_empty() {
        return Vec::new();
    }
    match TagScanner::new(&tags) {
        Ok(scanner) => scanner.spans(content),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build tag patterns");
            Vec::new()
        }
    }
}

/// Finds [`TagSpan`]s for a fixed set of tag names.
pub(crate) struct TagScanner {
    opening: Regex,
    boundaries: HashMap<String, Regex>,
}

impl TagScanner {
    pub(crate) fn new(tags: &[&str]) -> Result<Self, regex::Error> {
        let opening = pattern::opening_tags(tags)?;
        let boundaries = tags
            .iter()
            .map(|tag| -> Result<(String, Regex), regex::Error> {
                Ok(((*tag).to_owned(), pattern::tag_boundaries(tag)?))
            })
            .collect::<Result<_, regex::Error>>()?;
        Ok(Self {
            opening,
            boundaries,
        })
    }

    /// All spans in `content`, in document order, non-overlapping.
    pub(crate) fn spans<'c>(&self, content: &'c str) -> Vec<TagSpan<'c>> {
        let mut events: HashMap<&str, TagEvents> = HashMap::new();
        let mut spans = Vec::new();
        let mut pos = 0;

        while let Some(caps) = self.opening.captures_at(content, pos) {
            let (Some(open), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let tag = name.as_str();
            let Some(boundary) = self.boundaries.get(tag) else {
                pos = open.end();
                continue;
            };
            let closing = events
                .entry(tag)
                .or_insert_with(|| TagEvents::collect(boundary, content))
                .closing_for(open.start(), open.end());

            match closing {
                Some(close) => {
                    spans.push(TagSpan {
                        tag,
                        attrs: caps.get(2).map_or("", |m| m.as_str()),
                        inner: &content[open.end()..close.start],
                        range: open.start()..close.end,
                    });
                    pos = close.end;
                }
                None => pos = open.end(),
            }
        }

        spans
    }
}

/// An opening or closing tag of one name.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    start: usize,
    end: usize,
    opening: bool,
}

/// Every boundary of one tag name, with balanced pairs precomputed.
struct TagEvents {
    events: Vec<Boundary>,
    /// Index of the closing tag balancing each opening tag.
    partner: Vec<Option<usize>>,
    /// Index of the first closing tag after each event.
    next_close: Vec<Option<usize>>,
}

impl TagEvents {
    fn collect(boundary: &Regex, content: &str) -> Self {
        let events: Vec<Boundary> = boundary
            .captures_iter(content)
            .filter_map(|caps| {
                let m = caps.get(0)?;
                Some(Boundary {
                    start: m.start(),
                    end: m.end(),
                    opening: caps.get(1).is_some(),
                })
            })
            .collect();

        let mut partner = vec![None; events.len()];
        let mut stack = Vec::new();
        for (i, event) in events.iter().enumerate() {
            if event.opening {
                stack.push(i);
            } else if let Some(open) = stack.pop() {
                partner[open] = Some(i);
            }
        }

        let mut next_close = vec![None; events.len()];
        let mut upcoming = None;
        for (i, event) in events.iter().enumerate().rev() {
            next_close[i] = upcoming;
            if !event.opening {
                upcoming = Some(i);
            }
        }

        Self {
            events,
            partner,
            next_close,
        }
    }

    /// Closing tag for the opening tag at `start..end`.
    fn closing_for(&self, start: usize, end: usize) -> Option<Boundary> {
        match self.events.binary_search_by_key(&start, |e| e.start) {
            Ok(i) if self.events[i].opening => self.partner[i]
                .or(self.next_close[i])
                .map(|j| self.events[j]),
            _ => self
                .events
                .iter()
                .find(|e| !e.opening && e.start >= end)
                .copied(),
        }
    }
}
