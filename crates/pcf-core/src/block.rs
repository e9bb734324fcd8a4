//! Detection of block-structured content.
//!
//! Content authored in a block editor carries its own structure for code
//! (dedicated code blocks) and is left alone by the extractor.

/// Reports whether content uses a block-based content model.
pub trait BlockContentDetector: Send + Sync {
    /// Returns `true` when `content` should bypass extraction.
    fn has_blocks(&self, content: &str) -> bool;
}

/// Detects blocks delimited by `<!-- wp:... -->` comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommentDelimitedBlocks;

impl CommentDelimitedBlocks {
    const DELIMITER: &'static str = "<!-- wp:";
}

impl BlockContentDetector for CommentDelimitedBlocks {
    fn has_blocks(&self, content: &str) -> bool {
        content.contains(Self::DELIMITER)
    }
}

/// Never reports block content.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBlockDetection;

impl BlockContentDetector for NoBlockDetection {
    fn has_blocks(&self, _content: &str) -> bool {
        false
    }
}
