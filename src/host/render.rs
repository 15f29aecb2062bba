//! Render sink: the element whose content is replaced on every dispatch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;

/// Accepts HTML to display. Whole-content replacement, no diffing.
pub trait RenderTarget: Send + Sync {
    fn render(&self, html: &str);
}

/// Render target that keeps the last written HTML in memory.
#[derive(Debug)]
pub struct MemoryTarget {
    content: ArcSwap<String>,
    writes: AtomicUsize,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self {
            content: ArcSwap::from_pointee(String::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current content.
    pub fn content(&self) -> String {
        self.content.load().as_ref().clone()
    }

    /// Number of renders so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Default for MemoryTarget {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderTarget for MemoryTarget {
    fn render(&self, html: &str) {
        self.content.store(Arc::new(html.to_string()));
        self.writes.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_content() {
        let target = MemoryTarget::new();
        target.render("<p>one</p>");
        target.render("<p>two</p>");
        assert_eq!(target.content(), "<p>two</p>");
        assert_eq!(target.writes(), 2);
    }
}
